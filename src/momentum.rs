//! Flick momentum: decaying velocity applied after a fast release.
//!
//! Velocity units are pixels per millisecond, taken from the last open
//! flick window at release (`displacement / elapsed_ms`). Each
//! post-render frame the session controller decays the vector by the
//! configured friction factor and feeds `velocity * elapsed_ms` back
//! into the gesture pipeline until the magnitude crosses the zero
//! threshold, at which point the selection settles into a slot.

use glam::DVec2;

/// The point at which movement is considered stopped and velocity is
/// zeroed.
pub const VELOCITY_EPSILON: f64 = 0.1;

/// Decaying velocity vector for flick gestures.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Momentum {
    velocity: DVec2,
}

impl Momentum {
    /// No movement.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a release velocity (px/ms) from a closed flick window.
    /// Velocities at or below the epsilon collapse to zero immediately.
    #[must_use]
    pub fn from_velocity(velocity: DVec2) -> Self {
        let mut m = Self { velocity };
        let _ = m.is_zero();
        m
    }

    /// Current velocity in px/ms.
    #[must_use]
    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    /// Whether movement has stopped. At or below the epsilon the vector
    /// is forced to exactly (0, 0) so later frames compare cleanly.
    pub fn is_zero(&mut self) -> bool {
        if self.velocity.length() > VELOCITY_EPSILON {
            return false;
        }
        self.velocity = DVec2::ZERO;
        true
    }

    /// Apply one frame of multiplicative friction.
    pub fn decay(&mut self, friction: f64) {
        self.velocity *= friction;
    }

    /// Movement delta for a frame of `elapsed_ms`.
    #[must_use]
    pub fn step(&self, elapsed_ms: f64) -> DVec2 {
        self.velocity * elapsed_ms
    }

    /// Kill all momentum (boundary hits, new presses).
    pub fn cancel(&mut self) {
        self.velocity = DVec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_velocity() {
        let m = Momentum::from_velocity(DVec2::new(2.0, 0.0));
        assert_eq!(m.velocity(), DVec2::new(2.0, 0.0));
    }

    #[test]
    fn test_slow_release_zeroed_immediately() {
        let mut m = Momentum::from_velocity(DVec2::new(0.05, 0.0));
        assert!(m.is_zero());
        assert_eq!(m.velocity(), DVec2::ZERO);
    }

    #[test]
    fn test_epsilon_forces_exact_zero() {
        let mut m = Momentum::from_velocity(DVec2::new(0.05, 0.05));
        assert!(m.is_zero());
        assert_eq!(m.velocity(), DVec2::ZERO);
    }

    #[test]
    fn test_decay_converges_in_finite_steps() {
        let mut m = Momentum::from_velocity(DVec2::new(5.0, 0.0));
        let mut steps = 0;
        while !m.is_zero() {
            m.decay(0.9);
            steps += 1;
            assert!(steps < 10_000, "friction never converged");
        }
        assert_eq!(m.velocity(), DVec2::ZERO);
    }

    #[test]
    fn test_step_scales_by_elapsed() {
        let m = Momentum::from_velocity(DVec2::new(1.6, -0.8));
        let movement = m.step(16.0);
        assert!((movement.x - 25.6).abs() < 1e-9);
        assert!((movement.y + 12.8).abs() < 1e-9);
    }

    #[test]
    fn test_cancel() {
        let mut m = Momentum::from_velocity(DVec2::new(5.0, 0.0));
        assert!(!m.is_zero());
        m.cancel();
        assert!(m.is_zero());
    }
}
