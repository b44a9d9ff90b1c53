//! Per-item animation driver.
//!
//! Each item carries an [`AnimatedTransform`]: the committed transform
//! the renderer reads, plus an optional timed transition toward a
//! target. Two reconciliation modes exist: **direct** (snap straight to
//! the target, used while a pointer/touch is held or momentum is live,
//! since animating during live interaction reads as input lag) and
//! **eased** (timed interpolation, used on commit/release).

use std::time::{Duration, Instant};

use super::easing::EasingFunction;
use super::transform::Transform;

/// A timed transition from one transform to another.
#[derive(Debug, Clone, Copy)]
pub struct TransformAnimation {
    start: Transform,
    target: Transform,
    started: Instant,
    duration: Duration,
    easing: EasingFunction,
}

impl TransformAnimation {
    /// Begin a transition at `now`.
    #[must_use]
    pub fn new(
        start: Transform,
        target: Transform,
        now: Instant,
        duration: Duration,
        easing: EasingFunction,
    ) -> Self {
        Self {
            start,
            target,
            started: now,
            duration,
            easing,
        }
    }

    /// Raw progress in [0, 1]. Zero-duration transitions are complete
    /// immediately.
    #[must_use]
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Whether the transition has not yet reached its end.
    #[must_use]
    pub fn running(&self, now: Instant) -> bool {
        self.progress(now) < 1.0
    }

    /// Interpolated transform at `now` (eased).
    #[must_use]
    pub fn sample(&self, now: Instant) -> Transform {
        let t = self.easing.evaluate(self.progress(now));
        Transform::lerp(self.start, self.target, t)
    }

    /// The transform this transition converges to.
    #[must_use]
    pub fn target(&self) -> Transform {
        self.target
    }
}

/// Committed transform plus an optional in-flight transition.
#[derive(Debug, Clone, Copy)]
pub struct AnimatedTransform {
    current: Transform,
    animation: Option<TransformAnimation>,
}

impl AnimatedTransform {
    /// Create with a seed transform and no transition.
    #[must_use]
    pub fn new(seed: Transform) -> Self {
        Self {
            current: seed,
            animation: None,
        }
    }

    /// The committed transform the renderer reads.
    #[must_use]
    pub fn current(&self) -> Transform {
        self.current
    }

    /// The transform this item is converging to (its own value when no
    /// transition is in flight).
    #[must_use]
    pub fn target(&self) -> Transform {
        self.animation.map_or(self.current, |a| a.target())
    }

    /// Direct mode: snap to the target, cancelling any transition.
    pub fn set_direct(&mut self, target: Transform) {
        self.current = target;
        self.animation = None;
    }

    /// Eased mode: start (or replace) a transition from the current
    /// transform toward `target`.
    pub fn set_eased(
        &mut self,
        target: Transform,
        now: Instant,
        duration: Duration,
        easing: EasingFunction,
    ) {
        self.animation = Some(TransformAnimation::new(
            self.current,
            target,
            now,
            duration,
            easing,
        ));
    }

    /// Advance the transition: sample it into the committed transform,
    /// dropping it once finished. Returns whether a transition is still
    /// running after this tick.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };
        self.current = anim.sample(now);
        if anim.running(now) {
            true
        } else {
            self.current = anim.target();
            self.animation = None;
            false
        }
    }

    /// Whether a transition is in flight and unfinished.
    #[must_use]
    pub fn running(&self, now: Instant) -> bool {
        self.animation.is_some_and(|a| a.running(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn test_progress_clamps() {
        let start = Instant::now();
        let anim = TransformAnimation::new(
            Transform::IDENTITY,
            Transform::new(0.5, 10.0, 0.0),
            start,
            MS_100,
            EasingFunction::Linear,
        );
        assert!(anim.progress(start) < 0.01);
        assert_eq!(anim.progress(start + MS_100), 1.0);
        assert_eq!(anim.progress(start + MS_100 * 3), 1.0);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let start = Instant::now();
        let anim = TransformAnimation::new(
            Transform::IDENTITY,
            Transform::new(2.0, 0.0, 0.0),
            start,
            Duration::ZERO,
            EasingFunction::Linear,
        );
        assert!(!anim.running(start));
        assert_eq!(anim.sample(start), anim.target());
    }

    #[test]
    fn test_linear_sample_midpoint() {
        let start = Instant::now();
        let anim = TransformAnimation::new(
            Transform::new(1.0, 0.0, 0.0),
            Transform::new(0.0, 100.0, 0.0),
            start,
            MS_100,
            EasingFunction::Linear,
        );
        let mid = anim.sample(start + MS_100 / 2);
        assert!((mid.scale_x - 0.5).abs() < 1e-9);
        assert!((mid.translation_x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_direct_mode_snaps() {
        let now = Instant::now();
        let mut at = AnimatedTransform::new(Transform::IDENTITY);
        at.set_eased(
            Transform::new(0.5, 10.0, 0.0),
            now,
            MS_100,
            EasingFunction::Linear,
        );
        assert!(at.running(now));

        let snap = Transform::new(0.25, 99.0, 1.0);
        at.set_direct(snap);
        assert!(!at.running(now));
        assert_eq!(at.current(), snap);
        assert_eq!(at.target(), snap);
    }

    #[test]
    fn test_tick_finishes_on_target() {
        let now = Instant::now();
        let target = Transform::new(0.5, 50.0, -20.0);
        let mut at = AnimatedTransform::new(Transform::IDENTITY);
        at.set_eased(target, now, MS_100, EasingFunction::Linear);

        assert!(at.tick(now + MS_100 / 2));
        assert!(at.running(now + MS_100 / 2));

        assert!(!at.tick(now + MS_100));
        assert_eq!(at.current(), target);
        assert!(!at.running(now + MS_100));
    }

    #[test]
    fn test_eased_restart_from_current() {
        let now = Instant::now();
        let mut at = AnimatedTransform::new(Transform::IDENTITY);
        at.set_eased(
            Transform::new(0.0, 100.0, 0.0),
            now,
            MS_100,
            EasingFunction::Linear,
        );
        let _ = at.tick(now + MS_100 / 2);
        let midway = at.current();

        // Retargeting starts from the sampled transform, not the origin
        at.set_eased(Transform::IDENTITY, now, MS_100, EasingFunction::Linear);
        assert!(at.tick(now));
        assert_eq!(at.current(), midway);
    }
}
