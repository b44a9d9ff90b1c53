//! Per-item transform state: scale plus translation.

/// Scale/translation pair applied to an item's surface.
///
/// Pure data; the renderer only reads committed values between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Horizontal translation in pixels.
    pub translation_x: f64,
    /// Vertical translation in pixels.
    pub translation_y: f64,
}

impl Transform {
    /// No scaling, no translation.
    pub const IDENTITY: Transform = Transform {
        scale_x: 1.0,
        scale_y: 1.0,
        translation_x: 0.0,
        translation_y: 0.0,
    };

    /// Uniform scale with a translation.
    #[must_use]
    pub fn new(scale: f64, translation_x: f64, translation_y: f64) -> Self {
        Self {
            scale_x: scale,
            scale_y: scale,
            translation_x,
            translation_y,
        }
    }

    /// Componentwise linear interpolation between two transforms.
    #[must_use]
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        let mix = |from: f64, to: f64| from + (to - from) * t;
        Self {
            scale_x: mix(a.scale_x, b.scale_x),
            scale_y: mix(a.scale_y, b.scale_y),
            translation_x: mix(a.translation_x, b.translation_x),
            translation_y: mix(a.translation_y, b.translation_y),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let t = Transform::IDENTITY;
        assert_eq!(t.scale_x, 1.0);
        assert_eq!(t.scale_y, 1.0);
        assert_eq!(t.translation_x, 0.0);
        assert_eq!(t.translation_y, 0.0);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Transform::IDENTITY;
        let b = Transform::new(0.5, 100.0, -40.0);
        assert_eq!(Transform::lerp(a, b, 0.0), a);
        assert_eq!(Transform::lerp(a, b, 1.0), b);
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = Transform::new(1.0, 0.0, 0.0);
        let b = Transform::new(0.5, 100.0, 50.0);
        let mid = Transform::lerp(a, b, 0.5);
        assert_eq!(mid.scale_x, 0.75);
        assert_eq!(mid.translation_x, 50.0);
        assert_eq!(mid.translation_y, 25.0);
    }
}
