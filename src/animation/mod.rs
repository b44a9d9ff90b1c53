//! Animation system for transform transitions.
//!
//! Transforms either snap to their targets (while input is held or
//! momentum is live) or advance along an eased timeline after release.

pub mod driver;
pub mod easing;
pub mod transform;

pub use driver::{AnimatedTransform, TransformAnimation};
pub use easing::EasingFunction;
pub use transform::Transform;
