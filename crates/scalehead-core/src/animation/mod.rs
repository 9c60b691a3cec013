//! Snap transition animation
//!
//! - `easing` - easing curves (cubic, quintic, exponential)
//! - `timing` - progress and interpolation helpers
//! - `animator` - height animation controller combining both

pub mod animator;
pub mod easing;
pub mod timing;

pub use animator::HeightAnimator;
pub use crate::config::EasingType;
