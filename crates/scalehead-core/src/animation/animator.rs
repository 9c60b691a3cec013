//! Header height animation controller

use std::time::{Duration, Instant};

use super::timing::{is_complete, lerp, progress};
use crate::config::{AnimationConfig, EasingType};

#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
}

/// Eases the header height toward a snap target
///
/// Call `animate_to()` to begin a transition, then `update()` each frame to
/// advance it. With animation disabled the height jumps to the target.
#[derive(Debug, Clone)]
pub struct HeightAnimator {
    animation: Option<ActiveAnimation>,
    config: AnimationConfig,
    height: f64,
}

impl HeightAnimator {
    pub fn new(config: AnimationConfig, height: f64) -> Self {
        Self {
            animation: None,
            config,
            height,
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    #[inline]
    pub fn is_smooth(&self) -> bool {
        self.config.enabled && self.config.duration_ms > 0
    }

    /// Current interpolated height
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Final height once the running animation completes
    pub fn target(&self) -> f64 {
        self.animation.as_ref().map(|a| a.to).unwrap_or(self.height)
    }

    /// Set the height immediately, cancelling any animation
    pub fn set_height(&mut self, height: f64) {
        self.animation = None;
        self.height = height;
    }

    /// Start a transition from the current height to `target`
    pub fn animate_to(&mut self, target: f64, now: Instant) {
        if !self.is_smooth() {
            self.set_height(target);
            return;
        }

        if (self.height - target).abs() < f64::EPSILON {
            self.set_height(target);
            return;
        }

        self.animation = Some(ActiveAnimation {
            start: now,
            from: self.height,
            to: target,
            duration: Duration::from_millis(self.config.duration_ms),
            easing: self.config.easing,
        });
    }

    /// Advance the animation to `now` and return the current height
    pub fn update(&mut self, now: Instant) -> f64 {
        if let Some(ref anim) = self.animation {
            if is_complete(anim.start, anim.duration, now) {
                self.height = anim.to;
                self.animation = None;
            } else {
                let t = anim.easing.ease(progress(anim.start, anim.duration, now));
                self.height = lerp(anim.from, anim.to, t);
            }
        }
        self.height
    }

    /// Stop at the current interpolated height
    pub fn cancel(&mut self) {
        self.animation = None;
    }
}
