//! Snap transition curves

use crate::config::EasingType;

impl EasingType {
    /// Eased share of the transition at linear progress `t`
    ///
    /// `t` is clamped into [0, 1]. Every curve starts at 0 and lands exactly
    /// on 1, except `None`, which holds the start height until the end.
    pub fn ease(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingType::None => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            EasingType::Linear => t,
            EasingType::Cubic => power_out(t, 3),
            EasingType::Quintic => power_out(t, 5),
            EasingType::EaseOut if t >= 1.0 => 1.0,
            EasingType::EaseOut => 1.0 - 2.0_f64.powf(-10.0 * t),
        }
    }
}

#[inline]
fn power_out(t: f64, power: i32) -> f64 {
    1.0 - (1.0 - t).powi(power)
}
