// extensions/easing.rs
//
// Easing curves used by hover and reveal transitions.
// Pure math, no knowledge of nodes or scenes.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Easing curve applied to normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity.
    Linear,
    /// Slow end. Default for reveals.
    #[default]
    QuadOut,
    /// Stronger slow end.
    CubicOut,
    /// Smooth at both ends.
    SineInOut,
    /// Overshoots the target, then settles. Used for hover scaling.
    BackOut,
    /// Fast start with exponential settle.
    ExpoOut,
}

impl Easing {
    /// Apply the curve to `t` in [0, 1]. Out-of-range input is clamped.
    /// BackOut exceeds 1.0 in the middle of its range.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::BackOut => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
            Easing::ExpoOut => {
                if t == 1.0 { 1.0 } else { 1.0 - 2.0_f32.powf(-10.0 * t) }
            }
        }
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}
