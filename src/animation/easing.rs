use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Easing curve applied to normalized animation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Easing {
    /// Constant speed.
    Linear,
    /// Quadratic, slow start.
    QuadIn,
    /// Quadratic, slow end.
    QuadOut,
    /// Cubic, slow start.
    CubicIn,
    /// Cubic, slow end.
    CubicOut,
    /// Sine-based, slow at both ends.
    SineInOut,
    /// Overshoot past the target and settle back.
    BackOut,
}

impl Easing {
    /// Apply the curve to normalized time (0.0 to 1.0).
    pub(crate) fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::BackOut => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
            }
        }
    }

    /// Curve used when this motion plays backwards. In/out pairs swap;
    /// symmetric curves are their own mirror.
    pub(crate) fn mirrored(&self) -> Easing {
        match self {
            Easing::QuadIn => Easing::QuadOut,
            Easing::QuadOut => Easing::QuadIn,
            Easing::CubicIn => Easing::CubicOut,
            Easing::CubicOut => Easing::CubicIn,
            other => *other,
        }
    }
}
