use crate::animation::Easing;
use crate::config::{ClickTiming, MotionTuning, Sweep, VariantConfig};
use std::f32::consts::PI;

/// Peak opacity of the expanding feedback ring at the press frame.
const RING_PEAK_OPACITY: f32 = 0.85;

/// Visual state of the badge at one animation time step.
///
/// Every field is a pure function of the frame index and the variant's
/// timing tables; no frame depends on another frame's computed output.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FrameParams {
    /// Offset of the diagonal highlight band, in percent of the badge width.
    pub(crate) shimmer_pos: f32,
    /// Uniform badge scale; 1.0 at rest, compressed during the press.
    pub(crate) scale: f32,
    /// Pointer glyph offset from its resting anchor, in CSS pixels.
    pub(crate) hand_x: f32,
    pub(crate) hand_y: f32,
    pub(crate) hand_opacity: f32,
    /// Click feedback burst.
    pub(crate) spark_radius: f32,
    pub(crate) spark_opacity: f32,
    pub(crate) ring_radius: f32,
    pub(crate) ring_opacity: f32,
}

impl FrameParams {
    /// Custom-property assignments the badge stylesheet reads this state from.
    pub(crate) fn style_properties(&self) -> Vec<(&'static str, String)> {
        vec![
            ("--shimmer-pos", format!("{}%", self.shimmer_pos)),
            ("--badge-scale", self.scale.to_string()),
            ("--hand-x", format!("{}px", self.hand_x)),
            ("--hand-y", format!("{}px", self.hand_y)),
            ("--hand-opacity", self.hand_opacity.to_string()),
            ("--spark-radius", format!("{}px", self.spark_radius)),
            ("--spark-opacity", self.spark_opacity.to_string()),
            ("--ring-radius", format!("{}px", self.ring_radius)),
            ("--ring-opacity", self.ring_opacity.to_string()),
        ]
    }
}

/// Where a frame falls relative to the simulated click. Derived from the
/// frame index on every call, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Rest,
    /// Normalized progress through the lead-in window.
    Approach(f32),
    Hover,
    Click,
    /// Normalized progress through the rebound window.
    Release(f32),
    /// Normalized progress through the trailing window.
    Depart(f32),
}

/// Per-frame parameter generator for one variant's animation.
pub(crate) struct Timeline {
    sweep: Sweep,
    timing: ClickTiming,
    motion: MotionTuning,
}

impl Timeline {
    pub(crate) fn for_variant(variant: &VariantConfig) -> Self {
        Self { sweep: variant.sweep, timing: variant.timing, motion: variant.motion }
    }

    /// Compute the badge state for `frame` out of `total` frames.
    pub(crate) fn params_at(&self, frame: u32, total: u32) -> FrameParams {
        debug_assert!(total > 0);
        let m = &self.motion;

        let progress = frame as f32 / total as f32;
        let shimmer_pos = self.sweep.from + (self.sweep.to - self.sweep.from) * progress;

        // Resting state; the click phases overwrite what they animate.
        let mut params = FrameParams {
            shimmer_pos,
            scale: 1.0,
            hand_x: m.withdrawn.x,
            hand_y: m.withdrawn.y,
            hand_opacity: 0.0,
            spark_radius: 0.0,
            spark_opacity: 0.0,
            ring_radius: 0.0,
            ring_opacity: 0.0,
        };

        match self.phase_at(frame) {
            Phase::Rest => {}
            Phase::Approach(t) => {
                let eased = self.timing.approach_easing.apply(t);
                params.hand_x = lerp(m.withdrawn.x, m.hover.x, eased);
                params.hand_y = lerp(m.withdrawn.y, m.hover.y, eased);
                // Overshooting curves may leave [0, 1]; opacity must not.
                params.hand_opacity = eased.clamp(0.0, 1.0);
            }
            Phase::Hover => {
                params.hand_x = m.hover.x;
                params.hand_y = m.hover.y;
                params.hand_opacity = 1.0;
            }
            Phase::Click => {
                params.hand_x = m.pressed.x;
                params.hand_y = m.pressed.y;
                params.hand_opacity = 1.0;
                params.scale = 1.0 - m.press_depth;
                params.spark_radius = m.spark_radius;
                params.spark_opacity = 1.0;
                params.ring_radius = m.ring_radius;
                params.ring_opacity = RING_PEAK_OPACITY;
            }
            Phase::Release(t) => {
                // Pressed offsets decay back toward the hover pose.
                let settle = (1.0 - t).powi(2);
                params.hand_x = m.hover.x + (m.pressed.x - m.hover.x) * settle;
                params.hand_y = m.hover.y + (m.pressed.y - m.hover.y) * settle;
                params.hand_opacity = 1.0;
                // Compression recovers quadratically; the sine term lifts the
                // scale slightly above 1.0 mid-window and is 0 at both ends.
                params.scale =
                    1.0 - m.press_depth * settle + m.rebound_overshoot * (PI * t).sin() * t;
                // The burst keeps expanding while its opacity dies first.
                let grow = Easing::QuadOut.apply(t);
                params.spark_radius = m.spark_radius + m.spark_growth * grow;
                params.spark_opacity = (1.0 - t * m.spark_fade).max(0.0);
                params.ring_radius = m.ring_radius + m.ring_growth * grow;
                params.ring_opacity = (RING_PEAK_OPACITY * (1.0 - t * m.ring_fade)).max(0.0);
            }
            Phase::Depart(t) => {
                let eased = self.timing.approach_easing.mirrored().apply(t);
                params.hand_x = lerp(m.hover.x, m.withdrawn.x, eased);
                params.hand_y = lerp(m.hover.y, m.withdrawn.y, eased);
                params.hand_opacity = (1.0 - eased).clamp(0.0, 1.0);
            }
        }

        params
    }

    fn phase_at(&self, frame: u32) -> Phase {
        let t = &self.timing;
        let c = t.click_frame;
        let hover_start = c.saturating_sub(t.hover_frames);
        let approach_start = hover_start.saturating_sub(t.approach_frames);
        let release_end = c + t.release_frames;
        let depart_end = release_end + t.depart_frames;

        if frame == c {
            Phase::Click
        } else if frame < approach_start || frame > depart_end {
            Phase::Rest
        } else if frame < hover_start {
            // Progress hits 1.0 on the last lead-in frame so the hover
            // plateau continues exactly where the approach left off.
            let step = frame - approach_start + 1;
            Phase::Approach(step as f32 / t.approach_frames.max(1) as f32)
        } else if frame < c {
            Phase::Hover
        } else if frame <= release_end {
            Phase::Release((frame - c) as f32 / t.release_frames.max(1) as f32)
        } else {
            Phase::Depart((frame - release_end) as f32 / t.depart_frames.max(1) as f32)
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
