use crate::animation::Easing;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum::IntoEnumIterator;

/// Color theme substituted into the badge markup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Palette {
    pub(crate) background: String,
    pub(crate) background_mid: String,
    pub(crate) text: String,
    pub(crate) shimmer: String,
}

/// Shimmer sweep bounds, in percent of the badge width.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct Sweep {
    pub(crate) from: f32,
    pub(crate) to: f32,
}

/// Frame-index boundaries of the simulated click.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct ClickTiming {
    /// Frame the press lands on.
    pub(crate) click_frame: u32,
    pub(crate) approach_frames: u32,
    pub(crate) hover_frames: u32,
    /// Rebound window after the press.
    pub(crate) release_frames: u32,
    pub(crate) depart_frames: u32,
    pub(crate) approach_easing: Easing,
}

/// Pointer glyph offset relative to its resting anchor, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct HandPose {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

/// Tuning constants for the press, rebound, and click feedback motion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct MotionTuning {
    pub(crate) withdrawn: HandPose,
    pub(crate) hover: HandPose,
    pub(crate) pressed: HandPose,
    /// How far below 1.0 the badge compresses at the press.
    pub(crate) press_depth: f32,
    /// Peak of the post-release bounce above 1.0.
    pub(crate) rebound_overshoot: f32,
    /// Initial spark radius at the press frame, and how far it expands
    /// over the rebound window.
    pub(crate) spark_radius: f32,
    pub(crate) spark_growth: f32,
    /// Opacity decay rate relative to the window; above 1.0 the spark is
    /// gone before the window ends.
    pub(crate) spark_fade: f32,
    pub(crate) ring_radius: f32,
    pub(crate) ring_growth: f32,
    pub(crate) ring_fade: f32,
}

/// Rendering surface geometry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct ViewportConfig {
    pub(crate) width: u32,
    pub(crate) height: u32,
    /// Device pixel ratio the page is rendered at.
    pub(crate) scale_factor: f64,
    /// Padding around the badge bounds in the captured clip, in CSS pixels.
    pub(crate) padding: u32,
}

/// Everything needed to generate one badge animation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct VariantConfig {
    pub(crate) name: String,
    /// Text rendered inside the badge.
    pub(crate) label: String,
    pub(crate) palette: Palette,
    pub(crate) viewport: ViewportConfig,
    pub(crate) sweep: Sweep,
    pub(crate) timing: ClickTiming,
    pub(crate) motion: MotionTuning,
    pub(crate) frame_count: u32,
    pub(crate) delay_ms: u32,
}

/// Errors raised while loading a variant definition file.
#[derive(thiserror::Error, Debug)]
pub(crate) enum ConfigError {
    #[error("failed to read variant file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid variant file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("variant '{0}' has a frame count of zero")]
    EmptyAnimation(String),
}

/// Built-in color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum VariantKind {
    Green,
    Neon,
}

impl VariantKind {
    fn palette(&self) -> Palette {
        match self {
            // Dark badge with a teal shimmer band.
            VariantKind::Green => Palette {
                background: "#005454".into(),
                background_mid: "#006b6b".into(),
                text: "#ffffff".into(),
                shimmer: "rgba(0,227,169,0.4)".into(),
            },
            // Bright badge with a white shimmer band.
            VariantKind::Neon => Palette {
                background: "#00E3A9".into(),
                background_mid: "#00b88a".into(),
                text: "#005454".into(),
                shimmer: "rgba(255,255,255,0.5)".into(),
            },
        }
    }

    // The observed tuning differs between the two themes on purpose; there
    // is no canonical animation to normalize them against.
    fn sweep(&self) -> Sweep {
        match self {
            VariantKind::Green => Sweep { from: -100.0, to: 100.0 },
            VariantKind::Neon => Sweep { from: -150.0, to: 150.0 },
        }
    }

    fn timing(&self) -> ClickTiming {
        match self {
            VariantKind::Green => ClickTiming {
                click_frame: 40,
                approach_frames: 8,
                hover_frames: 2,
                release_frames: 10,
                depart_frames: 8,
                approach_easing: Easing::CubicOut,
            },
            VariantKind::Neon => ClickTiming {
                click_frame: 36,
                approach_frames: 10,
                hover_frames: 3,
                release_frames: 12,
                depart_frames: 10,
                approach_easing: Easing::QuadIn,
            },
        }
    }

    fn motion(&self) -> MotionTuning {
        let shared = MotionTuning {
            withdrawn: HandPose { x: 46.0, y: 60.0 },
            hover: HandPose { x: 10.0, y: 12.0 },
            pressed: HandPose { x: 4.0, y: 5.0 },
            press_depth: 0.03,
            rebound_overshoot: 0.004,
            spark_radius: 6.0,
            spark_growth: 22.0,
            spark_fade: 1.25,
            ring_radius: 10.0,
            ring_growth: 34.0,
            ring_fade: 1.5,
        };
        match self {
            VariantKind::Green => shared,
            VariantKind::Neon => MotionTuning {
                press_depth: 0.04,
                rebound_overshoot: 0.006,
                spark_growth: 28.0,
                ring_growth: 40.0,
                ..shared
            },
        }
    }

    fn build(self) -> VariantConfig {
        VariantConfig {
            name: self.to_string(),
            label: "Capability".into(),
            palette: self.palette(),
            viewport: ViewportConfig { width: 400, height: 150, scale_factor: 2.0, padding: 8 },
            sweep: self.sweep(),
            timing: self.timing(),
            motion: self.motion(),
            frame_count: 60,
            delay_ms: 50,
        }
    }
}

/// The variant set generated when no definition file is given.
pub(crate) fn builtin_variants() -> Vec<VariantConfig> {
    VariantKind::iter().map(VariantKind::build).collect()
}

/// Load a variant set from a YAML definition file.
pub(crate) fn load_variant_file(path: &Path) -> Result<Vec<VariantConfig>, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let variants: Vec<VariantConfig> = serde_yaml::from_str(&contents)?;
    if let Some(empty) = variants.iter().find(|v| v.frame_count == 0) {
        return Err(ConfigError::EmptyAnimation(empty.name.clone()));
    }
    Ok(variants)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_variants() {
        let variants = builtin_variants();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].name, "green");
        assert_eq!(variants[1].name, "neon");
        for variant in &variants {
            assert!(variant.frame_count > 0);
            assert!(variant.timing.click_frame < variant.frame_count);
            let cycle = variant.timing.click_frame
                + variant.timing.release_frames
                + variant.timing.depart_frames;
            assert!(cycle < variant.frame_count, "{} click overruns the animation", variant.name);
        }
    }

    #[test]
    fn test_builtin_palettes_differ() {
        let variants = builtin_variants();
        assert_ne!(variants[0].palette.background, variants[1].palette.background);
        assert_ne!(variants[0].palette.text, variants[1].palette.text);
    }

    #[test]
    fn test_variant_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("variants.yaml");
        let serialized = serde_yaml::to_string(&builtin_variants()).expect("serialize");
        fs::write(&path, serialized).expect("write");

        let loaded = load_variant_file(&path).expect("load");
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].name, "green");
        assert_eq!(loaded[1].sweep.to, 150.0);
    }

    #[test]
    fn test_variant_file_rejects_zero_frames() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("variants.yaml");
        let mut variants = builtin_variants();
        variants[0].frame_count = 0;
        fs::write(&path, serde_yaml::to_string(&variants).expect("serialize")).expect("write");

        let err = load_variant_file(&path).expect_err("zero frame count accepted");
        assert!(matches!(err, ConfigError::EmptyAnimation(name) if name == "green"));
    }

    #[test]
    fn test_missing_variant_file() {
        let err = load_variant_file(Path::new("/nonexistent/variants.yaml"))
            .expect_err("missing file accepted");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
