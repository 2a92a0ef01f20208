//! Parameter types configuring the detection pipeline.
//!
//! Everything the heuristics depend on is a field here, not a literal in
//! the code: band boundaries, subtractor settings, morphology iteration
//! counts, contour gates, the resize/blur normalization and the warm-up
//! length. Defaults reproduce the tuning of the reference capture setup;
//! per-camera tuning loads overrides from JSON (see `config`).
use crate::contour::{ContourGates, MorphologyParams};
use crate::motion::MotionBands;
use serde::Deserialize;

/// Background-subtractor settings.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct SubtractorParams {
    /// Squared-distance threshold of the foreground test, in 8-bit units.
    pub var_threshold: f32,
    /// Frames of history; the learning rate is its reciprocal.
    pub history: u32,
}

impl Default for SubtractorParams {
    fn default() -> Self {
        Self {
            var_threshold: 16.0,
            history: 30,
        }
    }
}

/// Detector-wide parameters.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DartParams {
    pub subtractor: SubtractorParams,
    pub bands: MotionBands,
    pub morphology: MorphologyParams,
    pub gates: ContourGates,
    /// Uniform scale applied to frames before subtraction. Region masks
    /// are expected at the scaled resolution.
    pub resize_scale: f32,
    /// Odd Gaussian kernel size for frame normalization.
    pub gauss_kernel: usize,
    /// Frames consumed before the reference snapshot is captured.
    pub warm_up_frames: u64,
    /// Absdiff threshold (8-bit units) of the reference zero-diff test.
    pub zero_diff_threshold: f32,
}

impl Default for DartParams {
    fn default() -> Self {
        Self {
            subtractor: SubtractorParams::default(),
            bands: MotionBands::default(),
            morphology: MorphologyParams::default(),
            gates: ContourGates::default(),
            resize_scale: 1.0,
            gauss_kernel: 11,
            warm_up_frames: 30,
            zero_diff_threshold: 50.0,
        }
    }
}
