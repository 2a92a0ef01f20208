//! Background subtraction and change-magnitude classification.
//!
//! Two pieces:
//! - [`ChangeModel`] + [`RunningGaussian`]: a per-pixel running
//!   mean/variance background model. Each `apply` returns the binary
//!   foreground mask and folds the frame into the model with learning
//!   rate `1 / history`.
//! - [`MotionBands`] + [`classify`]/[`classify_scan`]: total, pure
//!   classification of a set-pixel count into frame statuses. The outer
//!   `classify` is the published contract; `classify_scan` adds the
//!   in-flight Motion refinement the deep scan checks first.
use crate::image::{BinaryMask, ImageF32};
use crate::types::FrameStatus;
use rayon::prelude::*;
use serde::Deserialize;

/// Seam between the turn machine and the subtraction backend so tests can
/// script change masks deterministically.
pub trait ChangeModel: Send {
    /// Subtract `frame` from the model, returning the foreground mask,
    /// and update the model with the frame.
    fn apply(&mut self, frame: &ImageF32) -> BinaryMask;

    /// Drop accumulated state (session reset / replay).
    fn reset(&mut self);
}

/// Running Gaussian background model.
///
/// Foreground test: squared distance from the per-pixel mean against
/// `var_threshold` times the per-pixel variance, the semantics of the
/// usual MOG-style subtractor with shadow detection off. Distances are in
/// 8-bit units so `var_threshold` keeps its conventional magnitude.
pub struct RunningGaussian {
    var_threshold: f32,
    alpha: f32,
    mean: Option<ImageF32>,
    var: Option<ImageF32>,
}

/// Variance floor keeping the foreground test meaningful on noise-free
/// synthetic input.
const MIN_VARIANCE: f32 = 4.0;
const INITIAL_VARIANCE: f32 = 15.0;

impl RunningGaussian {
    pub fn new(var_threshold: f32, history: u32) -> Self {
        Self {
            var_threshold,
            alpha: 1.0 / history.max(1) as f32,
            mean: None,
            var: None,
        }
    }
}

impl ChangeModel for RunningGaussian {
    fn apply(&mut self, frame: &ImageF32) -> BinaryMask {
        let (w, h) = (frame.w, frame.h);
        let stale = self
            .mean
            .as_ref()
            .map(|m| (m.w, m.h) != (w, h))
            .unwrap_or(true);
        if stale {
            self.mean = Some(frame.clone());
            let mut var = ImageF32::new(w, h);
            var.data.fill(INITIAL_VARIANCE);
            self.var = Some(var);
            return BinaryMask::new(w, h);
        }

        let mean = self.mean.as_mut().unwrap();
        let var = self.var.as_mut().unwrap();
        let alpha = self.alpha;
        let var_threshold = self.var_threshold;
        let mut fg = vec![0u8; w * h];

        fg.par_chunks_mut(w)
            .zip(mean.data.par_chunks_mut(w))
            .zip(var.data.par_chunks_mut(w))
            .zip(frame.data.par_chunks(w))
            .for_each(|(((fg_row, mean_row), var_row), frame_row)| {
                for x in 0..w {
                    let d = (frame_row[x] - mean_row[x]) * 255.0;
                    let d2 = d * d;
                    if d2 > var_threshold * var_row[x] {
                        fg_row[x] = 255;
                    }
                    mean_row[x] += alpha * (frame_row[x] - mean_row[x]);
                    var_row[x] = ((1.0 - alpha) * var_row[x] + alpha * d2).max(MIN_VARIANCE);
                }
            });

        BinaryMask::from_raw(w, h, fg)
    }

    fn reset(&mut self) {
        self.mean = None;
        self.var = None;
    }
}

/// Pixel-count band boundaries. Data-driven so they can be tuned per
/// camera and lighting setup.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct MotionBands {
    /// Counts below this are Stable.
    pub stable_max: usize,
    /// Upper bound (inclusive) of the Candidate band; above is Unplugging.
    pub candidate_max: usize,
    /// Lower bound of the scan-internal Motion sub-band.
    pub motion_min: usize,
    /// Counts at or below this mean the dart has settled (scan-internal).
    pub settled_max: usize,
}

impl Default for MotionBands {
    fn default() -> Self {
        Self {
            stable_max: 1_000,
            candidate_max: 30_000,
            motion_min: 10_000,
            settled_max: 50,
        }
    }
}

impl MotionBands {
    /// Outer classification contract: Stable / Candidate / Unplugging.
    pub fn classify(&self, count: usize) -> FrameStatus {
        if count < self.stable_max {
            FrameStatus::Stable
        } else if count <= self.candidate_max {
            FrameStatus::Candidate
        } else {
            FrameStatus::Unplugging
        }
    }

    /// Scan-internal refinement: the Motion sub-band takes precedence over
    /// Candidate (Unplugging > Motion > Candidate > Stable).
    pub fn classify_scan(&self, count: usize) -> FrameStatus {
        if count > self.candidate_max {
            FrameStatus::Unplugging
        } else if count >= self.motion_min {
            FrameStatus::Motion
        } else if count >= self.stable_max {
            FrameStatus::Candidate
        } else {
            FrameStatus::Stable
        }
    }

    /// Settling test used once a candidate mask has been promoted.
    pub fn is_settled(&self, count: usize) -> bool {
        count <= self.settled_max
    }

    /// Candidate-promotion test inside the scan (Motion band already
    /// peeled off by `classify_scan` precedence).
    pub fn is_candidate(&self, count: usize) -> bool {
        count >= self.stable_max && count <= self.candidate_max
    }
}
