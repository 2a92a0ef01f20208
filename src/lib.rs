#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod board;
pub mod config;
pub mod detector;
pub mod error;
pub mod image;
pub mod source;
pub mod types;

// “Expert” modules – still public, but considered unstable internals.
pub mod angle;
pub mod contour;
pub mod geometry;
pub mod motion;
pub mod score;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{DartDetector, DartParams};
pub use crate::error::DetectionError;
pub use crate::types::{DartEvent, FrameReport, FrameStatus, TurnState};

// Region model consumed from the calibration collaborator.
pub use crate::board::{BoardMasks, RegionKind, SegmentTable};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use dart_detector::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let (board, table) = unimplemented!();
/// let mut detector = DartDetector::new(board, table, DartParams::default());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::board::{BoardMasks, SegmentTable};
    pub use crate::source::{FrameSource, MemorySource};
    pub use crate::{DartDetector, DartEvent, DartParams, FrameReport};
}
