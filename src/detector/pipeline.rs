//! Turn state machine driving detection end-to-end.
//!
//! [`DartDetector`] owns the session state: the background model, the
//! reference frame, the turn's three score slots and the skip flag raised
//! while darts are pulled from the board. One frame is fully processed
//! (classified, possibly triggering a bounded forward scan) before the
//! next is accepted; state changes only happen between frames, so the
//! caller may stop the loop at any frame boundary without corrupting the
//! turn.
//!
//! Typical usage:
//! ```no_run
//! use dart_detector::{DartDetector, DartParams};
//! use dart_detector::board::{BoardMasks, SegmentTable};
//! use dart_detector::source::FrameSource;
//!
//! # fn example(masks: BoardMasks, mut source: impl FrameSource) {
//! let mut detector = DartDetector::new(masks, SegmentTable::standard(), DartParams::default());
//! while let Some(report) = detector.process_next(&mut source).unwrap() {
//!     if let Some(event) = &report.event {
//!         println!("dart at {:.1}°: {}", event.angle_deg, event.score);
//!     }
//! }
//! # }
//! ```
use crate::board::{BoardMasks, SegmentTable};
use crate::error::DetectionError;
use crate::image::{absdiff_threshold, gaussian_blur, resize, ImageF32};
use crate::motion::{ChangeModel, RunningGaussian};
use crate::source::{Frame, FrameSource};
use crate::types::{FrameReport, FrameStatus, TurnState};
use log::{debug, info};
use std::time::Instant;

use super::params::DartParams;
use super::scanner::{scan_window, ScanOutcome};

/// Frame normalized for subtraction: grayscale floats, resized, blurred.
pub(crate) fn preprocess_for_scan(frame: &Frame, params: &DartParams) -> ImageF32 {
    let gray = ImageF32::from_u8(frame.gray.as_view());
    let scaled = resize(&gray, params.resize_scale);
    gaussian_blur(&scaled, params.gauss_kernel)
}

/// Frame normalized for the reference-diff test: full resolution.
fn preprocess_for_reference(frame: &Frame, params: &DartParams) -> ImageF32 {
    let gray = ImageF32::from_u8(frame.gray.as_view());
    gaussian_blur(&gray, params.gauss_kernel)
}

/// Detection and scoring engine for one camera session.
pub struct DartDetector {
    params: DartParams,
    board: BoardMasks,
    table: SegmentTable,
    model: Box<dyn ChangeModel>,
    state: TurnState,
    reference: Option<ImageF32>,
    scores: [Option<u16>; 3],
    halted: bool,
    /// Frames consumed since construction or the last reset; warm-up is
    /// measured against this, not the stream index, so a mid-stream reset
    /// on a live feed repeats the full warm-up.
    frames_seen: u64,
}

impl DartDetector {
    /// Create a detector with the default running-Gaussian background
    /// model. Masks and table are taken by value; they stay immutable for
    /// the session.
    pub fn new(board: BoardMasks, table: SegmentTable, params: DartParams) -> Self {
        let model = Box::new(RunningGaussian::new(
            params.subtractor.var_threshold,
            params.subtractor.history,
        ));
        Self::with_change_model(board, table, params, model)
    }

    /// Create with a caller-supplied change model (tests script one).
    pub fn with_change_model(
        board: BoardMasks,
        table: SegmentTable,
        params: DartParams,
        model: Box<dyn ChangeModel>,
    ) -> Self {
        Self {
            params,
            board,
            table,
            model,
            state: TurnState::AwaitingReference,
            reference: None,
            scores: [None; 3],
            halted: false,
            frames_seen: 0,
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Current turn scores, first empty slot filled first.
    pub fn scores(&self) -> [Option<u16>; 3] {
        self.scores
    }

    /// True after a geometry failure; no scoring happens until `reset`.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn board(&self) -> &BoardMasks {
        &self.board
    }

    pub fn table(&self) -> &SegmentTable {
        &self.table
    }

    /// Replay/reset: clear scores, drop the reference and the background
    /// history, return to `AwaitingReference`.
    pub fn reset(&mut self) {
        info!("detector: reset");
        self.scores = [None; 3];
        self.reference = None;
        self.state = TurnState::AwaitingReference;
        self.halted = false;
        self.frames_seen = 0;
        self.model.reset();
    }

    /// Consume one frame from `source`, possibly scanning forward through
    /// a one-second window. `Ok(None)` when the stream ended.
    ///
    /// A geometry failure (malformed region model) propagates as `Err`
    /// and halts scoring until `reset`; heuristic rejections never do.
    pub fn process_next(
        &mut self,
        source: &mut dyn FrameSource,
    ) -> Result<Option<FrameReport>, DetectionError> {
        let Some(frame) = source.next_frame() else {
            return Ok(None);
        };
        let start = Instant::now();
        let frame_index = frame.index;
        self.frames_seen += 1;

        // the background model sees every frame, whatever the state
        let scan_view = preprocess_for_scan(&frame, &self.params);
        let mask = self.model.apply(&scan_view);
        let count = mask.count_nonzero();
        let status = self.params.bands.classify(count);

        let mut event = None;
        if !self.halted {
            match self.state {
                TurnState::AwaitingReference => {
                    if self.frames_seen >= self.params.warm_up_frames {
                        self.reference = Some(preprocess_for_reference(&frame, &self.params));
                        self.state = TurnState::Scanning;
                        debug!("detector: reference captured at frame {frame_index}");
                    }
                }
                TurnState::Scanning => match status {
                    FrameStatus::Candidate => {
                        event = self.deep_scan(source, frame_index, mask)?;
                    }
                    FrameStatus::Unplugging => {
                        info!("detector: frame {frame_index} unplugging (diff={count})");
                        self.state = TurnState::SkipUntilZeroDiff;
                    }
                    _ => {}
                },
                TurnState::SkipUntilZeroDiff => {
                    // only consult the reference once the subtractor calms down
                    if count == 0 && self.matches_reference(&frame) {
                        info!("detector: board back to reference; new turn");
                        self.scores = [None; 3];
                        self.state = TurnState::Scanning;
                    }
                }
            }
        }

        Ok(Some(FrameReport {
            frame_index,
            status,
            state: self.state,
            scores: self.scores,
            event,
            halted: self.halted,
            latency_ms: start.elapsed().as_secs_f64() * 1000.0,
        }))
    }

    fn deep_scan(
        &mut self,
        source: &mut dyn FrameSource,
        frame_index: u64,
        trigger: crate::image::BinaryMask,
    ) -> Result<Option<crate::types::DartEvent>, DetectionError> {
        let window = source.fps().round().max(1.0) as u64;
        let start_index = frame_index + 1;
        let end_index = match source.total_frames() {
            Some(total) => (start_index + window).min(total),
            None => start_index + window,
        };
        debug!("detector: deep scan frames {start_index}..{end_index}");

        let outcome = scan_window(
            source,
            self.model.as_mut(),
            &self.board,
            &self.table,
            &self.params,
            start_index,
            end_index,
            trigger,
        );
        match outcome {
            Ok(ScanOutcome::Event(event)) => {
                self.record_score(event.score);
                Ok(Some(event))
            }
            Ok(ScanOutcome::Unplugged) => {
                self.state = TurnState::SkipUntilZeroDiff;
                Ok(None)
            }
            Ok(ScanOutcome::NoEvent) => Ok(None),
            Err(err) => {
                // malformed region model: stop scoring until reset
                self.halted = true;
                Err(err)
            }
        }
    }

    fn record_score(&mut self, value: u16) {
        if let Some(slot) = self.scores.iter_mut().find(|s| s.is_none()) {
            *slot = Some(value);
        } else {
            // all three slots taken: a turn that was never cleared keeps
            // overwriting the last slot
            self.scores[2] = Some(value);
        }
    }

    fn matches_reference(&self, frame: &Frame) -> bool {
        let Some(reference) = self.reference.as_ref() else {
            return false;
        };
        let view = preprocess_for_reference(frame, &self.params);
        if (view.w, view.h) != (reference.w, reference.h) {
            return false;
        }
        let diff = absdiff_threshold(reference, &view, self.params.zero_diff_threshold / 255.0);
        diff.count_nonzero() == 0
    }
}
