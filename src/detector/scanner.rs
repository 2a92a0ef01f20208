//! Bounded forward scan for the frame where a thrown dart sits at rest.
//!
//! A dart strike is a brief motion spike followed by a stable silhouette.
//! Scoring the impact frame would measure a still-vibrating dart, so the
//! scanner walks forward through up to one second of frames, tracking the
//! most recent dart-sized change mask (the candidate) and resolving it
//! once the per-frame magnitude collapses into the settled band.
use crate::angle::tip_angle;
use crate::board::{BoardMasks, SegmentTable};
use crate::contour;
use crate::error::DetectionError;
use crate::geometry::extract_tip;
use crate::image::BinaryMask;
use crate::motion::ChangeModel;
use crate::score::score_tip;
use crate::source::FrameSource;
use crate::types::{DartEvent, FrameStatus};
use log::{debug, info};

use super::params::DartParams;
use super::pipeline::preprocess_for_scan;

/// How a scan window ended.
#[derive(Debug)]
pub(crate) enum ScanOutcome {
    /// A dart settled and scored.
    Event(DartEvent),
    /// Sustained large change: darts being removed. The caller must stop
    /// scanning until the reference-diff test passes again.
    Unplugged,
    /// Window exhausted, rejected mid-resolution, or source ended.
    NoEvent,
}

/// Scan frames `start_index..end_index` looking for a settled dart.
///
/// `trigger` is the change mask that opened the window; it starts as the
/// promoted candidate so a dart already at rest on the trigger frame
/// resolves on the first settled frame. Later qualifying masks replace it.
///
/// Consumes exactly the frames inside the window from `source` and feeds
/// them through `model`; the frame after the window stays unread so the
/// turn machine classifies it. The caller's background state advances
/// with the scan, exactly as a shared subtractor would.
pub(crate) fn scan_window(
    source: &mut dyn FrameSource,
    model: &mut dyn ChangeModel,
    board: &BoardMasks,
    table: &SegmentTable,
    params: &DartParams,
    start_index: u64,
    end_index: u64,
    trigger: BinaryMask,
) -> Result<ScanOutcome, DetectionError> {
    let mut candidate: Option<BinaryMask> = Some(trigger);
    let mut next_index = start_index;

    while next_index < end_index {
        let Some(frame) = source.next_frame() else {
            // stream exhaustion clamps the window: no event, not a fault
            return Ok(ScanOutcome::NoEvent);
        };
        next_index = frame.index + 1;
        let scan_view = preprocess_for_scan(&frame, params);
        let mask = model.apply(&scan_view);
        let count = mask.count_nonzero();

        match params.bands.classify_scan(count) {
            FrameStatus::Motion => {
                debug!("scan: frame {} in motion (diff={count}); ignored", frame.index);
                continue;
            }
            FrameStatus::Unplugging => {
                info!("scan: frame {} looks like unplugging darts (diff={count})", frame.index);
                return Ok(ScanOutcome::Unplugged);
            }
            _ => {}
        }

        if let Some(candidate_mask) = candidate.as_ref() {
            if params.bands.is_settled(count) {
                return resolve_candidate(candidate_mask, frame.index, board, table, params);
            }
        }

        // most recent qualifying mask wins; earlier candidates are dropped
        if params.bands.is_candidate(count) {
            debug!("scan: frame {} promoted as candidate (diff={count})", frame.index);
            candidate = Some(mask);
        }
    }

    // window exhausted without settling
    Ok(ScanOutcome::NoEvent)
}

fn resolve_candidate(
    mask: &BinaryMask,
    frame_index: u64,
    board: &BoardMasks,
    table: &SegmentTable,
    params: &DartParams,
) -> Result<ScanOutcome, DetectionError> {
    let dart = match contour::resolve(mask, &params.morphology, &params.gates) {
        Ok(dart) => dart,
        Err(rejection) => {
            info!("scan: frame {frame_index} candidate rejected: {rejection:?}");
            return Ok(ScanOutcome::NoEvent);
        }
    };
    debug!(
        "scan: frame {frame_index} dart silhouette area={} aspect={:.3}",
        dart.area,
        dart.bounding_box.aspect_ratio()
    );

    let Some(geometry) = extract_tip(&dart) else {
        info!("scan: frame {frame_index} degenerate hull; rejected");
        return Ok(ScanOutcome::NoEvent);
    };

    let angle_deg = tip_angle(board.bull_center(), geometry.tip);
    let Some(hit) = score_tip(board, table, geometry.tip, angle_deg)? else {
        info!("scan: frame {frame_index} tip outside dartboard mask; ignored");
        return Ok(ScanOutcome::NoEvent);
    };

    debug!(
        "scan: frame {frame_index} tip angle {angle_deg:.2} scored {}",
        hit.value
    );
    Ok(ScanOutcome::Event(DartEvent {
        frame_index,
        tip: geometry.tip,
        flight_center: geometry.flight_center,
        bounding_box: geometry.bounding_box,
        angle_deg,
        score: hit.value,
        region: hit.region,
        segment: hit.segment,
    }))
}
