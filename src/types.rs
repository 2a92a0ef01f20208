//! Result types shared across the pipeline and the presentation boundary.
use crate::board::RegionKind;
use nalgebra::Point2;
use serde::Serialize;

/// Per-frame classification of the change-mask magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FrameStatus {
    /// Below the stable band; nothing happened.
    Stable,
    /// Dart-sized change; a scan window may open or continue.
    Candidate,
    /// In-flight object, not settled yet (scan-internal refinement).
    Motion,
    /// Large sustained change: a hand removing darts.
    Unplugging,
}

/// Turn machine state, mutated only at the frame boundaries of
/// `DartDetector::process_next`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TurnState {
    /// Accumulating warm-up frames before the reference snapshot exists.
    AwaitingReference,
    /// Normal per-frame classification and candidate scanning.
    Scanning,
    /// Suppressing detection until the frame matches the reference again.
    SkipUntilZeroDiff,
}

/// Axis-aligned bounding box in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BoundingBox {
    pub top_left: (i32, i32),
    pub bottom_right: (i32, i32),
}

impl BoundingBox {
    pub fn width(&self) -> i32 {
        self.bottom_right.0 - self.top_left.0
    }

    pub fn height(&self) -> i32 {
        self.bottom_right.1 - self.top_left.1
    }

    /// Width over height; the dart-silhouette plausibility gate.
    pub fn aspect_ratio(&self) -> f32 {
        let h = self.height();
        if h <= 0 {
            return f32::INFINITY;
        }
        self.width() as f32 / h as f32
    }
}

/// A successfully resolved dart: tip geometry plus the scored hit.
///
/// Immutable once created; one per detection event. `region` names the
/// winning ring mask so an overlay can render the hit area.
#[derive(Clone, Debug, Serialize)]
pub struct DartEvent {
    /// Frame index at which the dart was resolved as settled.
    pub frame_index: u64,
    /// Dart tip position.
    #[serde(serialize_with = "serialize_point")]
    pub tip: Point2<f32>,
    /// Auxiliary flight-end point for debug overlays.
    #[serde(serialize_with = "serialize_point")]
    pub flight_center: Point2<f32>,
    /// Bounding box of the merged silhouette.
    pub bounding_box: BoundingBox,
    /// Approach angle of the tip around the board center, degrees [0, 360).
    pub angle_deg: f32,
    /// Resolved score value (0 for a miss inside the board area).
    pub score: u16,
    /// Winning ring region, `None` for a miss.
    pub region: Option<RegionKind>,
    /// Base segment value from the angle table (1–20).
    pub segment: u16,
}

/// What `process_next` reports for every consumed frame.
#[derive(Clone, Debug, Serialize)]
pub struct FrameReport {
    pub frame_index: u64,
    pub status: FrameStatus,
    pub state: TurnState,
    /// Current turn scores, first empty slot filled first.
    pub scores: [Option<u16>; 3],
    /// Set when this frame's scan resolved a dart.
    pub event: Option<DartEvent>,
    /// True after a geometry failure, until `reset()`.
    pub halted: bool,
    /// Wall-clock cost of handling this frame (including any deep scan).
    pub latency_ms: f64,
}

fn serialize_point<S: serde::Serializer>(p: &Point2<f32>, s: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeTuple;
    let mut t = s.serialize_tuple(2)?;
    t.serialize_element(&p.x)?;
    t.serialize_element(&p.y)?;
    t.end()
}
