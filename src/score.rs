//! Segment scoring: angle table lookup plus ring-mask precedence.
use crate::board::{BoardMasks, RegionKind, SegmentTable};
use crate::error::DetectionError;
use log::debug;
use nalgebra::Point2;

/// A resolved hit: numeric value plus the winning region for overlays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredHit {
    /// Final score (segment × multiplier, 50/25 for bulls, 0 for a miss).
    pub value: u16,
    /// Winning ring mask; `None` when nothing matched (Miss).
    pub region: Option<RegionKind>,
    /// Base segment value from the angle table.
    pub segment: u16,
}

/// Score a tip position against a precomputed approach angle.
///
/// `Ok(None)` means the tip fell outside the dartboard mask — an expected
/// rejection, not an error. A table lookup miss is a geometry failure and
/// propagates; the table invariant guarantees it cannot happen for a
/// validated table.
///
/// Ring precedence is fixed: inner bull, outer bull, triple, double,
/// single, miss. The masks may overlap at ring boundaries; first match
/// wins.
pub fn score_tip(
    board: &BoardMasks,
    table: &SegmentTable,
    tip: Point2<f32>,
    angle_deg: f32,
) -> Result<Option<ScoredHit>, DetectionError> {
    let (px, py) = (tip.x.round() as i64, tip.y.round() as i64);
    if px < 0 || py < 0 {
        return Ok(None);
    }
    let (px, py) = (px as usize, py as usize);
    if !board.dartboard.contains(px, py) {
        return Ok(None);
    }

    let segment = table.lookup(angle_deg)?;
    debug!("score: tip=({px},{py}) angle={angle_deg:.2} segment={segment}");

    let hit = if board.inner_bull.contains(px, py) {
        ScoredHit {
            value: 50,
            region: Some(RegionKind::InnerBull),
            segment,
        }
    } else if board.outer_bull.contains(px, py) {
        ScoredHit {
            value: 25,
            region: Some(RegionKind::OuterBull),
            segment,
        }
    } else if board.triple.contains(px, py) {
        ScoredHit {
            value: segment * 3,
            region: Some(RegionKind::Triple),
            segment,
        }
    } else if board.double.contains(px, py) {
        ScoredHit {
            value: segment * 2,
            region: Some(RegionKind::Double),
            segment,
        }
    } else if board.single.contains(px, py) {
        ScoredHit {
            value: segment,
            region: Some(RegionKind::Single),
            segment,
        }
    } else {
        ScoredHit {
            value: 0,
            region: None,
            segment,
        }
    };
    Ok(Some(hit))
}
