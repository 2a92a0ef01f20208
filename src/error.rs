//! Detection failure taxonomy.
//!
//! Only *geometry failures* live here: a malformed region model or an
//! angle that falls through the segment table. These halt scoring and
//! surface to the caller. Heuristic rejections (oversize contour, bad
//! aspect ratio, tip off the board) are not errors; the pipeline models
//! them as `None`/early-return outcomes and logs them at info level.
use crate::board::RegionKind;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum DetectionError {
    /// A region mask has no set pixels where the pipeline requires some
    /// (e.g. the inner-bull mask used to locate the board center).
    EmptyRegion(RegionKind),
    /// Region masks disagree on dimensions.
    MaskSizeMismatch {
        region: RegionKind,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// The segment table does not cover the full circle.
    TableGap { at_deg: f32 },
    /// An angle matched no table entry. The table invariant makes this
    /// unreachable for a validated table; hitting it is a defect, never a
    /// silent zero score.
    NoSegmentForAngle { angle_deg: f32 },
}

impl fmt::Display for DetectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRegion(region) => {
                write!(f, "region mask {region:?} is empty")
            }
            Self::MaskSizeMismatch {
                region,
                expected,
                actual,
            } => write!(
                f,
                "region mask {region:?} is {}x{}, expected {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            Self::TableGap { at_deg } => {
                write!(f, "segment table has no entry covering {at_deg}°")
            }
            Self::NoSegmentForAngle { angle_deg } => {
                write!(f, "no segment matched angle {angle_deg}°")
            }
        }
    }
}

impl std::error::Error for DetectionError {}
