//! Region Model: calibrated board masks and the segment angle table.
//!
//! Both are produced by the (external) calibration wizard and stay
//! immutable for the lifetime of a scoring session. The detector receives
//! them by value at construction; nothing here is global state.
use crate::error::DetectionError;
use crate::image::BinaryMask;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Named board regions, in scoring precedence order.
///
/// Later-listed masks are not guaranteed disjoint from earlier ones at
/// ring boundaries; the scorer resolves overlap by first match in this
/// order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionKind {
    Dartboard,
    InnerBull,
    OuterBull,
    Triple,
    Double,
    Single,
}

/// Binary masks for every named region, validated at construction.
#[derive(Clone, Debug)]
pub struct BoardMasks {
    pub dartboard: BinaryMask,
    pub inner_bull: BinaryMask,
    pub outer_bull: BinaryMask,
    pub triple: BinaryMask,
    pub double: BinaryMask,
    pub single: BinaryMask,
    bull_center: Point2<f32>,
}

impl BoardMasks {
    /// Validates dimensions agree and the inner bull is non-empty, then
    /// fixes the angular reference center (inner-bull centroid) for the
    /// session.
    pub fn new(
        dartboard: BinaryMask,
        inner_bull: BinaryMask,
        outer_bull: BinaryMask,
        triple: BinaryMask,
        double: BinaryMask,
        single: BinaryMask,
    ) -> Result<Self, DetectionError> {
        let expected = (dartboard.w, dartboard.h);
        for (region, mask) in [
            (RegionKind::InnerBull, &inner_bull),
            (RegionKind::OuterBull, &outer_bull),
            (RegionKind::Triple, &triple),
            (RegionKind::Double, &double),
            (RegionKind::Single, &single),
        ] {
            let actual = (mask.w, mask.h);
            if actual != expected {
                return Err(DetectionError::MaskSizeMismatch {
                    region,
                    expected,
                    actual,
                });
            }
        }
        let bull_center = inner_bull
            .centroid()
            .map(|(x, y)| Point2::new(x, y))
            .ok_or(DetectionError::EmptyRegion(RegionKind::InnerBull))?;
        Ok(Self {
            dartboard,
            inner_bull,
            outer_bull,
            triple,
            double,
            single,
            bull_center,
        })
    }

    /// The angular reference center: centroid of the inner-bull mask.
    pub fn bull_center(&self) -> Point2<f32> {
        self.bull_center
    }

    /// Mask lookup by region, e.g. for overlay rendering of a hit.
    pub fn mask(&self, region: RegionKind) -> &BinaryMask {
        match region {
            RegionKind::Dartboard => &self.dartboard,
            RegionKind::InnerBull => &self.inner_bull,
            RegionKind::OuterBull => &self.outer_bull,
            RegionKind::Triple => &self.triple,
            RegionKind::Double => &self.double,
            RegionKind::Single => &self.single,
        }
    }
}

/// One angular interval mapping to a base segment value.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SegmentRange {
    pub min_deg: f32,
    pub max_deg: f32,
    pub value: u16,
}

/// Ordered angle-range table covering [0, 360) without gaps.
///
/// Boundary ties resolve to the first matching entry in table order, so
/// lookups are total and deterministic over the covered circle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SegmentTable {
    entries: Vec<SegmentRange>,
}

impl SegmentTable {
    /// Validates full-circle coverage. Entries are kept in the given
    /// order; coverage is checked on a sorted copy.
    pub fn new(entries: Vec<SegmentRange>) -> Result<Self, DetectionError> {
        let mut sorted = entries.clone();
        sorted.sort_by(|a, b| a.min_deg.total_cmp(&b.min_deg));
        let mut covered = 0.0f32;
        for e in &sorted {
            if e.min_deg > covered + 1e-3 {
                return Err(DetectionError::TableGap { at_deg: covered });
            }
            covered = covered.max(e.max_deg);
        }
        if covered < 360.0 - 1e-3 {
            return Err(DetectionError::TableGap { at_deg: covered });
        }
        Ok(Self { entries })
    }

    /// Standard dartboard layout: 20 at the top, wedges of 18°, starting
    /// with the 20/1 boundary at 81° counter-clockwise from the x axis.
    pub fn standard() -> Self {
        const VALUES: [u16; 20] = [
            20, 5, 12, 9, 14, 11, 8, 16, 7, 19, 3, 17, 2, 15, 10, 6, 13, 4, 18, 1,
        ];
        let mut entries = Vec::with_capacity(21);
        // wedge k spans [81 + 18k, 99 + 18k) going counter-clockwise from 20
        for (k, &value) in VALUES.iter().enumerate() {
            let min = (81.0 + 18.0 * k as f32) % 360.0;
            let max = min + 18.0;
            if max <= 360.0 {
                entries.push(SegmentRange {
                    min_deg: min,
                    max_deg: max,
                    value,
                });
            } else {
                // the wedge wrapping 0° splits into two ranges
                entries.push(SegmentRange {
                    min_deg: min,
                    max_deg: 360.0,
                    value,
                });
                entries.push(SegmentRange {
                    min_deg: 0.0,
                    max_deg: max - 360.0,
                    value,
                });
            }
        }
        Self { entries }
    }

    /// First entry whose inclusive bounds contain `angle_deg`.
    pub fn lookup(&self, angle_deg: f32) -> Result<u16, DetectionError> {
        self.entries
            .iter()
            .find(|e| angle_deg >= e.min_deg && angle_deg <= e.max_deg)
            .map(|e| e.value)
            .ok_or(DetectionError::NoSegmentForAngle { angle_deg })
    }

    pub fn entries(&self) -> &[SegmentRange] {
        &self.entries
    }

    /// The entry matching `angle_deg`, for overlay boundary rays.
    pub fn range_for(&self, angle_deg: f32) -> Option<&SegmentRange> {
        self.entries
            .iter()
            .find(|e| angle_deg >= e.min_deg && angle_deg <= e.max_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc_mask(w: usize, h: usize, cx: f32, cy: f32, r: f32) -> BinaryMask {
        let mut m = BinaryMask::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= r * r {
                    m.set(x, y);
                }
            }
        }
        m
    }

    #[test]
    fn bull_center_is_disc_center() {
        let board = disc_mask(100, 100, 50.0, 50.0, 40.0);
        let bull = disc_mask(100, 100, 50.0, 50.0, 3.0);
        let masks = BoardMasks::new(
            board,
            bull.clone(),
            bull.clone(),
            bull.clone(),
            bull.clone(),
            bull,
        )
        .unwrap();
        let c = masks.bull_center();
        assert!((c.x - 50.0).abs() < 0.5);
        assert!((c.y - 50.0).abs() < 0.5);
    }

    #[test]
    fn empty_inner_bull_is_rejected() {
        let board = disc_mask(10, 10, 5.0, 5.0, 4.0);
        let empty = BinaryMask::new(10, 10);
        let err = BoardMasks::new(
            board,
            empty.clone(),
            empty.clone(),
            empty.clone(),
            empty.clone(),
            empty,
        )
        .unwrap_err();
        assert_eq!(err, DetectionError::EmptyRegion(RegionKind::InnerBull));
    }

    #[test]
    fn mismatched_mask_size_is_rejected() {
        let board = disc_mask(10, 10, 5.0, 5.0, 4.0);
        let small = disc_mask(8, 8, 4.0, 4.0, 2.0);
        let err = BoardMasks::new(
            board,
            small.clone(),
            small.clone(),
            small.clone(),
            small.clone(),
            small,
        )
        .unwrap_err();
        assert!(matches!(err, DetectionError::MaskSizeMismatch { .. }));
    }

    #[test]
    fn standard_table_covers_circle() {
        let table = SegmentTable::standard();
        for deg in 0..360 {
            table.lookup(deg as f32).unwrap();
        }
    }

    #[test]
    fn standard_table_top_is_twenty() {
        let table = SegmentTable::standard();
        assert_eq!(table.lookup(90.0).unwrap(), 20);
        assert_eq!(table.lookup(0.0).unwrap(), 6); // right edge is the 6
        assert_eq!(table.lookup(270.0).unwrap(), 3); // bottom is the 3
    }

    #[test]
    fn range_for_returns_wedge_bounds() {
        let table = SegmentTable::standard();
        assert_eq!(table.entries().len(), 21); // wrap wedge split in two
        let top = table.range_for(90.0).unwrap();
        assert_eq!(top.value, 20);
        assert!((top.min_deg - 81.0).abs() < 1e-3);
        assert!((top.max_deg - 99.0).abs() < 1e-3);
        assert!(table.range_for(400.0).is_none());
    }

    #[test]
    fn gap_in_table_is_rejected() {
        let entries = vec![
            SegmentRange {
                min_deg: 0.0,
                max_deg: 180.0,
                value: 1,
            },
            SegmentRange {
                min_deg: 200.0,
                max_deg: 360.0,
                value: 2,
            },
        ];
        assert!(matches!(
            SegmentTable::new(entries),
            Err(DetectionError::TableGap { .. })
        ));
    }

    #[test]
    fn boundary_tie_resolves_to_first_entry() {
        let entries = vec![
            SegmentRange {
                min_deg: 0.0,
                max_deg: 180.0,
                value: 7,
            },
            SegmentRange {
                min_deg: 180.0,
                max_deg: 360.0,
                value: 9,
            },
        ];
        let table = SegmentTable::new(entries).unwrap();
        assert_eq!(table.lookup(180.0).unwrap(), 7);
    }

    #[test]
    fn repeated_lookup_is_deterministic() {
        let table = SegmentTable::standard();
        let first = table.lookup(123.4).unwrap();
        for _ in 0..10 {
            assert_eq!(table.lookup(123.4).unwrap(), first);
        }
    }
}
