//! Owned binary mask (0 / 255 per pixel).
//!
//! Used for two things that share representation but not lifecycle:
//! - region masks from calibration (immutable for a session),
//! - change masks from background subtraction (transient per frame).

const SET: u8 = 255;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMask {
    pub w: usize,
    pub h: usize,
    data: Vec<u8>,
}

impl BinaryMask {
    /// All-clear mask of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    /// Build from raw bytes; any non-zero byte counts as set.
    pub fn from_raw(w: usize, h: usize, raw: Vec<u8>) -> Self {
        debug_assert_eq!(raw.len(), w * h);
        let data = raw.into_iter().map(|b| if b > 0 { SET } else { 0 }).collect();
        Self { w, h, data }
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.w && y < self.h && self.data[y * self.w + x] != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize) {
        self.data[y * self.w + x] = SET;
    }

    pub fn is_empty(&self) -> bool {
        self.count_nonzero() == 0
    }

    /// Number of set pixels; the magnitude every classification band reads.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&b| b != 0).count()
    }

    /// Centroid of set pixels, or `None` when the mask is empty.
    pub fn centroid(&self) -> Option<(f32, f32)> {
        let mut sx = 0.0f64;
        let mut sy = 0.0f64;
        let mut n = 0usize;
        for y in 0..self.h {
            let row = &self.data[y * self.w..(y + 1) * self.w];
            for (x, &b) in row.iter().enumerate() {
                if b != 0 {
                    sx += x as f64;
                    sy += y as f64;
                    n += 1;
                }
            }
        }
        (n > 0).then(|| ((sx / n as f64) as f32, (sy / n as f64) as f32))
    }
}

/// Set pixels where `|a - b|` exceeds `threshold` (both images in [0,1]).
///
/// This is the reference-frame zero-difference test from the turn machine:
/// absdiff, binary threshold, count — the caller checks `count_nonzero()`.
pub fn absdiff_threshold(a: &crate::image::ImageF32, b: &crate::image::ImageF32, threshold: f32) -> BinaryMask {
    debug_assert_eq!((a.w, a.h), (b.w, b.h));
    let mut out = BinaryMask::new(a.w, a.h);
    for y in 0..a.h {
        for x in 0..a.w {
            if (a.get(x, y) - b.get(x, y)).abs() > threshold {
                out.set(x, y);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageF32;

    #[test]
    fn count_and_centroid() {
        let mut m = BinaryMask::new(4, 4);
        assert!(m.is_empty());
        m.set(1, 1);
        m.set(3, 1);
        assert_eq!(m.count_nonzero(), 2);
        let (cx, cy) = m.centroid().unwrap();
        assert!((cx - 2.0).abs() < 1e-6);
        assert!((cy - 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty_centroid_is_none() {
        assert!(BinaryMask::new(3, 3).centroid().is_none());
    }

    #[test]
    fn absdiff_thresholds_inclusive_below() {
        let mut a = ImageF32::new(2, 1);
        let b = ImageF32::new(2, 1);
        a.set(0, 0, 0.3);
        a.set(1, 0, 0.1);
        let m = absdiff_threshold(&a, &b, 0.2);
        assert!(m.contains(0, 0));
        assert!(!m.contains(1, 0));
    }
}
