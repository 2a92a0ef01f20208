//! Synthetic board geometry, flat frames and a scripted change model for
//! the end-to-end tests.
use std::collections::HashMap;

use dart_detector::board::BoardMasks;
use dart_detector::image::{BinaryMask, GrayImageU8, ImageF32};
use dart_detector::motion::ChangeModel;

/// Frame/mask edge length used by all e2e scenarios.
pub const SIDE: usize = 200;

/// Board center for [`standard_board`].
pub const CENTER: (f32, f32) = (100.0, 100.0);

/// Filled disc of radius `r` around `(cx, cy)`.
pub fn disc_mask(w: usize, h: usize, cx: f32, cy: f32, r: f32) -> BinaryMask {
    annulus_mask(w, h, cx, cy, 0.0, r)
}

/// Filled annulus: pixels with `r_in <= dist <= r_out`.
pub fn annulus_mask(w: usize, h: usize, cx: f32, cy: f32, r_in: f32, r_out: f32) -> BinaryMask {
    let mut mask = BinaryMask::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist >= r_in && dist <= r_out {
                mask.set(x, y);
            }
        }
    }
    mask
}

/// Axis-aligned filled rectangle, clipped to the image.
pub fn rect_mask(w: usize, h: usize, x0: usize, y0: usize, rw: usize, rh: usize) -> BinaryMask {
    let mut mask = BinaryMask::new(w, h);
    for y in y0..(y0 + rh).min(h) {
        for x in x0..(x0 + rw).min(w) {
            mask.set(x, y);
        }
    }
    mask
}

/// Every pixel set. On a 200x200 grid this is 40 000 pixels, well inside
/// the unplugging band.
pub fn full_mask(w: usize, h: usize) -> BinaryMask {
    rect_mask(w, h, 0, 0, w, h)
}

/// A concentric-ring board on a `SIDE` x `SIDE` grid centered at
/// [`CENTER`]:
///
/// - inner bull: r <= 4
/// - outer bull: 4 < r <= 10
/// - triple ring: 58 <= r <= 68
/// - double ring: 88 <= r <= 96
/// - dartboard and single: r <= 96 (single relies on ring precedence)
pub fn standard_board() -> BoardMasks {
    board_scaled(1)
}

/// [`standard_board`] geometry uniformly scaled by `k`: side `200 * k`,
/// center and radii likewise.
pub fn board_scaled(k: usize) -> BoardMasks {
    let side = SIDE * k;
    let s = k as f32;
    let (cx, cy) = (CENTER.0 * s, CENTER.1 * s);
    BoardMasks::new(
        disc_mask(side, side, cx, cy, 96.0 * s),
        disc_mask(side, side, cx, cy, 4.0 * s),
        annulus_mask(side, side, cx, cy, 4.0 * s + 0.001, 10.0 * s),
        annulus_mask(side, side, cx, cy, 58.0 * s, 68.0 * s),
        annulus_mask(side, side, cx, cy, 88.0 * s, 96.0 * s),
        disc_mask(side, side, cx, cy, 96.0 * s),
    )
    .expect("synthetic board must validate")
}

/// A dart-shaped silhouette pointing up: a 6-wide shaft descending from
/// the tip into a 30x30 flight block. 1158 set pixels unclipped, inside
/// the candidate band.
pub fn dart_blob(w: usize, h: usize, tip_x: i32, tip_y: i32) -> BinaryMask {
    let mut mask = BinaryMask::new(w, h);
    let mut fill = |x0: i32, y0: i32, rw: i32, rh: i32| {
        for y in y0..y0 + rh {
            for x in x0..x0 + rw {
                if x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h {
                    mask.set(x as usize, y as usize);
                }
            }
        }
    };
    // shaft, then flight
    fill(tip_x - 3, tip_y, 6, 43);
    fill(tip_x - 15, tip_y + 43, 30, 30);
    mask
}

/// A large settled-dart silhouette pointing up: a 20x150 shaft descending
/// from the tip into a 100x120 flight block. Exactly 15 000 set pixels
/// unclipped, a dart-sized count right in the candidate band.
pub fn big_dart(w: usize, h: usize, tip_x: i32, tip_y: i32) -> BinaryMask {
    let mut mask = BinaryMask::new(w, h);
    let mut fill = |x0: i32, y0: i32, rw: i32, rh: i32| {
        for y in y0..y0 + rh {
            for x in x0..x0 + rw {
                if x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h {
                    mask.set(x as usize, y as usize);
                }
            }
        }
    };
    fill(tip_x - 10, tip_y, 20, 150);
    fill(tip_x - 50, tip_y + 150, 100, 120);
    mask
}

/// `n` identical flat gray frames. With a constant stream the
/// reference-diff test passes trivially once the scripted model reports
/// zero change.
pub fn flat_frames(n: usize, w: usize, h: usize, value: u8) -> Vec<GrayImageU8> {
    (0..n)
        .map(|_| GrayImageU8::new(w, h, vec![value; w * h]))
        .collect()
}

/// Change model replaying prebuilt masks by apply-call order.
///
/// The detector applies the model exactly once per consumed frame, in
/// stream order, so call index equals frame index. Unscripted calls
/// return an empty mask.
pub struct ScriptedChanges {
    w: usize,
    h: usize,
    masks: HashMap<u64, BinaryMask>,
    calls: u64,
}

impl ScriptedChanges {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            masks: HashMap::new(),
            calls: 0,
        }
    }

    /// Script `mask` as the subtraction result for frame `index`.
    pub fn at(mut self, index: u64, mask: BinaryMask) -> Self {
        self.masks.insert(index, mask);
        self
    }
}

impl ChangeModel for ScriptedChanges {
    fn apply(&mut self, _frame: &ImageF32) -> BinaryMask {
        let index = self.calls;
        self.calls += 1;
        self.masks
            .get(&index)
            .cloned()
            .unwrap_or_else(|| BinaryMask::new(self.w, self.h))
    }

    fn reset(&mut self) {
        self.calls = 0;
    }
}
