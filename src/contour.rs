//! Morphological contour merging and dart-silhouette validation.
//!
//! A change mask fresh out of subtraction is speckled: shaft, flight and
//! shadow often appear as disjoint blobs. The resolver smooths the mask
//! (close 3×3, dilate 5×5, erode 5×5, iteration counts from config),
//! labels connected components, merges every component above the minimum
//! area into one point set and gates the merged shape on area and
//! bounding-box aspect ratio.
use crate::image::BinaryMask;
use crate::types::BoundingBox;
use serde::Deserialize;

const CLOSE_KERNEL: usize = 3;
const SMOOTH_KERNEL: usize = 5;

/// Iteration counts for the three fixed morphology passes.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct MorphologyParams {
    pub close_iterations: usize,
    pub dilate_iterations: usize,
    pub erode_iterations: usize,
}

impl Default for MorphologyParams {
    fn default() -> Self {
        Self {
            close_iterations: 2,
            dilate_iterations: 1,
            erode_iterations: 1,
        }
    }
}

/// Area and aspect gates for the merged silhouette.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct ContourGates {
    /// Components below this pixel area are noise and never merged.
    pub min_contour_area: usize,
    /// Merged areas above this are not a dart (e.g. a hand).
    pub max_merged_area: usize,
    /// Inclusive aspect-ratio bounds; a lodged dart spans roughly a
    /// 45°–90° visual angle.
    pub aspect_min: f32,
    pub aspect_max: f32,
}

impl Default for ContourGates {
    fn default() -> Self {
        Self {
            min_contour_area: 200,
            max_merged_area: 25_000,
            aspect_min: 0.25,
            aspect_max: 2.0,
        }
    }
}

/// Merged, validated dart silhouette.
#[derive(Clone, Debug, PartialEq)]
pub struct DartContour {
    /// Every pixel of the merged components.
    pub points: Vec<(i32, i32)>,
    /// Pixel area of the merged shape.
    pub area: usize,
    pub bounding_box: BoundingBox,
}

/// Expected negative outcomes of the resolver; these abort the current
/// scan window and are logged, never propagated as errors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContourRejection {
    /// No component cleared the minimum area.
    NoContour,
    /// Merged area above the maximum: likely not a dart.
    Oversize { area: usize },
    /// Bounding-box aspect outside the plausible silhouette range.
    AspectRatio { ratio: f32 },
}

/// Smooth `mask`, merge its components and validate the result.
pub fn resolve(mask: &BinaryMask, morph: &MorphologyParams, gates: &ContourGates) -> Result<DartContour, ContourRejection> {
    let mut work = mask.clone();
    for _ in 0..morph.close_iterations {
        work = erode(&dilate(&work, CLOSE_KERNEL), CLOSE_KERNEL);
    }
    for _ in 0..morph.dilate_iterations {
        work = dilate(&work, SMOOTH_KERNEL);
    }
    for _ in 0..morph.erode_iterations {
        work = erode(&work, SMOOTH_KERNEL);
    }

    let components = label_components(&work);
    let mut points: Vec<(i32, i32)> = Vec::new();
    for comp in &components {
        if comp.len() >= gates.min_contour_area {
            points.extend(comp.iter().map(|&(x, y)| (x as i32, y as i32)));
        }
    }
    if points.is_empty() {
        return Err(ContourRejection::NoContour);
    }

    let area = points.len();
    if area > gates.max_merged_area {
        return Err(ContourRejection::Oversize { area });
    }

    let bounding_box = bbox_of(&points);
    let ratio = bounding_box.aspect_ratio();
    if ratio < gates.aspect_min || ratio > gates.aspect_max {
        return Err(ContourRejection::AspectRatio { ratio });
    }

    Ok(DartContour {
        points,
        area,
        bounding_box,
    })
}

/// Rect-kernel dilation: a pixel is set when any pixel in its k×k window is.
fn dilate(mask: &BinaryMask, ksize: usize) -> BinaryMask {
    let r = ksize / 2;
    let mut out = BinaryMask::new(mask.w, mask.h);
    for y in 0..mask.h {
        for x in 0..mask.w {
            'window: for dy in 0..ksize {
                for dx in 0..ksize {
                    let sx = (x + dx).wrapping_sub(r);
                    let sy = (y + dy).wrapping_sub(r);
                    if mask.contains(sx, sy) {
                        out.set(x, y);
                        break 'window;
                    }
                }
            }
        }
    }
    out
}

/// Rect-kernel erosion: a pixel survives when its whole k×k window is set.
fn erode(mask: &BinaryMask, ksize: usize) -> BinaryMask {
    let r = ksize / 2;
    let mut out = BinaryMask::new(mask.w, mask.h);
    for y in 0..mask.h {
        'pixel: for x in 0..mask.w {
            for dy in 0..ksize {
                for dx in 0..ksize {
                    let sx = (x + dx).wrapping_sub(r);
                    let sy = (y + dy).wrapping_sub(r);
                    if !mask.contains(sx, sy) {
                        continue 'pixel;
                    }
                }
            }
            out.set(x, y);
        }
    }
    out
}

/// 8-connected component labeling via iterative flood fill.
fn label_components(mask: &BinaryMask) -> Vec<Vec<(usize, usize)>> {
    let mut visited = vec![false; mask.w * mask.h];
    let mut components = Vec::new();
    let mut stack = Vec::new();
    for y in 0..mask.h {
        for x in 0..mask.w {
            if !mask.contains(x, y) || visited[y * mask.w + x] {
                continue;
            }
            let mut comp = Vec::new();
            visited[y * mask.w + x] = true;
            stack.push((x, y));
            while let Some((cx, cy)) = stack.pop() {
                comp.push((cx, cy));
                for dy in -1i64..=1 {
                    for dx in -1i64..=1 {
                        let nx = cx as i64 + dx;
                        let ny = cy as i64 + dy;
                        if nx < 0 || ny < 0 || nx >= mask.w as i64 || ny >= mask.h as i64 {
                            continue;
                        }
                        let (nx, ny) = (nx as usize, ny as usize);
                        if mask.contains(nx, ny) && !visited[ny * mask.w + nx] {
                            visited[ny * mask.w + nx] = true;
                            stack.push((nx, ny));
                        }
                    }
                }
            }
            components.push(comp);
        }
    }
    components
}

fn bbox_of(points: &[(i32, i32)]) -> BoundingBox {
    let mut min_x = i32::MAX;
    let mut min_y = i32::MAX;
    let mut max_x = i32::MIN;
    let mut max_y = i32::MIN;
    for &(x, y) in points {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    // exclusive bottom-right so width/height equal pixel counts
    BoundingBox {
        top_left: (min_x, min_y),
        bottom_right: (max_x + 1, max_y + 1),
    }
}
