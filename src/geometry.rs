//! Convex-geometry tip extraction.
//!
//! The resolved silhouette is reduced to its convex hull; the dart's long
//! axis is the dominant eigenvector of the point covariance. The two hull
//! extremes along that axis are the tip and the flight end. The flight
//! (shaft + feathers) carries most of the silhouette's pixel mass, so the
//! extreme *farther* from the pixel centroid is the tip.
use crate::contour::DartContour;
use crate::types::BoundingBox;
use nalgebra::{Matrix2, Point2, Vector2};

/// Tip point, flight-end point and bounding box of a dart silhouette.
#[derive(Clone, Debug)]
pub struct TipGeometry {
    pub tip: Point2<f32>,
    pub flight_center: Point2<f32>,
    pub bounding_box: BoundingBox,
}

/// Extract tip geometry from a resolved contour.
///
/// Returns `None` only for degenerate input (fewer than three distinct
/// points), which the area gates upstream already exclude.
pub fn extract_tip(contour: &DartContour) -> Option<TipGeometry> {
    let hull = convex_hull(&contour.points);
    if hull.len() < 3 {
        return None;
    }

    let centroid = pixel_centroid(&contour.points);
    let axis = principal_axis(&contour.points, centroid)?;

    // hull extremes along the long axis
    let mut lo = (f32::INFINITY, hull[0]);
    let mut hi = (f32::NEG_INFINITY, hull[0]);
    for &p in &hull {
        let t = (p - centroid).dot(&axis);
        if t < lo.0 {
            lo = (t, p);
        }
        if t > hi.0 {
            hi = (t, p);
        }
    }

    // the flight end is mass-heavy, so the centroid sits closer to it
    let (tip, flight_center) = if (lo.1 - centroid).norm() >= (hi.1 - centroid).norm() {
        (lo.1, hi.1)
    } else {
        (hi.1, lo.1)
    };

    Some(TipGeometry {
        tip,
        flight_center,
        bounding_box: contour.bounding_box,
    })
}

fn pixel_centroid(points: &[(i32, i32)]) -> Point2<f32> {
    let mut sx = 0.0f64;
    let mut sy = 0.0f64;
    for &(x, y) in points {
        sx += x as f64;
        sy += y as f64;
    }
    let n = points.len().max(1) as f64;
    Point2::new((sx / n) as f32, (sy / n) as f32)
}

/// Dominant eigenvector of the 2×2 point covariance, unit length.
fn principal_axis(points: &[(i32, i32)], centroid: Point2<f32>) -> Option<Vector2<f32>> {
    if points.len() < 2 {
        return None;
    }
    let mut cxx = 0.0f64;
    let mut cxy = 0.0f64;
    let mut cyy = 0.0f64;
    for &(x, y) in points {
        let dx = (x as f32 - centroid.x) as f64;
        let dy = (y as f32 - centroid.y) as f64;
        cxx += dx * dx;
        cxy += dx * dy;
        cyy += dy * dy;
    }
    let n = points.len() as f64;
    let cov = Matrix2::new(
        (cxx / n) as f32,
        (cxy / n) as f32,
        (cxy / n) as f32,
        (cyy / n) as f32,
    );
    let eig = cov.symmetric_eigen();
    let idx = if eig.eigenvalues[0] >= eig.eigenvalues[1] {
        0
    } else {
        1
    };
    let axis = eig.eigenvectors.column(idx).into_owned();
    let norm = axis.norm();
    (norm > f32::EPSILON).then(|| axis / norm)
}

/// Convex hull (Andrew monotone chain), counter-clockwise, no duplicate
/// endpoint.
pub fn convex_hull(points: &[(i32, i32)]) -> Vec<Point2<f32>> {
    let mut pts: Vec<(i32, i32)> = points.to_vec();
    pts.sort_unstable();
    pts.dedup();
    if pts.len() < 3 {
        return pts
            .into_iter()
            .map(|(x, y)| Point2::new(x as f32, y as f32))
            .collect();
    }

    let cross = |o: (i32, i32), a: (i32, i32), b: (i32, i32)| -> i64 {
        (a.0 - o.0) as i64 * (b.1 - o.1) as i64 - (a.1 - o.1) as i64 * (b.0 - o.0) as i64
    };

    let mut lower: Vec<(i32, i32)> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<(i32, i32)> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
        .into_iter()
        .map(|(x, y)| Point2::new(x as f32, y as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::DartContour;

    fn rect_points(x0: i32, y0: i32, w: i32, h: i32) -> Vec<(i32, i32)> {
        let mut pts = Vec::new();
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                pts.push((x, y));
            }
        }
        pts
    }

    #[test]
    fn hull_of_square_has_four_corners() {
        let hull = convex_hull(&rect_points(0, 0, 10, 10));
        assert_eq!(hull.len(), 4);
    }

    #[test]
    fn hull_of_collinear_points_degenerates() {
        let pts: Vec<(i32, i32)> = (0..10).map(|i| (i, 0)).collect();
        let hull = convex_hull(&pts);
        assert!(hull.len() <= 2);
    }

    /// A dart-like silhouette: a fat flight block with a thin shaft
    /// sticking out. The tip must land at the far end of the shaft.
    #[test]
    fn tip_is_the_thin_end() {
        let mut points = rect_points(0, 0, 20, 20); // flight at the left
        points.extend(rect_points(20, 8, 40, 4)); // shaft to the right
        let bb = BoundingBox {
            top_left: (0, 0),
            bottom_right: (60, 20),
        };
        let contour = DartContour {
            area: points.len(),
            points,
            bounding_box: bb,
        };
        let geo = extract_tip(&contour).unwrap();
        assert!(geo.tip.x > 55.0, "tip.x = {}", geo.tip.x);
        assert!(geo.flight_center.x < 5.0, "flight.x = {}", geo.flight_center.x);
    }

    #[test]
    fn tip_works_with_vertical_dart() {
        let mut points = rect_points(0, 40, 20, 20); // flight at the bottom
        points.extend(rect_points(8, 0, 4, 40)); // shaft pointing up
        let bb = BoundingBox {
            top_left: (0, 0),
            bottom_right: (20, 60),
        };
        let contour = DartContour {
            area: points.len(),
            points,
            bounding_box: bb,
        };
        let geo = extract_tip(&contour).unwrap();
        assert!(geo.tip.y < 5.0, "tip.y = {}", geo.tip.y);
        assert!(geo.flight_center.y > 45.0);
    }
}
