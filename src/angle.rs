//! Angle utilities used across the scoring pipeline.
//!
//! All public angles are degrees in `[0, 360)`. Image coordinates are
//! y-down; the reference direction points from the board center toward the
//! right frame edge, so angles grow counter-clockwise on screen like the
//! segment table expects.
use nalgebra::Point2;

/// Normalizes an angle in degrees into the range [0, 360).
#[inline]
pub fn normalize_deg(angle: f32) -> f32 {
    let norm = angle.rem_euclid(360.0);
    if norm >= 360.0 - 1e-6 {
        0.0
    } else {
        norm
    }
}

/// Angle of `tip` as seen from `center`, degrees in [0, 360).
///
/// `atan2`-derived; the y axis is flipped so that "up" on screen maps to
/// 90° rather than 270°.
#[inline]
pub fn tip_angle(center: Point2<f32>, tip: Point2<f32>) -> f32 {
    let dx = tip.x - center.x;
    let dy = center.y - tip.y;
    normalize_deg(dy.atan2(dx).to_degrees())
}

/// Rotates `p` around `center` by `radians` (y-down screen convention).
///
/// Kept for overlay rendering: the presentation layer draws the matched
/// segment's boundary rays by rotating the reference direction.
#[inline]
pub fn rotate_point(center: Point2<f32>, p: Point2<f32>, radians: f32) -> Point2<f32> {
    let (sin, cos) = radians.sin_cos();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point2::new(
        center.x + dx * cos + dy * sin,
        center.y - dx * sin + dy * cos,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn normalize_deg_basic() {
        assert!(approx_eq(normalize_deg(45.0), 45.0));
        assert!(approx_eq(normalize_deg(-90.0), 270.0));
        assert!(approx_eq(normalize_deg(360.0), 0.0));
        assert!(approx_eq(normalize_deg(725.0), 5.0));
    }

    #[test]
    fn tip_angle_cardinal_directions() {
        let c = Point2::new(100.0, 100.0);
        assert!(approx_eq(tip_angle(c, Point2::new(150.0, 100.0)), 0.0));
        assert!(approx_eq(tip_angle(c, Point2::new(100.0, 50.0)), 90.0));
        assert!(approx_eq(tip_angle(c, Point2::new(50.0, 100.0)), 180.0));
        assert!(approx_eq(tip_angle(c, Point2::new(100.0, 150.0)), 270.0));
    }

    #[test]
    fn rotate_point_quarter_turn() {
        let c = Point2::new(0.0, 0.0);
        let p = Point2::new(10.0, 0.0);
        let r = rotate_point(c, p, std::f32::consts::FRAC_PI_2);
        assert!(approx_eq(r.x, 0.0));
        assert!(approx_eq(r.y, -10.0)); // up on screen
    }

    #[test]
    fn rotate_matches_tip_angle() {
        let c = Point2::new(50.0, 50.0);
        let p = Point2::new(90.0, 50.0);
        let r = rotate_point(c, p, 60f32.to_radians());
        assert!(approx_eq(tip_angle(c, r), 60.0));
    }
}
