//! 2D vector helpers on top of `glam::Vec2`.
//!
//! glam already covers addition, subtraction, scaling, dot product and
//! magnitude. What lives here is the degree-based angle handling the viewer
//! and the caster share, plus the zero-safe normalization policy.

use glam::Vec2;

/// Normalize `v`, returning the zero vector when `v` has zero length.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    let len = v.length();
    if len == 0.0 { Vec2::ZERO } else { v / len }
}

/// Angle between `a` and `b` in degrees, via the arccosine of the dot
/// product of their normalized forms.
pub fn angle_between_deg(a: Vec2, b: Vec2) -> f32 {
    // Rounding can push the dot product slightly past 1.0
    let cos = normalize(a).dot(normalize(b)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Unit direction for an angle in degrees. 0° points along +x and the angle
/// grows clockwise on screen, since screen y points down.
#[inline]
pub fn heading(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Wrap an angle into `[0, 360)`.
#[inline]
pub fn wrap_degrees(angle_deg: f32) -> f32 {
    angle_deg.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn normalize_has_unit_length() {
        let n = normalize(Vec2::new(3.0, 4.0));
        assert!(close(n.length(), 1.0));
        assert!(close(n.x, 0.6));
        assert!(close(n.y, 0.8));
    }

    #[test]
    fn angle_between_perpendicular_and_parallel() {
        assert!(close(angle_between_deg(Vec2::X, Vec2::Y), 90.0));
        assert!(close(angle_between_deg(Vec2::X, Vec2::new(5.0, 0.0)), 0.0));
        assert!(close(angle_between_deg(Vec2::X, -Vec2::X), 180.0));
    }

    #[test]
    fn distance_is_euclidean() {
        assert!(close(distance(Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0)), 5.0));
    }

    #[test]
    fn heading_cardinals() {
        let east = heading(0.0);
        assert!(close(east.x, 1.0) && close(east.y, 0.0));
        // Clockwise on screen: 90° points down (+y)
        let down = heading(90.0);
        assert!(close(down.x, 0.0) && close(down.y, 1.0));
    }

    #[test]
    fn wrap_degrees_range() {
        assert!(close(wrap_degrees(-10.0), 350.0));
        assert!(close(wrap_degrees(370.0), 10.0));
        assert!(close(wrap_degrees(0.0), 0.0));
    }
}
