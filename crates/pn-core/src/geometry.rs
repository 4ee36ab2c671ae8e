//! Planar points and heading comparison.

use crate::numeric::Real;

/// A planar point (projected or geographic lon/lat, never mixed in one call).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    pub fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }

    /// Vector from `self` to `other`.
    pub fn vector_to(self, other: Point) -> Vec2 {
        Vec2 {
            x: other.x - self.x,
            y: other.y - self.y,
        }
    }
}

/// A planar direction vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: Real,
    pub y: Real,
}

impl Vec2 {
    pub fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }

    /// True when the vector carries no direction.
    pub fn is_degenerate(self) -> bool {
        !(self.x.is_finite() && self.y.is_finite()) || (self.x == 0.0 && self.y == 0.0)
    }

    /// Heading in radians, in (-pi, pi].
    pub fn heading(self) -> Real {
        self.y.atan2(self.x)
    }
}

/// Absolute difference between two headings, in degrees within [0, 180].
///
/// Returns `None` when either vector is degenerate.
pub fn heading_delta_deg(a: Vec2, b: Vec2) -> Option<Real> {
    if a.is_degenerate() || b.is_degenerate() {
        return None;
    }
    let mut diff = (a.heading() - b.heading()).abs();
    while diff > std::f64::consts::PI {
        diff = (diff - 2.0 * std::f64::consts::PI).abs();
    }
    Some(diff.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{Tolerances, nearly_equal};

    fn close(a: Real, b: Real) -> bool {
        nearly_equal(a, b, Tolerances { abs: 1e-9, rel: 1e-9 })
    }

    #[test]
    fn straight_and_reverse() {
        let east = Vec2::new(1.0, 0.0);
        assert!(close(heading_delta_deg(east, east).unwrap(), 0.0));
        assert!(close(heading_delta_deg(east, Vec2::new(-2.0, 0.0)).unwrap(), 180.0));
    }

    #[test]
    fn wraps_across_pi() {
        let a = Vec2::new(-1.0, 0.01);
        let b = Vec2::new(-1.0, -0.01);
        let delta = heading_delta_deg(a, b).unwrap();
        assert!(delta < 2.0, "delta was {delta}");
    }

    #[test]
    fn right_angle() {
        let p = Point::new(0.0, 0.0);
        let north = p.vector_to(Point::new(0.0, 5.0));
        let east = p.vector_to(Point::new(3.0, 0.0));
        assert!(close(heading_delta_deg(north, east).unwrap(), 90.0));
    }

    #[test]
    fn degenerate_vectors_have_no_heading() {
        assert!(heading_delta_deg(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)).is_none());
        assert!(heading_delta_deg(Vec2::new(Real::NAN, 1.0), Vec2::new(1.0, 0.0)).is_none());
    }
}
