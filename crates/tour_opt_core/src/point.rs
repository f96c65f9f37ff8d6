use std::fmt;

/// Point identifier as it appears in a TSPLIB `NODE_COORD_SECTION`.
/// Ids are unique within an instance but need not be contiguous.
pub type PointId = u32;

/// Rounded Euclidean distance (TSPLIB `EUC_2D`).
pub type Distance = i64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance rounded to the nearest integer, halves away from zero.
    pub fn dist(self, rhs: Self) -> Distance {
        let dx = rhs.x - self.x;
        let dy = rhs.y - self.y;
        (dx * dx + dy * dy).sqrt().round() as Distance
    }

    pub fn midpoint(self, rhs: Self) -> Self {
        Self {
            x: self.x + (rhs.x - self.x) / 2.0,
            y: self.y + (rhs.y - self.y) / 2.0,
        }
    }

    pub(crate) fn is_valid(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b1 = ryu::Buffer::new();
        let mut b2 = ryu::Buffer::new();
        write!(f, "{} {}", b1.format(self.x), b2.format(self.y))
    }
}

#[cfg(test)]
mod tests {
    use super::Point;

    #[test]
    fn dist_rounds_to_nearest_integer() {
        let origin = Point::new(0.0, 0.0);
        assert_eq!(origin.dist(Point::new(3.0, 4.0)), 5);
        assert_eq!(origin.dist(Point::new(1.0, 1.0)), 1);
        assert_eq!(origin.dist(Point::new(10.0, 10.0)), 14);
        assert_eq!(origin.dist(Point::new(0.0, 2.5)), 3);
    }

    #[test]
    fn dist_is_symmetric_and_zero_for_same_point() {
        let a = Point::new(12.5, -3.0);
        let b = Point::new(-7.25, 40.0);
        assert_eq!(a.dist(b), b.dist(a));
        assert_eq!(a.dist(a), 0);
    }

    #[test]
    fn midpoint_averages_coordinates() {
        let mid = Point::new(0.0, 2.0).midpoint(Point::new(4.0, -2.0));
        assert_eq!(mid, Point::new(2.0, 0.0));
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        assert!(Point::new(1.0, 2.0).is_valid());
        assert!(!Point::new(f64::NAN, 0.0).is_valid());
        assert!(!Point::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn display_formats_as_x_then_y() {
        assert_eq!(Point::new(1.5, -2.25).to_string(), "1.5 -2.25");
    }
}
