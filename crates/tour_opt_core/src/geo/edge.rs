use std::fmt;

use crate::PointId;

/// Undirected edge between two points. Equality is positional, so compare
/// [`Edge::normalized`] values when traversal direction must not matter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub a: PointId,
    pub b: PointId,
}

impl Edge {
    pub const fn new(a: PointId, b: PointId) -> Self {
        Self { a, b }
    }

    /// Smaller id first.
    pub fn normalized(self) -> Self {
        if self.a <= self.b {
            self
        } else {
            Self {
                a: self.b,
                b: self.a,
            }
        }
    }

    pub fn touches(self, point: PointId) -> bool {
        self.a == point || self.b == point
    }

    /// The endpoint opposite `point`, if `point` is an endpoint.
    pub fn other(self, point: PointId) -> Option<PointId> {
        if self.a == point {
            Some(self.b)
        } else if self.b == point {
            Some(self.a)
        } else {
            None
        }
    }

    pub fn endpoints(self) -> [PointId; 2] {
        [self.a, self.b]
    }
}

impl From<(PointId, PointId)> for Edge {
    fn from((a, b): (PointId, PointId)) -> Self {
        Self::new(a, b)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::Edge;

    #[test]
    fn normalized_orders_endpoints() {
        assert_eq!(Edge::new(9, 2).normalized(), Edge::new(2, 9));
        assert_eq!(Edge::new(2, 9).normalized(), Edge::new(2, 9));
        assert_eq!(
            Edge::new(4, 1).normalized(),
            Edge::new(1, 4).normalized()
        );
    }

    #[test]
    fn other_returns_opposite_endpoint() {
        let edge = Edge::new(3, 5);
        assert_eq!(edge.other(3), Some(5));
        assert_eq!(edge.other(5), Some(3));
        assert_eq!(edge.other(4), None);
        assert!(edge.touches(5));
        assert!(!edge.touches(4));
    }
}
