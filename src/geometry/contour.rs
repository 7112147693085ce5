// MIT/Apache2 License

use super::{points_close, Point, Vector};
use tinyvec::TinyVec;

/// One edge of a node contour.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ContourSegment {
    /// A straight edge.
    Line { begin: Point, vector: Vector },
    /// A clockwise circular arc. The center is at `begin + radius`.
    Arc {
        begin: Point,
        vector: Vector,
        radius: Vector,
    },
}

/// The edges of a node contour, in clockwise order.
pub type Contour = TinyVec<[ContourSegment; 8]>;

impl Default for ContourSegment {
    #[inline]
    fn default() -> Self {
        ContourSegment::Line {
            begin: Point::zero(),
            vector: Vector::zero(),
        }
    }
}

impl ContourSegment {
    /// A straight edge. Edges between coincident points have no direction.
    #[inline]
    pub fn line(begin: Point, end: Point) -> Self {
        let vector = if points_close(begin, end) {
            Vector::zero()
        } else {
            end - begin
        };
        ContourSegment::Line { begin, vector }
    }

    /// An arc going clockwise from `begin` to `end` around `center`.
    #[inline]
    pub fn arc(begin: Point, end: Point, center: Point) -> Self {
        ContourSegment::Arc {
            begin,
            vector: end - begin,
            radius: center - begin,
        }
    }

    #[inline]
    pub fn begin(&self) -> Point {
        match *self {
            ContourSegment::Line { begin, .. } | ContourSegment::Arc { begin, .. } => begin,
        }
    }

    #[inline]
    pub fn vector(&self) -> Vector {
        match *self {
            ContourSegment::Line { vector, .. } | ContourSegment::Arc { vector, .. } => vector,
        }
    }

    #[inline]
    pub fn end(&self) -> Point {
        self.begin() + self.vector()
    }

    /// Vector from the beginning of the arc to its center; zero for lines.
    #[inline]
    pub fn radius(&self) -> Vector {
        match *self {
            ContourSegment::Line { .. } => Vector::zero(),
            ContourSegment::Arc { radius, .. } => radius,
        }
    }

    #[inline]
    pub fn is_arc(&self) -> bool {
        matches!(self, ContourSegment::Arc { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{point, vector};

    #[test]
    fn lines_collapse() {
        let l = ContourSegment::line(point(1.0, 1.0), point(1.0, 1.0 + 1e-17));
        assert_eq!(l.vector(), Vector::zero());
        assert!(!l.is_arc());

        let l = ContourSegment::line(point(1.0, 1.0), point(4.0, 5.0));
        assert_eq!(l.vector(), vector(3.0, 4.0));
        assert_eq!(l.end(), point(4.0, 5.0));
        assert_eq!(l.radius(), Vector::zero());
    }

    #[test]
    fn arcs() {
        let a = ContourSegment::arc(point(5.0, 0.0), point(-5.0, 0.0), point(0.0, 0.0));
        assert!(a.is_arc());
        assert_eq!(a.radius(), vector(-5.0, 0.0));
        assert_eq!(a.end(), point(-5.0, 0.0));
    }
}
