// MIT/Apache2 License

use super::{Point, Rect, RectExt};
use std::ops::Index;

/// The quadrangle connecting two consecutive nib instances.
///
/// Vertices run clockwise. `a` and `d` lie on the outline of the begin node,
/// `b` and `c` on the outline of the end node.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Quad {
    pub a: Point,
    pub b: Point,
    pub c: Point,
    pub d: Point,
}

impl Quad {
    /// The quad of two nodes that cannot be connected, because they coincide
    /// or one contains the other.
    pub const EMPTY: Quad = Quad {
        a: Point::new(0.0, 0.0),
        b: Point::new(0.0, 0.0),
        c: Point::new(0.0, 0.0),
        d: Point::new(0.0, 0.0),
    };

    #[inline]
    pub fn new(a: Point, b: Point, c: Point, d: Point) -> Self {
        Self { a, b, c, d }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.a == self.b && self.c == self.d
    }

    /// Bounding box of the four vertices, void for an empty quad.
    #[inline]
    pub fn bounds(&self) -> Rect {
        if self.is_empty() {
            Rect::void()
        } else {
            Rect::from_corners(self.a, self.b).merge(&Rect::from_corners(self.c, self.d))
        }
    }

    #[inline]
    pub fn vertices(&self) -> [Point; 4] {
        [self.a, self.b, self.c, self.d]
    }
}

impl Index<usize> for Quad {
    type Output = Point;

    #[inline]
    fn index(&self, index: usize) -> &Point {
        match index {
            0 => &self.a,
            1 => &self.b,
            2 => &self.c,
            3 => &self.d,
            i => panic!("Quad vertex index {} out of range", i),
        }
    }
}
