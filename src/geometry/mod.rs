// MIT/Apache2 License

mod contour;
mod quad;

pub use contour::*;
pub use quad::*;

use crate::util::are_close;

/// A point in stroke space.
pub type Point = lyon_geom::Point<f64>;
/// A displacement in stroke space.
pub type Vector = lyon_geom::Vector<f64>;
/// An axis-aligned bounding box.
pub type Rect = lyon_geom::Box2D<f64>;
/// An affine transform, applied to row vectors.
pub type Transform = lyon_geom::Transform<f64>;
/// An angle, in radians.
pub type Angle = lyon_geom::Angle<f64>;
/// A width and a height.
pub type Size = lyon_geom::Size<f64>;

pub use lyon_geom::{point, vector};

/// Whether both coordinates of two points are close.
#[inline]
pub fn points_close(a: Point, b: Point) -> bool {
    are_close(a.x, b.x) && are_close(a.y, b.y)
}

/// Whether both coordinates of two vectors are close.
#[inline]
pub fn vectors_close(a: Vector, b: Vector) -> bool {
    are_close(a.x, b.x) && are_close(a.y, b.y)
}

/// Extensions for bounding boxes that keep zero-sized boxes meaningful.
///
/// `Box2D` considers a box with no area to be empty, but the bounds of a
/// horizontal spine or a single point still need to be merged and tested. A
/// "void" box is the inverted infinite box; merging with it is a no-op and
/// it touches nothing.
pub trait RectExt: Sized {
    /// The box that contains nothing.
    fn void() -> Self;
    /// Whether this box contains nothing.
    fn is_void(&self) -> bool;
    /// The smallest box that holds both corners.
    fn from_corners(a: Point, b: Point) -> Self;
    /// The smallest box that holds both boxes.
    fn merge(&self, other: &Self) -> Self;
    /// The smallest box that holds this box and the point.
    fn merge_point(&self, p: Point) -> Self;
    /// Whether the boxes overlap or share an edge.
    fn touches(&self, other: &Self) -> bool;
    /// Whether the point lies inside or on the edge of the box.
    fn holds(&self, p: Point) -> bool;
    /// The overlapping region, or a void box.
    fn overlap(&self, other: &Self) -> Self;
    /// The area, with void boxes having none.
    fn surface(&self) -> f64;
}

impl RectExt for Rect {
    #[inline]
    fn void() -> Self {
        Rect::new(
            point(f64::INFINITY, f64::INFINITY),
            point(f64::NEG_INFINITY, f64::NEG_INFINITY),
        )
    }

    #[inline]
    fn is_void(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    #[inline]
    fn from_corners(a: Point, b: Point) -> Self {
        Rect::new(a.min(b), a.max(b))
    }

    #[inline]
    fn merge(&self, other: &Self) -> Self {
        if self.is_void() {
            return *other;
        }
        if other.is_void() {
            return *self;
        }
        Rect::new(self.min.min(other.min), self.max.max(other.max))
    }

    #[inline]
    fn merge_point(&self, p: Point) -> Self {
        self.merge(&Rect::new(p, p))
    }

    #[inline]
    fn touches(&self, other: &Self) -> bool {
        !self.is_void()
            && !other.is_void()
            && self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    #[inline]
    fn holds(&self, p: Point) -> bool {
        !self.is_void()
            && p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
    }

    #[inline]
    fn overlap(&self, other: &Self) -> Self {
        if self.touches(other) {
            Rect::new(self.min.max(other.min), self.max.min(other.max))
        } else {
            Rect::void()
        }
    }

    #[inline]
    fn surface(&self) -> f64 {
        if self.is_void() {
            0.0
        } else {
            self.width() * self.height()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_boxes_merge() {
        let line = Rect::from_corners(point(0.0, 0.0), point(10.0, 0.0));
        assert!(!line.is_void());
        assert_eq!(line.surface(), 0.0);

        let merged = Rect::void().merge(&line).merge_point(point(5.0, 3.0));
        assert_eq!(merged, Rect::new(point(0.0, 0.0), point(10.0, 3.0)));
        assert!(merged.holds(point(10.0, 3.0)));
        assert!(!merged.holds(point(10.5, 3.0)));
    }

    #[test]
    fn touching() {
        let a = Rect::from_corners(point(0.0, 0.0), point(1.0, 1.0));
        let b = Rect::from_corners(point(1.0, 0.0), point(2.0, 1.0));
        let c = Rect::from_corners(point(3.0, 0.0), point(4.0, 1.0));
        assert!(a.touches(&b));
        assert!(!a.touches(&c));
        assert!(!a.touches(&Rect::void()));
        assert_eq!(a.overlap(&b).surface(), 0.0);
        assert!(a.overlap(&c).is_void());
    }
}
