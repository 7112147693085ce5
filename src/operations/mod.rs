// MIT/Apache2 License

//! Hit testing and cutting geometry for stroke nodes.

mod ellipse;
mod polygon;
mod primitives;

pub use ellipse::*;
pub use polygon::*;
pub use primitives::*;

use crate::{
    findices::StrokeFIndices,
    geometry::{Contour, ContourSegment, Point, Quad, Rect, Vector},
    node_data::StrokeNodeData,
    stylus::StylusShape,
    Result,
};

/// The node geometry of a stylus shape, chosen once per stroke.
#[derive(Debug, Clone)]
pub enum NodeOperations {
    Polygon(PolygonOperations),
    Ellipse(EllipseOperations),
}

macro_rules! dispatch {
    ($self: expr, $ops: ident => $e: expr) => {
        match $self {
            NodeOperations::Polygon($ops) => $e,
            NodeOperations::Ellipse($ops) => $e,
        }
    };
}

impl NodeOperations {
    /// Create the operations matching the shape's tip.
    pub fn new(shape: &StylusShape) -> Result<Self> {
        if shape.is_ellipse() {
            Ok(NodeOperations::Ellipse(EllipseOperations::new(shape)?))
        } else {
            Ok(NodeOperations::Polygon(PolygonOperations::from_shape(shape)?))
        }
    }

    #[inline]
    pub fn is_ellipse(&self) -> bool {
        matches!(self, NodeOperations::Ellipse(_))
    }

    /// The outline vertices of the unscaled nib. For ellipses these are the
    /// control points of its Bezier outline.
    #[inline]
    pub fn vertices(&self) -> &[Vector] {
        dispatch!(self, ops => ops.vertices())
    }

    #[inline]
    pub fn node_bounds(&self, node: &StrokeNodeData) -> Rect {
        dispatch!(self, ops => ops.node_bounds(node))
    }

    #[inline]
    pub fn node_contour_points(&self, node: &StrokeNodeData, buffer: &mut Vec<Point>) {
        dispatch!(self, ops => ops.node_contour_points(node, buffer))
    }

    #[inline]
    pub fn connecting_quad(&self, begin: &StrokeNodeData, end: &StrokeNodeData) -> Quad {
        dispatch!(self, ops => ops.connecting_quad(begin, end))
    }

    #[inline]
    pub fn contour_segments(&self, node: &StrokeNodeData, quad: &Quad) -> Contour {
        dispatch!(self, ops => ops.contour_segments(node, quad))
    }

    #[inline]
    pub fn non_bezier_contour_segments(&self, begin: &StrokeNodeData, end: &StrokeNodeData) -> Contour {
        dispatch!(self, ops => ops.non_bezier_contour_segments(begin, end))
    }

    #[inline]
    pub fn hit_test_segment(
        &self,
        begin: &StrokeNodeData,
        end: &StrokeNodeData,
        quad: &Quad,
        hit_begin: Point,
        hit_end: Point,
    ) -> bool {
        dispatch!(self, ops => ops.hit_test_segment(begin, end, quad, hit_begin, hit_end))
    }

    #[inline]
    pub fn hit_test_contour(
        &self,
        begin: &StrokeNodeData,
        end: &StrokeNodeData,
        quad: &Quad,
        hit_contour: &[ContourSegment],
    ) -> bool {
        dispatch!(self, ops => ops.hit_test_contour(begin, end, quad, hit_contour))
    }

    #[inline]
    pub fn cut_test_segment(
        &self,
        begin: &StrokeNodeData,
        end: &StrokeNodeData,
        quad: &Quad,
        hit_begin: Point,
        hit_end: Point,
    ) -> StrokeFIndices {
        dispatch!(self, ops => ops.cut_test_segment(begin, end, quad, hit_begin, hit_end))
    }

    #[inline]
    pub fn cut_test_contour(
        &self,
        begin: &StrokeNodeData,
        end: &StrokeNodeData,
        quad: &Quad,
        hit_contour: &[ContourSegment],
    ) -> StrokeFIndices {
        dispatch!(self, ops => ops.cut_test_contour(begin, end, quad, hit_contour))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point;

    #[test]
    fn picks_variant_from_shape() {
        let ops = NodeOperations::new(&StylusShape::ellipse(4.0, 4.0).unwrap()).unwrap();
        assert!(ops.is_ellipse());
        assert_eq!(ops.vertices().len(), 12);

        let ops = NodeOperations::new(&StylusShape::rectangle(4.0, 2.0).unwrap()).unwrap();
        assert!(!ops.is_ellipse());
        assert_eq!(ops.vertices().len(), 4);
        assert_eq!(
            ops.node_bounds(&StrokeNodeData::at(point(1.0, 1.0))),
            Rect::new(point(-1.0, 0.0), point(3.0, 2.0))
        );
    }
}
