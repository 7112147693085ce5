// MIT/Apache2 License

mod outline;

pub use outline::*;

use crate::{
    findices::StrokeFIndices,
    geometry::{Contour, Point, Quad, Rect, RectExt},
    node_data::StrokeNodeData,
    operations::NodeOperations,
    util::are_close,
};
use std::cell::Cell;

/// A node of a stroke together with its predecessor.
///
/// The node and the quadrangle connecting it to the previous node make up
/// one segment of the stroke outline. The first node of a stroke has an
/// empty predecessor and its outline is the nib alone.
#[derive(Debug, Clone)]
pub struct StrokeNode<'a> {
    operations: &'a NodeOperations,
    index: usize,
    this_node: StrokeNodeData,
    last_node: StrokeNodeData,
    is_last_node: bool,
    // computed on first use
    connecting_quad: Cell<Option<Quad>>,
}

impl<'a> StrokeNode<'a> {
    /// `index` is the index of the node on the stroke spine. Its predecessor
    /// is at `index - 1`.
    #[inline]
    pub(crate) fn new(
        operations: &'a NodeOperations,
        index: usize,
        this_node: StrokeNodeData,
        last_node: StrokeNodeData,
        is_last_node: bool,
    ) -> Self {
        debug_assert!(!this_node.is_empty());
        Self {
            operations,
            index,
            this_node,
            last_node,
            is_last_node,
            connecting_quad: Cell::new(None),
        }
    }

    /// Use a quad computed earlier for the same pair of nodes.
    #[inline]
    pub(crate) fn with_connecting_quad(self, quad: Quad) -> Self {
        self.connecting_quad.set(Some(quad));
        self
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.this_node.position()
    }

    #[inline]
    pub fn previous_position(&self) -> Point {
        self.last_node.position()
    }

    #[inline]
    pub fn pressure_factor(&self) -> f64 {
        self.this_node.pressure_factor()
    }

    #[inline]
    pub fn previous_pressure_factor(&self) -> f64 {
        self.last_node.pressure_factor()
    }

    #[inline]
    pub fn node_data(&self) -> &StrokeNodeData {
        &self.this_node
    }

    #[inline]
    pub fn previous_node_data(&self) -> &StrokeNodeData {
        &self.last_node
    }

    #[inline]
    pub fn is_ellipse(&self) -> bool {
        self.operations.is_ellipse()
    }

    #[inline]
    pub fn is_last_node(&self) -> bool {
        self.is_last_node
    }

    #[inline]
    pub fn operations(&self) -> &'a NodeOperations {
        self.operations
    }

    /// Bounds of the nib at this node.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.operations.node_bounds(&self.this_node)
    }

    /// Bounds of the nib at this node and the connecting quadrangle.
    #[inline]
    pub fn bounds_connected(&self) -> Rect {
        self.bounds().merge(&self.connecting_quad().bounds())
    }

    /// Append the outline of the nib at this node.
    #[inline]
    pub fn contour_points(&self, buffer: &mut Vec<Point>) {
        self.operations.node_contour_points(&self.this_node, buffer)
    }

    /// Append the outline of the nib at the previous node.
    #[inline]
    pub fn previous_contour_points(&self, buffer: &mut Vec<Point>) {
        self.operations.node_contour_points(&self.last_node, buffer)
    }

    /// The quadrangle connecting the previous node to this one. It is empty
    /// for the first node or when one node contains the other.
    pub fn connecting_quad(&self) -> Quad {
        match self.connecting_quad.get() {
            Some(quad) => quad,
            None => {
                let quad = self.operations.connecting_quad(&self.last_node, &self.this_node);
                self.connecting_quad.set(Some(quad));
                quad
            }
        }
    }

    /// The outline of this node and its connecting quadrangle, used when
    /// this node hits another stroke. Elliptical nibs use their polygonal
    /// approximation.
    pub fn contour_segments(&self) -> Contour {
        if self.is_ellipse() {
            self.operations
                .non_bezier_contour_segments(&self.last_node, &self.this_node)
        } else {
            self.operations
                .contour_segments(&self.this_node, &self.connecting_quad())
        }
    }

    /// Whether the outline of `hit_node` overlaps the outline of this node.
    pub fn hit_test(&self, hit_node: &StrokeNode<'_>) -> bool {
        let contour = hit_node.contour_segments();
        self.operations.hit_test_contour(
            &self.last_node,
            &self.this_node,
            &self.connecting_quad(),
            &contour,
        )
    }

    /// The part of the spine covered by the outline of `hit_node`, in
    /// stroke-wide fractional indices.
    pub fn cut_test(&self, hit_node: &StrokeNode<'_>) -> StrokeFIndices {
        let contour = hit_node.contour_segments();
        let cut_at = self.operations.cut_test_contour(
            &self.last_node,
            &self.this_node,
            &self.connecting_quad(),
            &contour,
        );

        if self.index == 0 {
            cut_at
        } else {
            self.bind_findices(cut_at)
        }
    }

    /// The part of the spine covered by a segment, bound for lasso hit
    /// testing.
    pub fn cut_test_segment(&self, begin: Point, end: Point) -> StrokeFIndices {
        let cut_at = self.operations.cut_test_segment(
            &self.last_node,
            &self.this_node,
            &self.connecting_quad(),
            begin,
            end,
        );
        debug_assert!(!cut_at.begin_findex().is_nan() && !cut_at.end_findex().is_nan());
        self.bind_findices_for_lasso_hit_test(cut_at)
    }

    /// Turn a range local to this segment into stroke-wide indices by adding
    /// the index of the previous node. Sentinels are kept.
    pub fn bind_findices(&self, mut fragment: StrokeFIndices) -> StrokeFIndices {
        if !fragment.is_empty() {
            let offset = self.index as f64 - 1.0;
            if !fragment.begins_before_first() {
                debug_assert!(fragment.begin_findex() >= 0.0 && fragment.begin_findex() <= 1.0);
                fragment.set_begin_findex(fragment.begin_findex() + offset);
            }
            if !fragment.ends_after_last() {
                debug_assert!(fragment.end_findex() >= 0.0 && fragment.end_findex() <= 1.0);
                fragment.set_end_findex(fragment.end_findex() + offset);
            }
        }
        fragment
    }

    /// Like [`bind_findices`](Self::bind_findices), but sentinels are
    /// replaced by the node indices they stand for, unless the range really
    /// runs off the stroke.
    pub fn bind_findices_for_lasso_hit_test(&self, mut fragment: StrokeFIndices) -> StrokeFIndices {
        if fragment.is_empty() {
            return fragment;
        }

        let offset = self.index as f64 - 1.0;
        if fragment.begins_before_first() {
            fragment.set_begin_findex(if self.index == 0 {
                StrokeFIndices::BEFORE_FIRST
            } else {
                offset
            });
        } else {
            fragment.set_begin_findex(fragment.begin_findex() + offset);
        }

        if fragment.ends_after_last() {
            fragment.set_end_findex(if self.is_last_node {
                StrokeFIndices::AFTER_LAST
            } else {
                self.index as f64
            });
        } else {
            fragment.set_end_findex(fragment.end_findex() + offset);
        }

        fragment
    }

    /// The spine point at a stroke-wide fractional index between the
    /// previous node and this one.
    pub fn point_at(&self, findex: f64) -> Point {
        if self.last_node.is_empty() {
            return self.this_node.position();
        }

        if are_close(findex, self.index as f64) {
            return self.this_node.position();
        }

        let fraction = findex - findex.floor();
        self.last_node
            .position()
            .lerp(self.this_node.position(), fraction)
    }

    /// The crossing of two segments, extended by a pixel's rounding in each
    /// direction. Segments that only touch end to start cross at that point.
    pub fn intersection(
        line1_start: Point,
        line1_end: Point,
        line2_start: Point,
        line2_end: Point,
    ) -> Option<Point> {
        let a1 = line1_end.y - line1_start.y;
        let b1 = line1_start.x - line1_end.x;
        let c1 = line1_end.x * line1_start.y - line1_start.x * line1_end.y;
        let a2 = line2_end.y - line2_start.y;
        let b2 = line2_start.x - line2_end.x;
        let c2 = line2_end.x * line2_start.y - line2_start.x * line2_end.y;

        let d = a1 * b2 - a2 * b1;
        if d != 0.0 {
            let x = (b1 * c2 - b2 * c1) / d;
            let y = (a2 * c1 - a1 * c2) / d;

            let within = |start: Point, end: Point| {
                let min = start.min(end);
                let max = start.max(end);
                min.x.floor() <= x && x <= max.x.ceil() && min.y.floor() <= y && y <= max.y.ceil()
            };

            if within(line1_start, line1_end) && within(line2_start, line2_end) {
                return Some(Point::new(x, y));
            }
        }

        if line1_end.x.trunc() == line2_start.x.trunc() && line1_end.y.trunc() == line2_start.y.trunc() {
            return Some(line1_end);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::point, stylus::StylusShape};
    use approx::assert_relative_eq;

    fn square_ops() -> NodeOperations {
        NodeOperations::new(&StylusShape::rectangle(8.0, 8.0).unwrap()).unwrap()
    }

    #[test]
    fn quad_is_cached() {
        let ops = square_ops();
        let node = StrokeNode::new(
            &ops,
            1,
            StrokeNodeData::at(point(20.0, 0.0)),
            StrokeNodeData::at(point(0.0, 0.0)),
            true,
        );
        let quad = node.connecting_quad();
        assert_eq!(quad.b, point(16.0, -4.0));
        let copy = node.clone();
        assert_eq!(copy.connecting_quad(), quad);
        assert_eq!(
            node.bounds_connected(),
            Rect::new(point(-4.0, -4.0), point(24.0, 4.0))
        );

        let seeded = StrokeNode::new(
            &ops,
            1,
            StrokeNodeData::at(point(20.0, 0.0)),
            StrokeNodeData::at(point(0.0, 0.0)),
            true,
        )
        .with_connecting_quad(Quad::EMPTY);
        assert!(seeded.connecting_quad().is_empty());
    }

    #[test]
    fn binding() {
        let ops = square_ops();
        let node = StrokeNode::new(
            &ops,
            3,
            StrokeNodeData::at(point(20.0, 0.0)),
            StrokeNodeData::at(point(0.0, 0.0)),
            false,
        );

        let bound = node.bind_findices(StrokeFIndices::new(0.25, 0.5));
        assert_relative_eq!(bound.begin_findex(), 2.25);
        assert_relative_eq!(bound.end_findex(), 2.5);

        let bound = node.bind_findices(StrokeFIndices::new(StrokeFIndices::BEFORE_FIRST, 0.5));
        assert_eq!(bound.begin_findex(), StrokeFIndices::BEFORE_FIRST);
        assert!(node.bind_findices(StrokeFIndices::empty()).is_empty());

        let bound = node.bind_findices_for_lasso_hit_test(StrokeFIndices::full());
        assert_eq!(bound.begin_findex(), 2.0);
        assert_eq!(bound.end_findex(), 3.0);
    }

    #[test]
    fn segment_cut_is_bound() {
        let ops = square_ops();
        let node = StrokeNode::new(
            &ops,
            2,
            StrokeNodeData::at(point(20.0, 0.0)),
            StrokeNodeData::at(point(0.0, 0.0)),
            true,
        );
        let cut = node.cut_test_segment(point(10.0, -10.0), point(10.0, 10.0));
        assert_relative_eq!(cut.begin_findex(), 1.3, epsilon = 1e-9);
        assert_relative_eq!(cut.end_findex(), 1.7, epsilon = 1e-9);

        let cut = node.cut_test_segment(point(20.0, -10.0), point(20.0, 10.0));
        assert_eq!(cut.end_findex(), StrokeFIndices::AFTER_LAST);
    }

    #[test]
    fn node_against_node() {
        let ops = square_ops();
        let ink = StrokeNode::new(
            &ops,
            1,
            StrokeNodeData::at(point(20.0, 0.0)),
            StrokeNodeData::at(point(0.0, 0.0)),
            true,
        );
        let eraser_ops = NodeOperations::new(&StylusShape::rectangle(4.0, 4.0).unwrap()).unwrap();
        let eraser = StrokeNode::new(
            &eraser_ops,
            0,
            StrokeNodeData::at(point(10.0, 0.0)),
            StrokeNodeData::EMPTY,
            true,
        );
        assert!(ink.hit_test(&eraser));
        let cut = ink.cut_test(&eraser);
        assert_relative_eq!(cut.begin_findex(), 0.2, epsilon = 1e-9);
        assert_relative_eq!(cut.end_findex(), 0.8, epsilon = 1e-9);

        let far = StrokeNode::new(
            &eraser_ops,
            0,
            StrokeNodeData::at(point(10.0, 40.0)),
            StrokeNodeData::EMPTY,
            true,
        );
        assert!(!ink.hit_test(&far));
        assert!(ink.cut_test(&far).is_empty());
    }

    #[test]
    fn points_along_spine() {
        let ops = square_ops();
        let node = StrokeNode::new(
            &ops,
            3,
            StrokeNodeData::at(point(20.0, 10.0)),
            StrokeNodeData::at(point(0.0, 0.0)),
            false,
        );
        assert_eq!(node.point_at(3.0), point(20.0, 10.0));
        let p = node.point_at(2.25);
        assert_relative_eq!(p.x, 5.0);
        assert_relative_eq!(p.y, 2.5);
    }

    #[test]
    fn line_intersections() {
        let p = StrokeNode::intersection(
            point(0.0, 0.0),
            point(10.0, 10.0),
            point(0.0, 10.0),
            point(10.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(p.x, 5.0);
        assert_relative_eq!(p.y, 5.0);

        assert!(StrokeNode::intersection(
            point(0.0, 0.0),
            point(1.0, 0.0),
            point(5.0, 5.0),
            point(6.0, 5.0)
        )
        .is_none());

        // parallel but joined end to start
        assert_eq!(
            StrokeNode::intersection(
                point(0.0, 0.0),
                point(1.0, 0.0),
                point(1.0, 0.0),
                point(2.0, 0.0)
            ),
            Some(point(1.0, 0.0))
        );
    }
}
