// MIT/Apache2 License

use super::{
    polygon::PolygonOperations,
    primitives::{adjust_findex, hit_test_quad_segment, is_invalid_cut_test_result, nearest, projection,
        projection_findex, where_is_vector_about_vector, HitResult},
};
use crate::{
    findices::StrokeFIndices,
    geometry::{points_close, Angle, Contour, ContourSegment, Point, Quad, Rect, Transform, Vector},
    node_data::StrokeNodeData,
    stylus::StylusShape,
    util::{are_close, greater_than_or_close, is_between_zero_and_one, is_zero, less_than_or_close},
    Error, Result,
};

/// Geometry of an elliptical nib.
///
/// Every query is first mapped into a space where the nib is a circle of
/// radius `radius`, which turns the hit and cut tests into closed-form
/// circle math. The polygonal approximation of the ellipse (the control
/// points of its Bezier outline) serves bounds and contour queries.
#[derive(Debug, Clone)]
pub struct EllipseOperations {
    polygon: PolygonOperations,
    radius: f64,
    /// `None` when the nib already is a circle in stroke space.
    node_shape_to_circle: Option<Transform>,
    circle_to_node_shape: Option<Transform>,
}

#[inline]
fn non_identity(transform: Transform) -> Option<Transform> {
    if transform == Transform::identity() {
        None
    } else {
        Some(transform)
    }
}

impl EllipseOperations {
    pub fn new(shape: &StylusShape) -> Result<Self> {
        debug_assert!(shape.is_ellipse());
        let polygon = PolygonOperations::from_shape(shape)?;

        let radius_x = shape.width() * 0.5;
        let radius_y = shape.height() * 0.5;
        let radius = radius_x.max(radius_y);

        let transform = *shape.transform();
        let mut node_shape_to_circle = transform.inverse().ok_or(Error::NonInvertibleTransform)?;
        let circle_to_node_shape = if are_close(radius_x, radius_y) {
            transform
        } else {
            if !is_zero(shape.rotation()) {
                node_shape_to_circle = node_shape_to_circle.then_rotate(Angle::degrees(-shape.rotation()));
            }

            // stretch the short axis
            let (sx, sy) = if radius_x > radius_y {
                (1.0, radius_x / radius_y)
            } else {
                (radius_y / radius_x, 1.0)
            };
            node_shape_to_circle = node_shape_to_circle.then_scale(sx, sy);
            node_shape_to_circle
                .inverse()
                .ok_or(Error::NonInvertibleTransform)?
        };

        Ok(Self {
            polygon,
            radius,
            node_shape_to_circle: non_identity(node_shape_to_circle),
            circle_to_node_shape: non_identity(circle_to_node_shape),
        })
    }

    /// Radius of the nib in circle space.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The Bezier control points of the nib outline.
    #[inline]
    pub fn vertices(&self) -> &[Vector] {
        self.polygon.vertices()
    }

    #[inline]
    pub fn node_bounds(&self, node: &StrokeNodeData) -> Rect {
        self.polygon.node_bounds(node)
    }

    #[inline]
    pub fn node_contour_points(&self, node: &StrokeNodeData, buffer: &mut Vec<Point>) {
        self.polygon.node_contour_points(node, buffer)
    }

    #[inline]
    fn to_circle(&self, v: Vector) -> Vector {
        match self.node_shape_to_circle {
            Some(ref t) => t.transform_vector(v),
            None => v,
        }
    }

    #[inline]
    fn to_node_shape(&self, v: Vector) -> Vector {
        match self.circle_to_node_shape {
            Some(ref t) => t.transform_vector(v),
            None => v,
        }
    }

    /// The quadrangle made of the two outer tangents of the nodes.
    pub fn connecting_quad(&self, begin: &StrokeNodeData, end: &StrokeNodeData) -> Quad {
        if begin.is_empty() || end.is_empty() || points_close(begin.position(), end.position()) {
            return Quad::EMPTY;
        }

        let mut spine = self.to_circle(end.position() - begin.position());
        let begin_radius = self.radius * begin.pressure_factor();
        let end_radius = self.radius * end.pressure_factor();

        let distance_squared = spine.square_length();
        let delta = end_radius - begin_radius;
        let delta_squared = if is_zero(delta) { 0.0 } else { delta * delta };

        if less_than_or_close(distance_squared, delta_squared) {
            // one circle contains the other
            return Quad::EMPTY;
        }

        let distance = distance_squared.sqrt();
        spine /= distance;

        // turn left
        let mut rad = Vector::new(spine.y, -spine.x);

        let r_sin_squared = delta_squared / distance_squared;
        let (left_tangent, right_tangent) = if is_zero(r_sin_squared) {
            (rad, -rad)
        } else {
            rad *= (1.0 - r_sin_squared).sqrt();
            spine *= r_sin_squared.sqrt();
            if begin.pressure_factor() < end.pressure_factor() {
                spine = -spine;
            }
            (spine + rad, spine - rad)
        };

        let left_tangent = self.to_node_shape(left_tangent);
        let right_tangent = self.to_node_shape(right_tangent);

        Quad::new(
            begin.position() + left_tangent * begin_radius,
            end.position() + left_tangent * end_radius,
            end.position() + right_tangent * end_radius,
            begin.position() + right_tangent * begin_radius,
        )
    }

    /// The outline of the node joined to its predecessor by `quad`, using a
    /// true arc around the node. Only circles have an arc outline; for other
    /// ellipses the contour is empty and callers use
    /// [`non_bezier_contour_segments`](Self::non_bezier_contour_segments).
    pub fn contour_segments(&self, node: &StrokeNodeData, quad: &Quad) -> Contour {
        debug_assert!(!node.is_empty());
        let mut result = Contour::new();

        if quad.is_empty() {
            let start = node.position() + Vector::new(self.radius * node.pressure_factor(), 0.0);
            result.push(ContourSegment::arc(start, start, node.position()));
        } else if self.node_shape_to_circle.is_none() {
            result.push(ContourSegment::line(quad.a, quad.b));
            result.push(ContourSegment::arc(quad.b, quad.c, node.position()));
            result.push(ContourSegment::line(quad.c, quad.d));
            result.push(ContourSegment::line(quad.d, quad.a));
        }

        result
    }

    /// The outline built from the polygonal approximation of the ellipse.
    #[inline]
    pub fn non_bezier_contour_segments(&self, begin: &StrokeNodeData, end: &StrokeNodeData) -> Contour {
        self.polygon.non_bezier_contour_segments(begin, end)
    }

    /// Pick the node that contains the other when there is no quad, or the
    /// begin node otherwise. The second node is empty if only one needs
    /// testing.
    #[inline]
    fn big_and_small(
        &self,
        begin: &StrokeNodeData,
        end: &StrokeNodeData,
        quad: &Quad,
    ) -> (StrokeNodeData, StrokeNodeData) {
        if begin.is_empty() || (quad.is_empty() && end.pressure_factor() > begin.pressure_factor()) {
            (*end, StrokeNodeData::EMPTY)
        } else {
            (*begin, *end)
        }
    }

    pub fn hit_test_segment(
        &self,
        begin: &StrokeNodeData,
        end: &StrokeNodeData,
        quad: &Quad,
        hit_begin_point: Point,
        hit_end_point: Point,
    ) -> bool {
        let (big, small) = self.big_and_small(begin, end, quad);

        let hit_begin = self.to_circle(hit_begin_point - big.position());
        let hit_end = self.to_circle(hit_end_point - big.position());

        let big_radius = self.radius * big.pressure_factor();
        if nearest(hit_begin, hit_end).square_length() <= big_radius * big_radius {
            return true;
        }

        if quad.is_empty() {
            return false;
        }

        let spine = self.to_circle(small.position() - big.position());
        let small_radius = self.radius * small.pressure_factor();
        nearest(hit_begin - spine, hit_end - spine).square_length() <= small_radius * small_radius
            || hit_test_quad_segment(quad, hit_begin_point, hit_end_point)
    }

    /// Whether a closed contour overlaps the nodes and their quad. Arc
    /// segments of the hitting contour are not tested.
    pub fn hit_test_contour(
        &self,
        begin: &StrokeNodeData,
        end: &StrokeNodeData,
        quad: &Quad,
        hit_contour: &[ContourSegment],
    ) -> bool {
        let (big, small) = self.big_and_small(begin, end, quad);

        let (spine, small_radius_squared) = if small.is_empty() {
            (Vector::zero(), 0.0)
        } else {
            let small_radius = self.radius * small.pressure_factor();
            (
                self.to_circle(small.position() - big.position()),
                small_radius * small_radius,
            )
        };
        let big_radius = self.radius * big.pressure_factor();
        let big_radius_squared = big_radius * big_radius;

        // whether the ink lies inside the hitting contour
        let mut is_inside = true;

        for hit_segment in hit_contour.iter().filter(|s| !s.is_arc()) {
            let hit_begin = hit_segment.begin() - big.position();
            let hit_end = self.to_circle(hit_begin + hit_segment.vector());
            let hit_begin = self.to_circle(hit_begin);

            if nearest(hit_begin, hit_end).square_length() <= big_radius_squared {
                return true;
            }

            if !quad.is_empty()
                && (nearest(hit_begin - spine, hit_end - spine).square_length() <= small_radius_squared
                    || hit_test_quad_segment(quad, hit_segment.begin(), hit_segment.end()))
            {
                return true;
            }

            if is_inside
                && where_is_vector_about_vector(end.position() - hit_segment.begin(), hit_segment.vector())
                    != HitResult::Right
            {
                is_inside = false;
            }
        }

        is_inside
    }

    pub fn cut_test_segment(
        &self,
        begin: &StrokeNodeData,
        end: &StrokeNodeData,
        quad: &Quad,
        hit_begin_point: Point,
        hit_end_point: Point,
    ) -> StrokeFIndices {
        // everything relative to the end node
        let spine = if begin.is_empty() {
            Vector::zero()
        } else {
            self.to_circle(begin.position() - end.position())
        };
        let hit_begin = self.to_circle(hit_begin_point - end.position());
        let hit_end = self.to_circle(hit_end_point - end.position());

        let mut result = StrokeFIndices::empty();

        let end_radius = self.radius * end.pressure_factor();
        let mut begin_radius = 0.0;
        if nearest(hit_begin, hit_end).square_length() <= end_radius * end_radius {
            result.set_end_findex(StrokeFIndices::AFTER_LAST);
            result.set_begin_findex(if begin.is_empty() {
                StrokeFIndices::BEFORE_FIRST
            } else {
                1.0
            });
        }

        if !begin.is_empty() {
            begin_radius = self.radius * begin.pressure_factor();
            if nearest(hit_begin - spine, hit_end - spine).square_length() <= begin_radius * begin_radius {
                result.set_begin_findex(StrokeFIndices::BEFORE_FIRST);
                if !are_close(result.end_findex(), StrokeFIndices::AFTER_LAST) {
                    result.set_end_findex(0.0);
                }
            }
        }

        if result.is_full()
            || quad.is_empty()
            || (result.is_empty() && !hit_test_quad_segment(quad, hit_begin_point, hit_end_point))
        {
            return result;
        }

        if !are_close(result.begin_findex(), StrokeFIndices::BEFORE_FIRST) {
            result.set_begin_findex(self.clip_test(
                -spine,
                begin_radius,
                end_radius,
                hit_begin - spine,
                hit_end - spine,
            ));
        }

        if !are_close(result.end_findex(), StrokeFIndices::AFTER_LAST) {
            result.set_end_findex(1.0 - self.clip_test(spine, end_radius, begin_radius, hit_begin, hit_end));
        }

        if is_invalid_cut_test_result(&result) {
            return StrokeFIndices::empty();
        }

        result
    }

    /// Cut test against a closed contour. Arc segments of the hitting
    /// contour are not tested.
    pub fn cut_test_contour(
        &self,
        begin: &StrokeNodeData,
        end: &StrokeNodeData,
        quad: &Quad,
        hit_contour: &[ContourSegment],
    ) -> StrokeFIndices {
        let spine = if begin.is_empty() {
            Vector::zero()
        } else {
            self.to_circle(begin.position() - end.position())
        };

        let end_radius = self.radius * end.pressure_factor();
        let end_radius_squared = end_radius * end_radius;
        let (begin_radius, begin_radius_squared) = if begin.is_empty() {
            (0.0, 0.0)
        } else {
            let r = self.radius * begin.pressure_factor();
            (r, r * r)
        };

        let mut is_inside = true;
        let mut result = StrokeFIndices::empty();

        for hit_segment in hit_contour.iter().filter(|s| !s.is_arc()) {
            let hit_begin = hit_segment.begin() - end.position();
            let hit_end = self.to_circle(hit_begin + hit_segment.vector());
            let hit_begin = self.to_circle(hit_begin);

            let mut is_hit = false;

            if nearest(hit_begin, hit_end).square_length() < end_radius_squared {
                is_hit = true;
                if !are_close(result.end_findex(), StrokeFIndices::AFTER_LAST) {
                    result.set_end_findex(StrokeFIndices::AFTER_LAST);
                    if begin.is_empty() {
                        result.set_begin_findex(StrokeFIndices::BEFORE_FIRST);
                        break;
                    }
                    if are_close(result.begin_findex(), StrokeFIndices::BEFORE_FIRST) {
                        break;
                    }
                }
            }

            if !begin.is_empty()
                && (!is_hit || !are_close(result.begin_findex(), StrokeFIndices::BEFORE_FIRST))
                && nearest(hit_begin - spine, hit_end - spine).square_length() < begin_radius_squared
            {
                is_hit = true;
                if !are_close(result.begin_findex(), StrokeFIndices::BEFORE_FIRST) {
                    result.set_begin_findex(StrokeFIndices::BEFORE_FIRST);
                    if are_close(result.end_findex(), StrokeFIndices::AFTER_LAST) {
                        break;
                    }
                }
            }

            if begin.is_empty()
                || (!is_hit
                    && (quad.is_empty()
                        || !hit_test_quad_segment(quad, hit_segment.begin(), hit_segment.end())))
            {
                if is_inside
                    && where_is_vector_about_vector(end.position() - hit_segment.begin(), hit_segment.vector())
                        != HitResult::Right
                {
                    is_inside = false;
                }
                continue;
            }

            is_inside = false;

            self.calculate_cut_locations(spine, hit_begin, hit_end, end_radius, begin_radius, &mut result);
            if result.is_full() {
                break;
            }
        }

        if !result.is_full() {
            if is_inside {
                debug_assert!(result.is_empty());
                result = StrokeFIndices::full();
            } else if are_close(result.end_findex(), StrokeFIndices::BEFORE_FIRST)
                && !are_close(result.begin_findex(), StrokeFIndices::AFTER_LAST)
            {
                result.set_end_findex(StrokeFIndices::AFTER_LAST);
            } else if are_close(result.begin_findex(), StrokeFIndices::AFTER_LAST)
                && !are_close(result.end_findex(), StrokeFIndices::BEFORE_FIRST)
            {
                result.set_begin_findex(StrokeFIndices::BEFORE_FIRST);
            }
        }

        if is_invalid_cut_test_result(&result) {
            return StrokeFIndices::empty();
        }

        result
    }

    /// Where a segment is first touched by a circle moving from the origin
    /// along `spine` while its radius goes from `begin_radius` to
    /// `end_radius`. Returns a fraction of the spine.
    pub(crate) fn clip_test(
        &self,
        spine: Vector,
        begin_radius: f64,
        end_radius: f64,
        hit_begin: Vector,
        hit_end: Vector,
    ) -> f64 {
        if is_zero(spine.x) && is_zero(spine.y) {
            // the nib stays in place and only the pressure changes
            debug_assert!(!are_close(begin_radius, end_radius));
            let nearest = nearest(hit_begin, hit_end);
            let radius = if nearest.x == 0.0 {
                nearest.y.abs()
            } else if nearest.y == 0.0 {
                nearest.x.abs()
            } else {
                nearest.length()
            };
            return adjust_findex((radius - begin_radius) / (end_radius - begin_radius));
        }

        if points_close(hit_begin.to_point(), hit_end.to_point()) {
            return self.clip_test_point(spine, begin_radius, end_radius, hit_begin);
        }

        let hit_vector = hit_end - hit_begin;
        let findex = if is_zero(spine.cross(hit_vector)) {
            // parallel
            self.clip_test_point(spine, begin_radius, end_radius, nearest(hit_begin, hit_end))
        } else {
            // the point of the hitting line nearest to the begin node
            let x = projection_findex(hit_begin, hit_end);
            let p1_xp = hit_begin + hit_vector * x;
            if p1_xp.square_length() < begin_radius * begin_radius {
                debug_assert!(!is_between_zero_and_one(x));
                self.clip_test_point(
                    spine,
                    begin_radius,
                    end_radius,
                    if x < 0.0 { hit_begin } else { hit_end },
                )
            } else {
                // projection of the end node onto the line from the begin
                // node to that point
                let p1_p2p = spine + projection(-spine, p1_xp - spine);
                if is_zero(p1_p2p.square_length()) || is_zero(end_radius - begin_radius + p1_p2p.length()) {
                    return 1.0;
                }

                let findex = (p1_xp.length() - begin_radius) / (end_radius - begin_radius + p1_p2p.length());

                // if the touch point misses the segment, clip against its
                // nearest end instead
                let split = spine * findex;
                let r = projection_findex(hit_begin - split, hit_end - split);
                if is_between_zero_and_one(r) {
                    findex
                } else {
                    self.clip_test_point(
                        spine,
                        begin_radius,
                        end_radius,
                        if r < 0.0 { hit_begin } else { hit_end },
                    )
                }
            }
        };

        adjust_findex(findex)
    }

    /// Solve `|hit - s·spine| = begin_radius + s·(end_radius - begin_radius)`
    /// for the smallest `s` in `[0, 1]`.
    pub(crate) fn clip_test_point(&self, spine: Vector, begin_radius: f64, end_radius: f64, hit: Vector) -> f64 {
        let radius_delta = end_radius - begin_radius;
        let a = spine.square_length() - radius_delta * radius_delta;
        let b = -2.0 * (hit.dot(spine) + begin_radius * radius_delta);
        let c = hit.square_length() - begin_radius * begin_radius;

        if is_zero(a) || !greater_than_or_close(b * b, 4.0 * a * c) {
            return 1.0;
        }

        let root = (b * b - 4.0 * a * c).sqrt();
        let s1 = (-b + root) / (2.0 * a);
        let s2 = (-b - root) / (2.0 * a);

        let findex = match (is_between_zero_and_one(s1), is_between_zero_and_one(s2)) {
            (true, true) => s1.min(s2),
            (true, false) => s1,
            (false, true) => s2,
            // both roots are just outside of the range
            (false, false) => {
                if s1 > 1.0 && s2 > 1.0 {
                    1.0
                } else if s1 < 0.0 && s2 < 0.0 {
                    0.0
                } else if s1.min(s2).abs() < (s1.max(s2) - 1.0).abs() {
                    0.0
                } else {
                    1.0
                }
            }
        };

        adjust_findex(findex)
    }

    /// Whether the node at the origin is on the left of the segment, which
    /// must not be parallel to the spine.
    pub(crate) fn where_is_node_about_segment(spine: Vector, seg_begin: Vector, seg_end: Vector) -> HitResult {
        let seg_vector = seg_end - seg_begin;
        if where_is_vector_about_vector(-seg_begin, seg_vector) == HitResult::Left
            && !is_zero(spine.cross(seg_vector))
        {
            HitResult::Left
        } else {
            HitResult::Right
        }
    }

    /// Narrow `result` down with one hitting segment, given relative to the
    /// end node.
    fn calculate_cut_locations(
        &self,
        spine: Vector,
        hit_begin: Vector,
        hit_end: Vector,
        end_radius: f64,
        begin_radius: f64,
        result: &mut StrokeFIndices,
    ) {
        if !are_close(result.end_findex(), StrokeFIndices::AFTER_LAST)
            && Self::where_is_node_about_segment(spine, hit_begin, hit_end) == HitResult::Left
        {
            let findex = 1.0 - self.clip_test(spine, end_radius, begin_radius, hit_begin, hit_end);
            if findex > result.end_findex() {
                result.set_end_findex(findex);
            }
        }

        if !are_close(result.begin_findex(), StrokeFIndices::BEFORE_FIRST) {
            let hit_begin = hit_begin - spine;
            let hit_end = hit_end - spine;
            if Self::where_is_node_about_segment(-spine, hit_begin, hit_end) == HitResult::Left {
                let findex = self.clip_test(-spine, begin_radius, end_radius, hit_begin, hit_end);
                if findex < result.begin_findex() {
                    result.set_begin_findex(findex);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point;
    use approx::assert_relative_eq;

    fn circle(diameter: f64) -> EllipseOperations {
        EllipseOperations::new(&StylusShape::ellipse(diameter, diameter).unwrap()).unwrap()
    }

    fn rect_contour(min: Point, max: Point) -> Vec<ContourSegment> {
        let b = point(max.x, min.y);
        let d = point(min.x, max.y);
        vec![
            ContourSegment::line(min, b),
            ContourSegment::line(b, max),
            ContourSegment::line(max, d),
            ContourSegment::line(d, min),
        ]
    }

    #[test]
    fn circle_quad() {
        let ops = circle(10.0);
        let quad = ops.connecting_quad(
            &StrokeNodeData::at(point(0.0, 0.0)),
            &StrokeNodeData::at(point(10.0, 0.0)),
        );
        assert_eq!(quad.a, point(0.0, -5.0));
        assert_eq!(quad.b, point(10.0, -5.0));
        assert_eq!(quad.c, point(10.0, 5.0));
        assert_eq!(quad.d, point(0.0, 5.0));
    }

    #[test]
    fn flat_ellipse_quad() {
        let ops = EllipseOperations::new(&StylusShape::ellipse(10.0, 4.0).unwrap()).unwrap();
        assert_eq!(ops.radius(), 5.0);
        let quad = ops.connecting_quad(
            &StrokeNodeData::at(point(0.0, 0.0)),
            &StrokeNodeData::at(point(20.0, 0.0)),
        );
        assert_relative_eq!(quad.a.y, -2.0, epsilon = 1e-12);
        assert_relative_eq!(quad.b.x, 20.0, epsilon = 1e-12);
        assert_relative_eq!(quad.c.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(quad.d.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn contained_circles_have_no_quad() {
        let ops = circle(10.0);
        let quad = ops.connecting_quad(
            &StrokeNodeData::new(point(0.0, 0.0), 1.75),
            &StrokeNodeData::new(point(1.0, 0.0), 0.25),
        );
        assert!(quad.is_empty());
    }

    #[test]
    fn rejects_singular_transform() {
        let shape = StylusShape::ellipse(4.0, 2.0)
            .unwrap()
            .with_transform(Transform::scale(0.0, 1.0));
        assert_eq!(
            EllipseOperations::new(&shape).unwrap_err(),
            Error::NonInvertibleTransform
        );
    }

    #[test]
    fn contours() {
        let ops = circle(4.0);
        let node = StrokeNodeData::at(point(20.0, 0.0));
        let alone = ops.contour_segments(&node, &Quad::EMPTY);
        assert_eq!(alone.len(), 1);
        assert!(alone[0].is_arc());
        assert_eq!(alone[0].begin(), point(22.0, 0.0));
        assert_eq!(alone[0].begin() + alone[0].radius(), point(20.0, 0.0));

        let begin = StrokeNodeData::at(point(0.0, 0.0));
        let quad = ops.connecting_quad(&begin, &node);
        let joined = ops.contour_segments(&node, &quad);
        assert_eq!(joined.len(), 4);
        assert!(joined[1].is_arc());

        let flat = EllipseOperations::new(&StylusShape::ellipse(4.0, 2.0).unwrap()).unwrap();
        let quad = flat.connecting_quad(&begin, &node);
        assert!(flat.contour_segments(&node, &quad).is_empty());
        assert!(!flat.non_bezier_contour_segments(&begin, &node).is_empty());
    }

    #[test]
    fn segment_tests() {
        let ops = circle(4.0);
        let begin = StrokeNodeData::at(point(0.0, 0.0));
        let end = StrokeNodeData::at(point(20.0, 0.0));
        let quad = ops.connecting_quad(&begin, &end);

        assert!(ops.hit_test_segment(&begin, &end, &quad, point(10.0, -10.0), point(10.0, 10.0)));
        assert!(!ops.hit_test_segment(&begin, &end, &quad, point(30.0, -10.0), point(30.0, 10.0)));

        let cut = ops.cut_test_segment(&begin, &end, &quad, point(10.0, -10.0), point(10.0, 10.0));
        assert_relative_eq!(cut.begin_findex(), 0.4, epsilon = 1e-9);
        assert_relative_eq!(cut.end_findex(), 0.6, epsilon = 1e-9);

        let cut = ops.cut_test_segment(&begin, &end, &quad, point(30.0, -10.0), point(30.0, 10.0));
        assert!(cut.is_empty());

        let cut = ops.cut_test_segment(&begin, &end, &quad, point(-1.0, -10.0), point(-1.0, 10.0));
        assert_eq!(cut.begin_findex(), StrokeFIndices::BEFORE_FIRST);
        assert!(cut.end_findex() > 0.0 && cut.end_findex() < 1.0);
    }

    #[test]
    fn contour_tests() {
        let ops = circle(4.0);
        let begin = StrokeNodeData::at(point(0.0, 0.0));
        let end = StrokeNodeData::at(point(20.0, 0.0));
        let quad = ops.connecting_quad(&begin, &end);

        let middle = rect_contour(point(8.0, -10.0), point(12.0, 10.0));
        assert!(ops.hit_test_contour(&begin, &end, &quad, &middle));
        let cut = ops.cut_test_contour(&begin, &end, &quad, &middle);
        assert_relative_eq!(cut.begin_findex(), 0.3, epsilon = 1e-9);
        assert_relative_eq!(cut.end_findex(), 0.7, epsilon = 1e-9);

        let around = rect_contour(point(-10.0, -10.0), point(30.0, 10.0));
        assert!(ops.hit_test_contour(&begin, &end, &quad, &around));
        assert!(ops.cut_test_contour(&begin, &end, &quad, &around).is_full());

        let far = rect_contour(point(50.0, 50.0), point(60.0, 60.0));
        assert!(!ops.hit_test_contour(&begin, &end, &quad, &far));
        assert!(ops.cut_test_contour(&begin, &end, &quad, &far).is_empty());
    }

    #[test]
    fn clip_against_point() {
        let ops = circle(4.0);
        // a circle of radius 2 moving 20 units right touches (10, 0) at x = 8
        assert_relative_eq!(
            ops.clip_test_point(Vector::new(20.0, 0.0), 2.0, 2.0, Vector::new(10.0, 0.0)),
            0.4,
            epsilon = 1e-12
        );
        // never reached
        assert_eq!(
            ops.clip_test_point(Vector::new(20.0, 0.0), 2.0, 2.0, Vector::new(10.0, 30.0)),
            1.0
        );
        // growing in place
        assert_relative_eq!(
            ops.clip_test(Vector::zero(), 2.0, 6.0, Vector::new(4.0, -5.0), Vector::new(4.0, 5.0)),
            0.5,
            epsilon = 1e-12
        );
    }
}
