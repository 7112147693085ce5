// MIT/Apache2 License

use super::primitives::{
    adjust_findex, hit_test_polygon_circle, hit_test_polygon_segment, hit_test_quad_circle,
    hit_test_quad_segment, is_invalid_cut_test_result, is_outside, position_between_lines,
    projection, projection_findex, where_is_circle_about_segment, where_is_segment_about_segment,
    where_is_vector_about_arc, where_is_vector_about_vector, HitResult,
};
use crate::{
    findices::StrokeFIndices,
    geometry::{points_close, Contour, ContourSegment, Point, Quad, Rect, RectExt, Vector},
    node_data::StrokeNodeData,
    stylus::StylusShape,
    util::{are_close, is_between_zero_and_one, is_zero},
    Error, Result,
};

/// Geometry of a nib shaped like a convex polygon.
///
/// The vertices are stored once, unscaled and centered on the origin. Every
/// query scales them by a node's pressure factor, or scales the query down
/// by it, so that nothing is allocated per node.
#[derive(Debug, Clone)]
pub struct PolygonOperations {
    vertices: Vec<Vector>,
    shape_bounds: Rect,
}

#[inline]
fn lower_to(findex: &mut f64, candidate: f64) {
    if *findex > candidate && is_between_zero_and_one(candidate) {
        *findex = candidate;
    }
}

impl PolygonOperations {
    /// Create the operations for clockwise convex vertices.
    pub fn new(vertices: Vec<Vector>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(Error::DegeneratePolygon(vertices.len()));
        }

        let shape_bounds = vertices
            .iter()
            .fold(Rect::void(), |bounds, v| bounds.merge_point(v.to_point()));
        Ok(Self {
            vertices,
            shape_bounds,
        })
    }

    #[inline]
    pub fn from_shape(shape: &StylusShape) -> Result<Self> {
        Self::new(shape.vertices_as_vectors())
    }

    #[inline]
    pub fn vertices(&self) -> &[Vector] {
        &self.vertices
    }

    /// The bounds of the nib placed at the node.
    pub fn node_bounds(&self, node: &StrokeNodeData) -> Rect {
        let mut bounds = self.shape_bounds;
        let pressure_factor = node.pressure_factor();
        if !are_close(pressure_factor, 1.0) {
            bounds = Rect::new(bounds.min * pressure_factor, bounds.max * pressure_factor);
        }

        bounds.translate(node.position().to_vector())
    }

    /// Append the outline of the nib placed at the node.
    pub fn node_contour_points(&self, node: &StrokeNodeData, buffer: &mut Vec<Point>) {
        let position = node.position();
        let pressure_factor = node.pressure_factor();
        if are_close(pressure_factor, 1.0) {
            buffer.extend(self.vertices.iter().map(|v| position + *v));
        } else {
            buffer.extend(self.vertices.iter().map(|v| position + *v * pressure_factor));
        }
    }

    #[inline]
    fn vertex_at(&self, node: &StrokeNodeData, i: usize) -> Point {
        node.position() + self.vertices[i] * node.pressure_factor()
    }

    /// The closed outline of the node joined to its predecessor by `quad`.
    /// For an empty quad this is the outline of the node alone.
    pub fn contour_segments(&self, node: &StrokeNodeData, quad: &Quad) -> Contour {
        debug_assert!(!node.is_empty());
        let n = self.vertices.len();
        let mut result = Contour::new();

        if quad.is_empty() {
            let mut vertex = self.vertex_at(node, n - 1);
            for i in 0..n {
                let next_vertex = self.vertex_at(node, i);
                result.push(ContourSegment::line(vertex, next_vertex));
                vertex = next_vertex;
            }
            return result;
        }

        result.push(ContourSegment::line(quad.a, quad.b));

        // walk the outer edges of the node from B to C
        if let Some(mut i) = (0..n).find(|&i| self.vertex_at(node, i) == quad.b) {
            let mut vertex = quad.b;
            let mut j = 0;
            while j < n && vertex != quad.c {
                i = (i + 1) % n;
                let next_vertex = self.vertex_at(node, i);
                result.push(ContourSegment::line(vertex, next_vertex));
                vertex = next_vertex;
                j += 1;
            }
        }

        result.push(ContourSegment::line(quad.c, quad.d));
        result.push(ContourSegment::line(quad.d, quad.a));
        result
    }

    /// The polygonal outline of `end` joined to `begin`.
    pub fn non_bezier_contour_segments(&self, begin: &StrokeNodeData, end: &StrokeNodeData) -> Contour {
        let quad = if begin.is_empty() {
            Quad::EMPTY
        } else {
            self.connecting_quad(begin, end)
        };
        self.contour_segments(end, &quad)
    }

    /// The quadrangle tangent to both nodes, or [`Quad::EMPTY`] when the
    /// nodes coincide or one of them contains the other.
    pub fn connecting_quad(&self, begin: &StrokeNodeData, end: &StrokeNodeData) -> Quad {
        if begin.is_empty() || end.is_empty() || points_close(begin.position(), end.position()) {
            return Quad::EMPTY;
        }

        // Only the spine and the pressure difference matter: at each vertex,
        // `connection` joins the vertex on the begin node to the same vertex
        // on the end node. A is where the connection leaves the outline
        // going left, D where it comes in from the right. At an edge parallel
        // to the connection, its rear vertex is taken.
        let spine = end.position() - begin.position();
        let pressure_delta = end.pressure_factor() - begin.pressure_factor();
        let n = self.vertices.len();

        let mut quad = Quad::EMPTY;
        let mut found_ab = false;
        let mut found_cd = false;

        let mut j = n - 1;
        for i in 0..n {
            let connection = spine + self.vertices[i] * pressure_delta;
            if pressure_delta != 0.0 && connection.x == 0.0 && connection.y == 0.0 {
                // one node is entirely inside the other
                return Quad::EMPTY;
            }

            let going_to =
                where_is_vector_about_vector(connection, self.vertices[(i + 1) % n] - self.vertices[i]);
            let coming_from =
                where_is_vector_about_vector(self.vertices[i] - self.vertices[j], connection);

            if going_to != HitResult::Right {
                if !found_ab && coming_from == HitResult::Left {
                    found_ab = true;
                    quad.a = self.vertex_at(begin, i);
                    quad.b = self.vertex_at(end, i);
                }
            } else if !found_cd && coming_from != HitResult::Left {
                found_cd = true;
                quad.c = self.vertex_at(end, i);
                quad.d = self.vertex_at(begin, i);
            }

            if found_ab && found_cd {
                break;
            }
            j = i;
        }

        if !found_ab
            || !found_cd
            || (pressure_delta != 0.0 && (quad.b - quad.a).cross(quad.d - quad.a) == 0.0)
        {
            return Quad::EMPTY;
        }

        quad
    }

    /// The begin node if it is at least as big as the end node, otherwise
    /// the end node.
    #[inline]
    fn bigger_node<'a>(&self, begin: &'a StrokeNodeData, end: &'a StrokeNodeData) -> &'a StrokeNodeData {
        if begin.is_empty() || end.pressure_factor() > begin.pressure_factor() {
            end
        } else {
            begin
        }
    }

    /// Whether a segment touches the union of both nodes and their quad.
    pub fn hit_test_segment(
        &self,
        begin: &StrokeNodeData,
        end: &StrokeNodeData,
        quad: &Quad,
        hit_begin_point: Point,
        hit_end_point: Point,
    ) -> bool {
        if quad.is_empty() {
            // the first node, or one node contains the other
            let node = self.bigger_node(begin, end);
            let pressure_factor = node.pressure_factor();
            let mut hit_begin = hit_begin_point - node.position();
            let mut hit_end = hit_end_point - node.position();
            if pressure_factor != 1.0 {
                hit_begin /= pressure_factor;
                hit_end /= pressure_factor;
            }
            return hit_test_polygon_segment(&self.vertices, hit_begin, hit_end);
        }

        // Walk the outline of the union clockwise, starting with C->D, then
        // the outer edges of the begin node from D to A, A->B and the outer
        // edges of the end node from B to C.
        let n = self.vertices.len();
        let begin_position = begin.position();
        let mut hit_begin = hit_begin_point - begin_position;
        let mut hit_end = hit_end_point - begin_position;
        let mut hit_result = where_is_segment_about_segment(
            hit_begin,
            hit_end,
            quad.c - begin_position,
            quad.d - begin_position,
        );
        if hit_result == HitResult::Left {
            return false;
        }

        let first_result = hit_result;
        let mut last_result = hit_result;
        let mut pressure_factor = begin.pressure_factor();

        // vertices must be computed exactly as in `connecting_quad` to match
        let mut i = (0..n)
            .find(|&i| begin_position + self.vertices[i] * pressure_factor == quad.d)
            .unwrap_or(n - 1);
        let mut vertex = self.vertices[i] * pressure_factor;

        for node in 0..2 {
            let (node_position, stop) = if node == 0 {
                (begin_position, quad.a)
            } else {
                (end.position(), quad.c)
            };

            let mut count = n;
            while node_position + vertex != stop && count != 0 {
                i = (i + 1) % n;
                let next_vertex = if pressure_factor == 1.0 {
                    self.vertices[i]
                } else {
                    self.vertices[i] * pressure_factor
                };
                hit_result = where_is_segment_about_segment(hit_begin, hit_end, vertex, next_vertex);
                if hit_result == HitResult::Hit {
                    return true;
                }
                if is_outside(hit_result, last_result) {
                    return false;
                }
                last_result = hit_result;
                vertex = next_vertex;
                count -= 1;
            }

            if node == 0 {
                // continue in the space of the end node
                pressure_factor = end.pressure_factor();
                let spine = end.position() - begin_position;
                vertex -= spine;
                hit_begin -= spine;
                hit_end -= spine;

                let mut count = n;
                while end.position() + self.vertices[i] * pressure_factor != quad.b && count != 0 {
                    i = (i + 1) % n;
                    count -= 1;
                }
                i = (i + n - 1) % n;
            }
        }

        !is_outside(first_result, hit_result)
    }

    /// Whether a closed contour overlaps the union of both nodes and their
    /// quad, including when it encloses them.
    pub fn hit_test_contour(
        &self,
        begin: &StrokeNodeData,
        end: &StrokeNodeData,
        quad: &Quad,
        hit_contour: &[ContourSegment],
    ) -> bool {
        if quad.is_empty() {
            self.hit_test_polygon_contour_segments(hit_contour, begin, end)
        } else {
            self.hit_test_ink_contour(hit_contour, quad, begin, end)
        }
    }

    /// Find the range of the spine between the nodes covered by a segment.
    pub fn cut_test_segment(
        &self,
        begin: &StrokeNodeData,
        end: &StrokeNodeData,
        quad: &Quad,
        hit_begin_point: Point,
        hit_end_point: Point,
    ) -> StrokeFIndices {
        let mut result = StrokeFIndices::empty();

        // first, test the nodes themselves
        let first_node = if begin.is_empty() { 1 } else { 0 };
        for node in first_node..2 {
            let data = if node == 0 { begin } else { end };
            let pressure_factor = data.pressure_factor();

            let mut hit_begin = hit_begin_point - data.position();
            let mut hit_end = hit_end_point - data.position();
            if pressure_factor != 1.0 {
                hit_begin /= pressure_factor;
                hit_end /= pressure_factor;
            }

            if hit_test_polygon_segment(&self.vertices, hit_begin, hit_end) {
                if node == 0 {
                    result.set_begin_findex(StrokeFIndices::BEFORE_FIRST);
                    result.set_end_findex(0.0);
                } else {
                    result.set_end_findex(StrokeFIndices::AFTER_LAST);
                    if begin.is_empty() {
                        result.set_begin_findex(StrokeFIndices::BEFORE_FIRST);
                    } else if result.begin_findex() != StrokeFIndices::BEFORE_FIRST {
                        result.set_begin_findex(1.0);
                    }
                }
            }
        }

        if result.is_full() {
            return result;
        }
        if result.is_empty()
            && (quad.is_empty() || !hit_test_quad_segment(quad, hit_begin_point, hit_end_point))
        {
            return result;
        }

        let begin_position = begin.position();
        let end_position = end.position();
        let begin_pressure = begin.pressure_factor();
        let end_pressure = end.pressure_factor();

        if result.begin_findex() != StrokeFIndices::BEFORE_FIRST {
            result.set_begin_findex(self.clip_test(
                (end_position - begin_position) / begin_pressure,
                (end_pressure / begin_pressure) - 1.0,
                (hit_begin_point - begin_position) / begin_pressure,
                (hit_end_point - begin_position) / begin_pressure,
            ));
        }

        if result.end_findex() != StrokeFIndices::AFTER_LAST {
            result.set_end_findex(
                1.0 - self.clip_test(
                    (begin_position - end_position) / end_pressure,
                    (begin_pressure / end_pressure) - 1.0,
                    (hit_begin_point - end_position) / end_pressure,
                    (hit_end_point - end_position) / end_pressure,
                ),
            );
        }

        if is_invalid_cut_test_result(&result) {
            return StrokeFIndices::empty();
        }

        result
    }

    /// Find the range of the spine between the nodes covered by a closed
    /// contour.
    pub fn cut_test_contour(
        &self,
        begin: &StrokeNodeData,
        end: &StrokeNodeData,
        quad: &Quad,
        hit_contour: &[ContourSegment],
    ) -> StrokeFIndices {
        if begin.is_empty() {
            return if self.hit_test_contour(begin, end, quad, hit_contour) {
                StrokeFIndices::full()
            } else {
                StrokeFIndices::empty()
            };
        }

        let mut result = StrokeFIndices::empty();
        let mut is_inside = true;
        let spine = (end.position() - begin.position()) / begin.pressure_factor();
        let spine_reversed = (begin.position() - end.position()) / end.pressure_factor();
        let pressure_delta = (end.pressure_factor() / begin.pressure_factor()) - 1.0;
        let pressure_delta_reversed = (begin.pressure_factor() / end.pressure_factor()) - 1.0;

        for hit_segment in hit_contour {
            let mut is_hit = self.hit_test_stroke_nodes(hit_segment, begin, end, &mut result);
            if result.is_full() {
                return result;
            }

            if !is_hit {
                if !quad.is_empty() {
                    is_hit = if hit_segment.is_arc() {
                        hit_test_quad_circle(
                            quad,
                            hit_segment.begin() + hit_segment.radius(),
                            hit_segment.radius(),
                        )
                    } else {
                        hit_test_quad_segment(quad, hit_segment.begin(), hit_segment.end())
                    };
                }

                if !is_hit {
                    if is_inside {
                        is_inside = ink_is_inside(hit_segment, end.position() - hit_segment.begin());
                    }
                    continue;
                }
            }

            is_inside = false;

            if !are_close(result.begin_findex(), StrokeFIndices::BEFORE_FIRST) {
                let findex = self.calculate_clip_location(hit_segment, begin, spine, pressure_delta);
                if findex != StrokeFIndices::BEFORE_FIRST && result.begin_findex() > findex {
                    result.set_begin_findex(findex);
                }
            }

            if !are_close(result.end_findex(), StrokeFIndices::AFTER_LAST) {
                let findex =
                    self.calculate_clip_location(hit_segment, end, spine_reversed, pressure_delta_reversed);
                if findex != StrokeFIndices::BEFORE_FIRST {
                    let findex = 1.0 - findex;
                    if result.end_findex() < findex {
                        result.set_end_findex(findex);
                    }
                }
            }
        }

        if are_close(result.begin_findex(), StrokeFIndices::AFTER_LAST) {
            if !are_close(result.end_findex(), StrokeFIndices::BEFORE_FIRST) {
                result.set_begin_findex(StrokeFIndices::BEFORE_FIRST);
            }
        } else if are_close(result.end_findex(), StrokeFIndices::BEFORE_FIRST) {
            result.set_end_findex(StrokeFIndices::AFTER_LAST);
        }

        if is_invalid_cut_test_result(&result) {
            return StrokeFIndices::empty();
        }

        if result.is_empty() && is_inside {
            StrokeFIndices::full()
        } else {
            result
        }
    }

    /// Where a segment crosses the area swept by the nib from the begin node
    /// (at the origin) along `spine`, growing by `pressure_delta`. Returns
    /// the fraction of the spine, or `AFTER_LAST` if it is never crossed.
    ///
    /// Between the begin and end copies of each edge `N[i-1] N[i]` lies the
    /// quadrangle `N[i-1] M[i-1] M[i] N[i]`. Where the segment enters such a
    /// quadrangle the nib first touches it; the smallest such fraction wins.
    pub(crate) fn clip_test(
        &self,
        spine: Vector,
        pressure_delta: f64,
        hit_begin: Vector,
        hit_end: Vector,
    ) -> f64 {
        let n = self.vertices.len();
        let mut findex = StrokeFIndices::AFTER_LAST;
        let hit_vector = hit_end - hit_begin;
        let mut last_vertex = self.vertices[n - 1];

        // from a vertex of the begin node to the same vertex of the end node
        let mut next_node = spine + last_vertex * pressure_delta;
        let mut test_next_edge = false;

        let mut k = 0;
        while k < n || (k == n && test_next_edge) {
            let vertex = self.vertices[k % n];
            let next_vertex = vertex - last_vertex;
            let next_vertex_next_node = spine + vertex * pressure_delta;
            k += 1;

            // only edges the nib moves away from sweep new area
            if (is_zero(next_node.x) && is_zero(next_node.y))
                || (!test_next_edge
                    && where_is_vector_about_vector(next_node, next_vertex) != HitResult::Left)
            {
                last_vertex = vertex;
                next_node = next_vertex_next_node;
                continue;
            }

            test_next_edge = false;
            let mut hit = HitResult::Left;
            let mut side = 0;
            for &hit_point in &[hit_begin, hit_end] {
                let hit_point = hit_point - last_vertex;
                hit = where_is_vector_about_vector(hit_point, next_node);
                match hit {
                    HitResult::Hit => {
                        let r = if next_node.x.abs() < next_node.y.abs() {
                            hit_point.y / next_node.y
                        } else {
                            hit_point.x / next_node.x
                        };
                        lower_to(&mut findex, r);
                    }
                    HitResult::Right => {
                        side += 1;
                        if where_is_vector_about_vector(hit_point - next_vertex, next_vertex_next_node)
                            == HitResult::Left
                        {
                            let r = position_between_lines(next_vertex, next_node, hit_point);
                            lower_to(&mut findex, r);
                        } else {
                            test_next_edge = true;
                        }
                    }
                    _ => side -= 1,
                }
            }

            if side == 0 {
                if hit == HitResult::Hit {
                    // collinear with the connecting edge
                    break;
                }

                // the segment crosses the connecting edge
                let det = -next_node.cross(hit_vector);
                if !is_zero(det) {
                    let s = hit_vector.cross(hit_begin - last_vertex) / det;
                    lower_to(&mut findex, s);
                }
            }

            last_vertex = vertex;
            next_node = next_vertex_next_node;
        }

        adjust_findex(findex)
    }

    /// Like [`clip_test`](Self::clip_test), for a circle given by its center
    /// and a radius vector.
    pub(crate) fn clip_test_arc(
        &self,
        spine: Vector,
        pressure_delta: f64,
        hit_center: Vector,
        hit_radius: Vector,
    ) -> f64 {
        let n = self.vertices.len();
        let mut findex = StrokeFIndices::AFTER_LAST;
        let radius_squared = hit_radius.square_length();
        let mut last_vertex = self.vertices[n - 1];
        let mut next_node = spine + last_vertex * pressure_delta;
        let mut test_next_edge = false;

        let mut k = 0;
        while k < n || (k == n && test_next_edge) {
            let vertex = self.vertices[k % n];
            let next_vertex = vertex - last_vertex;
            let next_vertex_next_node = spine + vertex * pressure_delta;
            k += 1;

            if is_zero(next_node.x) && is_zero(next_node.y) {
                last_vertex = vertex;
                next_node = next_vertex_next_node;
                continue;
            }

            let mut test_connecting_edge = false;

            if where_is_vector_about_vector(next_node, next_vertex) == HitResult::Left {
                test_next_edge = false;

                // from the center to the line of the edge
                let normal = projection(last_vertex - hit_center, vertex - hit_center);
                if radius_squared <= normal.square_length() {
                    if where_is_vector_about_vector(hit_center - last_vertex, next_vertex)
                        == HitResult::Left
                    {
                        // the point of the circle nearest to the edge
                        let hit_point =
                            hit_center + normal * (radius_squared / normal.square_length()).sqrt();
                        if where_is_vector_about_vector(hit_point - vertex, next_vertex_next_node)
                            == HitResult::Right
                        {
                            test_next_edge = true;
                        } else if where_is_vector_about_vector(hit_point - last_vertex, next_node)
                            == HitResult::Left
                        {
                            test_connecting_edge = true;
                        } else {
                            findex =
                                position_between_lines(next_vertex, next_node, hit_point - last_vertex);
                            break;
                        }
                    }
                } else if where_is_vector_about_vector(hit_center + normal - last_vertex, next_node)
                    == HitResult::Right
                {
                    test_next_edge = true;
                } else {
                    test_connecting_edge = true;
                }
            } else if test_next_edge {
                test_next_edge = false;
                test_connecting_edge = true;
            }

            if test_connecting_edge {
                // where the circle first meets the path of the last vertex
                let v = last_vertex - hit_center;
                let findex_nearest = projection_findex(v, v + next_node);

                if findex_nearest > 0.0 {
                    let nearest = next_node * findex_nearest;
                    let remaining = radius_squared - (nearest + v).square_length();
                    if is_zero(remaining) && findex_nearest <= 1.0 {
                        if findex_nearest < findex {
                            findex = findex_nearest;
                        }
                    } else if remaining > 0.0 && nearest.square_length() >= remaining {
                        let hit_point_findex =
                            findex_nearest - (remaining / next_node.square_length()).sqrt();
                        if hit_point_findex < findex {
                            findex = hit_point_findex;
                        }
                    }
                }
            }

            last_vertex = vertex;
            next_node = next_vertex_next_node;
        }

        adjust_findex(findex)
    }

    fn hit_test_polygon_contour_segments(
        &self,
        hit_contour: &[ContourSegment],
        begin: &StrokeNodeData,
        end: &StrokeNodeData,
    ) -> bool {
        let mut is_hit = false;
        // whether the ink lies inside the hitting contour
        let mut is_inside = true;

        let node = self.bigger_node(begin, end);
        let position = node.position();
        let pressure_factor = node.pressure_factor();

        for hit_segment in hit_contour {
            if hit_segment.is_arc() {
                let mut hit_center = hit_segment.begin() + hit_segment.radius() - position;
                let mut hit_radius = hit_segment.radius();
                if !are_close(pressure_factor, 1.0) {
                    hit_center /= pressure_factor;
                    hit_radius /= pressure_factor;
                }

                if hit_test_polygon_circle(&self.vertices, hit_center, hit_radius) {
                    is_hit = true;
                    break;
                }
                if is_inside
                    && where_is_vector_about_arc(
                        position - hit_segment.begin() - hit_segment.radius(),
                        -hit_segment.radius(),
                        hit_segment.vector() - hit_segment.radius(),
                    ) == HitResult::Hit
                {
                    is_inside = false;
                }
            } else {
                let mut hit_begin = hit_segment.begin() - position;
                let mut hit_end = hit_begin + hit_segment.vector();
                if !are_close(pressure_factor, 1.0) {
                    hit_begin /= pressure_factor;
                    hit_end /= pressure_factor;
                }

                if hit_test_polygon_segment(&self.vertices, hit_begin, hit_end) {
                    is_hit = true;
                    break;
                }
                if is_inside
                    && where_is_vector_about_vector(position - hit_segment.begin(), hit_segment.vector())
                        != HitResult::Right
                {
                    is_inside = false;
                }
            }
        }

        is_inside || is_hit
    }

    fn hit_test_ink_contour(
        &self,
        hit_contour: &[ContourSegment],
        quad: &Quad,
        begin: &StrokeNodeData,
        end: &StrokeNodeData,
    ) -> bool {
        debug_assert!(!quad.is_empty());
        let n = self.vertices.len();
        let begin_position = begin.position();
        let mut is_hit = false;
        // whether the ink lies inside the hitting contour
        let mut is_inside = true;

        for hit_segment in hit_contour {
            let is_arc = hit_segment.is_arc();

            // For arcs, `hit_begin` is the center and `hit_end` the radius.
            let (mut hit_begin, mut hit_end) = if is_arc {
                (
                    hit_segment.begin() + hit_segment.radius() - begin_position,
                    hit_segment.radius(),
                )
            } else {
                let hit_begin = hit_segment.begin() - begin_position;
                (hit_begin, hit_begin + hit_segment.vector())
            };
            let classify = |hit_begin: Vector, hit_end: Vector, a: Vector, b: Vector| {
                if is_arc {
                    where_is_circle_about_segment(hit_begin, hit_end, a, b)
                } else {
                    where_is_segment_about_segment(hit_begin, hit_end, a, b)
                }
            };

            let mut hit_result = classify(
                hit_begin,
                hit_end,
                quad.c - begin_position,
                quad.d - begin_position,
            );
            if hit_result == HitResult::Left {
                if is_inside {
                    is_inside = ink_is_inside(hit_segment, -hit_begin);
                }
                continue;
            }

            let first_result = hit_result;
            let mut last_result = hit_result;
            let mut pressure_factor = begin.pressure_factor();

            let mut i = (0..n)
                .find(|&i| points_close(begin_position + self.vertices[i] * pressure_factor, quad.d))
                .unwrap_or(n - 1);
            let mut vertex = self.vertices[i] * pressure_factor;

            let mut outside = false;
            'nodes: for node in 0..2 {
                let (node_position, stop) = if node == 0 {
                    (begin_position, quad.a)
                } else {
                    (end.position(), quad.c)
                };

                let mut count = n;
                while node_position + vertex != stop && count != 0 {
                    i = (i + 1) % n;
                    let next_vertex = self.vertices[i] * pressure_factor;
                    hit_result = classify(hit_begin, hit_end, vertex, next_vertex);
                    if hit_result == HitResult::Hit {
                        return true;
                    }
                    if is_outside(hit_result, last_result) {
                        outside = true;
                        break 'nodes;
                    }
                    last_result = hit_result;
                    vertex = next_vertex;
                    count -= 1;
                }

                if node == 0 {
                    pressure_factor = end.pressure_factor();
                    let spine = end.position() - begin_position;
                    vertex -= spine;
                    hit_begin -= spine;
                    if !is_arc {
                        hit_end -= spine;
                    }

                    let mut count = n;
                    while !points_close(end.position() + self.vertices[i] * pressure_factor, quad.b)
                        && count != 0
                    {
                        i = (i + 1) % n;
                        count -= 1;
                    }
                    i = (i + n - 1) % n;
                }
            }

            if !outside && !is_outside(first_result, hit_result) {
                is_hit = true;
                break;
            }

            if is_inside {
                is_inside = ink_is_inside(hit_segment, -hit_begin);
            }
        }

        is_hit || is_inside
    }

    /// Test a segment of a hitting contour against the two nodes alone,
    /// recording in `result` which of them are hit.
    fn hit_test_stroke_nodes(
        &self,
        hit_segment: &ContourSegment,
        begin: &StrokeNodeData,
        end: &StrokeNodeData,
        result: &mut StrokeFIndices,
    ) -> bool {
        let mut is_hit = false;
        for node in 0..2 {
            let data = if node == 0 {
                if is_hit && are_close(result.begin_findex(), StrokeFIndices::BEFORE_FIRST) {
                    continue;
                }
                begin
            } else {
                if is_hit && are_close(result.end_findex(), StrokeFIndices::AFTER_LAST) {
                    continue;
                }
                end
            };
            let position = data.position();
            let pressure_factor = data.pressure_factor();

            let (mut hit_begin, mut hit_end) = if hit_segment.is_arc() {
                (
                    hit_segment.begin() - position + hit_segment.radius(),
                    hit_segment.radius(),
                )
            } else {
                let hit_begin = hit_segment.begin() - position;
                (hit_begin, hit_begin + hit_segment.vector())
            };
            if pressure_factor != 1.0 {
                hit_begin /= pressure_factor;
                hit_end /= pressure_factor;
            }

            let node_hit = if hit_segment.is_arc() {
                hit_test_polygon_circle(&self.vertices, hit_begin, hit_end)
            } else {
                hit_test_polygon_segment(&self.vertices, hit_begin, hit_end)
            };

            if node_hit {
                is_hit = true;
                if node == 0 {
                    result.set_begin_findex(StrokeFIndices::BEFORE_FIRST);
                    if are_close(result.end_findex(), StrokeFIndices::AFTER_LAST) {
                        break;
                    }
                } else {
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
        }

        is_hit
    }

    /// Clip the spine starting at `node` against one hitting segment.
    /// Returns `BEFORE_FIRST` when the segment does not cut it.
    fn calculate_clip_location(
        &self,
        hit_segment: &ContourSegment,
        node: &StrokeNodeData,
        spine: Vector,
        pressure_delta: f64,
    ) -> f64 {
        let clip = hit_segment.is_arc()
            || where_is_vector_about_vector(node.position() - hit_segment.begin(), hit_segment.vector())
                == HitResult::Left;
        if !clip {
            return StrokeFIndices::BEFORE_FIRST;
        }

        let pressure_factor = node.pressure_factor();
        let findex = if hit_segment.is_arc() {
            self.clip_test_arc(
                spine,
                pressure_delta,
                (hit_segment.begin() + hit_segment.radius() - node.position()) / pressure_factor,
                hit_segment.radius() / pressure_factor,
            )
        } else {
            self.clip_test(
                spine,
                pressure_delta,
                (hit_segment.begin() - node.position()) / pressure_factor,
                (hit_segment.end() - node.position()) / pressure_factor,
            )
        };

        // a clip test that finds nothing reports AFTER_LAST
        if findex == StrokeFIndices::AFTER_LAST {
            StrokeFIndices::BEFORE_FIRST
        } else {
            findex
        }
    }
}

/// Whether a point, given relative to the start of a hitting segment, may
/// still be inside the contour the segment belongs to.
#[inline]
fn ink_is_inside(hit_segment: &ContourSegment, from_begin: Vector) -> bool {
    if hit_segment.is_arc() {
        where_is_vector_about_arc(
            from_begin - hit_segment.radius(),
            -hit_segment.radius(),
            hit_segment.vector() - hit_segment.radius(),
        ) != HitResult::Hit
    } else {
        where_is_vector_about_vector(from_begin, hit_segment.vector()) == HitResult::Right
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{point, vector};
    use approx::assert_relative_eq;

    fn square() -> PolygonOperations {
        PolygonOperations::new(vec![
            vector(-4.0, -4.0),
            vector(4.0, -4.0),
            vector(4.0, 4.0),
            vector(-4.0, 4.0),
        ])
        .unwrap()
    }

    fn nodes() -> (StrokeNodeData, StrokeNodeData) {
        (
            StrokeNodeData::at(point(0.0, 0.0)),
            StrokeNodeData::at(point(20.0, 0.0)),
        )
    }

    fn rect_contour(min: Point, max: Point) -> Vec<ContourSegment> {
        let a = min;
        let b = point(max.x, min.y);
        let c = max;
        let d = point(min.x, max.y);
        vec![
            ContourSegment::line(a, b),
            ContourSegment::line(b, c),
            ContourSegment::line(c, d),
            ContourSegment::line(d, a),
        ]
    }

    #[test]
    fn rejects_degenerate_polygons() {
        assert_eq!(
            PolygonOperations::new(vec![vector(0.0, 0.0), vector(1.0, 0.0)]).unwrap_err(),
            Error::DegeneratePolygon(2)
        );
    }

    #[test]
    fn bounds_scale_with_pressure() {
        let ops = square();
        let node = StrokeNodeData::new(point(10.0, 10.0), 0.5);
        assert_eq!(
            ops.node_bounds(&node),
            Rect::new(point(8.0, 8.0), point(12.0, 12.0))
        );

        let mut points = Vec::new();
        ops.node_contour_points(&node, &mut points);
        assert_eq!(points[0], point(8.0, 8.0));
        assert_eq!(points[2], point(12.0, 12.0));
    }

    #[test]
    fn horizontal_quad() {
        let ops = square();
        let (begin, end) = nodes();
        let quad = ops.connecting_quad(&begin, &end);
        assert_eq!(quad.a, point(-4.0, -4.0));
        assert_eq!(quad.b, point(16.0, -4.0));
        assert_eq!(quad.c, point(16.0, 4.0));
        assert_eq!(quad.d, point(-4.0, 4.0));
    }

    #[test]
    fn quad_is_symmetric() {
        let ops = square();
        let begin = StrokeNodeData::new(point(0.0, 0.0), 1.0);
        let end = StrokeNodeData::new(point(15.0, 10.0), 1.5);
        let forward = ops.connecting_quad(&begin, &end);
        let backward = ops.connecting_quad(&end, &begin);
        assert!(!forward.is_empty());
        assert_eq!(backward.a, forward.c);
        assert_eq!(backward.b, forward.d);
        assert_eq!(backward.c, forward.a);
        assert_eq!(backward.d, forward.b);
    }

    #[test]
    fn no_quad_for_contained_or_coincident_nodes() {
        let ops = square();
        let big = StrokeNodeData::new(point(0.0, 0.0), 1.75);
        let small = StrokeNodeData::new(point(1.0, 0.0), 0.25);
        assert!(ops.connecting_quad(&big, &small).is_empty());
        assert!(ops
            .connecting_quad(&big, &StrokeNodeData::new(point(0.0, 0.0), 1.0))
            .is_empty());
        assert!(ops.connecting_quad(&StrokeNodeData::EMPTY, &big).is_empty());
    }

    #[test]
    fn contour_of_connected_nodes() {
        let ops = square();
        let (begin, end) = nodes();
        let quad = ops.connecting_quad(&begin, &end);
        let contour = ops.contour_segments(&end, &quad);
        let points: Vec<Point> = contour.iter().map(|s| s.begin()).collect();
        assert_eq!(
            points,
            vec![
                point(-4.0, -4.0),
                point(16.0, -4.0),
                point(24.0, -4.0),
                point(24.0, 4.0),
                point(16.0, 4.0),
                point(-4.0, 4.0),
            ]
        );

        let alone = ops.non_bezier_contour_segments(&StrokeNodeData::EMPTY, &end);
        assert_eq!(alone.len(), 4);
        assert_eq!(alone[0].begin(), point(16.0, 4.0));
    }

    #[test]
    fn segment_hits() {
        let ops = square();
        let (begin, end) = nodes();
        let quad = ops.connecting_quad(&begin, &end);
        assert!(ops.hit_test_segment(&begin, &end, &quad, point(10.0, -10.0), point(10.0, 10.0)));
        assert!(!ops.hit_test_segment(&begin, &end, &quad, point(30.0, -10.0), point(30.0, 10.0)));
        // inside the end node
        assert!(ops.hit_test_segment(&begin, &end, &quad, point(21.0, 0.0), point(22.0, 1.0)));
        // the first node of a stroke
        let quad = ops.connecting_quad(&StrokeNodeData::EMPTY, &end);
        assert!(ops.hit_test_segment(
            &StrokeNodeData::EMPTY,
            &end,
            &quad,
            point(20.0, 0.0),
            point(20.0, 0.0)
        ));
        assert!(!ops.hit_test_segment(
            &StrokeNodeData::EMPTY,
            &end,
            &quad,
            point(10.0, -10.0),
            point(10.0, 10.0)
        ));
    }

    #[test]
    fn segment_cuts() {
        let ops = square();
        let (begin, end) = nodes();
        let quad = ops.connecting_quad(&begin, &end);

        // a vertical cut through the quad, between the nodes
        let cut = ops.cut_test_segment(&begin, &end, &quad, point(10.0, -10.0), point(10.0, 10.0));
        assert!(!cut.is_empty());
        assert_relative_eq!(cut.begin_findex(), 0.3, epsilon = 1e-9);
        assert_relative_eq!(cut.end_findex(), 0.7, epsilon = 1e-9);

        // a miss
        let cut = ops.cut_test_segment(&begin, &end, &quad, point(30.0, -10.0), point(30.0, 10.0));
        assert!(cut.is_empty());

        // through the end node
        let cut = ops.cut_test_segment(&begin, &end, &quad, point(20.0, -10.0), point(20.0, 10.0));
        assert_eq!(cut.end_findex(), StrokeFIndices::AFTER_LAST);
        assert_relative_eq!(cut.begin_findex(), 0.8, epsilon = 1e-9);
    }

    #[test]
    fn contour_hits_and_cuts() {
        let ops = square();
        let (begin, end) = nodes();
        let quad = ops.connecting_quad(&begin, &end);

        let around = rect_contour(point(-10.0, -10.0), point(30.0, 10.0));
        assert!(ops.hit_test_contour(&begin, &end, &quad, &around));
        assert!(ops.cut_test_contour(&begin, &end, &quad, &around).is_full());

        let far = rect_contour(point(50.0, 50.0), point(60.0, 60.0));
        assert!(!ops.hit_test_contour(&begin, &end, &quad, &far));
        assert!(ops.cut_test_contour(&begin, &end, &quad, &far).is_empty());

        let middle = rect_contour(point(8.0, -10.0), point(12.0, 10.0));
        assert!(ops.hit_test_contour(&begin, &end, &quad, &middle));
        let cut = ops.cut_test_contour(&begin, &end, &quad, &middle);
        assert!(!cut.is_empty() && !cut.is_full());
        assert_relative_eq!(cut.begin_findex(), 0.2, epsilon = 1e-9);
        assert_relative_eq!(cut.end_findex(), 0.8, epsilon = 1e-9);
        assert!(cut.begin_findex() < cut.end_findex());
    }

    #[test]
    fn clip_against_circle() {
        let ops = square();
        // a circle of radius 2 centered 10 units along the spine: the front
        // edge of the nib (x = 4) reaches it at x = 8
        let findex = ops.clip_test_arc(vector(20.0, 0.0), 0.0, vector(10.0, 0.0), vector(2.0, 0.0));
        assert_relative_eq!(findex, 0.2, epsilon = 1e-9);

        let findex = ops.clip_test_arc(vector(20.0, 0.0), 0.0, vector(10.0, 30.0), vector(2.0, 0.0));
        assert_eq!(findex, StrokeFIndices::AFTER_LAST);
    }

    #[test]
    fn arc_contour_hits() {
        let ops = square();
        let (begin, end) = nodes();
        let quad = ops.connecting_quad(&begin, &end);

        // full circle of radius 3 around (10, 0)
        let circle = [ContourSegment::arc(
            point(13.0, 0.0),
            point(13.0, 0.0),
            point(10.0, 0.0),
        )];
        assert!(ops.hit_test_contour(&begin, &end, &quad, &circle));
        let cut = ops.cut_test_contour(&begin, &end, &quad, &circle);
        assert!(!cut.is_empty());
        assert_relative_eq!(cut.begin_findex(), 0.15, epsilon = 1e-9);
        assert_relative_eq!(cut.end_findex(), 0.85, epsilon = 1e-9);

        let away = [ContourSegment::arc(
            point(13.0, 40.0),
            point(13.0, 40.0),
            point(10.0, 40.0),
        )];
        assert!(!ops.hit_test_contour(&begin, &end, &quad, &away));
    }
}
