// MIT/Apache2 License

//! Orientation tests and projections shared by both nib shapes.
//!
//! All functions here work with vectors in node-local coordinates; callers
//! translate and scale their input so that a single unscaled vertex list
//! can be reused for every node of a stroke.

use crate::{
    findices::StrokeFIndices,
    geometry::{Point, Quad, Vector},
    util::{are_close, greater_than, is_one, is_zero, less_than},
};

/// Where a geometric element lies relative to an edge or a vector.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HitResult {
    Hit,
    Left,
    Right,
    InFront,
    Behind,
}

/// Snap fractional positions that are almost 0 or 1 onto the end points.
#[inline]
pub fn adjust_findex(findex: f64) -> f64 {
    if is_zero(findex) {
        0.0
    } else if is_one(findex) {
        1.0
    } else {
        findex
    }
}

/// Parameter of the point on the line `begin..end` nearest to the origin.
#[inline]
pub fn projection_findex(begin: Vector, end: Vector) -> f64 {
    let segment = end - begin;
    let length_squared = segment.square_length();
    if is_zero(length_squared) {
        return 0.0;
    }

    adjust_findex(-begin.dot(segment) / length_squared)
}

/// The point on the line through `begin` and `end` nearest to the origin.
#[inline]
pub fn projection(begin: Vector, end: Vector) -> Vector {
    let findex = projection_findex(begin, end);
    begin + (end - begin) * findex
}

/// The point of the segment `begin..end` nearest to the origin.
#[inline]
pub fn nearest(begin: Vector, end: Vector) -> Vector {
    let findex = projection_findex(begin, end);
    if findex <= 0.0 {
        begin
    } else if findex >= 1.0 {
        end
    } else {
        begin + (end - begin) * findex
    }
}

#[inline]
pub(crate) fn turn_left(v: Vector) -> Vector {
    Vector::new(-v.y, v.x)
}

#[inline]
pub(crate) fn turn_right(v: Vector) -> Vector {
    Vector::new(v.y, -v.x)
}

/// Classify `v1` as left of, right of or collinear with `v2`.
#[inline]
pub fn where_is_vector_about_vector(v1: Vector, v2: Vector) -> HitResult {
    let det = v1.cross(v2);
    if is_zero(det) {
        HitResult::Hit
    } else if det > 0.0 {
        HitResult::Left
    } else {
        HitResult::Right
    }
}

/// Classify a vector against a clockwise arc given by the vectors from the
/// center to the arc end points.
pub fn where_is_vector_about_arc(hit: Vector, arc_begin: Vector, arc_end: Vector) -> HitResult {
    if arc_begin == arc_end {
        // full circle
        return HitResult::Hit;
    }

    if where_is_vector_about_vector(arc_end, arc_begin) == HitResult::Right {
        // small arc
        if where_is_vector_about_vector(hit, arc_begin) != HitResult::Left
            && where_is_vector_about_vector(hit, arc_end) != HitResult::Right
        {
            return HitResult::Hit;
        }
    } else if where_is_vector_about_vector(hit, arc_begin) != HitResult::Left
        || where_is_vector_about_vector(hit, arc_end) != HitResult::Right
    {
        return HitResult::Hit;
    }

    if where_is_vector_about_vector(hit - arc_begin, turn_left(arc_begin)) != HitResult::Left
        || where_is_vector_about_vector(hit - arc_end, turn_right(arc_end)) != HitResult::Right
    {
        return HitResult::Left;
    }

    HitResult::Right
}

/// Classify the segment `hit_begin..hit_end` against the directed edge
/// `org_begin..org_end`.
pub fn where_is_segment_about_segment(
    hit_begin: Vector,
    hit_end: Vector,
    org_begin: Vector,
    org_end: Vector,
) -> HitResult {
    if hit_end == hit_begin {
        return where_is_circle_about_segment(hit_begin, Vector::zero(), org_begin, org_end);
    }

    // segments AB (the edge) and CD (the hit segment) cross at
    // A + r(B - A) = C + s(D - C)
    let ab = org_end - org_begin;
    let ca = org_begin - hit_begin;
    let cd = hit_end - hit_begin;
    let det = ab.cross(cd);

    if is_zero(det) {
        // parallel
        if is_zero(cd.cross(ca)) || greater_than(ab.cross(ca), 0.0) {
            return HitResult::Left;
        }
        return HitResult::Right;
    }

    let r = adjust_findex(ab.cross(ca) / det);
    if r > 0.0 && r < 1.0 {
        let s = adjust_findex(cd.cross(ca) / det);
        if s > 0.0 && s < 1.0 {
            HitResult::Hit
        } else if s > 0.0 {
            HitResult::InFront
        } else {
            HitResult::Behind
        }
    } else if where_is_vector_about_vector(hit_begin - org_begin, ab) == HitResult::Left
        || where_is_vector_about_vector(hit_end - org_begin, ab) == HitResult::Left
    {
        HitResult::Left
    } else {
        HitResult::Right
    }
}

/// Classify the circle at `center` against the directed edge
/// `seg_begin..seg_end`.
pub fn where_is_circle_about_segment(
    center: Vector,
    radius: Vector,
    seg_begin: Vector,
    seg_end: Vector,
) -> HitResult {
    let seg_begin = seg_begin - center;
    let seg_end = seg_end - center;
    let radius_squared = radius.square_length();

    if radius_squared > nearest(seg_begin, seg_end).square_length() {
        return HitResult::Hit;
    }

    let seg_vector = seg_end - seg_begin;
    let side = where_is_vector_about_vector(-seg_begin, seg_vector);

    if side == HitResult::Hit {
        // the center is on the line of the edge
        if less_than(seg_begin.square_length(), seg_end.square_length()) {
            HitResult::InFront
        } else {
            HitResult::Behind
        }
    } else {
        let findex = projection_findex(seg_begin, seg_end);
        let normal = seg_begin + seg_vector * findex;
        if radius_squared <= normal.square_length() {
            side
        } else if findex > 0.0 {
            HitResult::InFront
        } else {
            HitResult::Behind
        }
    }
}

/// Whether a classification proves the element is outside a convex contour.
#[inline]
pub(crate) fn is_outside(hit_result: HitResult, prev_result: HitResult) -> bool {
    hit_result == HitResult::Left
        || (hit_result == HitResult::Behind && prev_result == HitResult::InFront)
}

/// Fraction along `next_line`, a connecting edge that starts at the end of
/// `lines_vector`, at which a line parallel to the connecting edges passes
/// through `hit_point`.
pub(crate) fn position_between_lines(lines_vector: Vector, next_line: Vector, hit_point: Vector) -> f64 {
    let nearest_on_first = projection(-hit_point, lines_vector - hit_point);

    let hit_point = next_line - hit_point;
    let nearest_on_second = projection(hit_point, hit_point + lines_vector);

    let shortest = nearest_on_first - nearest_on_second;
    (nearest_on_first.square_length() / shortest.square_length()).sqrt()
}

/// Walk a closed clockwise contour with a classifier, deciding whether the
/// element being classified touches the area inside.
#[inline]
fn hit_test_contour<F: FnMut(Vector, Vector) -> HitResult>(
    vertices: impl Iterator<Item = Vector> + Clone,
    mut classify: F,
) -> bool {
    let mut first_result = HitResult::Right;
    let mut prev_result = HitResult::Right;
    let mut hit_result = HitResult::Right;

    let mut vertex = match vertices.clone().last() {
        Some(v) => v,
        None => return false,
    };

    for (i, next_vertex) in vertices.enumerate() {
        hit_result = classify(vertex, next_vertex);
        if hit_result == HitResult::Hit {
            return true;
        }
        if is_outside(hit_result, prev_result) {
            return false;
        }
        if i == 0 {
            first_result = hit_result;
        }
        prev_result = hit_result;
        vertex = next_vertex;
    }

    !is_outside(first_result, hit_result)
}

/// Whether a segment touches a convex polygon. All coordinates are relative
/// to the polygon's origin.
#[inline]
pub fn hit_test_polygon_segment(vertices: &[Vector], hit_begin: Vector, hit_end: Vector) -> bool {
    hit_test_contour(vertices.iter().copied(), |vertex, next| {
        where_is_segment_about_segment(hit_begin, hit_end, vertex, next)
    })
}

/// Whether a circle touches a convex polygon. All coordinates are relative
/// to the polygon's origin.
#[inline]
pub fn hit_test_polygon_circle(vertices: &[Vector], center: Vector, radius: Vector) -> bool {
    hit_test_contour(vertices.iter().copied(), |vertex, next| {
        where_is_circle_about_segment(center, radius, vertex, next)
    })
}

/// Whether a segment touches a non-empty quad.
#[inline]
pub fn hit_test_quad_segment(quad: &Quad, hit_begin: Point, hit_end: Point) -> bool {
    debug_assert!(!quad.is_empty());
    let hit_vector = hit_end - hit_begin;
    let vertices = quad.vertices();
    hit_test_contour(vertices.iter().map(|v| *v - hit_begin), |vertex, next| {
        where_is_segment_about_segment(Vector::zero(), hit_vector, vertex, next)
    })
}

/// Whether a circle touches a non-empty quad.
#[inline]
pub fn hit_test_quad_circle(quad: &Quad, center: Point, radius: Vector) -> bool {
    debug_assert!(!quad.is_empty());
    let center = center.to_vector();
    let vertices = quad.vertices();
    hit_test_contour(vertices.iter().map(|v| v.to_vector()), |vertex, next| {
        where_is_circle_about_segment(center, radius, vertex, next)
    })
}

/// Whether a cut test produced a range that cannot be right.
#[inline]
pub(crate) fn is_invalid_cut_test_result(result: &StrokeFIndices) -> bool {
    let begin = result.begin_findex();
    let end = result.end_findex();
    are_close(begin, end)
        || (are_close(begin, StrokeFIndices::BEFORE_FIRST) && end < 0.0)
        || (begin > 1.0 && are_close(end, StrokeFIndices::AFTER_LAST))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{point, vector};
    use approx::assert_relative_eq;

    fn square() -> Vec<Vector> {
        vec![
            vector(-4.0, -4.0),
            vector(4.0, -4.0),
            vector(4.0, 4.0),
            vector(-4.0, 4.0),
        ]
    }

    #[test]
    fn vector_orientation() {
        // y points down, so (0, 1) is clockwise from (1, 0)
        assert_eq!(
            where_is_vector_about_vector(vector(1.0, 0.0), vector(0.0, 1.0)),
            HitResult::Left
        );
        assert_eq!(
            where_is_vector_about_vector(vector(0.0, 1.0), vector(1.0, 0.0)),
            HitResult::Right
        );
        assert_eq!(
            where_is_vector_about_vector(vector(2.0, 0.0), vector(-1.0, 0.0)),
            HitResult::Hit
        );
    }

    #[test]
    fn segment_classification() {
        let a = vector(0.0, 0.0);
        let b = vector(10.0, 0.0);
        // crossing
        assert_eq!(
            where_is_segment_about_segment(vector(5.0, -1.0), vector(5.0, 1.0), a, b),
            HitResult::Hit
        );
        // the edge line crosses the segment beyond the edge end
        assert_eq!(
            where_is_segment_about_segment(vector(15.0, -1.0), vector(15.0, 1.0), a, b),
            HitResult::InFront
        );
        assert_eq!(
            where_is_segment_about_segment(vector(-5.0, -1.0), vector(-5.0, 1.0), a, b),
            HitResult::Behind
        );
        // parallel, above the edge (left in y-down space)
        assert_eq!(
            where_is_segment_about_segment(vector(0.0, -1.0), vector(5.0, -1.0), a, b),
            HitResult::Left
        );
        assert_eq!(
            where_is_segment_about_segment(vector(0.0, 1.0), vector(5.0, 1.0), a, b),
            HitResult::Right
        );
    }

    #[test]
    fn circle_classification() {
        let a = vector(0.0, 0.0);
        let b = vector(10.0, 0.0);
        assert_eq!(
            where_is_circle_about_segment(vector(5.0, 1.0), vector(2.0, 0.0), a, b),
            HitResult::Hit
        );
        assert_eq!(
            where_is_circle_about_segment(vector(5.0, -3.0), vector(2.0, 0.0), a, b),
            HitResult::Left
        );
        assert_eq!(
            where_is_circle_about_segment(vector(12.0, 2.5), vector(3.0, 0.0), a, b),
            HitResult::InFront
        );
        assert_eq!(
            where_is_circle_about_segment(vector(12.0, -2.5), vector(3.0, 0.0), a, b),
            HitResult::InFront
        );
    }

    #[test]
    fn arc_classification() {
        // upper half of the unit circle, clockwise from the left to the right
        let begin = vector(-1.0, 0.0);
        let end = vector(1.0, 0.0);
        assert_eq!(
            where_is_vector_about_arc(vector(0.0, -1.0), begin, end),
            HitResult::Hit
        );
        assert_eq!(
            where_is_vector_about_arc(vector(0.0, 1.0), begin, end),
            HitResult::Left
        );
        assert_eq!(
            where_is_vector_about_arc(vector(0.5, 0.5), begin, begin),
            HitResult::Hit
        );
    }

    #[test]
    fn projections() {
        assert_relative_eq!(projection_findex(vector(-1.0, 1.0), vector(1.0, 1.0)), 0.5);
        assert_eq!(projection(vector(-1.0, 1.0), vector(1.0, 1.0)), vector(0.0, 1.0));
        assert_eq!(nearest(vector(1.0, 1.0), vector(3.0, 1.0)), vector(1.0, 1.0));
        assert_eq!(nearest(vector(-3.0, 1.0), vector(-1.0, 1.0)), vector(-1.0, 1.0));
        assert_eq!(projection_findex(vector(1.0, 1.0), vector(1.0, 1.0)), 0.0);
        assert_eq!(adjust_findex(1.0 - 1e-16), 1.0);
        assert_eq!(adjust_findex(1e-17), 0.0);
        assert_eq!(adjust_findex(0.3), 0.3);
    }

    #[test]
    fn polygon_hits() {
        let v = square();
        assert!(hit_test_polygon_segment(&v, vector(-10.0, 0.0), vector(10.0, 0.0)));
        assert!(hit_test_polygon_segment(&v, vector(-1.0, 0.0), vector(1.0, 0.0)));
        assert!(hit_test_polygon_segment(&v, vector(0.0, 0.0), vector(0.0, 0.0)));
        assert!(!hit_test_polygon_segment(&v, vector(-10.0, 6.0), vector(10.0, 6.0)));
        assert!(!hit_test_polygon_segment(&v, vector(6.0, -10.0), vector(6.0, 10.0)));

        assert!(hit_test_polygon_circle(&v, vector(6.0, 0.0), vector(3.0, 0.0)));
        assert!(hit_test_polygon_circle(&v, Vector::zero(), vector(1.0, 0.0)));
        assert!(!hit_test_polygon_circle(&v, vector(8.0, 0.0), vector(3.0, 0.0)));
    }

    #[test]
    fn quad_hits() {
        let q = Quad::new(
            point(-4.0, -4.0),
            point(16.0, -4.0),
            point(16.0, 4.0),
            point(-4.0, 4.0),
        );
        assert!(hit_test_quad_segment(&q, point(10.0, -10.0), point(10.0, 10.0)));
        assert!(!hit_test_quad_segment(&q, point(30.0, -10.0), point(30.0, 10.0)));
        assert!(hit_test_quad_circle(&q, point(18.0, 0.0), vector(3.0, 0.0)));
        assert!(!hit_test_quad_circle(&q, point(25.0, 0.0), vector(3.0, 0.0)));
    }

    #[test]
    fn invalid_results() {
        assert!(is_invalid_cut_test_result(&StrokeFIndices::new(0.5, 0.5)));
        assert!(is_invalid_cut_test_result(&StrokeFIndices::new(
            StrokeFIndices::BEFORE_FIRST,
            -0.5
        )));
        assert!(is_invalid_cut_test_result(&StrokeFIndices::new(
            1.5,
            StrokeFIndices::AFTER_LAST
        )));
        assert!(!is_invalid_cut_test_result(&StrokeFIndices::new(0.25, 0.5)));
        assert!(!is_invalid_cut_test_result(&StrokeFIndices::full()));
    }
}
