// MIT/Apache2 License

mod instruction;

pub use instruction::*;

use crate::{
    attributes::DrawingAttributes,
    geometry::{Point, Rect, RectExt, Transform},
    iterator::StrokeNodeIterator,
    node::{OutlinePoint, StrokeNode},
    stylus::StylusTip,
    util::is_one,
};
use std::f64::consts::PI;

/// Nodes whose bounds overlap at least this much (in percent of the smaller
/// box) are drawn as separate figures rather than one outline.
const TWO_NODE_OVERLAP: f64 = 70.0;
/// Overlap under which a node swallows its neighbor at the start of a
/// segment.
const START_OF_SEGMENT_OVERLAP: f64 = 99.99999;
/// Area ratio under which an overlapping node gets its own figure.
const AREA_RATIO: f64 = 0.90;
/// Area ratio under which a node of a transformed stroke gets its own figure.
const TRANSFORMED_AREA_RATIO: f64 = 0.70;
/// Turning angles, in degrees, that end an outline.
const ABSOLUTE_TURN: f64 = 90.0;
const OVERLAP_TURN: f64 = 30.0;
/// Turning angles, in degrees, that get a node drawn in a transformed stroke.
const TRANSFORMED_TURN: f64 = 45.0;
const LARGE_NODE_TURN: f64 = 20.0;
const SKEWED_TURN: f64 = 10.0;
/// Node extent over which `LARGE_NODE_TURN` applies.
const LARGE_NODE_EXTENT: f64 = 40.0;

/// How two boxes overlap.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RectCompareResult {
    /// The first box is the larger, and nearly holds the second.
    Rect1ContainsRect2,
    /// The second box is the larger, and nearly holds the first.
    Rect2ContainsRect1,
    NoIntersection,
}

/// Compare two boxes. One contains the other when their overlap covers at
/// least `percent_intersect` percent of the smaller one.
pub fn fuzzy_contains(rect1: &Rect, rect2: &Rect, percent_intersect: f64) -> RectCompareResult {
    debug_assert!((0.0..=100.0).contains(&percent_intersect));

    if rect1.is_void() || rect2.is_void() {
        return RectCompareResult::NoIntersection;
    }

    let intersect_width = (rect1.max.x.min(rect2.max.x) - rect1.min.x.max(rect2.min.x)).max(0.0);
    let intersect_height = (rect1.max.y.min(rect2.max.y) - rect1.min.y.max(rect2.min.y)).max(0.0);
    if intersect_width == 0.0 || intersect_height == 0.0 {
        return RectCompareResult::NoIntersection;
    }

    let area1 = rect1.surface();
    let area2 = rect2.surface();
    let intersect = (intersect_width * intersect_height) / area1.min(area2) * 100.0;

    if intersect >= percent_intersect {
        if area1 >= area2 {
            RectCompareResult::Rect1ContainsRect2
        } else {
            RectCompareResult::Rect2ContainsRect1
        }
    } else {
        RectCompareResult::NoIntersection
    }
}

/// The direction from one position to the next, in degrees in `[0, 360)`,
/// with y pointing down. Positions closer than a thousandth are treated as
/// the same, which gives 0.
pub fn angle_between(previous: Point, current: Point) -> f64 {
    let dx = (current.x * 1000.0) - (previous.x * 1000.0);
    let dy = (current.y * 1000.0) - (previous.y * 1000.0);
    if dx.trunc() == 0.0 && dy.trunc() == 0.0 {
        return 0.0;
    }

    let angle = if dx == 0.0 {
        if dy > 0.0 {
            PI / 2.0
        } else {
            PI * 3.0 / 2.0
        }
    } else if dy == 0.0 {
        if dx > 0.0 {
            0.0
        } else {
            PI
        }
    } else if dx < 0.0 {
        (dy / dx).atan() + PI
    } else if dy < 0.0 {
        (dy / dx).atan() + (2.0 * PI)
    } else {
        (dy / dx).atan()
    };

    angle.to_degrees()
}

/// How much the direction turned since `last_angle`, which is then updated
/// to the current direction. Turning across 0 degrees is handled. Positions
/// closer than a thousandth do not turn and leave `last_angle` alone.
pub fn angle_delta_from_last(previous: Point, current: Point, last_angle: &mut f64) -> f64 {
    let dx = (current.x * 1000.0) - (previous.x * 1000.0);
    let dy = (current.y * 1000.0) - (previous.y * 1000.0);
    if dx.trunc() == 0.0 && dy.trunc() == 0.0 {
        return 0.0;
    }

    let angle = angle_between(previous, current);
    let delta = if *last_angle >= 270.0 && angle <= 90.0 {
        *last_angle - (360.0 + angle)
    } else if *last_angle <= 90.0 && angle >= 270.0 {
        (360.0 + *last_angle) - angle
    } else {
        *last_angle - angle
    };

    *last_angle = angle;
    delta
}

#[inline]
fn is_identity_or_scale(t: &Transform) -> bool {
    t.m12 == 0.0 && t.m21 == 0.0 && t.m31 == 0.0 && t.m32 == 0.0
}

#[inline]
fn is_skewed(t: &Transform) -> bool {
    t.m12 != 0.0 || t.m21 != 0.0
}

/// Compiles the nodes of a stroke into the figures that draw it.
///
/// Nodes that add nothing visible are skipped, and runs of nodes going the
/// same way are drawn as one outline rather than one figure per node.
#[derive(Debug, Default)]
pub struct StrokeRenderer {
    instructions: Vec<Instruction>,
    ab: Vec<OutlinePoint>,
    dc: Vec<OutlinePoint>,
    points: Vec<Point>,
}

impl StrokeRenderer {
    /// Compute the figures of the stroke and, if `calculate_bounds` is set,
    /// its bounds.
    pub fn calc_geometry_and_bounds(
        iterator: &StrokeNodeIterator,
        attributes: &DrawingAttributes,
        calculate_bounds: bool,
    ) -> StrokeGeometry {
        let mut renderer = Self::default();
        let transform = &attributes.stylus_tip_transform;

        let bounds = if is_identity_or_scale(transform) {
            renderer.render(iterator, attributes, calculate_bounds)
        } else {
            log::debug!("Rendering a stroke with a transformed tip: {:?}", transform);
            renderer.render_with_transform(iterator, is_skewed(transform), calculate_bounds)
        };

        StrokeGeometry {
            instructions: renderer.instructions,
            bounds,
        }
    }

    /// Draw every node whose direction or size changes enough, and join
    /// all of them with one polygon through the connecting quads.
    fn render_with_transform(
        &mut self,
        iterator: &StrokeNodeIterator,
        skewed: bool,
        calculate_bounds: bool,
    ) -> Rect {
        let count = iterator.len();
        let mut bounds = Rect::void();
        let mut ab_side = Vec::with_capacity(count * 2);
        let mut dc_side = Vec::with_capacity(count * 2);
        let mut last_angle = 0.0;
        let mut previous_previous_rendered = false;
        let mut last_rect = Rect::new(Point::origin(), Point::origin());

        for node in iterator.nodes() {
            let index = node.index();
            let node_bounds = node.bounds();
            if calculate_bounds {
                bounds = bounds.merge(&node_bounds);
            }

            let delta = angle_delta_from_last(node.previous_position(), node.position(), &mut last_angle).abs();

            let tolerance = if skewed {
                SKEWED_TURN
            } else if node_bounds.width() > LARGE_NODE_EXTENT || node_bounds.height() > LARGE_NODE_EXTENT {
                LARGE_NODE_TURN
            } else {
                TRANSFORMED_TURN
            };
            let direction_changed = delta > tolerance && delta < (360.0 - tolerance);

            let previous_area = last_rect.surface();
            let area = node_bounds.surface();
            let area_changed = previous_area.min(area) / previous_area.max(area) <= TRANSFORMED_AREA_RATIO;
            last_rect = node_bounds;

            // the first and last two nodes are always drawn
            if index <= 1 || index + 2 >= count || direction_changed || area_changed {
                if direction_changed && !previous_previous_rendered && index > 1 && index + 1 < count {
                    node.previous_contour_points(&mut self.points);
                    self.add_figure(node.is_ellipse());
                    previous_previous_rendered = true;
                }

                node.contour_points(&mut self.points);
                self.add_figure(node.is_ellipse());
            }

            if !direction_changed {
                previous_previous_rendered = false;
            }

            let quad = node.connecting_quad();
            if !quad.is_empty() {
                ab_side.extend_from_slice(&[quad.a, quad.b]);
                dc_side.extend_from_slice(&[quad.d, quad.c]);
            }
        }

        if !ab_side.is_empty() {
            self.points.extend(ab_side);
            self.points.extend(dc_side.into_iter().rev());
            self.add_figure(false);
        }

        bounds
    }

    /// Walk the nodes with a window of three: the node before last, the
    /// last node and the current one. Nodes hidden by their neighbors are
    /// dropped, and the outline of the rest is collected on its two sides
    /// until the stroke turns too sharply or changes size.
    fn render(&mut self, iterator: &StrokeNodeIterator, attributes: &DrawingAttributes, calculate_bounds: bool) -> Rect {
        let count = iterator.len();
        let mut bounds = Rect::void();

        let mut prev_prev: Option<StrokeNode<'_>> = None;
        let mut prev: Option<StrokeNode<'_>> = None;
        let mut current: Option<StrokeNode<'_>> = None;
        let mut prev_prev_bounds = Rect::void();
        let mut prev_bounds = Rect::void();
        let mut current_bounds = Rect::void();

        // larger nibs tolerate more overlap before a node is dropped
        let max_extent = attributes.width.max(attributes.height);
        let percent_intersect = 95.0 + 4.99999f64.min((max_extent / 20.0) * 5.0);

        let mut prev_angle: Option<f64> = None;
        let mut is_start_of_segment = true;
        let is_ellipse = attributes.stylus_tip == StylusTip::Ellipse;
        let ignore_pressure = attributes.ignore_pressure;

        let mut index = 0;
        let mut previous_index: Option<usize> = None;

        while index < count {
            if prev_prev.is_none() {
                match prev.take() {
                    Some(p) => {
                        prev_prev = Some(p);
                        prev_prev_bounds = prev_bounds;
                    }
                    None => {
                        let node = iterator.node_unchecked(index, previous_index);
                        previous_index = Some(index);
                        index += 1;
                        prev_prev_bounds = node.bounds();
                        prev_prev = Some(node);
                        continue;
                    }
                }
            }
            let pp = match prev_prev.clone() {
                Some(pp) => pp,
                None => break,
            };

            let percent = if is_start_of_segment {
                START_OF_SEGMENT_OVERLAP
            } else {
                percent_intersect
            };

            if prev.is_none() {
                if current.is_some() {
                    prev = current.take();
                    prev_bounds = current_bounds;
                } else {
                    let node = iterator.node_unchecked(index, previous_index);
                    index += 1;
                    prev_bounds = node.bounds();

                    match fuzzy_contains(&prev_bounds, &prev_prev_bounds, percent) {
                        RectCompareResult::Rect1ContainsRect2 => {
                            // this node hides the one before it
                            prev_prev = Some(iterator.node_unchecked(index - 1, pp.index().checked_sub(1)));
                            prev_prev_bounds = prev_bounds.merge(&prev_prev_bounds);
                            previous_index = Some(index - 1);
                        }
                        RectCompareResult::Rect2ContainsRect1 => {}
                        RectCompareResult::NoIntersection => {
                            prev = Some(node);
                            previous_index = Some(index - 1);
                        }
                    }
                    continue;
                }
            }
            let p = match prev.clone() {
                Some(p) => p,
                None => break,
            };
            let cur = match current.take() {
                Some(cur) => cur,
                None => {
                    let node = iterator.node_unchecked(index, previous_index);
                    index += 1;
                    current_bounds = node.bounds();

                    let against_prev = fuzzy_contains(&current_bounds, &prev_bounds, percent);
                    let against_prev_prev = fuzzy_contains(&current_bounds, &prev_prev_bounds, percent);

                    if is_start_of_segment
                        && against_prev == RectCompareResult::Rect1ContainsRect2
                        && against_prev_prev == RectCompareResult::Rect1ContainsRect2
                    {
                        // this node hides both before it
                        if !self.ab.is_empty() {
                            p.points_at_end_of_segment(&mut self.ab, &mut self.dc);
                            self.reverse_dc_render_and_clear(is_ellipse);
                        }

                        let node = iterator.node_unchecked(index - 1, pp.index().checked_sub(1));
                        prev_prev_bounds = node.bounds();
                        prev_prev = Some(node);
                        prev = None;
                        previous_index = Some(index - 1);
                        continue;
                    }

                    match against_prev {
                        RectCompareResult::Rect1ContainsRect2 => {
                            let node = iterator.node_unchecked(index - 1, p.index().checked_sub(1));
                            if !node.connecting_quad().is_empty() {
                                prev_bounds = current_bounds.merge(&prev_bounds);
                                prev = Some(node);
                                previous_index = Some(index - 1);
                            }
                            prev_angle = None;
                            continue;
                        }
                        RectCompareResult::Rect2ContainsRect1 => continue,
                        RectCompareResult::NoIntersection => {
                            previous_index = Some(index - 1);
                            node
                        }
                    }
                }
            };

            let overlap = prev_prev_bounds.touches(&current_bounds);
            if calculate_bounds {
                bounds = bounds.merge(&prev_bounds);
            }

            if self.ab.is_empty() {
                if calculate_bounds {
                    bounds = bounds.merge(&prev_prev_bounds);
                }

                if is_start_of_segment && overlap {
                    pp.contour_points(&mut self.points);
                    self.add_figure(pp.is_ellipse());
                }

                p.points_at_start_of_segment(&mut self.ab, &mut self.dc);
                is_start_of_segment = false;
            }

            let last_angle = prev_angle.get_or_insert_with(|| angle_between(pp.position(), p.position()));
            let delta = angle_delta_from_last(p.position(), cur.position(), last_angle);
            let turn = delta.abs();

            let over_absolute_turn = turn > ABSOLUTE_TURN && turn < (360.0 - ABSOLUTE_TURN);
            let over_overlap_turn = overlap
                && !(ignore_pressure || is_one(cur.pressure_factor()))
                && turn > OVERLAP_TURN
                && turn < (360.0 - OVERLAP_TURN);

            let prev_area = prev_bounds.surface();
            let current_area = current_bounds.surface();
            let area_changed = !(prev_area == current_area && prev_area == prev_prev_bounds.surface());
            let over_area_ratio =
                overlap && area_changed && prev_area.min(current_area) / prev_area.max(current_area) <= AREA_RATIO;

            if area_changed || delta != 0.0 || index >= count {
                if (overlap && (over_overlap_turn || over_area_ratio)) || over_absolute_turn {
                    p.points_at_end_of_segment(&mut self.ab, &mut self.dc);
                    self.reverse_dc_render_and_clear(is_ellipse);

                    if over_area_ratio {
                        p.contour_points(&mut self.points);
                        self.add_figure(p.is_ellipse());
                    }
                } else if cur.points_at_middle_segment(&p, delta, &mut self.ab, &mut self.dc) {
                    log::debug!("Outline sides miss each other at node {}, closing the figure", p.index());
                    p.points_at_end_of_segment(&mut self.ab, &mut self.dc);
                    self.reverse_dc_render_and_clear(is_ellipse);
                }
            }

            current = Some(cur);
            prev_prev = None;
            prev_prev_bounds = Rect::void();
        }

        match (prev_prev, prev, current) {
            (Some(pp), Some(p), _) => {
                if calculate_bounds {
                    bounds = bounds.merge(&prev_prev_bounds).merge(&prev_bounds);
                }

                if !self.ab.is_empty() {
                    p.points_at_end_of_segment(&mut self.ab, &mut self.dc);
                    self.reverse_dc_render_and_clear(is_ellipse);
                } else {
                    self.render_two_stroke_nodes(&pp, &prev_prev_bounds, &p, &prev_bounds);
                }
            }
            (Some(pp), None, _) => {
                if calculate_bounds {
                    bounds = bounds.merge(&prev_prev_bounds);
                }

                pp.contour_points(&mut self.points);
                self.add_figure(pp.is_ellipse());
            }
            (None, Some(p), Some(cur)) => {
                if calculate_bounds {
                    bounds = bounds.merge(&prev_bounds).merge(&current_bounds);
                }

                if !self.ab.is_empty() {
                    cur.points_at_end_of_segment(&mut self.ab, &mut self.dc);
                    self.reverse_dc_render_and_clear(is_ellipse);

                    if fuzzy_contains(&current_bounds, &prev_bounds, TWO_NODE_OVERLAP)
                        != RectCompareResult::NoIntersection
                    {
                        cur.contour_points(&mut self.points);
                        self.add_figure(cur.is_ellipse());
                    }
                } else {
                    self.render_two_stroke_nodes(&p, &prev_bounds, &cur, &current_bounds);
                }
            }
            _ => {}
        }

        bounds
    }

    /// Draw the last two nodes of a stroke: as separate figures when they
    /// overlap a lot, otherwise as one outline.
    fn render_two_stroke_nodes(
        &mut self,
        previous: &StrokeNode<'_>,
        previous_bounds: &Rect,
        current: &StrokeNode<'_>,
        current_bounds: &Rect,
    ) {
        if fuzzy_contains(previous_bounds, current_bounds, TWO_NODE_OVERLAP) != RectCompareResult::NoIntersection {
            previous.contour_points(&mut self.points);
            self.add_figure(previous.is_ellipse());

            let quad = current.connecting_quad();
            if !quad.is_empty() {
                self.points.extend_from_slice(&quad.vertices());
                self.add_figure(false);
            }

            current.contour_points(&mut self.points);
            self.add_figure(current.is_ellipse());
        } else {
            current.points_at_start_of_segment(&mut self.ab, &mut self.dc);
            current.points_at_end_of_segment(&mut self.ab, &mut self.dc);
            self.reverse_dc_render_and_clear(current.is_ellipse());
        }
    }

    /// Close the outline collected so far: along the AB side, then back
    /// along the DC side.
    fn reverse_dc_render_and_clear(&mut self, is_ellipse: bool) {
        self.dc.reverse();

        if is_ellipse {
            self.add_arc_figure();
        } else {
            self.add_polyline_figure();
        }

        self.ab.clear();
        self.dc.clear();
    }

    fn add_polyline_figure(&mut self) {
        let start = match self.ab.first() {
            Some(OutlinePoint::Point(start)) => *start,
            _ => return,
        };

        self.instructions.push(Instruction::BeginFigure(start));
        let sides = self.ab[1..].iter().chain(self.dc.iter());
        self.instructions.extend(sides.filter_map(|p| match p {
            OutlinePoint::Point(p) => Some(Instruction::LineTo(*p)),
            OutlinePoint::Arc(_) => None,
        }));
        self.instructions.push(Instruction::Close);
    }

    fn add_arc_figure(&mut self) {
        if self.ab.is_empty() || self.dc.is_empty() {
            return;
        }
        let start = match self.ab[0] {
            OutlinePoint::Point(start) => start,
            OutlinePoint::Arc(_) => return,
        };

        self.instructions.push(Instruction::BeginFigure(start));

        let mut sides = self.ab[1..].iter().chain(self.dc.iter());
        while let Some(p) = sides.next() {
            match *p {
                OutlinePoint::Point(to) => self.instructions.push(Instruction::LineTo(to)),
                OutlinePoint::Arc(size) => {
                    // an arc is always followed by the point it ends at
                    if let Some(OutlinePoint::Point(to)) = sides.next() {
                        self.instructions.push(Instruction::ArcTo {
                            to: *to,
                            radii: size / 2.0,
                            rotation: 0.0,
                            large_arc: false,
                            sweep: true,
                        });
                    }
                }
            }
        }

        self.instructions.push(Instruction::Close);
    }

    /// Add a closed figure through the collected points, which are then
    /// cleared. Bezier figures take the points three at a time as control
    /// points and end point; the figure starts at the last point.
    fn add_figure(&mut self, is_bezier: bool) {
        let start = match self.points.last() {
            Some(start) => *start,
            None => return,
        };

        self.instructions.push(Instruction::BeginFigure(start));
        if is_bezier {
            self.instructions.extend(self.points.chunks_exact(3).map(|c| Instruction::CubicTo {
                ctrl1: c[0],
                ctrl2: c[1],
                to: c[2],
            }));
        } else {
            self.instructions
                .extend(self.points.iter().map(|p| Instruction::LineTo(*p)));
        }
        self.instructions.push(Instruction::Close);

        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geometry::{point, Angle},
        stylus::StylusPoint,
    };
    use approx::assert_relative_eq;

    fn square(size: f64) -> DrawingAttributes {
        DrawingAttributes::default()
            .with_stylus_tip(StylusTip::Rectangle)
            .with_size(size, size)
            .with_ignore_pressure(true)
    }

    fn render(positions: &[(f64, f64)], attributes: &DrawingAttributes) -> StrokeGeometry {
        let points = positions.iter().map(|&(x, y)| StylusPoint::new(x, y)).collect();
        let iterator = StrokeNodeIterator::new(points, attributes).unwrap();
        StrokeRenderer::calc_geometry_and_bounds(&iterator, attributes, true)
    }

    fn count_arcs(geometry: &StrokeGeometry) -> usize {
        geometry
            .instructions
            .iter()
            .filter(|i| matches!(i, Instruction::ArcTo { .. }))
            .count()
    }

    #[test]
    fn fuzzy_containment() {
        let big = Rect::new(point(0.0, 0.0), point(10.0, 10.0));
        let small = Rect::new(point(1.0, 1.0), point(5.0, 5.0));
        let apart = Rect::new(point(20.0, 0.0), point(30.0, 10.0));
        let half = Rect::new(point(5.0, 0.0), point(15.0, 10.0));

        assert_eq!(fuzzy_contains(&big, &small, 95.0), RectCompareResult::Rect1ContainsRect2);
        assert_eq!(fuzzy_contains(&small, &big, 95.0), RectCompareResult::Rect2ContainsRect1);
        assert_eq!(fuzzy_contains(&big, &apart, 1.0), RectCompareResult::NoIntersection);
        assert_eq!(fuzzy_contains(&big, &half, 70.0), RectCompareResult::NoIntersection);
        assert_eq!(fuzzy_contains(&big, &half, 50.0), RectCompareResult::Rect1ContainsRect2);
        assert_eq!(fuzzy_contains(&big, &Rect::void(), 0.0), RectCompareResult::NoIntersection);
    }

    #[test]
    fn angles() {
        let o = point(0.0, 0.0);
        assert_relative_eq!(angle_between(o, point(1.0, 0.0)), 0.0);
        assert_relative_eq!(angle_between(o, point(0.0, 1.0)), 90.0);
        assert_relative_eq!(angle_between(o, point(-1.0, 0.0)), 180.0);
        assert_relative_eq!(angle_between(o, point(0.0, -1.0)), 270.0);
        assert_relative_eq!(angle_between(o, point(1.0, 1.0)), 45.0, epsilon = 1e-9);
        assert_relative_eq!(angle_between(o, point(1.0, -1.0)), 315.0, epsilon = 1e-9);
        assert_relative_eq!(angle_between(o, point(0.0001, 0.0)), 0.0);

        let mut last = 315.0;
        let delta = angle_delta_from_last(o, point(1.0, 1.0), &mut last);
        assert_relative_eq!(delta, -90.0, epsilon = 1e-9);
        assert_relative_eq!(last, 45.0, epsilon = 1e-9);

        let delta = angle_delta_from_last(o, point(1.0, -1.0), &mut last);
        assert_relative_eq!(delta, 90.0, epsilon = 1e-9);

        let delta = angle_delta_from_last(o, o, &mut last);
        assert_eq!(delta, 0.0);
        assert_relative_eq!(last, 315.0, epsilon = 1e-9);
    }

    #[test]
    fn single_node_is_one_figure() {
        let geometry = render(&[(5.0, 5.0)], &square(4.0));
        assert_eq!(geometry.figure_count(), 1);
        assert_eq!(geometry.instructions.len(), 6);
        assert_eq!(geometry.instructions[0], Instruction::BeginFigure(point(3.0, 7.0)));
        assert_eq!(geometry.instructions[5], Instruction::Close);
        assert_eq!(geometry.bounds, Rect::new(point(3.0, 3.0), point(7.0, 7.0)));

        let empty = render(&[], &square(4.0));
        assert!(empty.instructions.is_empty());
        assert!(empty.bounds.is_void());
    }

    #[test]
    fn square_stroke_is_one_outline() {
        let geometry = render(&[(0.0, 0.0), (20.0, 0.0)], &square(8.0));
        assert_eq!(
            geometry.instructions,
            vec![
                Instruction::BeginFigure(point(-4.0, 4.0)),
                Instruction::LineTo(point(-4.0, -4.0)),
                Instruction::LineTo(point(16.0, -4.0)),
                Instruction::LineTo(point(24.0, -4.0)),
                Instruction::LineTo(point(24.0, 4.0)),
                Instruction::LineTo(point(16.0, 4.0)),
                Instruction::LineTo(point(-4.0, 4.0)),
                Instruction::Close,
            ]
        );
        assert_eq!(geometry.bounds, Rect::new(point(-4.0, -4.0), point(24.0, 4.0)));
    }

    #[test]
    fn close_nodes_are_separate_figures() {
        let geometry = render(&[(0.0, 0.0), (1.0, 0.0)], &square(8.0));
        // both nodes and the quad between them
        assert_eq!(geometry.figure_count(), 3);
    }

    #[test]
    fn straight_run_is_one_outline() {
        let _ = env_logger::builder().is_test(true).try_init();

        let geometry = render(&[(0.0, 0.0), (20.0, 0.0), (40.0, 0.0), (60.0, 0.0)], &square(8.0));
        assert_eq!(geometry.figure_count(), 1);
        assert_eq!(geometry.bounds, Rect::new(point(-4.0, -4.0), point(64.0, 4.0)));
        assert!(geometry.instructions.contains(&Instruction::LineTo(point(64.0, -4.0))));
    }

    #[test]
    fn sharp_turn_starts_a_new_outline() {
        let geometry = render(&[(0.0, 0.0), (20.0, 0.0), (40.0, 0.0), (20.0, 0.0)], &square(8.0));
        assert!(geometry.figure_count() >= 2);
    }

    #[test]
    fn round_stroke_arcs() {
        let attributes = DrawingAttributes::default()
            .with_size(10.0, 10.0)
            .with_ignore_pressure(true);
        let geometry = render(&[(0.0, 0.0), (20.0, 0.0)], &attributes);

        assert_eq!(geometry.figure_count(), 1);
        assert_eq!(count_arcs(&geometry), 2);
        assert!(geometry.instructions.iter().all(|i| match i {
            Instruction::ArcTo { radii, sweep, .. } => {
                *radii == crate::geometry::Size::new(5.0, 5.0) && *sweep
            }
            _ => true,
        }));
        assert_eq!(geometry.bounds, Rect::new(point(-5.0, -5.0), point(25.0, 5.0)));

        let single = render(&[(0.0, 0.0)], &attributes);
        let curves = single
            .instructions
            .iter()
            .filter(|i| matches!(i, Instruction::CubicTo { .. }))
            .count();
        assert_eq!(curves, 4);
        assert_eq!(single.instructions[0], Instruction::BeginFigure(point(-5.0, 0.0)));
    }

    #[test]
    fn transformed_tip_draws_every_end_node() {
        let attributes =
            square(8.0).with_stylus_tip_transform(Transform::rotation(Angle::degrees(30.0)));
        let geometry = render(&[(0.0, 0.0), (20.0, 0.0), (40.0, 0.0)], &attributes);

        // three nodes and the polygon through the quads
        assert_eq!(geometry.figure_count(), 4);
        assert!(!geometry.bounds.is_void());

        let scaled = square(8.0).with_stylus_tip_transform(Transform::scale(2.0, 1.0));
        let geometry = render(&[(0.0, 0.0), (40.0, 0.0)], &scaled);
        assert_eq!(geometry.figure_count(), 1);
    }

    #[test]
    fn near_coincident_sample_keeps_direction() {
        let mut last = 180.0;
        let delta = angle_delta_from_last(point(0.0, 0.0), point(0.0005, 0.0), &mut last);
        assert_eq!(delta, 0.0);
        assert_relative_eq!(last, 180.0);

        let rotated = square(8.0).with_stylus_tip_transform(Transform::rotation(Angle::degrees(30.0)));
        let steady = render(
            &[(0.0, 0.0), (0.0, 20.0), (0.0, 40.0), (0.0, 60.0), (0.0, 80.0)],
            &rotated,
        );
        let jittered = render(
            &[(0.0, 0.0), (0.0, 20.0), (0.0, 20.0005), (0.0, 40.0), (0.0, 60.0), (0.0, 80.0)],
            &rotated,
        );
        assert_eq!(steady.figure_count(), 5);
        assert_eq!(jittered.figure_count(), steady.figure_count());
    }

    #[test]
    fn geometry_converts_to_path() {
        let geometry = render(&[(0.0, 0.0), (20.0, 10.0), (40.0, 0.0)], &DrawingAttributes::default());
        let path = geometry.to_path();
        assert!(path.iter().count() > 0);
    }
}
