// MIT/Apache2 License

use crate::{
    findices::StrokeFIndices,
    geometry::{Point, Rect, RectExt, Vector},
    intersection::StrokeIntersection,
    iterator::StrokeNodeIterator,
    node::StrokeNode,
    operations::adjust_findex,
    util::{are_close, greater_than, greater_than_or_close, is_zero, less_than, less_than_or_close},
};

/// Points closer than this to the previous lasso point, along both axes,
/// are dropped.
const MIN_DISTANCE: f64 = 1.0;

/// A closed selection outline, used to find the parts of strokes it encloses.
#[derive(Debug, Clone)]
pub struct Lasso {
    points: Vec<Point>,
    bounds: Rect,
    looping: Looping,
}

#[derive(Debug, Copy, Clone)]
enum Looping {
    /// Every point extends the lasso.
    Free,
    /// The lasso stops growing once it crosses itself.
    Single { closed: bool, previous_bounds: Rect },
}

impl Default for Lasso {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Lasso {
    /// Create a lasso that grows with every point.
    #[inline]
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            bounds: Rect::void(),
            looping: Looping::Free,
        }
    }

    /// Create a lasso that stops at its first self-crossing. The part
    /// before the crossing is cut off, leaving a single loop.
    #[inline]
    pub fn single_loop() -> Self {
        Self {
            looping: Looping::Single {
                closed: false,
                previous_bounds: Rect::void(),
            },
            ..Self::new()
        }
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the lasso encloses no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.len() < 3
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Whether a single-loop lasso has closed its loop.
    #[inline]
    pub fn is_closed(&self) -> bool {
        matches!(self.looping, Looping::Single { closed: true, .. })
    }

    pub fn add_points<I: IntoIterator<Item = Point>>(&mut self, points: I) {
        points.into_iter().for_each(|p| self.add_point(p));
    }

    pub fn add_point(&mut self, point: Point) {
        if self.filter(point) {
            return;
        }

        if let Looping::Single {
            ref mut previous_bounds,
            ..
        } = self.looping
        {
            *previous_bounds = self.bounds;
        }
        self.points.push(point);
        self.bounds = self.bounds.merge_point(point);
    }

    /// Whether the point should not be added.
    fn filter(&mut self, point: Point) -> bool {
        let last = match self.points.last() {
            Some(last) => *last,
            None => return false,
        };

        if let Looping::Single { closed: true, .. } = self.looping {
            return true;
        }

        let v = point - last;
        if v.x.abs() < MIN_DISTANCE && v.y.abs() < MIN_DISTANCE {
            return true;
        }

        if let Looping::Single { previous_bounds, .. } = self.looping {
            if let Some(at) = self.crossing_with_existing(point, &previous_bounds) {
                self.close_loop(at);
                return true;
            }
        }

        false
    }

    /// Where the segment from the last point to `point` crosses the lasso,
    /// as a fractional point index.
    fn crossing_with_existing(&self, point: Point, previous_bounds: &Rect) -> Option<f64> {
        let count = self.points.len();
        let last = self.points[count - 1];
        let new_bounds = Rect::from_corners(last, point);
        if !previous_bounds.touches(&new_bounds) {
            return None;
        }

        (0..count.saturating_sub(2)).find_map(|i| {
            let (a, b) = (self.points[i], self.points[i + 1]);
            if !Rect::from_corners(a, b).touches(&new_bounds) {
                return None;
            }
            segment_crossing(last - a, point - a, Vector::zero(), b - a).map(|s| i as f64 + s)
        })
    }

    fn close_loop(&mut self, at: f64) {
        let count = self.points.len();
        // crossing the very start of the last segment does not close anything
        if at == (count - 2) as f64 {
            return;
        }

        let i = at as usize;
        let mut moved = false;
        if !are_close(i as f64, at) {
            let (a, b) = (self.points[i], self.points[i + 1]);
            self.points[i] = a.lerp(b, at - i as f64);
            moved = true;
        }
        if i > 0 {
            self.points.drain(..i);
            moved = true;
        }
        if moved {
            self.bounds = self
                .points
                .iter()
                .fold(Rect::void(), |bounds, p| bounds.merge_point(*p));
        }

        if let Looping::Single { ref mut closed, .. } = self.looping {
            *closed = true;
        }
    }

    /// Whether the point lies inside the lasso or on its outline.
    pub fn contains(&self, point: Point) -> bool {
        if !self.bounds.holds(point) {
            return false;
        }

        // whether the point is above the last lasso point not level with it
        let mut is_higher = self
            .points
            .iter()
            .rev()
            .find(|p| !are_close(p.y, point.y))
            .map_or(false, |p| point.y < p.y);

        let mut is_inside = false;
        let mut prev = match self.points.last() {
            Some(p) => *p,
            None => return false,
        };

        for (i, &lasso_point) in self.points.iter().enumerate() {
            if are_close(lasso_point.y, point.y) {
                if are_close(lasso_point.x, point.x) {
                    return true;
                }
                if i != 0
                    && are_close(prev.y, point.y)
                    && greater_than_or_close(point.x, prev.x.min(lasso_point.x))
                    && less_than_or_close(point.x, prev.x.max(lasso_point.x))
                {
                    return true;
                }
            } else if is_higher != (point.y < lasso_point.y) {
                is_higher = !is_higher;
                if greater_than_or_close(point.x, prev.x.max(lasso_point.x)) {
                    // the edge is entirely to the left
                    is_inside = !is_inside;
                } else if greater_than_or_close(point.x, prev.x.min(lasso_point.x)) {
                    let edge = lasso_point - prev;
                    let x = prev.x + (edge.x / edge.y) * (point.y - prev.y);
                    if greater_than_or_close(point.x, x) {
                        is_inside = !is_inside;
                    }
                }
            }
            prev = lasso_point;
        }

        is_inside
    }

    /// Find the parts of the stroke the lasso goes over and encloses.
    ///
    /// Each intersection has the range of the stroke inside the lasso as its
    /// in-segment, and the range up to the outer ends of the crossings on
    /// either side as its hit-segment. A stroke entirely inside yields
    /// [`StrokeIntersection::FULL`].
    pub fn hit_test(&self, iterator: &StrokeNodeIterator) -> Vec<StrokeIntersection> {
        if self.is_empty() {
            return Vec::new();
        }

        let lasso_last = self.points[self.points.len() - 1];
        let mut segment_bounds = Rect::void();
        let mut last_node_position = None;
        let mut current: Option<LassoCrossing<'_>> = None;
        let mut crossings = Vec::new();

        for node in iterator.nodes() {
            let node_bounds = node.bounds();
            segment_bounds = segment_bounds.merge(&node_bounds);

            if segment_bounds.touches(&self.bounds) {
                let mut last_point = lasso_last;
                for &point in &self.points {
                    let begin = last_point;
                    last_point = point;

                    if !segment_bounds.touches(&Rect::from_corners(begin, point)) {
                        continue;
                    }

                    let findices = node.cut_test_segment(begin, point);
                    if findices.is_empty() {
                        continue;
                    }

                    // a crossing that does not continue the current one starts
                    // a new one
                    let crossing = LassoCrossing::new(findices, &node);
                    let merged = current.as_mut().map_or(false, |c| c.merge(&crossing));
                    if !merged {
                        crossings.extend(current.replace(crossing));
                    }
                }
            }

            segment_bounds = node_bounds;
            last_node_position = Some(node.position());
        }

        crossings.extend(current);

        if crossings.is_empty() {
            return match last_node_position {
                Some(p) if self.contains(p) => {
                    log::debug!("Stroke lies entirely inside the lasso");
                    vec![StrokeIntersection::FULL]
                }
                _ => Vec::new(),
            };
        }

        sort_and_merge(&mut crossings);
        self.intersections(&crossings)
    }

    fn segment_within_lasso(&self, node: &StrokeNode<'_>, findex: f64) -> bool {
        let p = if are_close(findex, StrokeFIndices::BEFORE_FIRST) {
            node.point_at(0.0)
        } else if are_close(findex, StrokeFIndices::AFTER_LAST) {
            node.position()
        } else {
            node.point_at(findex)
        };
        self.contains(p)
    }

    /// Walk the stretches between crossings, keeping those inside the lasso.
    fn intersections(&self, crossings: &[LassoCrossing<'_>]) -> Vec<StrokeIntersection> {
        const AL: f64 = StrokeFIndices::AFTER_LAST;
        const BF: f64 = StrokeFIndices::BEFORE_FIRST;

        let mut result: Vec<StrokeIntersection> = Vec::new();
        let mut previous_inside = false;

        for x in 0..=crossings.len() {
            let mut inside = false;
            let mut can_merge = true;
            let mut si = StrokeIntersection::EMPTY;

            match x.checked_sub(1).map(|p| &crossings[p]) {
                None => {
                    si.set_hit_begin(BF);
                    si.set_in_begin(BF);
                }
                Some(previous) => {
                    si.set_in_begin(previous.findices.end_findex());
                    si.set_hit_begin(previous.findices.begin_findex());
                    inside = self.segment_within_lasso(&previous.end_node, si.in_begin());
                }
            }

            match crossings.get(x) {
                None => {
                    // a last crossing like (1.2, AL) leaves nothing inside
                    si.set_in_end(if are_close(si.in_begin(), AL) { BF } else { AL });
                    si.set_hit_end(AL);
                }
                Some(crossing) => {
                    si.set_in_end(crossing.findices.begin_findex());
                    // a first crossing like (BF, 0.67) leaves nothing inside
                    if are_close(si.in_end(), BF) {
                        si.set_in_begin(AL);
                    }
                    si.set_hit_end(crossing.findices.end_findex());
                    inside = self.segment_within_lasso(&crossing.start_node, si.in_end());

                    // both ends outside: the crossing only grazes the lasso
                    if !inside && !self.segment_within_lasso(&crossing.end_node, si.hit_end()) {
                        inside = true;
                        si.set_hit_begin(crossing.findices.begin_findex());
                        si.set_in_begin(AL);
                        si.set_in_end(BF);
                        can_merge = false;
                    }
                }
            }

            if inside {
                let merge_into = if x > 0 && previous_inside && can_merge {
                    result.last_mut()
                } else {
                    None
                };

                match merge_into {
                    Some(previous) => {
                        if previous.in_segment().is_empty() {
                            previous.set_in_begin(si.in_begin());
                        }
                        previous.set_in_end(si.in_end());
                        previous.set_hit_end(si.hit_end());
                    }
                    None => result.push(si),
                }

                if are_close(si.hit_end(), AL) {
                    // the rest of the stroke is covered
                    break;
                }
            }

            previous_inside = inside;
        }

        result
    }
}

/// A run of the stroke crossing the lasso outline, with the nodes it starts
/// and ends at.
#[derive(Debug, Clone)]
struct LassoCrossing<'a> {
    findices: StrokeFIndices,
    start_node: StrokeNode<'a>,
    end_node: StrokeNode<'a>,
}

impl<'a> LassoCrossing<'a> {
    #[inline]
    fn new(findices: StrokeFIndices, node: &StrokeNode<'a>) -> Self {
        debug_assert!(!findices.is_empty());
        Self {
            findices,
            start_node: node.clone(),
            end_node: node.clone(),
        }
    }

    /// Extend this crossing by an overlapping one.
    fn merge(&mut self, other: &LassoCrossing<'a>) -> bool {
        let (this, that) = (self.findices, other.findices);
        if !(greater_than_or_close(that.end_findex(), this.begin_findex())
            && greater_than_or_close(this.end_findex(), that.begin_findex()))
        {
            return false;
        }

        if less_than(that.begin_findex(), this.begin_findex()) {
            self.findices.set_begin_findex(that.begin_findex());
            self.start_node = other.start_node.clone();
        }
        if greater_than(that.end_findex(), this.end_findex()) {
            self.findices.set_end_findex(that.end_findex());
            self.end_node = other.end_node.clone();
        }
        true
    }
}

fn sort_and_merge(crossings: &mut Vec<LassoCrossing<'_>>) {
    crossings.sort_by(|a, b| a.findices.compare_to(&b.findices));

    let mut merged: Vec<LassoCrossing<'_>> = Vec::with_capacity(crossings.len());
    for crossing in crossings.drain(..) {
        let merged_in = merged.last_mut().map_or(false, |last| last.merge(&crossing));
        if !merged_in {
            merged.push(crossing);
        }
    }
    *crossings = merged;
}

/// Where the segment `hit_begin..hit_end` crosses `org_begin..org_end`, as a
/// fraction of the latter.
fn segment_crossing(hit_begin: Vector, hit_end: Vector, org_begin: Vector, org_end: Vector) -> Option<f64> {
    let ab = org_end - org_begin;
    let ca = org_begin - hit_begin;
    let cd = hit_end - hit_begin;

    let det = ab.cross(cd);
    if is_zero(det) {
        // parallel
        return None;
    }

    let along_hit = adjust_findex(ab.cross(ca) / det);
    if !(0.0..=1.0).contains(&along_hit) {
        return None;
    }

    let along_org = adjust_findex(cd.cross(ca) / det);
    if (0.0..=1.0).contains(&along_org) {
        Some(along_org)
    } else {
        None
    }
}
