// MIT/Apache2 License

use crate::{
    findices::StrokeFIndices,
    geometry::{points_close, Point, Quad, Rect, RectExt},
    intersection::StrokeIntersection,
    iterator::StrokeNodeIterator,
    node::StrokeNode,
    operations::projection_findex,
    stylus::StylusShape,
    util::{are_close, is_between_zero_and_one},
    Result,
};

/// Squared distance under which a point is considered to lie on the line
/// through its neighbors.
const COLLINEAR_TOLERANCE: f64 = 0.1;

/// The path of an eraser, tested against strokes.
#[derive(Debug, Clone)]
pub struct ErasingStroke {
    iterator: StrokeNodeIterator,
    // one entry per node of the current path
    quads: Vec<Quad>,
    bounds_connected: Vec<Rect>,
    bounds: Rect,
}

impl ErasingStroke {
    /// Create an eraser with the given tip and no path yet.
    pub fn new(shape: &StylusShape) -> Result<Self> {
        Ok(Self {
            iterator: StrokeNodeIterator::for_shape(shape)?,
            quads: Vec::new(),
            bounds_connected: Vec::new(),
            bounds: Rect::void(),
        })
    }

    /// Create an eraser that has already moved along `path`.
    #[inline]
    pub fn with_path(shape: &StylusShape, path: &[Point]) -> Result<Self> {
        let mut this = Self::new(shape)?;
        this.move_to(path);
        Ok(this)
    }

    /// Move the eraser along `path`, replacing the previous path. The new
    /// path starts where the previous one ended.
    pub fn move_to(&mut self, path: &[Point]) {
        self.quads.clear();
        self.bounds_connected.clear();
        self.bounds = Rect::void();

        if path.is_empty() {
            return;
        }

        if path.len() > 1 {
            let filtered = self.filter_points(path);
            self.iterator.continue_with_positions(&filtered);
        } else {
            self.iterator.continue_with_positions(path);
        }

        for node in self.iterator.nodes() {
            let bounds_connected = node.bounds_connected();
            self.bounds = self.bounds.merge(&bounds_connected);
            self.quads.push(node.connecting_quad());
            self.bounds_connected.push(bounds_connected);
        }
    }

    /// Bounds of the whole eraser path.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The number of nodes along the current path.
    #[inline]
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    fn node(&self, index: usize) -> StrokeNode<'_> {
        self.iterator
            .node_unchecked(index, index.checked_sub(1))
            .with_connecting_quad(self.quads[index])
    }

    fn nodes(&self) -> impl Iterator<Item = (StrokeNode<'_>, &Rect)> + '_ {
        (0..self.quads.len()).map(move |i| (self.node(i), &self.bounds_connected[i]))
    }

    /// Whether the eraser path touches the stroke anywhere.
    pub fn hit_test(&self, ink: &StrokeNodeIterator) -> bool {
        if self.is_empty() {
            return false;
        }

        let mut ink_segment_bounds = Rect::void();
        for ink_node in ink.nodes() {
            let ink_node_bounds = ink_node.bounds();
            ink_segment_bounds = ink_segment_bounds.merge(&ink_node_bounds);

            if ink_segment_bounds.touches(&self.bounds) {
                let hit = self.nodes().any(|(erasing_node, bounds)| {
                    ink_segment_bounds.touches(bounds) && erasing_node.hit_test(&ink_node)
                });
                if hit {
                    return true;
                }
            }

            ink_segment_bounds = ink_node_bounds;
        }

        false
    }

    /// Find the parts of the stroke under the eraser path. Returns `true` if
    /// there were any, which are then in `intersections`, ordered along the
    /// stroke.
    pub fn erase_test(&self, ink: &StrokeNodeIterator, intersections: &mut Vec<StrokeIntersection>) -> bool {
        intersections.clear();

        if self.is_empty() {
            return false;
        }

        let mut erase_at: Vec<StrokeFIndices> = Vec::new();
        let mut ink_segment_bounds = Rect::void();

        for ink_node in ink.nodes() {
            let ink_node_bounds = ink_node.bounds();
            ink_segment_bounds = ink_segment_bounds.merge(&ink_node_bounds);

            if ink_segment_bounds.touches(&self.bounds) {
                let index = erase_at.len();

                for (erasing_node, bounds) in self.nodes() {
                    if !ink_segment_bounds.touches(bounds) {
                        continue;
                    }

                    let fragment = ink_node.cut_test(&erasing_node);
                    if fragment.is_empty() {
                        continue;
                    }

                    insert_fragment(&mut erase_at, index, fragment);

                    // the whole segment is gone
                    if erase_at.last().map_or(false, StrokeFIndices::is_full) {
                        break;
                    }
                }

                // join the fragment reaching past the previous node with the
                // one of this segment starting before it
                if index > 0 && index < erase_at.len() {
                    let mut last_fragment = erase_at[index - 1];
                    if are_close(last_fragment.end_findex(), StrokeFIndices::AFTER_LAST) {
                        if are_close(erase_at[index].begin_findex(), StrokeFIndices::BEFORE_FIRST) {
                            last_fragment.set_end_findex(erase_at[index].end_findex());
                            erase_at.remove(index);
                        } else {
                            last_fragment.set_end_findex(ink_node.index() as f64);
                        }
                        erase_at[index - 1] = last_fragment;
                    }
                }
            }

            ink_segment_bounds = ink_node_bounds;
        }

        intersections.extend(erase_at.iter().map(|segment| {
            StrokeIntersection::new(
                segment.begin_findex(),
                StrokeFIndices::AFTER_LAST,
                StrokeFIndices::BEFORE_FIRST,
                segment.end_findex(),
            )
        }));

        !intersections.is_empty()
    }

    /// Drop duplicates and points lying on the line through their
    /// neighbors. `path` has at least two points.
    fn filter_points(&self, path: &[Point]) -> Vec<Point> {
        debug_assert!(path.len() > 1);

        let mut filtered = Vec::with_capacity(path.len());
        let (mut back2, mut back1, start) = match self.iterator.points().last() {
            None => {
                filtered.extend_from_slice(&path[..2]);
                (path[0], path[1], 2)
            }
            Some(last) => {
                filtered.push(path[0]);
                (last.position(), path[0], 1)
            }
        };

        let mut collinear = 0;
        for &p in &path[start..] {
            if points_close(back1, p) {
                continue;
            }

            let begin = back2 - back1;
            let end = p - back1;
            // the point on the line nearest to back1
            let findex = projection_findex(begin, end);
            if is_between_zero_and_one(findex) {
                let v = begin + (end - begin) * findex;
                if v.square_length() < COLLINEAR_TOLERANCE {
                    // back1 lies on the line to p, so p replaces it
                    if let Some(last) = filtered.last_mut() {
                        *last = p;
                    }
                    back1 = p;
                    collinear += 1;
                    continue;
                }
            }

            filtered.push(p);
            back2 = back1;
            back1 = p;
        }

        log::trace!(
            "Eraser path of {} points, {} screened, {} of them collinear",
            path.len(),
            path.len() - filtered.len(),
            collinear
        );

        filtered
    }
}

/// Merge a fragment into the fragments found so far for the current ink
/// segment, which start at `first`. The list stays ordered.
fn insert_fragment(erase_at: &mut Vec<StrokeFIndices>, first: usize, mut fragment: StrokeFIndices) {
    let mut i = first;
    while i < erase_at.len() {
        let last_fragment = erase_at[i];
        if fragment.begin_findex() < last_fragment.end_findex() {
            if fragment.end_findex() > last_fragment.begin_findex() {
                fragment = StrokeFIndices::new(
                    last_fragment.begin_findex().min(fragment.begin_findex()),
                    last_fragment.end_findex().max(fragment.end_findex()),
                );

                if fragment.end_findex() <= last_fragment.end_findex() || i + 1 == erase_at.len() {
                    erase_at[i] = fragment;
                    return;
                }

                // the merged fragment may swallow the next ones too
                erase_at.remove(i);
                continue;
            }

            erase_at.insert(i, fragment);
            return;
        }
        i += 1;
    }

    erase_at.push(fragment);
}
