// MIT/Apache2 License

use super::StrokeNode;
use crate::geometry::{Point, Rect, RectExt, Size};

/// One step of a stroke outline under construction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum OutlinePoint {
    /// A straight line to the point.
    Point(Point),
    /// An elliptical arc from the preceding point to the following one, on
    /// an ellipse of the given size.
    Arc(Size),
}

impl From<Point> for OutlinePoint {
    #[inline]
    fn from(p: Point) -> Self {
        OutlinePoint::Point(p)
    }
}

#[inline]
fn arc_around(bounds: &Rect) -> OutlinePoint {
    OutlinePoint::Arc(Size::new(bounds.width(), bounds.height()))
}

impl<'a> StrokeNode<'a> {
    #[inline]
    fn vertex(&self, previous: bool, i: usize) -> Point {
        let vertices = self.operations.vertices();
        let node = if previous { &self.last_node } else { &self.this_node };
        node.position() + vertices[i % vertices.len()] * node.pressure_factor()
    }

    /// Append the outline around the start of the stroke.
    ///
    /// `ab` gets the path from D around the back of the previous node to A.
    /// `dc` gets the first point of the other side, which is walked backwards.
    pub fn points_at_start_of_segment(&self, ab: &mut Vec<OutlinePoint>, dc: &mut Vec<OutlinePoint>) {
        let quad = self.connecting_quad();

        if self.is_ellipse() {
            let start_bounds = self.operations.node_bounds(&self.last_node);
            ab.extend_from_slice(&[quad.d.into(), arc_around(&start_bounds), quad.a.into()]);
            dc.push(quad.d.into());
            return;
        }

        let end_bounds = self.bounds();
        let n = self.operations.vertices().len();
        let max_count = n * 2;

        let mut i = match (0..max_count).find(|&i| self.vertex(true, i) == quad.d) {
            Some(i) => i,
            None => {
                log::warn!("Could not find the D vertex of {:?} at the start of a stroke", quad);
                return;
            }
        };

        let mut d_in_end_node = true;
        if !end_bounds.holds(quad.d) {
            d_in_end_node = false;
            ab.push(quad.d.into());
            dc.push(quad.d.into());
        }

        i += 1;
        let mut j = 0;
        while i < max_count && j < n {
            let point = self.vertex(true, i);
            if !end_bounds.holds(point) {
                ab.push(point.into());
            }
            if d_in_end_node {
                // first point after D, clockwise
                d_in_end_node = false;
                dc.push(point.into());
            }
            if point == quad.a {
                break;
            }
            i += 1;
            j += 1;
        }
    }

    /// Append the outline around the end of the stroke.
    ///
    /// `ab` gets the path from B around the front of this node up to C, and
    /// `dc` gets C.
    pub fn points_at_end_of_segment(&self, ab: &mut Vec<OutlinePoint>, dc: &mut Vec<OutlinePoint>) {
        let quad = self.connecting_quad();

        if self.is_ellipse() {
            ab.extend_from_slice(&[quad.b.into(), arc_around(&self.bounds()), quad.c.into()]);
            return;
        }

        let n = self.operations.vertices().len();
        let max_count = n * 2;

        let mut i = match (0..max_count).find(|&i| self.vertex(false, i) == quad.b) {
            Some(i) => i,
            None => {
                log::warn!("Could not find the B vertex of {:?} at the end of a stroke", quad);
                return;
            }
        };
        ab.push(quad.b.into());

        i += 1;
        let mut j = 0;
        while i < max_count && j < n {
            let point = self.vertex(false, i);
            if point == quad.c {
                break;
            }
            ab.push(point.into());
            i += 1;
            j += 1;
        }

        dc.push(quad.c.into());
    }

    /// Append the joint between the quad ending at the previous node and the
    /// quad starting there. `angle_between_nodes` is positive when the spine
    /// turns towards the AB side.
    ///
    /// Returns `true` when the sides of the two quads do not meet near the
    /// joint, in which case the caller has to close the figure and start a
    /// new one.
    pub fn points_at_middle_segment(
        &self,
        previous: &StrokeNode<'_>,
        angle_between_nodes: f64,
        ab: &mut Vec<OutlinePoint>,
        dc: &mut Vec<OutlinePoint>,
    ) -> bool {
        let quad1 = previous.connecting_quad();
        if quad1.is_empty() {
            return false;
        }
        let quad2 = self.connecting_quad();
        if quad2.is_empty() {
            return false;
        }

        let joint_bounds = || {
            self.operations
                .node_bounds(&previous.last_node)
                .merge(&self.operations.node_bounds(&self.last_node))
                .inflate(1.0, 1.0)
        };
        let meet = |s1: Point, e1: Point, s2: Point, e2: Point| {
            StrokeNode::intersection(s1, e1, s2, e2).filter(|p| joint_bounds().holds(*p))
        };

        if self.is_ellipse() {
            let node2_bounds = self.operations.node_bounds(&self.last_node);

            if angle_between_nodes == 0.0 || (quad1.b == quad2.a && quad1.c == quad2.d) {
                ab.push(quad1.b.into());
                dc.push(quad1.c.into());
            } else if angle_between_nodes > 0.0 {
                // turning towards AB: the AB sides cross, the DC sides arc
                if quad1.b == quad2.a {
                    ab.push(quad1.b.into());
                } else {
                    match meet(quad1.a, quad1.b, quad2.a, quad2.b) {
                        Some(p) => ab.push(p.into()),
                        None => return true,
                    }
                }

                if quad1.c == quad2.d {
                    dc.push(quad1.c.into());
                } else {
                    // dc is walked backwards, so this reads D, arc, C
                    dc.extend_from_slice(&[
                        quad1.c.into(),
                        arc_around(&node2_bounds),
                        quad2.d.into(),
                    ]);
                }
            } else {
                if quad1.c == quad2.d {
                    dc.push(quad1.c.into());
                } else {
                    match meet(quad1.d, quad1.c, quad2.d, quad2.c) {
                        Some(p) => dc.push(p.into()),
                        None => return true,
                    }
                }

                if quad1.b == quad2.a {
                    ab.push(quad1.b.into());
                } else {
                    ab.extend_from_slice(&[
                        quad1.b.into(),
                        arc_around(&node2_bounds),
                        quad2.a.into(),
                    ]);
                }
            }

            return false;
        }

        let n = self.operations.vertices().len();
        let find = |target: Point| (0..n).rev().find(|&i| self.vertex(true, i) == target);
        let (index_a, index_b, index_c, index_d) =
            match (find(quad2.a), find(quad1.b), find(quad1.c), find(quad2.d)) {
                (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
                _ => {
                    log::warn!(
                        "Could not find the joint of {:?} and {:?} on the nib outline",
                        quad1,
                        quad2
                    );
                    return false;
                }
            };

        let last = n - 1;
        // the second quad leaves the nib before the first one arrives, so
        // the side bends outwards and both corners show
        let bends_out = |leave: usize, arrive: usize| {
            (leave == 0 && arrive == last) || ((leave != last || arrive != 0) && leave > arrive)
        };
        let node3_bounds = self.bounds();

        if index_a == index_b {
            push_outside(ab, &node3_bounds, quad1.b);
        } else if bends_out(index_a, index_b) {
            push_outside(ab, &node3_bounds, quad1.b);
            push_outside(ab, &node3_bounds, quad2.a);
        } else {
            match meet(quad1.a, quad1.b, quad2.a, quad2.b) {
                Some(p) => ab.push(p.into()),
                None => return true,
            }
        }

        if index_c == index_d {
            push_outside(dc, &node3_bounds, quad1.c);
        } else if bends_out(index_c, index_d) {
            push_outside(dc, &node3_bounds, quad1.c);
            push_outside(dc, &node3_bounds, quad2.d);
        } else {
            match meet(quad1.d, quad1.c, quad2.d, quad2.c) {
                Some(p) => dc.push(p.into()),
                None => return true,
            }
        }

        false
    }
}

#[inline]
fn push_outside(side: &mut Vec<OutlinePoint>, bounds: &Rect, p: Point) {
    if !bounds.holds(p) {
        side.push(p.into());
    }
}
