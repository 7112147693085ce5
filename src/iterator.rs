// MIT/Apache2 License

use crate::{
    attributes::DrawingAttributes,
    geometry::Point,
    node::StrokeNode,
    node_data::StrokeNodeData,
    operations::NodeOperations,
    stylus::{StylusPoint, StylusShape},
    Error, Result,
};

/// Builds the nodes of a stroke from its stylus points.
///
/// The node geometry is built once and shared by every node of the stroke.
/// Nodes borrow the iterator, so it has to outlive them.
#[derive(Debug, Clone)]
pub struct StrokeNodeIterator {
    points: Vec<StylusPoint>,
    operations: NodeOperations,
    use_pressure: bool,
}

/// Map a stylus pressure in `[0, 1]` to a nib scale in `[0.25, 1.75]`.
#[inline]
pub fn normalized_pressure_factor(pressure: f32) -> f32 {
    (1.5 * pressure) + 0.25
}

impl StrokeNodeIterator {
    /// Create an iterator over the points of a stroke drawn with the given
    /// attributes.
    pub fn new(points: Vec<StylusPoint>, attributes: &DrawingAttributes) -> Result<Self> {
        Ok(Self {
            points,
            operations: NodeOperations::new(&attributes.stylus_shape()?)?,
            use_pressure: !attributes.ignore_pressure,
        })
    }

    /// Create an empty iterator for the given attributes, to be fed with
    /// [`next_segment`](Self::next_segment).
    #[inline]
    pub fn from_attributes(attributes: &DrawingAttributes) -> Result<Self> {
        Self::new(Vec::new(), attributes)
    }

    /// Create an empty iterator for a nib that ignores pressure, to be fed
    /// with [`next_segment_from_positions`](Self::next_segment_from_positions).
    #[inline]
    pub fn for_shape(shape: &StylusShape) -> Result<Self> {
        Ok(Self {
            points: Vec::new(),
            operations: NodeOperations::new(shape)?,
            use_pressure: false,
        })
    }

    /// Continue the stroke with new points. The last point seen so far is
    /// kept in front of them so that the first new node connects to the
    /// existing spine.
    pub fn next_segment(self, mut points: Vec<StylusPoint>) -> Self {
        if let (Some(last), false) = (self.points.last(), points.is_empty()) {
            points.insert(0, *last);
        }

        log::trace!("Stroke continues with {} points", points.len());

        Self {
            points,
            operations: self.operations,
            use_pressure: self.use_pressure,
        }
    }

    /// Continue the stroke with plain positions.
    #[inline]
    pub fn next_segment_from_positions(mut self, positions: &[Point]) -> Self {
        self.continue_with_positions(positions);
        self
    }

    pub(crate) fn continue_with_positions(&mut self, positions: &[Point]) {
        let mut points = Vec::with_capacity(positions.len() + 1);
        points.extend(self.points.last().copied());
        points.extend(positions.iter().copied().map(StylusPoint::at));

        log::trace!("Stroke continues with {} positions", points.len());
        self.points = points;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[StylusPoint] {
        &self.points
    }

    #[inline]
    pub fn operations(&self) -> &NodeOperations {
        &self.operations
    }

    #[inline]
    pub fn use_pressure(&self) -> bool {
        self.use_pressure
    }

    /// The node at `index`, connected to the node before it.
    #[inline]
    pub fn node(&self, index: usize) -> Result<StrokeNode<'_>> {
        self.node_with_previous(index, index.checked_sub(1))
    }

    /// The node at `index`, connected to the node at `previous`, or to
    /// nothing. Nodes may be skipped, so `previous` need not be `index - 1`.
    pub fn node_with_previous(&self, index: usize, previous: Option<usize>) -> Result<StrokeNode<'_>> {
        let count = self.points.len();
        if index >= count || previous.map_or(false, |previous| previous >= index) {
            return Err(Error::NodeOutOfRange {
                index,
                previous,
                count,
            });
        }

        Ok(self.node_unchecked(index, previous))
    }

    /// Every node of the stroke, each connected to the one before it.
    #[inline]
    pub fn nodes(&self) -> impl Iterator<Item = StrokeNode<'_>> + '_ {
        (0..self.points.len()).map(move |i| self.node_unchecked(i, i.checked_sub(1)))
    }

    pub(crate) fn node_unchecked(&self, index: usize, previous: Option<usize>) -> StrokeNode<'_> {
        let node_data = |point: &StylusPoint| {
            let pressure = if self.use_pressure {
                normalized_pressure_factor(point.pressure())
            } else {
                1.0
            };
            StrokeNodeData::new(point.position(), pressure)
        };

        let this_node = node_data(&self.points[index]);
        let last_node = previous.map_or(StrokeNodeData::EMPTY, |previous| node_data(&self.points[previous]));

        // the index follows the previous node, since nodes can be skipped
        let node_index = previous.map_or(0, |previous| previous + 1);
        StrokeNode::new(
            &self.operations,
            node_index,
            this_node,
            last_node,
            index == self.points.len() - 1,
        )
    }
}
