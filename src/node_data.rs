// MIT/Apache2 License

use crate::{geometry::Point, util::is_zero};

/// A stroke sample as seen by the node shape operations: a position and a
/// normalized pressure factor that scales the nib.
///
/// A pressure factor of zero marks the empty node, which stands in for the
/// missing predecessor of the first node of a stroke.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct StrokeNodeData {
    position: Point,
    pressure_factor: f32,
}

impl StrokeNodeData {
    pub const EMPTY: StrokeNodeData = StrokeNodeData {
        position: Point::new(0.0, 0.0),
        pressure_factor: 0.0,
    };

    #[inline]
    pub fn new(position: Point, pressure_factor: f32) -> Self {
        debug_assert!(pressure_factor >= 0.0);
        Self {
            position,
            pressure_factor,
        }
    }

    /// A node at the given position drawn at its natural size.
    #[inline]
    pub fn at(position: Point) -> Self {
        Self::new(position, 1.0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        is_zero(self.pressure_factor)
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    /// The pressure factor, widened once so every geometric expression that
    /// uses it rounds the same way.
    #[inline]
    pub fn pressure_factor(&self) -> f64 {
        f64::from(self.pressure_factor)
    }

    #[inline]
    pub fn raw_pressure_factor(&self) -> f32 {
        self.pressure_factor
    }
}
