// MIT/Apache2 License

use std::fmt;

/// Sum error type for stroke geometry operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A nib dimension was not a finite number, or was out of range.
    InvalidDimension { name: &'static str, value: f64 },
    /// A polygonal nib needs at least three vertices.
    DegeneratePolygon(usize),
    /// The nib transform cannot be inverted.
    NonInvertibleTransform,
    /// A stroke node was requested outside of the sample buffer, or with a
    /// previous index that does not precede it.
    NodeOutOfRange {
        index: usize,
        previous: Option<usize>,
        count: usize,
    },
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { name, value } => {
                write!(f, "Stylus {} of {} is not a valid dimension", name, value)
            }
            Self::DegeneratePolygon(n) => {
                write!(f, "Polygonal stylus needs at least 3 vertices, got {}", n)
            }
            Self::NonInvertibleTransform => f.write_str("Stylus transform is not invertible"),
            Self::NodeOutOfRange {
                index,
                previous: Some(previous),
                count,
            } => write!(
                f,
                "Node #{} with previous node #{} is not valid for a stroke of {} points",
                index, previous, count
            ),
            Self::NodeOutOfRange {
                index,
                previous: None,
                count,
            } => write!(
                f,
                "Node #{} does not exist in a stroke of {} points",
                index, count
            ),
        }
    }
}

/// Convenience result type.
pub type Result<T = ()> = std::result::Result<T, Error>;
