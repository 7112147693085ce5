// MIT/Apache2 License

//! Geometry of ink strokes: the outline a nib sweeps along the stylus
//! points, and hit-testing and cut-testing of that outline against erasers,
//! lassos and other strokes.

#![forbid(unsafe_code)]

mod error;

pub mod attributes;
pub mod erasing;
pub mod findices;
pub mod geometry;
pub mod intersection;
pub mod iterator;
pub mod lasso;
pub mod node;
pub mod node_data;
pub mod operations;
pub mod renderer;
pub mod stylus;

pub(crate) mod util;

pub use attributes::*;
pub use erasing::*;
pub use error::*;
pub use findices::*;
pub use intersection::*;
pub use iterator::*;
pub use lasso::*;
pub use node::*;
pub use node_data::*;
pub use renderer::*;
pub use stylus::*;
