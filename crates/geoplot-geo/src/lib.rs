//! GeoPlot Geo - Geometry kernel and overlap resolution
//!
//! This crate wraps the `geo` crate's boolean and measurement operations
//! behind a small kernel interface and builds the validate-and-trim engine
//! on top of it.

pub mod kernel;
pub mod models;
pub mod resolve;
pub mod validation;

pub use kernel::{Difference, GeoKernel, GeometryKernel, CIRCLE_STEPS};
pub use resolve::{OverlapEngine, Outcome};
