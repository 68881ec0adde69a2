//! GeoPlot Store - The feature collection
//!
//! [`FeatureStore`] owns the accepted shapes, enforces per-kind limits and
//! runs every addition through the overlap engine. [`SharedFeatureStore`]
//! is the same store behind a lock for hosts that add shapes from several
//! threads.

pub mod export;
pub mod memory;

pub use export::{export_shapes, to_geojson_string};
pub use memory::{FeatureStore, SharedFeatureStore};
