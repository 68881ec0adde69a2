//! Canonical coordinate types used across all geoplot crates.
//!
//! Coordinates are plain `[x, y]` arrays so they serialize the same way
//! GeoJSON positions do. Conversion to the computational `geo` types lives
//! in `geoplot-geo`.

use serde::{Deserialize, Serialize};

/// A single `[x, y]` position
pub type Position = [f64; 2];

/// A closed ring of positions (first position equals the last)
pub type Ring = Vec<Position>;

/// The coordinate space shapes are drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// Cartesian coordinates in meters (or any consistent planar unit)
    Planar,
    /// Longitude/latitude in degrees, WGS 84
    #[default]
    Geographic,
}

impl std::fmt::Display for CoordinateSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateSpace::Planar => write!(f, "planar"),
            CoordinateSpace::Geographic => write!(f, "geographic"),
        }
    }
}

/// A polygonal region made of one or more polygons.
///
/// Each polygon is an exterior ring followed by zero or more hole rings,
/// matching the GeoJSON `MultiPolygon` coordinate layout. A freshly drawn
/// shape has exactly one polygon; trimming may split it into several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Region(pub Vec<Vec<Ring>>);

impl Region {
    /// Create a region from a single exterior ring
    pub fn from_ring(ring: Ring) -> Self {
        Region(vec![vec![ring]])
    }

    /// Create a region from polygons given as `[exterior, holes...]`
    pub fn from_polygons(polygons: Vec<Vec<Ring>>) -> Self {
        Region(polygons)
    }

    /// The polygons of this region
    pub fn polygons(&self) -> &[Vec<Ring>] {
        &self.0
    }

    /// Number of disjoint polygons
    pub fn polygon_count(&self) -> usize {
        self.0.len()
    }

    /// True if trimming split the region into more than one polygon
    pub fn is_multi(&self) -> bool {
        self.0.len() > 1
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over every ring of every polygon
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.0.iter().flat_map(|polygon| polygon.iter())
    }

    /// Total number of positions across all rings
    pub fn vertex_count(&self) -> usize {
        self.rings().map(Vec::len).sum()
    }
}
