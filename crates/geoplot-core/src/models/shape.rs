use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::geometry::{Position, Region, Ring};
use crate::error::GeoplotError;

/// Unique identifier for an accepted shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(pub Uuid);

impl ShapeId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shape kind classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Polygon,
    Rectangle,
    Circle,
    LineString,
}

impl ShapeKind {
    /// Every kind, in toolbar order
    pub const ALL: [ShapeKind; 4] =
        [ShapeKind::Polygon, ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::LineString];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Polygon => "polygon",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::LineString => "line_string",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = GeoplotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "polygon" => Ok(ShapeKind::Polygon),
            "rectangle" | "rect" => Ok(ShapeKind::Rectangle),
            "circle" => Ok(ShapeKind::Circle),
            "line_string" | "linestring" | "line" => Ok(ShapeKind::LineString),
            _ => Err(GeoplotError::UnknownShapeKind(s.to_string())),
        }
    }
}

/// Kind-specific geometry payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeGeometry {
    Polygon {
        region: Region,
    },
    Rectangle {
        region: Region,
    },
    /// A circle keeps its defining parameters. The polygon used for overlap
    /// checks is derived on demand; `trimmed` is only set once another shape
    /// has cut into it.
    Circle {
        center: Position,
        radius: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trimmed: Option<Region>,
    },
    LineString {
        points: Vec<Position>,
    },
}

impl ShapeGeometry {
    /// Create a polygon from a closed ring
    pub fn polygon(ring: Ring) -> Self {
        ShapeGeometry::Polygon { region: Region::from_ring(ring) }
    }

    /// Create an axis-aligned rectangle from two opposite corners
    pub fn rectangle(a: Position, b: Position) -> Self {
        let (min_x, max_x) = (a[0].min(b[0]), a[0].max(b[0]));
        let (min_y, max_y) = (a[1].min(b[1]), a[1].max(b[1]));
        let ring = vec![
            [min_x, min_y],
            [max_x, min_y],
            [max_x, max_y],
            [min_x, max_y],
            [min_x, min_y],
        ];
        ShapeGeometry::Rectangle { region: Region::from_ring(ring) }
    }

    /// Create a circle from its center and radius
    pub fn circle(center: Position, radius: f64) -> Self {
        ShapeGeometry::Circle { center, radius, trimmed: None }
    }

    /// Create an open line string
    pub fn line_string(points: Vec<Position>) -> Self {
        ShapeGeometry::LineString { points }
    }

    /// Get the shape kind
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeGeometry::Polygon { .. } => ShapeKind::Polygon,
            ShapeGeometry::Rectangle { .. } => ShapeKind::Rectangle,
            ShapeGeometry::Circle { .. } => ShapeKind::Circle,
            ShapeGeometry::LineString { .. } => ShapeKind::LineString,
        }
    }

    /// Replace the area of a polygonal shape with its post-trim region.
    ///
    /// Circles keep their original center and radius for display; line
    /// strings are returned unchanged.
    pub fn with_trimmed(self, trimmed_region: Region) -> Self {
        match self {
            ShapeGeometry::Polygon { .. } => ShapeGeometry::Polygon { region: trimmed_region },
            ShapeGeometry::Rectangle { .. } => {
                ShapeGeometry::Rectangle { region: trimmed_region }
            }
            ShapeGeometry::Circle { center, radius, .. } => {
                ShapeGeometry::Circle { center, radius, trimmed: Some(trimmed_region) }
            }
            line @ ShapeGeometry::LineString { .. } => line,
        }
    }
}

/// A request to add a shape, as produced by the drawing layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRequest {
    #[serde(flatten)]
    pub geometry: ShapeGeometry,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ShapeRequest {
    pub fn new(geometry: ShapeGeometry) -> Self {
        Self { geometry, name: None }
    }

    /// Attach a user label
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }
}

impl From<ShapeGeometry> for ShapeRequest {
    fn from(geometry: ShapeGeometry) -> Self {
        Self::new(geometry)
    }
}

/// An accepted shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier
    pub id: ShapeId,

    /// Geometry after any overlap trimming
    pub geometry: ShapeGeometry,

    /// When the shape was accepted
    pub created_at: DateTime<Utc>,

    /// Optional user label
    pub name: Option<String>,
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }
}

/// Maximum number of concurrently held shapes per kind.
///
/// A kind without an entry is unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShapeLimits {
    limits: HashMap<ShapeKind, usize>,
}

impl ShapeLimits {
    /// Limits with no entries (everything unlimited)
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// The same limit for every kind
    pub fn uniform(limit: usize) -> Self {
        Self { limits: ShapeKind::ALL.iter().map(|kind| (*kind, limit)).collect() }
    }

    /// Set a limit, builder style
    pub fn with_limit(mut self, kind: ShapeKind, limit: usize) -> Self {
        self.set(kind, limit);
        self
    }

    pub fn get(&self, kind: ShapeKind) -> Option<usize> {
        self.limits.get(&kind).copied()
    }

    pub fn set(&mut self, kind: ShapeKind, limit: usize) {
        self.limits.insert(kind, limit);
    }

    /// Drop the limit for a kind
    pub fn remove(&mut self, kind: ShapeKind) {
        self.limits.remove(&kind);
    }

    /// True if `current` shapes of `kind` already meet or exceed the limit
    pub fn is_reached(&self, kind: ShapeKind, current: usize) -> bool {
        self.get(kind).is_some_and(|limit| current >= limit)
    }
}
