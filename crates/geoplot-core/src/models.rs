pub mod geometry;
pub mod shape;

pub use geometry::{CoordinateSpace, Position, Region, Ring};
pub use shape::{Shape, ShapeGeometry, ShapeId, ShapeKind, ShapeLimits, ShapeRequest};
