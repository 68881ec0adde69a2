//! Error types for GeoPlot

use std::path::PathBuf;
use thiserror::Error;

use crate::models::ShapeKind;

#[derive(Debug, Error)]
pub enum GeoplotError {
    // Input errors
    #[error("Input file not found at {path}")]
    InputNotFound { path: PathBuf },

    #[error("Invalid {format} document: {reason}")]
    FormatValidation { format: String, reason: String },

    #[error("Unknown shape kind: {0}. Use polygon, rectangle, circle, or line_string")]
    UnknownShapeKind(String),

    #[error("Invalid geometry at feature {feature_id}: {reason}")]
    InvalidGeometry { feature_id: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, GeoplotError>;

/// Why a proposed shape was not added.
///
/// Every rejection leaves the feature collection exactly as it was before
/// the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Limit reached: at most {limit} {kind} shape(s) allowed")]
    LimitReached { kind: ShapeKind, limit: usize },

    #[error("The new shape would completely enclose an existing shape")]
    EnclosesExisting,

    #[error("The new shape lies entirely inside an existing shape")]
    EnclosedByExisting,

    #[error("Nothing is left of the new shape after removing the overlapping area")]
    FullyConsumed,

    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },
}
