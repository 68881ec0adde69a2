//! Interchange formats for shape requests
//!
//! GeoJSON is the only supported format. Reading turns a document into an
//! ordered list of [`ShapeRequest`](crate::models::ShapeRequest)s; writing
//! accepted shapes back out is done by `geoplot-store`, which has access to
//! circle discretization.

use std::fs;
use std::path::Path;

use crate::error::{GeoplotError, Result};
use crate::models::ShapeRequest;

pub mod geojson;

/// Read shape requests from a GeoJSON file on disk
pub fn read_requests_from_path(path: &Path) -> Result<Vec<ShapeRequest>> {
    if !path.exists() {
        return Err(GeoplotError::InputNotFound { path: path.to_path_buf() });
    }

    let content = fs::read_to_string(path)?;
    self::geojson::read_requests(&content)
}
