//! GeoJSON request reader
//!
//! Each feature of a FeatureCollection becomes one shape request, in
//! document order. The shape kind comes from the `kind` property when
//! present and is otherwise inferred from the geometry type. Circles are
//! written as a `Point` with a `radius` property, or as any geometry
//! carrying `center` and `radius` properties (which is what export
//! produces).

use ::geojson::{Feature, GeoJson, Value};

use crate::error::{GeoplotError, Result};
use crate::models::{Position, Region, Ring, ShapeGeometry, ShapeKind, ShapeRequest};

/// Parse an ordered list of shape requests from a GeoJSON document
pub fn read_requests(content: &str) -> Result<Vec<ShapeRequest>> {
    let geojson: GeoJson = content.parse().map_err(|e| GeoplotError::FormatValidation {
        format: "GeoJSON".to_string(),
        reason: format!("Failed to parse GeoJSON: {}", e),
    })?;

    match geojson {
        GeoJson::FeatureCollection(fc) => fc
            .features
            .iter()
            .enumerate()
            .map(|(idx, feature)| convert_feature(feature, idx))
            .collect(),
        GeoJson::Feature(feature) => Ok(vec![convert_feature(&feature, 0)?]),
        GeoJson::Geometry(_) => Err(GeoplotError::FormatValidation {
            format: "GeoJSON".to_string(),
            reason: "Expected a Feature or FeatureCollection, found a bare geometry".to_string(),
        }),
    }
}

fn convert_feature(feature: &Feature, idx: usize) -> Result<ShapeRequest> {
    let value = feature
        .geometry
        .as_ref()
        .map(|g| &g.value)
        .ok_or_else(|| invalid(idx, "Feature has no geometry"))?;

    let kind = match feature.property("kind").and_then(|v| v.as_str()) {
        Some(raw) => Some(raw.parse::<ShapeKind>().map_err(|e| invalid(idx, e.to_string()))?),
        None => None,
    };

    let geometry = match (kind, value) {
        (Some(ShapeKind::Circle), _) | (None, Value::Point(_)) => {
            circle_from_feature(feature, value, idx)?
        }
        (Some(ShapeKind::LineString), Value::LineString(points))
        | (None, Value::LineString(points)) => {
            ShapeGeometry::LineString { points: positions(points, idx)? }
        }
        (Some(ShapeKind::Rectangle), _) => {
            ShapeGeometry::Rectangle { region: region(value, idx)? }
        }
        (Some(ShapeKind::Polygon), _)
        | (None, Value::Polygon(_))
        | (None, Value::MultiPolygon(_)) => ShapeGeometry::Polygon { region: region(value, idx)? },
        (Some(ShapeKind::LineString), _) => {
            return Err(invalid(idx, "A line_string feature needs a LineString geometry"))
        }
        (None, _) => return Err(invalid(idx, "Unsupported geometry type")),
    };

    let name = feature.property("name").and_then(|v| v.as_str()).map(str::to_string);

    Ok(ShapeRequest { geometry, name })
}

fn circle_from_feature(feature: &Feature, value: &Value, idx: usize) -> Result<ShapeGeometry> {
    let radius = feature
        .property("radius")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| invalid(idx, "Circle needs a numeric 'radius' property"))?;

    let center = match (feature.property("center"), value) {
        (Some(center), _) => {
            let coords: Vec<f64> = serde_json::from_value(center.clone())
                .map_err(|e| invalid(idx, format!("Invalid 'center' property: {}", e)))?;
            position(&coords, idx)?
        }
        (None, Value::Point(point)) => position(point, idx)?,
        (None, _) => {
            return Err(invalid(idx, "Circle needs a Point geometry or a 'center' property"))
        }
    };

    Ok(ShapeGeometry::circle(center, radius))
}

fn region(value: &Value, idx: usize) -> Result<Region> {
    match value {
        Value::Polygon(rings) => Ok(Region::from_polygons(vec![polygon_rings(rings, idx)?])),
        Value::MultiPolygon(polygons) => {
            let polygons = polygons
                .iter()
                .map(|rings| polygon_rings(rings, idx))
                .collect::<Result<Vec<_>>>()?;
            Ok(Region::from_polygons(polygons))
        }
        _ => Err(invalid(idx, "Expected a Polygon or MultiPolygon geometry")),
    }
}

fn polygon_rings(rings: &[Vec<Vec<f64>>], idx: usize) -> Result<Vec<Ring>> {
    rings.iter().map(|ring| positions(ring, idx)).collect()
}

fn positions(coords: &[Vec<f64>], idx: usize) -> Result<Vec<Position>> {
    coords.iter().map(|c| position(c, idx)).collect()
}

fn position(coords: &[f64], idx: usize) -> Result<Position> {
    match coords {
        [x, y, ..] => Ok([*x, *y]),
        _ => Err(invalid(idx, "Position needs at least two coordinates")),
    }
}

fn invalid(idx: usize, reason: impl Into<String>) -> GeoplotError {
    GeoplotError::InvalidGeometry { feature_id: format!("feature_{}", idx), reason: reason.into() }
}
