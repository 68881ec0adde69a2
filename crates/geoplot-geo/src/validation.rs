use geo::{Area, Validation};
use geoplot_core::models::{Position, Region, ShapeGeometry};

use crate::kernel::guarded;
use crate::models::to_geo_multi_polygon;

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    /// The first error formatted as `location: reason`
    pub fn first_reason(&self) -> Option<String> {
        self.errors.first().map(|e| format!("{}: {}", e.location, e.reason))
    }
}

/// Validate a shape geometry before it is handed to the overlap engine
pub fn validate_shape(geometry: &ShapeGeometry) -> ValidationResult {
    match geometry {
        ShapeGeometry::Polygon { region } => validate_region("Polygon", region),
        ShapeGeometry::Rectangle { region } => validate_region("Rectangle", region),
        ShapeGeometry::Circle { center, radius, trimmed } => {
            let mut result = validate_circle(center, *radius);
            if let Some(region) = trimmed {
                merge(&mut result, "Circle", validate_region("trimmed", region));
            }
            result
        }
        ShapeGeometry::LineString { points } => validate_line_string(points),
    }
}

fn validate_circle(center: &Position, radius: f64) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if !center[0].is_finite() || !center[1].is_finite() {
        result.add_error("Circle center".to_string(), "Coordinates must be finite".to_string());
    }

    if !radius.is_finite() || radius <= 0.0 {
        result.add_error(
            "Circle radius".to_string(),
            format!("Radius must be a positive finite number, found {}", radius),
        );
    }

    result
}

fn validate_line_string(points: &[Position]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    // LineString must have at least 2 points
    if points.len() < 2 {
        result.add_error(
            "LineString".to_string(),
            format!("LineString must have at least 2 points, found {}", points.len()),
        );
        return result;
    }

    for (i, coord) in points.iter().enumerate() {
        if !coord[0].is_finite() || !coord[1].is_finite() {
            result
                .add_error(format!("LineString[{}]", i), "Coordinates must be finite".to_string());
        }
    }

    result
}

fn validate_region(label: &str, region: &Region) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if region.is_empty() {
        result.add_error(label.to_string(), "Region has no polygons".to_string());
        return result;
    }

    for (p, polygon) in region.polygons().iter().enumerate() {
        let Some((exterior, interiors)) = polygon.split_first() else {
            result.add_error(format!("{}[{}]", label, p), "Polygon has no rings".to_string());
            continue;
        };

        merge(&mut result, &format!("{}[{}]", label, p), validate_ring("exterior", exterior));
        for (i, interior) in interiors.iter().enumerate() {
            merge(
                &mut result,
                &format!("{}[{}]", label, p),
                validate_ring(&format!("interior[{}]", i), interior),
            );
        }
    }

    // Shape of the rings as a whole, once each ring is well formed
    if result.is_valid {
        validate_simple_region(label, region, &mut result);
    }

    result
}

/// Every ring must be simple and every polygon must enclose positive area
fn validate_simple_region(label: &str, region: &Region, result: &mut ValidationResult) {
    let multi = to_geo_multi_polygon(region);

    match guarded("validate", || multi.check_validation().map_err(|e| e.to_string())) {
        Some(Ok(())) => {}
        Some(Err(reason)) => {
            result.add_error(label.to_string(), reason);
            return;
        }
        None => {
            result.add_error(label.to_string(), "Geometry could not be checked".to_string());
            return;
        }
    }

    for (p, polygon) in multi.iter().enumerate() {
        if polygon.unsigned_area() <= 0.0 {
            result.add_error(format!("{}[{}]", label, p), "Polygon has zero area".to_string());
        }
    }
}

fn validate_ring(label: &str, ring: &[Position]) -> ValidationResult {
    let mut result = ValidationResult::valid();

    if ring.len() < 4 {
        result.add_error(
            label.to_string(),
            format!("Ring must have at least 4 points, found {}", ring.len()),
        );
    }

    // Check if closed
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if first != last {
            result.add_error(
                label.to_string(),
                "Ring must be closed (first point == last point)".to_string(),
            );
        }
    }

    if ring.iter().any(|c| !c[0].is_finite() || !c[1].is_finite()) {
        result.add_error(label.to_string(), "Coordinates must be finite".to_string());
    }

    let mut distinct: Vec<&Position> = Vec::new();
    for position in ring {
        if !distinct.contains(&position) {
            distinct.push(position);
        }
    }
    if ring.len() >= 4 && distinct.len() < 3 {
        result.add_error(
            label.to_string(),
            format!("Ring must have at least 3 distinct vertices, found {}", distinct.len()),
        );
    }

    result
}

fn merge(result: &mut ValidationResult, prefix: &str, other: ValidationResult) {
    for error in other.errors {
        result.add_error(format!("{}.{}", prefix, error.location), error.reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_shapes() {
        assert!(validate_shape(&ShapeGeometry::rectangle([0.0, 0.0], [2.0, 1.0])).is_valid);
        assert!(validate_shape(&ShapeGeometry::circle([0.0, 0.0], 5.0)).is_valid);
        assert!(
            validate_shape(&ShapeGeometry::line_string(vec![[0.0, 0.0], [1.0, 1.0]])).is_valid
        );
    }

    #[test]
    fn test_open_ring_is_invalid() {
        let shape =
            ShapeGeometry::polygon(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        let result = validate_shape(&shape);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.reason.contains("closed")));
    }

    #[test]
    fn test_collapsed_ring_is_invalid() {
        let shape =
            ShapeGeometry::polygon(vec![[0.0, 0.0], [1.0, 1.0], [0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
        let result = validate_shape(&shape);
        assert!(!result.is_valid);
        assert!(result.first_reason().unwrap().contains("distinct"));
    }

    #[test]
    fn test_flat_ring_is_invalid() {
        let shape = ShapeGeometry::polygon(vec![[0.0, 0.0], [5.0, 0.0], [10.0, 0.0], [0.0, 0.0]]);
        let result = validate_shape(&shape);
        assert!(!result.is_valid);
        assert!(result.first_reason().unwrap().contains("zero area"));
    }

    #[test]
    fn test_self_intersecting_ring_is_invalid() {
        let bowtie =
            ShapeGeometry::polygon(vec![[5.0, 5.0], [15.0, 15.0], [15.0, 5.0], [5.0, 15.0], [5.0, 5.0]]);
        let result = validate_shape(&bowtie);
        assert!(!result.is_valid);
        assert!(result.first_reason().unwrap().contains("self-intersection"));
    }

    #[test]
    fn test_polygon_with_hole_is_valid() {
        let shape = ShapeGeometry::Polygon {
            region: Region::from_polygons(vec![vec![
                vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
                vec![[2.0, 2.0], [4.0, 2.0], [4.0, 4.0], [2.0, 4.0], [2.0, 2.0]],
            ]]),
        };
        assert!(validate_shape(&shape).is_valid);
    }

    #[test]
    fn test_bad_circle_radius() {
        assert!(!validate_shape(&ShapeGeometry::circle([0.0, 0.0], 0.0)).is_valid);
        assert!(!validate_shape(&ShapeGeometry::circle([0.0, 0.0], f64::NAN)).is_valid);
        assert!(!validate_shape(&ShapeGeometry::circle([f64::INFINITY, 0.0], 1.0)).is_valid);
    }

    #[test]
    fn test_short_line_string() {
        let result = validate_shape(&ShapeGeometry::line_string(vec![[0.0, 0.0]]));
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].location, "LineString");
    }

    #[test]
    fn test_error_location_is_prefixed() {
        let shape = ShapeGeometry::Polygon {
            region: Region::from_polygons(vec![vec![
                vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]],
                vec![[1.0, 1.0], [2.0, 1.0]],
            ]]),
        };
        let result = validate_shape(&shape);
        assert_eq!(result.errors[0].location, "Polygon[0].interior[0]");
    }
}
