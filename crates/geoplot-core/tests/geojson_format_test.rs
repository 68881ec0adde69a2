//! Integration tests for reading shape requests from GeoJSON files

use geoplot_core::formats::geojson::read_requests;
use geoplot_core::formats::read_requests_from_path;
use geoplot_core::models::{ShapeGeometry, ShapeKind};
use geoplot_core::GeoplotError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[test]
fn test_read_mixed_collection_keeps_order() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "type": "FeatureCollection",
            "features": [
                {{
                    "type": "Feature",
                    "properties": {{ "kind": "circle", "radius": 25, "center": [1, 2] }},
                    "geometry": {{
                        "type": "Polygon",
                        "coordinates": [[[0, 0], [2, 0], [2, 4], [0, 0]]]
                    }}
                }},
                {{
                    "type": "Feature",
                    "properties": {{ "name": "Holes" }},
                    "geometry": {{
                        "type": "MultiPolygon",
                        "coordinates": [
                            [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
                             [[2, 2], [2, 4], [4, 4], [4, 2], [2, 2]]],
                            [[[20, 0], [30, 0], [30, 10], [20, 0]]]
                        ]
                    }}
                }},
                {{
                    "type": "Feature",
                    "properties": {{ "kind": "line" }},
                    "geometry": {{ "type": "LineString", "coordinates": [[0, 0, 12.5], [3, 4, 8.0]] }}
                }}
            ]
        }}"#
    )
    .unwrap();

    let requests = read_requests_from_path(file.path()).unwrap();

    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].geometry, ShapeGeometry::circle([1.0, 2.0], 25.0));

    assert_eq!(requests[1].kind(), ShapeKind::Polygon);
    assert_eq!(requests[1].name.as_deref(), Some("Holes"));
    match &requests[1].geometry {
        ShapeGeometry::Polygon { region } => {
            assert!(region.is_multi());
            assert_eq!(region.polygons()[0].len(), 2);
        }
        other => panic!("Expected Polygon geometry, got {:?}", other),
    }

    // Elevation is dropped
    assert_eq!(
        requests[2].geometry,
        ShapeGeometry::line_string(vec![[0.0, 0.0], [3.0, 4.0]])
    );
}

#[test]
fn test_missing_file() {
    let result = read_requests_from_path(Path::new("/nonexistent/shapes.geojson"));
    assert!(matches!(result, Err(GeoplotError::InputNotFound { .. })));
}

#[test]
fn test_malformed_document() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();

    let result = read_requests_from_path(file.path());
    assert!(matches!(result, Err(GeoplotError::FormatValidation { .. })));
}

#[test]
fn test_error_names_offending_feature() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "type": "FeatureCollection",
            "features": [
                {{
                    "type": "Feature",
                    "properties": {{}},
                    "geometry": {{ "type": "LineString", "coordinates": [[0, 0], [1, 1]] }}
                }},
                {{
                    "type": "Feature",
                    "properties": {{ "kind": "line_string" }},
                    "geometry": {{ "type": "Point", "coordinates": [0, 0] }}
                }}
            ]
        }}"#
    )
    .unwrap();

    match read_requests_from_path(file.path()) {
        Err(GeoplotError::InvalidGeometry { feature_id, .. }) => assert_eq!(feature_id, "feature_1"),
        other => panic!("Expected InvalidGeometry, got {:?}", other),
    }
}

#[test]
fn test_unknown_kind_is_reported_against_feature() {
    let document = r#"{
        "type": "Feature",
        "properties": { "kind": "hexagon" },
        "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]] }
    }"#;

    match read_requests(document) {
        Err(GeoplotError::InvalidGeometry { feature_id, reason }) => {
            assert_eq!(feature_id, "feature_0");
            assert!(reason.contains("Unknown shape kind: hexagon"));
        }
        other => panic!("Expected InvalidGeometry, got {:?}", other),
    }
}
