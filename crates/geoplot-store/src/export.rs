//! GeoJSON export of accepted shapes
//!
//! Polygonal shapes are written with the region they actually occupy: the
//! trimmed region once trimmed, the discretized polygon for untouched
//! circles. Circles also carry their original `center` and `radius` so the
//! document can be read back as circle requests.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use serde_json::json;

use geoplot_core::error::{GeoplotError, Result};
use geoplot_core::models::{Position, Region, Shape, ShapeGeometry};
use geoplot_geo::models::from_geo_multi_polygon;
use geoplot_geo::GeometryKernel;

use crate::memory::FeatureStore;

/// Build a FeatureCollection from every shape in the store, in order
pub fn export_shapes<K: GeometryKernel>(store: &FeatureStore<K>) -> FeatureCollection {
    let features = store.shapes().iter().map(|shape| shape_to_feature(store, shape)).collect();

    FeatureCollection { bbox: None, features, foreign_members: None }
}

/// Serialize a FeatureCollection as pretty-printed GeoJSON
pub fn to_geojson_string(collection: FeatureCollection) -> Result<String> {
    serde_json::to_string_pretty(&GeoJson::FeatureCollection(collection))
        .map_err(|e| GeoplotError::Serialization(e.to_string()))
}

fn shape_to_feature<K: GeometryKernel>(store: &FeatureStore<K>, shape: &Shape) -> Feature {
    let engine = store.engine();

    let value = match &shape.geometry {
        ShapeGeometry::LineString { points } => Value::LineString(positions(points)),
        geometry => engine
            .region_of(geometry)
            .map(|region| region_value(&from_geo_multi_polygon(&region)))
            .unwrap_or(Value::MultiPolygon(Vec::new())),
    };
    let area = engine.area_of(&shape.geometry);

    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), json!(shape.id.to_string()));
    properties.insert("kind".to_string(), json!(shape.kind().as_str()));
    properties.insert("createdAt".to_string(), json!(shape.created_at.to_rfc3339()));
    if let Some(name) = &shape.name {
        properties.insert("name".to_string(), json!(name));
    }
    properties.insert("area".to_string(), json!(area));
    if let ShapeGeometry::Circle { center, radius, .. } = &shape.geometry {
        properties.insert("center".to_string(), json!(center));
        properties.insert("radius".to_string(), json!(radius));
    }

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: Some(geojson::feature::Id::String(shape.id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}

fn region_value(region: &Region) -> Value {
    let polygons: Vec<Vec<Vec<Vec<f64>>>> = region
        .polygons()
        .iter()
        .map(|rings| rings.iter().map(|ring| positions(ring)).collect())
        .collect();

    match <[_; 1]>::try_from(polygons) {
        Ok([single]) => Value::Polygon(single),
        Err(polygons) => Value::MultiPolygon(polygons),
    }
}

fn positions(points: &[Position]) -> Vec<Vec<f64>> {
    points.iter().map(|p| vec![p[0], p[1]]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoplot_core::formats::geojson::read_requests;
    use geoplot_core::models::{CoordinateSpace, ShapeKind, ShapeLimits, ShapeRequest};

    fn planar_store() -> FeatureStore {
        FeatureStore::new(ShapeLimits::unlimited(), CoordinateSpace::Planar)
    }

    #[test]
    fn test_export_properties() {
        let mut store = planar_store();
        store.add_shape(ShapeGeometry::rectangle([0.0, 0.0], [4.0, 5.0]).into()).unwrap();
        let path = ShapeRequest::new(ShapeGeometry::line_string(vec![[0.0, 0.0], [9.0, 9.0]]));
        let id = store.add_shape(path.named("Path")).unwrap();

        let collection = export_shapes(&store);
        assert_eq!(collection.features.len(), 2);

        let rect = &collection.features[0];
        assert_eq!(rect.property("kind").and_then(|v| v.as_str()), Some("rectangle"));
        assert_eq!(rect.property("area").and_then(|v| v.as_f64()), Some(20.0));
        assert!(rect.property("createdAt").is_some());
        assert!(matches!(rect.geometry.as_ref().unwrap().value, Value::Polygon(_)));

        let line = &collection.features[1];
        assert_eq!(line.property("id").and_then(|v| v.as_str()), Some(id.to_string().as_str()));
        assert_eq!(line.property("name").and_then(|v| v.as_str()), Some("Path"));
        assert!(matches!(line.geometry.as_ref().unwrap().value, Value::LineString(_)));
    }

    #[test]
    fn test_split_shape_exports_multipolygon() {
        let mut store = planar_store();
        store.add_shape(ShapeGeometry::rectangle([4.0, -5.0], [6.0, 15.0]).into()).unwrap();
        store.add_shape(ShapeGeometry::rectangle([0.0, 0.0], [10.0, 10.0]).into()).unwrap();

        let collection = export_shapes(&store);
        let value = &collection.features[1].geometry.as_ref().unwrap().value;
        assert!(matches!(value, Value::MultiPolygon(polygons) if polygons.len() == 2));
    }

    #[test]
    fn test_circle_export_reads_back_as_circle() {
        let mut store = planar_store();
        store.add_shape(ShapeGeometry::circle([3.0, 4.0], 2.0).into()).unwrap();

        let document = to_geojson_string(export_shapes(&store)).unwrap();
        let requests = read_requests(&document).unwrap();

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].kind(), ShapeKind::Circle);
        assert_eq!(requests[0].geometry, ShapeGeometry::circle([3.0, 4.0], 2.0));
    }

    #[test]
    fn test_trimmed_circle_exports_trimmed_region() {
        let mut store = planar_store();
        store.add_shape(ShapeGeometry::rectangle([0.0, -20.0], [40.0, 20.0]).into()).unwrap();
        let id = store.add_shape(ShapeGeometry::circle([0.0, 0.0], 10.0).into()).unwrap();

        let full = store.engine().area_of(&ShapeGeometry::circle([0.0, 0.0], 10.0));
        let collection = export_shapes(&store);
        let circle = &collection.features[1];

        // Only the western half of the circle is left
        let Value::Polygon(rings) = &circle.geometry.as_ref().unwrap().value else {
            panic!("Expected a Polygon geometry");
        };
        assert!(rings[0].iter().all(|position| position[0] <= 1e-9));

        let area = circle.property("area").and_then(|v| v.as_f64()).unwrap();
        assert!((area - store.area_of(id).unwrap()).abs() < 1e-9);
        assert!(area < full * 0.6);

        assert_eq!(circle.property("center"), Some(&json!([0.0, 0.0])));
        assert_eq!(circle.property("radius").and_then(|v| v.as_f64()), Some(10.0));
    }
}
