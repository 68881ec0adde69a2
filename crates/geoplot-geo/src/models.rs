//! Conversions between canonical geoplot coordinates and `geo` types.

use geo::{Coord, LineString, MultiPolygon, Polygon};

use geoplot_core::models::{Position, Region, Ring};

fn to_line_string(ring: &[Position]) -> LineString<f64> {
    let coords: Vec<Coord<f64>> = ring.iter().map(|c| Coord { x: c[0], y: c[1] }).collect();
    LineString::new(coords)
}

fn from_line_string(ls: &LineString<f64>) -> Ring {
    ls.coords().map(|c| [c.x, c.y]).collect()
}

/// Convert one `[exterior, holes...]` polygon to a geo::Polygon
pub fn to_geo_polygon(rings: &[Ring]) -> Polygon<f64> {
    match rings.split_first() {
        Some((exterior, interiors)) => Polygon::new(
            to_line_string(exterior),
            interiors.iter().map(|r| to_line_string(r)).collect(),
        ),
        None => Polygon::new(LineString::new(vec![]), vec![]),
    }
}

/// Convert a canonical Region to a geo::MultiPolygon
pub fn to_geo_multi_polygon(region: &Region) -> MultiPolygon<f64> {
    MultiPolygon::new(region.polygons().iter().map(|p| to_geo_polygon(p)).collect())
}

/// Convert a geo::Polygon to `[exterior, holes...]` rings
pub fn from_geo_polygon(polygon: &Polygon<f64>) -> Vec<Ring> {
    let mut rings = Vec::with_capacity(1 + polygon.interiors().len());
    rings.push(from_line_string(polygon.exterior()));
    for interior in polygon.interiors() {
        rings.push(from_line_string(interior));
    }
    rings
}

/// Convert a geo::MultiPolygon to a canonical Region
pub fn from_geo_multi_polygon(multi: &MultiPolygon<f64>) -> Region {
    Region::from_polygons(multi.iter().map(from_geo_polygon).collect())
}
