//! Geometry kernel adapter
//!
//! Every planar boolean and measurement operation the overlap engine needs
//! goes through [`GeometryKernel`]. [`GeoKernel`] implements it with the
//! `geo` crate.
//!
//! Boundary convention: two regions overlap only when their interiors share
//! a 2-dimensional set. Touching along an edge or at a vertex is not an
//! overlap. Containment is non-strict, so an inner region may touch the
//! outer boundary, and equal regions contain each other.
//!
//! Degenerate input (non-finite coordinates, rings with fewer than four
//! positions) and panics raised inside `geo` are absorbed here: predicates
//! answer `false`, `difference` answers [`Difference::Failed`] and `area`
//! answers `0.0`.

use std::f64::consts::PI;
use std::panic::{self, AssertUnwindSafe};

use geo::{
    Area, BooleanOps, BoundingRect, ChamberlainDuquetteArea, Coord, Destination, Haversine,
    LineString, MultiPolygon, Point, Polygon, Rect, Relate,
};

use geoplot_core::models::{CoordinateSpace, Position};

/// Number of sides used to approximate a circle
pub const CIRCLE_STEPS: usize = 64;

/// Results with less area than this (in square meters, or square planar
/// units) count as empty
pub const MIN_REGION_AREA: f64 = 1e-6;

/// Outcome of a region subtraction
#[derive(Debug, Clone, PartialEq)]
pub enum Difference {
    /// Some positive area is left
    Region(MultiPolygon<f64>),
    /// Nothing with positive area is left
    Empty,
    /// The kernel could not compute the subtraction
    Failed,
}

/// Planar geometry operations used by the overlap engine.
///
/// All operations are pure and never mutate their inputs.
pub trait GeometryKernel {
    /// Approximate a circle as a closed regular polygon with
    /// [`CIRCLE_STEPS`] sides
    fn discretize_circle(&self, center: Position, radius: f64) -> Polygon<f64>;

    /// True iff the interiors of `a` and `b` share a positive-area set
    fn overlaps(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool;

    /// True iff `inner` lies within the closed region of `outer`
    fn contains(&self, outer: &MultiPolygon<f64>, inner: &MultiPolygon<f64>) -> bool;

    /// True iff `a` and `b` cover exactly the same point set
    fn equals(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool;

    /// `minuend` minus `subtrahend`
    fn difference(&self, minuend: &MultiPolygon<f64>, subtrahend: &MultiPolygon<f64>)
        -> Difference;

    /// Unsigned area in square meters (or square planar units)
    fn area(&self, region: &MultiPolygon<f64>) -> f64;
}

/// [`GeometryKernel`] backed by the `geo` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoKernel {
    space: CoordinateSpace,
}

impl GeoKernel {
    pub fn new(space: CoordinateSpace) -> Self {
        Self { space }
    }

    /// Kernel for Cartesian coordinates
    pub fn planar() -> Self {
        Self::new(CoordinateSpace::Planar)
    }

    /// Kernel for longitude/latitude coordinates
    pub fn geographic() -> Self {
        Self::new(CoordinateSpace::Geographic)
    }

}

impl GeometryKernel for GeoKernel {
    fn discretize_circle(&self, center: Position, radius: f64) -> Polygon<f64> {
        let mut coords: Vec<Coord<f64>> = (0..CIRCLE_STEPS)
            .map(|step| {
                let bearing = 360.0 * step as f64 / CIRCLE_STEPS as f64;
                match self.space {
                    CoordinateSpace::Planar => {
                        let theta = bearing * PI / 180.0;
                        Coord {
                            x: center[0] + radius * theta.sin(),
                            y: center[1] + radius * theta.cos(),
                        }
                    }
                    CoordinateSpace::Geographic => {
                        let origin = Point::new(center[0], center[1]);
                        Haversine.destination(origin, bearing, radius).into()
                    }
                }
            })
            .collect();

        if let Some(first) = coords.first().copied() {
            coords.push(first);
        }

        Polygon::new(LineString::new(coords), vec![])
    }

    fn overlaps(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool {
        if !is_well_formed(a) || !is_well_formed(b) {
            tracing::warn!("overlaps: degenerate region, treating as no overlap");
            return false;
        }

        match (a.bounding_rect(), b.bounding_rect()) {
            (Some(bbox_a), Some(bbox_b)) if bounding_boxes_intersect(&bbox_a, &bbox_b) => {}
            _ => return false,
        }

        // DE-9IM interior/interior entry must be 2-dimensional
        let interiors_meet =
            guarded("overlaps", || a.relate(b).matches("2********").unwrap_or(false))
                .unwrap_or(false);
        if !interiors_meet {
            return false;
        }

        // Relate reports a 2-dimensional intersection for regions that only
        // share discretized circle edges, so confirm with the shared area
        guarded("overlaps", || a.intersection(b))
            .is_some_and(|shared| self.area(&shared) > MIN_REGION_AREA)
    }

    fn contains(&self, outer: &MultiPolygon<f64>, inner: &MultiPolygon<f64>) -> bool {
        if !is_well_formed(outer) || !is_well_formed(inner) {
            tracing::warn!("contains: degenerate region, treating as not contained");
            return false;
        }

        guarded("contains", || outer.relate(inner).is_contains()).unwrap_or(false)
    }

    fn equals(&self, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> bool {
        if !is_well_formed(a) || !is_well_formed(b) {
            return false;
        }

        guarded("equals", || a.relate(b).is_equal_topo()).unwrap_or(false)
    }

    fn difference(
        &self,
        minuend: &MultiPolygon<f64>,
        subtrahend: &MultiPolygon<f64>,
    ) -> Difference {
        if !is_well_formed(minuend) || !is_well_formed(subtrahend) {
            tracing::warn!("difference: degenerate region, subtraction failed");
            return Difference::Failed;
        }

        let Some(result) = guarded("difference", || minuend.difference(subtrahend)) else {
            return Difference::Failed;
        };

        if !all_finite(&result) {
            tracing::warn!("difference: kernel produced non-finite coordinates");
            return Difference::Failed;
        }

        let polygons: Vec<Polygon<f64>> = result
            .into_iter()
            .filter(|p| p.exterior().0.len() >= 4 && p.unsigned_area() > 0.0)
            .collect();
        let remaining = MultiPolygon::new(polygons);

        if remaining.0.is_empty() || self.area(&remaining) <= MIN_REGION_AREA {
            Difference::Empty
        } else {
            Difference::Region(remaining)
        }
    }

    fn area(&self, region: &MultiPolygon<f64>) -> f64 {
        if !all_finite(region) {
            return 0.0;
        }

        let area = match self.space {
            CoordinateSpace::Planar => guarded("area", || region.unsigned_area()),
            CoordinateSpace::Geographic => {
                guarded("area", || region.chamberlain_duquette_unsigned_area())
            }
        };
        area.unwrap_or(0.0)
    }
}

/// Run a `geo` operation, turning a panic into `None`
pub(crate) fn guarded<T>(operation: &'static str, op: impl FnOnce() -> T) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(operation, "Geometry kernel operation panicked");
            None
        }
    }
}

/// Check if two bounding boxes intersect
fn bounding_boxes_intersect(bbox1: &Rect<f64>, bbox2: &Rect<f64>) -> bool {
    let x_overlap = bbox1.min().x <= bbox2.max().x && bbox1.max().x >= bbox2.min().x;
    let y_overlap = bbox1.min().y <= bbox2.max().y && bbox1.max().y >= bbox2.min().y;

    x_overlap && y_overlap
}

fn all_finite(region: &MultiPolygon<f64>) -> bool {
    region.iter().all(|polygon| {
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .all(|ring| ring.coords().all(|c| c.x.is_finite() && c.y.is_finite()))
    })
}

/// At least one polygon, every ring closed with four or more finite positions
fn is_well_formed(region: &MultiPolygon<f64>) -> bool {
    !region.0.is_empty()
        && all_finite(region)
        && region.iter().all(|polygon| {
            std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .all(|ring| ring.0.len() >= 4 && ring.is_closed())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![Polygon::new(
            LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]),
            vec![],
        )])
    }

    #[test]
    fn test_discretize_planar_circle() {
        let kernel = GeoKernel::planar();
        let circle = kernel.discretize_circle([0.0, 0.0], 100.0);

        assert_eq!(circle.exterior().0.len(), CIRCLE_STEPS + 1);
        assert!(circle.exterior().is_closed());
        for c in circle.exterior().coords() {
            assert!(((c.x * c.x + c.y * c.y).sqrt() - 100.0).abs() < 1e-9);
        }

        // Inscribed 64-gon area is slightly below pi * r^2
        let area = kernel.area(&MultiPolygon::new(vec![circle]));
        let disc = PI * 100.0 * 100.0;
        assert!(area < disc && area > disc * 0.99);
    }

    #[test]
    fn test_discretize_geographic_circle() {
        let kernel = GeoKernel::geographic();
        let circle = kernel.discretize_circle([115.26, -8.5], 100.0);
        let area = kernel.area(&MultiPolygon::new(vec![circle]));
        let disc = PI * 100.0 * 100.0;

        // Spherical area of a 100 m circle, within a few percent
        assert!((area - disc).abs() / disc < 0.03, "area {} should be close to {}", area, disc);
    }

    #[test]
    fn test_overlap_requires_shared_area() {
        let kernel = GeoKernel::planar();
        let a = square(0.0, 0.0, 10.0, 10.0);

        assert!(kernel.overlaps(&a, &square(5.0, 5.0, 15.0, 15.0)));
        // Shared edge only
        assert!(!kernel.overlaps(&a, &square(10.0, 0.0, 20.0, 10.0)));
        // Shared corner only
        assert!(!kernel.overlaps(&a, &square(10.0, 10.0, 20.0, 20.0)));
        // Far apart
        assert!(!kernel.overlaps(&a, &square(50.0, 50.0, 60.0, 60.0)));
    }

    #[test]
    fn test_region_cut_by_circle_does_not_overlap_it() {
        let kernel = GeoKernel::planar();
        let circle = MultiPolygon::new(vec![kernel.discretize_circle([20.0, 5.0], 4.0)]);
        let bar = square(5.0, 2.0, 22.0, 8.0);

        let Difference::Region(cut) = kernel.difference(&bar, &circle) else {
            panic!("Expected the bar to keep some area");
        };

        assert!(!kernel.overlaps(&cut, &circle));
        assert!(!kernel.overlaps(&circle, &cut));
        assert!(kernel.overlaps(&bar, &circle));
    }

    #[test]
    fn test_contains_is_non_strict() {
        let kernel = GeoKernel::planar();
        let outer = square(0.0, 0.0, 10.0, 10.0);

        assert!(kernel.contains(&outer, &square(2.0, 2.0, 8.0, 8.0)));
        // Touching the outer boundary still counts
        assert!(kernel.contains(&outer, &square(0.0, 0.0, 5.0, 5.0)));
        assert!(kernel.contains(&outer, &outer.clone()));
        assert!(!kernel.contains(&outer, &square(5.0, 5.0, 15.0, 15.0)));
        assert!(!kernel.contains(&square(2.0, 2.0, 8.0, 8.0), &outer));
    }

    #[test]
    fn test_equals() {
        let kernel = GeoKernel::planar();
        let a = square(0.0, 0.0, 10.0, 10.0);
        assert!(kernel.equals(&a, &a.clone()));
        assert!(!kernel.equals(&a, &square(0.0, 0.0, 10.0, 9.0)));
    }

    #[test]
    fn test_difference_partial_overlap() {
        let kernel = GeoKernel::planar();
        let result =
            kernel.difference(&square(5.0, 5.0, 15.0, 15.0), &square(0.0, 0.0, 10.0, 10.0));

        match result {
            Difference::Region(region) => assert!((kernel.area(&region) - 75.0).abs() < 1e-9),
            other => panic!("Expected a region, got {:?}", other),
        }
    }

    #[test]
    fn test_difference_full_cover_is_empty() {
        let kernel = GeoKernel::planar();
        let result =
            kernel.difference(&square(2.0, 2.0, 8.0, 8.0), &square(0.0, 0.0, 10.0, 10.0));
        assert_eq!(result, Difference::Empty);
    }

    #[test]
    fn test_degenerate_input_fails_safe() {
        let kernel = GeoKernel::planar();
        let good = square(0.0, 0.0, 10.0, 10.0);
        let degenerate = MultiPolygon::new(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (f64::NAN, 1.0), (0.0, 0.0)]),
            vec![],
        )]);

        assert!(!kernel.overlaps(&good, &degenerate));
        assert!(!kernel.contains(&good, &degenerate));
        assert!(!kernel.equals(&degenerate, &degenerate));
        assert_eq!(kernel.difference(&good, &degenerate), Difference::Failed);
        assert_eq!(kernel.area(&degenerate), 0.0);
    }

    #[test]
    fn test_empty_region_is_degenerate() {
        let kernel = GeoKernel::planar();
        let empty = MultiPolygon::<f64>::new(vec![]);
        assert_eq!(kernel.difference(&empty, &square(0.0, 0.0, 1.0, 1.0)), Difference::Failed);
    }
}
