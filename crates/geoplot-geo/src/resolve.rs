//! Overlap resolution
//!
//! [`OverlapEngine::validate_and_trim`] decides whether a candidate shape
//! can join the collection. Existing polygonal shapes are visited in stored
//! order and each one that overlaps the candidate is subtracted from it, so
//! the final geometry depends on that order. A candidate that encloses an
//! existing shape, lies inside one, or is cut down to nothing is rejected
//! as a whole; partial trims are never kept.

use geo::MultiPolygon;

use geoplot_core::models::{CoordinateSpace, Region, Shape, ShapeGeometry, ShapeId};
use geoplot_core::Rejection;

use crate::kernel::{Difference, GeoKernel, GeometryKernel, MIN_REGION_AREA};
use crate::models::{from_geo_multi_polygon, to_geo_multi_polygon};

/// Result of validating a candidate against the accepted shapes
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Accepted after trimming; carries the final, possibly multi-part region
    Accepted(Region),
    /// Accepted with its geometry untouched
    AcceptedUnchanged,
    /// The candidate would cover an existing shape
    RejectedEnclosesExisting,
    /// The candidate lies inside an existing shape
    RejectedEnclosedByExisting,
    /// Nothing of the candidate survives, or a subtraction could not be
    /// computed
    RejectedFullyConsumed,
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_) | Outcome::AcceptedUnchanged)
    }

    /// `Ok(Some(region))` when trimmed, `Ok(None)` when unchanged
    pub fn into_result(self) -> Result<Option<Region>, Rejection> {
        match self {
            Outcome::Accepted(region) => Ok(Some(region)),
            Outcome::AcceptedUnchanged => Ok(None),
            Outcome::RejectedEnclosesExisting => Err(Rejection::EnclosesExisting),
            Outcome::RejectedEnclosedByExisting => Err(Rejection::EnclosedByExisting),
            Outcome::RejectedFullyConsumed => Err(Rejection::FullyConsumed),
        }
    }
}

/// Candidate region threaded through the fold
struct TrimState {
    region: MultiPolygon<f64>,
    trimmed: bool,
}

/// Validate-and-trim engine over a [`GeometryKernel`]
#[derive(Debug, Clone, Default)]
pub struct OverlapEngine<K = GeoKernel> {
    kernel: K,
}

impl OverlapEngine<GeoKernel> {
    /// Engine over the `geo` kernel for the given coordinate space
    pub fn new(space: CoordinateSpace) -> Self {
        Self::with_kernel(GeoKernel::new(space))
    }
}

impl<K: GeometryKernel> OverlapEngine<K> {
    pub fn with_kernel(kernel: K) -> Self {
        Self { kernel }
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// The polygonal region a geometry occupies, or `None` for line strings.
    ///
    /// Circles use their trimmed region when one has been stored, otherwise
    /// the discretized circle.
    pub fn region_of(&self, geometry: &ShapeGeometry) -> Option<MultiPolygon<f64>> {
        match geometry {
            ShapeGeometry::Polygon { region } | ShapeGeometry::Rectangle { region } => {
                Some(to_geo_multi_polygon(region))
            }
            ShapeGeometry::Circle { trimmed: Some(region), .. } => {
                Some(to_geo_multi_polygon(region))
            }
            ShapeGeometry::Circle { center, radius, trimmed: None } => {
                Some(MultiPolygon::new(vec![self.kernel.discretize_circle(*center, *radius)]))
            }
            ShapeGeometry::LineString { .. } => None,
        }
    }

    /// Area covered by a geometry; zero for line strings
    pub fn area_of(&self, geometry: &ShapeGeometry) -> f64 {
        self.region_of(geometry).map(|region| self.kernel.area(&region)).unwrap_or(0.0)
    }

    /// Validate `candidate` against `existing` and trim away any overlap.
    ///
    /// Line strings are always accepted unchanged and are ignored on the
    /// existing side.
    pub fn validate_and_trim(&self, candidate: &ShapeGeometry, existing: &[Shape]) -> Outcome {
        let Some(region) = self.region_of(candidate) else {
            return Outcome::AcceptedUnchanged;
        };

        let start = TrimState { region, trimmed: false };
        let folded = existing
            .iter()
            .filter_map(|shape| self.region_of(&shape.geometry).map(|r| (shape.id, r)))
            .try_fold(start, |state, (id, other)| self.step(state, id, &other));

        match folded {
            Ok(TrimState { trimmed: false, .. }) => Outcome::AcceptedUnchanged,
            Ok(TrimState { region, .. }) => Outcome::Accepted(from_geo_multi_polygon(&region)),
            Err(rejected) => rejected,
        }
    }

    fn step(
        &self,
        state: TrimState,
        id: ShapeId,
        other: &MultiPolygon<f64>,
    ) -> Result<TrimState, Outcome> {
        if !self.kernel.overlaps(&state.region, other) {
            return Ok(state);
        }

        // Identical regions fall through to the subtraction and end up
        // fully consumed rather than enclosed
        if !self.kernel.equals(&state.region, other) {
            if self.kernel.contains(other, &state.region) {
                tracing::debug!(existing = %id, "Candidate lies inside existing shape");
                return Err(Outcome::RejectedEnclosedByExisting);
            }

            if self.kernel.contains(&state.region, other) {
                tracing::debug!(existing = %id, "Candidate encloses existing shape");
                return Err(Outcome::RejectedEnclosesExisting);
            }
        }

        match self.kernel.difference(&state.region, other) {
            Difference::Region(region) => {
                let removed = self.kernel.area(&state.region) - self.kernel.area(&region);
                if removed <= MIN_REGION_AREA {
                    return Ok(state);
                }
                tracing::debug!(existing = %id, parts = region.0.len(), "Trimmed candidate");
                Ok(TrimState { region, trimmed: true })
            }
            Difference::Empty => {
                tracing::debug!(existing = %id, "Candidate fully consumed");
                Err(Outcome::RejectedFullyConsumed)
            }
            Difference::Failed => {
                tracing::warn!(existing = %id, "Subtraction failed, rejecting candidate");
                Err(Outcome::RejectedFullyConsumed)
            }
        }
    }
}
