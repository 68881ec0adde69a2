//! In-memory feature collection.
//!
//! Shapes are kept in acceptance order; that order is also the order in
//! which the overlap engine subtracts existing shapes from a candidate.
//! A rejected addition never changes the collection.

use chrono::Utc;
use geoplot_core::models::{CoordinateSpace, Shape, ShapeId, ShapeKind, ShapeLimits, ShapeRequest};
use geoplot_core::Rejection;
use geoplot_geo::validation::validate_shape;
use geoplot_geo::{GeoKernel, GeometryKernel, OverlapEngine};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Ordered collection of accepted shapes with per-kind limits
#[derive(Debug, Clone)]
pub struct FeatureStore<K = GeoKernel> {
    shapes: Vec<Shape>,
    limits: ShapeLimits,
    engine: OverlapEngine<K>,
}

impl FeatureStore<GeoKernel> {
    /// Create an empty store backed by the `geo` kernel
    pub fn new(limits: ShapeLimits, space: CoordinateSpace) -> Self {
        Self::with_engine(limits, OverlapEngine::new(space))
    }
}

impl<K: GeometryKernel> FeatureStore<K> {
    /// Create an empty store around an existing engine
    pub fn with_engine(limits: ShapeLimits, engine: OverlapEngine<K>) -> Self {
        Self { shapes: Vec::new(), limits, engine }
    }

    /// Try to add a shape.
    ///
    /// The kind limit is checked first, then the geometry itself, then the
    /// candidate is validated and trimmed against every stored shape. On
    /// success the shape (possibly trimmed) is appended and its new id is
    /// returned.
    pub fn add_shape(&mut self, request: ShapeRequest) -> Result<ShapeId, Rejection> {
        let kind = request.kind();

        if let Some(limit) = self.limits.get(kind) {
            if self.count_of(kind) >= limit {
                tracing::debug!(%kind, limit, "Shape limit reached");
                return Err(Rejection::LimitReached { kind, limit });
            }
        }

        let validation = validate_shape(&request.geometry);
        if !validation.is_valid {
            let reason = validation.first_reason().unwrap_or_default();
            tracing::debug!(%kind, %reason, "Rejected invalid geometry");
            return Err(Rejection::InvalidGeometry { reason });
        }

        let id = ShapeId::new();
        let created_at = Utc::now();

        let trimmed = self
            .engine
            .validate_and_trim(&request.geometry, &self.shapes)
            .into_result()
            .inspect_err(|rejection| {
                tracing::info!(%kind, %rejection, "Shape rejected");
            })?;

        let was_trimmed = trimmed.is_some();
        let geometry = match trimmed {
            Some(region) => request.geometry.with_trimmed(region),
            None => request.geometry,
        };

        tracing::info!(%id, %kind, trimmed = was_trimmed, "Shape accepted");

        self.shapes.push(Shape { id, geometry, created_at, name: request.name });
        Ok(id)
    }

    /// Remove a shape by id. Returns false if no such shape exists.
    ///
    /// Shapes that were trimmed against the removed one keep their trimmed
    /// geometry.
    pub fn remove_shape(&mut self, id: ShapeId) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|shape| shape.id != id);

        let removed = self.shapes.len() != before;
        if removed {
            tracing::info!(%id, "Shape removed");
        }
        removed
    }

    /// Remove every shape
    pub fn clear(&mut self) {
        tracing::info!(count = self.shapes.len(), "Clearing all shapes");
        self.shapes.clear();
    }

    /// Number of stored shapes for every kind, including kinds with none
    pub fn shape_counts(&self) -> HashMap<ShapeKind, usize> {
        let mut counts: HashMap<ShapeKind, usize> =
            ShapeKind::ALL.iter().map(|kind| (*kind, 0)).collect();
        for shape in &self.shapes {
            *counts.entry(shape.kind()).or_insert(0) += 1;
        }
        counts
    }

    pub fn is_limit_reached(&self, kind: ShapeKind) -> bool {
        self.limits.is_reached(kind, self.count_of(kind))
    }

    /// Accepted shapes in acceptance order
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id == id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn limits(&self) -> &ShapeLimits {
        &self.limits
    }

    /// Change a kind's limit. Shapes already above a lowered limit stay.
    pub fn set_limit(&mut self, kind: ShapeKind, limit: usize) {
        tracing::debug!(%kind, limit, "Shape limit changed");
        self.limits.set(kind, limit);
    }

    /// Area of a stored shape, zero for line strings
    pub fn area_of(&self, id: ShapeId) -> Option<f64> {
        self.get(id).map(|shape| self.engine.area_of(&shape.geometry))
    }

    pub fn engine(&self) -> &OverlapEngine<K> {
        &self.engine
    }

    fn count_of(&self, kind: ShapeKind) -> usize {
        self.shapes.iter().filter(|shape| shape.kind() == kind).count()
    }
}

/// [`FeatureStore`] behind a read-write lock.
///
/// `add_shape` holds the write lock for the whole limit check, validation
/// and append, so concurrent additions always see each other.
#[derive(Debug)]
pub struct SharedFeatureStore<K = GeoKernel> {
    inner: Arc<RwLock<FeatureStore<K>>>,
}

impl<K> Clone for SharedFeatureStore<K> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<K: GeometryKernel> SharedFeatureStore<K> {
    pub fn new(store: FeatureStore<K>) -> Self {
        Self { inner: Arc::new(RwLock::new(store)) }
    }

    pub fn add_shape(&self, request: ShapeRequest) -> Result<ShapeId, Rejection> {
        self.write().add_shape(request)
    }

    pub fn remove_shape(&self, id: ShapeId) -> bool {
        self.write().remove_shape(id)
    }

    pub fn clear(&self) {
        self.write().clear()
    }

    pub fn set_limit(&self, kind: ShapeKind, limit: usize) {
        self.write().set_limit(kind, limit)
    }

    pub fn shape_counts(&self) -> HashMap<ShapeKind, usize> {
        self.read().shape_counts()
    }

    pub fn is_limit_reached(&self, kind: ShapeKind) -> bool {
        self.read().is_limit_reached(kind)
    }

    /// Snapshot of the accepted shapes
    pub fn shapes(&self) -> Vec<Shape> {
        self.read().shapes().to_vec()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave the store half-updated:
    // every mutation is a single push, retain or clear.
    fn read(&self) -> RwLockReadGuard<'_, FeatureStore<K>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FeatureStore<K>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
