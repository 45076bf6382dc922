//! Ray picking over a set of placed collision shapes
//!
//! [`CollisionWorld`] is the entry point a scene-graph host uses for
//! hit-testing: it keeps each collider's shape and current placement, and
//! answers ray queries against all of them.

use std::sync::Arc;

use log::{debug, trace};
use slotmap::{new_key_type, SlotMap};

use super::collision::{CollisionShape, Ray};
use super::collision_layers::CollisionLayers;
use crate::config::PickingConfig;
use crate::foundation::math::{Placement, Vec3};

new_key_type! {
    /// Stable handle to a collider in a [`CollisionWorld`]
    pub struct ColliderKey;
}

/// A shape placed in the world
#[derive(Debug, Clone)]
pub struct Collider {
    /// Model-space shape, possibly shared between colliders
    pub shape: Arc<CollisionShape>,
    /// Where the shape currently sits
    pub placement: Placement,
    /// Layers this collider belongs to
    pub layers: CollisionLayers,
}

impl Collider {
    /// Create a collider on the default layer
    pub fn new(shape: impl Into<Arc<CollisionShape>>, placement: Placement) -> Self {
        Self {
            shape: shape.into(),
            placement,
            layers: CollisionLayers::default(),
        }
    }

    /// Put this collider on `layers`
    pub fn with_layers(mut self, layers: CollisionLayers) -> Self {
        self.layers = layers;
        self
    }
}

/// Result of a ray query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The collider that was hit
    pub collider: ColliderKey,
    /// Signed distance along the ray
    pub distance: f64,
    /// The point of intersection
    pub point: Vec3,
}

/// Collection of colliders answering ray queries
#[derive(Debug, Default)]
pub struct CollisionWorld {
    colliders: SlotMap<ColliderKey, Collider>,
    config: PickingConfig,
}

impl CollisionWorld {
    /// Create an empty world using `config` for every query
    pub fn new(config: PickingConfig) -> Self {
        Self {
            colliders: SlotMap::with_key(),
            config,
        }
    }

    /// Current query settings
    pub fn config(&self) -> &PickingConfig {
        &self.config
    }

    /// Replace the query settings
    pub fn set_config(&mut self, config: PickingConfig) {
        self.config = config;
    }

    /// Add a collider, returning its handle
    pub fn insert(&mut self, collider: Collider) -> ColliderKey {
        let kind = collider.shape.kind();
        let key = self.colliders.insert(collider);
        debug!("Added {} collider {:?}", kind, key);
        key
    }

    /// Remove a collider
    pub fn remove(&mut self, key: ColliderKey) -> Option<Collider> {
        self.colliders.remove(key)
    }

    /// Look up a collider
    pub fn get(&self, key: ColliderKey) -> Option<&Collider> {
        self.colliders.get(key)
    }

    /// Move a collider; returns `false` if the handle is stale
    pub fn set_placement(&mut self, key: ColliderKey, placement: Placement) -> bool {
        match self.colliders.get_mut(key) {
            Some(collider) => {
                collider.placement = placement;
                true
            }
            None => false,
        }
    }

    /// Number of colliders
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether the world has no colliders
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// The hit closest to zero among colliders on `mask`
    pub fn raycast(&self, ray: &Ray, mask: CollisionLayers) -> Option<RayHit> {
        self.hits(ray, mask)
            .min_by(|a, b| a.distance.abs().total_cmp(&b.distance.abs()))
    }

    /// Every hit among colliders on `mask`, ordered by distance magnitude
    pub fn raycast_all(&self, ray: &Ray, mask: CollisionLayers) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self.hits(ray, mask).collect();
        hits.sort_by(|a, b| a.distance.abs().total_cmp(&b.distance.abs()));
        hits
    }

    fn hits<'a>(&'a self, ray: &'a Ray, mask: CollisionLayers) -> impl Iterator<Item = RayHit> + 'a {
        let config = self.config;
        self.colliders
            .iter()
            .filter(move |(_, collider)| collider.layers.matches(mask))
            .filter_map(move |(key, collider)| {
                let distance = collider
                    .shape
                    .collision_distance(ray, &collider.placement, config.culling_enabled)?;
                trace!("Ray hit collider {:?} at {}", key, distance);
                (config.include_hits_behind_origin || distance >= 0.0).then(|| RayHit {
                    collider: key,
                    distance,
                    point: ray.point_at(distance),
                })
            })
    }
}
