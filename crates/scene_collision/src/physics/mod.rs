//! Physics module for ray picking and hit-testing
//!
//! Provides the collision shapes, layer filtering, and a world of placed
//! colliders that answers ray queries.

pub mod collision;
pub mod collision_layers;
pub mod picking;

#[cfg(test)]
mod tests;

pub use collision::{
    AxisAlignedBox,
    CollisionShape,
    CompoundChild,
    CompoundShape,
    MeshShape,
    MeshShapeError,
    MeshSource,
    Ray,
    Sphere,
    Triangle,
};
pub use collision_layers::CollisionLayers;
pub use picking::{Collider, ColliderKey, CollisionWorld, RayHit};
