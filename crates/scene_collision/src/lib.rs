//! # Scene Collision
//!
//! Ray hit-testing for a scene-graph rendering engine.
//!
//! ## Features
//!
//! - **Closed shape set**: spheres, oriented boxes, triangles, triangle meshes
//!   and compound shapes behind one [`CollisionShape`](physics::CollisionShape) enum
//! - **Signed distances**: every query answers with the distance along the
//!   ray, negative when the hit lies behind the origin
//! - **Mesh decoding**: collision meshes built straight from GPU vertex/index buffers
//! - **Picking world**: layered, handle-based collider set for scene hosts
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_collision::prelude::*;
//!
//! let shape = CollisionShape::from(Sphere::new(Vec3::zeros(), 1.0));
//! let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
//!
//! let distance = shape.collision_distance(&ray, &Placement::identity(), false);
//! assert_eq!(distance, Some(4.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, PickingConfig},
        foundation::math::{Mat4, Placement, Quat, Vec3},
        physics::{
            AxisAlignedBox, Collider, ColliderKey, CollisionLayers, CollisionShape,
            CollisionWorld, CompoundChild, CompoundShape, MeshShape, MeshShapeError,
            MeshSource, Ray, RayHit, Sphere, Triangle,
        },
    };
}
