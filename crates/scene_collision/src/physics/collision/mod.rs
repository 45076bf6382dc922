//! Ray/shape collision detection
//!
//! Every shape answers one question: given a ray and a placement of the
//! shape, what is the signed distance along the ray to the hit, if any.
//!
//! # Architecture
//!
//! - **Model Space Storage**: shapes are stored in local coordinates
//! - **On-Demand Transformation**: the placement is applied only during a query
//! - **Pure Queries**: no query mutates a shape, so shapes can be shared freely
//!
//! # Module Organization
//!
//! - [`primitives`] - Rays, triangles, spheres and boxes with their intersectors
//! - [`mesh`] - Triangle meshes and decoding them from raw vertex buffers
//! - [`compound`] - Child shapes combined under local transforms
//! - [`shape`] - The [`CollisionShape`] variant set

pub mod primitives;
pub mod mesh;
pub mod compound;
pub mod shape;

// Re-export commonly used types
pub use primitives::{AxisAlignedBox, Ray, Sphere, Triangle, TriangleHit};
pub use mesh::{
    ComponentFormat, MeshShape, MeshShapeError, MeshSource, PrimitiveTopology, VertexAttribute,
    VertexSemantic,
};
pub use compound::{CompoundChild, CompoundShape};
pub use shape::{closest_by_magnitude, CollisionShape};
