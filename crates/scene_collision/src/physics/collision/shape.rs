//! High-level collision shape abstraction
//!
//! [`CollisionShape`] is the closed set of shapes the engine can hit-test.
//! All shapes are stored in model space and moved into the ray's space by a
//! [`Placement`] at query time.

use super::compound::CompoundShape;
use super::mesh::MeshShape;
use super::primitives::{AxisAlignedBox, Ray, Sphere, Triangle};
use crate::foundation::math::Placement;

/// Collision shape variants (stored in model space)
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    /// Children combined under local transforms
    Compound(CompoundShape),
    /// A triangle mesh
    Mesh(MeshShape),
    /// A sphere
    Sphere(Sphere),
    /// A box, oriented by the placement's rotation
    Box(AxisAlignedBox),
    /// A single triangle
    Triangle(Triangle),
}

impl CollisionShape {
    /// Signed distance along `ray` to this shape under `placement`
    ///
    /// `origin + distance * direction` is the hit point. The distance is
    /// negative when the hit lies behind the ray origin; `None` means the
    /// ray misses.
    pub fn collision_distance(
        &self,
        ray: &Ray,
        placement: &Placement,
        culling_enabled: bool,
    ) -> Option<f64> {
        match self {
            Self::Compound(compound) => compound.collision_distance(ray, placement, culling_enabled),
            Self::Mesh(mesh) => mesh.collision_distance(ray, placement, culling_enabled),
            Self::Sphere(sphere) => sphere.collision_distance(ray, placement, culling_enabled),
            Self::Box(aabb) => aabb.collision_distance(ray, placement, culling_enabled),
            Self::Triangle(triangle) => triangle.collision_distance(ray, placement, culling_enabled),
        }
    }

    /// Short name of the variant, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Compound(_) => "compound",
            Self::Mesh(_) => "mesh",
            Self::Sphere(_) => "sphere",
            Self::Box(_) => "box",
            Self::Triangle(_) => "triangle",
        }
    }
}

impl From<CompoundShape> for CollisionShape {
    fn from(compound: CompoundShape) -> Self {
        Self::Compound(compound)
    }
}

impl From<MeshShape> for CollisionShape {
    fn from(mesh: MeshShape) -> Self {
        Self::Mesh(mesh)
    }
}

impl From<Sphere> for CollisionShape {
    fn from(sphere: Sphere) -> Self {
        Self::Sphere(sphere)
    }
}

impl From<AxisAlignedBox> for CollisionShape {
    fn from(aabb: AxisAlignedBox) -> Self {
        Self::Box(aabb)
    }
}

impl From<Triangle> for CollisionShape {
    fn from(triangle: Triangle) -> Self {
        Self::Triangle(triangle)
    }
}

/// Keep whichever distance is closer to zero
///
/// Compares magnitudes, so a hit just behind the origin beats one further
/// ahead. Ties keep `current`.
pub fn closest_by_magnitude(current: Option<f64>, candidate: f64) -> Option<f64> {
    match current {
        Some(best) if best.abs() <= candidate.abs() => Some(best),
        _ => Some(candidate),
    }
}
