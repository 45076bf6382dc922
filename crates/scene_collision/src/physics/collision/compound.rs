//! Compound collision shapes
//!
//! A compound is a fixed list of child shapes, each offset by a local
//! transform. Queries compose the incoming placement with each child's local
//! transform and keep the child hit closest to zero.

use std::sync::Arc;

use log::trace;

use super::primitives::Ray;
use super::shape::{closest_by_magnitude, CollisionShape};
use crate::foundation::math::{Mat4, Placement};

/// A child of a [`CompoundShape`]
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundChild {
    /// The child shape, possibly shared with other compounds
    pub shape: Arc<CollisionShape>,
    /// Transform from the child's space into the compound's space
    pub local_transform: Mat4,
}

impl CompoundChild {
    /// Create a child from a shape and its local transform
    pub fn new(shape: impl Into<Arc<CollisionShape>>, local_transform: Mat4) -> Self {
        Self {
            shape: shape.into(),
            local_transform,
        }
    }

    /// Create a child from a shape and a local placement
    pub fn placed(shape: impl Into<Arc<CollisionShape>>, placement: &Placement) -> Self {
        Self::new(shape, placement.to_matrix())
    }
}

/// Shapes treated as a single collidable unit
///
/// Local transforms must be free of shear; see [`Placement::from_matrix`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundShape {
    children: Vec<CompoundChild>,
}

impl CompoundShape {
    /// Creates a compound from its children
    pub fn new(children: Vec<CompoundChild>) -> Self {
        Self { children }
    }

    /// The children in construction order
    pub fn children(&self) -> &[CompoundChild] {
        &self.children
    }

    /// Hit distance of smallest magnitude over all children under `placement`
    pub fn collision_distance(
        &self,
        ray: &Ray,
        placement: &Placement,
        culling_enabled: bool,
    ) -> Option<f64> {
        let parent = placement.to_matrix();
        self.children
            .iter()
            .filter_map(|child| {
                let child_placement = Placement::from_matrix(&(parent * child.local_transform));
                let distance = child
                    .shape
                    .collision_distance(ray, &child_placement, culling_enabled);
                trace!("Compound child {} -> {:?}", child.shape.kind(), distance);
                distance
            })
            .fold(None, closest_by_magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Vec3};
    use crate::physics::collision::{AxisAlignedBox, Sphere};
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    const EPSILON: f64 = 1e-9;

    fn unit_sphere() -> Arc<CollisionShape> {
        Arc::new(CollisionShape::from(Sphere::new(Vec3::zeros(), 1.0)))
    }

    fn side_by_side() -> CompoundShape {
        CompoundShape::new(vec![
            CompoundChild::new(unit_sphere(), Mat4::new_translation(&Vec3::new(0.0, 5.0, 0.0))),
            CompoundChild::new(unit_sphere(), Mat4::new_translation(&Vec3::new(0.0, -5.0, 0.0))),
        ])
    }

    #[test]
    fn test_hits_the_child_in_the_way() {
        let compound = side_by_side();
        let upper = Ray::new(Vec3::new(-10.0, 5.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let lower = Ray::new(Vec3::new(-10.0, -5.0, 0.0), Vec3::new(1.0, 0.0, 0.0));

        assert_relative_eq!(
            compound.collision_distance(&upper, &Placement::identity(), false).unwrap(),
            9.0,
            epsilon = EPSILON
        );
        assert_relative_eq!(
            compound.collision_distance(&lower, &Placement::identity(), false).unwrap(),
            9.0,
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_misses_between_children() {
        let compound = side_by_side();
        let between = Ray::new(Vec3::new(-10.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(compound.collision_distance(&between, &Placement::identity(), false).is_none());
    }

    #[test]
    fn test_incoming_placement_moves_children() {
        let compound = side_by_side();
        // Rotating a quarter turn about z swings the upper child onto -x
        let placement = Placement::new(
            Vec3::new(0.0, 0.0, 3.0),
            Quat::from_axis_angle(&Vec3::z_axis(), FRAC_PI_2),
            Vec3::repeat(1.0),
        );
        let ray = Ray::new(Vec3::new(-5.0, -10.0, 3.0), Vec3::new(0.0, 1.0, 0.0));

        let distance = compound.collision_distance(&ray, &placement, false).unwrap();
        assert_relative_eq!(distance, 9.0, epsilon = 1e-6);
    }

    #[test]
    fn test_nested_compound_scales_through() {
        let inner = CompoundShape::new(vec![CompoundChild::placed(
            Arc::new(CollisionShape::from(AxisAlignedBox::from_extents(Vec3::zeros(), Vec3::repeat(1.0)))),
            &Placement::from_translation(Vec3::new(2.0, 0.0, 0.0)),
        )]);
        let outer = CompoundShape::new(vec![CompoundChild::new(
            CollisionShape::from(inner),
            Mat4::new_scaling(2.0),
        )]);
        let ray = Ray::new(Vec3::new(-10.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));

        // Box spans x in [1, 3] locally, [2, 6] after the outer scale
        let distance = outer.collision_distance(&ray, &Placement::identity(), false).unwrap();
        assert_relative_eq!(distance, 12.0, epsilon = EPSILON);
    }

    #[test]
    fn test_prefers_smallest_magnitude() {
        let compound = CompoundShape::new(vec![
            CompoundChild::new(unit_sphere(), Mat4::new_translation(&Vec3::new(10.0, 0.0, 0.0))),
            CompoundChild::new(
                Arc::new(CollisionShape::from(AxisAlignedBox::from_extents(Vec3::zeros(), Vec3::repeat(1.0)))),
                Mat4::identity(),
            ),
        ]);
        // Starting inside the box: entry is 1.5 behind, the sphere is 8.5 ahead
        let ray = Ray::new(Vec3::new(0.5, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));

        let distance = compound.collision_distance(&ray, &Placement::identity(), false).unwrap();
        assert_relative_eq!(distance, -1.5, epsilon = EPSILON);
    }

    #[test]
    fn test_empty_compound_never_hits() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0));
        assert!(CompoundShape::default()
            .collision_distance(&ray, &Placement::identity(), false)
            .is_none());
    }
}
