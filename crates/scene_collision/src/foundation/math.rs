//! Math utilities and types
//!
//! All collision geometry is computed in double precision.

pub use nalgebra::{
    Vector3,
    Matrix3, Matrix4,
    UnitQuaternion,
};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f64>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f64>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f64>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f64>;

/// Numerical tolerances used by the intersectors
///
/// These are intentionally separate values: the box test and the triangle
/// test reject near-parallel rays at very different sensitivities.
pub mod tolerance {
    /// Below this, a ray direction is treated as parallel to a box slab
    pub const PARALLEL_TOLERANCE: f64 = 1e-3;

    /// Below this, a Möller-Trumbore determinant is treated as zero
    pub const DETERMINANT_EPSILON: f64 = f64::EPSILON;
}

/// Placement of a shape's local space inside the ray's space
///
/// Composed as translation * rotation * scale, so scale is applied first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Position in 3D space
    pub translation: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Per-axis scale factors
    pub scale: Vec3,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Placement {
    /// Create a placement from its three parts
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Create a new identity placement
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a placement with only a translation
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Create a placement with a translation and a uniform scale
    pub fn from_translation_scale(translation: Vec3, scale: f64) -> Self {
        Self {
            translation,
            scale: Vec3::repeat(scale),
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.translation)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this placement to a point
    pub fn transform_point(&self, point: &Point3) -> Point3 {
        self.to_matrix().transform_point(point)
    }

    /// Decompose an affine matrix back into a placement
    ///
    /// Assumes the matrix carries no shear and no reflection. Neither can be
    /// represented by a placement, so such matrices decompose to a scale and
    /// rotation that do not reproduce the original.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let translation = Vec3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);

        let mut basis = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let mut scale = Vec3::zeros();
        for (axis, mut column) in basis.column_iter_mut().enumerate() {
            let length = column.norm();
            scale[axis] = length;
            // A collapsed axis has no direction to recover
            if length > f64::EPSILON {
                column /= length;
            }
        }

        Self {
            translation,
            rotation: Quat::from_matrix(&basis),
            scale,
        }
    }

    /// Place a child whose local transform is expressed in this placement's space
    pub fn compose(&self, local_transform: &Mat4) -> Self {
        Self::from_matrix(&(self.to_matrix() * local_transform))
    }

    /// Whether all three scale components agree within `tolerance`
    pub fn is_uniform_scale(&self, tolerance: f64) -> bool {
        (self.scale.x - self.scale.y).abs() <= tolerance
            && (self.scale.y - self.scale.z).abs() <= tolerance
    }
}
