//! Primitive collision shapes and intersection algorithms
//!
//! Provides basic geometric primitives (rays, triangles, spheres, boxes)
//! with closed-form ray intersection tests. Every test answers with a signed
//! distance along the ray, or `None` when there is no intersection.

use log::{trace, warn};

use crate::foundation::math::tolerance::{DETERMINANT_EPSILON, PARALLEL_TOLERANCE};
use crate::foundation::math::{Mat4, Placement, Point3, Vec3};

/// A ray for ray casting and picking
///
/// The direction is kept exactly as given. Distances reported by the
/// intersectors are in units of `direction`, so a non-unit direction scales them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray
    pub origin: Vec3,
    /// The direction of the ray
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Copy of this ray with a unit-length direction, or `None` for a zero direction
    pub fn normalized(&self) -> Option<Self> {
        self.direction
            .try_normalize(f64::EPSILON)
            .map(|direction| Self::new(self.origin, direction))
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Barycentric detail of a ray-triangle hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Signed distance along the ray
    pub distance: f64,
    /// Barycentric weight of `b`
    pub u: f64,
    /// Barycentric weight of `c`
    pub v: f64,
}

/// A triangle for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub a: Vec3,
    /// Second vertex
    pub b: Vec3,
    /// Third vertex
    pub c: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Unit normal (right-hand rule), or the zero vector for a degenerate triangle
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a)
            .cross(&(self.c - self.a))
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vec3::zeros)
    }

    /// Whether the three vertices are collinear (zero area)
    pub fn is_degenerate(&self) -> bool {
        (self.b - self.a).cross(&(self.c - self.a)).norm_squared() <= f64::EPSILON * f64::EPSILON
    }

    /// Calculates the centroid (center point) of the triangle
    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    /// Triangle with every vertex moved by an affine transform
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let apply = |v: &Vec3| matrix.transform_point(&Point3::from(*v)).coords;
        Self::new(apply(&self.a), apply(&self.b), apply(&self.c))
    }

    /// Möller-Trumbore ray-triangle intersection in the triangle's own space
    ///
    /// With culling enabled, triangles whose determinant is positive are
    /// rejected. Hits behind the ray origin come back with a negative distance.
    pub fn intersect_ray(&self, ray: &Ray, culling_enabled: bool) -> Option<TriangleHit> {
        let ab = self.b - self.a;
        let ac = self.c - self.a;

        let pvec = ray.direction.cross(&ac);
        let det = ab.dot(&pvec);

        if culling_enabled && det >= DETERMINANT_EPSILON {
            return None;
        }

        // Ray parallel to the triangle's plane, or the triangle has no area
        if det.abs() < DETERMINANT_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let tvec = ray.origin - self.a;

        let u = tvec.dot(&pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(&ab);
        let v = ray.direction.dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        Some(TriangleHit {
            distance: ac.dot(&qvec) * inv_det,
            u,
            v,
        })
    }

    /// Signed hit distance against this triangle moved by `placement`
    pub fn collision_distance(
        &self,
        ray: &Ray,
        placement: &Placement,
        culling_enabled: bool,
    ) -> Option<f64> {
        self.transformed(&placement.to_matrix())
            .intersect_ray(ray, culling_enabled)
            .map(|hit| hit.distance)
    }
}

/// Scale components closer than this count as uniform; decomposed compound
/// placements carry rounding noise in their scale
const UNIFORM_SCALE_TOLERANCE: f64 = 1e-9;

/// A sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// The center of the sphere in its local space
    pub origin: Vec3,
    /// The radius of the sphere
    pub radius: f64,
}

impl Sphere {
    /// Creates a new sphere with the given center and radius
    pub fn new(origin: Vec3, radius: f64) -> Self {
        Self { origin, radius }
    }

    /// Signed hit distance against this sphere under `placement`
    ///
    /// The center is offset by the translation only, and the radius is
    /// multiplied by `scale.x`; the placement's scale must be uniform.
    /// With culling enabled, a ray starting inside the sphere does not hit it.
    /// A zero-radius sphere is a miss unless the ray starts exactly on it.
    pub fn collision_distance(
        &self,
        ray: &Ray,
        placement: &Placement,
        culling_enabled: bool,
    ) -> Option<f64> {
        if !placement.is_uniform_scale(UNIFORM_SCALE_TOLERANCE) {
            warn!(
                "Sphere placed with non-uniform scale {:?}; using x component",
                placement.scale
            );
        }

        let radius = self.radius * placement.scale.x;
        let l = ray.origin - (self.origin + placement.translation);

        // A point sphere is only hit by a ray starting on it
        if radius <= 0.0 {
            return (l == Vec3::zeros()).then_some(0.0);
        }

        let a = ray.direction.dot(&ray.direction);
        if a < f64::EPSILON {
            return None;
        }
        let b = 2.0 * ray.direction.dot(&l);
        let c = l.dot(&l) - radius * radius;

        let (x0, x1) = solve_quadratic(a, b, c)?;
        trace!("Sphere roots {} and {}", x0, x1);

        if x0 < 0.0 {
            if culling_enabled || x1 < 0.0 {
                return None;
            }
            return Some(x1);
        }

        Some(x0)
    }
}

/// Real roots of `a*x^2 + b*x + c`, in ascending order
fn solve_quadratic(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let x0 = (-b - root) / (2.0 * a);
    let x1 = (-b + root) / (2.0 * a);
    Some((x0.min(x1), x0.max(x1)))
}

/// An axis-aligned box in its local space
///
/// Placed with a rotation it becomes an oriented box. `min <= max` holds per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAlignedBox {
    /// Lower corner
    pub min: Vec3,
    /// Upper corner
    pub max: Vec3,
}

impl AxisAlignedBox {
    /// Creates a box spanning two corners, in any order
    pub fn new(corner_a: Vec3, corner_b: Vec3) -> Self {
        Self {
            min: corner_a.inf(&corner_b),
            max: corner_a.sup(&corner_b),
        }
    }

    /// Creates a box centred on `center` with the given half extents
    pub fn from_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half_extents = half_extents.abs();
        Self::new(center - half_extents, center + half_extents)
    }

    /// Center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths of the box
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Whether `point` lies inside or on the box
    pub fn contains(&self, point: &Vec3) -> bool {
        (0..3).all(|axis| self.min[axis] <= point[axis] && point[axis] <= self.max[axis])
    }

    /// Box with both corners scaled component-wise
    ///
    /// Negative factors would swap the corners; they are the caller's to avoid.
    pub fn scaled(&self, scale: &Vec3) -> Self {
        Self {
            min: self.min.component_mul(scale),
            max: self.max.component_mul(scale),
        }
    }

    /// Signed entry distance into this box under `placement` (slab method)
    ///
    /// The box is tested as an oriented box whose axes are the columns of the
    /// placement's rotation. Always returns the entry distance, which is
    /// negative when the ray starts inside the box; a box entirely behind the
    /// origin is a miss. The culling flag has no effect on boxes.
    pub fn collision_distance(
        &self,
        ray: &Ray,
        placement: &Placement,
        _culling_enabled: bool,
    ) -> Option<f64> {
        let bounds = self.scaled(&placement.scale);
        let basis = placement.rotation.to_rotation_matrix();
        let delta = placement.translation - ray.origin;

        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for (axis_index, axis) in basis.matrix().column_iter().enumerate() {
            let e = axis.dot(&delta);
            let f = ray.direction.dot(&axis);
            let low = bounds.min[axis_index];
            let high = bounds.max[axis_index];

            if f.abs() > PARALLEL_TOLERANCE {
                let mut t1 = (e + low) / f;
                let mut t2 = (e + high) / f;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }

                t_max = t_max.min(t2);
                t_min = t_min.max(t1);
                if t_min > t_max {
                    return None;
                }
            } else if -e + low > 0.0 || -e + high < 0.0 {
                // Parallel to this slab and outside it
                return None;
            }
        }

        // The whole box lies behind the ray origin
        if t_max < 0.0 {
            return None;
        }

        // Parallel to every slab: nothing bounds the entry point
        t_min.is_finite().then_some(t_min)
    }
}
