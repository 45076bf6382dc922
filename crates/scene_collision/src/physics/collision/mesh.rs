//! Collision mesh representations
//!
//! A [`MeshShape`] is an owned list of triangles in model space. It can be
//! built directly, or decoded from the same vertex/index buffers the GPU
//! resource layer uploads for rendering (a [`MeshSource`]).

use log::debug;
use thiserror::Error;

use super::primitives::{Ray, Triangle};
use super::shape::closest_by_magnitude;
use crate::foundation::math::{Placement, Vec3};

/// How consecutive vertices in a mesh source form primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    /// Individual points
    Points,
    /// Independent line segments
    Lines,
    /// Connected line segments
    LineStrip,
    /// Independent triangles, three vertices each
    Triangles,
    /// Triangle strip
    TriangleStrip,
}

/// What a vertex attribute means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexSemantic {
    /// Vertex position
    Position,
    /// Vertex normal
    Normal,
    /// Texture coordinate
    TexCoord,
    /// Vertex color
    Color,
    /// Tangent vector
    Tangent,
}

/// Component layout of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentFormat {
    /// Two 32-bit floats
    Float32x2,
    /// Three 32-bit floats
    Float32x3,
    /// Four 32-bit floats
    Float32x4,
    /// Four unsigned bytes
    Uint8x4,
}

impl ComponentFormat {
    /// Size of one element in bytes
    pub fn size(self) -> usize {
        match self {
            Self::Float32x2 => 8,
            Self::Float32x3 => 12,
            Self::Float32x4 => 16,
            Self::Uint8x4 => 4,
        }
    }
}

/// Describes where one attribute lives inside the interleaved vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// What the attribute means
    pub semantic: VertexSemantic,
    /// Component layout
    pub format: ComponentFormat,
    /// Byte offset of the first element
    pub offset: usize,
    /// Bytes between consecutive elements; 0 means tightly packed
    pub stride: usize,
}

impl VertexAttribute {
    fn effective_stride(&self) -> usize {
        if self.stride == 0 {
            self.format.size()
        } else {
            self.stride
        }
    }

    /// Number of whole elements of this attribute held by `data`
    fn element_count(&self, data: &[u8]) -> usize {
        let size = self.format.size();
        match self
            .offset
            .checked_add(size)
            .and_then(|end| data.len().checked_sub(end))
        {
            Some(remaining) => remaining / self.effective_stride() + 1,
            None => 0,
        }
    }
}

/// Raw mesh buffers as supplied by the asset loader or GPU resource layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshSource {
    /// Primitive topology of the buffers
    pub topology: PrimitiveTopology,
    /// Attribute layout of `vertex_data`
    pub attributes: Vec<VertexAttribute>,
    /// Interleaved vertex bytes (little-endian)
    pub vertex_data: Vec<u8>,
    /// Optional index buffer
    pub indices: Option<Vec<u32>>,
}

impl MeshSource {
    /// Tightly packed triangle-list source holding only positions
    pub fn from_positions(positions: &[[f32; 3]], indices: Option<Vec<u32>>) -> Self {
        Self {
            topology: PrimitiveTopology::Triangles,
            attributes: vec![VertexAttribute {
                semantic: VertexSemantic::Position,
                format: ComponentFormat::Float32x3,
                offset: 0,
                stride: 0,
            }],
            vertex_data: bytemuck::cast_slice(positions).to_vec(),
            indices,
        }
    }

    /// The first attribute with the given semantic
    pub fn attribute(&self, semantic: VertexSemantic) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|attribute| attribute.semantic == semantic)
    }

    /// Decode every position in the vertex buffer, widened to `f64`
    pub fn positions(&self) -> Result<Vec<Vec3>, MeshShapeError> {
        let attribute = self
            .attribute(VertexSemantic::Position)
            .ok_or(MeshShapeError::MissingPositionAttribute)?;

        if attribute.format != ComponentFormat::Float32x3 {
            return Err(MeshShapeError::UnsupportedPositionFormat(attribute.format));
        }

        let stride = attribute.effective_stride();
        let size = attribute.format.size();
        let positions = (0..attribute.element_count(&self.vertex_data))
            .map(|vertex| {
                let start = attribute.offset + vertex * stride;
                let [x, y, z]: [f32; 3] =
                    bytemuck::pod_read_unaligned(&self.vertex_data[start..start + size]);
                Vec3::new(f64::from(x), f64::from(y), f64::from(z))
            })
            .collect();

        Ok(positions)
    }
}

/// Errors that can occur building a [`MeshShape`] from a [`MeshSource`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshShapeError {
    /// Only triangle lists can be turned into collision triangles
    #[error("Unsupported primitive topology: {0:?}")]
    UnsupportedTopology(PrimitiveTopology),

    /// The source has no position attribute
    #[error("Mesh source has no position attribute")]
    MissingPositionAttribute,

    /// Positions must be three 32-bit floats
    #[error("Unsupported position format: {0:?}")]
    UnsupportedPositionFormat(ComponentFormat),

    /// An index points past the end of the position stream
    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// The offending index
        index: u32,
        /// Number of positions in the source
        vertex_count: usize,
    },
}

/// A triangle mesh collision shape stored in model space
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshShape {
    triangles: Vec<Triangle>,
}

impl MeshShape {
    /// Creates a mesh shape from model-space triangles
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Builds a mesh shape from raw vertex/index buffers
    ///
    /// Triangles come from consecutive index triples when an index buffer is
    /// present, otherwise from consecutive position triples. A trailing
    /// partial triple is ignored.
    pub fn from_source(source: &MeshSource) -> Result<Self, MeshShapeError> {
        if source.topology != PrimitiveTopology::Triangles {
            return Err(MeshShapeError::UnsupportedTopology(source.topology));
        }

        let positions = source.positions()?;

        let triangles = match &source.indices {
            Some(indices) => {
                if indices.len() % 3 != 0 {
                    debug!("Ignoring {} trailing mesh indices", indices.len() % 3);
                }
                let lookup = |index: u32| {
                    positions
                        .get(index as usize)
                        .copied()
                        .ok_or(MeshShapeError::IndexOutOfRange {
                            index,
                            vertex_count: positions.len(),
                        })
                };
                indices
                    .chunks_exact(3)
                    .map(|chunk| {
                        Ok(Triangle::new(lookup(chunk[0])?, lookup(chunk[1])?, lookup(chunk[2])?))
                    })
                    .collect::<Result<Vec<_>, MeshShapeError>>()?
            }
            None => {
                if positions.len() % 3 != 0 {
                    debug!("Ignoring {} trailing mesh positions", positions.len() % 3);
                }
                positions
                    .chunks_exact(3)
                    .map(|chunk| Triangle::new(chunk[0], chunk[1], chunk[2]))
                    .collect()
            }
        };

        debug!(
            "Built collision mesh with {} triangles from {} positions",
            triangles.len(),
            positions.len()
        );

        Ok(Self::new(triangles))
    }

    /// Model-space triangles
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of triangles
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the mesh has no triangles
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Hit distance of smallest magnitude over all triangles under `placement`
    pub fn collision_distance(
        &self,
        ray: &Ray,
        placement: &Placement,
        culling_enabled: bool,
    ) -> Option<f64> {
        let matrix = placement.to_matrix();
        self.triangles
            .iter()
            .filter_map(|triangle| {
                triangle
                    .transformed(&matrix)
                    .intersect_ray(ray, culling_enabled)
                    .map(|hit| hit.distance)
            })
            .fold(None, closest_by_magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-9;

    /// Two facing unit quads at z = 0 and z = 2, as a non-indexed position stream
    fn two_planes() -> Vec<[f32; 3]> {
        let mut positions = Vec::new();
        for z in [0.0, 2.0] {
            positions.extend_from_slice(&[
                [-1.0, -1.0, z], [1.0, -1.0, z], [1.0, 1.0, z],
                [-1.0, -1.0, z], [1.0, 1.0, z], [-1.0, 1.0, z],
            ]);
        }
        positions
    }

    #[test]
    fn test_single_indexed_triangle() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let source = MeshSource::from_positions(&positions, Some(vec![0, 1, 2]));

        let mesh = MeshShape::from_source(&source).unwrap();

        assert_eq!(mesh.len(), 1);
        assert_eq!(
            mesh.triangles()[0],
            Triangle::new(
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            )
        );
    }

    #[test]
    fn test_indices_reuse_positions() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
        let source = MeshSource::from_positions(&positions, Some(vec![0, 1, 2, 0, 2, 3, 1]));

        let mesh = MeshShape::from_source(&source).unwrap();

        assert_eq!(mesh.len(), 2);
        assert_eq!(mesh.triangles()[1].c, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_consecutive_positions_without_indices() {
        let source = MeshSource::from_positions(&two_planes(), None);
        let mesh = MeshShape::from_source(&source).unwrap();
        assert_eq!(mesh.len(), 4);
    }

    #[test]
    fn test_interleaved_buffer_with_stride() {
        // position (12 bytes) followed by a normal (12 bytes)
        let vertices: [[f32; 6]; 3] = [
            [0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            [2.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            [0.0, 2.0, 0.0, 0.0, 0.0, 1.0],
        ];
        let source = MeshSource {
            topology: PrimitiveTopology::Triangles,
            attributes: vec![
                VertexAttribute {
                    semantic: VertexSemantic::Normal,
                    format: ComponentFormat::Float32x3,
                    offset: 12,
                    stride: 24,
                },
                VertexAttribute {
                    semantic: VertexSemantic::Position,
                    format: ComponentFormat::Float32x3,
                    offset: 0,
                    stride: 24,
                },
            ],
            vertex_data: bytemuck::cast_slice(&vertices).to_vec(),
            indices: None,
        };

        let mesh = MeshShape::from_source(&source).unwrap();

        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.triangles()[0].b, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(mesh.triangles()[0].c, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_rejects_non_triangle_topology() {
        let mut source = MeshSource::from_positions(&two_planes(), None);
        source.topology = PrimitiveTopology::TriangleStrip;

        assert_eq!(
            MeshShape::from_source(&source),
            Err(MeshShapeError::UnsupportedTopology(PrimitiveTopology::TriangleStrip))
        );
    }

    #[test]
    fn test_rejects_missing_position() {
        let mut source = MeshSource::from_positions(&two_planes(), None);
        source.attributes[0].semantic = VertexSemantic::Normal;

        assert_eq!(
            MeshShape::from_source(&source),
            Err(MeshShapeError::MissingPositionAttribute)
        );
    }

    #[test]
    fn test_rejects_wrong_position_format() {
        let mut source = MeshSource::from_positions(&two_planes(), None);
        source.attributes[0].format = ComponentFormat::Float32x4;

        assert_eq!(
            MeshShape::from_source(&source),
            Err(MeshShapeError::UnsupportedPositionFormat(ComponentFormat::Float32x4))
        );
    }

    #[test]
    fn test_rejects_index_out_of_range() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let source = MeshSource::from_positions(&positions, Some(vec![0, 1, 3]));

        assert_eq!(
            MeshShape::from_source(&source),
            Err(MeshShapeError::IndexOutOfRange { index: 3, vertex_count: 3 })
        );
    }

    #[test]
    fn test_offset_past_buffer_holds_no_positions() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let mut source = MeshSource::from_positions(&positions, None);
        source.attributes[0].offset = usize::MAX - 4;

        assert!(source.positions().unwrap().is_empty());
        assert!(MeshShape::from_source(&source).unwrap().is_empty());

        source.indices = Some(vec![0, 1, 2]);
        assert_eq!(
            MeshShape::from_source(&source),
            Err(MeshShapeError::IndexOutOfRange { index: 0, vertex_count: 0 })
        );
    }

    #[test]
    fn test_closest_plane_wins() {
        let mesh = MeshShape::from_source(&MeshSource::from_positions(&two_planes(), None)).unwrap();
        let ray = Ray::new(Vec3::new(0.2, 0.3, -5.0), Vec3::new(0.0, 0.0, 1.0));

        let distance = mesh.collision_distance(&ray, &Placement::identity(), false).unwrap();
        assert_relative_eq!(distance, 5.0, epsilon = EPSILON);
    }

    #[test]
    fn test_smallest_magnitude_beats_forward_hit() {
        let mesh = MeshShape::from_source(&MeshSource::from_positions(&two_planes(), None)).unwrap();
        // Plane z=0 is 0.5 behind, plane z=2 is 1.5 ahead
        let ray = Ray::new(Vec3::new(0.2, 0.3, 0.5), Vec3::new(0.0, 0.0, 1.0));

        let distance = mesh.collision_distance(&ray, &Placement::identity(), false).unwrap();
        assert_relative_eq!(distance, -0.5, epsilon = EPSILON);
    }

    #[test]
    fn test_mesh_under_placement() {
        let mesh = MeshShape::from_source(&MeshSource::from_positions(&two_planes(), None)).unwrap();
        let placement = Placement::from_translation(Vec3::new(0.0, 0.0, 10.0));
        let ray = Ray::new(Vec3::new(0.2, 0.3, 0.0), Vec3::new(0.0, 0.0, 1.0));

        let distance = mesh.collision_distance(&ray, &placement, false).unwrap();
        assert_relative_eq!(distance, 10.0, epsilon = EPSILON);
    }

    #[test]
    fn test_empty_mesh_never_hits() {
        let mesh = MeshShape::default();
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0));

        assert!(mesh.is_empty());
        assert!(mesh.collision_distance(&ray, &Placement::identity(), false).is_none());
    }
}
