//! Parsed triangle meshes
//!
//! STL stores no connectivity: every triangle carries its own three vertices.
//! `ParsedMesh` keeps that layout (file order is preserved) and adds what a
//! previewer needs: a recomputed face normal, smoothed per-vertex normals, and
//! coordinates centred on the origin.

mod bounds;
mod report;

use crate::Result;
use glam::Vec3;
use std::collections::HashMap;

pub use bounds::{BoundingBox, Dimensions, compute_bounding_box};
pub use report::ModelReport;

/// A vertex with position and normal, laid out for direct GPU upload
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// One triangle of a parsed mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Corner positions in file order
    pub vertices: [Vec3; 3],
    /// Unit face normal computed from the corners (zero if degenerate)
    pub normal: Vec3,
    /// Smoothed normal for each corner
    pub vertex_normals: [Vec3; 3],
}

/// A decoded, centred triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedMesh {
    pub triangles: Vec<Triangle>,
    /// Translation that was applied to move the bounding-box centre to the origin
    pub offset: Vec3,
}

/// Unit normal of a triangle using counter-clockwise winding
///
/// Degenerate triangles (zero area) get a zero normal so they do not bias
/// smoothing of their neighbours.
pub(crate) fn face_normal(tri: &[Vec3; 3]) -> Vec3 {
    (tri[1] - tri[0]).cross(tri[2] - tri[0]).normalize_or_zero()
}

/// Hashable identity of a position; `-0.0` and `0.0` are the same point
fn position_key(p: Vec3) -> [u32; 3] {
    [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits(), (p.z + 0.0).to_bits()]
}

impl ParsedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from raw corner positions
    ///
    /// Computes face normals, smoothed vertex normals, and then recentres the
    /// mesh so its bounding box is symmetric about the origin.
    pub fn from_triangles<I>(corners: I) -> Self
    where
        I: IntoIterator<Item = [Vec3; 3]>,
    {
        let mut triangles: Vec<Triangle> = corners
            .into_iter()
            .map(|vertices| {
                let normal = face_normal(&vertices);
                Triangle {
                    vertices,
                    normal,
                    vertex_normals: [normal; 3],
                }
            })
            .collect();

        smooth_vertex_normals(&mut triangles);

        let mut mesh = Self {
            triangles,
            offset: Vec3::ZERO,
        };
        mesh.center();
        mesh
    }

    /// Get number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Get number of vertices (three per triangle, unshared)
    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Iterate over every corner position in file order
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.triangles.iter().flat_map(|t| t.vertices)
    }

    /// Axis-aligned bounds of the mesh in its current coordinates
    pub fn bounding_box(&self) -> Result<BoundingBox> {
        compute_bounding_box(self)
    }

    /// Position in the uploaded file's coordinate system of a centred point
    pub fn original_position(&self, p: Vec3) -> Vec3 {
        p - self.offset
    }

    /// Flatten into a non-indexed vertex list with smoothed normals
    ///
    /// The result can be uploaded as-is with `bytemuck::cast_slice`.
    pub fn to_vertices(&self) -> Vec<Vertex> {
        self.triangles
            .iter()
            .flat_map(|t| {
                [0, 1, 2].map(|i| Vertex::new(t.vertices[i], t.vertex_normals[i]))
            })
            .collect()
    }

    /// Translate so the bounding-box centre sits at the origin
    fn center(&mut self) {
        let Some(bounds) = BoundingBox::from_points(self.positions()) else {
            return;
        };
        let shift = -bounds.center();
        for tri in &mut self.triangles {
            for v in &mut tri.vertices {
                *v += shift;
            }
        }
        self.offset += shift;
    }
}

/// Replace each corner normal with the average over all triangles touching
/// the same position
///
/// Every incident face contributes its unit normal once. The sum is
/// normalised, which is the direction of the unweighted mean.
fn smooth_vertex_normals(triangles: &mut [Triangle]) {
    let mut sums: HashMap<[u32; 3], Vec3> = HashMap::with_capacity(triangles.len() * 3 / 2);

    for tri in triangles.iter() {
        for v in tri.vertices {
            *sums.entry(position_key(v)).or_insert(Vec3::ZERO) += tri.normal;
        }
    }

    for tri in triangles.iter_mut() {
        for (slot, v) in tri.vertex_normals.iter_mut().zip(tri.vertices) {
            if let Some(sum) = sums.get(&position_key(v)) {
                *slot = sum.normalize_or_zero();
            }
        }
    }
}
