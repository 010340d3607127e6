//! Mirroring a model before printing

use crate::mesh::{ParsedMesh, Triangle};
use glam::Vec3;

/// Which axes to flip the model across
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mirror {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl Mirror {
    pub fn new(x: bool, y: bool, z: bool) -> Self {
        Self { x, y, z }
    }

    /// Per-axis scale factors (`-1.0` on mirrored axes)
    pub fn scale(&self) -> Vec3 {
        let flip = |on: bool| if on { -1.0 } else { 1.0 };
        Vec3::new(flip(self.x), flip(self.y), flip(self.z))
    }

    pub fn is_identity(&self) -> bool {
        !(self.x || self.y || self.z)
    }

    /// An odd number of flips turns the surface inside out
    pub fn reverses_winding(&self) -> bool {
        (self.x as u8 + self.y as u8 + self.z as u8) % 2 == 1
    }
}

impl ParsedMesh {
    /// Copy of the mesh reflected across the axes selected in `mirror`
    ///
    /// Normals are reflected with the positions. When the reflection reverses
    /// orientation, two corners of every triangle are swapped so faces stay
    /// counter-clockwise seen from outside. Dimensions are unchanged.
    pub fn mirrored(&self, mirror: Mirror) -> ParsedMesh {
        let scale = mirror.scale();
        let swap = mirror.reverses_winding();

        let triangles = self
            .triangles
            .iter()
            .map(|t| {
                let mut vertices = t.vertices.map(|v| v * scale);
                let mut vertex_normals = t.vertex_normals.map(|n| n * scale);
                if swap {
                    vertices.swap(1, 2);
                    vertex_normals.swap(1, 2);
                }
                Triangle {
                    vertices,
                    normal: t.normal * scale,
                    vertex_normals,
                }
            })
            .collect();

        ParsedMesh {
            triangles,
            offset: self.offset * scale,
        }
    }
}
