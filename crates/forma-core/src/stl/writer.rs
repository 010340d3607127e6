//! Binary STL encoding
//!
//! Used to hand a normalised (centred, optionally mirrored) model back to the
//! print pipeline and to build fixtures. Normals are always recomputed from the
//! vertices; attribute bytes are written as zero.

use super::{HEADER_LEN, MIN_FILE_LEN, RECORD_LEN};
use crate::Result;
use crate::mesh::{ParsedMesh, face_normal};
use glam::Vec3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Encode triangles as a binary STL buffer
///
/// `header` is truncated or space-padded to 80 bytes.
pub fn encode_triangles<I>(header: &str, triangles: I) -> Vec<u8>
where
    I: IntoIterator<Item = [Vec3; 3]>,
{
    let triangles: Vec<[Vec3; 3]> = triangles.into_iter().collect();
    let mut out = Vec::with_capacity(MIN_FILE_LEN + triangles.len() * RECORD_LEN);

    let mut header_bytes = [b' '; HEADER_LEN];
    let header_len = header.len().min(HEADER_LEN);
    header_bytes[..header_len].copy_from_slice(&header.as_bytes()[..header_len]);
    out.extend_from_slice(&header_bytes);

    out.extend_from_slice(&(triangles.len() as u32).to_le_bytes());

    for tri in &triangles {
        let normal = face_normal(tri);
        for v in std::iter::once(&normal).chain(tri.iter()) {
            out.extend_from_slice(&v.x.to_le_bytes());
            out.extend_from_slice(&v.y.to_le_bytes());
            out.extend_from_slice(&v.z.to_le_bytes());
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    }

    out
}

impl ParsedMesh {
    /// Encode this mesh, in its current (centred) coordinates, as binary STL
    pub fn to_stl_bytes(&self) -> Vec<u8> {
        let header = format!("Forma STL Export - {} triangles", self.triangle_count());
        encode_triangles(&header, self.triangles.iter().map(|t| t.vertices))
    }
}

/// Write a mesh to disk as binary STL
pub fn write_stl(mesh: &ParsedMesh, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&mesh.to_stl_bytes())?;
    writer.flush()?;
    Ok(())
}
