//! Binary STL validation and decoding
//!
//! Binary STL layout:
//! - 80 bytes: Header (arbitrary text, ignored)
//! - 4 bytes: Number of triangles (u32 little-endian)
//! - For each triangle (50 bytes):
//!   - 12 bytes: Normal vector (3 x f32 little-endian, ignored and recomputed)
//!   - 36 bytes: 3 vertices (9 x f32 little-endian)
//!   - 2 bytes: Attribute byte count (ignored)
//!
//! Validation is deliberately a storefront policy rather than a strict format
//! check: the triangle count is capped, and the file length may differ from the
//! length implied by the count by at most one byte.

mod reader;
pub mod writer;

use crate::mesh::{BoundingBox, ParsedMesh};
use crate::{Error, Result};
use reader::RecordReader;
use tracing::{debug, info, warn};

pub use writer::{encode_triangles, write_stl};

/// Size of the free-form header in bytes
pub const HEADER_LEN: usize = 80;

/// Smallest possible file: header plus triangle count
pub const MIN_FILE_LEN: usize = HEADER_LEN + 4;

/// Size of one triangle record (normal + 3 vertices + attribute)
pub const RECORD_LEN: usize = 50;

/// Default cap on the declared triangle count
pub const DEFAULT_MAX_TRIANGLES: u32 = 10_000_000;

/// Validation policy for uploaded STL files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StlLimits {
    /// Largest triangle count accepted before any allocation happens
    pub max_triangles: u32,
    /// Allowed difference in bytes between actual and expected file length
    pub size_tolerance: u64,
}

impl Default for StlLimits {
    fn default() -> Self {
        Self {
            max_triangles: DEFAULT_MAX_TRIANGLES,
            size_tolerance: 1,
        }
    }
}

impl StlLimits {
    pub fn with_max_triangles(mut self, max_triangles: u32) -> Self {
        self.max_triangles = max_triangles;
        self
    }

    pub fn with_size_tolerance(mut self, size_tolerance: u64) -> Self {
        self.size_tolerance = size_tolerance;
        self
    }
}

/// Facts established by a successful validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StlInfo {
    /// Triangle count declared at offset 80
    pub triangle_count: u32,
    /// Length of the validated buffer
    pub byte_length: usize,
}

impl StlInfo {
    /// File length implied by the triangle count
    pub fn expected_len(&self) -> u64 {
        expected_len(self.triangle_count)
    }
}

fn expected_len(triangle_count: u32) -> u64 {
    MIN_FILE_LEN as u64 + u64::from(triangle_count) * RECORD_LEN as u64
}

/// Stateless binary STL decoder
///
/// Holds only its limits, so one decoder can be shared freely between threads
/// and each call works on its own buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct StlDecoder {
    limits: StlLimits,
}

impl StlDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: StlLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> StlLimits {
        self.limits
    }

    /// Check that `bytes` is a binary STL file this storefront accepts
    ///
    /// Checks run in order and stop at the first failure: minimum length,
    /// triangle cap, then the length implied by the triangle count.
    pub fn validate(&self, bytes: &[u8]) -> Result<StlInfo> {
        if bytes.len() < MIN_FILE_LEN {
            warn!(len = bytes.len(), "rejected STL: shorter than header");
            return Err(Error::TooSmall { len: bytes.len() });
        }

        let triangle_count = RecordReader::at(bytes, HEADER_LEN).read_u32()?;

        if triangle_count > self.limits.max_triangles {
            warn!(triangle_count, "rejected STL: triangle count above cap");
            return Err(Error::TooManyTriangles {
                count: triangle_count,
                max: self.limits.max_triangles,
            });
        }

        let expected = expected_len(triangle_count);
        let actual = bytes.len() as u64;
        if actual.abs_diff(expected) > self.limits.size_tolerance {
            warn!(expected, actual, "rejected STL: length does not match triangle count");
            return Err(Error::SizeMismatch { expected, actual });
        }

        debug!(triangle_count, len = bytes.len(), "validated binary STL");
        Ok(StlInfo {
            triangle_count,
            byte_length: bytes.len(),
        })
    }

    /// Validate and decode `bytes` into a centred mesh
    pub fn parse(&self, bytes: &[u8]) -> Result<ParsedMesh> {
        let info = self.validate(bytes)?;
        self.parse_trusted(bytes, info)
    }

    /// Decode `bytes` using the result of an earlier [`validate`](Self::validate)
    ///
    /// No validation is repeated, but no read ever goes past the end of the
    /// buffer: a record that does not fit, a vertex that is NaN or infinite,
    /// or a model whose extent overflows `f32` fails with
    /// [`Error::CorruptData`].
    pub fn parse_trusted(&self, bytes: &[u8], info: StlInfo) -> Result<ParsedMesh> {
        let count = info.triangle_count as usize;
        // Never reserve more records than the buffer could hold
        let capacity = count.min(bytes.len().saturating_sub(MIN_FILE_LEN) / RECORD_LEN);
        let mut corners = Vec::with_capacity(capacity);

        let mut reader = RecordReader::at(bytes, MIN_FILE_LEN);
        for index in 0..count {
            reader.skip::<12>()?;
            let tri = [reader.read_vec3()?, reader.read_vec3()?, reader.read_vec3()?];
            reader.skip::<2>()?;

            if !tri.iter().all(|v| v.is_finite()) {
                return Err(Error::corrupt(format!(
                    "triangle {} has a non-finite vertex coordinate",
                    index
                )));
            }
            corners.push(tri);
        }

        let mesh = ParsedMesh::from_triangles(corners);
        if BoundingBox::from_points(mesh.positions()).is_some_and(|b| !b.is_finite()) {
            return Err(Error::corrupt(
                "model extent exceeds the representable coordinate range",
            ));
        }
        info!(
            triangles = mesh.triangle_count(),
            bytes_read = reader.offset(),
            "parsed binary STL"
        );
        Ok(mesh)
    }
}

/// Validate with the default limits
pub fn validate(bytes: &[u8]) -> Result<StlInfo> {
    StlDecoder::new().validate(bytes)
}

/// Validate and parse with the default limits
pub fn parse(bytes: &[u8]) -> Result<ParsedMesh> {
    StlDecoder::new().parse(bytes)
}
