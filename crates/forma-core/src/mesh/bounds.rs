//! Bounding boxes and reported model dimensions

use super::ParsedMesh;
use crate::{Error, Result};
use glam::Vec3;
use serde::Serialize;
use std::fmt;

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for no points
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |b, p| {
            Self::new(b.min.min(p), b.max.max(p))
        }))
    }

    /// Get the size of the bounding box
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Get the center of the bounding box
    ///
    /// Halved before adding so corners near `f32::MAX` cannot overflow.
    pub fn center(&self) -> Vec3 {
        self.min * 0.5 + self.max * 0.5
    }

    /// Whether every corner and the size are finite
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.size().is_finite()
    }

    /// Largest extent along any axis
    pub fn max_extent(&self) -> f32 {
        self.size().max_element()
    }

    /// Width/depth/height of the box
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::from(self.size())
    }
}

/// Compute the bounds of every vertex in `mesh`
///
/// A mesh with no triangles has no meaningful bounds and yields
/// [`Error::EmptyMesh`], which callers show differently from a rejected file.
/// Bounds whose extent does not fit in an `f32` are [`Error::CorruptData`].
pub fn compute_bounding_box(mesh: &ParsedMesh) -> Result<BoundingBox> {
    let bounds = BoundingBox::from_points(mesh.positions()).ok_or(Error::EmptyMesh)?;
    if !bounds.is_finite() {
        return Err(Error::corrupt("model extent is too large to measure"));
    }
    Ok(bounds)
}

/// Physical size of a model in millimetres
///
/// Values keep full precision; rounding to two decimals is for display only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimensions {
    /// Extent along X
    pub width: f32,
    /// Extent along Y
    pub depth: f32,
    /// Extent along Z
    pub height: f32,
}

impl Dimensions {
    /// Dimensions rounded to two decimal places, as `[width, depth, height]`
    pub fn rounded(&self) -> [f32; 3] {
        [self.width, self.depth, self.height].map(|v| (v * 100.0).round() / 100.0)
    }

    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.width, self.depth, self.height)
    }
}

impl From<Vec3> for Dimensions {
    fn from(size: Vec3) -> Self {
        Self {
            width: size.x,
            depth: size.y,
            height: size.z,
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} x {:.2} x {:.2} mm",
            self.width, self.depth, self.height
        )
    }
}
