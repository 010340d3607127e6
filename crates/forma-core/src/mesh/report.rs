//! Serializable summary of a parsed model

use super::{Dimensions, ParsedMesh};
use crate::Result;
use serde::Serialize;

/// What the storefront shows about an accepted upload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelReport {
    pub triangle_count: usize,
    pub dimensions: Dimensions,
    /// Dimensions rounded for display, `[width, depth, height]`
    pub display_dimensions: [f32; 3],
    /// Bounds after centring (symmetric about the origin)
    pub min: [f32; 3],
    pub max: [f32; 3],
    /// Translation applied to the uploaded coordinates
    pub offset: [f32; 3],
}

impl ModelReport {
    /// Summarise `mesh`; fails with `EmptyMesh` when there is nothing to measure
    pub fn new(mesh: &ParsedMesh) -> Result<Self> {
        let bounds = mesh.bounding_box()?;
        let dimensions = bounds.dimensions();
        Ok(Self {
            triangle_count: mesh.triangle_count(),
            dimensions,
            display_dimensions: dimensions.rounded(),
            min: bounds.min.to_array(),
            max: bounds.max.to_array(),
            offset: mesh.offset.to_array(),
        })
    }
}
