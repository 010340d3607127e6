//! # Forma Core
//!
//! Model intake for a 3D-printing storefront.
//!
//! Forma takes the raw bytes of an uploaded model, decides whether they form a
//! well-formed binary STL file, and turns them into a centred triangle mesh with
//! the physical dimensions a customer sees before configuring a print.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use forma_core::prelude::*;
//!
//! let bytes = std::fs::read("bracket.stl")?;
//!
//! let info = validate(&bytes)?;
//! let mesh = parse(&bytes)?;
//! let bounds = compute_bounding_box(&mesh)?;
//!
//! println!("{} triangles, {}", info.triangle_count, bounds.dimensions());
//! ```
//!
//! ## Units and Conventions
//!
//! - **Distances**: STL is unitless; coordinates are interpreted as millimetres.
//! - **Precision**: Vertices are `f32`, exactly as stored in the file
//! - **Axes**: X is reported as width, Y as depth, Z as height

pub mod mesh;
pub mod preview;
pub mod stl;
pub mod upload;

mod error;

pub use error::{Error, GENERIC_LOAD_FAILURE, Result};
pub use mesh::compute_bounding_box;
pub use stl::{parse, validate};

/// Prelude module for convenient imports
pub mod prelude {
    // Decoding
    pub use crate::stl::{StlDecoder, StlInfo, StlLimits, parse, validate};

    // Geometry
    pub use crate::mesh::{
        BoundingBox, Dimensions, ModelReport, ParsedMesh, Triangle, Vertex, compute_bounding_box,
    };

    // Preview
    pub use crate::preview::{Framing, LoadedModel, Mirror, PreviewSession, PreviewState, PrintColor};

    // Upload
    pub use crate::upload::{ModelFormat, UploadPolicy, UploadedFile};

    // Math (re-export glam)
    pub use glam::{Mat4, Vec3};

    // Error handling
    pub use crate::{Error, Result};
}
