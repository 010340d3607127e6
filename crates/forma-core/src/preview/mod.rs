//! Everything a viewer needs around a parsed mesh
//!
//! Rendering itself lives outside this crate. This module supplies the inputs a
//! renderer consumes (colour, mirroring, camera framing) and the load session
//! that decides what the viewer is currently allowed to show.

mod color;
mod framing;
mod mirror;
mod session;

pub use color::{FALLBACK_COLOR, PrintColor, preview_color};
pub use framing::{DEFAULT_CAMERA_DISTANCE, DEFAULT_FOV_DEGREES, Framing};
pub use mirror::Mirror;
pub use session::{LoadedModel, PreviewSession, PreviewState};
