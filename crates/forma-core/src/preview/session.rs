//! Load state of the model preview
//!
//! `Idle -> Validating -> (Rejected | Parsing) -> (Parsed | Failed)`
//!
//! A new load always starts by dropping whatever was shown before, so a failed
//! load never leaves stale or partial geometry behind.

use super::{DEFAULT_FOV_DEGREES, Framing, Mirror, preview_color};
use crate::mesh::{BoundingBox, Dimensions, ParsedMesh};
use crate::stl::{StlDecoder, StlInfo};
use crate::upload::UploadedFile;
use crate::{Error, Result};
use std::borrow::Cow;
use tracing::{debug, info, warn};

/// A model that passed every check and can be displayed
#[derive(Debug, Clone)]
pub struct LoadedModel {
    /// Centred mesh, before mirroring
    pub mesh: ParsedMesh,
    pub bounds: BoundingBox,
    pub dimensions: Dimensions,
    pub framing: Framing,
    /// 0xRRGGBB preview colour
    pub color: u32,
    pub mirror: Mirror,
}

impl LoadedModel {
    /// The mesh as it should be drawn, with mirroring applied
    pub fn display_mesh(&self) -> Cow<'_, ParsedMesh> {
        if self.mirror.is_identity() {
            Cow::Borrowed(&self.mesh)
        } else {
            Cow::Owned(self.mesh.mirrored(self.mirror))
        }
    }
}

/// Where the preview is in its load cycle
#[derive(Debug, Default)]
pub enum PreviewState {
    /// Nothing loaded
    #[default]
    Idle,
    /// Checking the buffer's structure
    Validating,
    /// The buffer failed validation
    Rejected(Error),
    /// Decoding triangle records
    Parsing,
    /// Decoded and measured
    Parsed(Box<LoadedModel>),
    /// Decoding or measuring failed after validation, or the host failed
    Failed(Error),
}

impl PreviewState {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Rejected(_) => "rejected",
            Self::Parsing => "parsing",
            Self::Parsed(_) => "parsed",
            Self::Failed(_) => "failed",
        }
    }
}

/// Drives one viewer through repeated uploads
#[derive(Debug)]
pub struct PreviewSession {
    decoder: StlDecoder,
    state: PreviewState,
    color_name: String,
    mirror: Mirror,
    fov_degrees: f32,
}

impl Default for PreviewSession {
    fn default() -> Self {
        Self::new(StlDecoder::default())
    }
}

impl PreviewSession {
    pub fn new(decoder: StlDecoder) -> Self {
        Self {
            decoder,
            state: PreviewState::Idle,
            color_name: "White".to_string(),
            mirror: Mirror::default(),
            fov_degrees: DEFAULT_FOV_DEGREES,
        }
    }

    pub fn with_color(mut self, name: impl Into<String>) -> Self {
        self.color_name = name.into();
        self
    }

    pub fn with_mirror(mut self, mirror: Mirror) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov_degrees = fov_degrees;
        self
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    /// The displayed model, if the last load succeeded
    pub fn model(&self) -> Option<&LoadedModel> {
        match &self.state {
            PreviewState::Parsed(model) => Some(model.as_ref()),
            _ => None,
        }
    }

    /// Message to show for the last failed load
    pub fn error_message(&self) -> Option<String> {
        match &self.state {
            PreviewState::Rejected(err) | PreviewState::Failed(err) => Some(err.user_message()),
            _ => None,
        }
    }

    fn transition(&mut self, next: PreviewState) {
        debug!(from = self.state.name(), to = next.name(), "preview state");
        self.state = next;
    }

    /// Run the full pipeline on a freshly read buffer
    pub fn load(&mut self, bytes: &[u8]) -> &PreviewState {
        // Release the previous model before touching the new buffer
        self.transition(PreviewState::Idle);
        self.transition(PreviewState::Validating);

        let info = match self.decoder.validate(bytes) {
            Ok(info) => info,
            Err(err) => {
                warn!(error = %err, "upload rejected");
                self.transition(PreviewState::Rejected(err));
                return &self.state;
            }
        };

        self.transition(PreviewState::Parsing);

        let next = match self.measure(bytes, info) {
            Ok(model) => {
                info!(
                    triangles = model.mesh.triangle_count(),
                    dimensions = %model.dimensions,
                    "model ready for preview"
                );
                PreviewState::Parsed(Box::new(model))
            }
            Err(err) => {
                warn!(error = %err, "model could not be previewed");
                PreviewState::Failed(err)
            }
        };
        self.transition(next);
        &self.state
    }

    fn measure(&self, bytes: &[u8], info: StlInfo) -> Result<LoadedModel> {
        let mesh = self.decoder.parse_trusted(bytes, info)?;
        let bounds = mesh.bounding_box()?;
        Ok(LoadedModel {
            dimensions: bounds.dimensions(),
            framing: Framing::for_bounds(&bounds, self.fov_degrees),
            color: preview_color(&self.color_name),
            mirror: self.mirror,
            bounds,
            mesh,
        })
    }

    /// Load an accepted upload; formats without a preview leave the session idle
    pub fn load_upload(&mut self, file: &UploadedFile) -> &PreviewState {
        if file.format.is_previewable() {
            self.load(&file.bytes)
        } else {
            info!(name = %file.name, format = file.format.name(), "no preview for format");
            self.reset();
            &self.state
        }
    }

    /// Record a failure that happened before the decoder saw any bytes
    pub fn fail(&mut self, err: Error) {
        warn!(error = %err, "model load failed outside the decoder");
        self.transition(PreviewState::Failed(err));
    }

    /// Change the preview colour; unknown names use the fallback colour
    pub fn set_color(&mut self, name: &str) {
        self.color_name = name.to_string();
        if let PreviewState::Parsed(model) = &mut self.state {
            model.color = preview_color(name);
        }
    }

    pub fn set_mirror(&mut self, mirror: Mirror) {
        self.mirror = mirror;
        if let PreviewState::Parsed(model) = &mut self.state {
            model.mirror = mirror;
        }
    }

    pub fn reset(&mut self) {
        self.transition(PreviewState::Idle);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::preview::FALLBACK_COLOR;
    use crate::stl::encode_triangles;
    use crate::upload::UploadPolicy;
    use glam::Vec3;

    fn triangle_file() -> Vec<u8> {
        encode_triangles(
            "session",
            [[
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(2.0, 1.0, 1.0),
                Vec3::new(1.0, 2.0, 1.0),
            ]],
        )
    }

    #[test]
    fn test_successful_load() {
        let mut session = PreviewSession::default().with_color("Red");
        assert!(matches!(session.state(), PreviewState::Idle));

        session.load(&triangle_file());
        let model = session.model().unwrap();
        assert_eq!(model.dimensions.rounded(), [1.0, 1.0, 0.0]);
        assert_eq!(model.color, 0xff0000);
        assert!(model.framing.distance > 0.0);
        assert!(session.error_message().is_none());
    }

    #[test]
    fn test_rejection_clears_previous_model() {
        let mut session = PreviewSession::default();
        session.load(&triangle_file());
        assert!(session.model().is_some());

        session.load(&[0u8; 10]);
        assert!(matches!(
            session.state(),
            PreviewState::Rejected(Error::TooSmall { .. })
        ));
        assert!(session.model().is_none());
        assert!(session.error_message().unwrap().contains("minimum 84 bytes"));
    }

    #[test]
    fn test_empty_file_fails_after_parsing() {
        let mut session = PreviewSession::default();
        session.load(&encode_triangles("empty", std::iter::empty()));
        // Distinct from a rejected upload
        assert!(matches!(session.state(), PreviewState::Failed(Error::EmptyMesh)));
    }

    #[test]
    fn test_truncated_record_fails() {
        let mut bytes = triangle_file();
        bytes.pop();
        let mut session = PreviewSession::default();
        session.load(&bytes);
        assert!(matches!(
            session.state(),
            PreviewState::Failed(Error::CorruptData(_))
        ));
    }

    #[test]
    fn test_point_sized_model_gets_usable_camera() {
        let point = Vec3::splat(5.0);
        let mut session = PreviewSession::default();
        session.load(&encode_triangles("point", [[point; 3]]));

        let model = session.model().unwrap();
        assert_eq!(model.dimensions.rounded(), [0.0, 0.0, 0.0]);
        assert!(model.framing.distance > 0.0);
        assert!(model.framing.view_matrix().is_finite());
    }

    #[test]
    fn test_color_and_mirror_updates() {
        let mut session = PreviewSession::default();
        session.load(&triangle_file());

        session.set_color("Teal");
        assert_eq!(session.model().unwrap().color, FALLBACK_COLOR);

        session.set_mirror(Mirror::new(true, false, false));
        let model = session.model().unwrap();
        let shown = model.display_mesh();
        assert_eq!(
            shown.triangles[0].vertices[0].x,
            -model.mesh.triangles[0].vertices[0].x
        );
    }

    #[test]
    fn test_host_failure_uses_generic_message() {
        let mut session = PreviewSession::default();
        session.fail(Error::Io(std::io::Error::other("read interrupted")));
        assert_eq!(
            session.error_message().unwrap(),
            crate::GENERIC_LOAD_FAILURE
        );
    }

    #[test]
    fn test_non_stl_upload_has_no_preview() {
        let policy = UploadPolicy::default();
        let obj = UploadedFile::from_bytes("part.obj", b"v 0 0 0\n".to_vec(), &policy).unwrap();

        let mut session = PreviewSession::default();
        session.load(&triangle_file());
        session.load_upload(&obj);
        assert!(matches!(session.state(), PreviewState::Idle));

        let stl = UploadedFile::from_bytes("part.STL", triangle_file(), &policy).unwrap();
        session.load_upload(&stl);
        assert!(session.model().is_some());

        session.reset();
        assert!(session.model().is_none());
    }
}
