//! Camera placement that fits a centred model in view

use crate::mesh::BoundingBox;
use glam::{Mat4, Vec3};

/// Default vertical field of view of the preview camera
pub const DEFAULT_FOV_DEGREES: f32 = 50.0;

/// Margin applied on top of the tight fit distance
const FRAMING_MARGIN: f32 = 1.5;

/// Camera distance used when a model has no extent to frame
pub const DEFAULT_CAMERA_DISTANCE: f32 = 200.0;

/// Where to put the preview camera for a model
///
/// The model is expected to be centred on the origin (as parsing leaves it);
/// the camera sits on +Z looking back at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    /// Vertical field of view in radians
    pub fov: f32,
    /// Distance from the origin along +Z
    pub distance: f32,
}

impl Framing {
    /// Frame `bounds` with a camera of the given vertical field of view
    ///
    /// A point-sized model would put the eye on the target, so it gets
    /// [`DEFAULT_CAMERA_DISTANCE`] instead.
    pub fn for_bounds(bounds: &BoundingBox, fov_degrees: f32) -> Self {
        let fov = fov_degrees.to_radians();
        let fit = (bounds.max_extent() / (fov / 2.0).sin()).abs() * FRAMING_MARGIN;
        let distance = if fit.is_finite() && fit > f32::EPSILON {
            fit
        } else {
            DEFAULT_CAMERA_DISTANCE
        };
        Self { fov, distance }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }
}
