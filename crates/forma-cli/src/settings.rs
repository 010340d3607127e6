//! CLI settings
//!
//! Stored in `{config_dir}/forma/settings.json`. A missing or unreadable file
//! yields the defaults; command-line flags override individual values.

use anyhow::{Context, Result, bail};
use forma_core::preview::DEFAULT_FOV_DEGREES;
use forma_core::stl::{DEFAULT_MAX_TRIANGLES, StlLimits};
use forma_core::upload::{DEFAULT_MAX_UPLOAD_BYTES, UploadPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings that persist across runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Largest triangle count accepted
    pub max_triangles: u32,
    /// Allowed difference between actual and expected file length
    pub size_tolerance: u64,
    /// Upload cap in MiB
    pub max_upload_mb: u64,
    /// Preview colour when none is given
    pub default_color: String,
    /// Vertical field of view used for framing
    pub camera_fov_degrees: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_triangles: DEFAULT_MAX_TRIANGLES,
            size_tolerance: 1,
            max_upload_mb: DEFAULT_MAX_UPLOAD_BYTES / (1024 * 1024),
            default_color: "White".to_string(),
            camera_fov_degrees: DEFAULT_FOV_DEGREES,
        }
    }
}

impl Settings {
    pub fn limits(&self) -> StlLimits {
        StlLimits::default()
            .with_max_triangles(self.max_triangles)
            .with_size_tolerance(self.size_tolerance)
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy::default().with_max_bytes(self.max_upload_mb.saturating_mul(1024 * 1024))
    }
}

/// Get the path to the settings file
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("forma").join("settings.json"))
}

/// Load settings from `path`, or the default location when `None`
///
/// Falls back to defaults if the file doesn't exist or is invalid.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let Some(path) = path.map(Path::to_path_buf).or_else(settings_path) else {
        return Settings::default();
    };

    if !path.exists() {
        return Settings::default();
    }

    match fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), %err, "ignoring invalid settings file");
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

/// Save settings to `path`, or the default location when `None`
pub fn save_settings(settings: &Settings, path: Option<&Path>) -> Result<PathBuf> {
    let Some(path) = path.map(Path::to_path_buf).or_else(settings_path) else {
        bail!("Could not determine config directory");
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    fs::write(&path, json).context("Failed to write settings file")?;
    Ok(path)
}
