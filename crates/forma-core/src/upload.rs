//! File acquisition for model uploads
//!
//! The storefront accepts STL, OBJ and 3MF files up to 50 MB. Only STL is
//! decoded for a preview; the other formats are passed along unparsed.

use crate::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Default upload cap (50 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Model formats the upload page accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFormat {
    Stl,
    Obj,
    ThreeMf,
}

impl ModelFormat {
    /// Detect format from file extension (case-insensitive)
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            "3mf" => Some(Self::ThreeMf),
            _ => None,
        }
    }

    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Obj => "obj",
            Self::ThreeMf => "3mf",
        }
    }

    /// Get a human-readable name for this format
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stl => "STL",
            Self::Obj => "OBJ",
            Self::ThreeMf => "3MF",
        }
    }

    /// Whether the decoder can produce a preview for this format
    pub fn is_previewable(&self) -> bool {
        matches!(self, Self::Stl)
    }
}

/// What an upload must satisfy before any decoding
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub accepted: Vec<ModelFormat>,
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            accepted: vec![ModelFormat::Stl, ModelFormat::Obj, ModelFormat::ThreeMf],
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn with_accepted(mut self, accepted: Vec<ModelFormat>) -> Self {
        self.accepted = accepted;
        self
    }

    /// Resolve the format of `name`, failing for anything not accepted
    pub fn check_name(&self, name: &str) -> Result<ModelFormat> {
        let path = Path::new(name);
        ModelFormat::from_extension(path)
            .filter(|format| self.accepted.contains(format))
            .ok_or_else(|| Error::UnsupportedFormat {
                extension: path
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            })
    }

    pub fn check_size(&self, size: u64) -> Result<()> {
        if size > self.max_bytes {
            return Err(Error::FileTooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// An accepted upload, held in memory for the decoder
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub format: ModelFormat,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Accept bytes received under `name`
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>, policy: &UploadPolicy) -> Result<Self> {
        let name = name.into();
        let format = policy.check_name(&name)?;
        policy.check_size(bytes.len() as u64)?;
        debug!(%name, format = format.name(), size = bytes.len(), "upload accepted");
        Ok(Self {
            name,
            format,
            bytes,
        })
    }

    /// Read and accept a file from disk
    ///
    /// Name and size are checked before the contents are read.
    pub fn read(path: &Path, policy: &UploadPolicy) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        policy.check_name(&name)?;
        policy.check_size(std::fs::metadata(path)?.len())?;
        let bytes = std::fs::read(path)?;
        Self::from_bytes(name, bytes, policy)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(ModelFormat::from_extension(Path::new("a.stl")), Some(ModelFormat::Stl));
        assert_eq!(ModelFormat::from_extension(Path::new("a.STL")), Some(ModelFormat::Stl));
        assert_eq!(ModelFormat::from_extension(Path::new("b.3mf")), Some(ModelFormat::ThreeMf));
        assert_eq!(ModelFormat::from_extension(Path::new("c.step")), None);
        assert_eq!(ModelFormat::from_extension(Path::new("noext")), None);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = UploadedFile::from_bytes("drawing.dxf", vec![0; 100], &UploadPolicy::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { ref extension } if extension == "dxf"));
    }

    #[test]
    fn test_policy_can_narrow_formats() {
        let policy = UploadPolicy::default().with_accepted(vec![ModelFormat::Stl]);
        assert!(policy.check_name("part.obj").is_err());
        assert_eq!(policy.check_name("part.stl").unwrap(), ModelFormat::Stl);
    }

    #[test]
    fn test_size_cap() {
        let policy = UploadPolicy::default().with_max_bytes(100);
        assert!(UploadedFile::from_bytes("a.stl", vec![0; 100], &policy).is_ok());
        let err = UploadedFile::from_bytes("a.stl", vec![0; 101], &policy).unwrap_err();
        assert!(matches!(err, Error::FileTooLarge { size: 101, max: 100 }));
    }

    #[test]
    fn test_read_from_disk() {
        let path = std::env::temp_dir().join("forma_test_upload.stl");
        std::fs::write(&path, vec![0u8; 84]).unwrap();

        let file = UploadedFile::read(&path, &UploadPolicy::default()).unwrap();
        assert_eq!(file.format, ModelFormat::Stl);
        assert_eq!(file.size(), 84);
        assert_eq!(file.name, "forma_test_upload.stl");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_read_missing_file() {
        let path = std::env::temp_dir().join("forma_test_missing_12345.stl");
        let err = UploadedFile::read(&path, &UploadPolicy::default()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
