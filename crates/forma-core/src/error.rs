//! Error types for Forma

use thiserror::Error;

/// Result type alias using Forma's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown when a load fails for a reason other than a decoder check
pub const GENERIC_LOAD_FAILURE: &str =
    "Failed to load 3D model. Please ensure the file is a valid STL format.";

/// Errors that can occur while accepting and decoding a model
///
/// The decoder variants carry messages meant to be shown to the uploader as-is.
#[derive(Error, Debug)]
pub enum Error {
    /// Buffer is shorter than header + triangle count
    #[error("File is too small to be a valid STL file (minimum 84 bytes)")]
    TooSmall { len: usize },

    /// Declared triangle count is above the configured cap
    #[error(
        "File contains too many triangles ({}). Maximum supported: {}",
        thousands(.count),
        thousands(.max)
    )]
    TooManyTriangles { count: u32, max: u32 },

    /// Declared triangle count disagrees with the buffer length
    #[error("File size does not match STL format specification. The file may be corrupted.")]
    SizeMismatch { expected: u64, actual: u64 },

    /// Structurally valid file with no triangles
    #[error("The STL file contains no triangles, so no dimensions can be measured")]
    EmptyMesh,

    /// Record data could not be read or holds unusable values
    #[error("Corrupt STL data: {0}")]
    CorruptData(String),

    /// Upload with an extension the storefront does not accept
    #[error("Unsupported file type: .{extension}. Supported: STL, OBJ, 3MF")]
    UnsupportedFormat { extension: String },

    /// Upload larger than the configured cap
    #[error(
        "File is too large ({} bytes). Maximum supported: {} bytes",
        thousands(.size),
        thousands(.max)
    )]
    FileTooLarge { size: u64, max: u64 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptData(message.into())
    }

    /// Whether this failure comes from inspecting the model's bytes
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::TooSmall { .. }
                | Self::TooManyTriangles { .. }
                | Self::SizeMismatch { .. }
                | Self::EmptyMesh
                | Self::CorruptData(_)
        )
    }

    /// Text to display next to the cleared preview
    ///
    /// Decoder and upload failures are specific enough to show verbatim;
    /// anything else collapses to [`GENERIC_LOAD_FAILURE`].
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(_) => GENERIC_LOAD_FAILURE.to_string(),
            other => other.to_string(),
        }
    }
}

fn thousands<T: Copy + Into<u64>>(value: &T) -> String {
    group_thousands((*value).into())
}

/// Format an integer with comma thousands separators (`10000000` -> `10,000,000`)
pub(crate) fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
