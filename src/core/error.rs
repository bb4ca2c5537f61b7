//! Validation error taxonomy
//!
//! Every variant is fatal to the pack being validated. A missing manifest is
//! not represented here: the loader reports it as `Ok(None)` and the directory
//! is skipped.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("could not read manifest {}: {source}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in manifest {}: {source}", .path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest {} is missing required field `{field}`", .path.display())]
    MissingField { path: PathBuf, field: String },

    #[error("manifest {} has malformed fields: {source}", .path.display())]
    ManifestSchema {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid emoticon `{code}` -> `{file}`: {reason}")]
    InvalidCode {
        code: String,
        file: String,
        reason: String,
    },

    #[error("emoticon `{code}`: no asset found for {} (tried {tried})", .base.display())]
    FileNotFound {
        code: String,
        base: PathBuf,
        tried: String,
    },

    #[error("unsupported image format: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("malformed image header in {}: {reason}", .path.display())]
    Format { path: PathBuf, reason: String },

    #[error("{} is {width}x{height}, larger than the {max}x{max} maximum", .path.display())]
    Dimension {
        path: PathBuf,
        width: u32,
        height: u32,
        max: u32,
    },

    #[error("{} is {size} bytes, must be under {limit} bytes", .path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("extraneous file `{name}` in {}", .dir.display())]
    ExtraneousFile { dir: PathBuf, name: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ValidationError {
    /// Short rule name, used in reports and log fields.
    pub fn rule(&self) -> &'static str {
        match self {
            Self::ManifestRead { .. } | Self::ManifestParse { .. } => "manifest-parse",
            Self::MissingField { .. } => "missing-field",
            Self::ManifestSchema { .. } => "manifest-schema",
            Self::InvalidCode { .. } => "invalid-code",
            Self::FileNotFound { .. } => "file-not-found",
            Self::UnsupportedFormat { .. } => "unsupported-format",
            Self::Format { .. } => "format",
            Self::Dimension { .. } => "dimension",
            Self::FileTooLarge { .. } => "file-too-large",
            Self::ExtraneousFile { .. } => "extraneous-file",
            Self::Io { .. } => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;
