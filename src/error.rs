//! Error types for the site2brochure library.
//!
//! A single fatal error type, [`BrochureError`], is returned from every
//! fallible entry point. Variants are grouped by the coarse [`ErrorKind`] the
//! calling shell maps to a user-facing message or HTTP status:
//!
//! * [`ErrorKind::Input`]: the source could not be read or parsed
//!   (missing file, unreadable bytes, unknown image format). Never retried.
//! * [`ErrorKind::EmptyContent`]: extraction produced zero usable blocks
//!   after every fallback. Never retried.
//! * [`ErrorKind::UnsupportedInputKind`]: the caller asked for an input type
//!   the pipeline does not know. A programming error.
//!
//! Everything downstream of extraction is deterministic and total, so the
//! remaining kinds only cover configuration, output writing and the rare
//! internal failure (a panicked render task, an encoder refusing a buffer).

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the site2brochure library.
#[derive(Debug, Error)]
pub enum BrochureError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but could not be read.
    #[error("Failed to read '{path}': {detail}")]
    Unreadable { path: PathBuf, detail: String },

    /// The image format string is not one the pipeline can read.
    #[error("Unsupported image format '{format}' (expected png or jpeg)")]
    UnsupportedImageFormat { format: String },

    /// Image bytes could not be understood, not even the header.
    #[error("Image could not be read: {detail}")]
    InvalidImage { detail: String },

    // ── Content errors ────────────────────────────────────────────────────
    /// Extraction yielded no usable content blocks after all fallbacks.
    #[error("No usable content found in {input} input")]
    EmptyContent { input: String },

    // ── Caller errors ─────────────────────────────────────────────────────
    /// The caller passed an input type the pipeline doesn't recognise.
    #[error("Unsupported input kind '{kind}' (expected one of: html, image, text)")]
    UnsupportedInputKind { kind: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or config-file validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Stage errors ──────────────────────────────────────────────────────
    /// A pluggable profiler implementation reported a failure.
    #[error("Profiler '{profiler}' failed: {detail}")]
    ProfilerFailed { profiler: String, detail: String },

    /// The background image could not be encoded.
    #[error("Failed to encode {audience} background: {detail}")]
    ImageEncodeFailed { audience: String, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`BrochureError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Input,
    EmptyContent,
    UnsupportedInputKind,
    Config,
    Output,
    Internal,
}

impl BrochureError {
    /// Classify this error for the calling shell.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BrochureError::FileNotFound { .. }
            | BrochureError::PermissionDenied { .. }
            | BrochureError::Unreadable { .. }
            | BrochureError::UnsupportedImageFormat { .. }
            | BrochureError::InvalidImage { .. } => ErrorKind::Input,
            BrochureError::EmptyContent { .. } => ErrorKind::EmptyContent,
            BrochureError::UnsupportedInputKind { .. } => ErrorKind::UnsupportedInputKind,
            BrochureError::InvalidConfig(_) => ErrorKind::Config,
            BrochureError::OutputWriteFailed { .. } => ErrorKind::Output,
            BrochureError::ProfilerFailed { .. }
            | BrochureError::ImageEncodeFailed { .. }
            | BrochureError::Internal(_) => ErrorKind::Internal,
        }
    }
}
