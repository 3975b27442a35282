//! Error types for answerfill.
//!
//! Library crates use [`AnswerFillError`] and [`ExtractionError`] via `thiserror`.
//! The CLI wraps these with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

use serde::Serialize;

use crate::types::SourceKind;

/// Top-level error type for fatal answerfill operations.
#[derive(Debug, thiserror::Error)]
pub enum AnswerFillError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// HTTP client construction error.
    #[error("network error: {0}")]
    Network(String),

    /// Filesystem I/O error (template, output, config).
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (malformed sources file, bad kind name, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A single-source extraction failure surfaced as fatal by the caller.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AnswerFillError>;

impl AnswerFillError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// ExtractionError
// ---------------------------------------------------------------------------

/// Failure to turn one source into text.
///
/// These never abort a batch; the orchestrator downgrades them to a
/// per-source status.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The backend for this kind is not compiled in, disabled, or not installed.
    #[error("{kind} extraction not available: {hint}")]
    CapabilityUnavailable { kind: SourceKind, hint: String },

    /// The source path does not exist.
    #[error("source not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Network or HTTP failure.
    #[error("fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    /// The content could not be decoded (bad encoding, corrupt file).
    #[error("could not decode {locator}: {message}")]
    Decode { locator: String, message: String },

    /// Any other filesystem failure while reading a source.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Machine-readable classification of an [`ExtractionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    CapabilityUnavailable,
    NotFound,
    FetchError,
    DecodeError,
    Io,
}

impl ExtractionError {
    /// Create a capability error for the given kind.
    pub fn unavailable(kind: SourceKind, hint: impl Into<String>) -> Self {
        Self::CapabilityUnavailable {
            kind,
            hint: hint.into(),
        }
    }

    /// Create a fetch error for the given URL.
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a decode error for the given locator.
    pub fn decode(locator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            locator: locator.into(),
            message: message.into(),
        }
    }

    /// Map a filesystem error, turning `NotFound` into its own variant.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// The classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CapabilityUnavailable { .. } => ErrorKind::CapabilityUnavailable,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Fetch { .. } => ErrorKind::FetchError,
            Self::Decode { .. } => ErrorKind::DecodeError,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Whether retrying the same source may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}
