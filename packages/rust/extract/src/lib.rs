//! answerfill-extract: turn typed sources into plain text.
//!
//! Provides one [`Extractor`] per [`SourceKind`], gathered in an
//! [`ExtractorRegistry`] and driven by the [`ContentExtractionService`].
//! Backends that may be missing at runtime are feature-gated and probed
//! once at startup through [`Capabilities`].
//!
//! # Features
//!
//! - `web` (default) - HTTP fetch and HTML-to-text via reqwest + scraper
//! - `pdf` (default) - per-page PDF text via lopdf
//! - `docx` (default) - paragraph text via docx-rs
//! - `ocr` - image OCR via tesseract (requires the `tesseract` binary)
//! - `full` - all of the above

pub mod capabilities;
pub mod registry;
pub mod resolver;
pub mod service;

mod text;

#[cfg(feature = "web")]
mod web;

#[cfg(feature = "pdf")]
mod pdf;

#[cfg(feature = "docx")]
mod docx;

#[cfg(feature = "ocr")]
mod ocr;

pub use capabilities::{Capabilities, CapabilityReport, SupportedFormats};
pub use registry::{ExtractorRegistry, UnavailableExtractor};
pub use resolver::{infer_kind, resolve, resolve_entry};
pub use service::ContentExtractionService;
pub use text::TextFileExtractor;

#[cfg(feature = "web")]
pub use web::{WebExtractor, html_to_text};

#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;

#[cfg(feature = "docx")]
pub use docx::DocxExtractor;

#[cfg(feature = "ocr")]
pub use ocr::ImageExtractor;

use answerfill_shared::{ExtractionError, SourceKind};
use async_trait::async_trait;

/// A backend that reads one kind of source.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// The kind of source this extractor handles.
    fn kind(&self) -> SourceKind;

    /// Whether the backend can run in this process.
    fn available(&self) -> bool {
        true
    }

    /// Read `locator` (a filesystem path or URL) and return its text.
    async fn extract(&self, locator: &str) -> Result<String, ExtractionError>;
}

/// Run a blocking backend off the async runtime.
#[cfg(any(feature = "pdf", feature = "docx", feature = "ocr"))]
pub(crate) async fn run_blocking<F>(locator: &str, f: F) -> Result<String, ExtractionError>
where
    F: FnOnce() -> Result<String, ExtractionError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ExtractionError::decode(locator, format!("extraction task failed: {e}")))?
}
