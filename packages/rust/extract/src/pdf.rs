//! PDF text extraction using lopdf.

use async_trait::async_trait;
use tracing::{debug, warn};

use answerfill_shared::{ExtractionError, SourceKind};

use crate::{Extractor, run_blocking};

/// Extracts text page by page; an unreadable page contributes an empty page.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Extract text synchronously (called within spawn_blocking).
    fn extract_sync(bytes: &[u8], locator: &str) -> Result<String, ExtractionError> {
        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| ExtractionError::decode(locator, format!("failed to open PDF: {e}")))?;

        let pages = doc.get_pages();
        let mut texts = Vec::with_capacity(pages.len());

        for page_number in pages.keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(text) => texts.push(text.trim_end().to_string()),
                Err(e) => {
                    warn!(locator, page = page_number, error = %e, "skipping unreadable PDF page");
                    texts.push(String::new());
                }
            }
        }

        debug!(locator, pages = texts.len(), "PDF extracted");
        Ok(texts.join("\n"))
    }
}

#[async_trait]
impl Extractor for PdfExtractor {
    fn kind(&self) -> SourceKind {
        SourceKind::Pdf
    }

    async fn extract(&self, locator: &str) -> Result<String, ExtractionError> {
        let bytes = tokio::fs::read(locator)
            .await
            .map_err(|e| ExtractionError::from_io(locator, e))?;

        let owned = locator.to_string();
        run_blocking(locator, move || Self::extract_sync(&bytes, &owned)).await
    }
}
