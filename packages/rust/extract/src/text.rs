//! Plain text files.

use async_trait::async_trait;

use answerfill_shared::{ExtractionError, SourceKind};

use crate::Extractor;

/// Reads a whole file as UTF-8.
#[derive(Debug, Clone, Default)]
pub struct TextFileExtractor;

#[async_trait]
impl Extractor for TextFileExtractor {
    fn kind(&self) -> SourceKind {
        SourceKind::TextFile
    }

    async fn extract(&self, locator: &str) -> Result<String, ExtractionError> {
        let bytes = tokio::fs::read(locator)
            .await
            .map_err(|e| ExtractionError::from_io(locator, e))?;

        String::from_utf8(bytes)
            .map_err(|e| ExtractionError::decode(locator, format!("invalid UTF-8: {e}")))
    }
}
