//! Image OCR via tesseract.

use std::path::Path;

use async_trait::async_trait;
use rusty_tesseract::{Args, Image};
use tracing::debug;

use answerfill_shared::{ExtractionError, SourceKind};

use crate::{Extractor, run_blocking};

/// Decodes an image file and returns the text tesseract recognizes in it.
#[derive(Debug, Clone, Default)]
pub struct ImageExtractor;

impl ImageExtractor {
    /// Decode and OCR synchronously (called within spawn_blocking).
    fn extract_sync(locator: &str) -> Result<String, ExtractionError> {
        let path = Path::new(locator);
        let decoded = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(io) => ExtractionError::from_io(path, io),
            other => ExtractionError::decode(locator, format!("failed to decode image: {other}")),
        })?;
        debug!(locator, width = decoded.width(), height = decoded.height(), "image decoded");

        let tess_image = Image::from_path(path)
            .map_err(|e| ExtractionError::decode(locator, format!("failed to load image: {e}")))?;

        let text = rusty_tesseract::image_to_string(&tess_image, &Args::default())
            .map_err(|e| ExtractionError::decode(locator, format!("OCR failed: {e}")))?;

        debug!(locator, chars = text.len(), "image OCR complete");
        Ok(text)
    }
}

#[async_trait]
impl Extractor for ImageExtractor {
    fn kind(&self) -> SourceKind {
        SourceKind::Image
    }

    async fn extract(&self, locator: &str) -> Result<String, ExtractionError> {
        let owned = locator.to_string();
        run_blocking(locator, move || Self::extract_sync(&owned)).await
    }
}
