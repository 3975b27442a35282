//! One extractor per source kind, chosen from the detected capabilities.

use std::sync::Arc;

use async_trait::async_trait;

use answerfill_shared::{ExtractionConfig, ExtractionError, Result, SourceKind};

use crate::capabilities::{Capabilities, CapabilityReport};
use crate::{Extractor, TextFileExtractor};

/// Stand-in for a backend that cannot run; every call fails with
/// [`ExtractionError::CapabilityUnavailable`].
#[derive(Debug, Clone)]
pub struct UnavailableExtractor {
    kind: SourceKind,
    hint: String,
}

impl UnavailableExtractor {
    pub fn new(kind: SourceKind, hint: impl Into<String>) -> Self {
        Self {
            kind,
            hint: hint.into(),
        }
    }
}

#[async_trait]
impl Extractor for UnavailableExtractor {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn available(&self) -> bool {
        false
    }

    async fn extract(&self, _locator: &str) -> std::result::Result<String, ExtractionError> {
        Err(ExtractionError::unavailable(self.kind, self.hint.clone()))
    }
}

/// Holds exactly one extractor for every [`SourceKind`].
pub struct ExtractorRegistry {
    capabilities: Capabilities,
    text: Arc<dyn Extractor>,
    url: Arc<dyn Extractor>,
    image: Arc<dyn Extractor>,
    pdf: Arc<dyn Extractor>,
    docx: Arc<dyn Extractor>,
}

impl ExtractorRegistry {
    /// Register a real backend for every available kind and an
    /// [`UnavailableExtractor`] for the rest.
    pub fn new(capabilities: Capabilities, config: &ExtractionConfig) -> Result<Self> {
        let unavailable = |kind: SourceKind| -> Arc<dyn Extractor> {
            Arc::new(UnavailableExtractor::new(kind, capabilities.install_hint(kind)))
        };

        #[cfg(feature = "web")]
        let url = if capabilities.web {
            Arc::new(crate::WebExtractor::new(config)?) as Arc<dyn Extractor>
        } else {
            unavailable(SourceKind::Url)
        };
        #[cfg(not(feature = "web"))]
        let url = {
            let _ = config;
            unavailable(SourceKind::Url)
        };

        #[cfg(feature = "ocr")]
        let image = if capabilities.ocr {
            Arc::new(crate::ImageExtractor) as Arc<dyn Extractor>
        } else {
            unavailable(SourceKind::Image)
        };
        #[cfg(not(feature = "ocr"))]
        let image = unavailable(SourceKind::Image);

        #[cfg(feature = "pdf")]
        let pdf = if capabilities.pdf {
            Arc::new(crate::PdfExtractor) as Arc<dyn Extractor>
        } else {
            unavailable(SourceKind::Pdf)
        };
        #[cfg(not(feature = "pdf"))]
        let pdf = unavailable(SourceKind::Pdf);

        #[cfg(feature = "docx")]
        let docx = if capabilities.docx {
            Arc::new(crate::DocxExtractor) as Arc<dyn Extractor>
        } else {
            unavailable(SourceKind::Docx)
        };
        #[cfg(not(feature = "docx"))]
        let docx = unavailable(SourceKind::Docx);

        Ok(Self {
            capabilities,
            text: Arc::new(TextFileExtractor),
            url,
            image,
            pdf,
            docx,
        })
    }

    /// The extractor registered for `kind`.
    pub fn get(&self, kind: SourceKind) -> Arc<dyn Extractor> {
        match kind {
            SourceKind::TextFile => self.text.clone(),
            SourceKind::Url => self.url.clone(),
            SourceKind::Image => self.image.clone(),
            SourceKind::Pdf => self.pdf.clone(),
            SourceKind::Docx => self.docx.clone(),
        }
    }

    /// Kinds with a working backend, in registry order.
    pub fn available_kinds(&self) -> Vec<SourceKind> {
        SourceKind::ALL
            .into_iter()
            .filter(|k| self.get(*k).available())
            .collect()
    }

    /// Capability report for the set this registry was built from.
    pub fn report(&self) -> CapabilityReport {
        self.capabilities.report()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use answerfill_shared::ErrorKind;

    #[tokio::test]
    async fn unavailable_kinds_fail_with_capability_error() {
        let registry = ExtractorRegistry::new(Capabilities::none(), &ExtractionConfig::default())
            .unwrap();

        for kind in [SourceKind::Url, SourceKind::Image, SourceKind::Pdf, SourceKind::Docx] {
            let extractor = registry.get(kind);
            assert_eq!(extractor.kind(), kind);
            assert!(!extractor.available());
            let err = extractor.extract("anything").await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::CapabilityUnavailable);
            assert!(!err.is_retryable());
        }

        assert_eq!(registry.available_kinds(), vec![SourceKind::TextFile]);
    }

    #[test]
    fn report_agrees_with_registered_extractors() {
        let caps = Capabilities {
            web: cfg!(feature = "web"),
            ocr: false,
            pdf: false,
            docx: cfg!(feature = "docx"),
        };
        let registry = ExtractorRegistry::new(caps, &ExtractionConfig::default()).unwrap();
        let report = registry.report();

        assert!(!report.pdf);
        assert!(!report.ocr);
        for kind in SourceKind::ALL {
            assert_eq!(
                report.unavailable.contains_key(kind.as_str()),
                !registry.get(kind).available(),
                "{kind}"
            );
        }
    }

    #[test]
    fn every_kind_has_an_extractor_of_that_kind() {
        let caps = Capabilities {
            web: cfg!(feature = "web"),
            ocr: false,
            pdf: cfg!(feature = "pdf"),
            docx: cfg!(feature = "docx"),
        };
        let registry = ExtractorRegistry::new(caps, &ExtractionConfig::default()).unwrap();
        for kind in SourceKind::ALL {
            assert_eq!(registry.get(kind).kind(), kind);
            assert_eq!(registry.get(kind).available(), caps.is_available(kind));
        }
    }
}
