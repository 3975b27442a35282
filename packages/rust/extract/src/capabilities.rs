//! Runtime availability of the optional extraction backends.
//!
//! Computed once at startup by [`Capabilities::detect`] and treated as
//! read-only afterwards.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use answerfill_shared::{CapabilitiesConfig, SourceKind};

use crate::resolver::IMAGE_SUFFIXES;

/// Which optional backends can run in this process. Plain text is always available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub web: bool,
    pub ocr: bool,
    pub pdf: bool,
    pub docx: bool,
}

impl Capabilities {
    /// Probe the compiled-in backends, honouring config switches.
    pub fn detect(config: &CapabilitiesConfig) -> Self {
        let caps = Self {
            web: cfg!(feature = "web") && config.web,
            ocr: cfg!(feature = "ocr") && config.ocr && probe_tesseract(),
            pdf: cfg!(feature = "pdf") && config.pdf,
            docx: cfg!(feature = "docx") && config.docx,
        };
        debug!(
            web = caps.web,
            ocr = caps.ocr,
            pdf = caps.pdf,
            docx = caps.docx,
            "detected extraction capabilities"
        );
        caps
    }

    /// Every optional backend switched off.
    pub fn none() -> Self {
        Self {
            web: false,
            ocr: false,
            pdf: false,
            docx: false,
        }
    }

    /// Whether sources of `kind` can be extracted.
    pub fn is_available(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::TextFile => true,
            SourceKind::Url => self.web,
            SourceKind::Image => self.ocr,
            SourceKind::Pdf => self.pdf,
            SourceKind::Docx => self.docx,
        }
    }

    /// Explain how to enable an unavailable kind.
    pub fn install_hint(&self, kind: SourceKind) -> String {
        let (feature, compiled) = match kind {
            SourceKind::TextFile => return String::new(),
            SourceKind::Url => ("web", cfg!(feature = "web")),
            SourceKind::Image => ("ocr", cfg!(feature = "ocr")),
            SourceKind::Pdf => ("pdf", cfg!(feature = "pdf")),
            SourceKind::Docx => ("docx", cfg!(feature = "docx")),
        };
        if !compiled {
            format!("rebuild answerfill with `--features {feature}`")
        } else if kind == SourceKind::Image {
            "install tesseract-ocr and check `ocr = true` under [capabilities]".to_string()
        } else {
            format!("set `{feature} = true` under [capabilities]")
        }
    }

    /// Summary suitable for printing as JSON.
    pub fn report(&self) -> CapabilityReport {
        let unavailable = SourceKind::ALL
            .into_iter()
            .filter(|k| !self.is_available(*k))
            .map(|k| (k.as_str().to_string(), self.install_hint(k)))
            .collect();

        CapabilityReport {
            ocr: self.ocr,
            web_scraping: self.web,
            pdf: self.pdf,
            docx: self.docx,
            unavailable,
            supported_formats: SupportedFormats::default(),
        }
    }
}

/// Capability flags plus install hints and the suffixes each category accepts.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityReport {
    pub ocr: bool,
    pub web_scraping: bool,
    pub pdf: bool,
    pub docx: bool,
    /// Kind name → how to enable it.
    pub unavailable: BTreeMap<String, String>,
    pub supported_formats: SupportedFormats,
}

/// Locator suffixes and schemes grouped by category.
#[derive(Debug, Clone, Serialize)]
pub struct SupportedFormats {
    pub images: Vec<&'static str>,
    pub documents: Vec<&'static str>,
    pub text: Vec<&'static str>,
    pub web: Vec<&'static str>,
}

impl Default for SupportedFormats {
    fn default() -> Self {
        Self {
            images: IMAGE_SUFFIXES.to_vec(),
            documents: vec!["pdf", "docx"],
            text: vec!["md", "txt", "json", "csv"],
            web: vec!["http", "https"],
        }
    }
}

#[cfg(feature = "ocr")]
fn probe_tesseract() -> bool {
    match rusty_tesseract::get_tesseract_version() {
        Ok(version) => {
            debug!(version = %version.trim(), "tesseract found");
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "tesseract not available, image sources will fail");
            false
        }
    }
}

#[cfg(not(feature = "ocr"))]
fn probe_tesseract() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_always_available() {
        let caps = Capabilities::none();
        assert!(caps.is_available(SourceKind::TextFile));
        assert!(!caps.is_available(SourceKind::Pdf));
        assert!(!caps.is_available(SourceKind::Url));
    }

    #[test]
    fn config_switch_disables_compiled_backend() {
        let config = CapabilitiesConfig {
            pdf: false,
            ..CapabilitiesConfig::default()
        };
        let caps = Capabilities::detect(&config);
        assert!(!caps.pdf);
        assert_eq!(caps.docx, cfg!(feature = "docx"));
    }

    #[test]
    fn report_lists_unavailable_kinds_with_hints() {
        let report = Capabilities::none().report();
        assert!(!report.pdf);
        assert!(report.unavailable.contains_key("pdf"));
        assert!(report.unavailable.contains_key("image"));
        assert!(!report.unavailable.contains_key("file"));
        assert!(report.unavailable.values().all(|hint| !hint.is_empty()));

        let json = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(json["supported_formats"]["documents"][0], "pdf");
        assert_eq!(json["web_scraping"], false);
    }
}
