//! Dispatch a resolved source to its extractor.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use answerfill_shared::{
    AppConfig, ExtractionError, ExtractionResult, Result, SourceKind, SourceSpec,
};

use crate::capabilities::Capabilities;
use crate::registry::ExtractorRegistry;

/// Turns [`SourceSpec`]s into text. Never panics on bad input; every
/// failure comes back as an [`ExtractionError`].
pub struct ContentExtractionService {
    registry: ExtractorRegistry,
    data_dir: Option<PathBuf>,
}

impl ContentExtractionService {
    /// Wrap an existing registry. Relative paths are used as given.
    pub fn new(registry: ExtractorRegistry) -> Self {
        Self {
            registry,
            data_dir: None,
        }
    }

    /// Detect capabilities and build the registry from application config.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let capabilities = Capabilities::detect(&config.capabilities);
        let registry = ExtractorRegistry::new(capabilities, &config.extraction)?;
        Ok(Self::new(registry).with_data_dir(&config.defaults.data_dir))
    }

    /// Resolve relative file locators against `dir`.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    /// The concrete path or URL an extractor will read for `spec`.
    pub fn target(&self, spec: &SourceSpec) -> String {
        if spec.kind == SourceKind::Url {
            return spec.locator.clone();
        }
        let path = Path::new(&spec.locator);
        match &self.data_dir {
            Some(dir) if path.is_relative() => dir.join(path).to_string_lossy().into_owned(),
            _ => spec.locator.clone(),
        }
    }

    /// Extract the text of one source.
    #[instrument(skip_all, fields(kind = %spec.kind, locator = %spec.locator))]
    pub async fn extract(&self, spec: &SourceSpec) -> std::result::Result<String, ExtractionError> {
        let target = self.target(spec);
        let extractor = self.registry.get(spec.kind);

        match extractor.extract(&target).await {
            Ok(text) => {
                debug!(chars = text.len(), "extraction succeeded");
                Ok(text)
            }
            Err(e) => {
                warn!(error = %e, kind = ?e.kind(), "extraction failed");
                Err(e)
            }
        }
    }

    /// Extract one source and wrap the outcome with its spec.
    pub async fn extract_result(&self, spec: SourceSpec) -> ExtractionResult {
        match self.extract(&spec).await {
            Ok(content) => ExtractionResult::Extracted {
                source: spec,
                content,
            },
            Err(error) => ExtractionResult::Failed {
                source: spec,
                error,
            },
        }
    }
}
