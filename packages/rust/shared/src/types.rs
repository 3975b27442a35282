//! Core domain types for answer extraction and template filling.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{AnswerFillError, ExtractionError, Result};

/// Literal marker for an unfilled answer slot in a question template.
pub const DEFAULT_PLACEHOLDER: &str = "<!-- TO BE FILLED -->";

/// Banner text identifying the header section of an answer document.
pub const DEFAULT_HEADER_BANNER: &str = "# Secure Coding";

/// Question key (`Q<digits>`) → answer body.
pub type AnswerMap = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// SourceKind
// ---------------------------------------------------------------------------

/// The content kind of a source, which selects its extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Plain text read from disk as UTF-8.
    #[serde(rename = "file", alias = "text", alias = "text-file")]
    TextFile,
    /// Web page fetched over HTTP.
    Url,
    /// Image run through OCR.
    Image,
    /// PDF document.
    Pdf,
    /// Word document.
    Docx,
}

impl SourceKind {
    /// All kinds, in registry order.
    pub const ALL: [SourceKind; 5] = [
        SourceKind::TextFile,
        SourceKind::Url,
        SourceKind::Image,
        SourceKind::Pdf,
        SourceKind::Docx,
    ];

    /// Canonical name, as accepted in sources files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::TextFile => "file",
            SourceKind::Url => "url",
            SourceKind::Image => "image",
            SourceKind::Pdf => "pdf",
            SourceKind::Docx => "docx",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = AnswerFillError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "text" | "text-file" => Ok(SourceKind::TextFile),
            "url" => Ok(SourceKind::Url),
            "image" => Ok(SourceKind::Image),
            "pdf" => Ok(SourceKind::Pdf),
            "docx" => Ok(SourceKind::Docx),
            other => Err(AnswerFillError::validation(format!(
                "unknown source type '{other}': expected file, url, image, pdf, or docx"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// SourceSpec
// ---------------------------------------------------------------------------

/// A resolved source: what to read and which extractor reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSpec {
    /// Extractor selector.
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// File path or URL.
    pub locator: String,
    /// Optional free-form query carried along with the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl SourceSpec {
    /// Build a source with an already-known kind.
    pub fn new(kind: SourceKind, locator: impl Into<String>) -> Self {
        Self {
            kind,
            locator: locator.into(),
            query: None,
        }
    }

    /// Attach a query.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.locator, self.kind)
    }
}

// ---------------------------------------------------------------------------
// SourceEntry / SourceList (sources file)
// ---------------------------------------------------------------------------

/// One entry of a sources file: a bare locator or a typed object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceEntry {
    /// Locator whose kind is inferred from its scheme or suffix.
    Locator(String),
    /// Locator with an optional explicit kind and query.
    Typed {
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        kind: Option<SourceKind>,
        #[serde(alias = "source")]
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<String>,
    },
}

impl SourceEntry {
    /// The raw locator of this entry.
    pub fn locator(&self) -> &str {
        match self {
            SourceEntry::Locator(locator) => locator,
            SourceEntry::Typed { path, .. } => path,
        }
    }
}

impl From<&str> for SourceEntry {
    fn from(locator: &str) -> Self {
        SourceEntry::Locator(locator.to_string())
    }
}

/// Root structure of a JSON sources file: `{"sources": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceList {
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
}

impl SourceList {
    /// Parse a sources list from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| AnswerFillError::validation(format!("invalid sources file: {e}")))
    }

    /// Load a sources list from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| AnswerFillError::io(path, e))?;
        Self::from_json(&content)
    }
}

// ---------------------------------------------------------------------------
// ExtractionResult
// ---------------------------------------------------------------------------

/// Outcome of extracting one source: text or a typed failure, never both.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionResult {
    /// Extraction produced text.
    #[serde(rename = "success")]
    Extracted { source: SourceSpec, content: String },
    /// Extraction failed.
    Failed {
        source: SourceSpec,
        #[serde(serialize_with = "serialize_display")]
        error: ExtractionError,
    },
}

impl ExtractionResult {
    /// The source this result belongs to.
    pub fn source(&self) -> &SourceSpec {
        match self {
            ExtractionResult::Extracted { source, .. } | ExtractionResult::Failed { source, .. } => {
                source
            }
        }
    }

    /// Convert into a plain `Result`, dropping the source.
    pub fn into_result(self) -> std::result::Result<String, ExtractionError> {
        match self {
            ExtractionResult::Extracted { content, .. } => Ok(content),
            ExtractionResult::Failed { error, .. } => Err(error),
        }
    }
}

fn serialize_display<S: Serializer>(
    value: &impl fmt::Display,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
