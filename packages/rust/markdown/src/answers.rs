//! Parsing `## A<n>.` answer sections into an [`AnswerMap`].

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use answerfill_shared::{AnswerMap, DEFAULT_HEADER_BANNER, MarkdownConfig};

use crate::sections::non_empty_sections;

/// `## A12.` with optional indentation and any run of spaces after `##`.
static ANSWER_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*##\s+A(\d+)\.").expect("valid regex"));

/// Extracts answer bodies keyed by the question they answer (`A3` → `Q3`).
#[derive(Debug, Clone)]
pub struct AnswerParser {
    header_banner: Option<String>,
}

impl Default for AnswerParser {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_BANNER)
    }
}

impl AnswerParser {
    /// Skip any section containing `header_banner`.
    pub fn new(header_banner: impl Into<String>) -> Self {
        let banner = header_banner.into();
        Self {
            header_banner: (!banner.is_empty()).then_some(banner),
        }
    }

    /// Parse every section, including document headers.
    pub fn without_banner() -> Self {
        Self {
            header_banner: None,
        }
    }

    pub fn from_config(config: &MarkdownConfig) -> Self {
        Self::new(config.header_banner.clone())
    }

    /// Build the answer map for `text`. Later sections overwrite earlier ones.
    #[instrument(skip_all, fields(chars = text.len()))]
    pub fn parse(&self, text: &str) -> AnswerMap {
        let mut answers = AnswerMap::new();
        let mut skipped = 0usize;

        for section in non_empty_sections(text) {
            if self.is_header(section) {
                continue;
            }
            match parse_section(section) {
                Some((key, body)) => {
                    if answers.insert(key.clone(), body).is_some() {
                        debug!(%key, "answer overridden by later section");
                    }
                }
                None => skipped += 1,
            }
        }

        debug!(answers = answers.len(), skipped, "answer document parsed");
        answers
    }

    fn is_header(&self, section: &str) -> bool {
        self.header_banner
            .as_deref()
            .is_some_and(|banner| section.contains(banner))
    }
}

/// Parse one answer document with the default header banner.
pub fn parse_answers(text: &str) -> AnswerMap {
    AnswerParser::default().parse(text)
}

/// Key and body of one section, or `None` when it has no answer heading.
///
/// The body is every line after the heading with leading and trailing
/// blank lines removed.
fn parse_section(section: &str) -> Option<(String, String)> {
    let lines: Vec<&str> = section.lines().collect();
    let (heading_idx, digits) = lines.iter().enumerate().find_map(|(i, line)| {
        ANSWER_HEADING_RE
            .captures(line)
            .map(|caps| (i, caps[1].to_string()))
    })?;

    let rest = &lines[heading_idx + 1..];
    let first = rest.iter().position(|l| !l.trim().is_empty());
    let last = rest.iter().rposition(|l| !l.trim().is_empty());
    let body = match (first, last) {
        (Some(first), Some(last)) => rest[first..=last].join("\n"),
        _ => String::new(),
    };

    Some((format!("Q{digits}"), body))
}
