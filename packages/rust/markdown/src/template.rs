//! Question templates: sections with `## Q<n>.` headings and a placeholder.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use answerfill_shared::{AnswerMap, DEFAULT_PLACEHOLDER, MarkdownConfig};

use crate::sections::{SECTION_JOINER, non_empty_sections};

static QUESTION_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*##\s+Q(\d+)\.").expect("valid regex"));

// ---------------------------------------------------------------------------
// Document model
// ---------------------------------------------------------------------------

/// One trimmed section of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    /// Passed through verbatim.
    Plain(String),
    /// Has a question heading and still contains the placeholder.
    Question { key: String, text: String },
}

/// A template split into ordered sections.
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    sections: Vec<Section>,
    placeholder: String,
}

/// Result of filling a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillOutcome {
    /// The reassembled document.
    pub text: String,
    /// Question keys whose placeholder was replaced, in document order.
    pub filled: Vec<String>,
    /// Question keys left with their placeholder, in document order.
    pub unresolved: Vec<String>,
}

impl TemplateDocument {
    /// Split `text` into sections, classifying those that still await an answer.
    pub fn parse(text: &str, placeholder: &str) -> Self {
        let sections = non_empty_sections(text)
            .into_iter()
            .map(|section| {
                let key = QUESTION_HEADING_RE
                    .captures(section)
                    .filter(|_| section.contains(placeholder))
                    .map(|caps| format!("Q{}", &caps[1]));
                match key {
                    Some(key) => Section::Question {
                        key,
                        text: section.to_string(),
                    },
                    None => Section::Plain(section.to_string()),
                }
            })
            .collect();

        Self {
            sections,
            placeholder: placeholder.to_string(),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Keys of the sections still awaiting an answer.
    pub fn question_keys(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter_map(|s| match s {
                Section::Question { key, .. } => Some(key.as_str()),
                Section::Plain(_) => None,
            })
            .collect()
    }

    /// Replace the first placeholder of each answered question and rejoin.
    pub fn fill(&self, answers: &AnswerMap) -> FillOutcome {
        let mut filled = Vec::new();
        let mut unresolved = Vec::new();

        let parts: Vec<String> = self
            .sections
            .iter()
            .map(|section| match section {
                Section::Question { key, text } => match answers.get(key) {
                    Some(answer) => {
                        filled.push(key.clone());
                        text.replacen(&self.placeholder, answer, 1)
                    }
                    None => {
                        unresolved.push(key.clone());
                        text.clone()
                    }
                },
                Section::Plain(text) => text.clone(),
            })
            .collect();

        FillOutcome {
            text: parts.join(SECTION_JOINER),
            filled,
            unresolved,
        }
    }
}

// ---------------------------------------------------------------------------
// Filler
// ---------------------------------------------------------------------------

/// Fills templates using a fixed placeholder sentinel.
#[derive(Debug, Clone)]
pub struct TemplateFiller {
    placeholder: String,
}

impl Default for TemplateFiller {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER)
    }
}

impl TemplateFiller {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }

    pub fn from_config(config: &MarkdownConfig) -> Self {
        Self::new(config.placeholder.clone())
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Fill `template` from `answers`.
    #[instrument(skip_all, fields(answers = answers.len()))]
    pub fn fill(&self, template: &str, answers: &AnswerMap) -> FillOutcome {
        let doc = TemplateDocument::parse(template, &self.placeholder);
        let outcome = doc.fill(answers);
        debug!(
            sections = doc.sections().len(),
            filled = outcome.filled.len(),
            unresolved = outcome.unresolved.len(),
            "template filled"
        );
        outcome
    }
}

/// Fill `template` with the default placeholder, returning only the text.
pub fn fill(template: &str, answers: &AnswerMap) -> String {
    TemplateFiller::default().fill(template, answers).text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(pairs: &[(&str, &str)]) -> AnswerMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn replaces_placeholder_in_single_section() {
        let out = fill("## Q1.\nfoo\n<!-- TO BE FILLED -->\n", &answers(&[("Q1", "bar")]));
        assert_eq!(out, "## Q1.\nfoo\nbar");
    }

    #[test]
    fn unmatched_sections_keep_placeholder() {
        let template = "## Q1. a\n<!-- TO BE FILLED -->\n---\n## Q2. b\n<!-- TO BE FILLED -->";
        let outcome = TemplateFiller::default().fill(template, &answers(&[("Q2", "two")]));
        assert_eq!(
            outcome.text,
            "## Q1. a\n<!-- TO BE FILLED -->\n\n---\n\n## Q2. b\ntwo"
        );
        assert_eq!(outcome.filled, vec!["Q2"]);
        assert_eq!(outcome.unresolved, vec!["Q1"]);
    }

    #[test]
    fn only_first_placeholder_is_replaced() {
        let template = "## Q3. x\n<!-- TO BE FILLED -->\n<!-- TO BE FILLED -->";
        let out = fill(template, &answers(&[("Q3", "ans")]));
        assert_eq!(out, "## Q3. x\nans\n<!-- TO BE FILLED -->");
    }

    #[test]
    fn answer_is_inserted_verbatim() {
        let body = "line one\n\n  - $1 and \\d+ stay literal";
        let out = fill("## Q1. x\n<!-- TO BE FILLED -->", &answers(&[("Q1", body)]));
        assert_eq!(out, format!("## Q1. x\n{body}"));
    }

    #[test]
    fn plain_sections_pass_through_and_spacing_is_normalized() {
        let template = "# Title\n\nintro\n\n\n---\n\n\n\n## Q1. x\n<!-- TO BE FILLED -->\n---\n\n";
        let doc = TemplateDocument::parse(template, DEFAULT_PLACEHOLDER);
        assert_eq!(doc.sections().len(), 2);
        assert_eq!(doc.sections()[0], Section::Plain("# Title\n\nintro".into()));
        assert_eq!(doc.question_keys(), vec!["Q1"]);

        let outcome = doc.fill(&answers(&[("Q1", "y")]));
        assert_eq!(outcome.text, "# Title\n\nintro\n\n---\n\n## Q1. x\ny");
    }

    #[test]
    fn heading_without_placeholder_is_plain() {
        let doc = TemplateDocument::parse("## Q1. already answered\nyes", DEFAULT_PLACEHOLDER);
        assert!(doc.question_keys().is_empty());
        assert!(matches!(doc.sections()[0], Section::Plain(_)));
    }

    #[test]
    fn custom_placeholder() {
        let filler = TemplateFiller::new("[[ANSWER]]");
        let outcome = filler.fill("## Q4. x\n[[ANSWER]]", &answers(&[("Q4", "done")]));
        assert_eq!(outcome.text, "## Q4. x\ndone");
        assert_eq!(filler.placeholder(), "[[ANSWER]]");
    }

    #[test]
    fn empty_template_fills_to_empty() {
        let outcome = TemplateFiller::default().fill("", &answers(&[("Q1", "x")]));
        assert_eq!(outcome.text, "");
        assert!(outcome.filled.is_empty());
    }
}
