//! Section-delimited Markdown: answer parsing and question-template filling.
//!
//! Both documents share one convention: sections are separated by lines
//! containing only `---`. Answer sections carry a `## A<n>.` heading; question
//! sections carry a `## Q<n>.` heading and a placeholder sentinel.

mod answers;
mod sections;
mod template;

pub use answers::{AnswerParser, parse_answers};
pub use sections::{SECTION_JOINER, SEPARATOR, is_separator, non_empty_sections, split_sections};
pub use template::{FillOutcome, Section, TemplateDocument, TemplateFiller, fill};

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use answerfill_shared::AnswerMap;

    fn fixture_path(name: &str) -> std::path::PathBuf {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(name)
    }

    fn load_fixture(name: &str) -> String {
        fs::read_to_string(fixture_path(name))
            .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
    }

    #[test]
    fn fixture_answers_fill_fixture_questions() {
        let answers = parse_answers(&load_fixture("md/answers.md"));
        assert_eq!(answers.len(), 3);
        assert!(answers["Q1"].contains("parameterized queries"));

        let outcome = TemplateFiller::default().fill(&load_fixture("md/questions.md"), &answers);
        assert_eq!(outcome.filled, vec!["Q1", "Q2", "Q3"]);
        assert_eq!(outcome.unresolved, vec!["Q4"]);
        assert!(outcome.text.starts_with("# Secure Coding Questionnaire"));
        assert!(outcome.text.contains("parameterized queries"));
        assert_eq!(outcome.text.matches("<!-- TO BE FILLED -->").count(), 1);
    }

    #[test]
    fn filling_twice_is_idempotent() {
        let mut answers = parse_answers(&load_fixture("md/answers.md"));
        answers.extend(parse_answers(&load_fixture("md/answers-override.md")));
        answers.insert("Q4".into(), "Dependencies are audited weekly.".into());

        let once = fill(&load_fixture("md/questions.md"), &answers);
        assert!(!once.contains("<!-- TO BE FILLED -->"));
        assert!(once.contains("Only TLS 1.3 is accepted."));

        let twice = fill(&once, &answers);
        assert_eq!(once, twice);
    }

    #[test]
    fn partially_filled_template_is_stable_on_refill() {
        let answers = parse_answers(&load_fixture("md/answers.md"));
        let once = fill(&load_fixture("md/questions.md"), &answers);
        assert_eq!(fill(&once, &answers), once);
    }

    #[test]
    fn no_answers_keeps_headings_and_sentinels() {
        let template = load_fixture("md/questions.md");
        let out = fill(&template, &AnswerMap::new());
        for key in ["Q1", "Q2", "Q3", "Q4"] {
            assert!(out.contains(&format!("## {key}.")));
        }
        assert_eq!(
            out.matches("<!-- TO BE FILLED -->").count(),
            template.matches("<!-- TO BE FILLED -->").count()
        );
    }
}
