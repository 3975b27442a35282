//! Splitting documents on `---` separator lines.

/// Content of a separator line.
pub const SEPARATOR: &str = "---";

/// Text placed between sections when a document is reassembled.
pub const SECTION_JOINER: &str = "\n\n---\n\n";

/// Whether `line` is a separator (only `---`, surrounding whitespace allowed).
pub fn is_separator(line: &str) -> bool {
    line.trim() == SEPARATOR
}

/// Split `text` into the raw slices between separator lines.
///
/// Separator lines themselves are not part of any section. A document with
/// no separators is a single section.
pub fn split_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        if is_separator(line) {
            sections.push(&text[start..offset]);
            start = offset + line.len();
        }
        offset += line.len();
    }
    sections.push(&text[start..]);

    sections
}

/// Trimmed sections with empty ones dropped.
pub fn non_empty_sections(text: &str) -> Vec<&str> {
    split_sections(text)
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_separator_lines_only() {
        let text = "a\n---\nb --- still b\n  ---  \nc";
        assert_eq!(split_sections(text), vec!["a\n", "b --- still b\n", "c"]);
    }

    #[test]
    fn longer_rules_are_not_separators() {
        assert!(!is_separator("----"));
        assert!(!is_separator("- - -"));
        assert!(is_separator("---\r\n"));
        assert_eq!(split_sections("a\n----\nb").len(), 1);
    }

    #[test]
    fn no_separator_is_one_section() {
        assert_eq!(split_sections("just text"), vec!["just text"]);
        assert_eq!(split_sections(""), vec![""]);
    }

    #[test]
    fn empty_sections_are_dropped() {
        let text = "---\n\n---\n  one  \n---\n\n\n---\ntwo\n---\n";
        assert_eq!(non_empty_sections(text), vec!["one", "two"]);
    }
}
