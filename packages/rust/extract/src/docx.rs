//! DOCX text extraction using docx-rs.

use async_trait::async_trait;
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use tracing::debug;

use answerfill_shared::{ExtractionError, SourceKind};

use crate::{Extractor, run_blocking};

/// Concatenates top-level paragraph text in document order, skipping blank paragraphs.
#[derive(Debug, Clone, Default)]
pub struct DocxExtractor;

impl DocxExtractor {
    /// Extract text synchronously (called within spawn_blocking).
    fn extract_sync(bytes: &[u8], locator: &str) -> Result<String, ExtractionError> {
        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| ExtractionError::decode(locator, format!("failed to parse DOCX: {e}")))?;

        let paragraphs: Vec<String> = docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
                _ => None,
            })
            .filter(|text| !text.trim().is_empty())
            .collect();

        debug!(locator, paragraphs = paragraphs.len(), "DOCX extracted");
        Ok(paragraphs.join("\n"))
    }
}

#[async_trait]
impl Extractor for DocxExtractor {
    fn kind(&self) -> SourceKind {
        SourceKind::Docx
    }

    async fn extract(&self, locator: &str) -> Result<String, ExtractionError> {
        let bytes = tokio::fs::read(locator)
            .await
            .map_err(|e| ExtractionError::from_io(locator, e))?;

        let owned = locator.to_string();
        run_blocking(locator, move || Self::extract_sync(&bytes, &owned)).await
    }
}

/// Text of one paragraph: runs, tabs, line breaks, and hyperlink runs.
fn paragraph_text(p: &Paragraph) -> String {
    let mut text = String::new();

    for child in &p.children {
        match child {
            ParagraphChild::Run(r) => push_run(&r.children, &mut text),
            ParagraphChild::Hyperlink(h) => {
                for child in &h.children {
                    if let ParagraphChild::Run(r) = child {
                        push_run(&r.children, &mut text);
                    }
                }
            }
            _ => {}
        }
    }

    text
}

fn push_run(children: &[RunChild], text: &mut String) {
    for run_child in children {
        match run_child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use answerfill_shared::ErrorKind;
    use docx_rs::{Docx, Run};
    use uuid::Uuid;

    fn write_docx(paragraphs: &[&str]) -> std::path::PathBuf {
        let mut doc = Docx::new();
        for text in paragraphs {
            let mut p = Paragraph::new();
            if !text.is_empty() {
                p = p.add_run(Run::new().add_text(*text));
            }
            doc = doc.add_paragraph(p);
        }

        let mut buf = std::io::Cursor::new(Vec::new());
        doc.build().pack(&mut buf).unwrap();

        let dir = std::env::temp_dir().join(format!("answerfill-docx-{}", Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("answers.docx");
        std::fs::write(&path, buf.into_inner()).unwrap();
        path
    }

    #[tokio::test]
    async fn joins_paragraphs_and_skips_blank_ones() {
        let path = write_docx(&["## A1. Use TLS", "", "Always encrypt traffic."]);
        let text = DocxExtractor
            .extract(path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(text, "## A1. Use TLS\nAlways encrypt traffic.");
    }

    #[tokio::test]
    async fn malformed_archive_is_decode_error() {
        let dir = std::env::temp_dir().join(format!("answerfill-docx-{}", Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.docx");
        std::fs::write(&path, b"PK not really a zip").unwrap();

        let err = DocxExtractor
            .extract(path.to_str().unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeError);
    }
}
