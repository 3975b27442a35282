//! Source kind resolution from locators. Pure, no I/O.

use std::path::Path;

use answerfill_shared::{SourceEntry, SourceKind, SourceSpec};

/// File suffixes routed to the OCR extractor.
pub const IMAGE_SUFFIXES: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

/// Infer the kind of a locator from its scheme or file suffix.
///
/// `http://` and `https://` (any case) are URLs; `.pdf`, `.docx` and the
/// [`IMAGE_SUFFIXES`] select their extractors; anything else is text.
pub fn infer_kind(locator: &str) -> SourceKind {
    let lower = locator.trim().to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return SourceKind::Url;
    }

    let ext = Path::new(&lower)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    match ext {
        "pdf" => SourceKind::Pdf,
        "docx" => SourceKind::Docx,
        e if IMAGE_SUFFIXES.contains(&e) => SourceKind::Image,
        _ => SourceKind::TextFile,
    }
}

/// Build a [`SourceSpec`], preferring an explicit kind over inference.
pub fn resolve(locator: &str, explicit: Option<SourceKind>) -> SourceSpec {
    let kind = explicit.unwrap_or_else(|| infer_kind(locator));
    SourceSpec::new(kind, locator)
}

/// Build a [`SourceSpec`] from a sources-file entry, keeping its query.
pub fn resolve_entry(entry: &SourceEntry) -> SourceSpec {
    match entry {
        SourceEntry::Locator(locator) => resolve(locator, None),
        SourceEntry::Typed { kind, path, query } => {
            let spec = resolve(path, *kind);
            match query {
                Some(q) => spec.with_query(q.clone()),
                None => spec,
            }
        }
    }
}
