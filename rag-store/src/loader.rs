//! Source document loading.
//!
//! The ingestion input is a UTF-8 text rendition of the source document.
//! Page breaks are form feeds (`\x0c`), the convention used by common
//! PDF-to-text tools, so page attribution survives the conversion.

use std::path::Path;

use tracing::debug;

use crate::errors::RagError;

/// One page of source text with its 1-based page number.
#[derive(Debug, Clone)]
pub struct PageText {
    pub page: u32,
    pub text: String,
}

/// Reads a document and splits it into pages on form-feed boundaries.
///
/// A document without form feeds yields a single page. Whitespace-only
/// pages are kept (they still occupy a page number) but produce no chunks
/// downstream.
///
/// # Errors
/// Returns [`RagError::DocumentNotFound`] if the path does not exist, or
/// [`RagError::Io`] on read failures.
pub fn load_document(path: impl AsRef<Path>) -> Result<Vec<PageText>, RagError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(RagError::DocumentNotFound(path.to_path_buf()));
    }

    let raw = std::fs::read_to_string(path)?;
    let pages: Vec<PageText> = raw
        .split('\x0c')
        .enumerate()
        .map(|(i, text)| PageText {
            page: (i + 1) as u32,
            text: text.to_string(),
        })
        .collect();

    debug!(path = %path.display(), pages = pages.len(), "document loaded");
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_document_is_reported() {
        let err = load_document("does/not/exist.txt").unwrap_err();
        assert!(matches!(err, RagError::DocumentNotFound(_)));
    }

    #[test]
    fn form_feeds_delimit_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "page one\x0cpage two\x0cpage three").unwrap();

        let pages = load_document(&path).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].page, 1);
        assert_eq!(pages[2].text, "page three");
    }

    #[test]
    fn document_without_breaks_is_one_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "just one page").unwrap();

        let pages = load_document(&path).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page, 1);
    }
}
