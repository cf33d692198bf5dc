mod info;

pub use info::{decode_text_string, parse_pdf_date};

use doc_model::AttributeValue;
use lopdf::Document;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum OpenSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl From<PathBuf> for OpenSource {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&Path> for OpenSource {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

impl From<Vec<u8>> for OpenSource {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PdfEngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parse error: {0}")]
    Parse(#[from] lopdf::Error),
    #[error("page {page} out of range (page_count={page_count})")]
    PageOutOfRange { page: u32, page_count: u32 },
    #[error("encrypted PDFs are not supported in the default backend")]
    EncryptedUnsupported,
    #[error("backend error: {0}")]
    Backend(String),
}

/// An opened PDF. Dropping it releases the document.
pub trait PdfDocument: fmt::Debug {
    fn page_count(&self) -> u32;

    /// Extractable text of a page, `None` when the page is absent or unreadable.
    fn page_text(&self, page_index: u32) -> Option<String>;

    /// The document information dictionary, in dictionary order.
    fn metadata(&self) -> Vec<(String, AttributeValue)>;

    /// Resolved location the document was opened from, if it came from disk.
    fn location(&self) -> Option<&Path>;
}

pub trait PdfEngine {
    fn open(&self, source: OpenSource) -> Result<Box<dyn PdfDocument>, PdfEngineError>;
}

#[derive(Debug)]
pub struct LopdfDocument {
    location: Option<PathBuf>,
    inner: Document,
    page_numbers: Vec<u32>,
}

impl LopdfDocument {
    pub fn load(source: OpenSource) -> Result<Self, PdfEngineError> {
        let (bytes, location) = match source {
            OpenSource::Path(path) => {
                let bytes = fs::read(&path)?;
                let resolved = fs::canonicalize(&path).unwrap_or(path);
                (bytes, Some(resolved))
            }
            OpenSource::Bytes(bytes) => (bytes, None),
        };

        if bytes.windows("/Encrypt".len()).any(|window| window == b"/Encrypt") {
            return Err(PdfEngineError::EncryptedUnsupported);
        }

        let inner = Document::load_mem(&bytes)?;
        let page_numbers: Vec<u32> = inner.get_pages().keys().copied().collect();

        if page_numbers.is_empty() {
            return Err(PdfEngineError::Backend("document has no pages".to_owned()));
        }

        Ok(Self { location, inner, page_numbers })
    }

    pub fn try_page_text(&self, page_index: u32) -> Result<String, PdfEngineError> {
        let page_number = self.page_numbers.get(page_index as usize).copied().ok_or(
            PdfEngineError::PageOutOfRange { page: page_index, page_count: self.page_count() },
        )?;

        Ok(self.inner.extract_text(&[page_number])?)
    }
}

impl PdfDocument for LopdfDocument {
    fn page_count(&self) -> u32 {
        self.page_numbers.len() as u32
    }

    fn page_text(&self, page_index: u32) -> Option<String> {
        match self.try_page_text(page_index) {
            Ok(text) => Some(text),
            Err(err) => {
                tracing::debug!(page_index, error = %err, "page text unavailable");
                None
            }
        }
    }

    fn metadata(&self) -> Vec<(String, AttributeValue)> {
        info::read_info_dictionary(&self.inner)
    }

    fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfEngine;

impl LopdfEngine {
    pub fn new() -> Self {
        Self
    }
}

impl PdfEngine for LopdfEngine {
    fn open(&self, source: OpenSource) -> Result<Box<dyn PdfDocument>, PdfEngineError> {
        Ok(Box::new(LopdfDocument::load(source)?))
    }
}

pub fn default_engine() -> LopdfEngine {
    LopdfEngine::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pdf_bytes() -> &'static [u8] {
        include_bytes!("../../../tests/fixtures/small.pdf")
    }

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures").join(name)
    }

    #[test]
    fn opens_pdf_and_reads_page_count() {
        let engine = LopdfEngine::new();
        let doc = engine
            .open(OpenSource::Bytes(sample_pdf_bytes().to_vec()))
            .expect("open should succeed");

        assert_eq!(doc.page_count(), 1);
        assert!(doc.location().is_none());
    }

    #[test]
    fn extracts_page_text() {
        let doc = LopdfDocument::load(OpenSource::from(fixture("small.pdf")))
            .expect("open should succeed");

        let text = doc.page_text(0).expect("page 0 has text");
        assert!(text.contains("The quick brown fox."), "unexpected text: {text:?}");
    }

    #[test]
    fn missing_page_yields_none_and_typed_error() {
        let doc = LopdfDocument::load(OpenSource::from(fixture("three-pages.pdf")))
            .expect("open should succeed");

        assert_eq!(doc.page_count(), 3);
        assert!(doc.page_text(3).is_none());
        assert!(matches!(
            doc.try_page_text(7),
            Err(PdfEngineError::PageOutOfRange { page: 7, page_count: 3 })
        ));
    }

    #[test]
    fn path_source_records_resolved_location() {
        let doc = default_engine().open(OpenSource::from(fixture("small.pdf"))).expect("open");
        let location = doc.location().expect("opened from disk");

        assert!(location.is_absolute());
        assert_eq!(location.file_name().and_then(|name| name.to_str()), Some("small.pdf"));
    }

    #[test]
    fn rejects_non_pdf_bytes() {
        let err = LopdfEngine::new()
            .open(OpenSource::Bytes(b"This is not a PDF document.\n".to_vec()))
            .expect_err("should fail");

        assert!(matches!(err, PdfEngineError::Parse(_)));
    }

    #[test]
    fn rejects_encrypted_marker() {
        let err = LopdfEngine::new()
            .open(OpenSource::from(fixture("encrypted-marker.pdf")))
            .expect_err("should fail");

        assert!(matches!(err, PdfEngineError::EncryptedUnsupported));
    }

    #[test]
    fn metadata_lists_info_dictionary() {
        let doc = LopdfEngine::new().open(OpenSource::from(fixture("with-info.pdf"))).expect("open");
        let metadata = doc.metadata();
        let names: Vec<&str> = metadata.iter().map(|(name, _)| name.as_str()).collect();

        assert_eq!(names, ["Title", "Author", "Keywords", "CreationDate", "Producer"]);
        assert_eq!(metadata[0].1, AttributeValue::Text("Document Analysis".to_owned()));
        assert!(matches!(metadata[3].1, AttributeValue::Date(_)));
        assert_eq!(metadata[4].1, AttributeValue::Text("XP".to_owned()));
    }

    #[test]
    fn documents_without_info_have_no_metadata() {
        let doc = LopdfEngine::new().open(OpenSource::from(fixture("small.pdf"))).expect("open");
        assert!(doc.metadata().is_empty());
    }
}
