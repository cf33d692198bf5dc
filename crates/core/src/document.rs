//! Document records and the process-wide document list
//!
//! A record is created once by the ingest pipeline and owns its opened PDF.
//! Only the extract is mutable afterwards.

use crate::ingest::{IngestOutcome, Ingestor};
use crate::{AccessScope, MetadataProvider};
use doc_model::{AttributeEntry, Extract};
use pdf_engine::{PdfDocument, PdfEngine};
use std::fmt;
use std::path::Path;

/// Unique identifier for a document within a [`DocumentList`]
pub type DocumentId = u32;

/// Path shown when the opened document has no resolvable location.
pub const NO_URL: &str = "No URL";

/// Status line of a list that has not imported anything yet.
pub const INITIAL_STATUS: &str = "No Docs";

/// Status line after the list is cleared.
pub const NO_DOCS_STATUS: &str = "No docs";

/// One successfully opened PDF.
#[derive(Debug)]
pub struct DocumentRecord {
    /// Unique within the owning list
    id: DocumentId,

    /// Full path of the resolved document location
    path: String,

    /// Last path component
    file_name: String,

    /// Extension of the last path component, without the dot
    file_extension: String,

    /// Filesystem attributes read at ingest time
    file_attributes: Vec<AttributeEntry>,

    /// Entries of the PDF information dictionary
    pdf_attributes: Vec<AttributeEntry>,

    /// The opened document, owned exclusively by this record
    handle: Box<dyn PdfDocument>,

    /// User-curated extract fields
    pub extract: Extract,
}

impl DocumentRecord {
    /// Builds a record, deriving path fields from the document's resolved location.
    pub fn new(
        id: DocumentId,
        handle: Box<dyn PdfDocument>,
        file_attributes: Vec<AttributeEntry>,
        pdf_attributes: Vec<AttributeEntry>,
    ) -> Self {
        let (path, file_name, file_extension) = match handle.location() {
            Some(location) => (
                location.display().to_string(),
                component(location.file_name()),
                component(location.extension()),
            ),
            None => (NO_URL.to_owned(), String::new(), String::new()),
        };

        Self {
            id,
            path,
            file_name,
            file_extension,
            file_attributes,
            pdf_attributes,
            handle,
            extract: Extract::default(),
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    pub fn file_attributes(&self) -> &[AttributeEntry] {
        &self.file_attributes
    }

    pub fn pdf_attributes(&self) -> &[AttributeEntry] {
        &self.pdf_attributes
    }

    pub fn document(&self) -> &dyn PdfDocument {
        self.handle.as_ref()
    }
}

fn component(part: Option<&std::ffi::OsStr>) -> String {
    part.map(|value| value.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Ordered, append-only collection of documents with a full-clear operation.
#[derive(Debug)]
pub struct DocumentList {
    docs: Vec<DocumentRecord>,

    /// Human-readable outcome of the last list operation
    status: String,
}

impl Default for DocumentList {
    fn default() -> Self {
        Self { docs: Vec::new(), status: INITIAL_STATUS.to_owned() }
    }
}

impl DocumentList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// The `previous_count` to hand to the next ingest batch.
    pub fn previous_count(&self) -> u32 {
        u32::try_from(self.docs.len()).unwrap_or(u32::MAX)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.docs.iter()
    }

    pub fn get(&self, id: DocumentId) -> Option<&DocumentRecord> {
        self.docs.iter().find(|doc| doc.id == id)
    }

    pub fn get_mut(&mut self, id: DocumentId) -> Option<&mut DocumentRecord> {
        self.docs.iter_mut().find(|doc| doc.id == id)
    }

    pub fn append(&mut self, docs: Vec<DocumentRecord>) {
        self.docs.extend(docs);
    }

    /// Drops every record, releasing their documents.
    pub fn clear(&mut self) {
        self.docs.clear();
        self.status = NO_DOCS_STATUS.to_owned();
    }

    /// Ingests `sources` with ids continuing after the current records,
    /// appends the accepted ones and updates the status line.
    ///
    /// Returns the rejected part of the outcome.
    pub fn import<M, A, E, P>(
        &mut self,
        ingestor: &Ingestor<M, A, E>,
        sources: &[P],
    ) -> Vec<crate::Rejection>
    where
        M: MetadataProvider,
        A: AccessScope,
        E: PdfEngine,
        P: AsRef<Path>,
    {
        let IngestOutcome { accepted, rejected } = ingestor.ingest(sources, self.previous_count());

        self.status = failure_summary(rejected.iter().map(|rejection| &rejection.location));
        self.append(accepted);

        rejected
    }

    /// Records a file picker failure as the status line.
    pub fn record_picker_error(&mut self, error: &dyn fmt::Display) {
        self.status = error.to_string();
    }
}

/// `"Failed to read: a, b"`, or an empty string when nothing failed.
pub fn failure_summary<I, P>(locations: I) -> String
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let names: Vec<String> =
        locations.into_iter().map(|location| location.as_ref().display().to_string()).collect();

    if names.is_empty() {
        String::new()
    } else {
        format!("Failed to read: {}", names.join(", "))
    }
}
