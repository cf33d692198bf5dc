//! Xplore Core Library
//!
//! Document ingest, the document list and extract editing.

pub mod access;
pub mod config;
pub mod document;
pub mod extract;
pub mod fs_meta;
pub mod ingest;

pub use access::{AccessScope, ScopedAccess, Unsandboxed};
pub use config::{ConfigError, IngestConfig};
pub use document::{
    failure_summary, DocumentId, DocumentList, DocumentRecord, INITIAL_STATUS, NO_DOCS_STATUS,
    NO_URL,
};
pub use extract::ExtractForm;
pub use fs_meta::{MetadataProvider, StdMetadataProvider};
pub use ingest::{IngestError, IngestOutcome, Ingestor, Rejection};
