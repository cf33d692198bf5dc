//! Document ingest pipeline
//!
//! Turns a batch of picked file locations into document records. Every
//! location ends up either accepted or rejected; a failure never stops the
//! rest of the batch.

use crate::access::{AccessScope, ScopedAccess, Unsandboxed};
use crate::config::IngestConfig;
use crate::document::{DocumentId, DocumentRecord};
use crate::fs_meta::{MetadataProvider, StdMetadataProvider};
use doc_model::flatten_attributes;
use pdf_engine::{LopdfEngine, OpenSource, PdfEngine, PdfEngineError};
use std::io;
use std::path::{Path, PathBuf};

/// Why a location was rejected.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("cannot read {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("access denied to {}", path.display())]
    AccessDenied { path: PathBuf },
    #[error("not a valid PDF document {}", path.display())]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: PdfEngineError,
    },
    #[error("no document id left for {}", path.display())]
    IdsExhausted { path: PathBuf },
}

/// A location that could not be ingested.
#[derive(Debug)]
pub struct Rejection {
    pub location: PathBuf,
    pub error: IngestError,
}

/// Result of one ingest call.
///
/// `accepted.len() + rejected.len()` always equals the number of inputs.
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub accepted: Vec<DocumentRecord>,
    pub rejected: Vec<Rejection>,
}

impl IngestOutcome {
    /// Locations of the rejected inputs, in input order.
    pub fn rejected_locations(&self) -> impl Iterator<Item = &Path> {
        self.rejected.iter().map(|rejection| rejection.location.as_path())
    }
}

/// Ingest pipeline over pluggable metadata, access and PDF providers.
#[derive(Debug, Clone)]
pub struct Ingestor<M = StdMetadataProvider, A = Unsandboxed, E = LopdfEngine> {
    metadata: M,
    access: A,
    engine: E,
    config: IngestConfig,
}

impl Ingestor {
    /// Pipeline backed by `std::fs`, no sandbox and the lopdf engine.
    pub fn new() -> Self {
        Self::with_providers(StdMetadataProvider, Unsandboxed, LopdfEngine::new())
    }
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, A, E> Ingestor<M, A, E>
where
    M: MetadataProvider,
    A: AccessScope,
    E: PdfEngine,
{
    pub fn with_providers(metadata: M, access: A, engine: E) -> Self {
        Self { metadata, access, engine, config: IngestConfig::default() }
    }

    pub fn with_config(mut self, config: IngestConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Ingests `sources` in order.
    ///
    /// Accepted records get ids `previous_count + 1`, `previous_count + 2`, ...
    /// in acceptance order, so threading the running list length keeps ids
    /// unique across batches.
    #[tracing::instrument(skip_all, fields(batch = sources.len(), previous_count = previous_count))]
    pub fn ingest<P: AsRef<Path>>(&self, sources: &[P], previous_count: u32) -> IngestOutcome {
        let mut outcome = IngestOutcome::default();

        for source in sources {
            let path = source.as_ref();
            let result = next_id(previous_count, outcome.accepted.len())
                .ok_or_else(|| IngestError::IdsExhausted { path: path.to_path_buf() })
                .and_then(|id| self.ingest_one(path, id));

            match result {
                Ok(record) => {
                    tracing::debug!(id = record.id(), path = %path.display(), "document accepted");
                    outcome.accepted.push(record);
                }
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "document rejected");
                    outcome.rejected.push(Rejection { location: path.to_path_buf(), error });
                }
            }
        }

        outcome
    }

    fn ingest_one(&self, path: &Path, id: DocumentId) -> Result<DocumentRecord, IngestError> {
        let file_pairs = self
            .metadata
            .read(path)
            .map_err(|source| IngestError::Unreadable { path: path.to_path_buf(), source })?;
        let file_attributes = flatten_attributes(file_pairs, self.config.sort_attributes);

        let _access = ScopedAccess::acquire(&self.access, path)
            .ok_or_else(|| IngestError::AccessDenied { path: path.to_path_buf() })?;

        let handle = self
            .engine
            .open(OpenSource::from(path))
            .map_err(|source| IngestError::InvalidDocument { path: path.to_path_buf(), source })?;
        let pdf_attributes = flatten_attributes(handle.metadata(), self.config.sort_attributes);

        Ok(DocumentRecord::new(id, handle, file_attributes, pdf_attributes))
    }
}

/// `previous_count + accepted + 1`, or `None` once the id space is used up.
fn next_id(previous_count: u32, accepted: usize) -> Option<DocumentId> {
    u32::try_from(accepted).ok()?.checked_add(1)?.checked_add(previous_count)
}
