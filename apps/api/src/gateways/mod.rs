//! Capability interfaces for the three external collaborators: the
//! enhancement service, document ingestion, and persistence.
//!
//! The editor session only ever sees these traits; production wiring
//! happens in `main`, and tests substitute deterministic fakes.

pub mod enhance;
pub mod ingest;
pub mod persist;
pub mod prompts;

use async_trait::async_trait;
use thiserror::Error;

use crate::editor::{SectionId, Sections};

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("enhancement service returned empty content")]
    EmptyContent,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("failed to extract text: {0}")]
    Extraction(String),

    #[error("document contained no extractable text")]
    Empty,
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write resume file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize resume: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Acknowledgement returned by a successful persist.
#[derive(Debug, Clone)]
pub struct PersistAck {
    pub filename: String,
}

/// Opaque one-shot rewrite of a section's text.
#[async_trait]
pub trait EnhancementGateway: Send + Sync {
    async fn enhance(&self, section: SectionId, text: &str) -> Result<String, EnhanceError>;
}

/// Turns an uploaded document into structured section text.
#[async_trait]
pub trait IngestionGateway: Send + Sync {
    async fn ingest(&self, filename: &str, bytes: &[u8]) -> Result<Sections, IngestError>;
}

/// Stores the full committed document somewhere durable.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn persist(&self, sections: &Sections) -> Result<PersistAck, PersistError>;
}
