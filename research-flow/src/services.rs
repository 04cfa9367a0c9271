//! Contracts of the external collaborators the engine drives.
//!
//! Each service is a single request/response round trip. Errors come back on
//! the `Err` channel and are never folded into a success value; an `Ok(None)`
//! from the download or extraction service means "ran, found nothing".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::models::{BibliographicMetadata, Paper};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeywordLogic {
    /// Every keyword must match.
    All,
    /// Any keyword may match.
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchField {
    TitleAndAbstract,
    Title,
    Abstract,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub keywords: Vec<String>,
    pub logic: KeywordLogic,
    pub field: SearchField,
    pub max_results: usize,
}

/// What the extraction service hands back for one PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub local_path: String,
    pub metadata: BibliographicMetadata,
    pub introduction: Option<String>,
}

#[async_trait]
pub trait KeywordGenerator: Send + Sync {
    async fn generate_keywords(&self, topic: &str) -> anyhow::Result<Vec<String>>;
}

#[async_trait]
pub trait LiteratureSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> anyhow::Result<Vec<Paper>>;
}

#[async_trait]
pub trait DocumentDownloader: Send + Sync {
    /// Returns the saved file's path, or `None` when no copy could be found.
    async fn download(&self, doi: &str, target_dir: &Path) -> anyhow::Result<Option<String>>;
}

#[async_trait]
pub trait DocumentProcessor: Send + Sync {
    async fn process(&self, local_path: &str) -> anyhow::Result<Option<ExtractedDocument>>;
}

#[async_trait]
pub trait ClaimVerifier: Send + Sync {
    async fn verify(&self, claim: &str, context: &str) -> anyhow::Result<bool>;
}

/// The full set of collaborators a session needs to run every batch.
#[derive(Clone)]
pub struct Services {
    pub keywords: Arc<dyn KeywordGenerator>,
    pub search: Arc<dyn LiteratureSearch>,
    pub downloader: Arc<dyn DocumentDownloader>,
    pub processor: Arc<dyn DocumentProcessor>,
    pub verifier: Arc<dyn ClaimVerifier>,
}
