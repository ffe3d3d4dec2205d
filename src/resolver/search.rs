//! Hook for an external semantic search service.
//!
//! Consulted only after every local strategy has failed.

use async_trait::async_trait;
use thiserror::Error;

use crate::matching::Candidate;

/// Errors reported by a semantic search backend.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Semantic search unavailable: {0}")]
    Unavailable(String),
    #[error("Semantic search failed: {0}")]
    Failed(String),
}

/// External embedding-backed search over the knowledge base.
#[async_trait]
pub trait SemanticSearch: Send + Sync {
    /// Return up to `limit` door candidates, best first.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, SearchError>;
}
