//! API clients for external services
//!
//! - TVMaze: show pages, show detail with embedded episodes, search
//!
//! Controllers depend on the fetch traits below rather than on a concrete
//! client, so tests can drive them with in-memory fakes.

pub mod tvmaze;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ScoredShow, Show, ShowDetail};

pub use tvmaze::TvMazeClient;

/// Leading text of every [`ApiError::NotFound`] message
pub const NOT_FOUND_PREFIX: &str = "Nothing found for";

/// Catalog API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Nothing found for {0}")]
    NotFound(String),

    #[error("Rate limited (429), retries exhausted")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(u16),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// Paged show listing. Pages start at 0; page size is server-defined.
#[async_trait]
pub trait ShowFetcher: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Show>, ApiError>;
}

/// Show detail with its embedded episodes
#[async_trait]
pub trait DetailFetcher: Send + Sync {
    async fn fetch_detail(&self, id: u64) -> Result<ShowDetail, ApiError>;
}

/// Exact-match and multi-result show lookup
#[async_trait]
pub trait SearchFetcher: Send + Sync {
    async fn fetch_exact(&self, query: &str) -> Result<Show, ApiError>;

    async fn fetch_all(&self, query: &str) -> Result<Vec<ScoredShow>, ApiError>;
}
