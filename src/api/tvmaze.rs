//! TVMaze API client
//!
//! Provides paged show listings, show detail and search.
//! API docs: https://www.tvmaze.com/api

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{ApiError, DetailFetcher, SearchFetcher, ShowFetcher};
use crate::models::{Episode, Schedule, ScoredShow, Show, ShowDetail};

pub const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com";

/// TVMaze API client
#[derive(Debug, Clone)]
pub struct TvMazeClient {
    base_url: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl Default for TvMazeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TvMazeClient {
    /// Create a client against the public TVMaze API
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            max_retries: 3,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET with retry on rate limiting. `what` names the resource in NotFound errors.
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str, what: &str) -> Result<T, ApiError> {
        let url = reqwest::Url::parse(&format!("{}{}", self.base_url, endpoint))
            .map_err(|e| ApiError::Transport(format!("Invalid URL: {}", e)))?;
        let mut retries = 0;

        loop {
            debug!(%url, "GET");
            let response = self
                .client
                .get(url.clone())
                .header("Accept", "application/json")
                .send()
                .await?;

            match response.status() {
                StatusCode::OK => {
                    let body = response.text().await?;
                    return serde_json::from_str(&body)
                        .map_err(|e| ApiError::Decode(format!("JSON parse error: {}", e)));
                }
                StatusCode::NOT_FOUND => {
                    return Err(ApiError::NotFound(what.to_string()));
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    retries += 1;
                    if retries >= self.max_retries {
                        warn!(%url, "rate limited, giving up");
                        return Err(ApiError::RateLimited);
                    }

                    // Get Retry-After header or default to exponential backoff
                    let wait_secs = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(2u64.pow(retries));

                    debug!(%url, wait_secs, "rate limited, retrying");
                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                    continue;
                }
                status => {
                    return Err(ApiError::ServerError(status.as_u16()));
                }
            }
        }
    }

    /// Get one page of the full show index
    pub async fn shows(&self, page: u32) -> Result<Vec<Show>, ApiError> {
        let endpoint = format!("/shows?page={}", page);
        let shows: Vec<ShowRaw> = self.get(&endpoint, &format!("page {}", page)).await?;
        Ok(shows.into_iter().map(ShowRaw::into_show).collect())
    }

    /// Get show detail with embedded episodes
    pub async fn show_detail(&self, id: u64) -> Result<ShowDetail, ApiError> {
        let endpoint = format!("/shows/{}?embed=episodes", id);
        let response: ShowDetailRaw = self.get(&endpoint, &format!("show {}", id)).await?;
        Ok(response.into_detail())
    }

    /// Best single match for a query
    pub async fn single_search(&self, query: &str) -> Result<Show, ApiError> {
        let endpoint = format!("/singlesearch/shows?q={}", urlencoding::encode(query));
        let show: ShowRaw = self.get(&endpoint, &format!("\"{}\"", query)).await?;
        Ok(show.into_show())
    }

    /// All matches for a query, best first
    pub async fn search(&self, query: &str) -> Result<Vec<ScoredShow>, ApiError> {
        let endpoint = format!("/search/shows?q={}", urlencoding::encode(query));
        let results: Vec<SearchHitRaw> = self.get(&endpoint, &format!("\"{}\"", query)).await?;
        Ok(results
            .into_iter()
            .map(|hit| ScoredShow {
                score: hit.score,
                show: hit.show.into_show(),
            })
            .collect())
    }
}

#[async_trait]
impl ShowFetcher for TvMazeClient {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Show>, ApiError> {
        self.shows(page).await
    }
}

#[async_trait]
impl DetailFetcher for TvMazeClient {
    async fn fetch_detail(&self, id: u64) -> Result<ShowDetail, ApiError> {
        self.show_detail(id).await
    }
}

#[async_trait]
impl SearchFetcher for TvMazeClient {
    async fn fetch_exact(&self, query: &str) -> Result<Show, ApiError> {
        self.single_search(query).await
    }

    async fn fetch_all(&self, query: &str) -> Result<Vec<ScoredShow>, ApiError> {
        self.search(query).await
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct ImageRaw {
    medium: Option<String>,
    original: Option<String>,
}

impl ImageRaw {
    fn url(self) -> Option<String> {
        self.medium.or(self.original)
    }
}

#[derive(Debug, Deserialize)]
struct ShowRaw {
    id: u64,
    name: String,
    image: Option<ImageRaw>,
}

impl ShowRaw {
    fn into_show(self) -> Show {
        Show {
            id: self.id,
            name: self.name,
            image_url: self.image.and_then(ImageRaw::url),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchHitRaw {
    score: f64,
    show: ShowRaw,
}

#[derive(Debug, Deserialize)]
struct ScheduleRaw {
    #[serde(default)]
    time: String,
    #[serde(default)]
    days: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EpisodeRaw {
    id: u64,
    name: Option<String>,
    // Specials can come back without a number
    season: Option<i32>,
    number: Option<i32>,
    summary: Option<String>,
    image: Option<ImageRaw>,
}

impl EpisodeRaw {
    fn into_episode(self) -> Episode {
        Episode {
            id: self.id,
            name: self.name.unwrap_or_default(),
            season: self.season.unwrap_or(0),
            number: self.number.unwrap_or(0),
            summary: self.summary.unwrap_or_default(),
            image_url: self.image.and_then(ImageRaw::url),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddedRaw {
    #[serde(default)]
    episodes: Vec<EpisodeRaw>,
}

#[derive(Debug, Deserialize)]
struct ShowDetailRaw {
    id: u64,
    name: String,
    image: Option<ImageRaw>,
    schedule: Option<ScheduleRaw>,
    #[serde(default)]
    genres: Vec<String>,
    summary: Option<String>,
    #[serde(rename = "_embedded")]
    embedded: Option<EmbeddedRaw>,
}

impl ShowDetailRaw {
    fn into_detail(self) -> ShowDetail {
        let schedule = self
            .schedule
            .map(|s| Schedule {
                time: s.time,
                days: s.days,
            })
            .unwrap_or_default();

        let episodes = self
            .embedded
            .map(|e| e.episodes.into_iter().map(EpisodeRaw::into_episode).collect())
            .unwrap_or_default();

        ShowDetail {
            id: self.id,
            name: self.name,
            image_url: self.image.and_then(ImageRaw::url),
            schedule,
            genres: self.genres,
            summary: self.summary.unwrap_or_default(),
            episodes,
        }
    }
}
