//! tvshelf - TVMaze catalog client
//!
//! Paged show browsing, show detail with episodes grouped by season,
//! title search and locally persisted favorites.
//!
//! # Modules
//!
//! - `models` - Shows, episodes and their display models
//! - `episodes` - Season grouping of embedded episode lists
//! - `api` - Fetch traits and the TVMaze client
//! - `store` - Key-value persistence and the favorites store
//! - `app` - Screen controllers and navigation
//! - `config`, `cli`, `commands` - Command line front end

pub mod models;
pub mod episodes;
pub mod api;
pub mod store;
pub mod app;
pub mod config;
pub mod cli;
pub mod commands;

// Re-export commonly used types
pub use models::{
    Episode, EpisodeDetailDisplay, Schedule, ScoredShow, Show, ShowDetail, ShowDetailDisplay,
    ShowDisplay,
};
pub use episodes::{group_episodes, EpisodeList, LookupError, SeasonBucket};

pub use api::{ApiError, DetailFetcher, SearchFetcher, ShowFetcher, TvMazeClient};
pub use store::{FavoritesStore, FileStore, KeyValueStore, MemoryStore, StoreError};
pub use app::{
    ChannelCoordinator, Coordinator, DetailsController, FavoritesController,
    PaginationController, Route, SearchController,
};
