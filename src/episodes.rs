//! Season grouping for embedded episode lists
//!
//! Turns the flat episode list of a show detail into ordered season buckets.
//! Ordering is season ascending, then episode number ascending; the sort is
//! stable so duplicate (season, number) pairs keep their input order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Episode;

/// Requested position is not present in the grouped data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No episode at season position {season_index}, episode position {episode_index}")]
pub struct LookupError {
    pub season_index: usize,
    pub episode_index: usize,
}

/// Episodes sharing one season number, ordered by episode number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonBucket {
    pub episodes: Vec<Episode>,
}

impl SeasonBucket {
    /// Season number shared by every episode in the bucket
    pub fn season(&self) -> Option<i32> {
        self.episodes.first().map(|e| e.season)
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}

/// Seasons in display order. Position 0 is the first season after sorting,
/// not season number 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeList {
    pub seasons: Vec<SeasonBucket>,
}

impl EpisodeList {
    pub fn len(&self) -> usize {
        self.seasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }

    /// Bounds-checked lookup by display position
    pub fn episode(&self, season_index: usize, episode_index: usize) -> Result<&Episode, LookupError> {
        self.seasons
            .get(season_index)
            .and_then(|bucket| bucket.episodes.get(episode_index))
            .ok_or(LookupError {
                season_index,
                episode_index,
            })
    }

    /// Total number of episodes over all seasons
    pub fn episode_count(&self) -> usize {
        self.seasons.iter().map(SeasonBucket::len).sum()
    }
}

/// Group a flat episode collection into ordered season buckets
pub fn group_episodes(episodes: &[Episode]) -> EpisodeList {
    let mut sorted = episodes.to_vec();
    sorted.sort_by_key(|e| (e.season, e.number));

    let mut seasons: Vec<SeasonBucket> = Vec::new();
    let mut current_season: Option<i32> = None;

    for episode in sorted {
        match seasons.last_mut() {
            Some(bucket) if current_season == Some(episode.season) => {
                bucket.episodes.push(episode);
            }
            _ => {
                // Gaps between season numbers still open a fresh bucket
                current_season = Some(episode.season);
                seasons.push(SeasonBucket {
                    episodes: vec![episode],
                });
            }
        }
    }

    EpisodeList { seasons }
}
