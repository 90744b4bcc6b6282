//! Data structures and types for tvshelf
//!
//! Contains all shared models used across the application organized by domain:
//! - **Catalog**: shows and episodes as returned by the catalog API
//! - **Detail**: full show detail with its embedded episodes
//! - **Display**: presentation models handed to a front end

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Catalog Models
// =============================================================================

/// A show as listed in the catalog. Identity key is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub id: u64,
    pub name: String,
    pub image_url: Option<String>,
}

impl Show {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image_url: None,
        }
    }
}

impl fmt::Display for Show {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [#{}]", self.name, self.id)
    }
}

/// A single episode of a show. Identity key is `id`.
///
/// Season and number are taken as delivered; values of zero or below are
/// not rejected here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u64,
    pub name: String,
    pub season: i32,
    pub number: i32,
    pub summary: String,
    pub image_url: Option<String>,
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:02}E{:02} - {}", self.season, self.number, self.name)
    }
}

/// Airing schedule of a show
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub time: String,
    pub days: Vec<String>,
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.days.is_empty(), self.time.is_empty()) {
            (true, true) => write!(f, "Not scheduled"),
            (true, false) => write!(f, "At {}", self.time),
            (false, true) => write!(f, "{}", self.days.join(", ")),
            (false, false) => write!(f, "{} at {}", self.days.join(", "), self.time),
        }
    }
}

/// Full show detail including the flat, unordered embedded episode list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowDetail {
    pub id: u64,
    pub name: String,
    pub image_url: Option<String>,
    pub schedule: Schedule,
    pub genres: Vec<String>,
    pub summary: String,
    pub episodes: Vec<Episode>,
}

impl ShowDetail {
    /// The list-level view of this show
    pub fn as_show(&self) -> Show {
        Show {
            id: self.id,
            name: self.name.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// One entry of a multi-result search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredShow {
    pub score: f64,
    pub show: Show,
}

// =============================================================================
// Display Models
// =============================================================================

/// Row model for a show in any list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowDisplay {
    pub id: u64,
    pub title: String,
    pub image_url: Option<String>,
}

impl From<&Show> for ShowDisplay {
    fn from(show: &Show) -> Self {
        Self {
            id: show.id,
            title: show.name.clone(),
            image_url: show.image_url.clone(),
        }
    }
}

/// Header model for the show detail screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowDetailDisplay {
    pub id: u64,
    pub name: String,
    pub image_url: Option<String>,
    pub schedule: String,
    pub genres: String,
    pub summary: String,
}

impl From<&ShowDetail> for ShowDetailDisplay {
    fn from(detail: &ShowDetail) -> Self {
        Self {
            id: detail.id,
            name: detail.name.clone(),
            image_url: detail.image_url.clone(),
            schedule: detail.schedule.to_string(),
            genres: detail.genres.join(", "),
            summary: strip_html(&detail.summary),
        }
    }
}

/// Labelled fields for the episode detail screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeDetailDisplay {
    pub image_url: Option<String>,
    pub name: String,
    pub summary: String,
    pub season: String,
    pub number: String,
}

impl From<&Episode> for EpisodeDetailDisplay {
    fn from(episode: &Episode) -> Self {
        Self {
            image_url: episode.image_url.clone(),
            name: format!("Name: {}", episode.name),
            summary: format!("Summary: {}", strip_html(&episode.summary)),
            season: format!("Season {}", episode.season),
            number: format!("Episode number {}", episode.number),
        }
    }
}

/// Remove markup tags from catalog summaries (`<p>Some <b>text</b></p>`)
pub fn strip_html(text: &str) -> String {
    let stripped = match regex::Regex::new(r"<[^>]*>") {
        Ok(re) => re.replace_all(text, "").into_owned(),
        Err(_) => text.to_string(),
    };
    stripped.trim().to_string()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(season: i32, number: i32) -> Episode {
        Episode {
            id: 1,
            name: "Pilot".to_string(),
            season,
            number,
            summary: "<p>The <i>first</i> one.</p>".to_string(),
            image_url: None,
        }
    }

    #[test]
    fn test_episode_display() {
        assert_eq!(episode(1, 2).to_string(), "S01E02 - Pilot");
    }

    #[test]
    fn test_show_display() {
        assert_eq!(Show::new(82, "Game of Thrones").to_string(), "Game of Thrones [#82]");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>The <i>first</i> one.</p>"), "The first one.");
        assert_eq!(strip_html("plain"), "plain");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_schedule_display() {
        let schedule = Schedule {
            time: "21:00".to_string(),
            days: vec!["Sunday".to_string(), "Monday".to_string()],
        };
        assert_eq!(schedule.to_string(), "Sunday, Monday at 21:00");
        assert_eq!(Schedule::default().to_string(), "Not scheduled");
    }

    #[test]
    fn test_episode_detail_display_labels() {
        let display = EpisodeDetailDisplay::from(&episode(3, 7));
        assert_eq!(display.name, "Name: Pilot");
        assert_eq!(display.summary, "Summary: The first one.");
        assert_eq!(display.season, "Season 3");
        assert_eq!(display.number, "Episode number 7");
    }

    #[test]
    fn test_show_detail_display_joins_genres() {
        let detail = ShowDetail {
            id: 1,
            name: "Under the Dome".to_string(),
            image_url: None,
            schedule: Schedule::default(),
            genres: vec!["Drama".to_string(), "Science-Fiction".to_string()],
            summary: "<p>Dome.</p>".to_string(),
            episodes: Vec::new(),
        };
        let display = ShowDetailDisplay::from(&detail);
        assert_eq!(display.genres, "Drama, Science-Fiction");
        assert_eq!(display.summary, "Dome.");
        assert_eq!(detail.as_show(), Show::new(1, "Under the Dome"));
    }

    #[test]
    fn test_show_serde_roundtrip_keeps_image() {
        let show = Show {
            id: 5,
            name: "True Detective".to_string(),
            image_url: Some("https://static.tvmaze.com/5.jpg".to_string()),
        };
        let json = serde_json::to_string(&show).unwrap();
        let parsed: Show = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, show);
    }
}
