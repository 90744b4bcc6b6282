//! Show detail screen: header, seasons and the favorite toggle

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use super::{Coordinator, Route};
use crate::api::DetailFetcher;
use crate::episodes::{group_episodes, EpisodeList, LookupError};
use crate::models::{Episode, Show, ShowDetail, ShowDetailDisplay};
use crate::store::FavoritesStore;

pub const EPISODE_ERROR: &str = "It was not possible to fetch episode details";

/// Notifications for the detail screen
#[derive(Debug, Clone, PartialEq)]
pub enum DetailsEvent {
    Loading(bool),
    Data {
        detail: ShowDetailDisplay,
        seasons: EpisodeList,
    },
    Favorite(bool),
    Error(String),
}

#[derive(Debug, Clone)]
struct Loaded {
    show: Show,
    seasons: EpisodeList,
}

pub struct DetailsController {
    id: u64,
    fetcher: Arc<dyn DetailFetcher>,
    favorites: Arc<FavoritesStore>,
    loaded: Arc<Mutex<Option<Loaded>>>,
    events: UnboundedSender<DetailsEvent>,
    coordinator: Option<Box<dyn Coordinator>>,
}

impl DetailsController {
    pub fn new(
        id: u64,
        fetcher: Arc<dyn DetailFetcher>,
        favorites: Arc<FavoritesStore>,
    ) -> (Self, UnboundedReceiver<DetailsEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            id,
            fetcher,
            favorites,
            loaded: Arc::new(Mutex::new(None)),
            events,
            coordinator: None,
        };
        (controller, rx)
    }

    pub fn with_coordinator(mut self, coordinator: impl Coordinator + 'static) -> Self {
        self.coordinator = Some(Box::new(coordinator));
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    fn loaded(&self) -> MutexGuard<'_, Option<Loaded>> {
        self.loaded.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fetch the show and group its episodes into seasons
    pub fn start(&self) {
        let _ = self.events.send(DetailsEvent::Loading(true));

        let id = self.id;
        let fetcher = Arc::clone(&self.fetcher);
        let favorites = Arc::clone(&self.favorites);
        let loaded = Arc::downgrade(&self.loaded);
        let events = self.events.clone();

        tokio::spawn(async move {
            debug!(id, "fetching show detail");
            let result = fetcher.fetch_detail(id).await;

            let Some(loaded) = loaded.upgrade() else {
                debug!(id, "detail controller released, dropping result");
                return;
            };

            match result {
                Ok(detail) => {
                    let (display, seasons) = convert_detail(&detail);
                    debug!(id, seasons = seasons.len(), "show detail loaded");
                    *loaded.lock().unwrap_or_else(|e| e.into_inner()) = Some(Loaded {
                        show: detail.as_show(),
                        seasons: seasons.clone(),
                    });
                    let _ = events.send(DetailsEvent::Data {
                        detail: display,
                        seasons,
                    });
                    let favorite = favorites.contains(id).unwrap_or_else(|e| {
                        warn!(id, error = %e, "could not read favorites");
                        false
                    });
                    let _ = events.send(DetailsEvent::Favorite(favorite));
                }
                Err(e) => {
                    warn!(id, error = %e, "show detail failed");
                    let _ = events.send(DetailsEvent::Error(e.to_string()));
                }
            }
            let _ = events.send(DetailsEvent::Loading(false));
        });
    }

    /// Grouped seasons, once loaded
    pub fn seasons(&self) -> Option<EpisodeList> {
        self.loaded().as_ref().map(|l| l.seasons.clone())
    }

    /// Episode at a display position. Missing positions are reported on the
    /// event channel instead of navigating.
    pub fn did_select_episode(
        &self,
        season_index: usize,
        episode_index: usize,
    ) -> Result<Episode, LookupError> {
        let lookup = match self.loaded().as_ref() {
            Some(loaded) => loaded
                .seasons
                .episode(season_index, episode_index)
                .cloned(),
            None => Err(LookupError {
                season_index,
                episode_index,
            }),
        };

        match lookup {
            Ok(episode) => {
                if let Some(coordinator) = &self.coordinator {
                    coordinator.navigate(Route::EpisodeDetails(episode.clone()));
                }
                Ok(episode)
            }
            Err(e) => {
                debug!(error = %e, "episode lookup failed");
                let _ = self.events.send(DetailsEvent::Error(EPISODE_ERROR.to_string()));
                Err(e)
            }
        }
    }

    pub fn is_favorite(&self) -> bool {
        self.favorites.contains(self.id).unwrap_or_else(|e| {
            warn!(id = self.id, error = %e, "could not read favorites");
            false
        })
    }

    pub fn button_title(&self) -> &'static str {
        if self.is_favorite() {
            "Remove from favorites"
        } else {
            "Add to favorites"
        }
    }

    /// Flip the favorite flag of the loaded show.
    ///
    /// Returns the new flag, or `None` before the show is loaded or when the
    /// store could not be updated.
    pub fn toggle_favorite(&self) -> Option<bool> {
        let show = self.loaded().as_ref().map(|l| l.show.clone())?;

        let result = if self.is_favorite() {
            self.favorites.remove(show.id).map(|_| false)
        } else {
            self.favorites.add(&show).map(|_| true)
        };

        match result {
            Ok(favorite) => {
                let _ = self.events.send(DetailsEvent::Favorite(favorite));
                Some(favorite)
            }
            Err(e) => {
                warn!(id = show.id, error = %e, "favorite toggle failed");
                let _ = self.events.send(DetailsEvent::Error(e.to_string()));
                None
            }
        }
    }
}

fn convert_detail(detail: &ShowDetail) -> (ShowDetailDisplay, EpisodeList) {
    (ShowDetailDisplay::from(detail), group_episodes(&detail.episodes))
}
