//! Infinite-scroll loading of the show index
//!
//! Pages are appended in completion order. The `fetch_in_flight` flag is the
//! only gate against overlapping fetches: it is checked and set under the
//! state lock, and a prefetch that finds it set is dropped, not queued.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use super::{Coordinator, Route};
use crate::api::{ApiError, ShowFetcher};
use crate::models::{Show, ShowDisplay};

/// A visible index this close to the end of the list triggers the next page
pub const PREFETCH_WINDOW: usize = 20;

/// Accumulated list state. Shows repeated across pages are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationState {
    pub items: Vec<Show>,
    /// Page of the most recent fetch; never decreases
    pub next_page: u32,
    pub fetch_in_flight: bool,
}

/// Notifications for the list screen
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    Loading(bool),
    ItemsChanged { total: usize, appended: usize },
    Error(String),
}

/// Drives paged loading of the show list
pub struct PaginationController {
    fetcher: Arc<dyn ShowFetcher>,
    state: Arc<Mutex<PaginationState>>,
    events: UnboundedSender<ListEvent>,
    coordinator: Option<Box<dyn Coordinator>>,
}

impl PaginationController {
    pub fn new(fetcher: Arc<dyn ShowFetcher>) -> (Self, UnboundedReceiver<ListEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            fetcher,
            state: Arc::new(Mutex::new(PaginationState::default())),
            events,
            coordinator: None,
        };
        (controller, rx)
    }

    pub fn with_coordinator(mut self, coordinator: impl Coordinator + 'static) -> Self {
        self.coordinator = Some(Box::new(coordinator));
        self
    }

    fn lock(&self) -> MutexGuard<'_, PaginationState> {
        lock_state(&self.state)
    }

    /// Load page 0. Does nothing if a fetch is already running.
    pub fn start(&self) {
        let page = {
            let mut state = self.lock();
            if state.fetch_in_flight {
                debug!("start ignored, fetch already in flight");
                return;
            }
            state.fetch_in_flight = true;
            state.next_page
        };
        self.spawn_fetch(page);
    }

    /// Called with the indexes about to become visible.
    ///
    /// Fetches the next page when one of them is within [`PREFETCH_WINDOW`]
    /// of the end and no fetch is running. Returns whether a fetch started.
    pub fn prefetch<I>(&self, visible: I) -> bool
    where
        I: IntoIterator<Item = usize>,
    {
        let page = {
            let mut state = self.lock();
            if state.fetch_in_flight {
                return false;
            }
            let len = state.items.len();
            if !visible.into_iter().any(|index| index + PREFETCH_WINDOW > len) {
                return false;
            }
            state.fetch_in_flight = true;
            state.next_page += 1;
            state.next_page
        };
        self.spawn_fetch(page);
        true
    }

    /// Id of the show at `index`, forwarded to the coordinator as a detail route
    pub fn did_select(&self, index: usize) -> Option<u64> {
        let id = self.lock().items.get(index).map(|show| show.id)?;
        if let Some(coordinator) = &self.coordinator {
            coordinator.navigate(Route::ShowDetails { id });
        }
        Some(id)
    }

    pub fn items(&self) -> Vec<Show> {
        self.lock().items.clone()
    }

    pub fn display_items(&self) -> Vec<ShowDisplay> {
        self.lock().items.iter().map(ShowDisplay::from).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn next_page(&self) -> u32 {
        self.lock().next_page
    }

    pub fn is_fetching(&self) -> bool {
        self.lock().fetch_in_flight
    }

    pub fn snapshot(&self) -> PaginationState {
        self.lock().clone()
    }

    fn spawn_fetch(&self, page: u32) {
        let _ = self.events.send(ListEvent::Loading(true));

        let fetcher = Arc::clone(&self.fetcher);
        let state = Arc::downgrade(&self.state);
        let events = self.events.clone();

        tokio::spawn(async move {
            debug!(page, "fetching show page");
            let result = fetcher.fetch_page(page).await;

            let Some(state) = state.upgrade() else {
                debug!(page, "list controller released, dropping page");
                return;
            };
            complete_fetch(&state, &events, page, result);
        });
    }
}

fn lock_state(state: &Mutex<PaginationState>) -> MutexGuard<'_, PaginationState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

fn complete_fetch(
    state: &Mutex<PaginationState>,
    events: &UnboundedSender<ListEvent>,
    page: u32,
    result: Result<Vec<Show>, ApiError>,
) {
    match result {
        Ok(shows) => {
            let appended = shows.len();
            let total = {
                let mut state = lock_state(state);
                state.items.extend(shows);
                state.fetch_in_flight = false;
                state.items.len()
            };
            debug!(page, appended, total, "show page loaded");
            let _ = events.send(ListEvent::ItemsChanged { total, appended });
        }
        Err(e) => {
            lock_state(state).fetch_in_flight = false;
            warn!(page, error = %e, "show page failed");
            let _ = events.send(ListEvent::Error(e.to_string()));
        }
    }
    let _ = events.send(ListEvent::Loading(false));
}
