//! Exact-match show search
//!
//! Each submit is fire-and-forget: earlier requests are not cancelled and
//! their responses are delivered in completion order. Responses carry the
//! query they answer so a front end can ignore stale ones.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use super::{Coordinator, Route};
use crate::api::SearchFetcher;
use crate::models::ShowDisplay;

/// Notifications for the search screen
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    ButtonEnabled(bool),
    Loading(bool),
    Found { query: String, show: ShowDisplay },
    Error { query: String, message: String },
}

pub struct SearchController {
    fetcher: Arc<dyn SearchFetcher>,
    events: UnboundedSender<SearchEvent>,
    coordinator: Option<Box<dyn Coordinator>>,
}

impl SearchController {
    pub fn new(fetcher: Arc<dyn SearchFetcher>) -> (Self, UnboundedReceiver<SearchEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            fetcher,
            events,
            coordinator: None,
        };
        (controller, rx)
    }

    pub fn with_coordinator(mut self, coordinator: impl Coordinator + 'static) -> Self {
        self.coordinator = Some(Box::new(coordinator));
        self
    }

    /// Input text changed; the search button is enabled for non-empty text
    pub fn set_query(&self, text: &str) -> bool {
        let enabled = !text.is_empty();
        let _ = self.events.send(SearchEvent::ButtonEnabled(enabled));
        enabled
    }

    /// Issue one exact-match lookup for `query`
    pub fn submit(&self, query: &str) {
        let _ = self.events.send(SearchEvent::Loading(true));

        let fetcher = Arc::clone(&self.fetcher);
        let events = self.events.downgrade();
        let query = query.to_string();

        tokio::spawn(async move {
            debug!(%query, "searching");
            let result = fetcher.fetch_exact(&query).await;

            let Some(events) = events.upgrade() else {
                debug!(%query, "search controller released, dropping result");
                return;
            };
            let _ = events.send(SearchEvent::Loading(false));
            match result {
                Ok(show) => {
                    let show = ShowDisplay::from(&show);
                    let _ = events.send(SearchEvent::Found { query, show });
                }
                Err(e) => {
                    warn!(%query, error = %e, "search failed");
                    let message = e.to_string();
                    let _ = events.send(SearchEvent::Error { query, message });
                }
            }
        });
    }

    /// Open the detail screen for a found show
    pub fn did_select(&self, show: &ShowDisplay) {
        if let Some(coordinator) = &self.coordinator {
            coordinator.navigate(Route::ShowDetails { id: show.id });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::{ScoredShow, Show};
    use async_trait::async_trait;

    struct NoSearch;

    #[async_trait]
    impl SearchFetcher for NoSearch {
        async fn fetch_exact(&self, query: &str) -> Result<Show, ApiError> {
            Err(ApiError::NotFound(query.to_string()))
        }

        async fn fetch_all(&self, _query: &str) -> Result<Vec<ScoredShow>, ApiError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_button_enabled_follows_text() {
        let (controller, mut rx) = SearchController::new(Arc::new(NoSearch));
        assert!(!controller.set_query(""));
        assert!(controller.set_query("x"));
        assert_eq!(rx.try_recv().ok(), Some(SearchEvent::ButtonEnabled(false)));
        assert_eq!(rx.try_recv().ok(), Some(SearchEvent::ButtonEnabled(true)));
    }

    #[tokio::test]
    async fn test_not_found_signals_error() {
        let (controller, mut rx) = SearchController::new(Arc::new(NoSearch));
        controller.submit("nothing");
        assert_eq!(rx.recv().await, Some(SearchEvent::Loading(true)));
        assert_eq!(rx.recv().await, Some(SearchEvent::Loading(false)));
        match rx.recv().await {
            Some(SearchEvent::Error { query, message }) => {
                assert_eq!(query, "nothing");
                assert!(message.contains("nothing"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
