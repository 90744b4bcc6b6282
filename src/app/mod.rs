//! Screen controllers and navigation
//!
//! Each controller owns the state of one screen and reports changes through
//! an unbounded tokio channel handed out at construction. Fetches run on
//! spawned tasks, so controllers must be created inside a tokio runtime.
//! A task that finishes after its controller was dropped discards the result.

pub mod details;
pub mod favorites;
pub mod pagination;
pub mod search;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::models::Episode;

pub use details::{DetailsController, DetailsEvent};
pub use favorites::{FavoritesController, FavoritesEvent, SortCriteria};
pub use pagination::{ListEvent, PaginationController, PaginationState, PREFETCH_WINDOW};
pub use search::{SearchController, SearchEvent};

// =============================================================================
// Navigation
// =============================================================================

/// Navigation targets a controller can request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Detail screen for a show
    ShowDetails { id: u64 },
    /// Detail screen for one episode
    EpisodeDetails(Episode),
}

/// Performs navigation on behalf of a controller.
///
/// Controllers own their coordinator; a coordinator must never hold a strong
/// reference back to the controller or screen that owns it.
pub trait Coordinator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Coordinator that forwards routes to whoever holds the receiver
#[derive(Debug, Clone)]
pub struct ChannelCoordinator {
    tx: UnboundedSender<Route>,
}

impl ChannelCoordinator {
    pub fn new() -> (Self, UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Coordinator for ChannelCoordinator {
    fn navigate(&self, route: Route) {
        // Receiver gone means nobody is navigating anymore
        let _ = self.tx.send(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_coordinator_forwards() {
        let (coordinator, mut rx) = ChannelCoordinator::new();
        coordinator.navigate(Route::ShowDetails { id: 3 });
        assert_eq!(rx.try_recv().ok(), Some(Route::ShowDetails { id: 3 }));
    }

    #[test]
    fn test_channel_coordinator_ignores_closed_receiver() {
        let (coordinator, rx) = ChannelCoordinator::new();
        drop(rx);
        coordinator.navigate(Route::ShowDetails { id: 3 });
    }
}
