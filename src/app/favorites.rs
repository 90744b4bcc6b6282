//! Favorites screen

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{Coordinator, Route};
use crate::models::{Show, ShowDisplay};
use crate::store::{FavoritesStore, StoreError};

/// Ordering offered on the favorites screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortCriteria {
    #[default]
    Id,
    Alphabetical,
}

impl SortCriteria {
    /// Map a toolbar tag; unknown tags fall back to id order
    pub fn from_tag(tag: usize) -> Self {
        match tag {
            1 => SortCriteria::Alphabetical,
            _ => SortCriteria::Id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesEvent {
    Updated,
}

pub struct FavoritesController {
    store: Arc<FavoritesStore>,
    shows: Vec<Show>,
    events: UnboundedSender<FavoritesEvent>,
    coordinator: Option<Box<dyn Coordinator>>,
}

impl FavoritesController {
    pub fn new(store: Arc<FavoritesStore>) -> (Self, UnboundedReceiver<FavoritesEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            store,
            shows: Vec::new(),
            events,
            coordinator: None,
        };
        (controller, rx)
    }

    pub fn with_coordinator(mut self, coordinator: impl Coordinator + 'static) -> Self {
        self.coordinator = Some(Box::new(coordinator));
        self
    }

    fn updated(&self) {
        let _ = self.events.send(FavoritesEvent::Updated);
    }

    /// Reload from the store
    pub fn refresh(&mut self) -> Result<(), StoreError> {
        self.shows = self.store.list()?;
        self.updated();
        Ok(())
    }

    pub fn items(&self) -> Vec<ShowDisplay> {
        self.shows.iter().map(ShowDisplay::from).collect()
    }

    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    /// Remove the favorite shown at `index`
    pub fn remove_at(&mut self, index: usize) -> Result<Option<Show>, StoreError> {
        let Some(id) = self.shows.get(index).map(|s| s.id) else {
            return Ok(None);
        };
        self.store.remove(id)?;
        let removed = self.shows.remove(index);
        self.updated();
        Ok(Some(removed))
    }

    pub fn did_select(&self, index: usize) -> Option<u64> {
        let id = self.shows.get(index)?.id;
        if let Some(coordinator) = &self.coordinator {
            coordinator.navigate(Route::ShowDetails { id });
        }
        Some(id)
    }

    pub fn sort(&mut self, criteria: SortCriteria) {
        match criteria {
            SortCriteria::Id => self.shows.sort_by_key(|s| s.id),
            SortCriteria::Alphabetical => self.shows.sort_by(|a, b| a.name.cmp(&b.name)),
        }
        self.updated();
    }

    /// True once the first-visit hint was dismissed
    pub fn first_time_screen_shown(&self) -> bool {
        self.store.alert_shown().unwrap_or(false)
    }

    pub fn save_alert_shown(&self) -> Result<(), StoreError> {
        self.store.mark_alert_shown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_tag_mapping() {
        assert_eq!(SortCriteria::from_tag(0), SortCriteria::Id);
        assert_eq!(SortCriteria::from_tag(1), SortCriteria::Alphabetical);
        assert_eq!(SortCriteria::from_tag(42), SortCriteria::Id);
    }
}
