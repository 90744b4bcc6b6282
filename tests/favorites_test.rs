//! Favorites store and screen tests
//!
//! Covers persistence across store instances, the favorites screen
//! controller and concurrent writers sharing one store.

use std::sync::Arc;

use tempfile::TempDir;
use tvshelf::app::{ChannelCoordinator, FavoritesController, FavoritesEvent, Route, SortCriteria};
use tvshelf::models::Show;
use tvshelf::store::{FavoritesStore, FileStore, KeyValueStore};

fn store_in(dir: &TempDir) -> FavoritesStore {
    FavoritesStore::new(FileStore::new(dir.path()))
}

fn seeded() -> Arc<FavoritesStore> {
    let store = FavoritesStore::in_memory();
    store.add(&Show::new(30, "Breaking Bad")).unwrap();
    store.add(&Show::new(2, "Person of Interest")).unwrap();
    store.add(&Show::new(17, "Arrow")).unwrap();
    Arc::new(store)
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_favorites_survive_new_store_instance() {
    let dir = TempDir::new().unwrap();

    let first = store_in(&dir);
    first.add(&Show::new(1, "Under the Dome")).unwrap();
    first.add(&Show::new(82, "Game of Thrones")).unwrap();
    first.remove(1).unwrap();
    drop(first);

    let second = store_in(&dir);
    let ids: Vec<u64> = second.list().unwrap().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![82]);
}

#[test]
fn test_corrupt_file_reads_as_empty_and_is_replaced() {
    let dir = TempDir::new().unwrap();
    FileStore::new(dir.path()).write("favorites", b"not json").unwrap();

    let store = store_in(&dir);
    assert!(store.list().unwrap().is_empty());

    assert!(store.add(&Show::new(5, "True Detective")).unwrap());
    assert_eq!(store.list().unwrap(), vec![Show::new(5, "True Detective")]);
}

#[test]
fn test_alert_flag_persists() {
    let dir = TempDir::new().unwrap();

    let store = store_in(&dir);
    assert!(!store.alert_shown().unwrap());
    store.mark_alert_shown().unwrap();

    assert!(store_in(&dir).alert_shown().unwrap());
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_lose_nothing() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(store_in(&dir));

    let handles: Vec<_> = (1..=32u64)
        .map(|id| {
            let store = Arc::clone(&store);
            tokio::task::spawn_blocking(move || store.add(&Show::new(id, format!("Show {}", id))))
        })
        .collect();
    for result in futures::future::join_all(handles).await {
        assert!(result.unwrap().unwrap());
    }

    let mut ids: Vec<u64> = store.list().unwrap().iter().map(|s| s.id).collect();
    ids.sort();
    assert_eq!(ids, (1..=32).collect::<Vec<u64>>());
}

#[test]
fn test_concurrent_add_and_remove_of_same_id() {
    let store = Arc::new(FavoritesStore::in_memory());
    store.add(&Show::new(1, "Keep")).unwrap();

    let threads: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                if i % 2 == 0 {
                    store.add(&Show::new(99, "Flip")).unwrap();
                } else {
                    store.remove(99).unwrap();
                }
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    // Whatever the interleaving, no duplicates and the untouched show stays
    let shows = store.list().unwrap();
    assert!(shows.iter().filter(|s| s.id == 99).count() <= 1);
    assert!(shows.iter().any(|s| s.id == 1));
}

// =============================================================================
// Favorites Screen Tests
// =============================================================================

#[tokio::test]
async fn test_refresh_lists_in_insertion_order() {
    let (mut controller, mut rx) = FavoritesController::new(seeded());

    controller.refresh().unwrap();

    let titles: Vec<String> = controller.items().into_iter().map(|d| d.title).collect();
    assert_eq!(titles, vec!["Breaking Bad", "Person of Interest", "Arrow"]);
    assert_eq!(rx.try_recv().ok(), Some(FavoritesEvent::Updated));
}

#[tokio::test]
async fn test_sort_by_id_and_name() {
    let (mut controller, _rx) = FavoritesController::new(seeded());
    controller.refresh().unwrap();

    controller.sort(SortCriteria::Id);
    let ids: Vec<u64> = controller.shows().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![2, 17, 30]);

    controller.sort(SortCriteria::Alphabetical);
    let names: Vec<&str> = controller.shows().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Arrow", "Breaking Bad", "Person of Interest"]);
}

#[tokio::test]
async fn test_remove_at_updates_store() {
    let store = seeded();
    let (mut controller, _rx) = FavoritesController::new(Arc::clone(&store));
    controller.refresh().unwrap();

    let removed = controller.remove_at(1).unwrap();
    assert_eq!(removed.map(|s| s.id), Some(2));
    assert!(!store.contains(2).unwrap());
    assert_eq!(controller.shows().len(), 2);

    assert_eq!(controller.remove_at(10).unwrap(), None);
    assert_eq!(store.list().unwrap().len(), 2);
}

#[tokio::test]
async fn test_did_select_navigates_to_show() {
    let (coordinator, mut routes) = ChannelCoordinator::new();
    let (controller, _rx) = FavoritesController::new(seeded());
    let mut controller = controller.with_coordinator(coordinator);
    controller.refresh().unwrap();

    assert_eq!(controller.did_select(2), Some(17));
    assert_eq!(routes.try_recv().ok(), Some(Route::ShowDetails { id: 17 }));
    assert_eq!(controller.did_select(3), None);
}

#[tokio::test]
async fn test_first_visit_hint() {
    let (controller, _rx) = FavoritesController::new(seeded());

    assert!(!controller.first_time_screen_shown());
    controller.save_alert_shown().unwrap();
    assert!(controller.first_time_screen_shown());
}
