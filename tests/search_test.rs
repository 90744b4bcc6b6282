//! Search controller tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mockito::{Matcher, Server};
use tvshelf::api::{ApiError, SearchFetcher, TvMazeClient};
use tvshelf::app::{ChannelCoordinator, Route, SearchController, SearchEvent};
use tvshelf::models::{ScoredShow, Show, ShowDisplay};

/// Matches only "lost", counting calls
#[derive(Default)]
struct OneShow {
    calls: AtomicUsize,
}

#[async_trait]
impl SearchFetcher for OneShow {
    async fn fetch_exact(&self, query: &str) -> Result<Show, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if query == "lost" {
            Ok(Show::new(123, "Lost"))
        } else {
            Err(ApiError::NotFound(format!("\"{}\"", query)))
        }
    }

    async fn fetch_all(&self, _query: &str) -> Result<Vec<ScoredShow>, ApiError> {
        Ok(Vec::new())
    }
}

#[test]
fn test_button_state_from_text() {
    let (controller, mut rx) = SearchController::new(Arc::new(OneShow::default()));

    controller.set_query("");
    controller.set_query("x");
    controller.set_query("");

    let states: Vec<SearchEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
    assert_eq!(
        states,
        vec![
            SearchEvent::ButtonEnabled(false),
            SearchEvent::ButtonEnabled(true),
            SearchEvent::ButtonEnabled(false),
        ]
    );
}

#[tokio::test]
async fn test_submit_found() {
    let fetcher = Arc::new(OneShow::default());
    let (controller, mut rx) = SearchController::new(fetcher.clone());

    controller.submit("lost");

    assert_eq!(rx.recv().await, Some(SearchEvent::Loading(true)));
    assert_eq!(rx.recv().await, Some(SearchEvent::Loading(false)));
    assert_eq!(
        rx.recv().await,
        Some(SearchEvent::Found {
            query: "lost".to_string(),
            show: ShowDisplay {
                id: 123,
                title: "Lost".to_string(),
                image_url: None,
            },
        })
    );
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_each_submit_issues_one_fetch() {
    let fetcher = Arc::new(OneShow::default());
    let (controller, mut rx) = SearchController::new(fetcher.clone());

    controller.submit("lost");
    controller.submit("nope");

    let mut answered = Vec::new();
    while answered.len() < 2 {
        match rx.recv().await {
            Some(SearchEvent::Found { query, .. }) => answered.push(query),
            Some(SearchEvent::Error { query, .. }) => answered.push(query),
            Some(_) => {}
            None => break,
        }
    }
    answered.sort();
    assert_eq!(answered, vec!["lost".to_string(), "nope".to_string()]);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_dropped_controller_sends_nothing() {
    let (controller, mut rx) = SearchController::new(Arc::new(OneShow::default()));

    controller.submit("lost");
    assert_eq!(rx.recv().await, Some(SearchEvent::Loading(true)));
    drop(controller);

    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn test_select_result_navigates() {
    let (coordinator, mut routes) = ChannelCoordinator::new();
    let (controller, _rx) = SearchController::new(Arc::new(OneShow::default()));
    let controller = controller.with_coordinator(coordinator);

    controller.did_select(&ShowDisplay::from(&Show::new(123, "Lost")));
    assert_eq!(routes.try_recv().ok(), Some(Route::ShowDetails { id: 123 }));
}

#[tokio::test]
async fn test_submit_against_http_client() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/singlesearch/shows")
        .match_query(Matcher::UrlEncoded("q".into(), "girls".into()))
        .with_status(200)
        .with_body(r#"{"id": 139, "name": "Girls", "image": {"medium": "https://static.tvmaze.com/139.jpg", "original": null}}"#)
        .create_async()
        .await;

    let (controller, mut rx) = SearchController::new(Arc::new(TvMazeClient::with_base_url(server.url())));
    controller.submit("girls");

    let found = loop {
        match rx.recv().await {
            Some(SearchEvent::Found { show, .. }) => break show,
            Some(SearchEvent::Error { message, .. }) => panic!("search failed: {}", message),
            Some(_) => continue,
            None => panic!("channel closed"),
        }
    };
    assert_eq!(found.id, 139);
    assert_eq!(found.image_url.as_deref(), Some("https://static.tvmaze.com/139.jpg"));
}
