#[path = "common/mod.rs"]
mod common;

use std::time::Duration;

use common::server::{MockServer, Route, plain_images};
use puzzle_browser::backend::{Backend, Endpoints, FilterRequest, HttpBackend, Strategy};
use puzzle_browser::browser::{Browser, BrowserAction, BrowserState};
use puzzle_browser::{BrowserError, FilterCategory, FilterSelection, FilterValue, PuzzleId};

fn backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new(
        Endpoints::new(&server.base_url).unwrap(),
        Duration::from_secs(5),
        Duration::from_secs(2),
    )
    .unwrap()
}

fn ids(range: std::ops::RangeInclusive<u64>) -> Vec<PuzzleId> {
    range.map(PuzzleId::from).collect()
}

// ============================================================================
// Backend calls
// ============================================================================

#[tokio::test]
async fn test_initial_accepts_both_response_shapes() {
    let body = r#"[
        {"puzzle_id": 1, "filename": "1.png"},
        {"dominant_feature": "knights", "metadata": {"contentUrl": "http://cdn/2.png", "identifier": "2"}},
        {"filename": "no-id.png"}
    ]"#;
    let server = MockServer::start(vec![Route::get("/initial", body)]).await;

    let images = backend(&server).initial().await.unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].id, PuzzleId::from("1"));
    assert_eq!(images[0].display_ref, "1.png");
    assert_eq!(images[1].id, PuzzleId::from("2"));
    assert_eq!(images[1].display_ref, "http://cdn/2.png");
    assert_eq!(
        images[1].metadata.as_ref().unwrap().dominant_feature.as_deref(),
        Some("knights")
    );
}

#[tokio::test]
async fn test_search_sends_encoded_query() {
    let server = MockServer::start(vec![Route::get("/search", plain_images(1..=3))]).await;

    let images = backend(&server).search("knight fork").await.unwrap();
    assert_eq!(images.len(), 3);

    let requests = server.requests_to("/search");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].target, "/search?query=knight+fork");
}

#[tokio::test]
async fn test_error_status_carries_backend_message() {
    let server = MockServer::start(vec![
        Route::get("/search", r#"{"error": "Query parameter is required"}"#).with_status(400),
    ])
    .await;

    let err = backend(&server).search("x").await.unwrap_err();
    match err {
        BrowserError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Query parameter is required");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_filter_posts_selection_candidates_and_route() {
    let server = MockServer::start(vec![Route::post("/filter", plain_images(2..=2))]).await;

    let mut filters = FilterSelection::new();
    filters
        .toggle_value(FilterCategory::Rooks, FilterValue::Count(2))
        .unwrap();
    filters
        .toggle_value(FilterCategory::Pawns, FilterValue::AtLeast(9))
        .unwrap();

    let images = backend(&server)
        .filter(FilterRequest {
            filters,
            puzzle_ids: ids(1..=3),
            game_state: Strategy::Ml,
        })
        .await
        .unwrap();
    assert_eq!(images.len(), 1);

    let body = server.requests_to("/filter")[0].json();
    assert_eq!(body["filters"], serde_json::json!({"rooks": [2], "pawns": ["9+"]}));
    assert_eq!(body["puzzle_ids"], serde_json::json!(["1", "2", "3"]));
    assert_eq!(
        body["game_state_filter_endpoint"],
        format!("{}/filter/game-state-ml", server.base_url)
    );
}

#[tokio::test]
async fn test_recommendations_route_by_strategy() {
    let server = MockServer::start(vec![
        Route::post("/rdf-recommendations", plain_images(50..=51)),
        Route::post("/ml-recommendations", plain_images(60..=60)),
    ])
    .await;
    let backend = backend(&server);

    let rdf = backend.recommendations(Strategy::Rdf, ids(1..=2)).await.unwrap();
    let ml = backend.recommendations(Strategy::Ml, ids(1..=2)).await.unwrap();
    assert_eq!(rdf.len(), 2);
    assert_eq!(ml[0].id, PuzzleId::from("60"));

    let body = server.requests_to("/ml-recommendations")[0].json();
    assert_eq!(body, serde_json::json!({"puzzle_ids": ["1", "2"]}));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(
        Endpoints::new(&format!("http://{addr}")).unwrap(),
        Duration::from_secs(2),
        Duration::from_secs(1),
    )
    .unwrap();
    assert!(matches!(
        backend.initial().await,
        Err(BrowserError::Transport(_))
    ));
}

// ============================================================================
// Browsing session
// ============================================================================

#[tokio::test]
async fn test_session_over_http() {
    let server = MockServer::start(vec![
        Route::get("/initial", plain_images(1..=10)),
        Route::get("/search", plain_images(1..=5)),
        Route::post("/rdf-recommendations", plain_images(70..=73)),
    ])
    .await;
    let mut browser = Browser::new(backend(&server), BrowserState::default());

    browser.dispatch(BrowserAction::Startup);
    browser.settle().await;
    assert!(server.requests_to("/rdf-recommendations").is_empty());

    browser.dispatch(BrowserAction::Search("rook".to_string()));
    browser.settle().await;

    let view = browser.view();
    assert_eq!(view.gallery.images.len(), 5);
    assert_eq!(browser.state().recommendations.len(), 4);
    assert!(!view.recommendations.loading);

    let recs = server.requests_to("/rdf-recommendations");
    assert_eq!(recs.len(), 1);
    assert_eq!(
        recs[0].json()["puzzle_ids"],
        serde_json::json!(["1", "2", "3", "4", "5"])
    );
}
