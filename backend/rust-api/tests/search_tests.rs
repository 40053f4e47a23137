use axum::http::StatusCode;
use serde_json::json;
use std::sync::atomic::Ordering;

mod common;

fn search_body(query: &str) -> serde_json::Value {
    json!({
        "query": query,
        "scope": "both",
        "question_type": "tossup",
        "difficulties": ["hs_regular"],
        "categories": ["literature"]
    })
}

#[tokio::test]
async fn test_search_starts_at_page_one_with_computed_page_count() {
    let app = common::create_test_app().await;

    let (status, body) = common::post_json(&app, "/api/v1/search", search_body("author")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "author");
    assert_eq!(body["page"], 1);
    // 23 matches at 10 per page
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["tossups"]["count"], 23);
    assert_eq!(body["bonuses"]["count"], 0);
}

#[tokio::test]
async fn test_page_turns_clamp_at_the_boundaries() {
    let bank = common::spawn_mock_bank().await;
    let app = common::app_with_bank_url(bank.url.clone()).await;

    common::post_json(&app, "/api/v1/search", search_body("author")).await;

    // previous from page 1 is a no-op
    let (status, body) = common::post_json(
        &app,
        "/api/v1/search/page",
        json!({ "direction": "previous" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);

    let (_, body) = common::post_json(&app, "/api/v1/search/page", json!({ "direction": "next" })).await;
    assert_eq!(body["page"], 2);
    assert_eq!(
        body["tossups"]["questionArray"][0]["question_sanitized"],
        "Search result page 2."
    );

    let (_, body) = common::post_json(&app, "/api/v1/search/page", json!({ "direction": "next" })).await;
    assert_eq!(body["page"], 3);

    // next from the last page serves the cached page without re-querying
    let queries_before = bank.hits.query.load(Ordering::SeqCst);
    let (status, body) =
        common::post_json(&app, "/api/v1/search/page", json!({ "direction": "next" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 3);
    assert_eq!(
        body["tossups"]["questionArray"][0]["question_sanitized"],
        "Search result page 3."
    );
    assert_eq!(bank.hits.query.load(Ordering::SeqCst), queries_before);
}

#[tokio::test]
async fn test_failed_search_preserves_the_previous_results() {
    let app = common::create_test_app().await;

    common::post_json(&app, "/api/v1/search", search_body("author")).await;

    // the bank blows up on this query
    let (status, _) = common::post_json(&app, "/api/v1/search", search_body("boom")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    // the earlier search session is intact and can still page
    let (status, body) =
        common::post_json(&app, "/api/v1/search/page", json!({ "direction": "next" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "author");
    assert_eq!(body["page"], 2);
}

#[tokio::test]
async fn test_page_turn_without_a_search_is_rejected() {
    let app = common::create_test_app().await;

    let (status, _) =
        common::post_json(&app, "/api/v1/search/page", json!({ "direction": "next" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
