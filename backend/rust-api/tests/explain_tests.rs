use axum::http::StatusCode;
use serde_json::json;
use std::sync::atomic::Ordering;

mod common;

#[tokio::test]
async fn test_explanation_round_trip() {
    let generative = common::spawn_mock_generative("ok").await;
    let app = common::app_with_generative(Some(generative.url.clone())).await;

    let (status, body) = common::post_json(
        &app,
        "/api/v1/explain",
        json!({ "prompt": "Summarize William Shakespeare." }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["explanation"],
        "Shakespeare wrote Hamlet around 1600."
    );
    assert_eq!(body["image_search_query"], "William Shakespeare");
    assert!(body["image_search_url"]
        .as_str()
        .unwrap()
        .contains("google.com/search"));
    assert_eq!(body["recommended_reading"].as_array().unwrap().len(), 1);
    assert!(body["warning"].is_null());
}

#[tokio::test]
async fn test_explanations_are_memoized_by_prompt() {
    let generative = common::spawn_mock_generative("ok").await;
    let app = common::app_with_generative(Some(generative.url.clone())).await;

    for _ in 0..3 {
        let (status, _) = common::post_json(
            &app,
            "/api/v1/explain",
            json!({ "prompt": "Summarize William Shakespeare." }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(generative.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_malformed_generative_json_becomes_a_warning() {
    let generative = common::spawn_mock_generative("malformed").await;
    let app = common::app_with_generative(Some(generative.url.clone())).await;

    let (status, body) = common::post_json(
        &app,
        "/api/v1/explain",
        json!({ "prompt": "Summarize something." }),
    )
    .await;

    // no error status: an empty result with an inline warning
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["explanation"], "");
    assert!(body["warning"]
        .as_str()
        .unwrap()
        .contains("malformed JSON"));
}

#[tokio::test]
async fn test_missing_candidates_becomes_a_warning() {
    let generative = common::spawn_mock_generative("error").await;
    let app = common::app_with_generative(Some(generative.url.clone())).await;

    let (status, body) = common::post_json(
        &app,
        "/api/v1/explain",
        json!({ "prompt": "Summarize something." }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["warning"]
        .as_str()
        .unwrap()
        .contains("no candidates"));
}

#[tokio::test]
async fn test_missing_api_key_disables_the_feature_inline() {
    let app = common::app_with_generative(None).await;

    let (status, body) = common::post_json(
        &app,
        "/api/v1/explain",
        json!({ "prompt": "Summarize something." }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["warning"]
        .as_str()
        .unwrap()
        .contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn test_empty_prompt_is_rejected() {
    let generative = common::spawn_mock_generative("ok").await;
    let app = common::app_with_generative(Some(generative.url.clone())).await;

    let (status, _) = common::post_json(&app, "/api/v1/explain", json!({ "prompt": "" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(generative.hits.load(Ordering::SeqCst), 0);
}
