#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    extract::{Query, State},
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

use quizhall_api::{config::Config, create_router, services::AppState};

/// Per-endpoint hit counters so tests can assert memoization.
#[derive(Default)]
pub struct BankHits {
    pub set_list: AtomicUsize,
    pub num_packets: AtomicUsize,
    pub query: AtomicUsize,
}

pub struct MockBank {
    pub url: String,
    pub hits: Arc<BankHits>,
}

pub struct MockGenerative {
    pub url: String,
    pub hits: Arc<AtomicUsize>,
}

pub async fn create_test_app() -> Router {
    let bank = spawn_mock_bank().await;
    app_with_bank_url(bank.url).await
}

pub async fn app_with_bank_url(bank_url: String) -> Router {
    init_tracing();
    let config = test_config(bank_url, None);
    create_router(Arc::new(AppState::new(config)))
}

pub async fn app_with_generative(generative_url: Option<String>) -> Router {
    init_tracing();
    let bank = spawn_mock_bank().await;
    let config = test_config(bank.url, generative_url);
    create_router(Arc::new(AppState::new(config)))
}

pub fn test_config(question_bank_url: String, generative: Option<String>) -> Config {
    Config {
        bind_addr: "127.0.0.1:0".to_string(),
        question_bank_url,
        generative_model: "gemini-2.0-flash".to_string(),
        // the key is only present when a generative mock is wired in
        gemini_api_key: generative.as_ref().map(|_| "test-key".to_string()),
        generative_api_url: generative.unwrap_or_else(|| "http://127.0.0.1:9".to_string()),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// --- request helpers ---

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    split_response(response).await
}

pub async fn post_empty(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    split_response(response).await
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    split_response(response).await
}

async fn split_response(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| json!({ "raw": String::from_utf8_lossy(&bytes).to_string() }));
    (status, body)
}

// --- mock question bank ---

pub async fn spawn_mock_bank() -> MockBank {
    let hits = Arc::new(BankHits::default());
    let app = Router::new()
        .route("/random-tossup", get(mock_random_tossup))
        .route("/random-bonus", get(mock_random_bonus))
        .route("/check-answer", get(mock_check_answer))
        .route("/set-list", get(mock_set_list))
        .route("/num-packets", get(mock_num_packets))
        .route("/query", get(mock_query))
        .route("/packet", get(mock_packet))
        .with_state(hits.clone());
    let url = spawn_server(app).await;
    MockBank { url, hits }
}

pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn sample_tossup() -> serde_json::Value {
    json!({
        "question": "This author wrote <i>Hamlet</i>. He was born in Stratford. For 10 points, name him.",
        "question_sanitized": "This author wrote Hamlet. He was born in Stratford. For 10 points, name him.",
        "answer": "William <b>Shakespeare</b>",
        "answer_sanitized": "William Shakespeare",
        "category": "Literature",
        "difficulty": 3,
        "set": { "name": "Test Set 2024" }
    })
}

fn sample_bonus() -> serde_json::Value {
    json!({
        "leadin": "For 10 points each, name these European capitals.",
        "leadin_sanitized": "For 10 points each, name these European capitals.",
        "parts": [
            "This city lies on the Seine.",
            "This city lies on the Tiber.",
            "This city lies on the Spree."
        ],
        "parts_sanitized": [
            "This city lies on the Seine.",
            "This city lies on the Tiber.",
            "This city lies on the Spree."
        ],
        "answers": ["Paris", "Rome", "Berlin"],
        "answers_sanitized": ["Paris", "Rome", "Berlin"],
        "category": "Geography",
        "difficulty": 3,
        "set": { "name": "Test Set 2024" }
    })
}

async fn mock_random_tossup() -> Json<serde_json::Value> {
    Json(json!({ "tossups": [sample_tossup()] }))
}

async fn mock_random_bonus() -> Json<serde_json::Value> {
    Json(json!({ "bonuses": [sample_bonus()] }))
}

/// Accepts when the answer line contains the submitted text, which is close
/// enough to the real judge for flow tests.
async fn mock_check_answer(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
    let answerline = params.get("answerline").cloned().unwrap_or_default();
    let given = params
        .get("givenAnswer")
        .cloned()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    let directive = if !given.is_empty() && answerline.to_lowercase().contains(&given) {
        "accept"
    } else {
        "reject"
    };
    Json(json!({ "directive": directive }))
}

async fn mock_set_list(State(hits): State<Arc<BankHits>>) -> Json<serde_json::Value> {
    hits.set_list.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "setList": ["Test Set 2024", "Another Set 2023"] }))
}

async fn mock_num_packets(
    State(hits): State<Arc<BankHits>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    hits.num_packets.fetch_add(1, Ordering::SeqCst);
    let count = if params.get("setName").map(String::as_str) == Some("Empty Set") {
        0
    } else {
        3
    };
    Json(json!({ "numPackets": count }))
}

/// 23 matching tossups, no bonuses; each returned question carries the page
/// number so tests can see which page was actually fetched. A query string
/// of "boom" fails, for prior-state-preservation tests.
async fn mock_query(
    State(hits): State<Arc<BankHits>>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    hits.query.fetch_add(1, Ordering::SeqCst);
    if params.get("queryString").map(String::as_str) == Some("boom") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "query exploded").into_response();
    }
    let page = params
        .get("tossupPagination")
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(1);
    let mut tossup = sample_tossup();
    tossup["question_sanitized"] = json!(format!("Search result page {}.", page));
    Json(json!({
        "tossups": { "count": 23, "questionArray": [tossup] },
        "bonuses": { "count": 0, "questionArray": [] }
    }))
    .into_response()
}

async fn mock_packet(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
    let number = params
        .get("packetNumber")
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(1);
    Json(json!({
        "number": number,
        "tossups": [sample_tossup()],
        "bonuses": [sample_bonus()]
    }))
}

// --- mock generative endpoint ---

pub async fn spawn_mock_generative(mode: &'static str) -> MockGenerative {
    let hits = Arc::new(AtomicUsize::new(0));
    let handler_hits = hits.clone();
    let app = Router::new().fallback(move || {
        let hits = handler_hits.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            let body = match mode {
                "ok" => {
                    let structured = json!({
                        "explanation": "Shakespeare wrote Hamlet around 1600.",
                        "image_search_query": "William Shakespeare",
                        "recommended_reading": [
                            {
                                "title": "William Shakespeare - Wikipedia",
                                "url": "https://en.wikipedia.org/wiki/William_Shakespeare"
                            }
                        ]
                    });
                    json!({
                        "candidates": [
                            { "content": { "parts": [ { "text": structured.to_string() } ] } }
                        ]
                    })
                }
                "malformed" => json!({
                    "candidates": [
                        { "content": { "parts": [ { "text": "{ this is not json" } ] } }
                    ]
                }),
                _ => json!({ "error": { "message": "quota exceeded" } }),
            };
            Json(body)
        }
    });
    let url = spawn_server(app).await;
    MockGenerative { url, hits }
}
