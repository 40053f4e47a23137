use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use crate::{
    models::search::{PageTurnRequest, SearchRequest},
    services::{practice::PracticeService, AppState},
};

pub async fn submit_search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Searching question database for '{}'", req.query);

    let mut session = state.session.lock().await;
    let service = PracticeService::new(&state.question_bank);

    match service.submit_search(&mut session, req).await {
        Ok(results) => Ok((StatusCode::OK, Json(results))),
        Err(e) => {
            tracing::warn!("Search failed: {}", e);
            Err((e.status(), e.to_string()))
        }
    }
}

pub async fn turn_page(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PageTurnRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut session = state.session.lock().await;
    let service = PracticeService::new(&state.question_bank);

    match service.turn_search_page(&mut session, req.direction).await {
        Ok(results) => Ok((StatusCode::OK, Json(results))),
        Err(e) => {
            tracing::warn!("Page turn failed: {}", e);
            Err((e.status(), e.to_string()))
        }
    }
}
