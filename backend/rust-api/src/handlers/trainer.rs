use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    models::trainer::{NewQuestionRequest, SubmitAnswerRequest},
    services::{practice::PracticeService, AppState},
};

pub async fn new_question(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewQuestionRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!(
        "Requesting new {:?} question ({} difficulties, {} categories)",
        req.question_type,
        req.difficulties.len(),
        req.categories.len()
    );

    let mut session = state.session.lock().await;
    let service = PracticeService::new(&state.question_bank);

    match service.request_new_question(&mut session, req).await {
        Ok(snapshot) => Ok((StatusCode::OK, Json(snapshot))),
        Err(e) => {
            tracing::warn!("Failed to fetch question: {}", e);
            Err((e.status(), e.to_string()))
        }
    }
}

/// Polled by the UI; advances timed transitions before rendering.
pub async fn get_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    let service = PracticeService::new(&state.question_bank);
    let snapshot = service.tick(&mut session, Utc::now());
    (StatusCode::OK, Json(snapshot))
}

pub async fn start_reading(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut session = state.session.lock().await;
    let service = PracticeService::new(&state.question_bank);

    match service.start_reading(&mut session, Utc::now()) {
        Ok(snapshot) => Ok((StatusCode::OK, Json(snapshot))),
        Err(e) => Err((e.status(), e.to_string())),
    }
}

pub async fn buzz(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut session = state.session.lock().await;
    let service = PracticeService::new(&state.question_bank);

    match service.buzz(&mut session, Utc::now()) {
        Ok(snapshot) => Ok((StatusCode::OK, Json(snapshot))),
        Err(e) => Err((e.status(), e.to_string())),
    }
}

pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Judging tossup answer: {}", req.answer);

    let mut session = state.session.lock().await;
    let service = PracticeService::new(&state.question_bank);

    match service
        .submit_answer(&mut session, Utc::now(), req.answer)
        .await
    {
        Ok(snapshot) => Ok((StatusCode::OK, Json(snapshot))),
        Err(e) => {
            tracing::warn!("Failed to judge answer: {}", e);
            Err((e.status(), e.to_string()))
        }
    }
}

pub async fn submit_bonus_answer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Judging bonus part answer: {}", req.answer);

    let mut session = state.session.lock().await;
    let service = PracticeService::new(&state.question_bank);

    match service.submit_bonus_answer(&mut session, req.answer).await {
        Ok(snapshot) => Ok((StatusCode::OK, Json(snapshot))),
        Err(e) => {
            tracing::warn!("Failed to judge bonus part: {}", e);
            Err((e.status(), e.to_string()))
        }
    }
}

pub async fn review(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state.session.lock().await;
    let service = PracticeService::new(&state.question_bank);

    match service.review(&session) {
        Ok(payload) => Ok((StatusCode::OK, Json(payload))),
        Err(e) => Err((e.status(), e.to_string())),
    }
}
