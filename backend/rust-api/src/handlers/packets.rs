use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::{
    models::packet::LoadPacketRequest,
    services::{practice::PracticeService, AppState},
};

pub async fn list_sets(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let service = PracticeService::new(&state.question_bank);

    match service.list_sets().await {
        Ok(sets) => Ok((StatusCode::OK, Json(json!({ "sets": sets })))),
        Err(e) => {
            tracing::warn!("Failed to list sets: {}", e);
            Err((e.status(), e.to_string()))
        }
    }
}

pub async fn packet_count(
    State(state): State<Arc<AppState>>,
    Path(set_name): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let service = PracticeService::new(&state.question_bank);

    match service.packet_count(&set_name).await {
        Ok(count) => Ok((
            StatusCode::OK,
            Json(json!({ "set_name": set_name, "num_packets": count })),
        )),
        Err(e) => {
            tracing::warn!("Failed to count packets for {}: {}", set_name, e);
            Err((e.status(), e.to_string()))
        }
    }
}

pub async fn load_packet(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoadPacketRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Loading packet {} of {}", req.packet_number, req.set_name);

    let mut session = state.session.lock().await;
    let service = PracticeService::new(&state.question_bank);

    match service.load_packet(&mut session, req).await {
        Ok(packet) => Ok((StatusCode::OK, Json(packet))),
        Err(e) => {
            tracing::warn!("Failed to load packet: {}", e);
            Err((e.status(), e.to_string()))
        }
    }
}
