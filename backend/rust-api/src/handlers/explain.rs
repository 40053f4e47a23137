use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

use crate::{
    models::explanation::{ExplainRequest, ExplainResponse},
    services::AppState,
};

/// Explanation failures never fail the request: configuration, transport
/// and parse problems all come back as a 200 with an inline warning so the
/// rest of the session stays usable.
pub async fn explain(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExplainRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if let Err(e) = req.validate() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, e.to_string()));
    }

    match state.explainer.explain(&req.prompt).await {
        Ok(explanation) => Ok((
            StatusCode::OK,
            Json(ExplainResponse::from_explanation(explanation)),
        )),
        Err(e) => {
            tracing::warn!("Explanation unavailable: {}", e);
            Ok((StatusCode::OK, Json(ExplainResponse::from_warning(e.to_string()))))
        }
    }
}
