#![allow(dead_code)]

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::AppState;

/// CSP middleware adds Content-Security-Policy header to all responses
async fn csp_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self' 'unsafe-inline'; \
             style-src 'self' 'unsafe-inline'; \
             img-src 'self' data: https:; \
             connect-src 'self'",
        ),
    );
    response
}

pub fn create_router(app_state: std::sync::Arc<services::AppState>) -> Router {
    // CORS for the browser UI served from a separate origin
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any); // TODO: restrict to the UI origin in production

    Router::new()
        // Public endpoints
        .route("/health", get(handlers::health_check))
        // Metrics endpoint with Basic Auth protection
        .route(
            "/metrics",
            get(handlers::metrics_handler)
                .layer(middleware::from_fn(handlers::metrics_auth_middleware)),
        )
        .nest("/api/v1/trainer", trainer_routes())
        .route("/api/v1/search", post(handlers::search::submit_search))
        .route("/api/v1/search/page", post(handlers::search::turn_page))
        .nest("/api/v1/packets", packet_routes())
        .route("/api/v1/explain", post(handlers::explain::explain))
        .with_state(app_state)
        .layer(cors)
        .layer(middleware::from_fn(csp_middleware)) // Apply CSP to all responses
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn trainer_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new()
        .route("/question", post(handlers::trainer::new_question))
        .route("/state", get(handlers::trainer::get_state))
        .route("/start", post(handlers::trainer::start_reading))
        .route("/buzz", post(handlers::trainer::buzz))
        .route("/answer", post(handlers::trainer::submit_answer))
        .route("/bonus/answer", post(handlers::trainer::submit_bonus_answer))
        .route("/review", get(handlers::trainer::review))
        .route("/stream", get(handlers::sse::reading_stream))
}

fn packet_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new()
        .route("/sets", get(handlers::packets::list_sets))
        .route(
            "/sets/{set_name}/packets",
            get(handlers::packets::packet_count),
        )
        .route("/load", post(handlers::packets::load_packet))
}
