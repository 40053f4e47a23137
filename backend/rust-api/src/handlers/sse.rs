use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
};
use chrono::Utc;
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::services::{
    practice::PracticeService,
    reveal_engine::{RevealPhase, WORD_INTERVAL_MS},
    AppState,
};

/// SSE endpoint for the word-by-word reveal
/// GET /api/v1/trainer/stream
///
/// Ticks the reveal machine on its own interval so clients do not have to
/// poll `/state`; the stream ends once the tossup is over (or immediately
/// when nothing is being read).
pub async fn reading_stream(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tracing::info!("Client connected to reveal stream");
    let stream = create_reveal_stream(state);
    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn create_reveal_stream(state: Arc<AppState>) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold((state, false), |(state, final_sent)| async move {
        if final_sent {
            return None;
        }

        sleep(Duration::from_millis(WORD_INTERVAL_MS as u64)).await;

        let snapshot = {
            let mut session = state.session.lock().await;
            let service = PracticeService::new(&state.question_bank);
            service.tick(&mut session, Utc::now())
        };

        let finished = snapshot
            .tossup
            .as_ref()
            .map_or(true, |t| t.phase == RevealPhase::Over);

        let event_name = if finished { "reveal-over" } else { "reveal-tick" };
        let event = Event::default()
            .event(event_name)
            .data(serde_json::to_string(&snapshot).unwrap_or_else(|_| "{}".to_string()));

        if finished {
            tracing::info!("Reveal stream finished");
        }

        Some((Ok(event), (state, finished)))
    })
}
