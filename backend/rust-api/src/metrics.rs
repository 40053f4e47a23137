use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Question bank metrics
    pub static ref BANK_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "bank_requests_total",
        "Total number of question bank requests",
        &["endpoint", "status"]
    )
    .unwrap();

    pub static ref BANK_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "bank_request_duration_seconds",
        "Question bank request duration in seconds",
        &["endpoint"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Business Metrics
    pub static ref QUESTIONS_FETCHED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "questions_fetched_total",
        "Total number of questions fetched for practice",
        &["question_type"]
    )
    .unwrap();

    pub static ref BUZZES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "buzzes_total",
        "Total number of buzzes by the phase they interrupted",
        &["phase"]
    )
    .unwrap();

    pub static ref ANSWERS_SUBMITTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "answers_submitted_total",
        "Total number of answers submitted",
        &["question_type", "correct"]
    )
    .unwrap();

    pub static ref TOSSUPS_TIMED_OUT_TOTAL: IntCounterVec = register_int_counter_vec!(
        "tossups_timed_out_total",
        "Total number of tossups that reached the grace deadline unanswered",
        &["category"]
    )
    .unwrap();

    pub static ref EXPLANATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "explanations_total",
        "Total number of explanation requests by how they were served",
        &["source"]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Helper: track a question bank call with metrics
pub async fn track_bank_request<F, T, E>(endpoint: &str, future: F) -> Result<T, E>
where
    F: std::future::Future<Output = Result<T, E>>,
{
    let start = std::time::Instant::now();
    let result = future.await;
    let duration = start.elapsed().as_secs_f64();

    let status = if result.is_ok() { "success" } else { "error" };

    BANK_REQUESTS_TOTAL
        .with_label_values(&[endpoint, status])
        .inc();

    BANK_REQUEST_DURATION_SECONDS
        .with_label_values(&[endpoint])
        .observe(duration);

    result
}

/// Record how an explanation request was served (api, cache, error)
pub fn record_explanation(source: &str) {
    EXPLANATIONS_TOTAL.with_label_values(&[source]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        // Just verify that all metrics are properly registered
        let _ = HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/health", "200"])
            .get();
        let _ = BANK_REQUESTS_TOTAL
            .with_label_values(&["random-tossup", "success"])
            .get();
    }

    #[test]
    fn test_render_metrics() {
        // Increment a counter to ensure we have some data
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let result = render_metrics();
        assert!(result.is_ok());
        let output = result.unwrap();
        assert!(output.contains("http_requests_total"));
    }

    #[tokio::test]
    async fn test_track_bank_request_passes_result_through() {
        let ok: Result<u32, String> = track_bank_request("set-list", async { Ok(3) }).await;
        assert_eq!(ok, Ok(3));

        let err: Result<u32, String> =
            track_bank_request("set-list", async { Err("boom".to_string()) }).await;
        assert!(err.is_err());
    }
}
