use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::time::Instant;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::api::AppState;

/// Prometheus scrape endpoint. Returns 404 when the exporter is disabled
/// in config so the route can stay mounted unconditionally.
pub async fn get_metrics(State(state): State<AppState>) -> Response {
    match state.prometheus_handle() {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics are disabled").into_response(),
    }
}

/// Per-request log line plus counter/histogram emission. Each request gets
/// a short correlation id carried through the span.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = Uuid::new_v4().to_string()[..8].to_string();

    let span = info_span!("request", %method, %path, %request_id);

    async move {
        let start = Instant::now();
        let response = next.run(request).await;
        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        metrics::counter!(
            "motorly_http_requests_total",
            "method" => method.to_string(),
            "status" => status.to_string(),
        )
        .increment(1);
        metrics::histogram!("motorly_http_request_duration_seconds")
            .record(elapsed.as_secs_f64());

        info!(status, elapsed_ms = elapsed.as_millis() as u64, "handled");

        response
    }
    .instrument(span)
    .await
}
