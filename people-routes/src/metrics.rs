use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::IntoResponse;
use error_stack::{Report, ResultExt};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tokio::time::Instant;

const PEOPLE_RETRIEVED_METRIC_NAME: &str = "people_retrieved";
const PEOPLE_CREATED_METRIC_NAME: &str = "people_created";
const PEOPLE_UPDATED_METRIC_NAME: &str = "people_updated";
const PEOPLE_DELETED_METRIC_NAME: &str = "people_deleted";
const PEOPLE_IMPORTED_METRIC_NAME: &str = "people_imported";

const REQUESTS_TOTAL_METRIC_NAME: &str = "http_requests_total";
const REQUEST_DURATION_METRIC_NAME: &str = "http_requests_duration_seconds";
const REQUEST_SIZE_METRIC_NAME: &str = "http_request_size";

#[derive(Debug, thiserror::Error)]
#[error("failed to set up the prometheus recorder")]
pub struct MetricsSetupErr;

/// Installs the process wide prometheus recorder. Can only succeed once per process.
pub fn setup_recorder() -> Result<PrometheusHandle, Report<MetricsSetupErr>> {
    const EXPONENTIAL_SECONDS: &[f64] = &[0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

    const REQ_RES_BUCKETS: &[f64] = &[128.0, 256.0, 512.0, 1024.0, 2048.0, 4096.0, 8192.0, 16384.0];

    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_DURATION_METRIC_NAME.to_string()),
            EXPONENTIAL_SECONDS,
        )
        .change_context(MetricsSetupErr)?
        .set_buckets_for_metric(
            Matcher::Full(REQUEST_SIZE_METRIC_NAME.to_string()),
            REQ_RES_BUCKETS,
        )
        .change_context(MetricsSetupErr)?
        .install_recorder()
        .change_context(MetricsSetupErr)
}

pub async fn track_http(req: Request, next: Next) -> impl IntoResponse {
    let path = if let Some(matched_path) = req.extensions().get::<MatchedPath>() {
        matched_path.as_str().to_owned()
    } else {
        req.uri().path().to_owned()
    };

    if path.ends_with("metrics") {
        return next.run(req).await;
    }

    let method = req.method().clone();

    let req_size = req
        .headers()
        .get("Content-Length")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok());

    if let Some(req_size) = req_size {
        metrics::histogram!(REQUEST_SIZE_METRIC_NAME).record(req_size as f64);
    }

    let start = Instant::now();
    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    let labels = [
        ("method", method.to_string()),
        ("path", path),
        ("status", status),
    ];

    metrics::counter!(REQUESTS_TOTAL_METRIC_NAME, &labels).increment(1);
    metrics::histogram!(REQUEST_DURATION_METRIC_NAME, &labels).record(latency);
    response
}

#[inline]
fn increment_by(name: &'static str, amt: usize) {
    metrics::counter!(name).increment(u64::try_from(amt).unwrap_or(u64::MAX));
}

#[inline]
pub fn increment_people_retrieved() {
    increment_people_retrieved_by(1);
}

#[inline]
pub fn increment_people_retrieved_by(amt: usize) {
    increment_by(PEOPLE_RETRIEVED_METRIC_NAME, amt);
}

#[inline]
pub fn increment_people_created() {
    increment_by(PEOPLE_CREATED_METRIC_NAME, 1);
}

#[inline]
pub fn increment_people_updated() {
    increment_by(PEOPLE_UPDATED_METRIC_NAME, 1);
}

#[inline]
pub fn increment_people_deleted() {
    increment_by(PEOPLE_DELETED_METRIC_NAME, 1);
}

#[inline]
pub fn increment_people_imported_by(amt: usize) {
    increment_by(PEOPLE_IMPORTED_METRIC_NAME, amt);
}
