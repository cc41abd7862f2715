use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use error_stack::Report;
use serde_json::json;
use std::error::Error;
use tracing::error;

/// Returned from endpoints when the service layer fails.
/// The report is logged and the caller only sees a 500.
#[derive(thiserror::Error)]
#[error("there was an error running the endpoint")]
pub struct EndpointError<T: Error + Send + Sync + 'static>(Report<T>);

impl<T: Error + Send + Sync + 'static> EndpointError<T> {
    pub fn report(&self) -> &Report<T> {
        &self.0
    }
}

impl<T: Error + Send + Sync + 'static> std::fmt::Debug for EndpointError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<T> From<Report<T>> for EndpointError<T>
where
    T: Error + Send + Sync + 'static,
{
    fn from(value: Report<T>) -> Self {
        Self(value)
    }
}

impl<T: Error + Send + Sync + 'static> IntoResponse for EndpointError<T> {
    fn into_response(self) -> Response {
        error!("endpoint failed: {:?}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "an internal error occurred" })),
        )
            .into_response()
    }
}
