// Errors surfaced by the data endpoints. Every variant is answered with a
// 500 and a `{"detail": ...}` body, and logged before it leaves the service.
use crate::firebase::FetchError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Firebase configuration is missing (FIREBASE_DB_URL / FIREBASE_AUTH_TOKEN)")]
    ConfigMissing,
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "failed to load telemetry");
        let body = Json(json!({ "detail": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
