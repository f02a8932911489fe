// HTTP handlers for the `/api` routes. Data handlers run the whole pipeline
// on every request: fetch the collection from Firebase, normalize, sort.
// Nothing is cached between requests.
use crate::config::Config;
use crate::error::ApiError;
use crate::firebase::{RawCollection, TelemetryClient};
use crate::readings::{self, Reading};
use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Shared, read-only state handed to every handler via an `Extension` layer.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: TelemetryClient,
}

impl AppState {
    async fn load_collection(&self) -> Result<RawCollection, ApiError> {
        let settings = self.config.firebase.as_ref().ok_or(ApiError::ConfigMissing)?;
        Ok(self.client.fetch_collection(settings).await?)
    }
}

#[derive(Debug, Serialize)]
pub struct Placeholder {
    pub message: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    pub firebase_configured: bool,
}

/// `GET /api/data/all`: every reading, oldest first.
pub async fn all_readings(Extension(state): Extension<AppState>) -> Result<Json<Vec<Reading>>, ApiError> {
    let raw = state.load_collection().await?;
    Ok(Json(readings::ordered(&raw)))
}

/// `GET /api/data/last`: the newest reading, or `{}` when there is none.
pub async fn last_reading(Extension(state): Extension<AppState>) -> Result<Response, ApiError> {
    let raw = state.load_collection().await?;
    Ok(match readings::latest(&raw) {
        Some(reading) => Json(reading).into_response(),
        None => Json(json!({})).into_response(),
    })
}

/// `POST /api/predict`: forecasting is not implemented yet. The request body
/// is ignored.
pub async fn predict() -> Json<Placeholder> {
    Json(Placeholder {
        message: "Prediction module not yet implemented.",
        status: "coming_soon",
    })
}

pub async fn status(Extension(state): Extension<AppState>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "running",
        firebase_configured: state.config.firebase_configured(),
    })
}
