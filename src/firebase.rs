// Client for the Firebase realtime database REST API. A single read of the
// root `data` collection is all the service ever needs; the client owns a
// `reqwest::Client` built once at startup with the configured timeout.
use crate::config::FirebaseSettings;
use reqwest::StatusCode;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

/// Raw telemetry collection as returned by the store: record id -> fields.
pub type RawCollection = Map<String, Value>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("request to Firebase failed: {0}")]
    Request(reqwest::Error),
    #[error("Firebase responded with status {0}")]
    Status(StatusCode),
    #[error("Firebase returned malformed JSON: {0}")]
    Body(#[from] serde_json::Error),
    #[error("Firebase returned a JSON {0} where an object was expected")]
    UnexpectedShape(&'static str),
}

#[derive(Clone)]
pub struct TelemetryClient {
    http: reqwest::Client,
}

impl TelemetryClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(TelemetryClient { http })
    }

    /// Fetch the whole telemetry collection with
    /// `GET <db_url>/data.json?auth=<token>`.
    ///
    /// Request errors are stripped of their URL before being returned, since
    /// the URL carries the auth token in its query string.
    pub async fn fetch_collection(&self, settings: &FirebaseSettings) -> Result<RawCollection, FetchError> {
        let response = self
            .http
            .get(settings.collection_url())
            .query(&[("auth", settings.auth_token.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::Request(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(e.without_url()))?;
        parse_collection(&body)
    }
}

/// Interpret a response body as a telemetry collection. An empty body or
/// `null` is an empty collection. Arrays, which Firebase produces when child
/// keys are sequential integers, are re-keyed by index.
pub fn parse_collection(body: &[u8]) -> Result<RawCollection, FetchError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RawCollection::new());
    }

    match serde_json::from_slice::<Value>(body)? {
        Value::Null => Ok(RawCollection::new()),
        Value::Object(map) => Ok(map),
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect()),
        Value::Bool(_) => Err(FetchError::UnexpectedShape("boolean")),
        Value::Number(_) => Err(FetchError::UnexpectedShape("number")),
        Value::String(_) => Err(FetchError::UnexpectedShape("string")),
    }
}
