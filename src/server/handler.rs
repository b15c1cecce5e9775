//! HTTP handlers
//!
//! Translates `PUT /{topic}?v=...` into `publish` and `GET /{topic}?timeout=...`
//! into `consume`. Every other method gets 405.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use thiserror::Error;

use crate::registry::{Message, RegistryError, TopicName, TopicRegistry};

use super::config::ServerConfig;

/// Error returned to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    /// Registry-level failure
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Verb other than GET or PUT
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Registry(RegistryError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            ApiError::Registry(RegistryError::Timeout(_)) => StatusCode::NOT_FOUND,
            ApiError::Registry(RegistryError::CapacityExceeded(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = status.as_u16(), error = %self, "Request failed");
        (status, self.to_string()).into_response()
    }
}

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    registry: Arc<TopicRegistry>,
    default_timeout: Duration,
}

/// Query string as ordered key/value pairs
///
/// Repeated keys are allowed; lookups take the first occurrence.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// First value for `key`, if present
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Build the broker router
///
/// The topic is the whole path after the leading `/`.
pub fn router(registry: Arc<TopicRegistry>, config: &ServerConfig) -> Router {
    let state = AppState {
        registry,
        default_timeout: config.default_consume_timeout,
    };

    Router::new()
        .route(
            "/",
            get(empty_topic)
                .head(method_not_allowed)
                .put(empty_topic)
                .fallback(method_not_allowed),
        )
        .route(
            "/{*topic}",
            get(consume)
                .head(method_not_allowed)
                .put(publish)
                .fallback(method_not_allowed),
        )
        .with_state(state)
}

/// Parse the `timeout` query value in whole seconds
///
/// Missing or empty values fall back to `default`. Anything that is not a
/// positive integer is rejected.
pub fn parse_timeout(raw: Option<&str>, default: Duration) -> Result<Duration, RegistryError> {
    match raw {
        None | Some("") => Ok(default),
        Some(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(RegistryError::InvalidRequest(format!(
                "timeout must be a positive integer, got {raw:?}"
            ))),
        },
    }
}

async fn publish(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<StatusCode, ApiError> {
    let topic = TopicName::new(topic)?;
    let message = Message::new(params.first("v").unwrap_or_default())?;

    state.registry.publish(&topic, message).await?;

    Ok(StatusCode::OK)
}

async fn consume(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
    let topic = TopicName::new(topic)?;
    let timeout = parse_timeout(params.first("timeout"), state.default_timeout)?;

    let message = state.registry.consume(&topic, timeout).await?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        message.into_bytes(),
    )
        .into_response())
}

async fn empty_topic() -> ApiError {
    ApiError::Registry(RegistryError::InvalidRequest("empty path".into()))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
