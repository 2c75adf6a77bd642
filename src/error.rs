use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Failures surfaced by the API layer.
///
/// Everything above the extraction layer collapses to two HTTP codes: 404 for
/// a game the lineup page doesn't list, 500 for every render, navigation, or
/// lookup failure. Extraction misses are not errors at all; they degrade to
/// empty or partial structures inside the extractors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("game not found")]
    GameNotFound,

    #[error("could not resolve a player id for '{0}'")]
    PlayerNotResolvable(String),

    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::GameNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::NOT_FOUND {
            warn!("request failed: {}", self);
        } else {
            error!("request failed: {:#}", self);
        }
        let body = Json(json!({
            "status": "error",
            "detail": self.to_string(),
        }));
        (status, body).into_response()
    }
}
