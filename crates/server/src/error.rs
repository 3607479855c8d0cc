use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failures talking to the Chess.com API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection failure, timeout or undecodable transfer
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response arrived but is not the JSON shape we expect
    #[error("unexpected response shape from {url}: {detail}")]
    Shape { url: String, detail: String },
}

impl ClientError {
    pub fn is_shape(&self) -> bool {
        matches!(self, ClientError::Shape { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Invalid stored JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Unavailable(String),
}

/// Why one player's transaction was abandoned.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("archive {url} could not be fetched: {source}")]
    Archive {
        url: String,
        #[source]
        source: ClientError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}
