//! API error type and its JSON response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Error body: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The store could not be queried. The message is passed through as-is.
    #[error("{0}")]
    Store(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!(status = status.as_u16(), error = %self, "request failed");
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // `{:#}` keeps the context chain down to the SQLite message
        ApiError::Store(format!("{err:#}"))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Store(format!("query task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn store_error_is_500_with_message() {
        let response = ApiError::Store("no such table: drugs".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "no such table: drugs");
    }

    #[test]
    fn anyhow_chain_is_flattened() {
        let err = anyhow::anyhow!("disk I/O error").context("listing drugs");
        let api: ApiError = err.into();
        assert_eq!(api.to_string(), "listing drugs: disk I/O error");
    }
}
