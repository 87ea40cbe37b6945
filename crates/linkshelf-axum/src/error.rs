use axum::{
    Json,
    extract::rejection::BytesRejection,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use linkshelf_core::LinksError;
use serde_json::json;

/// Errors decoding a request before it reaches the core
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum RequestError {
    #[error("JSON decode error: {0}")]
    JsonDecodeError(serde_json::Error),
    #[error("query decode error: {0}")]
    QueryDecodeError(String),
    #[error("failed to read request body: {}", .0.body_text())]
    Body(BytesRejection),
}

/// Anything a handler can fail with
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ApiError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Links(#[from] LinksError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Request(#[from] RequestError),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Links(LinksError::Unauthenticated) => {
                (StatusCode::UNAUTHORIZED, "Unauthenticated")
            }
            ApiError::Links(LinksError::Forbidden { .. }) => (StatusCode::FORBIDDEN, "Forbidden"),
            ApiError::Links(LinksError::InvalidCursor(_)) => {
                (StatusCode::BAD_REQUEST, "InvalidCursor")
            }
            ApiError::Links(LinksError::LinkNotFound(_)) => (StatusCode::NOT_FOUND, "LinkNotFound"),
            ApiError::Links(LinksError::Store(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "InternalServerError")
            }
            // keeps axum's status, e.g. 413 for an oversized body
            ApiError::Request(RequestError::Body(rejection)) => {
                (rejection.status(), "InvalidRequest")
            }
            ApiError::Request(_) => (StatusCode::BAD_REQUEST, "InvalidRequest"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!("request rejected: {}", message);
        }

        (
            status,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )],
            Json(json!({
                "error": error_code,
                "message": message,
            })),
        )
            .into_response()
    }
}
