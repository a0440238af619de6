use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("store error: {0}")]
    Store(#[from] lfsd_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            // Pages that cannot be rendered are reported as missing.
            Self::TemplateNotFound(_) | Self::Render(_) => StatusCode::NOT_FOUND,
            Self::AuthFailed(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, status.canonical_reason().unwrap_or_default()).into_response()
    }
}
