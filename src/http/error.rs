use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::RegistryError;

/// Everything a request can fail with, mapped onto the plain-text bodies game
/// servers already match on.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    UnknownPath,
    UpdateRejected(RegistryError),
    CloseRejected(RegistryError),
    Internal(RegistryError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::UnknownPath => StatusCode::NOT_FOUND,
            Self::UpdateRejected(_) | Self::CloseRejected(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> String {
        match self {
            Self::Unauthorized => "Unauthorized".into(),
            Self::UnknownPath => "Unknown Path".into(),
            Self::UpdateRejected(e) => format!("Failed to update: {e}"),
            Self::CloseRejected(e) => format!("Failed to close: {e}"),
            Self::Internal(_) => "Internal Server Error".into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(e) => tracing::error!("Request failed: {e}"),
            Self::UpdateRejected(e) | Self::CloseRejected(e) => {
                tracing::debug!("Rejected request body: {e}");
            }
            Self::Unauthorized | Self::UnknownPath => {}
        }
        (self.status(), self.body()).into_response()
    }
}

/// Response for a handler that panicked; the panic message is logged only.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "non-string panic payload"
    };
    tracing::error!("Request handler panicked: {detail}");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
