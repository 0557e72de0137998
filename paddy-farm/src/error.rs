use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use paddy::error::ProviderError;
use paddy::schedule::UnknownStatus;
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FarmError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),
    #[error("{0}")]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Status(#[from] UnknownStatus),
    #[error("login required")]
    Unauthorized,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("IC {0} is already registered")]
    AlreadyRegistered(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("invalid {0}: {1}")]
    Invalid(&'static str, String),
    #[error("yield model not loaded")]
    ModelUnavailable,
}

impl FarmError {
    pub fn status(&self) -> StatusCode {
        match self {
            FarmError::Database(_) | FarmError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FarmError::Provider(ProviderError::NotFound(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            FarmError::Provider(_) => StatusCode::BAD_GATEWAY,
            FarmError::Status(_) | FarmError::Invalid(..) => StatusCode::BAD_REQUEST,
            FarmError::Unauthorized | FarmError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            FarmError::AlreadyRegistered(_) => StatusCode::CONFLICT,
            FarmError::NotFound(_) => StatusCode::NOT_FOUND,
            FarmError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for FarmError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
