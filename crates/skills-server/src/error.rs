//! API errors and their HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use skills_model::ValidationError;
use skills_review::ReviewError;
use skills_store::{FailureReason, StoreError};
use tracing::error;

/// Error returned by a handler
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Store rejected or failed the request
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Review edit or lifecycle violation
    #[error(transparent)]
    Review(ReviewError),

    /// Request body failed validation before reaching the store
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::Store(inner) => Self::Store(inner),
            other => Self::Review(other),
        }
    }
}

/// JSON body of an error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Store(err) => match err {
                StoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                StoreError::NotFound(_) | StoreError::SchemaNotFound => StatusCode::NOT_FOUND,
                StoreError::Conflict { .. } => StatusCode::CONFLICT,
                StoreError::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
                StoreError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Review(ReviewError::UnknownSkill { .. }) | Self::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Review(_) => StatusCode::CONFLICT,
        }
    }

    fn reason(&self) -> Option<FailureReason> {
        match self {
            Self::Store(err) => Some(err.reason()),
            Self::Validation(err) => Some(StoreError::Validation(err.clone()).reason()),
            Self::Review(_) => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "Request failed");
        }
        let body = ErrorBody {
            error: self.to_string(),
            reason: self.reason(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type ApiResult<T> = Result<T, ApiError>;
