use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tasknest_shared::{ErrorBody, TaskId};
use tracing::error;

use crate::datastore::StoreError;

/// Failure of an API handler, rendered as a status code plus a JSON
/// `{"detail": ...}` body.
#[derive(Debug)]
pub enum ApiError {
    NotFound(TaskId),
    Unprocessable(String),
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::NotFound(id) => format!("Task {id} not found"),
            ApiError::Unprocessable(reason) => reason.clone(),
            ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::NotFound(id),
            StoreError::Invalid(reason) => ApiError::Unprocessable(reason),
            StoreError::Persist(err) => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(err) = &self {
            error!(error = %format!("{err:#}"), "request failed");
        }
        let body = ErrorBody {
            detail: self.detail(),
        };
        (self.status(), Json(body)).into_response()
    }
}
