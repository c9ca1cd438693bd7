//! Maps service failures onto HTTP statuses without leaking internals.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::DomainError;
use serde_json::json;
use services::ServiceError;
use tracing::error;

#[derive(Debug)]
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(ServiceError::Domain(err))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(ServiceError::Repository(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            ServiceError::Duplicate(_) => (StatusCode::CONFLICT, self.0.to_string()),
            ServiceError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            ServiceError::Domain(DomainError::PermissionDenied(_)) => {
                (StatusCode::FORBIDDEN, self.0.to_string())
            }
            ServiceError::Domain(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.0.to_string()),
            ServiceError::Repository(err) => {
                error!(error = %err, "request failed on the storage layer");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
