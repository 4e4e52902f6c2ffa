//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use smarthouse_domain::error::SmartHouseError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Error returned by API handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    /// Failure reported by the service layer.
    Service(SmartHouseError),
    /// Path, query or body the extractors could not parse.
    Rejected { status: StatusCode, message: String },
}

impl From<SmartHouseError> for ApiError {
    fn from(err: SmartHouseError) -> Self {
        Self::Service(err)
    }
}

impl ApiError {
    pub(crate) fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Service(SmartHouseError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            Self::Service(
                SmartHouseError::NotFound(_)
                | SmartHouseError::OutOfRange(_)
                | SmartHouseError::NoMeasurements(_),
            ) => StatusCode::NOT_FOUND,
            Self::Service(SmartHouseError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Service(SmartHouseError::Storage(err)) => {
                tracing::error!(error = %err, "storage error");
                "internal server error".to_string()
            }
            Self::Service(err) => err.to_string(),
            Self::Rejected { message, .. } => message,
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
