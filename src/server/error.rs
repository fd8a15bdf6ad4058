use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use crate::utils::DreError;

/// JSON error body: `{ error, details }`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Pipeline error crossing the request boundary
#[derive(Debug)]
pub struct ApiError(pub DreError);

impl From<DreError> for ApiError {
    fn from(err: DreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        } else {
            warn!(error = %self.0, "Request rejected");
        }

        let body = ErrorBody {
            error: self.0.user_message().to_string(),
            details: self.0.details(),
        };
        (status, Json(body)).into_response()
    }
}
