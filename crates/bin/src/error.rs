//! HTTP error responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use stockscope::{DataError, Error};
use tracing::{error, warn};

/// A service error on its way to the client as `{success: false, error}`.
#[derive(Debug)]
pub(crate) struct AppError(Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::from(DataError::InvalidParameter(rejection.body_text())))
    }
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match &self.0 {
            err if err.is_invalid_input() => StatusCode::BAD_REQUEST,
            Error::InsightsUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        } else {
            warn!(error = %self.0, "Rejected request");
        }

        let body = Json(json!({ "success": false, "error": self.0.user_message() }));
        (status, body).into_response()
    }
}
