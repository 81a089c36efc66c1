use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::sheets::SheetsError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = Json(ErrorResponse {
            error: status
                .canonical_reason()
                .unwrap_or(status.as_str())
                .to_string(),
            message,
        });
        (status, body).into_response()
    }
}

impl From<SheetsError> for ApiError {
    fn from(value: SheetsError) -> Self {
        error!("Spreadsheet read failed: {value}");
        ApiError::Internal("Internal Server Error".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_sheets_error_hides_detail() {
        let err = ApiError::from(SheetsError::Status {
            status: 403,
            body: "caller does not have permission".into(),
        });
        match err {
            ApiError::Internal(msg) => assert!(!msg.contains("permission")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
