use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::backend::BackendError;
use crate::engine::paginate::PageError;
use crate::engine::time_range::RangeError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorObject,
}

#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub code: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(&'static str, String),
    BadRequest(&'static str, String),
    /// Backend answered with a non-success status; that status is kept.
    Upstream(StatusCode, String),
    BadGateway(String),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized("UNAUTHORIZED", "Missing or malformed token".into())
    }

    pub fn missing_user_id() -> Self {
        ApiError::Unauthorized("UNAUTHORIZED", "Missing X-User-ID header".into())
    }

    pub fn invalid_credentials() -> Self {
        ApiError::Unauthorized("INVALID_CREDENTIALS", "Phone number or password is incorrect".into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::BadRequest("VALIDATION_ERROR", msg.into())
    }

    fn to_error_response(code: &str, message: &str) -> Json<ErrorResponse> {
        Json(ErrorResponse {
            error: ErrorObject {
                code: code.to_string(),
                message: message.to_string(),
            },
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(code, msg) => {
                (StatusCode::UNAUTHORIZED, ApiError::to_error_response(code, &msg)).into_response()
            }
            ApiError::BadRequest(code, msg) => {
                (StatusCode::BAD_REQUEST, ApiError::to_error_response(code, &msg)).into_response()
            }
            ApiError::Upstream(status, msg) => {
                (status, ApiError::to_error_response("UPSTREAM_ERROR", &msg)).into_response()
            }
            ApiError::BadGateway(msg) => (
                StatusCode::BAD_GATEWAY,
                ApiError::to_error_response("BAD_GATEWAY", &msg),
            )
                .into_response(),
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        tracing::warn!(error = %err, "backend request failed");
        match err {
            BackendError::Status { status, detail } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                ApiError::Upstream(status, detail)
            }
            BackendError::Transport(e) => ApiError::BadGateway(format!("backend unreachable: {e}")),
            BackendError::Decode(msg) => ApiError::BadGateway(format!("unexpected backend response: {msg}")),
        }
    }
}

impl From<RangeError> for ApiError {
    fn from(err: RangeError) -> Self {
        ApiError::BadRequest("INVALID_RANGE", err.to_string())
    }
}

impl From<PageError> for ApiError {
    fn from(err: PageError) -> Self {
        ApiError::BadRequest("PAGE_OUT_OF_RANGE", err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn upstream_status_is_preserved() {
        let err: ApiError = BackendError::Status {
            status: 403,
            detail: "nope".into(),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn invalid_upstream_status_becomes_bad_gateway() {
        let err: ApiError = BackendError::Status {
            status: 1000,
            detail: "?".into(),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn engine_errors_are_bad_requests() {
        let d = NaiveDate::from_ymd_opt(2025, 9, 22).unwrap();
        let range: ApiError = RangeError::Inverted { start: d, end: d }.into();
        assert_eq!(range.into_response().status(), StatusCode::BAD_REQUEST);

        let page: ApiError = PageError::OutOfRange { page: 4, total_pages: 3 }.into();
        assert_eq!(page.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
