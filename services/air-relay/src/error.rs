use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::types::{ErrorDetail, ErrorResp};

/// A single rejected field in a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub loc: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(loc: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            msg: msg.into(),
        }
    }

    pub fn missing(loc: impl Into<String>) -> Self {
        Self::new(loc, "field required")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed for {}", field_list(.0))]
    Validation(Vec<FieldError>),
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    #[error("device {0} not found")]
    DeviceNotFound(String),
}

fn field_list(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.loc.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::DeviceNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            ApiError::Validation(errors) => ErrorDetail::Fields(errors),
            other => ErrorDetail::Message(other.to_string()),
        };
        (status, Json(ErrorResp { detail })).into_response()
    }
}

// Bodies are decoded as untyped JSON first, so a rejection here means the
// request never carried a JSON document at all.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}
