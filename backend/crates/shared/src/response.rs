//! Success envelope
//!
//! Every successful Karma response has the shape `{"message": "...", "data": ...}`.

use std::borrow::Cow;

use serde::Serialize;

/// `{message, data}` response body.
///
/// `data` is serialized as `null` when absent, matching what the mobile
/// client expects from message-only endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub message: Cow<'static, str>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<Cow<'static, str>>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

/// Request body wrapper for endpoints that nest their input under `data`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct DataBody<T> {
    pub data: T,
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        (axum::http::StatusCode::OK, axum::Json(self)).into_response()
    }
}
