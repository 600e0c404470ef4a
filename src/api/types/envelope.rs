//! Uniform response envelope shared by every directory endpoint

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Paging hints. Part of the envelope contract but not populated by any
/// endpoint yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub has_more: bool,
    pub total_items: u64,
}

/// `{ data?, message, statusCode, pagination? }`. The HTTP status equals
/// `statusCode` unless the body reports a different outcome on purpose.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip)]
    http_status: StatusCode,
}

impl<T> ApiResponse<T> {
    pub fn with_status(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            message: message.into(),
            status_code: status.as_u16(),
            pagination: None,
            http_status: status,
        }
    }

    /// Envelope without data, as used by error responses
    pub fn message_only(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: message.into(),
            status_code: status.as_u16(),
            pagination: None,
            http_status: status,
        }
    }

    /// 200 with data
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, data, message)
    }

    /// 201 with data
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::CREATED, data, message)
    }

    /// Report `status` in the body while keeping the transport status
    pub fn reporting(mut self, status: StatusCode) -> Self {
        self.status_code = status.as_u16();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.http_status
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
