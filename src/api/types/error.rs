//! API error rendered with the response envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use super::envelope::ApiResponse;
use crate::domain::DomainError;

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Uniqueness violation
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    fn envelope(&self) -> ApiResponse<()> {
        ApiResponse::message_only(self.status, self.message.clone())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "Request failed");
        } else {
            debug!(status = %self.status, message = %self.message, "Request rejected");
        }

        self.envelope().into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let status = match &err {
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Conflict { .. } => StatusCode::CONFLICT,
            DomainError::BadRequest { .. } | DomainError::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }
            DomainError::Storage { .. } | DomainError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self::new(status, err.message())
    }
}

/// Field messages are sorted and joined into a single validation error
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .values()
            .flat_map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            })
            .collect();
        messages.sort();

        let message = if messages.is_empty() {
            err.to_string()
        } else {
            messages.join(", ")
        };

        DomainError::validation(message).into()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_conversion() {
        let cases = [
            (DomainError::not_found("x"), StatusCode::NOT_FOUND),
            (DomainError::conflict("x"), StatusCode::CONFLICT),
            (DomainError::bad_request("x"), StatusCode::BAD_REQUEST),
            (DomainError::validation("x"), StatusCode::BAD_REQUEST),
            (DomainError::storage("x"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain_err, status) in cases {
            let api_err = ApiError::from(domain_err);
            assert_eq!(api_err.status, status);
            assert_eq!(api_err.message, "x");
        }
    }

    #[test]
    fn test_error_envelope_has_no_data() {
        let err = ApiError::conflict("Email already taken");
        let json = serde_json::to_value(err.envelope()).unwrap();

        assert_eq!(json["message"], "Email already taken");
        assert_eq!(json["statusCode"], 409);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_response_status() {
        let response = ApiError::not_found("Admin not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
