use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Write affected no rows, or a re-read came back empty
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Message without the variant prefix, as shown to API clients
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound { message }
            | Self::Conflict { message }
            | Self::BadRequest { message }
            | Self::Validation { message }
            | Self::Storage { message }
            | Self::Internal { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Admin not found");
        assert_eq!(error.to_string(), "Not found: Admin not found");
        assert_eq!(error.message(), "Admin not found");
    }

    #[test]
    fn test_bad_request_error() {
        let error = DomainError::bad_request("User not updated");
        assert_eq!(error.to_string(), "Bad request: User not updated");
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("Email already taken");
        assert_eq!(error.to_string(), "Conflict: Email already taken");
        assert_eq!(error.message(), "Email already taken");
    }
}
