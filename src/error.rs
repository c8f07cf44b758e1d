//! Error types for docdesk.

use thiserror::Error;

use crate::validation::ValidationError;

/// Common error type for docdesk.
#[derive(Error, Debug)]
pub enum DocdeskError {
    /// Transport-level HTTP failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    ///
    /// The message comes from the backend's `mensaje` field when present.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The backend rejected the session token (HTTP 401).
    #[error("session expired or not authenticated")]
    Unauthorized,

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Malformed tree path such as `"1--2"` or `"a-0"`.
    #[error("invalid tree path: {0}")]
    InvalidPath(String),

    /// A sibling with the same name already exists.
    #[error("a subfolder named \"{0}\" already exists")]
    DuplicateName(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ValidationError> for DocdeskError {
    fn from(e: ValidationError) -> Self {
        DocdeskError::Validation(e.to_string())
    }
}

impl DocdeskError {
    /// Whether this error means the stored login is no longer usable.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DocdeskError::Unauthorized)
    }
}

/// Result type alias for docdesk operations.
pub type Result<T> = std::result::Result<T, DocdeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = DocdeskError::Api {
            status: 500,
            message: "Error al crear carpeta".to_string(),
        };
        assert_eq!(err.to_string(), "API error (500): Error al crear carpeta");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = DocdeskError::NotFound("folder".to_string());
        assert_eq!(err.to_string(), "folder not found");
    }

    #[test]
    fn test_duplicate_name_display() {
        let err = DocdeskError::DuplicateName("Facturas".to_string());
        assert_eq!(
            err.to_string(),
            "a subfolder named \"Facturas\" already exists"
        );
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: DocdeskError = ValidationError::PasswordTooShort.into();
        assert!(matches!(err, DocdeskError::Validation(_)));
        assert!(err.to_string().contains("at least 6"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DocdeskError = io_err.into();
        assert!(matches!(err, DocdeskError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_is_unauthorized() {
        assert!(DocdeskError::Unauthorized.is_unauthorized());
        assert!(!DocdeskError::Config("x".into()).is_unauthorized());
    }
}
