//! Error types for reelbox.

use thiserror::Error;

/// Common error type for reelbox.
#[derive(Error, Debug)]
pub enum ReelboxError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for input or configuration values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for ReelboxError {
    fn from(e: sqlx::Error) -> Self {
        ReelboxError::Database(e.to_string())
    }
}

/// Result type alias for reelbox operations.
pub type Result<T> = std::result::Result<T, ReelboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ReelboxError::Validation("upload dir is empty".to_string());
        assert_eq!(err.to_string(), "validation error: upload dir is empty");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = ReelboxError::NotFound("video".to_string());
        assert_eq!(err.to_string(), "video not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReelboxError = io_err.into();
        assert!(matches!(err, ReelboxError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: ReelboxError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ReelboxError::Database(_)));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(ReelboxError::Config("bad".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
