//! Error types for the scan pipeline.
//!
//! Per-file failures (`FileNotFound`, `PermissionDenied`, `Io`, `ReadFailure`,
//! `EncodingError`) never escape the worker pool; they travel on the
//! [`FileOutcome`](crate::results::FileOutcome) of the file that produced them.
//! The remaining variants are fatal for a whole run.
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that can occur while scanning a log tree
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Read failed in {path}: {source}")]
    ReadFailure { path: PathBuf, source: io::Error },
    #[error("Invalid UTF-8 in {path} at line {line}: {source}")]
    EncodingError {
        path: PathBuf,
        line: usize,
        source: std::string::FromUtf8Error,
    },
    #[error("Cannot walk {path}: {message}")]
    Traversal { path: PathBuf, message: String },
    #[error("Invalid search criteria: {0}")]
    InvalidCriteria(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Worker thread panicked: {0}")]
    WorkerPanic(String),
}

impl ScanError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn read_failure(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::ReadFailure {
            path: path.into(),
            source,
        }
    }

    pub fn encoding_error(
        path: impl Into<PathBuf>,
        line: usize,
        source: std::string::FromUtf8Error,
    ) -> Self {
        Self::EncodingError {
            path: path.into(),
            line,
            source,
        }
    }

    pub fn traversal(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Traversal {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_criteria(msg: impl Into<String>) -> Self {
        Self::InvalidCriteria(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Classifies a failure to open `path`.
    pub fn open_failure(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::file_not_found(path),
            io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::Io(err),
        }
    }

}

impl From<config::ConfigError> for ScanError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_failure_classification() {
        let path = Path::new("mail.log");

        let err = ScanError::open_failure(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, ScanError::FileNotFound(_)));

        let err = ScanError::open_failure(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, ScanError::PermissionDenied(_)));

        let err = ScanError::open_failure(path, io::Error::from(io::ErrorKind::Interrupted));
        assert!(matches!(err, ScanError::Io(_)));
    }

    #[test]
    fn test_error_messages() {
        let err = ScanError::file_not_found("mail.log");
        assert_eq!(err.to_string(), "File not found: mail.log");

        let err = ScanError::invalid_criteria("email must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid search criteria: email must not be empty"
        );

        let err = ScanError::traversal("/var/log/mail", "permission denied");
        assert_eq!(
            err.to_string(),
            "Cannot walk /var/log/mail: permission denied"
        );
    }
}
