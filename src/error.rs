use std::fmt;

use serde::Serialize;
use ts_rs::TS;

/// Structured error type for the designer session. Serialized with a `code`
/// tag so the frontend can match on it and pick the right message.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "code", content = "detail")]
#[ts(export)]
pub enum AppError {
    NotFound { what: String },
    InvalidIndex { what: String, index: usize },
    ValidationError { message: String },
    IoError { message: String },
    StorageError { message: String },
    NoSelection,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound { what } => write!(f, "{what} not found"),
            AppError::InvalidIndex { what, index } => {
                write!(f, "Invalid {what} index: {index}")
            }
            AppError::ValidationError { message } => write!(f, "{message}"),
            AppError::IoError { message } => write!(f, "I/O error: {message}"),
            AppError::StorageError { message } => write!(f, "Storage error: {message}"),
            AppError::NoSelection => write!(f, "No command selected"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::IoError {
            message: e.to_string(),
        }
    }
}

impl From<crate::storage::StorageError> for AppError {
    fn from(e: crate::storage::StorageError) -> Self {
        match e {
            crate::storage::StorageError::Io(io_err) => AppError::IoError {
                message: io_err.to_string(),
            },
            crate::storage::StorageError::Json(json_err) => AppError::StorageError {
                message: json_err.to_string(),
            },
        }
    }
}

/// Allow converting AppError to String for the CLI and HTTP surfaces.
impl From<AppError> for String {
    fn from(e: AppError) -> String {
        e.to_string()
    }
}

impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::ValidationError { message: s }
    }
}

impl From<&str> for AppError {
    fn from(s: &str) -> Self {
        AppError::ValidationError {
            message: s.to_string(),
        }
    }
}
