use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::BackendError;

/// The single failure kind of an extraction run.
///
/// Every cause is collapsed into one of four variants; the message of the
/// underlying error is kept so the caller can print it.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("source file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("IO error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for ExtractionError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => ExtractionError::PermissionDenied(err.to_string()),
            _ => ExtractionError::Io(err),
        }
    }
}

impl From<BackendError> for ExtractionError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound(path) => ExtractionError::NotFound(path),
            BackendError::Open(msg) => ExtractionError::MalformedDocument(msg),
            BackendError::Encrypted => {
                ExtractionError::PermissionDenied("document is encrypted".to_string())
            }
            e @ BackendError::Page { .. } => ExtractionError::MalformedDocument(e.to_string()),
            BackendError::Io(e) => e.into(),
        }
    }
}
