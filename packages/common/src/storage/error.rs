use std::fmt;

/// Errors that can occur during object storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// No object exists under the requested key.
    NotFound(String),
    /// The key is empty, absolute, or escapes the store root.
    InvalidKey(String),
    /// An I/O error occurred.
    Io(std::io::Error),
    /// The remote object service rejected the request.
    Backend { status: Option<u16>, message: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(key) => write!(f, "object not found: {key}"),
            Self::InvalidKey(key) => write!(f, "invalid object key: {key}"),
            Self::Io(err) => write!(f, "storage IO error: {err}"),
            Self::Backend {
                status: Some(status),
                message,
            } => write!(f, "object service error (HTTP {status}): {message}"),
            Self::Backend {
                status: None,
                message,
            } => write!(f, "object service error: {message}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
