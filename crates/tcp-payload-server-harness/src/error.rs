use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while collecting a payload
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Failed to bind {addr}: {source}")]
    BindError {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to resolve {0}")]
    ResolveError(String),

    #[error("Failed to accept connection: {0}")]
    AcceptError(#[source] std::io::Error),

    #[error("No connection accepted within {0:?}")]
    AcceptTimeout(Duration),

    #[error("Failed to write {path}: {source}")]
    PersistError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to launch `{program}`: {source}")]
    LaunchError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_error_display() {
        let err = HarnessError::BindError {
            addr: "0.0.0.0:50007".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
        };
        assert!(err.to_string().starts_with("Failed to bind 0.0.0.0:50007"));
    }

    #[test]
    fn test_accept_timeout_display() {
        let err = HarnessError::AcceptTimeout(Duration::from_secs(5));
        assert_eq!(err.to_string(), "No connection accepted within 5s");
    }
}
