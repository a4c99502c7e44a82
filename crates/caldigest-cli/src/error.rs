//! Client error types.

use std::fmt;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Calendar provider error.
    Provider(String),
    /// Digest build error.
    Digest(String),
    /// Mail composition or delivery error.
    Mail(String),
    /// HTTP serving error.
    Serve(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Provider(msg) => write!(f, "provider error: {}", msg),
            Self::Digest(msg) => write!(f, "digest error: {}", msg),
            Self::Mail(msg) => write!(f, "mail error: {}", msg),
            Self::Serve(msg) => write!(f, "serve error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<caldigest_google::ProviderError> for ClientError {
    fn from(err: caldigest_google::ProviderError) -> Self {
        Self::Provider(err.to_string())
    }
}

impl From<caldigest_core::DigestError> for ClientError {
    fn from(err: caldigest_core::DigestError) -> Self {
        Self::Digest(err.to_string())
    }
}
