//! Error types for the archiving client.
//!
//! # Design
//! Every failure is an `ArchiveError`. The three variants mirror the three
//! kinds of failure callers care about, and `kind()` exposes a plain tag so
//! callers can branch without matching on the message. HTTP statuses are
//! not errors here: a 401 or 500 comes back as a `Response` unless the
//! caller opts into `Response::error_for_status`.

use thiserror::Error;

/// Errors returned by `ArchivingClient` and its helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    /// Catch-all for unexpected conditions, including malformed JSON bodies.
    #[error("archiving error: {0}")]
    Generic(String),

    /// The API key or secret was most likely rejected.
    #[error("archiving authentication error: {0}")]
    Auth(String),

    /// The HTTP transport is unavailable or the round trip itself failed.
    #[error("archiving request error: {0}")]
    Request(String),
}

/// Tag identifying which `ArchiveError` variant was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Generic,
    Auth,
    Request,
}

impl ArchiveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArchiveError::Generic(_) => ErrorKind::Generic,
            ArchiveError::Auth(_) => ErrorKind::Auth,
            ArchiveError::Request(_) => ErrorKind::Request,
        }
    }

    /// The human-readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            ArchiveError::Generic(msg) | ArchiveError::Auth(msg) | ArchiveError::Request(msg) => msg,
        }
    }
}

impl From<serde_json::Error> for ArchiveError {
    fn from(err: serde_json::Error) -> Self {
        ArchiveError::Generic(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ArchiveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(ArchiveError::Generic("x".into()).kind(), ErrorKind::Generic);
        assert_eq!(ArchiveError::Auth("x".into()).kind(), ErrorKind::Auth);
        assert_eq!(ArchiveError::Request("x".into()).kind(), ErrorKind::Request);
    }

    #[test]
    fn display_carries_message() {
        let err = ArchiveError::Request("connection refused".into());
        assert_eq!(err.to_string(), "archiving request error: connection refused");
        assert_eq!(err.message(), "connection refused");
    }

    #[test]
    fn json_errors_become_generic() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ArchiveError = parse_err.into();
        assert_eq!(err.kind(), ErrorKind::Generic);
    }
}
