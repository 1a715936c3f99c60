//! Error types for dlpipe-fetch.

use std::io;

use dlpipe_verify::VerificationError;
use thiserror::Error;

use crate::core::RangeError;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("create request: {0}")]
    InvalidRequest(String),

    #[error("unexpected status code on first read: {0}")]
    UnexpectedFirstStatus(u16),

    #[error("unexpected status code on subsequent read: {0}")]
    UnexpectedResumeStatus(u16),

    #[error(transparent)]
    ContentRange(#[from] RangeError),

    #[error("bad gateway")]
    BadGateway,

    #[error("request timeout")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("body ended early: expected {expected} bytes, received {received}")]
    Incomplete { expected: u64, received: u64 },

    #[error("body overran declared length: expected {expected} bytes, received {received}")]
    Overrun { expected: u64, received: u64 },

    #[error("write to destination: {0}")]
    Sink(#[source] io::Error),

    #[error("retry limit exceeded after {retries} retries")]
    RetryLimitExceeded {
        retries: u32,
        #[source]
        last:    Box<FetchError>,
    },

    #[error("download cancelled")]
    Cancelled,

    #[error(transparent)]
    Integrity(#[from] VerificationError),
}

impl FetchError {
    /// Transient failures that another range request may overcome.
    ///
    /// Everything else ends the session as soon as it is raised.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::BadGateway
                | FetchError::Timeout
                | FetchError::Network(_)
                | FetchError::Incomplete { .. }
        )
    }

    pub fn network(e: impl std::fmt::Display) -> Self { FetchError::Network(e.to_string()) }
}

/// Transport-level I/O failures. Destination failures are wrapped explicitly
/// in [`FetchError::Sink`] instead.
impl From<io::Error> for FetchError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::TimedOut => FetchError::Timeout,
            _ => FetchError::Network(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(FetchError::BadGateway.is_retryable());
        assert!(FetchError::Timeout.is_retryable());
        assert!(FetchError::network("connection reset").is_retryable());
        assert!(FetchError::Incomplete { expected: 10, received: 4 }.is_retryable());

        assert!(!FetchError::UnexpectedFirstStatus(404).is_retryable());
        assert!(!FetchError::UnexpectedResumeStatus(200).is_retryable());
        assert!(!FetchError::ContentRange(RangeError::Missing).is_retryable());
        assert!(!FetchError::Cancelled.is_retryable());
        assert!(!FetchError::Sink(io::Error::other("closed")).is_retryable());
        assert!(
            !FetchError::RetryLimitExceeded {
                retries: 5,
                last:    Box::new(FetchError::BadGateway),
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_io_error_mapping() {
        let timeout: FetchError = io::Error::new(io::ErrorKind::TimedOut, "slow").into();
        assert!(matches!(timeout, FetchError::Timeout));

        let reset: FetchError = io::Error::new(io::ErrorKind::ConnectionReset, "reset").into();
        assert!(matches!(reset, FetchError::Network(msg) if msg == "reset"));
    }

    #[test]
    fn test_retry_limit_keeps_source() {
        use std::error::Error as _;

        let err = FetchError::RetryLimitExceeded {
            retries: 2,
            last:    Box::new(FetchError::BadGateway),
        };
        assert_eq!(err.to_string(), "retry limit exceeded after 2 retries");
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("bad gateway"));
    }
}
