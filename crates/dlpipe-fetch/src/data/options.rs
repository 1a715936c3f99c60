use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dlpipe_verify::{ExpectedHash, SharedHasher};

use super::progress::{Progress, ProgressCallback};
use crate::core::{FinalizationCheck, HashCheck};
use crate::error::{FetchError, Result};

/// Retry budget and exponential backoff for interrupted transfers.
///
/// A session makes at most `max_retries + 1` requests. Waits start at
/// `base_wait` and are multiplied by `wait_multiplier` after every retry; the
/// wait drops back to `base_wait` whenever the transfer moved forward by more
/// than 1 MiB since the previous failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryParameters {
    pub max_retries:     u32,
    pub base_wait:       Duration,
    pub wait_multiplier: u32,
}

impl Default for RetryParameters {
    fn default() -> Self {
        Self {
            max_retries:     5,
            base_wait:       Duration::from_millis(250),
            wait_multiplier: 2,
        }
    }
}

impl RetryParameters {
    pub fn new(max_retries: u32, base_wait: Duration, wait_multiplier: u32) -> Self {
        Self {
            max_retries,
            base_wait,
            wait_multiplier,
        }
    }
}

/// Timeouts applied by the default transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// How long an idle pooled connection is kept alive.
    pub idle:            Duration,
    /// How long to wait for response headers after sending a request.
    pub response_header: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            idle:            Duration::from_secs(10),
            response_header: Duration::from_secs(10),
        }
    }
}

impl Timeouts {
    #[must_use]
    pub fn idle(mut self, idle: Duration) -> Self {
        self.idle = idle;
        self
    }

    #[must_use]
    pub fn response_header(mut self, response_header: Duration) -> Self {
        self.response_header = response_header;
        self
    }
}

/// Periodic progress observation.
#[derive(Clone)]
pub struct ProgressOptions {
    pub callback: ProgressCallback,
    pub interval: Duration,
}

impl fmt::Debug for ProgressOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressOptions")
            .field("callback", &"{ ... }")
            .field("interval", &self.interval)
            .finish()
    }
}

/// Configuration for one download session.
///
/// Built once before the session starts and never mutated by it.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use dlpipe_fetch::{FetchOptions, RetryParameters};
/// use dlpipe_verify::{HashAlgorithm, SharedHasher};
///
/// let hasher = SharedHasher::new(HashAlgorithm::Sha256);
/// let options = FetchOptions::default()
///     .header("Authorization", "Bearer token")
///     .verify_with(hasher.clone(), vec![0u8; 32])
///     .retry(RetryParameters::new(3, Duration::from_millis(100), 2))
///     .on_progress(|p| eprintln!("{} bytes", p.bytes_downloaded), Duration::from_secs(1));
///
/// assert!(options.validate().is_ok());
/// ```
#[derive(Clone, Default)]
pub struct FetchOptions {
    /// Headers sent with every request, including range requests.
    pub headers:  Arc<[(String, String)]>,
    /// Hashes fed with every committed byte, in registration order.
    pub taps:     Vec<SharedHasher>,
    /// Checks evaluated in order once the whole body has been committed.
    pub checks:   Vec<Arc<dyn FinalizationCheck>>,
    pub progress: Option<ProgressOptions>,
    pub retry:    RetryParameters,
    pub timeouts: Timeouts,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("headers", &self.headers)
            .field("taps", &self.taps)
            .field("checks", &self.checks.len())
            .field("progress", &self.progress)
            .field("retry", &self.retry)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl FetchOptions {
    /// Add a single header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers: Vec<_> = self.headers.iter().cloned().collect();
        headers.push((key.into(), value.into()));
        self.headers = Arc::from(headers);
        self
    }

    /// Replace all headers.
    #[must_use]
    pub fn headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = Arc::from(headers);
        self
    }

    /// Hash the content with the expected algorithm and fail the session if
    /// the digest differs.
    #[must_use]
    pub fn expected_hash(self, expected: ExpectedHash) -> Self {
        let hasher = SharedHasher::new(expected.algorithm);
        self.verify_with(hasher, expected.digest)
    }

    /// Like [`expected_hash`](Self::expected_hash), with a caller-held hasher
    /// whose digest stays readable after the session.
    #[must_use]
    pub fn verify_with(mut self, hasher: SharedHasher, expected: impl Into<Vec<u8>>) -> Self {
        self.taps.push(hasher.clone());
        self.checks.push(Arc::new(HashCheck::new(hasher, expected.into())));
        self
    }

    /// Attach a hash without verifying it.
    #[must_use]
    pub fn hasher(mut self, hasher: SharedHasher) -> Self {
        self.taps.push(hasher);
        self
    }

    /// Register an extra finalization check.
    #[must_use]
    pub fn check(mut self, check: impl FinalizationCheck + 'static) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    #[must_use]
    pub fn on_progress(
        mut self,
        callback: impl Fn(&Progress) + Send + Sync + 'static,
        interval: Duration,
    ) -> Self {
        self.progress = Some(ProgressOptions {
            callback: Arc::new(callback),
            interval,
        });
        self
    }

    #[must_use]
    pub fn retry(mut self, retry: RetryParameters) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Reject configurations the session cannot run with.
    pub fn validate(&self) -> Result<()> {
        if let Some(progress) = &self.progress
            && progress.interval.is_zero()
        {
            return Err(FetchError::InvalidOptions(
                "progress interval must be greater than zero".to_string(),
            ));
        }
        if self.retry.wait_multiplier == 0 {
            return Err(FetchError::InvalidOptions(
                "retry wait multiplier must be at least 1".to_string(),
            ));
        }
        if let Some((key, _)) = self.headers.iter().find(|(key, _)| key.trim().is_empty()) {
            return Err(FetchError::InvalidOptions(format!("empty header name {key:?}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TransferSummary;
    use dlpipe_verify::HashAlgorithm;

    #[test]
    fn test_retry_defaults() {
        let retry = RetryParameters::default();
        assert_eq!(retry.max_retries, 5);
        assert_eq!(retry.base_wait, Duration::from_millis(250));
        assert_eq!(retry.wait_multiplier, 2);
    }

    #[test]
    fn test_timeout_defaults() {
        let timeouts = Timeouts::default();
        assert_eq!(timeouts.idle, Duration::from_secs(10));
        assert_eq!(timeouts.response_header, Duration::from_secs(10));
    }

    #[test]
    fn test_header_accumulates() {
        let options = FetchOptions::default()
            .header("Authorization", "Bearer token")
            .header("User-Agent", "dlpipe");
        assert_eq!(options.headers.len(), 2);
        assert_eq!(options.headers[1], ("User-Agent".to_string(), "dlpipe".to_string()));
    }

    #[test]
    fn test_taps_and_checks_keep_registration_order() {
        let extra = SharedHasher::new(HashAlgorithm::Md5);
        let options = FetchOptions::default()
            .expected_hash(ExpectedHash::new(HashAlgorithm::Sha256, vec![1, 2, 3]))
            .hasher(extra)
            .verify_with(SharedHasher::new(HashAlgorithm::Sha1), vec![4]);

        let labels: Vec<_> = options.taps.iter().map(|t| t.label()).collect();
        assert_eq!(labels, ["sha256", "md5", "sha1"]);
        assert_eq!(options.checks.len(), 2);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let options = FetchOptions::default().on_progress(|_| {}, Duration::ZERO);
        assert!(matches!(options.validate(), Err(FetchError::InvalidOptions(_))));
    }

    #[test]
    fn test_validate_rejects_zero_multiplier() {
        let options =
            FetchOptions::default().retry(RetryParameters::new(5, Duration::from_millis(1), 0));
        assert!(matches!(options.validate(), Err(FetchError::InvalidOptions(_))));
    }

    #[test]
    fn test_validate_rejects_empty_header_name() {
        let options = FetchOptions::default().header(" ", "value");
        assert!(matches!(options.validate(), Err(FetchError::InvalidOptions(_))));
    }

    #[test]
    fn test_closure_check() {
        let options = FetchOptions::default().check(|summary: &TransferSummary| {
            if summary.bytes_written > 0 {
                Ok(())
            } else {
                Err(FetchError::InvalidOptions("empty".to_string()))
            }
        });
        let summary = TransferSummary {
            bytes_written:  0,
            content_length: Some(0),
            retries:        0,
        };
        assert!(options.checks[0].check(&summary).is_err());
    }
}
