use std::sync::Arc;

use dlpipe_verify::{SharedHasher, verify_digest};
use tracing::debug;

use crate::data::TransferSummary;
use crate::error::Result;

/// A predicate deferred until the whole body has been committed.
pub trait FinalizationCheck: Send + Sync {
    fn check(&self, summary: &TransferSummary) -> Result<()>;
}

impl<F> FinalizationCheck for F
where
    F: Fn(&TransferSummary) -> Result<()> + Send + Sync,
{
    fn check(&self, summary: &TransferSummary) -> Result<()> { self(summary) }
}

/// Compares the digest accumulated by a hasher against an expected value.
pub struct HashCheck {
    hasher:   SharedHasher,
    expected: Vec<u8>,
}

impl HashCheck {
    pub fn new(hasher: SharedHasher, expected: Vec<u8>) -> Self { Self { hasher, expected } }
}

impl FinalizationCheck for HashCheck {
    fn check(&self, _summary: &TransferSummary) -> Result<()> {
        let actual = self.hasher.snapshot();
        verify_digest(self.hasher.label(), &self.expected, &actual)?;
        debug!(algorithm = self.hasher.label(), digest = %hex::encode(&actual), "hash verified");
        Ok(())
    }
}

/// Run every check in registration order, stopping at the first failure.
pub fn run_checks(checks: &[Arc<dyn FinalizationCheck>], summary: &TransferSummary) -> Result<()> {
    checks.iter().try_for_each(|check| check.check(summary))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use dlpipe_verify::{HashAlgorithm, Sha256Hasher, VerificationError};

    use super::*;
    use crate::error::FetchError;

    fn summary() -> TransferSummary {
        TransferSummary {
            bytes_written:  11,
            content_length: Some(11),
            retries:        0,
        }
    }

    #[test]
    fn test_hash_check_passes() {
        let hasher = SharedHasher::new(HashAlgorithm::Sha256);
        hasher.update(b"hello world");
        let check = HashCheck::new(hasher, Sha256Hasher::digest(b"hello world"));
        assert!(check.check(&summary()).is_ok());
    }

    #[test]
    fn test_hash_check_reports_both_digests() {
        let hasher = SharedHasher::new(HashAlgorithm::Sha256);
        hasher.update(b"hello world");
        let check = HashCheck::new(hasher, vec![0xde, 0xad]);

        match check.check(&summary()) {
            Err(FetchError::Integrity(VerificationError::Mismatch {
                expected, actual, ..
            })) => {
                assert_eq!(expected, vec![0xde, 0xad]);
                assert_eq!(actual, Sha256Hasher::digest(b"hello world"));
            }
            other => panic!("expected integrity failure, got {other:?}"),
        }
    }

    #[test]
    fn test_first_failure_wins_and_stops() {
        let calls = Arc::new(Mutex::new(Vec::new()));

        let record = |name: &'static str, fail: bool| {
            let calls = Arc::clone(&calls);
            Arc::new(move |_: &TransferSummary| {
                calls.lock().unwrap().push(name);
                if fail { Err(FetchError::InvalidOptions(name.to_string())) } else { Ok(()) }
            }) as Arc<dyn FinalizationCheck>
        };

        let checks = vec![record("a", false), record("b", true), record("c", true)];
        let err = run_checks(&checks, &summary()).unwrap_err();

        assert!(matches!(err, FetchError::InvalidOptions(name) if name == "b"));
        assert_eq!(*calls.lock().unwrap(), ["a", "b"]);
    }
}
