use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{HashAlgorithm, Hasher};

/// Cloneable handle to a single running hash.
///
/// Every clone feeds and reads the same state. A download attaches one clone
/// to its byte stream while the caller keeps another to read the digest once
/// the transfer is over. The state is never reset, so bytes fed across several
/// connection attempts accumulate into one whole-file digest.
#[derive(Clone)]
pub struct SharedHasher {
    label: &'static str,
    inner: Arc<Mutex<Box<dyn Hasher>>>,
}

impl SharedHasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            label: algorithm.as_str(),
            inner: Arc::new(Mutex::new(algorithm.hasher())),
        }
    }

    /// Wrap a caller-provided hasher under the given label.
    pub fn custom(label: &'static str, hasher: impl Hasher + 'static) -> Self {
        Self {
            label,
            inner: Arc::new(Mutex::new(Box::new(hasher))),
        }
    }

    pub fn label(&self) -> &'static str { self.label }

    pub fn update(&self, data: &[u8]) { self.lock().update(data); }

    /// Digest of every byte fed so far.
    pub fn snapshot(&self) -> Vec<u8> { self.lock().snapshot() }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Hasher>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for SharedHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedHasher")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sha256Hasher;

    #[test]
    fn test_clones_share_state() {
        let hasher = SharedHasher::new(HashAlgorithm::Sha256);
        let feeder = hasher.clone();

        feeder.update(b"hello ");
        feeder.update(b"world");

        assert_eq!(hasher.snapshot(), Sha256Hasher::digest(b"hello world"));
        assert_eq!(hasher.label(), "sha256");
    }

    #[test]
    fn test_custom_hasher() {
        let hasher = SharedHasher::custom("sha256-custom", Sha256Hasher::new());
        hasher.update(b"abc");
        assert_eq!(hasher.label(), "sha256-custom");
        assert_eq!(hasher.snapshot(), Sha256Hasher::digest(b"abc"));
    }
}
