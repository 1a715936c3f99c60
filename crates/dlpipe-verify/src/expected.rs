use std::str::FromStr;

use crate::{HashAlgorithm, Result, VerificationError};

/// A digest the downloaded content must hash to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedHash {
    pub algorithm: HashAlgorithm,
    pub digest:    Vec<u8>,
}

impl ExpectedHash {
    /// No length check is applied here; a digest of the wrong length simply
    /// never matches.
    pub fn new(algorithm: HashAlgorithm, digest: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm,
            digest: digest.into(),
        }
    }

    /// Compare a computed digest against this one.
    pub fn verify(&self, actual: &[u8]) -> Result<()> {
        verify_digest(self.algorithm.as_str(), &self.digest, actual)
    }
}

/// Parses `algorithm:hexdigest`, e.g. `sha256:b94d27b9...`.
impl FromStr for ExpectedHash {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self> {
        let (algo, hex_digest) = s
            .split_once(':')
            .ok_or_else(|| VerificationError::InvalidDigest(format!("missing algorithm prefix in {s:?}")))?;

        let algorithm: HashAlgorithm = algo.parse()?;
        let hex_digest = hex_digest.trim();
        let digest = hex::decode(hex_digest)
            .map_err(|e| VerificationError::InvalidDigest(format!("{hex_digest:?}: {e}")))?;

        if digest.len() != algorithm.digest_length() {
            return Err(VerificationError::InvalidDigest(format!(
                "{algorithm} digest must be {} bytes, got {}",
                algorithm.digest_length(),
                digest.len()
            )));
        }

        Ok(Self { algorithm, digest })
    }
}

pub fn verify_digest(label: &str, expected: &[u8], actual: &[u8]) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(VerificationError::Mismatch {
            algorithm: label.to_string(),
            expected:  expected.to_vec(),
            actual:    actual.to_vec(),
        })
    }
}
