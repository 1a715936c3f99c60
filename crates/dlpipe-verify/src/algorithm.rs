use std::fmt;
use std::str::FromStr;

use crate::hasher::{Hasher, Md5Hasher, Sha1Hasher, Sha256Hasher, Sha512Hasher};
use crate::{Result, VerificationError};

/// Hash algorithms that can be requested by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    pub fn digest_length(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha512 => 64,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Fresh hash state for this algorithm.
    pub fn hasher(&self) -> Box<dyn Hasher> {
        match self {
            HashAlgorithm::Md5 => Box::new(Md5Hasher::new()),
            HashAlgorithm::Sha1 => Box::new(Sha1Hasher::new()),
            HashAlgorithm::Sha256 => Box::new(Sha256Hasher::new()),
            HashAlgorithm::Sha512 => Box::new(Sha512Hasher::new()),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for HashAlgorithm {
    type Err = VerificationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            _ => Err(VerificationError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}
