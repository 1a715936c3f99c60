//! Streaming content verification for piped downloads.
//!
//! Provides incremental hashing that survives interrupted transfers: a
//! [`SharedHasher`] accumulates over the logical whole file no matter how many
//! connection attempts delivered it, and [`ExpectedHash`] compares the result.
//!
//! # Example
//!
//! ```
//! use dlpipe_verify::{ExpectedHash, HashAlgorithm, SharedHasher, Sha256Hasher};
//!
//! let hasher = SharedHasher::new(HashAlgorithm::Sha256);
//! hasher.update(b"hello ");
//! hasher.update(b"world");
//!
//! let expected = ExpectedHash::new(HashAlgorithm::Sha256, Sha256Hasher::digest(b"hello world"));
//! expected.verify(&hasher.snapshot()).unwrap();
//! ```

pub use self::algorithm::HashAlgorithm;
pub use self::error::{Result, VerificationError};
pub use self::expected::{ExpectedHash, verify_digest};
pub use self::hasher::{DigestHasher, Hasher, Md5Hasher, Sha1Hasher, Sha256Hasher, Sha512Hasher};
pub use self::shared::SharedHasher;

mod algorithm;
mod error;
mod expected;
mod hasher;
mod shared;
