#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error(
        "{algorithm} hash mismatch: expected {}, got {}",
        hex::encode(.expected),
        hex::encode(.actual)
    )]
    Mismatch {
        algorithm: String,
        expected:  Vec<u8>,
        actual:    Vec<u8>,
    },

    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid digest: {0}")]
    InvalidDigest(String),
}

pub type Result<T> = std::result::Result<T, VerificationError>;
