use digest::Digest;

/// Incremental hash state fed chunk by chunk as bytes stream past.
pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);

    /// Digest of everything fed so far. The running state is left untouched,
    /// so more data may follow.
    fn snapshot(&self) -> Vec<u8>;

    fn finalize(self) -> Vec<u8>
    where
        Self: Sized,
    {
        self.snapshot()
    }
}

/// Adapter from any RustCrypto [`Digest`] to [`Hasher`].
#[derive(Clone)]
pub struct DigestHasher<D>(D);

impl<D: Digest + Clone + Send> Hasher for DigestHasher<D> {
    fn update(&mut self, data: &[u8]) { Digest::update(&mut self.0, data); }

    fn snapshot(&self) -> Vec<u8> { Digest::finalize(self.0.clone()).to_vec() }

    fn finalize(self) -> Vec<u8> { Digest::finalize(self.0).to_vec() }
}

impl<D: Digest> DigestHasher<D> {
    pub fn new() -> Self { Self(D::new()) }

    pub fn digest(data: &[u8]) -> Vec<u8> { <D as Digest>::digest(data).to_vec() }
}

impl<D: Digest> Default for DigestHasher<D> {
    fn default() -> Self { Self::new() }
}

pub type Md5Hasher = DigestHasher<md5::Md5>;
pub type Sha1Hasher = DigestHasher<sha1::Sha1>;
pub type Sha256Hasher = DigestHasher<sha2::Sha256>;
pub type Sha512Hasher = DigestHasher<sha2::Sha512>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hasher() {
        let mut hasher = Sha256Hasher::new();
        hasher.update(b"hello world");
        let hash = hasher.finalize();

        let expected =
            hex::decode("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9")
                .unwrap();
        assert_eq!(hash, expected);
    }

    #[test]
    fn test_md5_and_sha1_known_vectors() {
        assert_eq!(
            hex::encode(Md5Hasher::digest(b"abc")),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(
            hex::encode(Sha1Hasher::digest(b"abc")),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_snapshot_does_not_reset() {
        let mut hasher = Sha256Hasher::new();
        hasher.update(b"hello ");
        let partial = hasher.snapshot();
        assert_eq!(partial, Sha256Hasher::digest(b"hello "));

        hasher.update(b"world");
        assert_eq!(hasher.snapshot(), Sha256Hasher::digest(b"hello world"));
        assert_eq!(hasher.finalize(), Sha256Hasher::digest(b"hello world"));
    }

    #[test]
    fn test_chunked_matches_one_shot() {
        let data: Vec<u8> = (0..10_000).map(|i| (i % 256) as u8).collect();
        let mut hasher = Sha512Hasher::new();
        for chunk in data.chunks(777) {
            hasher.update(chunk);
        }
        assert_eq!(hasher.finalize(), Sha512Hasher::digest(&data));
    }
}
