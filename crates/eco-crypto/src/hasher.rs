use eco_types::Digest;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag that is prepended to every hash
/// computation, so an entry and any other object with identical bytes never
/// share a digest.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for ledger entries.
    pub const ENTRY: Self = Self {
        domain: "eco-entry-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> Digest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        Digest::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a value's JSON encoding with domain separation.
    ///
    /// The encoding is canonical only when the value's `Serialize` impl is:
    /// fixed field order, no maps with unordered keys, no floats.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<Digest, HasherError> {
        let data =
            serde_json::to_vec(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash(&data))
    }

    /// Verify that data produces the expected digest.
    pub fn verify(&self, data: &[u8], expected: &Digest) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}
