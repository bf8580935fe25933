use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Number of hex characters shown by [`Digest::short_hex`].
pub const SHORT_HEX_LEN: usize = 10;

/// Content digest of a ledger entry.
///
/// A `Digest` is a 32-byte BLAKE3 output. It serializes as a lowercase hex
/// string so that the canonical encoding of anything embedding it is
/// unambiguous.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; 32]);

impl Digest {
    /// The all-zero digest used as the genesis entry's predecessor.
    pub const SENTINEL: Self = Self([0u8; 32]);

    /// Compute a `Digest` from raw bytes without domain separation.
    pub fn of_bytes(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Wrap a pre-computed hash.
    pub const fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// Returns `true` for the genesis sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full 64-character hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Consistently truncated hex for tables.
    pub fn short_hex(&self) -> String {
        let mut full = self.to_hex();
        full.truncate(SHORT_HEX_LEN);
        full
    }

    /// Parse from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_bytes_is_deterministic() {
        assert_eq!(Digest::of_bytes(b"bottle"), Digest::of_bytes(b"bottle"));
        assert_ne!(Digest::of_bytes(b"bottle"), Digest::of_bytes(b"can"));
    }

    #[test]
    fn sentinel_is_all_zeros() {
        assert!(Digest::SENTINEL.is_sentinel());
        assert_eq!(Digest::SENTINEL.to_hex(), "0".repeat(64));
        assert!(!Digest::of_bytes(b"x").is_sentinel());
    }

    #[test]
    fn hex_roundtrip() {
        let d = Digest::of_bytes(b"entry");
        assert_eq!(Digest::from_hex(&d.to_hex()).unwrap(), d);
        assert_eq!(d.to_string().parse::<Digest>().unwrap(), d);
    }

    #[test]
    fn wrong_length_rejected() {
        let err = Digest::from_hex("abcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 32,
                actual: 2
            }
        );
        assert!(matches!(
            Digest::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn short_hex_is_prefix() {
        let d = Digest::of_bytes(b"entry");
        assert_eq!(d.short_hex().len(), SHORT_HEX_LEN);
        assert!(d.to_hex().starts_with(&d.short_hex()));
    }

    #[test]
    fn serializes_as_hex_string() {
        let d = Digest::of_bytes(b"serde");
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, format!("\"{}\"", d.to_hex()));
        let parsed: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, d);
    }
}
