//! Content hashing for document snapshots
//!
//! Provides [`DocumentHash`], a 32-byte Blake3 digest of a document's
//! canonical JSON form. Plans carry the hash of the snapshot they were
//! computed against so an executor can refuse to apply them elsewhere.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A 32-byte Blake3 digest identifying a document snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DocumentHash([u8; 32]);

impl DocumentHash {
    /// Wrap raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hash arbitrary bytes
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Hash the JSON encoding of a value
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn of_serializable<T: serde::Serialize>(value: &T) -> Result<Self, HashError> {
        let json = serde_json::to_vec(value)?;
        Ok(Self::compute(&json))
    }

    /// First 16 hex characters, for logs and diagnostics
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for DocumentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for DocumentHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s)?;
        let array: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| HashError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl serde::Serialize for DocumentHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for DocumentHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Hashing errors
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// Wrong digest length
    #[error("invalid hash length: expected 32 bytes, got {0}")]
    InvalidLength(usize),

    /// Malformed hex
    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Value could not be encoded for hashing
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_is_deterministic() {
        assert_eq!(DocumentHash::compute(b"doc"), DocumentHash::compute(b"doc"));
        assert_ne!(DocumentHash::compute(b"doc"), DocumentHash::compute(b"other"));
    }

    #[test]
    fn hex_round_trip() {
        let hash = DocumentHash::compute(b"doc");
        let parsed: DocumentHash = hash.to_string().parse().unwrap();
        assert_eq!(parsed, hash);
        assert_eq!(hash.short().len(), 16);
    }

    #[test]
    fn rejects_short_hex() {
        let result: Result<DocumentHash, _> = "abcd".parse();
        assert!(matches!(result, Err(HashError::InvalidLength(2))));
    }

    #[test]
    fn serde_uses_hex_string() {
        let hash = DocumentHash::compute(b"doc");
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{hash}\""));
        let back: DocumentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
