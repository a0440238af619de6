use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Canonical identifier of a stored object.
///
/// An `ObjectId` is the lowercase hex encoding of the object's content hash,
/// as chosen by the uploading client (SHA-256 for Git LFS). lfsd never hashes
/// content itself; ids are recovered from where objects sit on disk. The id must be long
/// enough to fill both shard levels plus a non-empty file name (see
/// [`crate::layout`]).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Minimum id length: two shard levels of two characters plus one.
    pub const MIN_LEN: usize = 5;

    /// Parse and validate an id string.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.len() < Self::MIN_LEN {
            return Err(TypeError::InvalidLength {
                min: Self::MIN_LEN,
                actual: s.len(),
            });
        }
        if let Some(found) = s
            .chars()
            .find(|c| !matches!(c, '0'..='9' | 'a'..='f'))
        {
            return Err(TypeError::InvalidHex {
                id: s.to_string(),
                found,
            });
        }
        Ok(Self(s.to_string()))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short representation (first 8 characters).
    pub fn short_hex(&self) -> &str {
        &self.0[..self.0.len().min(8)]
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ObjectId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA256_HELLO: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn parse_accepts_full_sha256() {
        let id = ObjectId::parse(SHA256_HELLO).unwrap();
        assert_eq!(id.as_str().len(), 64);
    }

    #[test]
    fn parse_accepts_lowercase_hex() {
        let id = ObjectId::parse("abcdef0123").unwrap();
        assert_eq!(id.as_str(), "abcdef0123");
    }

    #[test]
    fn parse_rejects_short_ids() {
        let err = ObjectId::parse("abcd").unwrap_err();
        assert_eq!(err, TypeError::InvalidLength { min: 5, actual: 4 });
        assert!(ObjectId::parse("").is_err());
    }

    #[test]
    fn parse_rejects_non_hex() {
        let err = ObjectId::parse("abcdeXYZ").unwrap_err();
        assert!(matches!(err, TypeError::InvalidHex { found: 'X', .. }));
        // Uppercase is not canonical.
        assert!(ObjectId::parse("ABCDEF").is_err());
    }

    #[test]
    fn short_hex_is_at_most_8_chars() {
        let long = ObjectId::parse(SHA256_HELLO).unwrap();
        assert_eq!(long.short_hex(), "2cf24dba");
        let short = ObjectId::parse("12345").unwrap();
        assert_eq!(short.short_hex(), "12345");
    }

    #[test]
    fn display_is_full_id() {
        let id = ObjectId::parse(SHA256_HELLO).unwrap();
        assert_eq!(format!("{id}"), SHA256_HELLO);
        assert_eq!(format!("{id:?}"), "ObjectId(2cf24dba)");
    }

    #[test]
    fn serde_roundtrip() {
        let id = ObjectId::parse("abcdef0123").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn serde_rejects_invalid_ids() {
        let result: Result<ObjectId, _> = serde_json::from_str("\"not-hex!\"");
        assert!(result.is_err());
    }

    #[test]
    fn ordering_follows_string_order() {
        let a = ObjectId::parse("00000").unwrap();
        let b = ObjectId::parse("00001").unwrap();
        assert!(a < b);
    }
}
