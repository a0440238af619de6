use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Domain tag mixed into every credential digest.
const DOMAIN: &str = "lfsd-credential-v1";

/// Scheme prefix of the encoded form.
const SCHEME: &str = "blake3";

const SALT_LEN: usize = 16;

/// Verifiable form of a user secret.
///
/// Encoded as `blake3$<salt-hex>$<digest-hex>`, where the digest is a
/// domain-separated BLAKE3 hash over the salt and the plaintext. The
/// plaintext itself is never stored.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Credential {
    salt: [u8; SALT_LEN],
    digest: [u8; 32],
}

impl Credential {
    /// Derive a credential from a plaintext secret with a fresh random salt.
    pub fn derive(plaintext: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::with_salt(salt, plaintext)
    }

    fn with_salt(salt: [u8; SALT_LEN], plaintext: &str) -> Self {
        let digest = digest(&salt, plaintext);
        Self {
            salt,
            digest: *digest.as_bytes(),
        }
    }

    /// Check a plaintext secret against this credential.
    ///
    /// Comparison goes through `blake3::Hash`, whose equality is constant-time.
    pub fn verify(&self, plaintext: &str) -> bool {
        digest(&self.salt, plaintext) == blake3::Hash::from(self.digest)
    }
}

fn digest(salt: &[u8], plaintext: &str) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(DOMAIN.as_bytes());
    hasher.update(b":");
    hasher.update(salt);
    hasher.update(plaintext.as_bytes());
    hasher.finalize()
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{SCHEME}${}${}",
            hex::encode(self.salt),
            hex::encode(self.digest)
        )
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

impl FromStr for Credential {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('$');
        let (Some(scheme), Some(salt), Some(digest), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(StoreError::Credential("expected scheme$salt$digest".into()));
        };
        if scheme != SCHEME {
            return Err(StoreError::Credential(format!("unknown scheme {scheme:?}")));
        }

        let mut out = Self {
            salt: [0u8; SALT_LEN],
            digest: [0u8; 32],
        };
        hex::decode_to_slice(salt, &mut out.salt)
            .map_err(|e| StoreError::Credential(format!("salt: {e}")))?;
        hex::decode_to_slice(digest, &mut out.digest)
            .map_err(|e| StoreError::Credential(format!("digest: {e}")))?;
        Ok(out)
    }
}

impl TryFrom<String> for Credential {
    type Error = StoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Credential> for String {
    fn from(c: Credential) -> Self {
        c.to_string()
    }
}
