use chrono::{DateTime, Utc};
use lfsd_types::ObjectId;
use serde::{Deserialize, Serialize};

use crate::credential::Credential;
use crate::error::{StoreError, StoreResult};

/// Metadata for one stored object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaObject {
    /// Canonical id, derived from the object's location on disk.
    pub id: ObjectId,
    /// Content length in bytes.
    pub size: u64,
}

impl MetaObject {
    pub fn new(id: ObjectId, size: u64) -> Self {
        Self { id, size }
    }
}

/// An account allowed to use the object transfer service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaUser {
    /// Unique, non-empty user name.
    pub name: String,
    /// Verifiable form of the user's secret.
    pub credential: Credential,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl MetaUser {
    /// Build a new user record from a plaintext secret.
    ///
    /// Both the name and the secret must be non-empty.
    pub fn new(name: &str, password: &str) -> StoreResult<Self> {
        if name.is_empty() {
            return Err(StoreError::InvalidInput("user name is empty".into()));
        }
        if password.is_empty() {
            return Err(StoreError::InvalidInput("password is empty".into()));
        }
        Ok(Self {
            name: name.to_string(),
            credential: Credential::derive(password),
            created_at: Utc::now(),
        })
    }
}
