use lfsd_types::ObjectId;

use crate::error::StoreResult;
use crate::record::{MetaObject, MetaUser};

/// Metadata store for object and user records.
///
/// All implementations must satisfy these invariants:
/// - `put_object` is an upsert keyed by id: the last writer for an id wins
///   and repeating a write is a no-op.
/// - Concurrent `put_object` calls for distinct ids do not interfere.
/// - A failed write leaves every existing record unchanged.
/// - User names are unique; `add_user` never overwrites an existing user.
/// - Listings are sorted by key.
pub trait MetaStore: Send + Sync {
    /// Insert or overwrite the record for `object.id`.
    fn put_object(&self, object: &MetaObject) -> StoreResult<()>;

    /// Look up a single object record.
    fn get_object(&self, id: &ObjectId) -> StoreResult<Option<MetaObject>>;

    /// All object records, sorted by id.
    fn objects(&self) -> StoreResult<Vec<MetaObject>>;

    /// Create a user from a plaintext secret.
    ///
    /// Fails with `InvalidInput` if either value is empty and with
    /// `DuplicateUser` if the name is taken.
    fn add_user(&self, name: &str, password: &str) -> StoreResult<()>;

    /// Remove a user. Fails with `NotFound` if no such user exists.
    fn delete_user(&self, name: &str) -> StoreResult<()>;

    /// Look up a single user record.
    fn get_user(&self, name: &str) -> StoreResult<Option<MetaUser>>;

    /// All user records, sorted by name.
    fn users(&self) -> StoreResult<Vec<MetaUser>>;

    /// Upsert several object records.
    ///
    /// Default implementation calls `put_object()` for each record and stops
    /// at the first failure. Backends may override to persist once per batch.
    fn put_objects(&self, objects: &[MetaObject]) -> StoreResult<()> {
        objects.iter().try_for_each(|obj| self.put_object(obj))
    }

    /// Check a plaintext secret against a user's stored credential.
    ///
    /// Returns `Ok(false)` for unknown users.
    fn authenticate(&self, name: &str, password: &str) -> StoreResult<bool> {
        Ok(self
            .get_user(name)?
            .is_some_and(|user| user.credential.verify(password)))
    }
}
