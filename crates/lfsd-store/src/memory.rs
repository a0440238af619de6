use std::sync::RwLock;

use lfsd_types::ObjectId;

use crate::error::StoreResult;
use crate::record::{MetaObject, MetaUser};
use crate::snapshot::Snapshot;
use crate::traits::MetaStore;

/// In-memory metadata store.
///
/// Intended for tests and embedding. Records are held behind a `RwLock`
/// and lost when the store is dropped.
pub struct InMemoryMetaStore {
    state: RwLock<Snapshot>,
}

impl InMemoryMetaStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Snapshot::default()),
        }
    }

    /// Number of object records.
    pub fn object_count(&self) -> StoreResult<usize> {
        Ok(self.state.read()?.objects.len())
    }

    /// Number of user records.
    pub fn user_count(&self) -> StoreResult<usize> {
        Ok(self.state.read()?.users.len())
    }

    /// Total bytes across all object records.
    pub fn total_bytes(&self) -> StoreResult<u64> {
        Ok(self.state.read()?.objects.values().map(|o| o.size).sum())
    }
}

impl Default for InMemoryMetaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetaStore for InMemoryMetaStore {
    fn put_object(&self, object: &MetaObject) -> StoreResult<()> {
        self.state.write()?.put_object(object);
        Ok(())
    }

    fn get_object(&self, id: &ObjectId) -> StoreResult<Option<MetaObject>> {
        Ok(self.state.read()?.objects.get(id).cloned())
    }

    fn objects(&self) -> StoreResult<Vec<MetaObject>> {
        Ok(self.state.read()?.objects.values().cloned().collect())
    }

    fn add_user(&self, name: &str, password: &str) -> StoreResult<()> {
        let user = MetaUser::new(name, password)?;
        self.state.write()?.insert_user(user)
    }

    fn delete_user(&self, name: &str) -> StoreResult<()> {
        self.state.write()?.remove_user(name)
    }

    fn get_user(&self, name: &str) -> StoreResult<Option<MetaUser>> {
        Ok(self.state.read()?.users.get(name).cloned())
    }

    fn users(&self) -> StoreResult<Vec<MetaUser>> {
        Ok(self.state.read()?.users.values().cloned().collect())
    }
}

impl std::fmt::Debug for InMemoryMetaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("InMemoryMetaStore");
        if let Ok(state) = self.state.read() {
            s.field("object_count", &state.objects.len())
                .field("user_count", &state.users.len());
        }
        s.finish()
    }
}
