use std::collections::BTreeMap;

use lfsd_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::record::{MetaObject, MetaUser};

/// Both record collections of [`crate::InMemoryMetaStore`], keyed for sorted
/// listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Snapshot {
    pub objects: BTreeMap<ObjectId, MetaObject>,
    pub users: BTreeMap<String, MetaUser>,
}

impl Snapshot {
    pub fn put_object(&mut self, object: &MetaObject) {
        self.objects.insert(object.id.clone(), object.clone());
    }

    pub fn insert_user(&mut self, user: MetaUser) -> StoreResult<()> {
        if self.users.contains_key(&user.name) {
            return Err(StoreError::DuplicateUser(user.name));
        }
        self.users.insert(user.name.clone(), user);
        Ok(())
    }

    pub fn remove_user(&mut self, name: &str) -> StoreResult<()> {
        if name.is_empty() {
            return Err(StoreError::InvalidInput("user name is empty".into()));
        }
        self.users
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}
