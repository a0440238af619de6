//! Durable metadata store backed by redb.
//!
//! Objects live in one table (`id -> size`) and users in another
//! (`name -> JSON record`). Every mutating call is a single write
//! transaction, so a failed write leaves the committed records untouched
//! and a batch costs one commit regardless of how many records the store
//! already holds.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use lfsd_types::ObjectId;
use redb::{Database, ReadableTable, TableDefinition};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::record::{MetaObject, MetaUser};
use crate::traits::MetaStore;

const OBJECTS: TableDefinition<&str, u64> = TableDefinition::new("objects");
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Metadata store in a single redb database file.
pub struct DbMetaStore {
    path: PathBuf,
    db: Database,
    /// Write transactions committed since open.
    commits: AtomicU64,
}

impl DbMetaStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(&path)?;

        // Create both tables up front so read transactions never miss them.
        let txn = db.begin_write()?;
        {
            let _t = txn.open_table(OBJECTS)?;
            let _t = txn.open_table(USERS)?;
        }
        txn.commit()?;

        info!(path = %path.display(), "opened metadata store");
        Ok(Self {
            path,
            db,
            commits: AtomicU64::new(0),
        })
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of write transactions committed through this handle.
    pub fn commits(&self) -> u64 {
        self.commits.load(Ordering::Relaxed)
    }

    fn commit(&self, txn: redb::WriteTransaction) -> StoreResult<()> {
        txn.commit()?;
        self.commits.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn decode_user(name: &str, bytes: &[u8]) -> StoreResult<MetaUser> {
        serde_json::from_slice(bytes)
            .map_err(|e| StoreError::Serialization(format!("user {name}: {e}")))
    }
}

impl MetaStore for DbMetaStore {
    fn put_object(&self, object: &MetaObject) -> StoreResult<()> {
        self.put_objects(std::slice::from_ref(object))
    }

    fn put_objects(&self, objects: &[MetaObject]) -> StoreResult<()> {
        if objects.is_empty() {
            return Ok(());
        }
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(OBJECTS)?;
            for object in objects {
                table.insert(object.id.as_str(), object.size)?;
            }
        }
        self.commit(txn)?;
        debug!(records = objects.len(), "object records committed");
        Ok(())
    }

    fn get_object(&self, id: &ObjectId) -> StoreResult<Option<MetaObject>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(OBJECTS)?;
        let size = table.get(id.as_str())?.map(|guard| guard.value());
        Ok(size.map(|size| MetaObject::new(id.clone(), size)))
    }

    fn objects(&self) -> StoreResult<Vec<MetaObject>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(OBJECTS)?;
        let mut out = Vec::new();
        for entry in table.iter()? {
            let (key, size) = entry?;
            let id = ObjectId::parse(key.value())
                .map_err(|e| StoreError::Serialization(format!("object key: {e}")))?;
            out.push(MetaObject::new(id, size.value()));
        }
        Ok(out)
    }

    fn add_user(&self, name: &str, password: &str) -> StoreResult<()> {
        let user = MetaUser::new(name, password)?;
        let bytes =
            serde_json::to_vec(&user).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(USERS)?;
            let exists = table.get(name)?.is_some();
            if exists {
                drop(table);
                txn.abort()?;
                return Err(StoreError::DuplicateUser(name.to_string()));
            }
            table.insert(name, bytes.as_slice())?;
        }
        self.commit(txn)
    }

    fn delete_user(&self, name: &str) -> StoreResult<()> {
        if name.is_empty() {
            return Err(StoreError::InvalidInput("user name is empty".into()));
        }
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(USERS)?;
            let removed = table.remove(name)?.is_some();
            if !removed {
                drop(table);
                txn.abort()?;
                return Err(StoreError::NotFound(name.to_string()));
            }
        }
        self.commit(txn)
    }

    fn get_user(&self, name: &str) -> StoreResult<Option<MetaUser>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(USERS)?;
        let user = match table.get(name)? {
            Some(guard) => Some(Self::decode_user(name, guard.value())?),
            None => None,
        };
        Ok(user)
    }

    fn users(&self) -> StoreResult<Vec<MetaUser>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(USERS)?;
        let mut out = Vec::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            out.push(Self::decode_user(key.value(), value.value())?);
        }
        Ok(out)
    }
}

impl std::fmt::Debug for DbMetaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbMetaStore")
            .field("path", &self.path)
            .field("commits", &self.commits())
            .finish_non_exhaustive()
    }
}
