//! Full re-scan reconciliation of object records against the content tree.
//!
//! Every regular file under the root is mapped back to its object id via
//! the shard layout and upserted into the [`MetaStore`]. A failure scoped
//! to one entry (unreadable entry, malformed path, rejected write) is
//! logged and counted, and the walk moves on.

use std::fmt;
use std::sync::Arc;

use lfsd_store::{MetaObject, MetaStore};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cancel::CancelFlag;
use crate::source::TreeSource;

/// Tuning knobs for a reconciliation pass.
#[derive(Clone, Debug)]
pub struct ReconcileOptions {
    /// Object records upserted per store call.
    pub batch_size: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self { batch_size: 512 }
    }
}

/// Counters describing one reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Entries visited, including directories and failed entries.
    pub entries: u64,
    /// Regular files seen.
    pub files: u64,
    /// Object records written.
    pub upserted: u64,
    /// Files whose path is not a valid shard location.
    pub malformed: u64,
    /// Entries that could not be visited.
    pub walk_errors: u64,
    /// Object records the store rejected.
    pub store_errors: u64,
    /// The pass stopped before the walk finished.
    pub cancelled: bool,
}

impl ReconcileReport {
    /// Total per-entry failures.
    pub fn failures(&self) -> u64 {
        self.malformed + self.walk_errors + self.store_errors
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries, {} files, {} upserted, {} malformed, {} walk errors, {} store errors",
            self.entries,
            self.files,
            self.upserted,
            self.malformed,
            self.walk_errors,
            self.store_errors
        )?;
        if self.cancelled {
            f.write_str(" (cancelled)")?;
        }
        Ok(())
    }
}

/// Rebuilds object records from a [`TreeSource`].
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn MetaStore>,
    options: ReconcileOptions,
}

impl Reconciler {
    pub fn new(store: Arc<dyn MetaStore>) -> Self {
        Self::with_options(store, ReconcileOptions::default())
    }

    pub fn with_options(store: Arc<dyn MetaStore>, options: ReconcileOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Walk `source` and upsert a record for every well-formed object file.
    ///
    /// Never fails as a whole: per-entry failures are logged and counted in
    /// the returned report. Checks `cancel` between entries. Blocking; run it
    /// off the async executor.
    pub fn run(&self, source: &dyn TreeSource, cancel: &CancelFlag) -> ReconcileReport {
        let root = source.root().display().to_string();
        info!(root = %root, "reconciliation started");

        let batch_size = self.options.batch_size.max(1);
        let mut report = ReconcileReport::default();
        let mut batch = Vec::with_capacity(batch_size);

        for item in source.entries() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            report.entries += 1;

            let entry = match item {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(root = %root, path = ?err.path, error = %err.reason, "skipping unreadable entry");
                    report.walk_errors += 1;
                    continue;
                }
            };
            if !entry.is_file() {
                continue;
            }
            report.files += 1;

            let id = match lfsd_types::decode(&entry.path) {
                Ok(id) => id,
                Err(err) => {
                    warn!(
                        path = %entry.path.display(),
                        size = entry.size,
                        error = %err,
                        "skipping malformed object path"
                    );
                    report.malformed += 1;
                    continue;
                }
            };

            batch.push(MetaObject::new(id, entry.size));
            if batch.len() >= batch_size {
                self.flush(&mut batch, &mut report);
            }
        }
        self.flush(&mut batch, &mut report);

        if report.cancelled {
            warn!(root = %root, %report, "reconciliation cancelled");
        } else {
            info!(root = %root, %report, "reconciliation finished");
        }
        report
    }

    /// Upsert the pending batch, falling back to one write per record so a
    /// single rejected record does not take the rest of the batch with it.
    fn flush(&self, batch: &mut Vec<MetaObject>, report: &mut ReconcileReport) {
        if batch.is_empty() {
            return;
        }
        match self.store.put_objects(batch) {
            Ok(()) => report.upserted += batch.len() as u64,
            Err(err) => {
                debug!(records = batch.len(), error = %err, "batch upsert failed, retrying per record");
                for object in batch.iter() {
                    match self.store.put_object(object) {
                        Ok(()) => report.upserted += 1,
                        Err(err) => {
                            warn!(id = %object.id, size = object.size, error = %err, "failed to store object record");
                            report.store_errors += 1;
                        }
                    }
                }
            }
        }
        batch.clear();
    }
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTree;
    use lfsd_store::{InMemoryMetaStore, MetaUser, StoreError, StoreResult};
    use lfsd_types::ObjectId;

    fn obj(id: &str, size: u64) -> MetaObject {
        MetaObject::new(ObjectId::parse(id).unwrap(), size)
    }

    fn scenario_tree() -> MemoryTree {
        MemoryTree::new()
            .dir("")
            .dir("ab")
            .dir("ab/cd")
            .file("ab/cd/ef0123", 10)
            .dir("12")
            .dir("12/34")
            .file("12/34/56789a", 20)
    }

    fn reconcile(store: Arc<InMemoryMetaStore>, tree: &MemoryTree) -> ReconcileReport {
        Reconciler::new(store).run(tree, &CancelFlag::new())
    }

    /// Store that rejects writes for one id.
    struct RejectingStore {
        inner: InMemoryMetaStore,
        reject: ObjectId,
    }

    impl MetaStore for RejectingStore {
        fn put_object(&self, object: &MetaObject) -> StoreResult<()> {
            if object.id == self.reject {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.inner.put_object(object)
        }
        fn put_objects(&self, objects: &[MetaObject]) -> StoreResult<()> {
            if objects.iter().any(|o| o.id == self.reject) {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.inner.put_objects(objects)
        }
        fn get_object(&self, id: &ObjectId) -> StoreResult<Option<MetaObject>> {
            self.inner.get_object(id)
        }
        fn objects(&self) -> StoreResult<Vec<MetaObject>> {
            self.inner.objects()
        }
        fn add_user(&self, name: &str, password: &str) -> StoreResult<()> {
            self.inner.add_user(name, password)
        }
        fn delete_user(&self, name: &str) -> StoreResult<()> {
            self.inner.delete_user(name)
        }
        fn get_user(&self, name: &str) -> StoreResult<Option<MetaUser>> {
            self.inner.get_user(name)
        }
        fn users(&self) -> StoreResult<Vec<MetaUser>> {
            self.inner.users()
        }
    }

    #[test]
    fn scenario_two_objects() {
        let store = Arc::new(InMemoryMetaStore::new());
        let report = reconcile(store.clone(), &scenario_tree());

        assert_eq!(
            store.objects().unwrap(),
            vec![obj("123456789a", 20), obj("abcdef0123", 10)]
        );
        assert_eq!(report.entries, 7);
        assert_eq!(report.files, 2);
        assert_eq!(report.upserted, 2);
        assert_eq!(report.failures(), 0);
        assert!(!report.cancelled);
    }

    #[test]
    fn rerun_is_idempotent() {
        let store = Arc::new(InMemoryMetaStore::new());
        let tree = scenario_tree();
        reconcile(store.clone(), &tree);
        let first = store.objects().unwrap();
        reconcile(store.clone(), &tree);
        assert_eq!(store.objects().unwrap(), first);
    }

    #[test]
    fn unreadable_entry_does_not_stop_the_walk() {
        let store = Arc::new(InMemoryMetaStore::new());
        let tree = MemoryTree::new()
            .file("ab/cd/ef0123", 10)
            .error("ff/ff", "permission denied")
            .file("12/34/56789a", 20);
        let report = reconcile(store.clone(), &tree);

        assert_eq!(report.walk_errors, 1);
        assert_eq!(store.objects().unwrap().len(), 2);
    }

    #[test]
    fn malformed_paths_are_skipped() {
        let store = Arc::new(InMemoryMetaStore::new());
        let tree = MemoryTree::new()
            .file("README", 5)
            .file("ab/cdef0123", 5)
            .file("ab/cd/ef0123.tmp", 5)
            .file("ab/cd/ef0123", 10);
        let report = reconcile(store.clone(), &tree);

        assert_eq!(report.malformed, 3);
        assert_eq!(store.objects().unwrap(), vec![obj("abcdef0123", 10)]);
    }

    #[test]
    fn directories_are_never_decoded() {
        let store = Arc::new(InMemoryMetaStore::new());
        // A directory at a position that would decode as a valid id.
        let tree = MemoryTree::new().dir("ab/cd/ef0123");
        let report = reconcile(store.clone(), &tree);

        assert_eq!(report.files, 0);
        assert_eq!(report.malformed, 0);
        assert!(store.objects().unwrap().is_empty());
    }

    #[test]
    fn rejected_record_does_not_lose_its_batch() {
        let store = Arc::new(RejectingStore {
            inner: InMemoryMetaStore::new(),
            reject: ObjectId::parse("abcdef0123").unwrap(),
        });
        let reconciler = Reconciler::with_options(store.clone(), ReconcileOptions { batch_size: 10 });
        let report = reconciler.run(&scenario_tree(), &CancelFlag::new());

        assert_eq!(report.store_errors, 1);
        assert_eq!(report.upserted, 1);
        assert_eq!(store.objects().unwrap(), vec![obj("123456789a", 20)]);
    }

    #[test]
    fn small_batches_cover_every_file() {
        let store = Arc::new(InMemoryMetaStore::new());
        let mut tree = MemoryTree::new();
        for i in 0..25u64 {
            tree = tree.object(&ObjectId::parse(&format!("{i:08x}")).unwrap(), i);
        }
        let reconciler =
            Reconciler::with_options(store.clone(), ReconcileOptions { batch_size: 4 });
        let report = reconciler.run(&tree, &CancelFlag::new());

        assert_eq!(report.upserted, 25);
        assert_eq!(store.object_count().unwrap(), 25);
    }

    #[test]
    fn cancelled_flag_stops_before_any_write() {
        let store = Arc::new(InMemoryMetaStore::new());
        let cancel = CancelFlag::new();
        cancel.cancel();
        let report = Reconciler::new(store.clone()).run(&scenario_tree(), &cancel);

        assert!(report.cancelled);
        assert_eq!(report.entries, 0);
        assert!(store.objects().unwrap().is_empty());
    }

    #[test]
    fn report_display_mentions_counts() {
        let report = ReconcileReport {
            entries: 3,
            files: 2,
            upserted: 1,
            malformed: 1,
            cancelled: true,
            ..Default::default()
        };
        let text = report.to_string();
        assert!(text.contains("2 files"));
        assert!(text.contains("1 upserted"));
        assert!(text.ends_with("(cancelled)"));
    }
}
