use std::path::{Path, PathBuf};

use crate::source::{Entries, TreeEntry, TreeSource, WalkError};

/// In-memory content tree for tests.
///
/// Entries are yielded in insertion order. Failures added with
/// [`MemoryTree::error`] are yielded in place, like an unreadable entry on
/// a real filesystem.
#[derive(Clone, Debug, Default)]
pub struct MemoryTree {
    root: PathBuf,
    items: Vec<Result<TreeEntry, WalkError>>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/memory"),
            items: Vec::new(),
        }
    }

    /// Add a regular file.
    pub fn file(mut self, path: impl Into<PathBuf>, size: u64) -> Self {
        self.items.push(Ok(TreeEntry::file(path, size)));
        self
    }

    /// Add a directory.
    pub fn dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.items.push(Ok(TreeEntry::dir(path)));
        self
    }

    /// Add an entry that fails to be visited.
    pub fn error(mut self, path: impl Into<PathBuf>, reason: &str) -> Self {
        self.items
            .push(Err(WalkError::new(Some(path.into()), reason)));
        self
    }

    /// Add an object file at its sharded location, with its directories.
    pub fn object(self, id: &lfsd_types::ObjectId, size: u64) -> Self {
        let path = lfsd_types::shard_path(id);
        let mut tree = self;
        let mut ancestors: Vec<&Path> = path
            .ancestors()
            .skip(1)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        ancestors.reverse();
        for dir in ancestors {
            tree = tree.dir(dir);
        }
        tree.file(path, size)
    }

    /// Number of items (entries and failures).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl TreeSource for MemoryTree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn entries(&self) -> Entries<'_> {
        Box::new(self.items.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lfsd_types::ObjectId;

    #[test]
    fn yields_in_insertion_order() {
        let tree = MemoryTree::new()
            .dir("ab")
            .file("ab/cd/ef0123", 10)
            .error("ab/zz", "permission denied");
        let items: Vec<_> = tree.entries().collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1], Ok(TreeEntry::file("ab/cd/ef0123", 10)));
        assert!(items[2].is_err());
    }

    #[test]
    fn object_adds_shard_directories() {
        let id = ObjectId::parse("abcdef0123").unwrap();
        let tree = MemoryTree::new().object(&id, 7);
        let items: Vec<_> = tree.entries().map(Result::unwrap).collect();
        assert_eq!(
            items,
            vec![
                TreeEntry::dir("ab"),
                TreeEntry::dir("ab/cd"),
                TreeEntry::file("ab/cd/ef0123", 7),
            ]
        );
    }

    #[test]
    fn walks_are_repeatable() {
        let tree = MemoryTree::new().file("12/34/56789a", 20);
        assert_eq!(tree.entries().count(), tree.entries().count());
        assert_eq!(tree.len(), 1);
    }
}
