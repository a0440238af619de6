//! The [`TreeSource`] trait: a lazy sequence of entries below a content root.
//!
//! The reconciler only ever pulls entries from a `TreeSource`, so it can run
//! against the real filesystem ([`crate::FsTreeSource`]) or an in-memory
//! fake ([`crate::MemoryTree`]) without change.

use std::path::{Path, PathBuf};

/// What kind of filesystem object an entry is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Dir,
    /// Anything else (symlink, socket, device, ...).
    Other,
}

/// One visited entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path relative to the source root (empty for the root itself).
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Byte length; meaningful for files only.
    pub size: u64,
}

impl TreeEntry {
    pub fn file(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            size,
        }
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Dir,
            size: 0,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Failure to visit or stat a single entry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}: {reason}", display_path(.path))]
pub struct WalkError {
    /// Offending path, when the walker knows it.
    pub path: Option<PathBuf>,
    pub reason: String,
}

impl WalkError {
    pub fn new(path: Option<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path,
            reason: reason.into(),
        }
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_deref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string())
}

/// Boxed lazy entry sequence.
pub type Entries<'a> = Box<dyn Iterator<Item = Result<TreeEntry, WalkError>> + 'a>;

/// A tree of content objects that can be walked.
///
/// Implementations yield every entry (directories included) exactly once.
/// A per-entry failure is yielded as an `Err` item and must not end the
/// sequence.
pub trait TreeSource: Send + Sync {
    /// Root the entry paths are relative to (used for logging).
    fn root(&self) -> &Path;

    /// Start a fresh walk.
    fn entries(&self) -> Entries<'_>;
}
