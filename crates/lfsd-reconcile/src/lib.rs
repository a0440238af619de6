//! Reconciliation engine for lfsd.
//!
//! Rebuilds the object collection of a [`lfsd_store::MetaStore`] from what
//! is physically present under the content root. Content is immutable once
//! written, so a full re-scan that re-derives every id from its path is
//! always safe to repeat.
//!
//! - [`TreeSource`]: pull-style walk over a tree ([`FsTreeSource`], [`MemoryTree`])
//! - [`Reconciler`]: the walk-decode-upsert loop and its [`ReconcileReport`]
//! - [`CancelFlag`]: cooperative cancellation between entries

pub mod cancel;
pub mod fs;
pub mod memory;
pub mod reconciler;
pub mod source;

pub use cancel::{CancelFlag, CancelOnDrop};
pub use fs::FsTreeSource;
pub use memory::MemoryTree;
pub use reconciler::{ReconcileOptions, ReconcileReport, Reconciler};
pub use source::{EntryKind, TreeEntry, TreeSource, WalkError};
