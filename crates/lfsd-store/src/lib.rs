//! Metadata store for lfsd.
//!
//! Holds two independent collections: object records (`id -> size`) built
//! by reconciliation against the content tree, and user records whose
//! secrets are kept only in a verifiable, salted form.
//!
//! # Storage Backends
//!
//! All backends implement the [`MetaStore`] trait:
//!
//! - [`InMemoryMetaStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`DbMetaStore`] -- redb database file, one write transaction per call
//!
//! # Design Rules
//!
//! 1. Object writes are upserts by id; repeating one is a no-op.
//! 2. A failed write never corrupts existing records.
//! 3. User names are unique and never silently overwritten.
//! 4. Plaintext secrets are never persisted.

pub mod credential;
pub mod db;
pub mod error;
pub mod memory;
pub mod record;
mod snapshot;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use credential::Credential;
pub use db::DbMetaStore;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryMetaStore;
pub use record::{MetaObject, MetaUser};
pub use traits::MetaStore;
