//! Foundation types for lfsd.
//!
//! Every other lfsd crate depends on `lfsd-types` for the canonical object
//! identifier and the mapping between identifiers and their sharded
//! location under the content root.
//!
//! # Key Types
//!
//! - [`ObjectId`]: content-addressed identifier (lowercase hex)
//! - [`layout`]: `id[0:2]/id[2:4]/id[4:]` encode/decode

pub mod error;
pub mod layout;
pub mod object;

pub use error::{LayoutError, TypeError};
pub use layout::{content_path_for, decode, shard_path};
pub use object::ObjectId;
