//! Sharded on-disk layout for content objects.
//!
//! An object with id `abcdef0123` lives at `ab/cd/ef0123` below the content
//! root. The two leading directory levels bound the fan-out of any single
//! directory. [`shard_path`] and [`decode`] are exact inverses and never
//! touch the filesystem.

use std::path::{Component, Path, PathBuf};

use crate::error::LayoutError;
use crate::object::ObjectId;

/// Width in characters of each shard directory name.
pub const SHARD_WIDTH: usize = 2;

/// Number of shard directory levels above the object file.
pub const SHARD_LEVELS: usize = 2;

/// Relative path of an object below the content root (`id[0:2]/id[2:4]/id[4:]`).
pub fn shard_path(id: &ObjectId) -> PathBuf {
    let s = id.as_str();
    let (first, rest) = s.split_at(SHARD_WIDTH);
    let (second, name) = rest.split_at(SHARD_WIDTH);
    [first, second, name].iter().collect()
}

/// Absolute location of an object under `root`.
pub fn content_path_for(root: &Path, id: &ObjectId) -> PathBuf {
    root.join(shard_path(id))
}

/// Recover an object id from a path relative to the content root.
///
/// The path must consist of exactly two shard directories of
/// [`SHARD_WIDTH`] characters followed by a file name, and their
/// concatenation must be a valid [`ObjectId`].
pub fn decode(relative: &Path) -> Result<ObjectId, LayoutError> {
    let malformed = |reason: String| LayoutError::MalformedPath {
        path: relative.display().to_string(),
        reason,
    };

    let mut segments = Vec::with_capacity(SHARD_LEVELS + 1);
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part
                    .to_str()
                    .ok_or_else(|| malformed("path is not valid UTF-8".into()))?;
                segments.push(part);
            }
            other => {
                return Err(malformed(format!(
                    "unexpected path component {:?}",
                    other.as_os_str()
                )))
            }
        }
    }

    if segments.len() != SHARD_LEVELS + 1 {
        return Err(malformed(format!(
            "expected {} shard directories and a file name, found {} components",
            SHARD_LEVELS,
            segments.len()
        )));
    }
    for shard in &segments[..SHARD_LEVELS] {
        if shard.chars().count() != SHARD_WIDTH {
            return Err(malformed(format!(
                "shard directory {shard:?} is not {SHARD_WIDTH} characters"
            )));
        }
    }

    ObjectId::parse(&segments.concat()).map_err(|e| malformed(e.to_string()))
}
