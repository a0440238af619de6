use thiserror::Error;

/// Errors produced when parsing object identifiers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id {id:?}: contains non-hex character {found:?}")]
    InvalidHex { id: String, found: char },

    #[error("invalid object id length: expected at least {min}, got {actual}")]
    InvalidLength { min: usize, actual: usize },
}

/// Errors produced when mapping between object ids and shard paths.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// The relative path does not follow the `xx/yy/rest` shard layout.
    #[error("malformed object path {path}: {reason}")]
    MalformedPath { path: String, reason: String },
}
