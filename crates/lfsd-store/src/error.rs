/// Errors from metadata store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A user with this name already exists.
    #[error("user already exists: {0}")]
    DuplicateUser(String),

    /// The requested user was not found.
    #[error("user not found: {0}")]
    NotFound(String),

    /// The caller supplied an empty or otherwise unusable value.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A stored credential could not be parsed.
    #[error("malformed credential: {0}")]
    Credential(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("database storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("database table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("database transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),

    #[error("database commit error: {0}")]
    Commit(#[from] redb::CommitError),

    /// A lock guarding store state was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

impl From<redb::TransactionError> for StoreError {
    fn from(e: redb::TransactionError) -> Self {
        Self::Transaction(Box::new(e))
    }
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::Poisoned
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
