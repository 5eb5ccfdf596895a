use plural_types::ObjectId;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Nothing is stored at the requested path.
    #[error("path not found: {0}")]
    NotFound(String),

    /// A path points at an object that is missing from the object database.
    #[error("dangling path {path}: object {id} is missing")]
    DanglingPath { path: String, id: ObjectId },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Returns `true` for [`StoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for repository operations.
pub type StoreResult<T> = Result<T, StoreError>;
