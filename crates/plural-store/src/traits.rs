use crate::blob::Blob;
use crate::error::{StoreError, StoreResult};

/// Key-addressable view of a git-like repository.
///
/// Implementations must satisfy these invariants:
/// - Lookups never mutate the repository.
/// - A path with nothing behind it fails with [`StoreError::NotFound`].
/// - Other failures (corruption, I/O) are propagated, never reported as
///   `NotFound`.
pub trait Repository: Send + Sync {
    /// Read the blob stored at `path` in the committed tree.
    fn get(&self, path: &str) -> StoreResult<Blob>;

    /// Read the blob stored at `path` in the staging index.
    fn index_get(&self, path: &str) -> StoreResult<Blob>;

    /// Whether `path` resolves through [`Repository::get`].
    ///
    /// Default implementation maps `NotFound` to `false`.
    fn contains(&self, path: &str) -> StoreResult<bool> {
        present(self.get(path))
    }

    /// Whether `path` resolves through [`Repository::index_get`].
    fn index_contains(&self, path: &str) -> StoreResult<bool> {
        present(self.index_get(path))
    }
}

fn present(result: StoreResult<Blob>) -> StoreResult<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(StoreError::NotFound(_)) => Ok(false),
        Err(e) => Err(e),
    }
}
