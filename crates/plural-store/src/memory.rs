use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use plural_types::ObjectId;
use tracing::debug;

use crate::blob::Blob;
use crate::error::{StoreError, StoreResult};
use crate::traits::Repository;

/// In-memory, map-based repository.
///
/// Intended for tests and embedding. Blobs live in an object database keyed
/// by git blob id; the committed tree and the staging index each map a path
/// to a blob id. Everything sits behind `RwLock`s for safe concurrent access.
pub struct InMemoryRepository {
    objects: RwLock<HashMap<ObjectId, Blob>>,
    tree: RwLock<BTreeMap<String, ObjectId>>,
    index: RwLock<BTreeMap<String, ObjectId>>,
}

impl InMemoryRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            tree: RwLock::new(BTreeMap::new()),
            index: RwLock::new(BTreeMap::new()),
        }
    }

    /// Write a blob into the object database and return its id.
    ///
    /// Idempotent: identical content always maps to the same id.
    pub fn write_blob(&self, data: impl Into<Vec<u8>>) -> ObjectId {
        let blob = Blob::new(data);
        let id = blob.id();
        self.objects
            .write()
            .expect("lock poisoned")
            .entry(id)
            .or_insert(blob);
        id
    }

    /// Read a blob by object id.
    pub fn read_object(&self, id: &ObjectId) -> Option<Blob> {
        self.objects.read().expect("lock poisoned").get(id).cloned()
    }

    /// Write `data` and link it at `path` in the committed tree.
    pub fn put(&self, path: &str, data: impl Into<Vec<u8>>) -> ObjectId {
        let id = self.write_blob(data);
        self.tree
            .write()
            .expect("lock poisoned")
            .insert(path.to_string(), id);
        debug!(path, id = %id.short_hex(), "tree entry written");
        id
    }

    /// Write `data` and link it at `path` in the staging index.
    pub fn stage(&self, path: &str, data: impl Into<Vec<u8>>) -> ObjectId {
        let id = self.write_blob(data);
        self.index
            .write()
            .expect("lock poisoned")
            .insert(path.to_string(), id);
        debug!(path, id = %id.short_hex(), "index entry staged");
        id
    }

    /// Remove `path` from the staging index. Returns `true` if it was present.
    pub fn unstage(&self, path: &str) -> bool {
        self.index
            .write()
            .expect("lock poisoned")
            .remove(path)
            .is_some()
    }

    /// Sorted list of all committed paths.
    pub fn tree_paths(&self) -> Vec<String> {
        self.tree.read().expect("lock poisoned").keys().cloned().collect()
    }

    /// Sorted list of all staged paths.
    pub fn index_paths(&self) -> Vec<String> {
        self.index.read().expect("lock poisoned").keys().cloned().collect()
    }

    /// Number of distinct blobs in the object database.
    pub fn object_count(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    fn resolve(&self, links: &RwLock<BTreeMap<String, ObjectId>>, path: &str) -> StoreResult<Blob> {
        let id = links
            .read()
            .expect("lock poisoned")
            .get(path)
            .copied()
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        self.read_object(&id).ok_or_else(|| StoreError::DanglingPath {
            path: path.to_string(),
            id,
        })
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for InMemoryRepository {
    fn get(&self, path: &str) -> StoreResult<Blob> {
        self.resolve(&self.tree, path)
    }

    fn index_get(&self, path: &str) -> StoreResult<Blob> {
        self.resolve(&self.index, path)
    }
}

impl std::fmt::Debug for InMemoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("object_count", &self.object_count())
            .field("tree_entries", &self.tree.read().expect("lock poisoned").len())
            .field("index_entries", &self.index.read().expect("lock poisoned").len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_and_get() {
        let repo = InMemoryRepository::new();
        let id = repo.put("Car/_ids/deadbeef", "deadbeef");
        let blob = repo.get("Car/_ids/deadbeef").unwrap();
        assert_eq!(blob.data, b"deadbeef");
        assert_eq!(blob.id(), id);
    }

    #[test]
    fn stage_and_index_get() {
        let repo = InMemoryRepository::new();
        repo.stage("Car/indexes/brand/abc", "Tesla");
        assert_eq!(
            repo.index_get("Car/indexes/brand/abc").unwrap().as_str().unwrap(),
            "Tesla"
        );
        // staged paths are not visible in the committed tree
        assert!(repo.get("Car/indexes/brand/abc").unwrap_err().is_not_found());
    }

    #[test]
    fn missing_path_is_not_found() {
        let repo = InMemoryRepository::new();
        match repo.get("nope") {
            Err(StoreError::NotFound(path)) => assert_eq!(path, "nope"),
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(repo.index_get("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn contains_maps_not_found_to_false() {
        let repo = InMemoryRepository::new();
        repo.put("a", "1");
        repo.stage("b", "2");
        assert!(repo.contains("a").unwrap());
        assert!(!repo.contains("b").unwrap());
        assert!(repo.index_contains("b").unwrap());
        assert!(!repo.index_contains("a").unwrap());
    }

    #[test]
    fn identical_content_is_deduplicated() {
        let repo = InMemoryRepository::new();
        let a = repo.put("x", "same");
        let b = repo.stage("y", "same");
        assert_eq!(a, b);
        assert_eq!(repo.object_count(), 1);
    }

    #[test]
    fn unstage_removes_index_entry() {
        let repo = InMemoryRepository::new();
        repo.stage("b", "2");
        assert!(repo.unstage("b"));
        assert!(!repo.unstage("b"));
        assert!(repo.index_paths().is_empty());
    }

    #[test]
    fn paths_are_sorted() {
        let repo = InMemoryRepository::new();
        repo.put("b", "1");
        repo.put("a", "2");
        assert_eq!(repo.tree_paths(), vec!["a".to_string(), "b".to_string()]);
    }
}
