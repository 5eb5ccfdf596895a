use plural_crypto::GitHasher;
use plural_types::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Raw content object (analogous to a git blob).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    /// Create a new blob from raw bytes.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    /// The git blob id of this content.
    pub fn id(&self) -> ObjectId {
        GitHasher::BLOB.hash(&self.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Decode the content as UTF-8.
    pub fn as_str(&self) -> StoreResult<&str> {
        std::str::from_utf8(&self.data).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
