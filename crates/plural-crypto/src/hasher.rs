use plural_types::object::OBJECT_ID_LEN;
use plural_types::ObjectId;
use sha1::{Digest, Sha1};

/// Lowercase hex SHA-1 of a string.
///
/// This is the digest used for every hashed path segment. It is a plain hash
/// of the UTF-8 bytes with no object header, so `digest(s)` equals
/// `printf %s "$s" | sha1sum`.
pub fn digest(input: &str) -> String {
    ObjectId::from_bytes(input.as_bytes()).to_hex()
}

/// Git object hasher.
///
/// Git names an object by hashing a `"{type} {len}\0"` header followed by the
/// content, so the id of a blob differs from the plain [`digest`] of its bytes.
pub struct GitHasher {
    object_type: &'static str,
}

impl GitHasher {
    /// Hasher for blob objects, the only object type the repository stores.
    pub const BLOB: Self = Self {
        object_type: "blob",
    };

    /// Compute the git object id of `data`.
    pub fn hash(&self, data: &[u8]) -> ObjectId {
        let mut hasher = Sha1::new();
        hasher.update(self.object_type.as_bytes());
        hasher.update(b" ");
        hasher.update(data.len().to_string().as_bytes());
        hasher.update([0u8]);
        hasher.update(data);
        let mut arr = [0u8; OBJECT_ID_LEN];
        arr.copy_from_slice(&hasher.finalize());
        ObjectId::from_hash(arr)
    }
}
