use std::fmt;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// Length of a SHA-1 digest in bytes.
pub const OBJECT_ID_LEN: usize = 20;

/// Git-compatible name of a stored blob.
///
/// A 160-bit SHA-1, so ids computed here match the ones the backing
/// repository assigns and can be checked against it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

impl ObjectId {
    /// SHA-1 of `data`, with no object header.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hash = [0u8; OBJECT_ID_LEN];
        hash.copy_from_slice(&Sha1::digest(data));
        Self(hash)
    }

    /// Wrap a digest that was already computed, e.g. over a git object header.
    pub fn from_hash(hash: [u8; OBJECT_ID_LEN]) -> Self {
        Self(hash)
    }

    /// The 40-character lowercase form git prints.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Abbreviated form for log lines.
    pub fn short_hex(&self) -> String {
        let mut s = self.to_hex();
        s.truncate(7);
        s
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_path_hash() {
        let id = ObjectId::from_bytes(b"Car/_ids/deadbeef");
        assert_eq!(id.to_hex(), "4616f0d04cf8d19dbe59f14a8225487e40061ba8");
    }

    #[test]
    fn empty_input() {
        assert_eq!(
            ObjectId::from_bytes(b"").to_string(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn debug_is_abbreviated() {
        let id = ObjectId::from_bytes(b"Car/_ids/deadbeef");
        assert_eq!(id.short_hex(), "4616f0d");
        assert_eq!(format!("{id:?}"), "ObjectId(4616f0d)");
    }
}
