//! Graph entities for Plural.
//!
//! Nodes and edges are instances of kinds declared in a
//! [`KindRegistry`](plural_schema::KindRegistry). Each instance has a stable
//! uuid, and from that uuid and its kind the [`PathResolver`] derives every
//! storage path the instance occupies in the backing repository:
//!
//! ```text
//! Car/_ids/deadbeef                  raw id pointer
//! Car/_uuids/<H>                     hashed id pointer
//! Car/indexes/uuid/<H>               uuid index entry
//! Car/objects/<H>                    the serialized object
//! Car/indexes/<field>/<H>            one per other indexed field
//! ```
//!
//! where `<H>` is the SHA-1 of the raw id pointer path. This layout is the
//! on-repository contract: changing it makes existing data unreadable.

pub mod edge;
pub mod entity;
pub mod error;
pub mod node;
pub mod paths;

pub use edge::Edge;
pub use entity::{Entity, ObjectDocument};
pub use error::{ModelError, ModelResult};
pub use node::Node;
pub use paths::{entity_paths, PathResolver, PathRole, RelatedPath, StoragePath};
