//! High-level SDK for Plural.
//!
//! Bundles a frozen [`KindRegistry`] with a [`Repository`] and exposes the
//! operations applications need: build nodes and edges, and compute or look
//! up the storage paths they occupy.

pub mod config;
pub mod error;
pub mod graph;

pub use config::PluralConfig;
pub use error::{SdkError, SdkResult};
pub use graph::Plural;

// Re-export key types
pub use plural_crypto::digest;
pub use plural_models::{Edge, Entity, Node, PathRole, RelatedPath, StoragePath};
pub use plural_schema::{KindBuilder, KindRef, KindRegistry, SchemaDefinition, TypeDescriptor};
pub use plural_store::{Blob, InMemoryRepository, Repository};
pub use plural_types::{Category, FieldValue, Fields};
