//! Repository adapter for Plural.
//!
//! Plural never writes to the backing repository itself; it computes the
//! paths an entity occupies and hands them to a [`Repository`]. This crate
//! defines that boundary.
//!
//! # Backends
//!
//! All backends implement the [`Repository`] trait:
//!
//! - [`InMemoryRepository`] -- map-based repository for tests and embedding
//!
//! # Design Rules
//!
//! 1. Blobs are immutable and named by their git blob id.
//! 2. Paths are plain slash-delimited strings; the adapter never interprets them.
//! 3. A missing path is reported as [`StoreError::NotFound`], never as an empty blob.

pub mod blob;
pub mod error;
pub mod memory;
pub mod traits;

pub use blob::Blob;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryRepository;
pub use traits::Repository;
