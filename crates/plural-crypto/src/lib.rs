//! Hashing primitives for Plural.
//!
//! Every hash used as a storage path segment must be reproducible by the
//! backing git repository, so all hashing here is SHA-1 with git's
//! lowercase hex encoding. No custom cryptography.

pub mod hasher;

pub use hasher::{digest, GitHasher};
