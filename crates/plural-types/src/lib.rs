//! Foundation types for Plural.
//!
//! This crate provides the small value types shared by every other Plural
//! crate: the git-compatible object identifier, the node/edge category tag
//! and the tagged field value stored on entities.
//!
//! # Key Types
//!
//! - [`ObjectId`]: Content-addressed identifier (SHA-1, as used by git)
//! - [`Category`]: Whether a kind describes nodes or edges
//! - [`FieldValue`]: Tagged scalar value of an entity field

pub mod category;
pub mod error;
pub mod object;
pub mod value;

pub use category::Category;
pub use error::TypeError;
pub use object::ObjectId;
pub use value::{FieldValue, Fields};
