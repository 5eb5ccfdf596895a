//! Kind declarations for Plural.
//!
//! A *kind* is a declared type of node or edge: a name, an optional parent
//! kind, and the fields that get a dedicated index path in the repository.
//! Kinds are declared once into a [`KindRegistry`] during start-up and are
//! immutable afterwards; the registry is then shared read-only.
//!
//! # Modules
//!
//! - [`error`]: Error types for declaration and resolution
//! - [`descriptor`]: [`TypeDescriptor`], [`KindBuilder`] and index inheritance
//! - [`kind_ref`]: The [`KindRef`] argument: by name, by descriptor, or any
//! - [`registry`]: [`KindRegistry`] and per-category [`Namespace`] views
//! - [`names`]: Kind, field and uuid validation
//! - [`definition`]: Declaring whole schemas from TOML or JSON

pub mod definition;
pub mod descriptor;
pub mod error;
pub mod kind_ref;
pub mod names;
pub mod registry;

pub use definition::{KindDefinition, SchemaDefinition};
pub use descriptor::{effective_indexes, EdgeEndpoints, KindBuilder, TypeDescriptor, UUID_FIELD};
pub use error::{Result, SchemaError};
pub use kind_ref::{resolve_name, KindRef, WILDCARD};
pub use names::{validate_field_name, validate_kind_name, validate_uuid};
pub use registry::{KindRegistry, Namespace};
