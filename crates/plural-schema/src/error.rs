//! Error types for kind declaration and resolution.

use plural_types::Category;
use thiserror::Error;

/// Errors that can occur while declaring or resolving kinds.
///
/// All of these are programmer or configuration errors: they are raised
/// immediately and are never worth retrying.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A kind reference was not usable by the called operation.
    #[error("{operation}() takes a {category} kind, a name or Any. Got {got}")]
    InvalidArgument {
        operation: &'static str,
        category: Category,
        got: String,
    },

    /// No kind is registered under this name.
    #[error("there are no {category} kind defined with the name \"{name}\"")]
    DefinitionNotFound { category: Category, name: String },

    /// A kind with this name is already registered in the namespace.
    #[error("a {category} kind named \"{name}\" is already defined")]
    DuplicateDefinition { category: Category, name: String },

    /// Edge endpoints were given for a node kind.
    #[error("node kind \"{name}\" cannot connect nodes; only edge kinds declare endpoints")]
    EndpointsOnNode { name: String },

    /// The kind or field name cannot be used as a path segment.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A schema file declares kinds that extend each other in a loop.
    #[error("cyclic {category} kind definitions: {}", names.join(", "))]
    CyclicDefinition { category: Category, names: Vec<String> },

    /// A schema file could not be parsed.
    #[error("schema parse error: {0}")]
    Parse(String),
}

/// Convenience type alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
