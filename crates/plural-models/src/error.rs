use plural_schema::SchemaError;
use plural_store::StoreError;
use plural_types::Category;
use thiserror::Error;

/// Errors from entity construction and path derivation.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The entity has no usable uuid.
    #[error("{kind} entity has no uuid")]
    MissingIdentifier { kind: String },

    /// The uuid cannot be used as a single path segment.
    #[error("{kind} uuid {uuid:?} is not a valid path segment: {reason}")]
    InvalidIdentifier {
        kind: String,
        uuid: String,
        reason: String,
    },

    /// An edge is missing the uuid of one of its nodes.
    #[error("{edge} edge has no {side} node")]
    MissingEndpoint { edge: String, side: &'static str },

    /// The entity's kind is not the one registered under its name.
    #[error("{category} kind \"{name}\" is not registered")]
    UnregisteredKind { category: Category, name: String },

    /// A field name that is reserved for entity metadata.
    #[error("field \"{0}\" is reserved")]
    ReservedField(String),

    /// An edge endpoint is a node of the wrong kind.
    #[error("{edge} {side} must be a {expected} node, got {got}")]
    EndpointMismatch {
        edge: String,
        side: &'static str,
        expected: String,
        got: String,
    },

    /// An object document does not describe an entity of this category.
    #[error("object document is a {got}, expected a {expected}")]
    CategoryMismatch { expected: Category, got: Category },

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
