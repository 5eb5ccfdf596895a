//! The kind reference argument accepted throughout the API.

use std::sync::Arc;

use plural_types::Category;

use crate::descriptor::TypeDescriptor;
use crate::error::{Result, SchemaError};

/// Name that stands for "any kind".
pub const WILDCARD: &str = "*";

/// A kind given by name, by descriptor, or left unspecified.
///
/// Callers can pass `"Car"`, an `Arc<TypeDescriptor>`, or `None` anywhere a
/// kind is expected and let the resolution functions validate it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KindRef {
    ByName(String),
    ByKind(Arc<TypeDescriptor>),
    Any,
}

impl KindRef {
    /// Parse a name as written in schema files: `*` is [`KindRef::Any`].
    pub fn parse(name: &str) -> Self {
        if name == WILDCARD {
            Self::Any
        } else {
            Self::ByName(name.to_string())
        }
    }

    /// Short description used in error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::ByName(name) => format!("{name:?}"),
            Self::ByKind(kind) => format!("{} kind {:?}", kind.category(), kind.name()),
            Self::Any => "Any".to_string(),
        }
    }

    pub(crate) fn invalid(&self, operation: &'static str, category: Category) -> SchemaError {
        SchemaError::InvalidArgument {
            operation,
            category,
            got: self.describe(),
        }
    }
}

impl From<&str> for KindRef {
    fn from(name: &str) -> Self {
        Self::ByName(name.to_string())
    }
}

impl From<String> for KindRef {
    fn from(name: String) -> Self {
        Self::ByName(name)
    }
}

impl From<Arc<TypeDescriptor>> for KindRef {
    fn from(kind: Arc<TypeDescriptor>) -> Self {
        Self::ByKind(kind)
    }
}

impl From<&Arc<TypeDescriptor>> for KindRef {
    fn from(kind: &Arc<TypeDescriptor>) -> Self {
        Self::ByKind(Arc::clone(kind))
    }
}

impl<T: Into<KindRef>> From<Option<T>> for KindRef {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Any, Into::into)
    }
}

/// Resolve a kind reference to its canonical name within `category`.
///
/// A name is returned unchanged, a descriptor yields its name and
/// [`KindRef::Any`] yields [`WILDCARD`]. An empty name, or a descriptor from
/// the other category, fails with [`SchemaError::InvalidArgument`].
pub fn resolve_name(category: Category, kind: &KindRef) -> Result<String> {
    match kind {
        KindRef::ByName(name) if name.is_empty() => Err(kind.invalid("resolve_name", category)),
        KindRef::ByName(name) => Ok(name.clone()),
        KindRef::ByKind(descriptor) if descriptor.category() != category => {
            Err(kind.invalid("resolve_name", category))
        }
        KindRef::ByKind(descriptor) => Ok(descriptor.name().to_string()),
        KindRef::Any => Ok(WILDCARD.to_string()),
    }
}
