use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Field name → value mapping carried by every entity.
///
/// A `BTreeMap` keeps serialization of entity objects deterministic.
pub type Fields = BTreeMap<String, FieldValue>;

/// A scalar value stored in an entity field.
///
/// Serialized untagged so object documents read as plain JSON. References to
/// other entities serialize as `{"$ref": "<uuid>"}` to stay distinguishable
/// from ordinary strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Reference {
        #[serde(rename = "$ref")]
        uuid: String,
    },
}

impl FieldValue {
    /// Reference to another entity by uuid.
    pub fn reference(uuid: impl Into<String>) -> Self {
        Self::Reference { uuid: uuid.into() }
    }

    /// Canonical string encoding used when a value is hashed or written as
    /// an index entry.
    ///
    /// Strings and references are used verbatim, integers and booleans use
    /// their `Display` form, and `Null` encodes as the empty string. Floats
    /// always carry a fraction or exponent (`2.0`, `1e100`) so they never
    /// collide with an integer of the same magnitude.
    pub fn canonical(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format!("{f:?}"),
            Self::String(s) => s.clone(),
            Self::Reference { uuid } => uuid.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
