//! State shared by nodes and edges: uuid, kind and fields.

use std::sync::Arc;

use plural_crypto::digest;
use plural_schema::{validate_uuid, KindRef, KindRegistry, SchemaError, TypeDescriptor, UUID_FIELD};
use plural_types::{Category, FieldValue, Fields};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::paths::StoragePath;

/// An instance of a node or edge kind.
///
/// The uuid is fixed at construction. Fields stay mutable for the owner;
/// only those named by the kind's effective indexes get index paths.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    uuid: String,
    kind: Arc<TypeDescriptor>,
    fields: Fields,
}

impl Entity {
    /// Build an entity of a registered kind.
    pub fn new(
        registry: &KindRegistry,
        category: Category,
        kind: impl Into<KindRef>,
        uuid: impl Into<String>,
        fields: Fields,
    ) -> ModelResult<Self> {
        let kind = registry.resolve_kind(category, kind)?;
        Self::with_kind(kind, uuid, fields)
    }

    /// Build an entity from a descriptor without consulting a registry.
    ///
    /// Path derivation still checks that the descriptor is registered.
    pub fn with_kind(
        kind: Arc<TypeDescriptor>,
        uuid: impl Into<String>,
        fields: Fields,
    ) -> ModelResult<Self> {
        let uuid = uuid.into();
        check_uuid(kind.name(), &uuid)?;
        if fields.contains_key(UUID_FIELD) {
            return Err(ModelError::ReservedField(UUID_FIELD.to_string()));
        }
        Ok(Self { uuid, kind, fields })
    }

    /// A new time-ordered uuid (UUID v7) in hyphenated form.
    pub fn generate_uuid() -> String {
        uuid::Uuid::now_v7().to_string()
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn kind(&self) -> &Arc<TypeDescriptor> {
        &self.kind
    }

    pub fn kind_name(&self) -> &str {
        self.kind.name()
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Set a field, returning the previous value.
    pub fn set(
        &mut self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> ModelResult<Option<FieldValue>> {
        let field = field.into();
        if field == UUID_FIELD {
            return Err(ModelError::ReservedField(field));
        }
        Ok(self.fields.insert(field, value.into()))
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    /// The raw id pointer path, `{Kind}/_ids/{uuid}`.
    pub fn id_path(&self) -> StoragePath {
        StoragePath::id(self.kind.name(), &self.uuid)
    }

    /// The hash used as the last segment of every hashed path.
    pub fn object_hash(&self) -> String {
        digest(self.id_path().as_str())
    }

    /// Canonical encoding of an indexed field's value.
    ///
    /// `uuid` yields the uuid itself. Returns `None` for fields that are not
    /// indexed on this kind or not set.
    pub fn index_value(&self, field: &str) -> Option<String> {
        if field == UUID_FIELD {
            return Some(self.uuid.clone());
        }
        if !self.kind.is_indexed(field) {
            return None;
        }
        self.fields.get(field).map(FieldValue::canonical)
    }

    /// Indexed fields other than `uuid` paired with their current values,
    /// in path emission order. Unset fields map to `None`.
    pub fn indexed_values(&self) -> Vec<(&str, Option<&FieldValue>)> {
        self.kind
            .secondary_indexes()
            .map(|field| (field, self.fields.get(field)))
            .collect()
    }

    /// The document written at `{Kind}/objects/{hash}`.
    pub fn to_document(&self) -> ObjectDocument {
        ObjectDocument {
            uuid: self.uuid.clone(),
            kind: self.kind.name().to_string(),
            category: self.kind.category(),
            fields: self.fields.clone(),
            source: None,
            target: None,
        }
    }
}

/// Check that `uuid` is present and usable as the last segment of
/// `{kind}/_ids/{uuid}`.
pub(crate) fn check_uuid(kind: &str, uuid: &str) -> ModelResult<()> {
    if uuid.is_empty() {
        return Err(ModelError::MissingIdentifier {
            kind: kind.to_string(),
        });
    }
    validate_uuid(uuid).map_err(|e| match e {
        SchemaError::InvalidName { reason, .. } => ModelError::InvalidIdentifier {
            kind: kind.to_string(),
            uuid: uuid.to_string(),
            reason,
        },
        other => other.into(),
    })
}

/// Serialized form of an entity, stored as JSON at its object path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectDocument {
    pub uuid: String,
    pub kind: String,
    pub category: Category,
    #[serde(default)]
    pub fields: Fields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl ObjectDocument {
    pub fn to_json_bytes(&self) -> ModelResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ModelError::Serialization(e.to_string()))
    }

    pub fn from_json_bytes(bytes: &[u8]) -> ModelResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| ModelError::Serialization(e.to_string()))
    }

    pub(crate) fn expect_category(&self, expected: Category) -> ModelResult<()> {
        if self.category != expected {
            return Err(ModelError::CategoryMismatch {
                expected,
                got: self.category,
            });
        }
        Ok(())
    }

    /// Rebuild the shared entity state against `registry`.
    pub(crate) fn to_entity(&self, registry: &KindRegistry) -> ModelResult<Entity> {
        Entity::new(
            registry,
            self.category,
            self.kind.as_str(),
            self.uuid.clone(),
            self.fields.clone(),
        )
    }
}
