//! Storage path derivation.

use std::fmt;

use plural_crypto::digest;
use plural_schema::{KindRegistry, TypeDescriptor, UUID_FIELD};
use plural_store::{Blob, Repository, StoreError};
use tracing::{debug, trace};

use crate::entity::{check_uuid, Entity};
use crate::error::{ModelError, ModelResult};

/// Segment holding raw id pointers.
pub const IDS: &str = "_ids";
/// Segment holding hashed id pointers.
pub const UUIDS: &str = "_uuids";
/// Segment holding index entries, one directory per field.
pub const INDEXES: &str = "indexes";
/// Segment holding serialized objects.
pub const OBJECTS: &str = "objects";

/// A slash-delimited location in the backing repository.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoragePath(String);

impl StoragePath {
    /// `{kind}/_ids/{uuid}`
    pub fn id(kind: &str, uuid: &str) -> Self {
        Self(format!("{kind}/{IDS}/{uuid}"))
    }

    /// `{kind}/_uuids/{hash}`
    pub fn uuid(kind: &str, hash: &str) -> Self {
        Self(format!("{kind}/{UUIDS}/{hash}"))
    }

    /// `{kind}/indexes/{field}/{hash}`
    pub fn index(kind: &str, field: &str, hash: &str) -> Self {
        Self(format!("{kind}/{INDEXES}/{field}/{hash}"))
    }

    /// `{kind}/objects/{hash}`
    pub fn object(kind: &str, hash: &str) -> Self {
        Self(format!("{kind}/{OBJECTS}/{hash}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The leading kind segment.
    pub fn kind(&self) -> &str {
        self.0.split('/').next().unwrap_or_default()
    }

    pub fn segments(&self) -> std::str::Split<'_, char> {
        self.0.split('/')
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoragePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for StoragePath {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StoragePath {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<StoragePath> for String {
    fn from(path: StoragePath) -> Self {
        path.0
    }
}

/// What a derived path points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathRole {
    /// Raw id pointer, keyed by the literal uuid.
    Id,
    /// Hashed id pointer.
    Uuid,
    /// Index entry of a field; `uuid` included.
    Index(String),
    /// The serialized object.
    Object,
}

/// A derived path together with its role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelatedPath {
    pub path: StoragePath,
    pub role: PathRole,
}

/// Derive every path an entity of `kind` with `uuid` occupies, in order:
/// id pointer, hashed id pointer, uuid index, object, then the remaining
/// effective indexes in lexicographic order.
///
/// Pure: depends only on the kind's name and index hierarchy and the uuid.
pub fn entity_paths(kind: &TypeDescriptor, uuid: &str) -> ModelResult<Vec<RelatedPath>> {
    check_uuid(kind.name(), uuid)?;

    let name = kind.name();
    let id_path = StoragePath::id(name, uuid);
    let hash = digest(id_path.as_str());

    let mut paths = Vec::with_capacity(4 + kind.effective_indexes().len());
    paths.push(RelatedPath {
        path: id_path,
        role: PathRole::Id,
    });
    paths.push(RelatedPath {
        path: StoragePath::uuid(name, &hash),
        role: PathRole::Uuid,
    });
    paths.push(RelatedPath {
        path: StoragePath::index(name, UUID_FIELD, &hash),
        role: PathRole::Index(UUID_FIELD.to_string()),
    });
    paths.push(RelatedPath {
        path: StoragePath::object(name, &hash),
        role: PathRole::Object,
    });
    for field in kind.secondary_indexes() {
        paths.push(RelatedPath {
            path: StoragePath::index(name, field, &hash),
            role: PathRole::Index(field.to_string()),
        });
    }

    trace!(kind = name, uuid, count = paths.len(), "derived entity paths");
    Ok(paths)
}

/// Computes the storage paths of entities against one registry and one
/// repository.
///
/// Path derivation never reads the repository; it is only consulted by
/// [`PathResolver::lookup_related`].
pub struct PathResolver<'a, R: ?Sized> {
    registry: &'a KindRegistry,
    repository: &'a R,
}

impl<'a, R: Repository + ?Sized> PathResolver<'a, R> {
    pub fn new(registry: &'a KindRegistry, repository: &'a R) -> Self {
        Self {
            registry,
            repository,
        }
    }

    pub fn registry(&self) -> &'a KindRegistry {
        self.registry
    }

    pub fn repository(&self) -> &'a R {
        self.repository
    }

    /// Every path `entity` occupies, with roles. See [`entity_paths`].
    ///
    /// Fails with [`ModelError::UnregisteredKind`] when the entity's
    /// descriptor is not the one registered under its name.
    pub fn related_entries(&self, entity: &Entity) -> ModelResult<Vec<RelatedPath>> {
        let kind = entity.kind();
        if !self.registry.is_registered(kind) {
            return Err(ModelError::UnregisteredKind {
                category: kind.category(),
                name: kind.name().to_string(),
            });
        }
        entity_paths(kind, entity.uuid())
    }

    /// The ordered list of storage paths of `entity`.
    pub fn related_paths(&self, entity: &Entity) -> ModelResult<Vec<StoragePath>> {
        Ok(self
            .related_entries(entity)?
            .into_iter()
            .map(|related| related.path)
            .collect())
    }

    /// Fetch what the repository holds at each related path.
    ///
    /// The object is read from the committed tree, pointers and index
    /// entries from the staging index. Missing paths come back as `None`;
    /// any other repository error is returned.
    pub fn lookup_related(&self, entity: &Entity) -> ModelResult<Vec<(StoragePath, Option<Blob>)>> {
        let entries = self.related_entries(entity)?;
        let mut found = Vec::with_capacity(entries.len());
        for RelatedPath { path, role } in entries {
            let result = match role {
                PathRole::Object => self.repository.get(path.as_str()),
                _ => self.repository.index_get(path.as_str()),
            };
            let blob = match result {
                Ok(blob) => Some(blob),
                Err(StoreError::NotFound(_)) => None,
                Err(e) => return Err(e.into()),
            };
            found.push((path, blob));
        }
        debug!(
            kind = entity.kind_name(),
            uuid = entity.uuid(),
            present = found.iter().filter(|(_, blob)| blob.is_some()).count(),
            total = found.len(),
            "looked up related paths"
        );
        Ok(found)
    }
}
