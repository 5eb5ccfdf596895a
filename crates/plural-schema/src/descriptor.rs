//! Kind descriptors and index inheritance.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use plural_types::Category;

use crate::error::Result;
use crate::kind_ref::{KindRef, WILDCARD};
use crate::names::{validate_field_name, validate_kind_name};

/// The identifier field. It always has dedicated paths and is never listed
/// among the "other" index paths of an entity, even when declared.
pub const UUID_FIELD: &str = "uuid";

/// The node kinds an edge kind connects. Either side may be the wildcard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeEndpoints {
    pub source: String,
    pub target: String,
}

impl EdgeEndpoints {
    /// Endpoints that accept any node kind on both sides.
    pub fn any() -> Self {
        Self {
            source: WILDCARD.to_string(),
            target: WILDCARD.to_string(),
        }
    }
}

/// One declared kind of node or edge.
///
/// A descriptor holds only its *own* declared indexes; the indexes it
/// inherits are computed by walking the parent chain (see
/// [`TypeDescriptor::effective_indexes`]). Descriptors are immutable once
/// built and are shared as `Arc<TypeDescriptor>`.
pub struct TypeDescriptor {
    category: Category,
    name: String,
    parent: Option<Arc<TypeDescriptor>>,
    indexes: Vec<String>,
    endpoints: Option<EdgeEndpoints>,
    effective: OnceLock<BTreeSet<String>>,
}

impl TypeDescriptor {
    /// Build a descriptor, validating its name and index names.
    ///
    /// Duplicate index names are dropped, keeping the first occurrence.
    /// `endpoints` is ignored for node kinds.
    pub fn new(
        category: Category,
        name: impl Into<String>,
        parent: Option<Arc<TypeDescriptor>>,
        indexes: impl IntoIterator<Item = impl Into<String>>,
        endpoints: Option<EdgeEndpoints>,
    ) -> Result<Self> {
        let name = name.into();
        validate_kind_name(&name)?;

        let mut own: Vec<String> = Vec::new();
        for field in indexes {
            let field = field.into();
            validate_field_name(&field)?;
            if !own.contains(&field) {
                own.push(field);
            }
        }

        let endpoints = match category {
            Category::Node => None,
            Category::Edge => Some(endpoints.unwrap_or_else(EdgeEndpoints::any)),
        };

        Ok(Self {
            category,
            name,
            parent,
            indexes: own,
            endpoints,
            effective: OnceLock::new(),
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// The canonical name of this kind.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<TypeDescriptor>> {
        self.parent.as_ref()
    }

    /// The indexes declared on this kind itself, in declaration order.
    pub fn declared_indexes(&self) -> &[String] {
        &self.indexes
    }

    /// Source and target node kinds, for edge kinds.
    pub fn endpoints(&self) -> Option<&EdgeEndpoints> {
        self.endpoints.as_ref()
    }

    /// This kind followed by each of its ancestors up to the root.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Whether this kind is `other` or descends from it.
    pub fn is_a(&self, other: &TypeDescriptor) -> bool {
        self.category == other.category && self.ancestors().any(|k| k.name == other.name)
    }

    /// The union of this kind's own indexes and every ancestor's.
    ///
    /// Computed on first use and cached; the hierarchy is immutable so the
    /// set never changes afterwards. Iteration order is lexicographic.
    pub fn effective_indexes(&self) -> &BTreeSet<String> {
        self.effective.get_or_init(|| {
            self.ancestors()
                .flat_map(|kind| kind.indexes.iter().cloned())
                .collect()
        })
    }

    /// Effective indexes other than [`UUID_FIELD`], in path emission order.
    pub fn secondary_indexes(&self) -> impl Iterator<Item = &str> {
        self.effective_indexes()
            .iter()
            .map(String::as_str)
            .filter(|field| *field != UUID_FIELD)
    }

    /// Whether `field` is indexed on this kind (`uuid` always is).
    pub fn is_indexed(&self, field: &str) -> bool {
        field == UUID_FIELD || self.effective_indexes().contains(field)
    }
}

/// Free-function form of [`TypeDescriptor::effective_indexes`].
pub fn effective_indexes(kind: &TypeDescriptor) -> &BTreeSet<String> {
    kind.effective_indexes()
}

/// Iterator over a kind and its ancestors. See [`TypeDescriptor::ancestors`].
pub struct Ancestors<'a> {
    next: Option<&'a TypeDescriptor>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a TypeDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category
            && self.name == other.name
            && self.indexes == other.indexes
            && self.endpoints == other.endpoints
            && self.parent == other.parent
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("category", &self.category)
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("indexes", &self.indexes)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Declaration of a kind that has not been registered yet.
///
/// The parent and the edge endpoints are kept as [`KindRef`]s and resolved
/// by [`KindRegistry::declare`](crate::KindRegistry::declare).
#[derive(Clone, Debug)]
pub struct KindBuilder {
    pub(crate) category: Category,
    pub(crate) name: String,
    pub(crate) parent: Option<KindRef>,
    pub(crate) indexes: Vec<String>,
    pub(crate) connects: Option<(KindRef, KindRef)>,
}

impl KindBuilder {
    pub fn new(category: Category, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            parent: None,
            indexes: Vec::new(),
            connects: None,
        }
    }

    /// Start declaring a node kind.
    pub fn node(name: impl Into<String>) -> Self {
        Self::new(Category::Node, name)
    }

    /// Start declaring an edge kind.
    pub fn edge(name: impl Into<String>) -> Self {
        Self::new(Category::Edge, name)
    }

    /// Inherit from an already declared kind of the same category.
    pub fn extends(mut self, parent: impl Into<KindRef>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Declare one indexed field.
    pub fn index(mut self, field: impl Into<String>) -> Self {
        self.indexes.push(field.into());
        self
    }

    /// Declare several indexed fields, in order.
    pub fn indexes(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.indexes.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Node kinds this edge kind connects. Unset endpoints are inherited from
    /// the parent edge kind, or accept any node kind at the root.
    ///
    /// Declaring a node kind with endpoints fails with
    /// [`SchemaError::EndpointsOnNode`](crate::SchemaError::EndpointsOnNode).
    pub fn connects(mut self, source: impl Into<KindRef>, target: impl Into<KindRef>) -> Self {
        self.connects = Some((source.into(), target.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::new(Category::Edge, "Vehicle", None, ["max_speed"], None).unwrap())
    }

    fn car(parent: Arc<TypeDescriptor>) -> TypeDescriptor {
        TypeDescriptor::new(Category::Edge, "Car", Some(parent), ["brand", "model"], None).unwrap()
    }

    #[test]
    fn subclasses_inherit_indexes() {
        let car = car(vehicle());
        let expected: BTreeSet<String> = ["max_speed", "brand", "model"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(car.effective_indexes(), &expected);
        assert_eq!(effective_indexes(&car), &expected);
    }

    #[test]
    fn own_indexes_keep_declaration_order_without_duplicates() {
        let kind =
            TypeDescriptor::new(Category::Node, "Person", None, ["name", "age", "name"], None)
                .unwrap();
        assert_eq!(kind.declared_indexes(), &["name".to_string(), "age".to_string()]);
    }

    #[test]
    fn uuid_is_not_a_secondary_index() {
        let kind =
            TypeDescriptor::new(Category::Node, "Person", None, ["uuid", "name"], None).unwrap();
        assert_eq!(kind.secondary_indexes().collect::<Vec<_>>(), vec!["name"]);
        assert!(kind.is_indexed("uuid"));
        let bare = TypeDescriptor::new(Category::Node, "Thing", None, Vec::<String>::new(), None)
            .unwrap();
        assert!(bare.is_indexed("uuid"));
        assert!(bare.effective_indexes().is_empty());
    }

    #[test]
    fn ancestors_walk_to_root() {
        let vehicle = vehicle();
        let car = Arc::new(car(vehicle.clone()));
        let tesla =
            TypeDescriptor::new(Category::Edge, "Tesla", Some(car), ["battery"], None).unwrap();
        let names: Vec<&str> = tesla.ancestors().map(TypeDescriptor::name).collect();
        assert_eq!(names, vec!["Tesla", "Car", "Vehicle"]);
        assert!(tesla.is_a(&vehicle));
        assert!(!vehicle.is_a(&tesla));
    }

    #[test]
    fn rejects_invalid_names() {
        assert!(TypeDescriptor::new(Category::Node, "", None, ["a"], None).is_err());
        assert!(TypeDescriptor::new(Category::Node, "A", None, ["bad/field"], None).is_err());
    }

    #[test]
    fn edges_default_to_any_endpoints() {
        let edge = vehicle();
        assert_eq!(edge.endpoints(), Some(&EdgeEndpoints::any()));
        let node =
            TypeDescriptor::new(Category::Node, "N", None, Vec::<String>::new(), None).unwrap();
        assert!(node.endpoints().is_none());
    }
}
