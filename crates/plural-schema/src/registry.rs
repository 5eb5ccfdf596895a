//! The kind registry.
//!
//! A [`KindRegistry`] is built during a declaration phase through `&mut self`
//! and then shared read-only (typically as `Arc<KindRegistry>`). Resolution
//! never takes a lock: the borrow checker already guarantees no declaration
//! can overlap with a lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use plural_types::Category;
use tracing::debug;

use crate::descriptor::{EdgeEndpoints, KindBuilder, TypeDescriptor};
use crate::error::{Result, SchemaError};
use crate::kind_ref::{resolve_name, KindRef, WILDCARD};

/// Name → descriptor mapping, one namespace per [`Category`].
#[derive(Debug, Default)]
pub struct KindRegistry {
    nodes: BTreeMap<String, Arc<TypeDescriptor>>,
    edges: BTreeMap<String, Arc<TypeDescriptor>>,
}

impl KindRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn namespace_map(&self, category: Category) -> &BTreeMap<String, Arc<TypeDescriptor>> {
        match category {
            Category::Node => &self.nodes,
            Category::Edge => &self.edges,
        }
    }

    fn namespace_map_mut(
        &mut self,
        category: Category,
    ) -> &mut BTreeMap<String, Arc<TypeDescriptor>> {
        match category {
            Category::Node => &mut self.nodes,
            Category::Edge => &mut self.edges,
        }
    }

    // ---------------------------------------------------------------
    // Declaration
    // ---------------------------------------------------------------

    /// Add a built descriptor to its category's namespace.
    ///
    /// Fails with [`SchemaError::DuplicateDefinition`] when the name is
    /// taken; an existing kind is never replaced. The parent, if any, must be
    /// the very descriptor registered under its name.
    pub fn register(&mut self, kind: TypeDescriptor) -> Result<Arc<TypeDescriptor>> {
        let category = kind.category();

        if let Some(parent) = kind.parent() {
            if !self.is_registered(parent) {
                return Err(SchemaError::DefinitionNotFound {
                    category: parent.category(),
                    name: parent.name().to_string(),
                });
            }
            if parent.category() != category {
                return Err(KindRef::from(parent).invalid("register", category));
            }
        }

        let map = self.namespace_map_mut(category);
        if map.contains_key(kind.name()) {
            return Err(SchemaError::DuplicateDefinition {
                category,
                name: kind.name().to_string(),
            });
        }

        let kind = Arc::new(kind);
        map.insert(kind.name().to_string(), Arc::clone(&kind));
        debug!(
            %category,
            name = kind.name(),
            parent = kind.parent().map(|p| p.name()),
            indexes = ?kind.declared_indexes(),
            "kind registered"
        );
        Ok(kind)
    }

    /// Resolve a [`KindBuilder`]'s references against this registry, build
    /// the descriptor and register it.
    pub fn declare(&mut self, builder: KindBuilder) -> Result<Arc<TypeDescriptor>> {
        let category = builder.category;
        let parent = builder
            .parent
            .map(|parent| self.resolve_kind(category, parent))
            .transpose()?;

        let endpoints = match (category, builder.connects) {
            (Category::Node, Some(_)) => {
                return Err(SchemaError::EndpointsOnNode { name: builder.name })
            }
            (Category::Node, None) => None,
            (Category::Edge, Some((source, target))) => Some(EdgeEndpoints {
                source: self.endpoint_name(&source)?,
                target: self.endpoint_name(&target)?,
            }),
            (Category::Edge, None) => parent.as_ref().and_then(|p| p.endpoints().cloned()),
        };

        let kind = TypeDescriptor::new(category, builder.name, parent, builder.indexes, endpoints)?;
        self.register(kind)
    }

    /// Canonical node kind name for one side of an edge. Named node kinds
    /// must already be declared.
    fn endpoint_name(&self, kind: &KindRef) -> Result<String> {
        let name = resolve_name(Category::Node, kind)?;
        if name != WILDCARD {
            self.definition(Category::Node, &name)?;
        }
        Ok(name)
    }

    // ---------------------------------------------------------------
    // Resolution
    // ---------------------------------------------------------------

    /// Resolve a kind reference to a registered descriptor.
    ///
    /// A name is looked up in `category`'s namespace; a descriptor of the
    /// right category is returned unchanged. [`KindRef::Any`] (or the
    /// wildcard name) fails with [`SchemaError::InvalidArgument`] since a
    /// concrete kind is required.
    pub fn resolve_kind(
        &self,
        category: Category,
        kind: impl Into<KindRef>,
    ) -> Result<Arc<TypeDescriptor>> {
        let kind = kind.into();
        match kind {
            KindRef::ByName(ref name) if name.is_empty() || name == WILDCARD => {
                Err(kind.invalid("resolve_kind", category))
            }
            KindRef::ByName(name) => self.definition(category, &name),
            KindRef::ByKind(ref descriptor) if descriptor.category() != category => {
                Err(kind.invalid("resolve_kind", category))
            }
            KindRef::ByKind(descriptor) => Ok(descriptor),
            KindRef::Any => Err(kind.invalid("resolve_kind", category)),
        }
    }

    /// Resolve a kind reference to its canonical name. See [`resolve_name`].
    pub fn resolve_name(&self, category: Category, kind: impl Into<KindRef>) -> Result<String> {
        resolve_name(category, &kind.into())
    }

    /// Look up a kind by name.
    pub fn definition(&self, category: Category, name: &str) -> Result<Arc<TypeDescriptor>> {
        self.namespace_map(category)
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::DefinitionNotFound {
                category,
                name: name.to_string(),
            })
    }

    /// Whether `kind` is the descriptor registered under its name.
    pub fn is_registered(&self, kind: &Arc<TypeDescriptor>) -> bool {
        self.namespace_map(kind.category())
            .get(kind.name())
            .is_some_and(|registered| Arc::ptr_eq(registered, kind))
    }

    /// Number of registered kinds across both namespaces.
    pub fn len(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// View of the node namespace.
    pub fn nodes(&self) -> Namespace<'_> {
        Namespace {
            registry: self,
            category: Category::Node,
        }
    }

    /// View of the edge namespace.
    pub fn edges(&self) -> Namespace<'_> {
        Namespace {
            registry: self,
            category: Category::Edge,
        }
    }

    pub fn namespace(&self, category: Category) -> Namespace<'_> {
        Namespace {
            registry: self,
            category,
        }
    }
}

/// A registry view bound to one category.
#[derive(Clone, Copy, Debug)]
pub struct Namespace<'a> {
    registry: &'a KindRegistry,
    category: Category,
}

impl<'a> Namespace<'a> {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn resolve_name(&self, kind: impl Into<KindRef>) -> Result<String> {
        self.registry.resolve_name(self.category, kind)
    }

    pub fn resolve_kind(&self, kind: impl Into<KindRef>) -> Result<Arc<TypeDescriptor>> {
        self.registry.resolve_kind(self.category, kind)
    }

    pub fn definition(&self, name: &str) -> Result<Arc<TypeDescriptor>> {
        self.registry.definition(self.category, name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.namespace_map(self.category).contains_key(name)
    }

    /// Registered kinds, sorted by name.
    pub fn kinds(&self) -> impl Iterator<Item = &'a Arc<TypeDescriptor>> {
        self.registry.namespace_map(self.category).values()
    }

    pub fn len(&self) -> usize {
        self.registry.namespace_map(self.category).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
