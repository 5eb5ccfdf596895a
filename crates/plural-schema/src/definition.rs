//! Declaring a whole schema from a TOML or JSON document.
//!
//! ```toml
//! [[nodes]]
//! name = "Person"
//! indexes = ["email"]
//!
//! [[edges]]
//! name = "Vehicle"
//! indexes = ["max_speed"]
//!
//! [[edges]]
//! name = "Car"
//! extends = "Vehicle"
//! indexes = ["brand", "model"]
//! source = "Person"
//! target = "*"
//! ```
//!
//! Kinds may appear in any order: parents are declared before their
//! children, and node kinds before edge kinds.

use std::sync::Arc;

use plural_types::Category;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::descriptor::{KindBuilder, TypeDescriptor};
use crate::error::{Result, SchemaError};
use crate::kind_ref::{KindRef, WILDCARD};
use crate::registry::KindRegistry;

/// One kind as written in a schema document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default)]
    pub indexes: Vec<String>,
    /// Source node kind, edges only. Defaults to the parent's or `*`.
    /// Setting it on a node kind fails the declaration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Target node kind, edges only. Defaults to the parent's or `*`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl KindDefinition {
    fn builder(&self, category: Category) -> KindBuilder {
        let mut builder = KindBuilder::new(category, self.name.clone()).indexes(self.indexes.clone());
        if let Some(parent) = &self.extends {
            builder = builder.extends(parent.as_str());
        }
        if self.source.is_some() || self.target.is_some() {
            let side = |s: &Option<String>| KindRef::parse(s.as_deref().unwrap_or(WILDCARD));
            builder = builder.connects(side(&self.source), side(&self.target));
        }
        builder
    }
}

/// A set of node and edge kinds to declare together.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default)]
    pub nodes: Vec<KindDefinition>,
    #[serde(default)]
    pub edges: Vec<KindDefinition>,
}

impl SchemaDefinition {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| SchemaError::Parse(e.to_string()))
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| SchemaError::Parse(e.to_string()))
    }

    /// Declare every kind into `registry`, returning the new descriptors in
    /// declaration order.
    ///
    /// A parent must be defined in this document or already registered.
    /// Kinds that only extend each other fail with
    /// [`SchemaError::CyclicDefinition`].
    pub fn declare_into(&self, registry: &mut KindRegistry) -> Result<Vec<Arc<TypeDescriptor>>> {
        let mut declared = declare_category(registry, Category::Node, &self.nodes)?;
        declared.extend(declare_category(registry, Category::Edge, &self.edges)?);
        info!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "schema declared"
        );
        Ok(declared)
    }

    /// Build a fresh registry holding exactly this schema.
    pub fn to_registry(&self) -> Result<KindRegistry> {
        let mut registry = KindRegistry::new();
        self.declare_into(&mut registry)?;
        Ok(registry)
    }
}

fn declare_category(
    registry: &mut KindRegistry,
    category: Category,
    definitions: &[KindDefinition],
) -> Result<Vec<Arc<TypeDescriptor>>> {
    let mut pending: Vec<&KindDefinition> = definitions.iter().collect();
    let mut declared = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let (ready, blocked): (Vec<_>, Vec<_>) = pending.into_iter().partition(|def| {
            def.extends
                .as_deref()
                .map_or(true, |parent| registry.namespace(category).contains(parent))
        });

        if ready.is_empty() {
            // A parent that no pending definition provides is simply missing.
            for def in &blocked {
                if let Some(parent) = def.extends.as_deref() {
                    if !blocked.iter().any(|other| other.name == parent) {
                        return Err(SchemaError::DefinitionNotFound {
                            category,
                            name: parent.to_string(),
                        });
                    }
                }
            }
            return Err(SchemaError::CyclicDefinition {
                category,
                names: blocked.iter().map(|def| def.name.clone()).collect(),
            });
        }

        for def in ready {
            declared.push(registry.declare(def.builder(category))?);
        }
        pending = blocked;
    }

    Ok(declared)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VEHICLES: &str = r#"
        [[nodes]]
        name = "Person"
        indexes = ["email"]

        [[edges]]
        name = "Car"
        extends = "Vehicle"
        indexes = ["brand", "model"]

        [[edges]]
        name = "Vehicle"
        indexes = ["max_speed"]
        source = "Person"
    "#;

    #[test]
    fn declares_parents_first() {
        let schema = SchemaDefinition::from_toml_str(VEHICLES).unwrap();
        let registry = schema.to_registry().unwrap();
        let car = registry.edges().definition("Car").unwrap();
        assert_eq!(car.parent().map(|p| p.name()), Some("Vehicle"));
        assert_eq!(car.effective_indexes().len(), 3);
        // endpoints inherited from Vehicle
        let endpoints = car.endpoints().unwrap();
        assert_eq!(endpoints.source, "Person");
        assert_eq!(endpoints.target, "*");
    }

    #[test]
    fn json_schema() {
        let schema = SchemaDefinition::from_json_str(
            r#"{"nodes": [{"name": "Person", "indexes": ["email"]}]}"#,
        )
        .unwrap();
        assert!(schema.edges.is_empty());
        let registry = schema.to_registry().unwrap();
        assert!(registry.nodes().contains("Person"));
    }

    #[test]
    fn missing_parent() {
        let schema = SchemaDefinition {
            nodes: vec![KindDefinition {
                name: "Car".into(),
                extends: Some("Vehicle".into()),
                ..Default::default()
            }],
            edges: vec![],
        };
        assert_eq!(
            schema.to_registry().unwrap_err(),
            SchemaError::DefinitionNotFound {
                category: Category::Node,
                name: "Vehicle".into()
            }
        );
    }

    #[test]
    fn cyclic_parents() {
        let def = |name: &str, parent: &str| KindDefinition {
            name: name.into(),
            extends: Some(parent.into()),
            ..Default::default()
        };
        let schema = SchemaDefinition {
            nodes: vec![def("A", "B"), def("B", "A")],
            edges: vec![],
        };
        assert!(matches!(
            schema.to_registry(),
            Err(SchemaError::CyclicDefinition { ref names, .. }) if names.len() == 2
        ));
    }

    #[test]
    fn parent_may_already_be_registered() {
        let mut registry = KindRegistry::new();
        registry
            .declare(KindBuilder::node("Vehicle").index("max_speed"))
            .unwrap();
        let schema = SchemaDefinition {
            nodes: vec![KindDefinition {
                name: "Car".into(),
                extends: Some("Vehicle".into()),
                indexes: vec!["brand".into()],
                ..Default::default()
            }],
            edges: vec![],
        };
        let declared = schema.declare_into(&mut registry).unwrap();
        assert_eq!(declared.len(), 1);
        assert_eq!(registry.nodes().len(), 2);
    }

    #[test]
    fn endpoints_on_node_definition_are_rejected() {
        let schema = SchemaDefinition::from_toml_str(
            "[[nodes]]\nname = \"Person\"\nsource = \"Person\"\n",
        )
        .unwrap();
        assert_eq!(
            schema.to_registry().unwrap_err(),
            SchemaError::EndpointsOnNode { name: "Person".into() }
        );
    }

    #[test]
    fn parse_error() {
        assert!(matches!(
            SchemaDefinition::from_toml_str("nodes = 3"),
            Err(SchemaError::Parse(_))
        ));
    }
}
