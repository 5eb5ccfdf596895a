use std::ops::{Deref, DerefMut};

use plural_schema::{KindRef, KindRegistry};
use plural_types::{Category, Fields};

use crate::entity::{Entity, ObjectDocument};
use crate::error::ModelResult;

/// An instance of a node kind.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    entity: Entity,
}

impl Node {
    /// Build a node of a registered node kind with a caller-supplied uuid.
    pub fn new(
        registry: &KindRegistry,
        kind: impl Into<KindRef>,
        uuid: impl Into<String>,
        fields: Fields,
    ) -> ModelResult<Self> {
        let entity = Entity::new(registry, Category::Node, kind, uuid, fields)?;
        Ok(Self { entity })
    }

    /// Build a node with a freshly generated uuid.
    pub fn create(
        registry: &KindRegistry,
        kind: impl Into<KindRef>,
        fields: Fields,
    ) -> ModelResult<Self> {
        Self::new(registry, kind, Entity::generate_uuid(), fields)
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn into_entity(self) -> Entity {
        self.entity
    }

    pub fn to_document(&self) -> ObjectDocument {
        self.entity.to_document()
    }

    pub fn to_json_bytes(&self) -> ModelResult<Vec<u8>> {
        self.to_document().to_json_bytes()
    }

    /// Rebuild a node from the JSON stored at its object path.
    pub fn from_json_bytes(registry: &KindRegistry, bytes: &[u8]) -> ModelResult<Self> {
        let doc = ObjectDocument::from_json_bytes(bytes)?;
        doc.expect_category(Category::Node)?;
        Ok(Self {
            entity: doc.to_entity(registry)?,
        })
    }
}

impl Deref for Node {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &self.entity
    }
}

impl DerefMut for Node {
    fn deref_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use plural_schema::KindBuilder;

    fn registry() -> KindRegistry {
        let mut registry = KindRegistry::new();
        registry
            .declare(KindBuilder::node("Person").index("email"))
            .unwrap();
        registry.declare(KindBuilder::edge("Knows")).unwrap();
        registry
    }

    #[test]
    fn node_kinds_only() {
        let registry = registry();
        assert!(Node::new(&registry, "Person", "p1", Fields::new()).is_ok());
        assert!(matches!(
            Node::new(&registry, "Knows", "k1", Fields::new()),
            Err(ModelError::Schema(_))
        ));
    }

    #[test]
    fn create_generates_uuid() {
        let registry = registry();
        let a = Node::create(&registry, "Person", Fields::new()).unwrap();
        let b = Node::create(&registry, "Person", Fields::new()).unwrap();
        assert!(!a.uuid().is_empty());
        assert_ne!(a.uuid(), b.uuid());
    }

    #[test]
    fn fields_are_mutable_through_deref() {
        let registry = registry();
        let mut person = Node::new(&registry, "Person", "p1", Fields::new()).unwrap();
        person.set("email", "ada@example.com").unwrap();
        assert_eq!(person.index_value("email").as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn json_roundtrip() {
        let registry = registry();
        let mut person = Node::new(&registry, "Person", "p1", Fields::new()).unwrap();
        person.set("age", 36).unwrap();
        let bytes = person.to_json_bytes().unwrap();
        let back = Node::from_json_bytes(&registry, &bytes).unwrap();
        assert_eq!(back, person);
    }

    #[test]
    fn edge_document_is_not_a_node() {
        let registry = registry();
        let bytes = br#"{"uuid":"k1","kind":"Knows","category":"edge","source":"a","target":"b"}"#;
        assert!(matches!(
            Node::from_json_bytes(&registry, bytes),
            Err(ModelError::CategoryMismatch { .. })
        ));
    }
}
