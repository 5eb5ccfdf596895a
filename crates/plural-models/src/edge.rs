use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use plural_schema::{KindRef, KindRegistry, TypeDescriptor, WILDCARD};
use plural_types::{Category, Fields};

use crate::entity::{check_uuid, Entity, ObjectDocument};
use crate::error::{ModelError, ModelResult};
use crate::node::Node;

/// An instance of an edge kind, connecting a source node to a target node.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    entity: Entity,
    source: String,
    target: String,
}

impl Edge {
    /// Connect two nodes with a new edge.
    ///
    /// Each node must be of the kind the edge kind declares for that side,
    /// or of one of its subkinds; a `*` side accepts any node.
    pub fn new(
        registry: &KindRegistry,
        kind: impl Into<KindRef>,
        uuid: impl Into<String>,
        source: &Node,
        target: &Node,
        fields: Fields,
    ) -> ModelResult<Self> {
        let entity = Entity::new(registry, Category::Edge, kind, uuid, fields)?;
        if let Some(endpoints) = entity.kind().endpoints() {
            check_endpoint(registry, entity.kind(), "source", &endpoints.source, source)?;
            check_endpoint(registry, entity.kind(), "target", &endpoints.target, target)?;
        }
        Ok(Self {
            entity,
            source: source.uuid().to_string(),
            target: target.uuid().to_string(),
        })
    }

    /// Connect two nodes with a freshly generated edge uuid.
    pub fn create(
        registry: &KindRegistry,
        kind: impl Into<KindRef>,
        source: &Node,
        target: &Node,
        fields: Fields,
    ) -> ModelResult<Self> {
        Self::new(registry, kind, Entity::generate_uuid(), source, target, fields)
    }

    /// Build an edge from node uuids alone, without checking node kinds.
    pub fn between(
        registry: &KindRegistry,
        kind: impl Into<KindRef>,
        uuid: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        fields: Fields,
    ) -> ModelResult<Self> {
        let entity = Entity::new(registry, Category::Edge, kind, uuid, fields)?;
        let (source, target) = (source.into(), target.into());
        check_node_id(entity.kind_name(), "source", &source)?;
        check_node_id(entity.kind_name(), "target", &target)?;
        Ok(Self {
            entity,
            source,
            target,
        })
    }

    /// Uuid of the source node.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Uuid of the target node.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn into_entity(self) -> Entity {
        self.entity
    }

    pub fn to_document(&self) -> ObjectDocument {
        ObjectDocument {
            source: Some(self.source.clone()),
            target: Some(self.target.clone()),
            ..self.entity.to_document()
        }
    }

    pub fn to_json_bytes(&self) -> ModelResult<Vec<u8>> {
        self.to_document().to_json_bytes()
    }

    /// Rebuild an edge from the JSON stored at its object path.
    pub fn from_json_bytes(registry: &KindRegistry, bytes: &[u8]) -> ModelResult<Self> {
        let doc = ObjectDocument::from_json_bytes(bytes)?;
        doc.expect_category(Category::Edge)?;
        let entity = doc.to_entity(registry)?;
        let source = doc.source.clone().unwrap_or_default();
        let target = doc.target.clone().unwrap_or_default();
        check_node_id(entity.kind_name(), "source", &source)?;
        check_node_id(entity.kind_name(), "target", &target)?;
        Ok(Self {
            entity,
            source,
            target,
        })
    }
}

/// A node uuid given without its node must still be one path segment.
fn check_node_id(edge: &str, side: &'static str, id: &str) -> ModelResult<()> {
    if id.is_empty() {
        return Err(ModelError::MissingEndpoint {
            edge: edge.to_string(),
            side,
        });
    }
    check_uuid(edge, id)
}

fn check_endpoint(
    registry: &KindRegistry,
    edge: &Arc<TypeDescriptor>,
    side: &'static str,
    expected: &str,
    node: &Node,
) -> ModelResult<()> {
    if expected == WILDCARD {
        return Ok(());
    }
    let expected_kind = registry.nodes().definition(expected)?;
    if node.kind().is_a(&expected_kind) {
        return Ok(());
    }
    Err(ModelError::EndpointMismatch {
        edge: edge.name().to_string(),
        side,
        expected: expected.to_string(),
        got: node.kind_name().to_string(),
    })
}

impl Deref for Edge {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &self.entity
    }
}

impl DerefMut for Edge {
    fn deref_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}
