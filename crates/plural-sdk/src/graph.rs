use std::sync::Arc;

use plural_models::{Edge, Entity, ModelError, Node, PathResolver, RelatedPath, StoragePath};
use plural_schema::{resolve_name, KindRef, KindRegistry};
use plural_store::{Blob, InMemoryRepository, Repository};
use plural_types::{Category, Fields};
use tracing::{info, warn};

use crate::config::PluralConfig;
use crate::error::SdkResult;

/// High-level Plural API.
///
/// The registry is frozen once the instance exists: kinds are declared
/// beforehand (directly or through [`PluralConfig::schema`]) and shared
/// read-only from then on.
pub struct Plural<R: Repository = InMemoryRepository> {
    registry: Arc<KindRegistry>,
    repository: R,
    config: PluralConfig,
}

impl Plural<InMemoryRepository> {
    /// An instance over an empty in-memory repository.
    pub fn in_memory(config: PluralConfig) -> SdkResult<Self> {
        Self::open(config, InMemoryRepository::new())
    }
}

impl<R: Repository> Plural<R> {
    /// Declare the configured schema and bind it to `repository`.
    pub fn open(config: PluralConfig, repository: R) -> SdkResult<Self> {
        let mut registry = KindRegistry::new();
        config.schema.declare_into(&mut registry)?;
        info!(
            nodes = registry.nodes().len(),
            edges = registry.edges().len(),
            "plural opened"
        );
        Ok(Self {
            registry: Arc::new(registry),
            repository,
            config,
        })
    }

    /// Bind an already declared registry to `repository`.
    pub fn with_registry(
        registry: impl Into<Arc<KindRegistry>>,
        repository: R,
        config: PluralConfig,
    ) -> Self {
        Self {
            registry: registry.into(),
            repository,
            config,
        }
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    /// Shared handle to the registry, for use from other threads.
    pub fn registry_handle(&self) -> Arc<KindRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn config(&self) -> &PluralConfig {
        &self.config
    }

    pub fn resolver(&self) -> PathResolver<'_, R> {
        PathResolver::new(&self.registry, &self.repository)
    }

    fn uuid_or_generate(
        &self,
        category: Category,
        kind: &KindRef,
        uuid: Option<&str>,
    ) -> SdkResult<String> {
        match uuid {
            Some(uuid) => Ok(uuid.to_string()),
            None if self.config.generate_uuids => Ok(Entity::generate_uuid()),
            None => {
                let kind = resolve_name(category, kind).unwrap_or_default();
                Err(ModelError::MissingIdentifier { kind }.into())
            }
        }
    }

    // ---- Entities ----

    /// Build a node. Without a uuid one is generated unless the
    /// configuration is strict.
    pub fn node(
        &self,
        kind: impl Into<KindRef>,
        uuid: Option<&str>,
        fields: Fields,
    ) -> SdkResult<Node> {
        let kind = kind.into();
        let uuid = self.uuid_or_generate(Category::Node, &kind, uuid)?;
        Ok(Node::new(&self.registry, kind, uuid, fields)?)
    }

    /// Connect `source` to `target` with a new edge.
    pub fn edge(
        &self,
        kind: impl Into<KindRef>,
        uuid: Option<&str>,
        source: &Node,
        target: &Node,
        fields: Fields,
    ) -> SdkResult<Edge> {
        let kind = kind.into();
        let uuid = self.uuid_or_generate(Category::Edge, &kind, uuid)?;
        Ok(Edge::new(&self.registry, kind, uuid, source, target, fields)?)
    }

    // ---- Addressing ----

    /// The ordered storage paths of `entity`.
    pub fn related_paths(&self, entity: &Entity) -> SdkResult<Vec<StoragePath>> {
        Ok(self.resolver().related_paths(entity)?)
    }

    /// The storage paths of `entity` with their roles.
    pub fn related_entries(&self, entity: &Entity) -> SdkResult<Vec<RelatedPath>> {
        Ok(self.resolver().related_entries(entity)?)
    }

    /// Look up every related path of `entity` in the repository.
    pub fn lookup(&self, entity: &Entity) -> SdkResult<Vec<(StoragePath, Option<Blob>)>> {
        let found = self.resolver().lookup_related(entity)?;
        if self.config.warn_on_missing {
            for (path, _) in found.iter().filter(|(_, blob)| blob.is_none()) {
                warn!(%path, uuid = entity.uuid(), "related path missing from repository");
            }
        }
        Ok(found)
    }
}

impl<R: Repository> std::fmt::Debug for Plural<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plural")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdkError;
    use plural_crypto::digest;
    use plural_schema::{KindBuilder, SchemaDefinition};
    use plural_types::FieldValue;

    const SCHEMA: &str = r#"
        [[nodes]]
        name = "Person"
        indexes = ["email"]

        [[edges]]
        name = "Vehicle"
        indexes = ["max_speed"]

        [[edges]]
        name = "Car"
        extends = "Vehicle"
        indexes = ["brand", "model"]
    "#;

    fn plural(config: PluralConfig) -> Plural {
        let config = PluralConfig {
            schema: SchemaDefinition::from_toml_str(SCHEMA).unwrap(),
            ..config
        };
        Plural::in_memory(config).unwrap()
    }

    fn fields(pairs: &[(&str, FieldValue)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn car_scenario() {
        let plural = plural(PluralConfig::default());
        let ada = plural.node("Person", Some("ada"), Fields::new()).unwrap();
        let bob = plural.node("Person", Some("bob"), Fields::new()).unwrap();
        let car = plural
            .edge(
                "Car",
                Some("deadbeef"),
                &ada,
                &bob,
                fields(&[("name", "Tesla".into()), ("model", "S".into())]),
            )
            .unwrap();

        let h = digest("Car/_ids/deadbeef");
        let paths: Vec<String> = plural
            .related_paths(&car)
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            paths,
            vec![
                "Car/_ids/deadbeef".to_string(),
                format!("Car/_uuids/{h}"),
                format!("Car/indexes/uuid/{h}"),
                format!("Car/objects/{h}"),
                format!("Car/indexes/brand/{h}"),
                format!("Car/indexes/max_speed/{h}"),
                format!("Car/indexes/model/{h}"),
            ]
        );
    }

    #[test]
    fn generated_uuid_by_default() {
        let plural = plural(PluralConfig::default());
        let person = plural.node("Person", None, Fields::new()).unwrap();
        assert_eq!(person.uuid().len(), 36);
        assert_eq!(plural.related_paths(&person).unwrap().len(), 5);
    }

    #[test]
    fn strict_config_requires_uuid() {
        let plural = plural(PluralConfig::strict());
        let err = plural.node("Person", None, Fields::new()).unwrap_err();
        assert!(matches!(
            err,
            SdkError::Model(ModelError::MissingIdentifier { ref kind }) if kind == "Person"
        ));
    }

    #[test]
    fn supplied_uuid_must_be_one_segment() {
        let plural = plural(PluralConfig::default());
        assert!(matches!(
            plural.node("Person", Some("ada/../bob"), Fields::new()),
            Err(SdkError::Model(ModelError::InvalidIdentifier { .. }))
        ));
    }

    #[test]
    fn lookup_finds_what_was_written() {
        let plural = plural(PluralConfig {
            warn_on_missing: true,
            ..PluralConfig::default()
        });
        let mut person = plural.node("Person", Some("ada"), Fields::new()).unwrap();
        person.set("email", "ada@example.com").unwrap();

        let entries = plural.related_entries(&person).unwrap();
        let email_path = &entries.last().unwrap().path;
        plural
            .repository()
            .stage(email_path.as_str(), person.index_value("email").unwrap());

        let found = plural.lookup(&person).unwrap();
        let present: Vec<&str> = found
            .iter()
            .filter(|(_, blob)| blob.is_some())
            .map(|(path, _)| path.as_str())
            .collect();
        assert_eq!(present, vec![email_path.as_str()]);
    }

    #[test]
    fn entities_from_foreign_registry_are_rejected() {
        let plural = plural(PluralConfig::default());
        let mut other = KindRegistry::new();
        other.declare(KindBuilder::node("Person")).unwrap();
        let stranger = Node::new(&other, "Person", "x", Fields::new()).unwrap();
        assert!(matches!(
            plural.related_paths(&stranger),
            Err(SdkError::Model(ModelError::UnregisteredKind { .. }))
        ));
    }

    #[test]
    fn with_registry_shares_declarations() {
        let mut registry = KindRegistry::new();
        registry.declare(KindBuilder::node("Thing")).unwrap();
        let plural = Plural::with_registry(
            registry,
            InMemoryRepository::new(),
            PluralConfig::default(),
        );
        let handle = plural.registry_handle();
        let thing = plural.node("Thing", Some("t"), Fields::new()).unwrap();
        let paths = std::thread::spawn(move || {
            let repository = InMemoryRepository::new();
            PathResolver::new(&handle, &repository)
                .related_paths(&thing)
                .unwrap()
        })
        .join()
        .unwrap();
        assert_eq!(paths[0], "Thing/_ids/t");
    }

    #[test]
    fn bad_schema_fails_to_open() {
        let config = PluralConfig {
            schema: SchemaDefinition::from_toml_str(
                "[[nodes]]\nname = \"Car\"\nextends = \"Vehicle\"\n",
            )
            .unwrap(),
            ..PluralConfig::default()
        };
        assert!(matches!(
            Plural::in_memory(config),
            Err(SdkError::Schema(_))
        ));
    }
}
