use std::path::Path;

use plural_schema::SchemaDefinition;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Configuration for a [`Plural`](crate::Plural) instance.
///
/// ```toml
/// generate_uuids = true
/// warn_on_missing = false
///
/// [[schema.nodes]]
/// name = "Person"
/// indexes = ["email"]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluralConfig {
    /// Kinds declared when the instance is built.
    pub schema: SchemaDefinition,
    /// Whether entities created without a uuid get a generated one.
    /// When `false` a uuid is mandatory.
    pub generate_uuids: bool,
    /// Log a warning for every related path a lookup does not find.
    pub warn_on_missing: bool,
}

impl Default for PluralConfig {
    fn default() -> Self {
        Self {
            schema: SchemaDefinition::default(),
            generate_uuids: true,
            warn_on_missing: false,
        }
    }
}

impl PluralConfig {
    pub fn from_toml_str(s: &str) -> SdkResult<Self> {
        toml::from_str(s).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Require callers to supply every uuid.
    pub fn strict() -> Self {
        Self {
            generate_uuids: false,
            ..Default::default()
        }
    }
}
