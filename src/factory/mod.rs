//! Declarative factories
//!
//! Factories turn a small [`ArtifactConfig`] into a sequence of [`Emitter`]
//! calls, so every artifact of one kind comes out with the same shape.
//! They never fail: inconsistent configs (duplicate suffixes, colliding
//! union names) are emitted as given.
//!
//! Configs can be written by hand or loaded from YAML/JSON:
//!
//! ```yaml
//! kind: tagged_errors
//! name_prefix: User
//! style: fielded
//! include_union_type: true
//! variants:
//!   - suffix: NotFound
//!     description: No user with the given id
//!     fields:
//!       - name: userId
//!         type: string
//! ```

pub mod errors;
pub mod layers;

pub use errors::{
    emit_tagged_errors, schema_for_type, ErrorStyle, FieldDef, HelperConstructor,
    TaggedErrorConfig, VariantDef,
};
pub use layers::{emit_layers, Environment, LayerConfig, SelectorConfig};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::EmitterConfig;
use crate::emitter::Emitter;
use crate::error::{Error, Result};

/// Description of one artifact family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[schemars(title = "Artifact config", description = "Declarative artifact family")]
pub enum ArtifactConfig {
    TaggedErrors(TaggedErrorConfig),
    Layers(LayerConfig),
}

impl From<TaggedErrorConfig> for ArtifactConfig {
    fn from(config: TaggedErrorConfig) -> Self {
        ArtifactConfig::TaggedErrors(config)
    }
}

impl From<LayerConfig> for ArtifactConfig {
    fn from(config: LayerConfig) -> Self {
        ArtifactConfig::Layers(config)
    }
}

impl ArtifactConfig {
    /// Parse config from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_norway::from_str(yaml).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Parse a list of configs from a YAML sequence
    pub fn list_from_yaml(yaml: &str) -> Result<Vec<Self>> {
        serde_norway::from_str(yaml).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Parse config from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize config to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_norway::to_string(self)?)
    }

    /// JSON Schema describing the config format
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(ArtifactConfig)
    }

    pub fn name_prefix(&self) -> &str {
        match self {
            ArtifactConfig::TaggedErrors(config) => &config.name_prefix,
            ArtifactConfig::Layers(config) => &config.name_prefix,
        }
    }

    /// True when applying this config would emit nothing
    pub fn is_empty(&self) -> bool {
        match self {
            ArtifactConfig::TaggedErrors(config) => config.variants.is_empty(),
            ArtifactConfig::Layers(config) => {
                config.environments.is_empty() && !config.include_auto_selector
            }
        }
    }

    /// Drive `emitter` through this artifact's declarations
    pub fn apply(&self, emitter: &mut Emitter) {
        match self {
            ArtifactConfig::TaggedErrors(config) => emit_tagged_errors(emitter, config),
            ArtifactConfig::Layers(config) => emit_layers(emitter, config),
        }
    }
}

/// Render several artifacts into one file, separated by blank lines
pub fn generate(artifacts: &[ArtifactConfig], config: EmitterConfig) -> String {
    let mut emitter = Emitter::with_config(config);
    for artifact in artifacts.iter().filter(|artifact| !artifact.is_empty()) {
        if emitter.line_count() > 0 {
            emitter.add_blank_line();
        }
        artifact.apply(&mut emitter);
    }
    emitter.render()
}
