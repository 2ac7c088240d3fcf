//! Layered compositions
//!
//! For each requested environment, merges `<component>.<Environment>` for
//! every component into one named composite, keeping the caller's component
//! order. An optional auto-selector picks a composite from a runtime
//! indicator and falls back to `Live` for anything it does not recognize,
//! including an unset indicator.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::emitter::Emitter;

const LAYER_MODULE: &str = "effect";

/// Deployment environment a composite is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Environment {
    Live,
    Test,
    Dev,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Environment::Live, Environment::Test, Environment::Dev];

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Live => "Live",
            Environment::Test => "Test",
            Environment::Dev => "Dev",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the auto-selector reads the runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SelectorConfig {
    /// Appended to the prefix to name the selector
    #[serde(default = "default_selector_suffix")]
    pub suffix: String,

    /// Expression evaluated at runtime
    #[serde(default = "default_indicator")]
    pub indicator: String,

    /// Indicator value that selects `Test`
    #[serde(default = "default_test_marker")]
    pub test_marker: String,

    /// Indicator value that selects `Dev`
    #[serde(default = "default_dev_marker")]
    pub dev_marker: String,
}

fn default_selector_suffix() -> String {
    "Auto".to_string()
}

fn default_indicator() -> String {
    "process.env.NODE_ENV".to_string()
}

fn default_test_marker() -> String {
    "test".to_string()
}

fn default_dev_marker() -> String {
    "development".to_string()
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            suffix: default_selector_suffix(),
            indicator: default_indicator(),
            test_marker: default_test_marker(),
            dev_marker: default_dev_marker(),
        }
    }
}

fn default_environments() -> Vec<Environment> {
    Environment::ALL.to_vec()
}

/// A named layer composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LayerConfig {
    pub name_prefix: String,

    /// Sub-layers, merged in this order
    #[serde(default)]
    pub components: Vec<String>,

    #[serde(default = "default_environments")]
    pub environments: Vec<Environment>,

    #[serde(default)]
    pub include_auto_selector: bool,

    #[serde(default)]
    pub selector: SelectorConfig,
}

impl LayerConfig {
    pub fn new(name_prefix: impl Into<String>) -> Self {
        Self {
            name_prefix: name_prefix.into(),
            components: Vec::new(),
            environments: default_environments(),
            include_auto_selector: false,
            selector: SelectorConfig::default(),
        }
    }

    pub fn component(mut self, name: impl Into<String>) -> Self {
        self.components.push(name.into());
        self
    }

    pub fn environments(mut self, environments: &[Environment]) -> Self {
        self.environments = environments.to_vec();
        self
    }

    pub fn with_auto_selector(mut self) -> Self {
        self.include_auto_selector = true;
        self
    }

    pub fn composite_name(&self, environment: Environment) -> String {
        format!("{}{}", self.name_prefix, environment)
    }

    pub fn selector_name(&self) -> String {
        format!("{}{}", self.name_prefix, self.selector.suffix)
    }

    fn requests(&self, environment: Environment) -> bool {
        self.environments.contains(&environment)
    }
}

/// Emit one composite per environment, then the selector if requested
pub fn emit_layers(emitter: &mut Emitter, config: &LayerConfig) {
    debug!(
        prefix = %config.name_prefix,
        components = config.components.len(),
        environments = ?config.environments,
        auto_selector = config.include_auto_selector,
        "Emitting layer composition."
    );

    let mut first = true;
    for environment in &config.environments {
        if !first {
            emitter.add_blank_line();
        }
        first = false;
        emit_composite(emitter, config, *environment);
    }

    if config.include_auto_selector {
        // The selector's default branch always returns Live
        if !config.requests(Environment::Live) {
            if !first {
                emitter.add_blank_line();
            }
            first = false;
            emit_composite(emitter, config, Environment::Live);
        }
        if !first {
            emitter.add_blank_line();
        }
        emit_selector(emitter, config);
    }
}

fn emit_composite(emitter: &mut Emitter, config: &LayerConfig, environment: Environment) {
    let name = config.composite_name(environment);
    let terminator = emitter.terminator();
    let members: Vec<String> = config
        .components
        .iter()
        .map(|component| format!("{}.{}", component, environment))
        .collect();

    emitter.add_doc_comment([format!(
        "{} layer for {}",
        environment, config.name_prefix
    )]);

    match members.as_slice() {
        [] => {
            emitter.add_import(LAYER_MODULE, "Layer", false);
            emitter.add_const(&name, None, "Layer.empty", true);
        }
        [single] => {
            emitter.add_const(&name, None, single, true);
        }
        many => {
            emitter.add_import(LAYER_MODULE, "Layer", false);
            emitter.add_line(format!("export const {} = Layer.mergeAll(", name));
            let last = many.len() - 1;
            for (i, member) in many.iter().enumerate() {
                let comma = if i == last { "" } else { "," };
                let line = emitter.indented(1, &format!("{}{}", member, comma));
                emitter.add_line(line);
            }
            emitter.add_line(format!("){}", terminator));
        }
    }
}

fn emit_selector(emitter: &mut Emitter, config: &LayerConfig) {
    let selector = &config.selector;
    let terminator = emitter.terminator();

    emitter.add_doc_comment([format!(
        "Picks the {} layer from {}, defaulting to Live",
        config.name_prefix, selector.indicator
    )]);
    emitter.add_line(format!("export const {} = (() => {{", config.selector_name()));
    let switch = emitter.indented(1, &format!("switch ({}) {{", selector.indicator));
    emitter.add_line(switch);

    let cases = [
        (Environment::Test, &selector.test_marker),
        (Environment::Dev, &selector.dev_marker),
    ];
    for (environment, marker) in cases {
        if !config.requests(environment) {
            continue;
        }
        let case = emitter.indented(2, &format!("case {}:", emitter.quote(marker)));
        let ret = emitter.indented(
            3,
            &format!("return {}{}", config.composite_name(environment), terminator),
        );
        emitter.add_lines([case, ret]);
    }

    let lines = [
        emitter.indented(2, "default:"),
        emitter.indented(
            3,
            &format!(
                "return {}{}",
                config.composite_name(Environment::Live),
                terminator
            ),
        ),
        emitter.indented(1, "}"),
    ];
    emitter.add_lines(lines);
    emitter.add_line(format!("}})(){}", terminator));
}
