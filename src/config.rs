//! Emitter configuration
//!
//! Controls the cosmetic conventions of rendered files: import grouping,
//! quote style, statement terminators, indentation and the optional
//! provenance header. Loadable from YAML or JSON so a project can keep its
//! conventions next to its artifact configs.

use crate::emitter::ImportGrouping;
use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Quote character used for module specifiers and string literals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStyle {
    #[default]
    Double,
    Single,
}

impl QuoteStyle {
    pub fn delimiter(self) -> char {
        match self {
            QuoteStyle::Double => '"',
            QuoteStyle::Single => '\'',
        }
    }

    /// Wrap `text` in a string literal, escaping backslashes and the delimiter
    pub fn quote(self, text: &str) -> String {
        let delimiter = self.delimiter();
        let mut quoted = String::with_capacity(text.len() + 2);
        quoted.push(delimiter);
        for c in text.chars() {
            if c == '\\' || c == delimiter {
                quoted.push('\\');
            }
            quoted.push(c);
        }
        quoted.push(delimiter);
        quoted
    }
}

/// Rendering conventions for one emitter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EmitterConfig {
    /// Import bucket rules, in priority order
    #[serde(default)]
    pub grouping: ImportGrouping,

    /// Quote style for module paths and string literals
    #[serde(default)]
    pub quote: QuoteStyle,

    /// Terminate statements with `;`
    #[serde(default)]
    pub semicolons: bool,

    /// One level of indentation
    #[serde(default = "default_indent")]
    pub indent: String,

    /// Provenance header prepended to rendered files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

fn default_indent() -> String {
    "  ".to_string()
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            grouping: ImportGrouping::default(),
            quote: QuoteStyle::default(),
            semicolons: false,
            indent: default_indent(),
            provenance: None,
        }
    }
}

impl EmitterConfig {
    /// Parse config from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_norway::from_str(yaml).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Parse config from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_grouping(mut self, grouping: ImportGrouping) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn with_provenance(mut self, source: impl Into<String>) -> Self {
        self.provenance = Some(Provenance {
            source: source.into(),
        });
        self
    }

    /// Statement terminator (`;` or nothing)
    pub fn terminator(&self) -> &'static str {
        if self.semicolons {
            ";"
        } else {
            ""
        }
    }
}

/// "Do not edit" header identifying where a file came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Provenance {
    /// Name of the config or template the file was generated from
    pub source: String,
}

impl Provenance {
    /// Header lines for `content`, including the trailing blank line
    pub fn header(&self, content: &str) -> String {
        format!(
            "// GENERATED FROM: {}\n// CONTENT HASH: {}\n// DO NOT EDIT - regenerate from source\n\n",
            self.source,
            content_hash(content)
        )
    }
}

/// Short sha256 digest of generated content
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("sha256:{}", hex::encode(&hasher.finalize()[..8]))
}
