//! Import grouping rules
//!
//! Decides which priority bucket an import statement belongs to. Buckets are
//! numbered from 1 in rule order; the first rule whose matcher accepts a
//! module path wins. Paths matched by no rule land in one trailing bucket
//! after every configured rule.
//!
//! The default grouping is the five-bucket Effect layout:
//!
//! | Bucket | Rule | Example |
//! |--------|------|---------|
//! | 1 | `@effect/` prefix | `@effect/schema` |
//! | 2 | other scoped packages | `@myorg/widgets` |
//! | 3 | the `effect` package | `effect` |
//! | 4 | other external packages | `lodash` |
//! | 5 | relative paths | `./local` |

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;

// ============================================================================
// Matchers
// ============================================================================

/// Compiled module path pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModulePattern(Regex);

impl ModulePattern {
    pub fn new(pattern: &str) -> Result<Self, Error> {
        Regex::new(pattern)
            .map(Self)
            .map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, module_path: &str) -> bool {
        self.0.is_match(module_path)
    }
}

impl PartialEq for ModulePattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ModulePattern {}

impl TryFrom<String> for ModulePattern {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<ModulePattern> for String {
    fn from(pattern: ModulePattern) -> Self {
        pattern.as_str().to_string()
    }
}

impl fmt::Display for ModulePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a bucket rule recognizes module paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModuleMatcher {
    /// Path starts with the given text (e.g. `@effect/`)
    Prefix(String),
    /// Path equals the given text (e.g. `effect`)
    Exact(String),
    /// Path matches a regular expression
    Pattern(#[schemars(with = "String")] ModulePattern),
    /// Any scoped package (`@scope/name`)
    Scoped,
    /// `./` or `../` paths
    Relative,
    /// Anything that is not a relative path
    External,
}

impl ModuleMatcher {
    pub fn matches(&self, module_path: &str) -> bool {
        match self {
            ModuleMatcher::Prefix(prefix) => module_path.starts_with(prefix.as_str()),
            ModuleMatcher::Exact(name) => module_path == name,
            ModuleMatcher::Pattern(pattern) => pattern.is_match(module_path),
            ModuleMatcher::Scoped => module_path.starts_with('@'),
            ModuleMatcher::Relative => is_relative(module_path),
            ModuleMatcher::External => !is_relative(module_path),
        }
    }
}

fn is_relative(module_path: &str) -> bool {
    module_path.starts_with("./") || module_path.starts_with("../")
}

// ============================================================================
// Grouping
// ============================================================================

/// One named priority group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BucketRule {
    /// Label used in logs and diagnostics
    pub name: String,

    /// Which module paths fall into this bucket
    #[serde(rename = "match")]
    pub matcher: ModuleMatcher,
}

impl BucketRule {
    pub fn new(name: impl Into<String>, matcher: ModuleMatcher) -> Self {
        Self {
            name: name.into(),
            matcher,
        }
    }
}

/// Ordered bucket rules used to sort import statements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ImportGrouping {
    rules: Vec<BucketRule>,
}

impl Default for ImportGrouping {
    fn default() -> Self {
        Self::with_framework("@effect/", "effect")
    }
}

impl ImportGrouping {
    pub fn new(rules: Vec<BucketRule>) -> Self {
        Self { rules }
    }

    /// Five-bucket layout for an ecosystem whose core packages share a
    /// scoped prefix and whose base package is a bare name.
    pub fn with_framework(core_prefix: &str, base_package: &str) -> Self {
        Self::new(vec![
            BucketRule::new(
                "framework-core",
                ModuleMatcher::Prefix(core_prefix.to_string()),
            ),
            BucketRule::new("scoped", ModuleMatcher::Scoped),
            BucketRule::new("framework", ModuleMatcher::Exact(base_package.to_string())),
            BucketRule::new("external", ModuleMatcher::External),
            BucketRule::new("relative", ModuleMatcher::Relative),
        ])
    }

    pub fn rules(&self) -> &[BucketRule] {
        &self.rules
    }

    /// Bucket number (1-based) for a module path
    pub fn bucket_of(&self, module_path: &str) -> usize {
        self.rules
            .iter()
            .position(|rule| rule.matcher.matches(module_path))
            .map_or(self.rules.len() + 1, |index| index + 1)
    }

    pub fn bucket_name(&self, bucket: usize) -> Option<&str> {
        bucket
            .checked_sub(1)
            .and_then(|index| self.rules.get(index))
            .map(|rule| rule.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_buckets() {
        let grouping = ImportGrouping::default();

        assert_eq!(grouping.bucket_of("@effect/schema"), 1);
        assert_eq!(grouping.bucket_of("@effect/platform-node"), 1);
        assert_eq!(grouping.bucket_of("@myorg/widgets"), 2);
        assert_eq!(grouping.bucket_of("effect"), 3);
        assert_eq!(grouping.bucket_of("lodash"), 4);
        assert_eq!(grouping.bucket_of("effect-extra"), 4);
        assert_eq!(grouping.bucket_of("./local"), 5);
        assert_eq!(grouping.bucket_of("../shared/types"), 5);
    }

    #[test]
    fn test_unmatched_paths_sort_last() {
        let grouping = ImportGrouping::new(vec![BucketRule::new(
            "org",
            ModuleMatcher::Prefix("@acme/".into()),
        )]);

        assert_eq!(grouping.bucket_of("@acme/core"), 1);
        assert_eq!(grouping.bucket_of("lodash"), 2);
        assert_eq!(grouping.bucket_of("./local"), 2);
    }

    #[test]
    fn test_pattern_matcher() {
        let pattern = ModulePattern::new(r"^node:").unwrap();
        let grouping = ImportGrouping::new(vec![
            BucketRule::new("node", ModuleMatcher::Pattern(pattern)),
            BucketRule::new("external", ModuleMatcher::External),
        ]);

        assert_eq!(grouping.bucket_of("node:fs"), 1);
        assert_eq!(grouping.bucket_of("fs"), 2);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = ModulePattern::new("(unclosed");
        match result {
            Err(Error::InvalidPattern { pattern, .. }) => assert_eq!(pattern, "(unclosed"),
            other => panic!("Expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_bucket_name() {
        let grouping = ImportGrouping::default();
        assert_eq!(grouping.bucket_name(1), Some("framework-core"));
        assert_eq!(grouping.bucket_name(5), Some("relative"));
        assert_eq!(grouping.bucket_name(0), None);
        assert_eq!(grouping.bucket_name(6), None);
    }

    #[test]
    fn test_grouping_from_yaml() {
        let yaml = r#"
- name: org
  match:
    prefix: "@acme/"
- name: node
  match:
    pattern: "^node:"
- name: relative
  match: relative
"#;
        let grouping: ImportGrouping = serde_norway::from_str(yaml).unwrap();

        assert_eq!(grouping.rules().len(), 3);
        assert_eq!(grouping.bucket_of("@acme/ui"), 1);
        assert_eq!(grouping.bucket_of("node:path"), 2);
        assert_eq!(grouping.bucket_of("./x"), 3);
        assert_eq!(grouping.bucket_of("react"), 4);
    }

    #[test]
    fn test_grouping_rejects_bad_pattern() {
        let json = r#"[{ "name": "bad", "match": { "pattern": "[" } }]"#;
        let result: Result<ImportGrouping, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
