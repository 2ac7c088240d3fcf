//! Import registry and canonicalization
//!
//! Every `add_import` call lands here. The registry keeps two disjoint sets
//! per module (value imports and type-only imports) and renders them as a
//! deterministic, deduplicated import block.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::QuoteStyle;

use super::grouping::ImportGrouping;

/// A symbol requested from a module, optionally renamed
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImportSymbol {
    /// Exported name in the source module
    pub name: String,
    /// Local binding, if different from `name`
    pub alias: Option<String>,
}

impl ImportSymbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }

    /// Name the symbol is bound to in the importing file
    pub fn local_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

impl From<&str> for ImportSymbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ImportSymbol {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<(&str, &str)> for ImportSymbol {
    fn from((name, alias): (&str, &str)) -> Self {
        Self::aliased(name, alias)
    }
}

impl fmt::Display for ImportSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} as {}", self.name, alias),
            None => write!(f, "{}", self.name),
        }
    }
}

/// One requested import, created per call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub module_path: String,
    pub symbol: ImportSymbol,
    pub type_only: bool,
}

impl ImportRequest {
    pub fn new(module_path: impl Into<String>, symbol: impl Into<ImportSymbol>) -> Self {
        Self {
            module_path: module_path.into(),
            symbol: symbol.into(),
            type_only: false,
        }
    }

    pub fn type_only(mut self) -> Self {
        self.type_only = true;
        self
    }
}

/// Symbols requested from a single module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleImports {
    pub values: BTreeSet<ImportSymbol>,
    pub types: BTreeSet<ImportSymbol>,
}

impl ModuleImports {
    fn set_mut(&mut self, type_only: bool) -> &mut BTreeSet<ImportSymbol> {
        if type_only {
            &mut self.types
        } else {
            &mut self.values
        }
    }
}

/// Deduplicating store of import requests for one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRegistry {
    modules: BTreeMap<String, ModuleImports>,
}

impl ImportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a request. Returns `false` if it was already present.
    pub fn insert(&mut self, request: ImportRequest) -> bool {
        self.modules
            .entry(request.module_path)
            .or_default()
            .set_mut(request.type_only)
            .insert(request.symbol)
    }

    pub fn contains(&self, module_path: &str, symbol: &ImportSymbol, type_only: bool) -> bool {
        self.modules.get(module_path).is_some_and(|imports| {
            if type_only {
                imports.types.contains(symbol)
            } else {
                imports.values.contains(symbol)
            }
        })
    }

    pub fn module(&self, module_path: &str) -> Option<&ModuleImports> {
        self.modules.get(module_path)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Number of distinct requests held
    pub fn len(&self) -> usize {
        self.modules
            .values()
            .map(|imports| imports.values.len() + imports.types.len())
            .sum()
    }

    /// Flatten into import records sorted by `(bucket, module path, kind)`.
    ///
    /// The sort is explicit so the order never depends on how the
    /// underlying map iterates.
    pub fn canonicalize(&self, grouping: &ImportGrouping) -> Vec<ImportRecord> {
        let mut records: Vec<ImportRecord> = Vec::new();

        for (module_path, imports) in &self.modules {
            let bucket = grouping.bucket_of(module_path);
            for (type_only, symbols) in [(false, &imports.values), (true, &imports.types)] {
                if symbols.is_empty() {
                    continue;
                }
                let symbols: Vec<ImportSymbol> = symbols.iter().cloned().collect();
                records.push(ImportRecord {
                    bucket,
                    module_path: module_path.clone(),
                    type_only,
                    symbols,
                });
            }
        }

        records.sort_by(|a, b| {
            (a.bucket, &a.module_path, a.type_only).cmp(&(b.bucket, &b.module_path, b.type_only))
        });
        records
    }
}

/// One rendered import statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub bucket: usize,
    pub module_path: String,
    pub type_only: bool,
    /// Sorted by original name, then alias
    pub symbols: Vec<ImportSymbol>,
}

impl ImportRecord {
    pub fn render(&self, quote: QuoteStyle, terminator: &str) -> String {
        let symbols: Vec<String> = self.symbols.iter().map(ToString::to_string).collect();
        let keyword = if self.type_only {
            "import type"
        } else {
            "import"
        };
        format!(
            "{} {{ {} }} from {}{}",
            keyword,
            symbols.join(", "),
            quote.quote(&self.module_path),
            terminator
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rendered(registry: &ImportRegistry) -> Vec<String> {
        registry
            .canonicalize(&ImportGrouping::default())
            .iter()
            .map(|record| record.render(QuoteStyle::Double, ""))
            .collect()
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut registry = ImportRegistry::new();

        assert!(registry.insert(ImportRequest::new("effect", "Effect")));
        assert!(!registry.insert(ImportRequest::new("effect", "Effect")));
        assert_eq!(registry.len(), 1);
        assert_eq!(rendered(&registry), vec!["import { Effect } from \"effect\""]);
    }

    #[test]
    fn test_alias_is_part_of_key() {
        let mut registry = ImportRegistry::new();
        registry.insert(ImportRequest::new("effect", "Layer"));
        registry.insert(ImportRequest::new("effect", ("Layer", "L")));

        assert_eq!(registry.len(), 2);
        assert_eq!(
            rendered(&registry),
            vec!["import { Layer, Layer as L } from \"effect\""]
        );
    }

    #[test]
    fn test_symbols_sorted_by_original_name() {
        let mut registry = ImportRegistry::new();
        registry.insert(ImportRequest::new("effect", ("Layer", "A")));
        registry.insert(ImportRequest::new("effect", ("Context", "Z")));
        registry.insert(ImportRequest::new("effect", "Effect"));

        assert_eq!(
            rendered(&registry),
            vec!["import { Context as Z, Effect, Layer as A } from \"effect\""]
        );
    }

    #[test]
    fn test_value_and_type_records_stay_separate() {
        let mut registry = ImportRegistry::new();
        registry.insert(ImportRequest::new("effect", "Effect").type_only());
        registry.insert(ImportRequest::new("effect", "Effect"));

        assert!(registry.contains("effect", &ImportSymbol::new("Effect"), false));
        assert!(registry.contains("effect", &ImportSymbol::new("Effect"), true));
        assert_eq!(
            rendered(&registry),
            vec![
                "import { Effect } from \"effect\"",
                "import type { Effect } from \"effect\"",
            ]
        );
    }

    #[test]
    fn test_records_sorted_by_bucket_then_path() {
        let mut registry = ImportRegistry::new();
        for module in ["./local", "lodash", "effect", "@myorg/b", "@myorg/a", "@effect/schema"] {
            registry.insert(ImportRequest::new(module, "X"));
        }

        let records = registry.canonicalize(&ImportGrouping::default());
        let order: Vec<(usize, &str)> = records
            .iter()
            .map(|r| (r.bucket, r.module_path.as_str()))
            .collect();

        assert_eq!(
            order,
            vec![
                (1, "@effect/schema"),
                (2, "@myorg/a"),
                (2, "@myorg/b"),
                (3, "effect"),
                (4, "lodash"),
                (5, "./local"),
            ]
        );
    }

    #[test]
    fn test_render_single_quote_with_terminator() {
        let record = ImportRecord {
            bucket: 1,
            module_path: "effect".into(),
            type_only: true,
            symbols: vec![ImportSymbol::new("Option")],
        };

        assert_eq!(
            record.render(QuoteStyle::Single, ";"),
            "import type { Option } from 'effect';"
        );
    }

    #[test]
    fn test_local_name() {
        assert_eq!(ImportSymbol::new("Layer").local_name(), "Layer");
        assert_eq!(ImportSymbol::aliased("Layer", "L").local_name(), "L");
    }
}
