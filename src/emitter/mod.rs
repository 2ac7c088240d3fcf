//! Emitter: per-file text assembly
//!
//! An [`Emitter`] collects body lines and import requests from any number of
//! call sites and renders them as one file:
//!
//! ```text
//! <provenance header, if configured>
//! <import block: deduplicated, bucketed, sorted>
//!
//! <body lines, in call order>
//! ```
//!
//! Body lines are never reordered. Imports are always canonicalized, so the
//! order in which call sites request them has no effect on the output.

mod grouping;
mod imports;
pub mod shapes;

pub use grouping::{BucketRule, ImportGrouping, ModuleMatcher, ModulePattern};
pub use imports::{ImportRecord, ImportRegistry, ImportRequest, ImportSymbol, ModuleImports};
pub use shapes::{FunctionShape, InterfaceShape, Param, Property};

use tracing::{debug, trace};

use crate::config::EmitterConfig;

/// Accumulates one generated file
#[derive(Debug, Clone, Default)]
pub struct Emitter {
    config: EmitterConfig,
    imports: ImportRegistry,
    lines: Vec<String>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            config,
            imports: ImportRegistry::new(),
            lines: Vec::new(),
        }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn registry(&self) -> &ImportRegistry {
        &self.imports
    }

    // ------------------------------------------------------------------
    // Imports
    // ------------------------------------------------------------------

    /// Request `symbol` from `module_path`. Repeating an identical request
    /// has no effect.
    pub fn add_import(
        &mut self,
        module_path: &str,
        symbol: impl Into<ImportSymbol>,
        type_only: bool,
    ) -> &mut Self {
        let mut request = ImportRequest::new(module_path, symbol);
        request.type_only = type_only;
        self.add_request(request)
    }

    pub fn add_type_import(
        &mut self,
        module_path: &str,
        symbol: impl Into<ImportSymbol>,
    ) -> &mut Self {
        self.add_import(module_path, symbol, true)
    }

    pub fn add_imports<I, S>(&mut self, module_path: &str, symbols: I, type_only: bool) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ImportSymbol>,
    {
        for symbol in symbols {
            self.add_import(module_path, symbol, type_only);
        }
        self
    }

    pub fn add_request(&mut self, request: ImportRequest) -> &mut Self {
        if self
            .imports
            .contains(&request.module_path, &request.symbol, request.type_only)
        {
            trace!(
                module = %request.module_path,
                symbol = %request.symbol,
                type_only = request.type_only,
                "Import already registered."
            );
            return self;
        }
        self.imports.insert(request);
        self
    }

    pub fn has_import(&self, module_path: &str, name: &str) -> bool {
        self.imports.module(module_path).is_some_and(|imports| {
            imports
                .values
                .iter()
                .chain(imports.types.iter())
                .any(|symbol| symbol.name == name)
        })
    }

    // ------------------------------------------------------------------
    // Body
    // ------------------------------------------------------------------

    /// Append one line verbatim
    pub fn add_line(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(text.into());
        self
    }

    pub fn add_blank_line(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn add_lines<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.imports.is_empty()
    }

    // ------------------------------------------------------------------
    // Conventions shared with factories
    // ------------------------------------------------------------------

    /// `text` repeated indentation `depth` times deeper
    pub fn indented(&self, depth: usize, text: &str) -> String {
        format!("{}{}", self.config.indent.repeat(depth), text)
    }

    pub fn quote(&self, text: &str) -> String {
        self.config.quote.quote(text)
    }

    pub fn terminator(&self) -> &'static str {
        self.config.terminator()
    }

    // ------------------------------------------------------------------
    // Shapes
    // ------------------------------------------------------------------

    /// `/** ... */` block; a single line stays on one line
    pub fn add_doc_comment<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<String> = lines
            .into_iter()
            .flat_map(|line| {
                line.as_ref()
                    .split('\n')
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();

        match lines.as_slice() {
            [] => {}
            [single] => {
                self.add_line(format!("/** {} */", single));
            }
            many => {
                self.add_line("/**");
                for line in many {
                    if line.is_empty() {
                        self.add_line(" *");
                    } else {
                        self.add_line(format!(" * {}", line));
                    }
                }
                self.add_line(" */");
            }
        }
        self
    }

    pub fn add_section_comment(&mut self, title: &str) -> &mut Self {
        let rule = format!("// {}", "=".repeat(76));
        self.add_line(rule.clone());
        self.add_line(format!("// {}", title));
        self.add_line(rule)
    }

    pub fn add_interface(&mut self, shape: &InterfaceShape) -> &mut Self {
        if let Some(doc) = &shape.doc {
            self.add_doc_comment([doc]);
        }
        let export = shapes::export_prefix(shape.exported);
        if shape.properties.is_empty() {
            return self.add_line(format!("{}interface {} {{}}", export, shape.name));
        }

        self.add_line(format!("{}interface {} {{", export, shape.name));
        let terminator = self.terminator();
        for property in &shape.properties {
            let line = self.indented(1, &format!("{}{}", property.render_readonly(), terminator));
            self.add_line(line);
        }
        self.add_line("}")
    }

    pub fn add_type_alias(&mut self, name: &str, value: &str, exported: bool) -> &mut Self {
        let line = format!(
            "{}type {} = {}{}",
            shapes::export_prefix(exported),
            name,
            value,
            self.terminator()
        );
        self.add_line(line)
    }

    pub fn add_const(
        &mut self,
        name: &str,
        type_annotation: Option<&str>,
        value: &str,
        exported: bool,
    ) -> &mut Self {
        let annotation = type_annotation
            .map(|ty| format!(": {}", ty))
            .unwrap_or_default();
        let line = format!(
            "{}const {}{} = {}{}",
            shapes::export_prefix(exported),
            name,
            annotation,
            value,
            self.terminator()
        );
        self.add_line(line)
    }

    pub fn add_function(&mut self, shape: &FunctionShape) -> &mut Self {
        if let Some(doc) = &shape.doc {
            self.add_doc_comment([doc]);
        }
        self.add_line(format!("{} {{", shape.signature()));
        for line in &shape.body {
            let line = if line.is_empty() {
                String::new()
            } else {
                self.indented(1, line)
            };
            self.add_line(line);
        }
        self.add_line("}")
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Canonical import statements, one per entry
    pub fn import_lines(&self) -> Vec<String> {
        let terminator = self.terminator();
        self.imports
            .canonicalize(&self.config.grouping)
            .iter()
            .map(|record| record.render(self.config.quote, terminator))
            .collect()
    }

    /// Produce the file text. Does not mutate; may be called repeatedly.
    pub fn render(&self) -> String {
        let import_lines = self.import_lines();

        let mut sections: Vec<String> = Vec::with_capacity(2);
        if !import_lines.is_empty() {
            sections.push(import_lines.join("\n"));
        }
        if !self.lines.is_empty() {
            sections.push(self.lines.join("\n"));
        }

        let mut content = sections.join("\n\n");
        if !content.is_empty() {
            content.push('\n');
        }

        debug!(
            imports = import_lines.len(),
            lines = self.lines.len(),
            bytes = content.len(),
            "Rendered generated file."
        );

        match &self.config.provenance {
            Some(provenance) => format!("{}{}", provenance.header(&content), content),
            None => content,
        }
    }
}
