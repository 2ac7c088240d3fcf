//! Tagged error families
//!
//! Emits one tagged error class per variant plus an optional union type
//! naming all of them. Two class styles are supported:
//!
//! - `fielded`: `Data.TaggedError("Name")<{ readonly field: T }>`
//! - `schema_validated`: `Schema.TaggedError<Name>()("Name", { field: Schema.T })`
//!
//! Helper constructors are wired, not synthesized: the caller supplies the
//! returned expression and the factory only builds the method signature.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::emitter::shapes::{render_params, Param};
use crate::emitter::Emitter;

/// Module the `Data` and `Schema` namespaces are imported from
const EFFECT_MODULE: &str = "effect";

/// Unions with at least this many members are split one per line
const MULTILINE_UNION_THRESHOLD: usize = 3;

/// Class template family for the variants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStyle {
    #[default]
    Fielded,
    SchemaValidated,
}

/// Field carried by a variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldDef {
    pub name: String,

    /// TypeScript type, used by the fielded style
    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default)]
    pub optional: bool,

    /// Schema expression, used by the schema-validated style.
    /// Derived from `type` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            optional: false,
            schema: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    fn schema_expression(&self) -> String {
        let schema = self
            .schema
            .clone()
            .unwrap_or_else(|| schema_for_type(&self.ty));
        if self.optional {
            format!("Schema.optional({})", schema)
        } else {
            schema
        }
    }
}

/// Map a TypeScript type annotation to a Schema expression
pub fn schema_for_type(ty: &str) -> String {
    match ty.trim() {
        "string" => "Schema.String".to_string(),
        "number" => "Schema.Number".to_string(),
        "boolean" => "Schema.Boolean".to_string(),
        "bigint" => "Schema.BigIntFromSelf".to_string(),
        "Date" => "Schema.DateFromSelf".to_string(),
        "null" => "Schema.Null".to_string(),
        "undefined" => "Schema.Undefined".to_string(),
        "unknown" | "any" => "Schema.Unknown".to_string(),
        other => match other.strip_suffix("[]") {
            Some(inner) => format!("Schema.Array({})", schema_for_type(inner)),
            None => "Schema.Unknown".to_string(),
        },
    }
}

/// Static factory method generated on a variant class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HelperConstructor {
    /// Method name
    #[serde(default = "default_helper_name")]
    pub name: String,

    #[serde(default)]
    pub params: Vec<Param>,

    /// Expression returned from the method body, emitted verbatim
    pub body_expression: String,
}

fn default_helper_name() -> String {
    "make".to_string()
}

impl HelperConstructor {
    pub fn new(params: Vec<Param>, body_expression: impl Into<String>) -> Self {
        Self {
            name: default_helper_name(),
            params,
            body_expression: body_expression.into(),
        }
    }
}

/// One member of the family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VariantDef {
    /// Appended to the family prefix to form the class name
    pub suffix: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub fields: Vec<FieldDef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_constructor: Option<HelperConstructor>,
}

impl VariantDef {
    pub fn new(suffix: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            description: description.into(),
            fields: Vec::new(),
            helper_constructor: None,
        }
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn helper(mut self, helper: HelperConstructor) -> Self {
        self.helper_constructor = Some(helper);
        self
    }
}

/// A tagged error family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaggedErrorConfig {
    pub name_prefix: String,

    #[serde(default)]
    pub style: ErrorStyle,

    #[serde(default)]
    pub variants: Vec<VariantDef>,

    #[serde(default)]
    pub include_union_type: bool,

    /// Defaults to `<name_prefix>Error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub union_type_name: Option<String>,
}

impl TaggedErrorConfig {
    pub fn new(name_prefix: impl Into<String>, style: ErrorStyle) -> Self {
        Self {
            name_prefix: name_prefix.into(),
            style,
            variants: Vec::new(),
            include_union_type: false,
            union_type_name: None,
        }
    }

    pub fn variant(mut self, variant: VariantDef) -> Self {
        self.variants.push(variant);
        self
    }

    pub fn with_union(mut self, name: Option<&str>) -> Self {
        self.include_union_type = true;
        self.union_type_name = name.map(str::to_string);
        self
    }

    pub fn class_name(&self, variant: &VariantDef) -> String {
        format!("{}{}", self.name_prefix, variant.suffix)
    }

    pub fn union_name(&self) -> String {
        self.union_type_name
            .clone()
            .unwrap_or_else(|| format!("{}Error", self.name_prefix))
    }
}

/// Emit every variant class, then the union type if requested
pub fn emit_tagged_errors(emitter: &mut Emitter, config: &TaggedErrorConfig) {
    debug!(
        prefix = %config.name_prefix,
        style = ?config.style,
        variants = config.variants.len(),
        union = config.include_union_type,
        "Emitting tagged error family."
    );

    if config.variants.is_empty() {
        return;
    }

    let namespace = match config.style {
        ErrorStyle::Fielded => "Data",
        ErrorStyle::SchemaValidated => "Schema",
    };
    emitter.add_import(EFFECT_MODULE, namespace, false);

    let mut names = Vec::with_capacity(config.variants.len());
    for (index, variant) in config.variants.iter().enumerate() {
        if index > 0 {
            emitter.add_blank_line();
        }
        let name = config.class_name(variant);
        emit_variant(emitter, config.style, &name, variant);
        names.push(name);
    }

    if config.include_union_type {
        emitter.add_blank_line();
        emit_union(emitter, &config.union_name(), &names);
    }
}

fn emit_variant(emitter: &mut Emitter, style: ErrorStyle, name: &str, variant: &VariantDef) {
    if !variant.description.is_empty() {
        emitter.add_doc_comment([&variant.description]);
    }

    let tag = emitter.quote(name);
    let terminator = emitter.terminator();
    let (open, field_lines, close) = match style {
        ErrorStyle::Fielded => (
            format!("export class {} extends Data.TaggedError({})<{{", name, tag),
            variant
                .fields
                .iter()
                .map(|field| {
                    let optional = if field.optional { "?" } else { "" };
                    format!("readonly {}{}: {}{}", field.name, optional, field.ty, terminator)
                })
                .collect::<Vec<_>>(),
            "}>",
        ),
        ErrorStyle::SchemaValidated => {
            let count = variant.fields.len();
            (
                format!(
                    "export class {} extends Schema.TaggedError<{}>()({}, {{",
                    name, name, tag
                ),
                variant
                    .fields
                    .iter()
                    .enumerate()
                    .map(|(i, field)| {
                        let comma = if i + 1 < count { "," } else { "" };
                        format!("{}: {}{}", field.name, field.schema_expression(), comma)
                    })
                    .collect::<Vec<_>>(),
                "})",
            )
        }
    };

    let body = if variant.helper_constructor.is_some() {
        " {"
    } else {
        " {}"
    };

    if field_lines.is_empty() {
        // `<{` + `}>` collapse to `<{}>`, `{` + `})` to `{})`
        emitter.add_line(format!("{}{}{}", open, close, body));
    } else {
        emitter.add_line(open);
        for line in &field_lines {
            let line = emitter.indented(1, line);
            emitter.add_line(line);
        }
        emitter.add_line(format!("{}{}", close, body));
    }

    if let Some(helper) = &variant.helper_constructor {
        let signature = format!(
            "static {}({}): {} {{",
            helper.name,
            render_params(&helper.params),
            name
        );
        let ret = format!("return {}{}", helper.body_expression, terminator);
        let lines = [
            emitter.indented(1, &signature),
            emitter.indented(2, &ret),
            emitter.indented(1, "}"),
        ];
        emitter.add_lines(lines);
        emitter.add_line("}");
    }
}

fn emit_union(emitter: &mut Emitter, union_name: &str, members: &[String]) {
    let terminator = emitter.terminator();
    if members.len() >= MULTILINE_UNION_THRESHOLD {
        emitter.add_line(format!("export type {} =", union_name));
        let last = members.len() - 1;
        for (i, member) in members.iter().enumerate() {
            let end = if i == last { terminator } else { "" };
            let line = emitter.indented(1, &format!("| {}{}", member, end));
            emitter.add_line(line);
        }
    } else {
        emitter.add_type_alias(union_name, &members.join(" | "), true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn user_errors(style: ErrorStyle) -> TaggedErrorConfig {
        TaggedErrorConfig::new("User", style)
            .variant(
                VariantDef::new("NotFound", "No user with the given id")
                    .field(FieldDef::new("userId", "string"))
                    .helper(HelperConstructor::new(
                        vec![Param::new("userId", "string")],
                        "new UserNotFound({ userId })",
                    )),
            )
            .variant(
                VariantDef::new("Validation", "Input failed validation")
                    .field(FieldDef::new("message", "string"))
                    .field(FieldDef::new("field", "string").optional()),
            )
            .with_union(None)
    }

    #[test]
    fn test_fielded_family() {
        let mut emitter = Emitter::new();
        emit_tagged_errors(&mut emitter, &user_errors(ErrorStyle::Fielded));

        let expected = r#"import { Data } from "effect"

/** No user with the given id */
export class UserNotFound extends Data.TaggedError("UserNotFound")<{
  readonly userId: string
}> {
  static make(userId: string): UserNotFound {
    return new UserNotFound({ userId })
  }
}

/** Input failed validation */
export class UserValidation extends Data.TaggedError("UserValidation")<{
  readonly message: string
  readonly field?: string
}> {}

export type UserError = UserNotFound | UserValidation
"#;
        assert_eq!(emitter.render(), expected);
    }

    #[test]
    fn test_schema_validated_family() {
        let mut emitter = Emitter::new();
        emit_tagged_errors(&mut emitter, &user_errors(ErrorStyle::SchemaValidated));

        let output = emitter.render();
        assert!(output.starts_with("import { Schema } from \"effect\"\n\n"));
        assert!(output.contains(
            "export class UserValidation extends Schema.TaggedError<UserValidation>()(\"UserValidation\", {\n  message: Schema.String,\n  field: Schema.optional(Schema.String)\n}) {}\n"
        ));
        assert!(output.contains("  static make(userId: string): UserNotFound {\n"));
        assert!(!output.contains("Data"));
    }

    #[test]
    fn test_fieldless_variants() {
        let config = TaggedErrorConfig::new("Auth", ErrorStyle::Fielded)
            .variant(VariantDef::new("Expired", ""));
        let mut emitter = Emitter::new();
        emit_tagged_errors(&mut emitter, &config);
        assert!(emitter
            .render()
            .ends_with("export class AuthExpired extends Data.TaggedError(\"AuthExpired\")<{}> {}\n"));

        let config = TaggedErrorConfig::new("Auth", ErrorStyle::SchemaValidated)
            .variant(VariantDef::new("Expired", ""));
        let mut emitter = Emitter::new();
        emit_tagged_errors(&mut emitter, &config);
        assert!(emitter.render().ends_with(
            "export class AuthExpired extends Schema.TaggedError<AuthExpired>()(\"AuthExpired\", {}) {}\n"
        ));
    }

    #[test]
    fn test_multiline_union() {
        let config = TaggedErrorConfig::new("Db", ErrorStyle::Fielded)
            .variant(VariantDef::new("Connection", ""))
            .variant(VariantDef::new("Timeout", ""))
            .variant(VariantDef::new("Constraint", ""))
            .with_union(Some("DatabaseFailure"));
        let mut emitter = Emitter::new();
        emit_tagged_errors(&mut emitter, &config);

        assert!(emitter.render().ends_with(
            "export type DatabaseFailure =\n  | DbConnection\n  | DbTimeout\n  | DbConstraint\n"
        ));
    }

    #[test]
    fn test_zero_variants_emit_nothing() {
        let config = TaggedErrorConfig::new("Empty", ErrorStyle::Fielded).with_union(None);
        let mut emitter = Emitter::new();
        emit_tagged_errors(&mut emitter, &config);

        assert!(emitter.is_empty());
        assert_eq!(emitter.render(), "");
    }

    #[test]
    fn test_union_omitted_when_not_requested() {
        let mut config = user_errors(ErrorStyle::Fielded);
        config.include_union_type = false;
        let mut emitter = Emitter::new();
        emit_tagged_errors(&mut emitter, &config);

        assert!(!emitter.render().contains("export type"));
    }

    #[test]
    fn test_schema_for_type() {
        assert_eq!(schema_for_type("string"), "Schema.String");
        assert_eq!(schema_for_type(" number "), "Schema.Number");
        assert_eq!(schema_for_type("string[]"), "Schema.Array(Schema.String)");
        assert_eq!(schema_for_type("Record<string, unknown>"), "Schema.Unknown");
    }

    #[test]
    fn test_explicit_schema_wins() {
        let field = FieldDef::new("id", "string")
            .with_schema("Schema.UUID")
            .optional();
        assert_eq!(field.schema_expression(), "Schema.optional(Schema.UUID)");
    }

    #[test]
    fn test_semicolons_inside_classes() {
        let config = crate::config::EmitterConfig {
            semicolons: true,
            ..Default::default()
        };
        let mut emitter = Emitter::with_config(config);
        emit_tagged_errors(&mut emitter, &user_errors(ErrorStyle::Fielded));

        let output = emitter.render();
        assert!(output.contains("  readonly userId: string;\n"));
        assert!(output.contains("    return new UserNotFound({ userId });\n"));
        assert!(output.contains("export type UserError = UserNotFound | UserValidation;\n"));
    }
}
