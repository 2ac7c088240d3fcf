//! Declaration shapes
//!
//! Small descriptions of interfaces, properties, parameters and functions
//! that the emitter knows how to turn into lines. Shapes carry no imports;
//! callers register whatever their type annotations reference.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A named, typed property (interface member or error field)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Property {
    pub name: String,

    /// TypeScript type annotation
    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default)]
    pub optional: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// `readonly name?: type`
    pub fn render_readonly(&self) -> String {
        format!(
            "readonly {}{}: {}",
            self.name,
            if self.optional { "?" } else { "" },
            self.ty
        )
    }
}

/// A function or method parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Param {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: String,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Render `a: A, b: B`
pub fn render_params(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| format!("{}: {}", p.name, p.ty))
        .collect::<Vec<_>>()
        .join(", ")
}

/// An interface declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceShape {
    pub name: String,
    pub doc: Option<String>,
    pub properties: Vec<Property>,
    pub exported: bool,
}

impl InterfaceShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            properties: Vec::new(),
            exported: true,
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }
}

/// A top-level function declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionShape {
    pub name: String,
    pub doc: Option<String>,
    pub params: Vec<Param>,
    pub return_type: Option<String>,
    /// Body lines, without the outer indentation
    pub body: Vec<String>,
    pub exported: bool,
    pub is_async: bool,
}

impl FunctionShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            params: Vec::new(),
            return_type: None,
            body: Vec::new(),
            exported: true,
            is_async: false,
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    pub fn body_line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }

    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub(crate) fn signature(&self) -> String {
        let mut signature = String::new();
        if self.exported {
            signature.push_str("export ");
        }
        if self.is_async {
            signature.push_str("async ");
        }
        signature.push_str(&format!(
            "function {}({})",
            self.name,
            render_params(&self.params)
        ));
        if let Some(ty) = &self.return_type {
            signature.push_str(&format!(": {}", ty));
        }
        signature
    }
}

pub(crate) fn export_prefix(exported: bool) -> &'static str {
    if exported {
        "export "
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_render() {
        assert_eq!(
            Property::new("id", "string").render_readonly(),
            "readonly id: string"
        );
        assert_eq!(
            Property::new("cause", "unknown").optional().render_readonly(),
            "readonly cause?: unknown"
        );
    }

    #[test]
    fn test_render_params() {
        let params = vec![Param::new("id", "string"), Param::new("attempt", "number")];
        assert_eq!(render_params(&params), "id: string, attempt: number");
        assert_eq!(render_params(&[]), "");
    }

    #[test]
    fn test_function_signature() {
        let shape = FunctionShape::new("loadUser")
            .param(Param::new("id", "string"))
            .returns("Promise<User>")
            .asynchronous();

        assert_eq!(
            shape.signature(),
            "export async function loadUser(id: string): Promise<User>"
        );
    }

    #[test]
    fn test_property_from_yaml() {
        let property: Property = serde_norway::from_str("name: id\ntype: string\n").unwrap();
        assert_eq!(property, Property::new("id", "string"));
    }
}
