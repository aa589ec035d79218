//! Record builder: accumulates one record's fields, imports, and optional
//! docstring, and serializes them to Rust source text.
//!
//! Imports are a deduplicated set emitted in sorted order; fields keep
//! insertion order. Repeated runs over identical input therefore produce
//! byte-identical output.

use std::collections::BTreeSet;
use std::path::{Component, Path};

use crate::annot::TypeAnnotation;
use crate::name::Name;

/// Every generated record is meant to be bound with serde.
const DEFAULT_IMPORT: &str = "use serde::Deserialize;";

#[derive(Debug, Clone)]
pub struct RecordBuilder {
    name: Name,
    imports: BTreeSet<String>,
    params: Vec<String>,
    docstring: Option<String>,
}

impl RecordBuilder {
    pub fn new(name: Name) -> Self {
        let mut imports = BTreeSet::new();
        imports.insert(DEFAULT_IMPORT.to_string());
        Self { name, imports, params: Vec::new(), docstring: None }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Rename the record. Happens only when a `list[X]` annotation renames
    /// a sequence-element record after it was built.
    pub fn set_name(&mut self, name: Name) {
        self.name = name;
    }

    pub fn set_docstring(&mut self, docstring: impl Into<String>) {
        self.docstring = Some(docstring.into());
    }

    /// Import edge to another generated record: destination path segments
    /// joined with `::` (`.` segments and a leading `src` dropped) under a
    /// `crate::` prefix, plus the record's module and type names.
    pub fn add_import(&mut self, dest: &Path, name: &Name) {
        let mut segments: Vec<String> = vec!["crate".to_string()];
        segments.extend(
            dest.components()
                .filter_map(|c| match c {
                    Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                    _ => None,
                })
                .skip_while(|s| s.as_str() == "src"),
        );
        segments.push(name.field_name().to_string());
        self.imports
            .insert(format!("use {}::{};", segments.join("::"), name.type_name()));
    }

    /// One field line, suffixed with an inline comment when a description
    /// was supplied.
    pub fn add_parameter(
        &mut self,
        field: &str,
        annotation: &TypeAnnotation,
        description: Option<&str>,
    ) {
        let ty = self.rust_type(annotation);
        let mut line = format!("pub {field}: {ty},");
        if let Some(description) = description {
            line.push_str(" // ");
            line.push_str(description);
        }
        self.params.push(line);
    }

    /// Sorted import block, blank line, optional doc line, header, fields
    /// in insertion order. An empty field list is legal for this target
    /// (`pub struct X {}`), so zero parameters is not an error here.
    pub fn build(&self) -> String {
        let mut out = String::new();
        for import in &self.imports {
            out.push_str(import);
            out.push('\n');
        }
        out.push('\n');
        if let Some(doc) = &self.docstring {
            out.push_str(&format!("/// {doc}\n"));
        }
        out.push_str("#[derive(Debug, Clone, Deserialize)]\n");
        out.push_str(&format!("pub struct {} {{\n", self.name.type_name()));
        for param in &self.params {
            out.push_str(&format!("    {param}\n"));
        }
        out.push_str("}\n");
        out
    }

    /// Map a descriptor to Rust type syntax. Descriptors keep the canonical
    /// names (`str`, `int`, `list`, record names); the mapping to the
    /// target language happens here and nowhere else.
    fn rust_type(&mut self, annotation: &TypeAnnotation) -> String {
        match (annotation.base.as_str(), &annotation.params) {
            ("list", Some(params)) => {
                let item = params.first().map(String::as_str).unwrap_or("Any");
                format!("Vec<{}>", self.base_type(item))
            }
            ("dict", Some(params)) => {
                self.imports.insert("use std::collections::BTreeMap;".to_string());
                let key = params.first().map(String::as_str).unwrap_or("str");
                let value = params.get(1).map(String::as_str).unwrap_or("Any");
                format!("BTreeMap<{}, {}>", self.base_type(key), self.base_type(value))
            }
            (base, Some(params)) => {
                // unknown parametric base passes through with mapped params
                let params: Vec<String> = params.iter().map(|p| self.base_type(p)).collect();
                format!("{base}<{}>", params.join(", "))
            }
            (base, None) => self.base_type(base),
        }
    }

    fn base_type(&mut self, base: &str) -> String {
        match base {
            "str" => "String".to_string(),
            "int" => "i64".to_string(),
            "float" => "f64".to_string(),
            "bool" => "bool".to_string(),
            "Any" | "any" => {
                self.imports.insert("use serde_yaml::Value;".to_string());
                "Value".to_string()
            }
            // record names pass through verbatim
            other => other.to_string(),
        }
    }
}
