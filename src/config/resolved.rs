//! Resolved resource model: config validated and flattened for runtime use.

use crate::config::{FieldKind, ValidationRule};
use regex::Regex;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct ResolvedField {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub rule: ValidationRule,
    /// `rule.pattern`, compiled once at resolve time.
    pub pattern: Option<Regex>,
}

#[derive(Clone, Debug)]
pub struct ResolvedResource {
    pub name: String,
    pub table_name: String,
    pub path_segment: String,
    /// Declared fields in declaration order. Excludes the implicit `id`.
    pub fields: Vec<ResolvedField>,
}

impl ResolvedResource {
    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResolvedModel {
    pub resources: Vec<ResolvedResource>,
    pub resource_by_path: HashMap<String, ResolvedResource>,
}

impl ResolvedModel {
    pub fn resource_by_path(&self, path: &str) -> Option<&ResolvedResource> {
        self.resource_by_path.get(path)
    }
}
