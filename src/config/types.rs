//! Raw resource declarations as they appear in a resources JSON file.

use serde::{Deserialize, Serialize};

/// Primitive type of a declared field. Decides both the JSON type accepted by
/// the validator and the SQL column type used by migrations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    Boolean,
}

impl FieldKind {
    /// Name used in validation messages.
    pub fn json_type(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
        }
    }

    /// PostgreSQL type used for DDL and parameter casts.
    pub fn pg_type(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "bigint",
            FieldKind::Boolean => "boolean",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub min_length: Option<u32>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub minimum: Option<i64>,
    #[serde(default)]
    pub maximum: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default)]
    pub validation: ValidationRule,
}

fn default_true() -> bool {
    true
}

impl FieldConfig {
    pub fn text(name: &str) -> Self {
        FieldConfig {
            name: name.to_string(),
            kind: FieldKind::Text,
            required: true,
            validation: ValidationRule {
                max_length: Some(255),
                ..ValidationRule::default()
            },
        }
    }

    pub fn integer(name: &str) -> Self {
        FieldConfig {
            name: name.to_string(),
            kind: FieldKind::Integer,
            required: true,
            validation: ValidationRule::default(),
        }
    }
}

/// One CRUD resource: a table, the path segment it is served under, and its
/// writable fields. The `id` column is implicit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub name: String,
    pub table: String,
    pub path_segment: String,
    pub fields: Vec<FieldConfig>,
}

/// All resource declarations in one struct for in-memory loading.
#[derive(Clone, Debug, Default)]
pub struct FullConfig {
    pub resources: Vec<ResourceConfig>,
}
