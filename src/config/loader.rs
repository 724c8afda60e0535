//! Load resource declarations from the built-in set or a JSON file, and resolve them.

use crate::config::resolved::{ResolvedField, ResolvedModel, ResolvedResource};
use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

/// The two resources served out of the box: `movies` and `users`.
pub fn builtin_resources() -> Vec<ResourceConfig> {
    vec![
        ResourceConfig {
            name: "movie".into(),
            table: "movies".into(),
            path_segment: "movies".into(),
            fields: vec![
                FieldConfig::text("title"),
                FieldConfig::text("director"),
                FieldConfig::integer("year"),
                FieldConfig::text("color"),
                FieldConfig::integer("duration"),
            ],
        },
        ResourceConfig {
            name: "user".into(),
            table: "users".into(),
            path_segment: "users".into(),
            fields: vec![
                FieldConfig::text("firstname"),
                FieldConfig::text("lastname"),
                FieldConfig::text("email"),
                FieldConfig::text("city"),
                FieldConfig::text("language"),
            ],
        },
    ]
}

/// Parse a JSON array of resource declarations.
pub fn parse_resources(json: &str) -> Result<FullConfig, ConfigError> {
    let resources: Vec<ResourceConfig> =
        serde_json::from_str(json).map_err(|e| ConfigError::Load(format!("resources: {}", e)))?;
    Ok(FullConfig { resources })
}

/// Read resource declarations from `path`, or fall back to the built-ins when `path` is None.
pub async fn load_resources(path: Option<&Path>) -> Result<FullConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(FullConfig {
            resources: builtin_resources(),
        });
    };
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    parse_resources(&raw)
}

/// Build resolved model from full config (validates first).
pub fn resolve(config: &FullConfig) -> Result<ResolvedModel, ConfigError> {
    validate(config)?;

    let mut resources = Vec::with_capacity(config.resources.len());
    let mut resource_by_path = HashMap::new();
    for r in &config.resources {
        let mut fields = Vec::with_capacity(r.fields.len());
        for f in &r.fields {
            let pattern = f
                .validation
                .pattern
                .as_deref()
                .map(Regex::new)
                .transpose()
                .map_err(|e| ConfigError::Validation(format!("{}.{}: {}", r.name, f.name, e)))?;
            fields.push(ResolvedField {
                name: f.name.clone(),
                kind: f.kind,
                required: f.required,
                rule: f.validation.clone(),
                pattern,
            });
        }
        let resolved = ResolvedResource {
            name: r.name.clone(),
            table_name: r.table.clone(),
            path_segment: r.path_segment.clone(),
            fields,
        };
        resource_by_path.insert(resolved.path_segment.clone(), resolved.clone());
        resources.push(resolved);
    }

    Ok(ResolvedModel {
        resources,
        resource_by_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_resolve_by_path() {
        let model = resolve(&FullConfig {
            resources: builtin_resources(),
        })
        .unwrap();
        let movies = model.resource_by_path("movies").unwrap();
        assert_eq!(movies.table_name, "movies");
        assert_eq!(
            movies.field_names().collect::<Vec<_>>(),
            ["title", "director", "year", "color", "duration"]
        );
        assert_eq!(movies.field("year").unwrap().kind, FieldKind::Integer);
        let users = model.resource_by_path("users").unwrap();
        assert!(users.fields.iter().all(|f| f.kind == FieldKind::Text && f.required));
        assert!(model.resource_by_path("books").is_none());
    }

    #[test]
    fn parses_resource_file() {
        let json = r#"[
            {
                "name": "book",
                "table": "books",
                "path_segment": "books",
                "fields": [
                    { "name": "title", "type": "text", "validation": { "max_length": 80 } },
                    { "name": "pages", "type": "integer", "validation": { "minimum": 1 } },
                    { "name": "in_print", "type": "boolean", "required": false },
                    { "name": "isbn", "type": "text", "validation": { "pattern": "^[0-9-]+$" } }
                ]
            }
        ]"#;
        let config = parse_resources(json).unwrap();
        let model = resolve(&config).unwrap();
        let books = model.resource_by_path("books").unwrap();
        assert_eq!(books.fields.len(), 4);
        assert!(!books.field("in_print").unwrap().required);
        assert_eq!(books.field("pages").unwrap().rule.minimum, Some(1));
        assert!(books.field("isbn").unwrap().pattern.is_some());
    }

    #[test]
    fn malformed_file_is_a_load_error() {
        assert!(matches!(
            parse_resources("{ not json"),
            Err(ConfigError::Load(_))
        ));
    }

    #[tokio::test]
    async fn missing_path_falls_back_to_builtins() {
        let config = load_resources(None).await.unwrap();
        assert_eq!(config.resources.len(), 2);
    }
}
