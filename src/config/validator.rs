//! Config validation: identifier safety and resource consistency.

use crate::config::FullConfig;
use crate::error::ConfigError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Column name reserved for the store-assigned primary key.
pub const ID_COLUMN: &str = "id";

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("static identifier pattern"))
}

fn check_identifier(kind: &'static str, name: &str) -> Result<(), ConfigError> {
    if name.len() > 63 || !identifier_re().is_match(name) {
        return Err(ConfigError::InvalidIdentifier {
            kind,
            name: name.to_string(),
        });
    }
    Ok(())
}

pub fn validate(config: &FullConfig) -> Result<(), ConfigError> {
    if config.resources.is_empty() {
        return Err(ConfigError::Validation("at least one resource required".into()));
    }

    let mut path_segments = HashSet::new();
    let mut tables = HashSet::new();
    for r in &config.resources {
        check_identifier("table", &r.table)?;
        check_identifier("path segment", &r.path_segment)?;
        if !path_segments.insert(r.path_segment.as_str()) {
            return Err(ConfigError::DuplicatePathSegment(r.path_segment.clone()));
        }
        if !tables.insert(r.table.as_str()) {
            return Err(ConfigError::DuplicateTable(r.table.clone()));
        }
        if r.fields.is_empty() {
            return Err(ConfigError::Validation(format!(
                "resource '{}' declares no fields",
                r.name
            )));
        }

        let mut field_names = HashSet::new();
        for f in &r.fields {
            check_identifier("field", &f.name)?;
            if f.name == ID_COLUMN {
                return Err(ConfigError::Validation(format!(
                    "resource '{}': '{}' is store-assigned and cannot be declared",
                    r.name, ID_COLUMN
                )));
            }
            if !field_names.insert(f.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "resource '{}': duplicate field '{}'",
                    r.name, f.name
                )));
            }
            if let Some(ref pattern) = f.validation.pattern {
                Regex::new(pattern).map_err(|e| {
                    ConfigError::Validation(format!(
                        "resource '{}': invalid pattern for '{}': {}",
                        r.name, f.name, e
                    ))
                })?;
            }
        }
    }

    Ok(())
}
