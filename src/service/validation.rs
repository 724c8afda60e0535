//! Request validation against a resource's declared fields.

use crate::config::{FieldKind, ResolvedField, ResolvedResource};
use crate::error::AppError;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Problem {
    Missing,
    WrongType { expected: &'static str },
    Rule { message: String },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub problem: Problem,
}

/// Outcome of checking a payload. Consulted by handlers before any store access.
#[derive(Clone, Debug, PartialEq)]
pub enum Validation {
    Valid,
    Invalid(Vec<FieldError>),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    /// Turn an `Invalid` outcome into the 422 error.
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Validation::Valid => Ok(()),
            Validation::Invalid(details) => {
                let fields: Vec<&str> = details.iter().map(|e| e.field.as_str()).collect();
                Err(AppError::Validation {
                    message: format!("invalid fields: {}", fields.join(", ")),
                    details,
                })
            }
        }
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Check every declared field of `resource` against `body`. All problems are
    /// collected, in declaration order. Keys the resource does not declare are ignored.
    pub fn validate(body: &Map<String, Value>, resource: &ResolvedResource) -> Validation {
        let errors: Vec<FieldError> = resource
            .fields
            .iter()
            .filter_map(|field| {
                check_field(field, body.get(&field.name)).map(|problem| FieldError {
                    field: field.name.clone(),
                    problem,
                })
            })
            .collect();
        if errors.is_empty() {
            Validation::Valid
        } else {
            Validation::Invalid(errors)
        }
    }
}

fn check_field(field: &ResolvedField, value: Option<&Value>) -> Option<Problem> {
    let v = match value {
        None | Some(Value::Null) => {
            return field.required.then_some(Problem::Missing);
        }
        Some(v) => v,
    };
    let type_ok = match field.kind {
        FieldKind::Text => v.is_string(),
        FieldKind::Integer => v.is_i64(),
        FieldKind::Boolean => v.is_boolean(),
    };
    if !type_ok {
        return Some(Problem::WrongType {
            expected: field.kind.json_type(),
        });
    }
    check_rule(field, v).map(|message| Problem::Rule { message })
}

fn check_rule(field: &ResolvedField, v: &Value) -> Option<String> {
    let rule = &field.rule;
    if let Some(s) = v.as_str() {
        let len = s.chars().count();
        if let Some(max) = rule.max_length {
            if len > max as usize {
                return Some(format!("must be at most {} characters", max));
            }
        }
        if let Some(min) = rule.min_length {
            if len < min as usize {
                return Some(format!("must be at least {} characters", min));
            }
        }
        if let Some(ref re) = field.pattern {
            if !re.is_match(s) {
                return Some("does not match required pattern".into());
            }
        }
    }
    if let Some(n) = v.as_i64() {
        if let Some(min) = rule.minimum {
            if n < min {
                return Some(format!("must be at least {}", min));
            }
        }
        if let Some(max) = rule.maximum {
            if n > max {
                return Some(format!("must be at most {}", max));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{builtin_resources, resolve, FullConfig, ResolvedModel};
    use serde_json::json;

    fn model() -> ResolvedModel {
        resolve(&FullConfig {
            resources: builtin_resources(),
        })
        .unwrap()
    }

    fn object(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn complete_user_is_valid() {
        let model = model();
        let users = model.resource_by_path("users").unwrap();
        let body = object(json!({
            "firstname": "Marie",
            "lastname": "Martin",
            "email": "m@x.co",
            "city": "Paris",
            "language": "French",
            "nickname": "ignored"
        }));
        assert!(RequestValidator::validate(&body, users).is_valid());
    }

    #[test]
    fn reports_every_missing_field_in_order() {
        let model = model();
        let users = model.resource_by_path("users").unwrap();
        let body = object(json!({ "firstname": "Agathe", "email": null }));
        let Validation::Invalid(errors) = RequestValidator::validate(&body, users) else {
            panic!("expected invalid");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["lastname", "email", "city", "language"]);
        assert!(errors.iter().all(|e| e.problem == Problem::Missing));
    }

    #[test]
    fn wrong_types_are_reported() {
        let model = model();
        let movies = model.resource_by_path("movies").unwrap();
        let body = object(json!({
            "title": "Citizen Kane",
            "director": 42,
            "year": "1941",
            "color": "0",
            "duration": 119.5
        }));
        let Validation::Invalid(errors) = RequestValidator::validate(&body, movies) else {
            panic!("expected invalid");
        };
        assert_eq!(
            errors,
            vec![
                FieldError {
                    field: "director".into(),
                    problem: Problem::WrongType { expected: "string" }
                },
                FieldError {
                    field: "year".into(),
                    problem: Problem::WrongType { expected: "integer" }
                },
                FieldError {
                    field: "duration".into(),
                    problem: Problem::WrongType { expected: "integer" }
                },
            ]
        );
    }

    #[test]
    fn max_length_is_enforced() {
        let model = model();
        let users = model.resource_by_path("users").unwrap();
        let body = object(json!({
            "firstname": "a".repeat(256),
            "lastname": "Martin",
            "email": "m@x.co",
            "city": "Paris",
            "language": "French"
        }));
        let Validation::Invalid(errors) = RequestValidator::validate(&body, users) else {
            panic!("expected invalid");
        };
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0].problem, Problem::Rule { .. }));
    }

    #[test]
    fn invalid_outcome_maps_to_validation_error() {
        let err = Validation::Invalid(vec![FieldError {
            field: "title".into(),
            problem: Problem::Missing,
        }])
        .into_result()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref details, .. } if details.len() == 1));
        assert!(Validation::Valid.into_result().is_ok());
    }
}
