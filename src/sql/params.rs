//! Convert serde_json::Value to types that sqlx can bind.

use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value that can be bound to a PostgreSQL query. Converts from serde_json::Value.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
    Json(Value),
}

impl PgBindValue {
    pub fn from_json(v: &Value) -> Self {
        match v {
            Value::Null => PgBindValue::Null,
            Value::Bool(b) => PgBindValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => PgBindValue::I64(i),
                None => PgBindValue::F64(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => PgBindValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => PgBindValue::Json(v.clone()),
        }
    }

    /// Text form sent on the wire. Statements cast each placeholder to the column type,
    /// so PostgreSQL does the parsing and rejects values that do not fit.
    fn as_text(&self) -> Option<String> {
        match self {
            PgBindValue::Null => None,
            PgBindValue::Bool(b) => Some(b.to_string()),
            PgBindValue::I64(n) => Some(n.to_string()),
            PgBindValue::F64(n) => Some(n.to_string()),
            PgBindValue::String(s) => Some(s.clone()),
            PgBindValue::Json(v) => Some(v.to_string()),
        }
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        <Option<String> as Encode<Postgres>>::encode_by_ref(&self.as_text(), buf)
    }
}

/// Every parameter is declared TEXT, so a cached statement sees the same parameter
/// types on every execution regardless of which values are null.
impl Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_json_scalars() {
        assert_eq!(PgBindValue::from_json(&json!(null)), PgBindValue::Null);
        assert_eq!(PgBindValue::from_json(&json!(1941)), PgBindValue::I64(1941));
        assert_eq!(PgBindValue::from_json(&json!(1.5)), PgBindValue::F64(1.5));
        assert_eq!(PgBindValue::from_json(&json!(true)), PgBindValue::Bool(true));
        assert_eq!(
            PgBindValue::from_json(&json!("Paris")),
            PgBindValue::String("Paris".into())
        );
        assert!(matches!(PgBindValue::from_json(&json!([1])), PgBindValue::Json(_)));
    }

    #[test]
    fn renders_text_for_the_wire() {
        assert_eq!(PgBindValue::from_json(&json!(1941)).as_text().as_deref(), Some("1941"));
        assert_eq!(PgBindValue::from_json(&json!(false)).as_text().as_deref(), Some("false"));
        assert_eq!(PgBindValue::from_json(&json!("0")).as_text().as_deref(), Some("0"));
        assert_eq!(PgBindValue::Null.as_text(), None);
    }
}
