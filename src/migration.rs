//! Apply resource declarations to the database: one table per resource.

use crate::config::{validate, FieldKind, FullConfig, ResourceConfig, ID_COLUMN};
use crate::error::AppError;
use sqlx::PgPool;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn column_type(kind: FieldKind, max_length: Option<u32>) -> String {
    match (kind, max_length) {
        (FieldKind::Text, Some(n)) => format!("VARCHAR({})", n),
        (FieldKind::Text, None) => "TEXT".into(),
        (FieldKind::Integer, _) => "BIGINT".into(),
        (FieldKind::Boolean, _) => "BOOLEAN".into(),
    }
}

/// `CREATE TABLE IF NOT EXISTS` for one resource. Required fields are NOT NULL so the
/// table itself rejects partial rows.
pub fn create_table_sql(resource: &ResourceConfig) -> String {
    let mut col_defs = vec![format!("{} BIGSERIAL PRIMARY KEY", quote(ID_COLUMN))];
    for f in &resource.fields {
        let mut def = format!(
            "{} {}",
            quote(&f.name),
            column_type(f.kind, f.validation.max_length)
        );
        if f.required {
            def.push_str(" NOT NULL");
        }
        col_defs.push(def);
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quote(&resource.table),
        col_defs.join(",\n  ")
    )
}

/// Validates config first. Idempotent: existing tables are left as they are.
pub async fn apply_migrations(pool: &PgPool, config: &FullConfig) -> Result<(), AppError> {
    validate(config)?;
    for r in &config.resources {
        let sql = create_table_sql(r);
        tracing::debug!(sql = %sql, "migration");
        sqlx::query(&sql).execute(pool).await?;
        tracing::info!(table = %r.table, "table ready");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::builtin_resources;

    #[test]
    fn movies_table_ddl() {
        let movies = &builtin_resources()[0];
        assert_eq!(
            create_table_sql(movies),
            "CREATE TABLE IF NOT EXISTS \"movies\" (\n  \
             \"id\" BIGSERIAL PRIMARY KEY,\n  \
             \"title\" VARCHAR(255) NOT NULL,\n  \
             \"director\" VARCHAR(255) NOT NULL,\n  \
             \"year\" BIGINT NOT NULL,\n  \
             \"color\" VARCHAR(255) NOT NULL,\n  \
             \"duration\" BIGINT NOT NULL\n)"
        );
    }

    #[test]
    fn optional_fields_are_nullable() {
        let mut users = builtin_resources().remove(1);
        users.fields[4].required = false;
        users.fields[4].validation.max_length = None;
        let sql = create_table_sql(&users);
        assert!(sql.contains("\"language\" TEXT\n"));
        assert!(sql.contains("\"city\" VARCHAR(255) NOT NULL"));
    }
}
