//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from a resolved resource.

use crate::config::{ResolvedResource, ID_COLUMN};
use serde_json::{Map, Value};

/// Quote identifier for PostgreSQL (safe: only from config).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

/// SELECT list: id first, then declared fields in declaration order.
fn select_column_list(resource: &ResolvedResource) -> String {
    std::iter::once(quoted(ID_COLUMN))
        .chain(resource.fields.iter().map(|f| quoted(&f.name)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Placeholders carry a cast to the column type so loosely typed values bind correctly.
fn placeholder(param_num: u32, pg_type: &str) -> String {
    format!("${}::{}", param_num, pg_type)
}

fn id_placeholder(param_num: u32) -> String {
    placeholder(param_num, "bigint")
}

/// SELECT every row, ORDER BY id.
pub fn select_list(resource: &ResolvedResource) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(resource),
        quoted(&resource.table_name),
        quoted(ID_COLUMN)
    );
    q
}

/// SELECT by id.
pub fn select_by_id(resource: &ResolvedResource, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        select_column_list(resource),
        quoted(&resource.table_name),
        quoted(ID_COLUMN),
        id_placeholder(n)
    );
    q
}

/// INSERT every declared field; values from body, missing ones bound as NULL so the
/// table's NOT NULL constraints reject partial rows. The store assigns the id.
pub fn insert(resource: &ResolvedResource, body: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(resource.fields.len());
    let mut placeholders = Vec::with_capacity(resource.fields.len());
    for f in &resource.fields {
        let val = body.get(&f.name).cloned().unwrap_or(Value::Null);
        let n = q.push_param(val);
        cols.push(quoted(&f.name));
        placeholders.push(placeholder(n, f.kind.pg_type()));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(&resource.table_name),
        cols.join(", "),
        placeholders.join(", "),
        quoted(ID_COLUMN)
    );
    q
}

/// UPDATE by id, overwriting every declared field. Any `id` in body is ignored.
pub fn update(resource: &ResolvedResource, id: i64, body: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(resource.fields.len());
    for f in &resource.fields {
        let val = body.get(&f.name).cloned().unwrap_or(Value::Null);
        let n = q.push_param(val);
        sets.push(format!("{} = {}", quoted(&f.name), placeholder(n, f.kind.pg_type())));
    }
    let id_param = q.push_param(Value::from(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        quoted(&resource.table_name),
        sets.join(", "),
        quoted(ID_COLUMN),
        id_placeholder(id_param)
    );
    q
}

/// DELETE by id.
pub fn delete(resource: &ResolvedResource, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::from(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        quoted(&resource.table_name),
        quoted(ID_COLUMN),
        id_placeholder(n)
    );
    q
}
