//! In-process store with the same contract as the PostgreSQL one. Used by tests
//! and by `STORE=memory` for running without a database.

use crate::config::{FieldKind, ResolvedResource, ID_COLUMN};
use crate::error::AppError;
use crate::store::Store;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Map<String, Value>>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Table>>, AppError> {
        self.tables
            .read()
            .map_err(|_| AppError::Store("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Table>>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::Store("memory store lock poisoned".into()))
    }
}

/// Build the stored row the way the table's column constraints would: declared
/// fields only, NOT NULL on required fields, values checked against the column type.
fn to_row(resource: &ResolvedResource, body: &Map<String, Value>) -> Result<Map<String, Value>, AppError> {
    let mut row = Map::new();
    for f in &resource.fields {
        let v = body.get(&f.name).cloned().unwrap_or(Value::Null);
        if v.is_null() {
            if f.required {
                return Err(AppError::Store(format!(
                    "null value in column \"{}\" of relation \"{}\" violates not-null constraint",
                    f.name, resource.table_name
                )));
            }
            row.insert(f.name.clone(), Value::Null);
            continue;
        }
        let fits = match f.kind {
            FieldKind::Text => v.is_string(),
            FieldKind::Integer => v.is_i64(),
            FieldKind::Boolean => v.is_boolean(),
        };
        if !fits {
            return Err(AppError::Store(format!(
                "invalid input for column \"{}\" of type {}",
                f.name,
                f.kind.pg_type()
            )));
        }
        row.insert(f.name.clone(), v);
    }
    Ok(row)
}

fn with_id(id: i64, row: &Map<String, Value>) -> Value {
    let mut out = Map::with_capacity(row.len() + 1);
    out.insert(ID_COLUMN.to_string(), Value::from(id));
    out.extend(row.iter().map(|(k, v)| (k.clone(), v.clone())));
    Value::Object(out)
}

#[async_trait]
impl Store for MemoryStore {
    async fn fetch_all(&self, resource: &ResolvedResource) -> Result<Vec<Value>, AppError> {
        let tables = self.read()?;
        Ok(tables
            .get(&resource.table_name)
            .map(|t| t.rows.iter().map(|(id, row)| with_id(*id, row)).collect())
            .unwrap_or_default())
    }

    async fn fetch_one(&self, resource: &ResolvedResource, id: i64) -> Result<Option<Value>, AppError> {
        let tables = self.read()?;
        Ok(tables
            .get(&resource.table_name)
            .and_then(|t| t.rows.get(&id))
            .map(|row| with_id(id, row)))
    }

    async fn insert(&self, resource: &ResolvedResource, body: &Map<String, Value>) -> Result<i64, AppError> {
        let row = to_row(resource, body)?;
        let mut tables = self.write()?;
        let table = tables.entry(resource.table_name.clone()).or_default();
        table.next_id += 1;
        let id = table.next_id;
        table.rows.insert(id, row);
        Ok(id)
    }

    async fn update(
        &self,
        resource: &ResolvedResource,
        id: i64,
        body: &Map<String, Value>,
    ) -> Result<u64, AppError> {
        let mut tables = self.write()?;
        let Some(existing) = tables
            .get_mut(&resource.table_name)
            .and_then(|t| t.rows.get_mut(&id))
        else {
            return Ok(0);
        };
        *existing = to_row(resource, body)?;
        Ok(1)
    }

    async fn delete(&self, resource: &ResolvedResource, id: i64) -> Result<u64, AppError> {
        let mut tables = self.write()?;
        let removed = tables
            .get_mut(&resource.table_name)
            .and_then(|t| t.rows.remove(&id));
        Ok(u64::from(removed.is_some()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }
}
