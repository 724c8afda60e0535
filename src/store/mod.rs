//! Durable state behind the handlers: the `Store` trait and its PostgreSQL and
//! in-memory implementations.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use crate::config::ResolvedResource;
use crate::error::AppError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Query interface over a relational store. Rows come back as JSON objects with
/// `id` plus every declared field. The store assigns ids and must reject rows that
/// would leave a required column empty.
#[async_trait]
pub trait Store: Send + Sync {
    /// All rows of the resource, ordered by id.
    async fn fetch_all(&self, resource: &ResolvedResource) -> Result<Vec<Value>, AppError>;

    async fn fetch_one(&self, resource: &ResolvedResource, id: i64) -> Result<Option<Value>, AppError>;

    /// Insert a row; returns the id the store assigned.
    async fn insert(&self, resource: &ResolvedResource, body: &Map<String, Value>) -> Result<i64, AppError>;

    /// Overwrite every declared field of row `id`; returns rows affected.
    async fn update(
        &self,
        resource: &ResolvedResource,
        id: i64,
        body: &Map<String, Value>,
    ) -> Result<u64, AppError>;

    /// Returns rows affected.
    async fn delete(&self, resource: &ResolvedResource, id: i64) -> Result<u64, AppError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), AppError>;
}
