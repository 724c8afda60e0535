//! Generic CRUD over a `Store`: one implementation serves every declared resource.

use crate::config::ResolvedResource;
use crate::error::AppError;
use crate::store::Store;
use serde_json::{Map, Value};

pub struct CrudService;

impl CrudService {
    /// Every row of the resource, ordered by id. Empty is not an error.
    pub async fn list(store: &dyn Store, resource: &ResolvedResource) -> Result<Vec<Value>, AppError> {
        store.fetch_all(resource).await
    }

    /// Fetch one row by id. Absent rows are `NotFound`.
    pub async fn read(store: &dyn Store, resource: &ResolvedResource, id: i64) -> Result<Value, AppError> {
        store
            .fetch_one(resource, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {}", resource.name, id)))
    }

    /// Insert one row and return the id the store assigned. Callers validate first;
    /// an unvalidated partial body is rejected by the store and surfaces as a store error.
    pub async fn create(
        store: &dyn Store,
        resource: &ResolvedResource,
        body: &Map<String, Value>,
    ) -> Result<i64, AppError> {
        let id = store.insert(resource, body).await?;
        tracing::info!(resource = %resource.name, id, "created");
        Ok(id)
    }

    /// Overwrite every field of row `id`.
    pub async fn update(
        store: &dyn Store,
        resource: &ResolvedResource,
        id: i64,
        body: &Map<String, Value>,
    ) -> Result<(), AppError> {
        match store.update(resource, id, body).await? {
            0 => Err(AppError::NotFound(format!("{} {}", resource.name, id))),
            _ => {
                tracing::info!(resource = %resource.name, id, "updated");
                Ok(())
            }
        }
    }

    pub async fn delete(store: &dyn Store, resource: &ResolvedResource, id: i64) -> Result<(), AppError> {
        match store.delete(resource, id).await? {
            0 => Err(AppError::NotFound(format!("{} {}", resource.name, id))),
            _ => {
                tracing::info!(resource = %resource.name, id, "deleted");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{builtin_resources, resolve, FullConfig, ResolvedModel};
    use crate::store::MemoryStore;
    use serde_json::json;

    fn model() -> ResolvedModel {
        resolve(&FullConfig {
            resources: builtin_resources(),
        })
        .unwrap()
    }

    fn marie() -> Map<String, Value> {
        match json!({
            "firstname": "Marie",
            "lastname": "Martin",
            "email": "m@x.co",
            "city": "Paris",
            "language": "French"
        }) {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn record_lifecycle() {
        let model = model();
        let users = model.resource_by_path("users").unwrap();
        let store = MemoryStore::new();

        let id = CrudService::create(&store, users, &marie()).await.unwrap();
        let row = CrudService::read(&store, users, id).await.unwrap();
        assert_eq!(row["firstname"], json!("Marie"));

        let mut moved = marie();
        moved.insert("city".into(), json!("Montreal"));
        CrudService::update(&store, users, id, &moved).await.unwrap();
        assert_eq!(CrudService::read(&store, users, id).await.unwrap()["city"], json!("Montreal"));

        CrudService::delete(&store, users, id).await.unwrap();
        assert!(matches!(
            CrudService::read(&store, users, id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let model = model();
        let users = model.resource_by_path("users").unwrap();
        let store = MemoryStore::new();
        assert!(matches!(
            CrudService::update(&store, users, 0, &marie()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            CrudService::delete(&store, users, 42).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn unvalidated_partial_create_is_a_store_error() {
        let model = model();
        let users = model.resource_by_path("users").unwrap();
        let store = MemoryStore::new();
        let mut partial = Map::new();
        partial.insert("firstname".into(), json!("Agathe"));
        assert!(matches!(
            CrudService::create(&store, users, &partial).await,
            Err(AppError::Store(_))
        ));
        assert!(CrudService::list(&store, users).await.unwrap().is_empty());
    }
}
