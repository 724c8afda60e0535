//! Schema-driven CRUD REST API: movies and users over PostgreSQL.

pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{builtin_resources, load_resources, resolve, FullConfig, ResolvedModel, ResolvedResource, ServerSettings, StoreKind};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use routes::{build_app, common_routes, resource_routes};
pub use service::{CrudService, RequestValidator, Validation};
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, Store};
