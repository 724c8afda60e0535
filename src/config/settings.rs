//! Process settings read from the environment (and `.env` via dotenvy in the binary).

use crate::error::ConfigError;
use std::path::PathBuf;

/// Backing store selected at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Clone, Debug)]
pub struct ServerSettings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub store: StoreKind,
    pub resources_path: Option<PathBuf>,
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("APP_PORT") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| ConfigError::Load(format!("APP_PORT: invalid port '{}'", v)))?,
            None => 3000,
        };
        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => v.trim().parse().map_err(|_| {
                ConfigError::Load(format!("DB_MAX_CONNECTIONS: invalid number '{}'", v))
            })?,
            None => 5,
        };
        let store = match get("STORE").as_deref().map(str::trim) {
            None | Some("postgres") => StoreKind::Postgres,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(ConfigError::Load(format!(
                    "STORE: expected 'postgres' or 'memory', got '{}'",
                    other
                )))
            }
        };

        Ok(ServerSettings {
            database_url: get("DATABASE_URL").unwrap_or_else(|| "postgres://localhost/crud_api".into()),
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            max_connections,
            store,
            resources_path: get("RESOURCES_PATH").map(PathBuf::from),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<ServerSettings, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerSettings::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.bind_addr(), "0.0.0.0:3000");
        assert_eq!(s.max_connections, 5);
        assert_eq!(s.store, StoreKind::Postgres);
        assert!(s.resources_path.is_none());
    }

    #[test]
    fn reads_overrides() {
        let s = settings(&[
            ("APP_HOST", "127.0.0.1"),
            ("APP_PORT", "8080"),
            ("STORE", "memory"),
            ("RESOURCES_PATH", "resources.json"),
            ("DATABASE_URL", "postgres://db/films"),
        ])
        .unwrap();
        assert_eq!(s.bind_addr(), "127.0.0.1:8080");
        assert_eq!(s.store, StoreKind::Memory);
        assert_eq!(s.database_url, "postgres://db/films");
        assert_eq!(s.resources_path, Some(PathBuf::from("resources.json")));
    }

    #[test]
    fn empty_value_counts_as_unset() {
        assert_eq!(settings(&[("APP_PORT", "")]).unwrap().port, 3000);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(matches!(settings(&[("APP_PORT", "http")]), Err(ConfigError::Load(_))));
        assert!(matches!(settings(&[("STORE", "redis")]), Err(ConfigError::Load(_))));
    }
}
