use std::env;
use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db";
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid APP_ADDR {value:?}: {source}")]
    Addr { value: String, source: std::net::AddrParseError },
    #[error("invalid DATABASE_MAX_CONNECTIONS {value:?}: {source}")]
    MaxConnections { value: String, source: std::num::ParseIntError },
    #[error("DATABASE_MAX_CONNECTIONS must be at least 1")]
    ZeroMaxConnections,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub addr: SocketAddr,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let addr_raw = lookup("APP_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_raw.parse().map_err(|source| ConfigError::Addr { value: addr_raw.clone(), source })?;
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().map_err(|source| ConfigError::MaxConnections { value: raw.clone(), source })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        if max_connections == 0 {
            return Err(ConfigError::ZeroMaxConnections);
        }
        Ok(Self { database_url, addr, max_connections })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.addr, DEFAULT_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("APP_ADDR", "0.0.0.0:9000"),
            ("DATABASE_MAX_CONNECTIONS", "2"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.max_connections, 2);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(Config::from_lookup(lookup(&[("APP_ADDR", "nope")])), Err(ConfigError::Addr { .. })));
        assert!(matches!(
            Config::from_lookup(lookup(&[("DATABASE_MAX_CONNECTIONS", "many")])),
            Err(ConfigError::MaxConnections { .. })
        ));
    }

    #[test]
    fn rejects_empty_pool() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("DATABASE_MAX_CONNECTIONS", "0")])),
            Err(ConfigError::ZeroMaxConnections)
        ));
    }
}
