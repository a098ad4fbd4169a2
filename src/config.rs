//! Process settings read from the environment (after an optional `.env`).

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8070;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub cors_origin: String,
    pub body_limit: usize,
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

impl Settings {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        Ok(Settings {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port: parsed(&lookup, "PORT", DEFAULT_PORT)?,
            max_connections: parsed(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            cors_origin: lookup("CORS_ALLOWED_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.into()),
            body_limit: parsed(&lookup, "BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT)?,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::Invalid { name: "HOST", value: raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn database_url_is_required() {
        let err = Settings::from_lookup(lookup_in(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn defaults_apply() {
        let s = Settings::from_lookup(lookup_in(&[("DATABASE_URL", "postgres://localhost/items")])).unwrap();
        assert_eq!(s.port, 8070);
        assert_eq!(s.max_connections, 5);
        assert_eq!(s.cors_origin, "http://localhost:3000");
        assert_eq!(s.bind_addr().unwrap().to_string(), "0.0.0.0:8070");
    }

    #[test]
    fn malformed_port_is_rejected() {
        let err = Settings::from_lookup(lookup_in(&[("DATABASE_URL", "postgres://x"), ("PORT", "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }
}
