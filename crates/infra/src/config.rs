//! Configuration loading and representation.
//!
//! Everything comes from environment variables read once at startup:
//!
//! | variable | default | meaning |
//! |----------|---------|---------|
//! | `BIND_ADDR` | `0.0.0.0:8080` | HTTP listen address |
//! | `DATABASE_URL` | unset | Postgres URL; unset means the in-memory store |
//! | `DATABASE_MAX_CONNECTIONS` | `5` | pool size |
//! | `LOG_FORMAT` | `json` | `json` or `pretty` |
//! | `INVOICES_PATH` | `/dashboard/invoices` | listing path to invalidate and redirect to |

use std::net::SocketAddr;

use thiserror::Error;

use dashboard_invoicing::INVOICES_PATH;
pub use dashboard_observability::LogFormat;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is invalid ({value:?}): {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub log_format: LogFormat,
    pub invoices_path: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("BIND_ADDR", &bind_raw, e.to_string()))?;

        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            None => DEFAULT_MAX_CONNECTIONS,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::invalid(
                        "DATABASE_MAX_CONNECTIONS",
                        &raw,
                        "expected a positive integer",
                    ));
                }
            },
        };

        let log_format = match get("LOG_FORMAT") {
            None => LogFormat::default(),
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" | "text" => LogFormat::Pretty,
                _ => {
                    return Err(ConfigError::invalid(
                        "LOG_FORMAT",
                        &raw,
                        "expected one of: json, pretty",
                    ));
                }
            },
        };

        let invoices_path = get("INVOICES_PATH").unwrap_or_else(|| INVOICES_PATH.to_string());
        if !invoices_path.starts_with('/') {
            return Err(ConfigError::invalid(
                "INVOICES_PATH",
                &invoices_path,
                "must start with '/'",
            ));
        }

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL"),
            max_connections,
            log_format,
            invoices_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.max_connections, 5);
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.invoices_path, "/dashboard/invoices");
    }

    #[test]
    fn reads_every_variable() {
        let cfg = load(&[
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("DATABASE_URL", "postgres://localhost/dash"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("LOG_FORMAT", "Pretty"),
            ("INVOICES_PATH", "/invoices"),
        ])
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 3000);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/dash"));
        assert_eq!(cfg.max_connections, 12);
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert_eq!(cfg.invoices_path, "/invoices");
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        assert_eq!(load(&[("DATABASE_URL", "  ")]).unwrap().database_url, None);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            load(&[("BIND_ADDR", "not-an-addr")]),
            Err(ConfigError::Invalid { var: "BIND_ADDR", .. })
        ));
        assert!(load(&[("DATABASE_MAX_CONNECTIONS", "0")]).is_err());
        assert!(load(&[("LOG_FORMAT", "xml")]).is_err());
        assert!(load(&[("INVOICES_PATH", "dashboard")]).is_err());
    }
}
