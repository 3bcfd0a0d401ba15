//! Environment-sourced configuration
//!
//! Values come from the process environment (optionally seeded from a `.env`
//! file). Every key except `APP_ENV` has a default; malformed numbers fall
//! back to their default rather than failing startup.

use std::collections::HashMap;
use std::net::{SocketAddr, ToSocketAddrs};

use thiserror::Error;

/// Keys that must be present and non-empty for the process to start.
pub const REQUIRED_KEYS: &[&str] = &["APP_ENV"];

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_CRON_INTERVAL_MINUTES: u64 = 30;
/// One week. Longer intervals fall back to the default.
pub const MAX_CRON_INTERVAL_MINUTES: u64 = 7 * 24 * 60;
pub const DEFAULT_SLOW_THRESHOLD_MS: u64 = 1000;
pub const DEFAULT_CONTEXT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .keys.join(", "))]
    Missing { keys: Vec<String> },

    #[error("Failed to read .env file: {0}")]
    EnvFile(#[source] dotenvy::Error),

    #[error("Failed to read configuration source: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Cannot resolve listen address {host}:{port}: {reason}")]
    Address {
        host: String,
        port: u16,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub logging: LoggingConfig,
    pub cron: CronConfig,
    pub context: ContextConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub name: String,
    pub environment: String,
    /// Reported by `/health`. Defaults to the crate version.
    pub version: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    pub service_name: String,
}

#[derive(Debug, Clone)]
pub struct CronConfig {
    /// Only the exact string `"true"` enables the trigger.
    pub enabled: bool,
    pub interval_minutes: u64,
    pub slow_threshold_ms: u64,
}

#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Informational only; reported at startup.
    pub timeout_ms: u64,
}

impl Config {
    /// Load from `.env` (if present) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        check_env_file(dotenvy::dotenv().map(|_| ()))?;
        Self::from_source(config::Environment::default())
    }

    /// Load from an explicit key/value map instead of the process environment.
    pub fn from_env_map(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_source(config::Environment::default().source(Some(vars.into_iter().collect())))
    }

    fn from_source(source: config::Environment) -> Result<Self, ConfigError> {
        let settings = config::Config::builder().add_source(source).build()?;
        let raw = RawEnv { settings };

        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| raw.get(key).is_none())
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing { keys: missing });
        }

        let environment = raw.get("APP_ENV").unwrap_or_default();
        let name = env!("CARGO_PKG_NAME").to_string();

        Ok(Self {
            app: AppConfig {
                name: name.clone(),
                environment,
                version: raw
                    .get("APP_VERSION")
                    .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
                host: raw.get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: raw.parse("PORT").unwrap_or(DEFAULT_PORT),
            },
            logging: LoggingConfig {
                level: raw
                    .get("LOG_LEVEL")
                    .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
                json: raw
                    .get("LOG_FORMAT")
                    .is_some_and(|f| f.eq_ignore_ascii_case("json")),
                service_name: name,
            },
            cron: CronConfig {
                enabled: raw.get_exact("CRON_ENABLED").as_deref() == Some("true"),
                interval_minutes: raw
                    .parse::<u64>("CRON_INTERVAL")
                    .filter(|m| (1..=MAX_CRON_INTERVAL_MINUTES).contains(m))
                    .unwrap_or(DEFAULT_CRON_INTERVAL_MINUTES),
                slow_threshold_ms: raw
                    .parse("CRON_SLOW_THRESHOLD_MS")
                    .unwrap_or(DEFAULT_SLOW_THRESHOLD_MS),
            },
            context: ContextConfig {
                timeout_ms: raw
                    .parse("CONTEXT_TIMEOUT")
                    .unwrap_or(DEFAULT_CONTEXT_TIMEOUT_MS),
            },
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.app.host.as_str();
        let port = self.app.port;
        let address_error = |reason: String| ConfigError::Address {
            host: host.to_string(),
            port,
            reason,
        };

        (host, port)
            .to_socket_addrs()
            .map_err(|e| address_error(e.to_string()))?
            .next()
            .ok_or_else(|| address_error("no addresses found".to_string()))
    }
}

/// A missing `.env` is fine; one that exists but cannot be read or parsed is not.
fn check_env_file(result: Result<(), dotenvy::Error>) -> Result<(), ConfigError> {
    match result {
        Err(e) if !e.not_found() => Err(ConfigError::EnvFile(e)),
        _ => Ok(()),
    }
}

/// Case-insensitive view over the environment source.
///
/// The `config` crate lowercases environment keys, so lookups go through here.
struct RawEnv {
    settings: config::Config,
}

impl RawEnv {
    /// Trimmed value for `key`; blank counts as unset.
    fn get(&self, key: &str) -> Option<String> {
        self.settings
            .get_string(&key.to_ascii_lowercase())
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Untrimmed value for `key`.
    fn get_exact(&self, key: &str) -> Option<String> {
        self.settings.get_string(&key.to_ascii_lowercase()).ok()
    }

    fn parse<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        Config::from_env_map(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let config = load(&[("APP_ENV", "test")]).unwrap();
        assert_eq!(config.app.environment, "test");
        assert_eq!(config.app.port, 3000);
        assert_eq!(config.app.host, "localhost");
        assert_eq!(config.app.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert!(!config.cron.enabled);
        assert_eq!(config.cron.interval_minutes, 30);
        assert_eq!(config.cron.slow_threshold_ms, 1000);
        assert_eq!(config.context.timeout_ms, 30_000);
    }

    #[test]
    fn missing_app_env_is_reported_by_name() {
        let err = load(&[("PORT", "8080")]).unwrap_err();
        assert!(matches!(&err, ConfigError::Missing { keys } if keys == &["APP_ENV"]));
        assert!(err.to_string().contains("APP_ENV"));
    }

    #[test]
    fn blank_app_env_counts_as_missing() {
        assert!(matches!(
            load(&[("APP_ENV", "   ")]),
            Err(ConfigError::Missing { .. })
        ));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = load(&[
            ("APP_ENV", "production"),
            ("PORT", "8080"),
            ("HOST", "0.0.0.0"),
            ("LOG_LEVEL", "debug"),
            ("LOG_FORMAT", "json"),
            ("CRON_ENABLED", "true"),
            ("CRON_INTERVAL", "5"),
            ("CONTEXT_TIMEOUT", "1500"),
            ("APP_VERSION", "2.3.4"),
        ])
        .unwrap();

        assert_eq!(config.app.port, 8080);
        assert_eq!(config.app.host, "0.0.0.0");
        assert_eq!(config.app.version, "2.3.4");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert!(config.cron.enabled);
        assert_eq!(config.cron.interval_minutes, 5);
        assert_eq!(config.context.timeout_ms, 1500);
    }

    #[test]
    fn malformed_numbers_fall_back_to_defaults() {
        let config = load(&[
            ("APP_ENV", "test"),
            ("PORT", "not-a-port"),
            ("CRON_INTERVAL", "abc"),
            ("CONTEXT_TIMEOUT", ""),
        ])
        .unwrap();
        assert_eq!(config.app.port, 3000);
        assert_eq!(config.cron.interval_minutes, 30);
        assert_eq!(config.context.timeout_ms, 30_000);
    }

    #[test]
    fn oversized_cron_interval_falls_back_to_default() {
        for value in ["307445734561825861", "300000000000000000", "10081", "0"] {
            let config = load(&[("APP_ENV", "test"), ("CRON_INTERVAL", value)]).unwrap();
            assert_eq!(config.cron.interval_minutes, 30, "CRON_INTERVAL={value}");
        }

        let config = load(&[("APP_ENV", "test"), ("CRON_INTERVAL", "10080")]).unwrap();
        assert_eq!(config.cron.interval_minutes, MAX_CRON_INTERVAL_MINUTES);
    }

    #[test]
    fn cron_enabled_requires_exact_lowercase_true() {
        for value in ["TRUE", "True", "1", "yes", "false", "", " true"] {
            let config = load(&[("APP_ENV", "test"), ("CRON_ENABLED", value)]).unwrap();
            assert!(!config.cron.enabled, "{value:?} must not enable cron");
        }
    }

    #[test]
    fn blank_log_level_uses_default() {
        let config = load(&[("APP_ENV", "test"), ("LOG_LEVEL", " ")]).unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn missing_env_file_is_ignored() {
        let not_found = std::io::Error::new(std::io::ErrorKind::NotFound, "no .env");
        assert!(check_env_file(Err(dotenvy::Error::Io(not_found))).is_ok());
        assert!(check_env_file(Ok(())).is_ok());
    }

    #[test]
    fn malformed_env_file_stops_startup() {
        let err = check_env_file(Err(dotenvy::Error::LineParse("PORT 3000".into(), 4)))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile(_)));
        assert!(err.to_string().starts_with("Failed to read .env file"));
    }

    #[test]
    fn socket_addr_uses_host_and_port() {
        let config = load(&[("APP_ENV", "test"), ("HOST", "127.0.0.1"), ("PORT", "4000")]).unwrap();
        assert_eq!(config.socket_addr().unwrap(), "127.0.0.1:4000".parse().unwrap());
    }
}
