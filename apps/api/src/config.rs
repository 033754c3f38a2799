//! API server configuration.
//!
//! ## Sources (later wins)
//! ```text
//! built-in defaults  →  ./stockmaster.toml (optional)  →  STOCKMASTER_* env vars
//! ```
//!
//! Example: `STOCKMASTER_PORT=8080 STOCKMASTER_STATUS_POLICY=strict`.

use config::{Config, Environment, File};
use serde::Deserialize;
use stockmaster_core::StatusPolicy;

const ENV_PREFIX: &str = "STOCKMASTER";
const CONFIG_FILE: &str = "stockmaster";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE_PATH: &str = "stockmaster.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEV_JWT_SECRET: &str = "stockmaster-dev-secret-change-in-production";
const DEFAULT_JWT_LIFETIME_SECS: i64 = 7 * 24 * 60 * 60;
const DEFAULT_OTP_LIFETIME_SECS: i64 = 10 * 60;
const DEFAULT_LOG_FILTER: &str = "stockmaster_api=info,stockmaster_db=info,tower_http=info";

/// Where the server is running. Controls whether OTP codes are echoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunEnvironment {
    #[default]
    Development,
    Production,
}

/// API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Bind address
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Pool size
    pub max_connections: u32,

    /// HS256 signing secret
    pub jwt_secret: String,

    /// Token lifetime in seconds (default: 7 days)
    pub jwt_lifetime_secs: i64,

    /// Password-reset code lifetime in seconds (default: 10 minutes)
    pub otp_lifetime_secs: i64,

    pub environment: RunEnvironment,

    /// How operation status changes are checked
    pub status_policy: StatusPolicy,

    /// `EnvFilter` directive used when RUST_LOG is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_lifetime_secs: DEFAULT_JWT_LIFETIME_SECS,
            otp_lifetime_secs: DEFAULT_OTP_LIFETIME_SECS,
            environment: RunEnvironment::Development,
            status_policy: StatusPolicy::Permissive,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from defaults, `stockmaster.toml` and the
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(env: Environment) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", DEFAULT_PORT as i64)?
            .set_default("database_path", DEFAULT_DATABASE_PATH)?
            .set_default("max_connections", DEFAULT_MAX_CONNECTIONS as i64)?
            .set_default("jwt_secret", DEV_JWT_SECRET)?
            .set_default("jwt_lifetime_secs", DEFAULT_JWT_LIFETIME_SECS)?
            .set_default("otp_lifetime_secs", DEFAULT_OTP_LIFETIME_SECS)?
            .set_default("environment", "development")?
            .set_default("status_policy", "permissive")?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(env)
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid("max_connections must be at least 1".into()));
        }
        if self.jwt_lifetime_secs <= 0 || self.otp_lifetime_secs <= 0 {
            return Err(ConfigError::Invalid("lifetimes must be positive".into()));
        }
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("jwt_secret must not be empty".into()));
        }
        if self.is_production() && self.jwt_secret == DEV_JWT_SECRET {
            return Err(ConfigError::Invalid(
                "jwt_secret must be set in production (STOCKMASTER_JWT_SECRET)".into(),
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == RunEnvironment::Production
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::load_from(env(&[])).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.jwt_lifetime_secs, 604_800);
        assert_eq!(config.otp_lifetime_secs, 600);
        assert_eq!(config.environment, RunEnvironment::Development);
        assert_eq!(config.status_policy, StatusPolicy::Permissive);
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::load_from(env(&[
            ("STOCKMASTER_PORT", "8080"),
            ("STOCKMASTER_STATUS_POLICY", "strict"),
            ("STOCKMASTER_DATABASE_PATH", "/tmp/sm.db"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.status_policy, StatusPolicy::Strict);
        assert_eq!(config.database_path, "/tmp/sm.db");
    }

    #[test]
    fn test_production_requires_secret() {
        let err = AppConfig::load_from(env(&[("STOCKMASTER_ENVIRONMENT", "production")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let config = AppConfig::load_from(env(&[
            ("STOCKMASTER_ENVIRONMENT", "production"),
            ("STOCKMASTER_JWT_SECRET", "a-real-secret"),
        ]))
        .unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let err = AppConfig::load_from(env(&[("STOCKMASTER_STATUS_POLICY", "lenient")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
