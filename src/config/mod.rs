use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Errors raised while loading configuration from the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub token_expiry_hours: i64,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// DATABASE_URL and JWT_SECRET are required and have no fallback values;
    /// startup fails loudly rather than running against baked-in credentials.
    /// Everything else has a non-secret default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("PORT", 3000)?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10)?,
                acquire_timeout_secs: parse_var("DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?,
            },
            security: SecurityConfig {
                jwt_secret: env::var("JWT_SECRET")
                    .map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?,
                token_expiry_hours: parse_var("TOKEN_EXPIRY_HOURS", 24)?,
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidVar { var, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state, so they share one lock
    use std::sync::Mutex;
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for var in [
            "HOST",
            "PORT",
            "DATABASE_URL",
            "DATABASE_MAX_CONNECTIONS",
            "DATABASE_ACQUIRE_TIMEOUT_SECS",
            "JWT_SECRET",
            "TOKEN_EXPIRY_HOURS",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn requires_database_url_and_jwt_secret() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::MissingVar("DATABASE_URL"))
        ));

        env::set_var("DATABASE_URL", "postgres://localhost/agenda");
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::MissingVar("JWT_SECRET"))
        ));
        clear_env();
    }

    #[test]
    fn applies_defaults_and_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        env::set_var("DATABASE_URL", "postgres://localhost/agenda");
        env::set_var("JWT_SECRET", "test-secret");
        env::set_var("PORT", "8080");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.security.token_expiry_hours, 24);
        clear_env();
    }

    #[test]
    fn rejects_unparseable_numbers() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        env::set_var("DATABASE_URL", "postgres://localhost/agenda");
        env::set_var("JWT_SECRET", "test-secret");
        env::set_var("PORT", "not-a-port");

        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::InvalidVar { var: "PORT", .. })
        ));
        clear_env();
    }
}
