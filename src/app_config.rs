// Centralized configuration - load all env vars once at startup

use once_cell::sync::Lazy;
use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Global application configuration loaded once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    // For tests, load .env file first
    #[cfg(test)]
    dotenv::dotenv().ok();

    AppConfig::from_env().expect("Failed to load configuration")
});

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which Storage implementation backs the repository, selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Server
    pub bind_address: String,
    pub port: u16,
    pub environment: Environment,

    // Storage
    pub storage_backend: StorageBackend,
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_min_connections: u32,
    pub database_connect_timeout: u64,
    pub database_idle_timeout: u64,
    pub run_migrations: bool,

    // Security
    pub cors_allowed_origins: Vec<String>,

    // Features
    pub enable_swagger_ui: bool,

    // Session client
    pub api_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from(var_or("ENVIRONMENT", "development"));
        let database_url = var_or("DATABASE_URL", "");

        let storage_backend = match var_or(
            "STORAGE_BACKEND",
            if database_url.is_empty() { "memory" } else { "postgres" },
        )
        .to_lowercase()
        .as_str()
        {
            "memory" | "mem" => StorageBackend::Memory,
            "postgres" | "postgresql" | "pg" => StorageBackend::Postgres,
            other => {
                return Err(ConfigError::InvalidValue(
                    "STORAGE_BACKEND".to_string(),
                    other.to_string(),
                ))
            },
        };

        if storage_backend == StorageBackend::Postgres && database_url.is_empty() {
            return Err(ConfigError::MissingVar("DATABASE_URL".to_string()));
        }

        let port = parse_var("PORT", 5000)?;

        Ok(AppConfig {
            bind_address: var_or("BIND_ADDRESS", "0.0.0.0"),
            port,
            environment,
            storage_backend,
            database_url,
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10)?,
            database_min_connections: parse_var("DATABASE_MIN_CONNECTIONS", 1)?,
            database_connect_timeout: parse_var("DATABASE_CONNECT_TIMEOUT", 30)?,
            database_idle_timeout: parse_var("DATABASE_IDLE_TIMEOUT", 600)?,
            run_migrations: parse_var("RUN_MIGRATIONS", true)?,
            cors_allowed_origins: var_or("CORS_ALLOWED_ORIGINS", "*")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            enable_swagger_ui: parse_var("ENABLE_SWAGGER_UI", true)?,
            api_base_url: var_or("API_BASE_URL", &format!("http://localhost:{}", port)),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string(), value)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parsing() {
        assert_eq!(Environment::from("prod".to_string()), Environment::Production);
        assert_eq!(Environment::from("TEST".to_string()), Environment::Test);
        assert_eq!(Environment::from("anything".to_string()), Environment::Development);
    }

    #[test]
    fn defaults_do_not_require_env() {
        // With no DATABASE_URL the backend falls back to memory, so loading
        // must succeed in a bare environment.
        let config = AppConfig::from_env().expect("default config should load");
        if config.database_url.is_empty() {
            assert_eq!(config.storage_backend, StorageBackend::Memory);
        }
    }
}
