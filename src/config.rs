use std::str::FromStr;

use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("unsupported database dialect {0:?}, only postgres is available")]
    UnsupportedDialect(String),

    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
}

impl FromStr for Dialect {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            other => Err(ConfigError::UnsupportedDialect(other.to_string())),
        }
    }
}

/// Connection settings for the users database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection URL. Takes precedence over the discrete fields.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub name: String,
    pub dialect: Dialect,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return Ok(PgConnectOptions::from_str(url)?);
        }
        let mut opts = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.name);
        if let Some(password) = &self.password {
            opts = opts.password(password);
        }
        Ok(opts)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    /// Backend origin the UI pages call through `UsersClient`.
    pub api_base_url: String,
    pub cors_origin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values behave like unset ones.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = DatabaseConfig {
            url: get("DATABASE_URL"),
            host: get("DB_HOST").unwrap_or_else(|| "localhost".into()),
            port: parse_or("DB_PORT", get("DB_PORT"), 5432)?,
            user: get("DB_USER").unwrap_or_else(|| "postgres".into()),
            password: get("DB_PASSWORD"),
            name: get("DB_NAME").unwrap_or_else(|| "crud_database".into()),
            dialect: match get("DB_DIALECT") {
                Some(v) => v.parse()?,
                None => Dialect::Postgres,
            },
            max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), 10)?,
        };

        let server = ServerConfig {
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or("APP_PORT", get("APP_PORT"), 3001)?,
        };

        let api_base_url = get("API_BASE_URL")
            .unwrap_or_else(|| format!("http://127.0.0.1:{}", server.port))
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            database,
            server,
            api_base_url,
            cors_origin: get("CORS_ORIGIN"),
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
