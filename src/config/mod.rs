use std::env;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    /// Connection string; always present when `backend` is `Postgres`.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Clone)]
pub struct SecurityConfig {
    pub token_secret: String,
    pub token_ttl_secs: i64,
    /// Empty means any origin is allowed.
    pub cors_origins: Vec<String>,
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("token_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("cors_origins", &self.cors_origins)
            .finish()
    }
}

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match get("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let (max_connections, connection_timeout) = match environment {
            Environment::Development => (5, 30),
            Environment::Staging => (10, 10),
            Environment::Production => (20, 5),
        };

        let server = ServerConfig {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(get("PORT"), "PORT", DEFAULT_PORT)?,
        };

        let backend = match get("STORAGE_BACKEND").as_deref() {
            None | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "STORAGE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let url = match backend {
            StorageBackend::Memory => None,
            StorageBackend::Postgres => Some(match get("DATABASE_URL") {
                Some(url) => url,
                None => compose_database_url(&get)?,
            }),
        };

        let database = DatabaseConfig {
            backend,
            url,
            max_connections: parse_or(get("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", max_connections)?,
            connection_timeout: parse_or(get("DATABASE_CONNECTION_TIMEOUT"), "DATABASE_CONNECTION_TIMEOUT", connection_timeout)?,
        };

        let security = SecurityConfig::from_lookup(&lookup)?;

        Ok(Self {
            environment,
            server,
            database,
            security,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl SecurityConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token_ttl_secs = parse_or(get("TOKEN_TTL_SECS"), "TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        if token_ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_SECS",
                value: token_ttl_secs.to_string(),
            });
        }

        Ok(Self {
            token_secret: get("ACCESS_TOKEN_SECRET").ok_or(ConfigError::Missing("ACCESS_TOKEN_SECRET"))?,
            token_ttl_secs,
            cors_origins: get("SECURITY_CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}

/// Assemble a postgres URL from the individual DB_* credentials.
fn compose_database_url<F>(get: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let user = get("DB_USER").ok_or(ConfigError::Missing("DATABASE_URL or DB_USER"))?;
    let password = get("DB_PASSWORD").ok_or(ConfigError::Missing("DB_PASSWORD"))?;
    let host = get("DB_HOST").unwrap_or_else(|| "localhost".to_string());
    let port: u16 = parse_or(get("DB_PORT"), "DB_PORT", 5432)?;
    let name = get("DB_NAME").unwrap_or_else(|| "hungry_db".to_string());

    let mut url = url::Url::parse(&format!("postgres://{}:{}", host, port)).map_err(|_| {
        ConfigError::Invalid {
            key: "DB_HOST",
            value: host.clone(),
        }
    })?;
    // set_username/set_password percent-encode reserved characters for us
    let invalid = || ConfigError::Invalid {
        key: "DB_USER",
        value: user.clone(),
    };
    url.set_username(&user).map_err(|_| invalid())?;
    url.set_password(Some(&password)).map_err(|_| invalid())?;
    url.set_path(&format!("/{}", name));
    Ok(url.into())
}
