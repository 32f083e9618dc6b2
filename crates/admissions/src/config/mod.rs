use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Selects which storage engine the operations run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Sqlite,
    Postgres,
}

impl BackendKind {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(ConfigError::InvalidBackend(other.to_string())),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
        }
    }
}

/// Top-level configuration, passed explicitly into every operation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendKind,
    pub sqlite: SqliteConfig,
    pub postgres: PostgresConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let backend = match env::var("ADMISSIONS_BACKEND") {
            Ok(value) => BackendKind::parse(&value)?,
            Err(_) => BackendKind::Sqlite,
        };

        let sqlite_path =
            env::var("ADMISSIONS_SQLITE_PATH").unwrap_or_else(|_| "kandydaci.db".to_string());
        let credentials_path = env::var("ADMISSIONS_CREDENTIALS")
            .unwrap_or_else(|_| "database_creds.json".to_string());
        let log_level = env::var("ADMISSIONS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            backend,
            sqlite: SqliteConfig {
                path: PathBuf::from(sqlite_path),
            },
            postgres: PostgresConfig {
                credentials_path: PathBuf::from(credentials_path),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Location of the embedded database file.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    pub path: PathBuf,
}

/// Where the client/server credentials live. The file is read lazily.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub credentials_path: PathBuf,
}

impl PostgresConfig {
    pub fn credentials(&self) -> Result<PostgresCredentials, ConfigError> {
        PostgresCredentials::from_path(&self.credentials_path)
    }
}

/// Contents of the JSON credentials file.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct PostgresCredentials {
    #[serde(rename = "host_name")]
    pub host: String,
    #[serde(rename = "port_number")]
    pub port: u16,
    #[serde(rename = "user_name")]
    pub user: String,
    pub password: String,
    #[serde(rename = "db_name")]
    pub database: String,
}

impl PostgresCredentials {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::CredentialsMissing {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::CredentialsMalformed {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl fmt::Debug for PostgresCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresCredentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBackend(String),
    CredentialsMissing {
        path: PathBuf,
        source: std::io::Error,
    },
    CredentialsMalformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBackend(value) => write!(
                f,
                "ADMISSIONS_BACKEND must be 'sqlite' or 'postgres', got '{}'",
                value
            ),
            ConfigError::CredentialsMissing { path, .. } => {
                write!(f, "cannot read credentials file '{}'", path.display())
            }
            ConfigError::CredentialsMalformed { path, .. } => {
                write!(f, "credentials file '{}' is malformed", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidBackend(_) => None,
            ConfigError::CredentialsMissing { source, .. } => Some(source),
            ConfigError::CredentialsMalformed { source, .. } => Some(source),
        }
    }
}
