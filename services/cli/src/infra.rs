use admissions::config::{AppConfig, BackendKind};
use admissions::domain::ApplicationStatus;
use admissions::error::AppError;
use admissions::storage::{self, StorageBackend};
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

/// Connection flags shared by every subcommand. Each one overrides the
/// matching `ADMISSIONS_*` variable.
#[derive(Args, Debug, Default)]
pub(crate) struct ConnectionArgs {
    /// Storage engine: sqlite or postgres
    #[arg(long, global = true, value_parser = parse_backend)]
    pub(crate) backend: Option<BackendKind>,
    /// Database file used by the sqlite backend
    #[arg(long, global = true)]
    pub(crate) sqlite_path: Option<PathBuf>,
    /// JSON credentials file used by the postgres backend
    #[arg(long, global = true)]
    pub(crate) credentials: Option<PathBuf>,
}

impl ConnectionArgs {
    pub(crate) fn apply(&self, config: &mut AppConfig) {
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(path) = &self.sqlite_path {
            config.sqlite.path = path.clone();
        }
        if let Some(path) = &self.credentials {
            config.postgres.credentials_path = path.clone();
        }
    }
}

pub(crate) fn connect(config: &AppConfig) -> Result<Box<dyn StorageBackend>, AppError> {
    tracing::debug!(backend = config.backend.label(), "opening storage backend");
    storage::open(config)
}

pub(crate) fn parse_backend(raw: &str) -> Result<BackendKind, String> {
    BackendKind::parse(raw).map_err(|err| err.to_string())
}

pub(crate) fn parse_status(raw: &str) -> Result<ApplicationStatus, String> {
    raw.parse::<ApplicationStatus>().map_err(|err| err.to_string())
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use admissions::config::{PostgresConfig, SqliteConfig, TelemetryConfig};

    fn base_config() -> AppConfig {
        AppConfig {
            backend: BackendKind::Sqlite,
            sqlite: SqliteConfig {
                path: PathBuf::from("kandydaci.db"),
            },
            postgres: PostgresConfig {
                credentials_path: PathBuf::from("database_creds.json"),
            },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
        }
    }

    #[test]
    fn flags_override_only_what_they_name() {
        let mut config = base_config();
        ConnectionArgs {
            backend: Some(BackendKind::Postgres),
            sqlite_path: None,
            credentials: Some(PathBuf::from("/etc/admissions/creds.json")),
        }
        .apply(&mut config);

        assert_eq!(config.backend, BackendKind::Postgres);
        assert_eq!(config.sqlite.path, PathBuf::from("kandydaci.db"));
        assert_eq!(
            config.postgres.credentials_path,
            PathBuf::from("/etc/admissions/creds.json")
        );
    }

    #[test]
    fn empty_flags_leave_config_untouched() {
        let mut config = base_config();
        ConnectionArgs::default().apply(&mut config);
        assert_eq!(config.backend, BackendKind::Sqlite);
        assert_eq!(config.sqlite.path, PathBuf::from("kandydaci.db"));
    }

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(
            parse_date(" 2024-02-29 "),
            Ok(NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date"))
        );
        assert!(parse_date("29.02.2024").is_err());
        assert!(parse_backend("PostgreSQL").is_ok());
        assert!(parse_backend("mysql").is_err());
        assert_eq!(parse_status("zaakceptowany"), Ok(ApplicationStatus::Accepted));
        assert!(parse_status("przyjety").is_err());
    }
}
