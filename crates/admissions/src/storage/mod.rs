//! One storage contract, two engines.

mod postgres;
mod sqlite;

pub use self::postgres::PostgresBackend;
pub use self::sqlite::SqliteBackend;

use crate::config::{AppConfig, BackendKind};
use crate::domain::{Application, Candidate, Department, FlatRecord};
use crate::error::AppError;
use crate::schema::{Dialect, InvalidIdentifier};
use crate::workflows::report::DepartmentSummary;
use crate::workflows::search::{SearchHit, SearchQuery};
use std::path::{Path, PathBuf};

/// Operations every engine offers. Statement text comes from `schema` and
/// `workflows`; implementations only bind, execute and map rows.
pub trait StorageBackend {
    fn dialect(&self) -> Dialect;

    /// Runs `statements` in order inside one transaction. Nothing is kept
    /// unless every statement succeeds.
    fn execute_in_transaction(&mut self, statements: &[String]) -> Result<(), StorageError>;

    /// Runs `DROP TABLE` statements in one transaction. Rows of tables that
    /// stay behind are never touched by referential actions.
    fn drop_tables(&mut self, drops: &[String]) -> Result<(), StorageError> {
        self.execute_in_transaction(drops)
    }

    /// Replaces `table` with `rows` in one transaction. Returns rows written.
    fn bulk_load(&mut self, table: &str, rows: &[FlatRecord]) -> Result<usize, StorageError>;

    fn bulk_export(&mut self, table: &str) -> Result<Vec<FlatRecord>, StorageError>;

    /// User tables currently present, sorted by name.
    fn table_names(&mut self) -> Result<Vec<String>, StorageError>;

    fn candidates(&mut self) -> Result<Vec<Candidate>, StorageError>;
    fn departments(&mut self) -> Result<Vec<Department>, StorageError>;
    fn applications(&mut self) -> Result<Vec<Application>, StorageError>;

    fn department_summary(&mut self) -> Result<Vec<DepartmentSummary>, StorageError>;
    fn search(&mut self, query: &SearchQuery) -> Result<Vec<SearchHit>, StorageError>;

    fn backup(&mut self, target: &Path) -> Result<BackupOutcome, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("postgres: {0}")]
    Postgres(#[from] ::postgres::Error),
    #[error(transparent)]
    Identifier(#[from] InvalidIdentifier),
    #[error("stored date '{0}' is not YYYY-MM-DD")]
    MalformedDate(String),
    #[error("an in-memory database has no file to back up")]
    InMemoryBackup,
    #[error("backup i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Bind value for parameterized statements.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Real(f64),
}

/// Result of a backup attempt. A failing dump tool is a status, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Completed { path: PathBuf },
    Failed { exit_code: Option<i32> },
}

impl BackupOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Opens the backend selected by `config`.
pub fn open(config: &AppConfig) -> Result<Box<dyn StorageBackend>, AppError> {
    match config.backend {
        BackendKind::Sqlite => Ok(Box::new(SqliteBackend::open(&config.sqlite.path)?)),
        BackendKind::Postgres => {
            let credentials = config.postgres.credentials()?;
            Ok(Box::new(PostgresBackend::connect(credentials)?))
        }
    }
}

pub(crate) fn candidate_query(dialect: Dialect) -> String {
    format!(
        "SELECT pesel, imie, nazwisko, kodpocztowy, telefon, {} FROM kandydat ORDER BY pesel",
        dialect.as_real("sredniamaturalna")
    )
}

pub(crate) const DEPARTMENT_QUERY: &str =
    "SELECT idwydzialu, nazwawydzialu FROM wydzial ORDER BY idwydzialu, nazwawydzialu";

pub(crate) const APPLICATION_QUERY: &str =
    "SELECT pesel, idwydzialu, datarekrutacji, statusaplikacji FROM aplikacja ORDER BY pesel";
