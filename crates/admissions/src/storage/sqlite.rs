use super::{
    candidate_query, BackupOutcome, SqlValue, StorageBackend, StorageError, APPLICATION_QUERY,
    DEPARTMENT_QUERY,
};
use crate::domain::{Application, Candidate, Department, FlatRecord};
use crate::schema::{self, validate_identifier, Dialect};
use crate::workflows::report::{department_summary_query, DepartmentSummary};
use crate::workflows::search::{SearchHit, SearchQuery};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Embedded engine backed by a database file (or memory, for tests).
pub struct SqliteBackend {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteBackend {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::prepare(conn, Some(path.to_path_buf()))
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::prepare(Connection::open_in_memory()?, None)
    }

    fn prepare(conn: Connection, path: Option<PathBuf>) -> Result<Self, StorageError> {
        // Referential actions are off per connection unless switched on.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn, path })
    }
}

impl StorageBackend for SqliteBackend {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn execute_in_transaction(&mut self, statements: &[String]) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        for statement in statements {
            debug!(sql = %statement, "executing");
            tx.execute_batch(statement)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn drop_tables(&mut self, drops: &[String]) -> Result<(), StorageError> {
        // A dropped parent would otherwise cascade into, or be blocked by,
        // `aplikacja`. The pragma is ignored inside a transaction.
        self.conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
        let outcome = self.execute_in_transaction(drops);
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        outcome
    }

    fn bulk_load(&mut self, table: &str, rows: &[FlatRecord]) -> Result<usize, StorageError> {
        let table = validate_identifier(table)?;
        let tx = self.conn.transaction()?;
        tx.execute_batch(&Dialect::Sqlite.drop_table(&table))?;
        tx.execute_batch(&schema::create_flat_table(Dialect::Sqlite, &table))?;
        {
            let mut insert = tx.prepare(&schema::insert_flat_row(Dialect::Sqlite, &table))?;
            for row in rows {
                insert.execute(params![
                    row.pesel,
                    row.first_name,
                    row.last_name,
                    row.postal_code,
                    row.phone,
                    row.submitted_on.format("%Y-%m-%d").to_string(),
                    row.exam_average,
                    row.status,
                    row.department_id,
                    row.department_name,
                ])?;
            }
        }
        tx.commit()?;
        info!(table = %table, rows = rows.len(), "loaded flat table");
        Ok(rows.len())
    }

    fn bulk_export(&mut self, table: &str) -> Result<Vec<FlatRecord>, StorageError> {
        let table = validate_identifier(table)?;
        let mut statement = self
            .conn
            .prepare(&schema::select_flat_rows(Dialect::Sqlite, &table))?;
        let rows = statement
            .query_map([], flat_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn table_names(&mut self) -> Result<Vec<String>, StorageError> {
        let mut statement = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = statement
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn candidates(&mut self) -> Result<Vec<Candidate>, StorageError> {
        let mut statement = self.conn.prepare(&candidate_query(Dialect::Sqlite))?;
        let rows = statement
            .query_map([], |row| {
                Ok(Candidate {
                    pesel: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                    postal_code: row.get(3)?,
                    phone: row.get(4)?,
                    exam_average: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn departments(&mut self) -> Result<Vec<Department>, StorageError> {
        let mut statement = self.conn.prepare(DEPARTMENT_QUERY)?;
        let rows = statement
            .query_map([], |row| {
                Ok(Department {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn applications(&mut self) -> Result<Vec<Application>, StorageError> {
        let mut statement = self.conn.prepare(APPLICATION_QUERY)?;
        let rows = statement
            .query_map([], |row| {
                Ok(Application {
                    pesel: row.get(0)?,
                    department_id: row.get(1)?,
                    submitted_on: row.get(2)?,
                    status: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn department_summary(&mut self) -> Result<Vec<DepartmentSummary>, StorageError> {
        let mut statement = self
            .conn
            .prepare(&department_summary_query(Dialect::Sqlite))?;
        let rows = statement
            .query_map([], |row| {
                Ok(DepartmentSummary {
                    department_name: row.get(0)?,
                    candidate_count: row.get(1)?,
                    average_score: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn search(&mut self, query: &SearchQuery) -> Result<Vec<SearchHit>, StorageError> {
        debug!(sql = %query.sql, params = query.params.len(), "searching");
        let mut statement = self.conn.prepare(&query.sql)?;
        let params = query.params.iter().map(|param| match param {
            SqlValue::Text(text) => Value::Text(text.clone()),
            SqlValue::Real(real) => Value::Real(*real),
        });
        let rows = statement
            .query_map(params_from_iter(params), |row| {
                Ok(SearchHit {
                    pesel: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                    exam_average: row.get(3)?,
                    department_name: row.get(4)?,
                    status: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn backup(&mut self, target: &Path) -> Result<BackupOutcome, StorageError> {
        let source = self.path.as_ref().ok_or(StorageError::InMemoryBackup)?;
        std::fs::copy(source, target)?;
        info!(
            source = %source.display(),
            target = %target.display(),
            "copied database file"
        );
        Ok(BackupOutcome::Completed {
            path: target.to_path_buf(),
        })
    }
}

fn flat_record(row: &Row<'_>) -> rusqlite::Result<FlatRecord> {
    Ok(FlatRecord {
        pesel: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        postal_code: row.get(3)?,
        phone: row.get(4)?,
        submitted_on: row.get(5)?,
        exam_average: row.get(6)?,
        status: row.get(7)?,
        department_id: row.get(8)?,
        department_name: row.get(9)?,
    })
}
