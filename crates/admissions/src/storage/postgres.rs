use super::{
    candidate_query, BackupOutcome, SqlValue, StorageBackend, StorageError, APPLICATION_QUERY,
    DEPARTMENT_QUERY,
};
use crate::config::PostgresCredentials;
use crate::domain::{Application, Candidate, Department, FlatRecord};
use crate::schema::{self, validate_identifier, Dialect};
use crate::workflows::report::{department_summary_query, DepartmentSummary};
use crate::workflows::search::{SearchHit, SearchQuery};
use postgres::types::ToSql;
use postgres::{Client, NoTls, Row};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info, warn};

/// Client/server engine reached over the driver's own protocol.
pub struct PostgresBackend {
    client: Client,
    credentials: PostgresCredentials,
}

impl PostgresBackend {
    pub fn connect(credentials: PostgresCredentials) -> Result<Self, StorageError> {
        let client = postgres::Config::new()
            .host(&credentials.host)
            .port(credentials.port)
            .user(&credentials.user)
            .password(&credentials.password)
            .dbname(&credentials.database)
            .connect(NoTls)?;
        info!(
            host = %credentials.host,
            database = %credentials.database,
            "connected to postgres"
        );
        Ok(Self {
            client,
            credentials,
        })
    }

    /// `pg_dump` invocation for a custom-format archive including large objects.
    pub(crate) fn dump_command(credentials: &PostgresCredentials, target: &Path) -> Command {
        let mut command = Command::new("pg_dump");
        command
            .arg("-h")
            .arg(&credentials.host)
            .arg("-p")
            .arg(credentials.port.to_string())
            .arg("-U")
            .arg(&credentials.user)
            .args(["-F", "c", "-b", "-f"])
            .arg(target)
            .arg(&credentials.database)
            .env("PGPASSWORD", &credentials.password);
        command
    }
}

impl StorageBackend for PostgresBackend {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn execute_in_transaction(&mut self, statements: &[String]) -> Result<(), StorageError> {
        let mut tx = self.client.transaction()?;
        for statement in statements {
            debug!(sql = %statement, "executing");
            tx.batch_execute(statement)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn bulk_load(&mut self, table: &str, rows: &[FlatRecord]) -> Result<usize, StorageError> {
        let table = validate_identifier(table)?;
        let mut tx = self.client.transaction()?;
        tx.batch_execute(&Dialect::Postgres.drop_table(&table))?;
        tx.batch_execute(&schema::create_flat_table(Dialect::Postgres, &table))?;
        let insert = tx.prepare(&schema::insert_flat_row(Dialect::Postgres, &table))?;
        for row in rows {
            let submitted_on = row.submitted_on.format("%Y-%m-%d").to_string();
            tx.execute(
                &insert,
                &[
                    &row.pesel,
                    &row.first_name,
                    &row.last_name,
                    &row.postal_code,
                    &row.phone,
                    &submitted_on,
                    &row.exam_average,
                    &row.status,
                    &row.department_id,
                    &row.department_name,
                ],
            )?;
        }
        tx.commit()?;
        info!(table = %table, rows = rows.len(), "loaded flat table");
        Ok(rows.len())
    }

    fn bulk_export(&mut self, table: &str) -> Result<Vec<FlatRecord>, StorageError> {
        let table = validate_identifier(table)?;
        let rows = self
            .client
            .query(&schema::select_flat_rows(Dialect::Postgres, &table), &[])?;
        rows.iter().map(flat_record).collect()
    }

    fn table_names(&mut self) -> Result<Vec<String>, StorageError> {
        let rows = self.client.query(
            "SELECT tablename FROM pg_catalog.pg_tables \
             WHERE schemaname = current_schema() ORDER BY tablename",
            &[],
        )?;
        rows.iter()
            .map(|row| row.try_get::<_, String>(0).map_err(StorageError::from))
            .collect()
    }

    fn candidates(&mut self) -> Result<Vec<Candidate>, StorageError> {
        let rows = self
            .client
            .query(&candidate_query(Dialect::Postgres), &[])?;
        rows.iter()
            .map(|row| -> Result<Candidate, StorageError> {
                Ok(Candidate {
                    pesel: row.try_get(0)?,
                    first_name: row.try_get(1)?,
                    last_name: row.try_get(2)?,
                    postal_code: row.try_get(3)?,
                    phone: row.try_get(4)?,
                    exam_average: row.try_get(5)?,
                })
            })
            .collect()
    }

    fn departments(&mut self) -> Result<Vec<Department>, StorageError> {
        let rows = self.client.query(DEPARTMENT_QUERY, &[])?;
        rows.iter()
            .map(|row| -> Result<Department, StorageError> {
                Ok(Department {
                    id: row.try_get(0)?,
                    name: row.try_get(1)?,
                })
            })
            .collect()
    }

    fn applications(&mut self) -> Result<Vec<Application>, StorageError> {
        let rows = self.client.query(APPLICATION_QUERY, &[])?;
        rows.iter()
            .map(|row| -> Result<Application, StorageError> {
                Ok(Application {
                    pesel: row.try_get(0)?,
                    department_id: row.try_get(1)?,
                    submitted_on: row.try_get(2)?,
                    status: row.try_get(3)?,
                })
            })
            .collect()
    }

    fn department_summary(&mut self) -> Result<Vec<DepartmentSummary>, StorageError> {
        let rows = self
            .client
            .query(&department_summary_query(Dialect::Postgres), &[])?;
        rows.iter()
            .map(|row| -> Result<DepartmentSummary, StorageError> {
                Ok(DepartmentSummary {
                    department_name: row.try_get(0)?,
                    candidate_count: row.try_get(1)?,
                    average_score: row.try_get(2)?,
                })
            })
            .collect()
    }

    fn search(&mut self, query: &SearchQuery) -> Result<Vec<SearchHit>, StorageError> {
        debug!(sql = %query.sql, params = query.params.len(), "searching");
        let params: Vec<&(dyn ToSql + Sync)> = query
            .params
            .iter()
            .map(|param| match param {
                SqlValue::Text(text) => text as &(dyn ToSql + Sync),
                SqlValue::Real(real) => real as &(dyn ToSql + Sync),
            })
            .collect();
        let rows = self.client.query(&query.sql, &params)?;
        rows.iter()
            .map(|row| -> Result<SearchHit, StorageError> {
                Ok(SearchHit {
                    pesel: row.try_get(0)?,
                    first_name: row.try_get(1)?,
                    last_name: row.try_get(2)?,
                    exam_average: row.try_get(3)?,
                    department_name: row.try_get(4)?,
                    status: row.try_get(5)?,
                })
            })
            .collect()
    }

    fn backup(&mut self, target: &Path) -> Result<BackupOutcome, StorageError> {
        info!(target = %target.display(), "running pg_dump");
        let status = Self::dump_command(&self.credentials, target).status()?;
        if status.success() {
            info!(target = %target.display(), "backup written");
            Ok(BackupOutcome::Completed {
                path: target.to_path_buf(),
            })
        } else {
            warn!(code = ?status.code(), "pg_dump exited with failure");
            Ok(BackupOutcome::Failed {
                exit_code: status.code(),
            })
        }
    }
}

fn flat_record(row: &Row) -> Result<FlatRecord, StorageError> {
    let submitted_on: String = row.try_get(5)?;
    Ok(FlatRecord {
        pesel: row.try_get(0)?,
        first_name: row.try_get(1)?,
        last_name: row.try_get(2)?,
        postal_code: row.try_get(3)?,
        phone: row.try_get(4)?,
        submitted_on: chrono::NaiveDate::parse_from_str(&submitted_on, "%Y-%m-%d")
            .map_err(|_| StorageError::MalformedDate(submitted_on.clone()))?,
        exam_average: row.try_get(6)?,
        status: row.try_get(7)?,
        department_id: row.try_get(8)?,
        department_name: row.try_get(9)?,
    })
}
