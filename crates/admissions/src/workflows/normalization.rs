//! Moving data between the flat `kandydaci` table and the normalized
//! `kandydat` / `wydzial` / `aplikacja` tables.

use crate::domain::{Application, Candidate, Department};
use crate::schema::{
    validate_identifier, Dialect, Schema, APPLICATION_TABLE, FLAT_TABLE, NORMALIZED_DROP_ORDER,
};
use crate::storage::{StorageBackend, StorageError};
use tracing::info;

/// Statements that split the flat table into the three normalized tables and
/// drop it afterwards.
pub fn normalize_statements(dialect: Dialect) -> Vec<String> {
    vec![
        Candidate::creates(dialect).to_string(),
        Department::creates(dialect).to_string(),
        Application::creates(dialect).to_string(),
        format!(
            "INSERT INTO {} ({columns}) SELECT DISTINCT {columns} FROM {FLAT_TABLE}",
            Candidate::name(),
            columns = Candidate::columns().join(", "),
        ),
        format!(
            "INSERT INTO {} ({columns}) SELECT DISTINCT {columns} FROM {FLAT_TABLE}",
            Department::name(),
            columns = Department::columns().join(", "),
        ),
        format!(
            "INSERT INTO {} ({}) SELECT pesel, idwydzialu, {}, statusaplikacji FROM {FLAT_TABLE}",
            Application::name(),
            Application::columns().join(", "),
            dialect.parse_date("datarekrutacji"),
        ),
        dialect.drop_table(FLAT_TABLE),
    ]
}

/// Statements that join the normalized tables back into `kandydaci` and drop
/// them afterwards. Column order and types match a freshly loaded flat table.
pub fn denormalize_statements(dialect: Dialect) -> Vec<String> {
    let mut statements = vec![format!(
        "CREATE TABLE {FLAT_TABLE} AS
         SELECT
             k.pesel AS pesel,
             k.imie AS imie,
             k.nazwisko AS nazwisko,
             k.kodpocztowy AS kodpocztowy,
             k.telefon AS telefon,
             {date} AS datarekrutacji,
             {score} AS sredniamaturalna,
             a.statusaplikacji AS statusaplikacji,
             w.idwydzialu AS idwydzialu,
             w.nazwawydzialu AS nazwawydzialu
         FROM kandydat k
         JOIN aplikacja a ON k.pesel = a.pesel
         JOIN wydzial w ON a.idwydzialu = w.idwydzialu",
        date = dialect.format_date("a.datarekrutacji"),
        score = dialect.as_real("k.sredniamaturalna"),
    )];
    statements.extend(
        NORMALIZED_DROP_ORDER
            .iter()
            .map(|table| dialect.drop_table(table)),
    );
    statements
}

/// Converts the flat table into the normalized schema as one transaction.
pub fn normalize(backend: &mut dyn StorageBackend) -> Result<(), StorageError> {
    let statements = normalize_statements(backend.dialect());
    backend.execute_in_transaction(&statements)?;
    info!(dialect = backend.dialect().label(), "normalization finished");
    Ok(())
}

/// Joins the normalized schema back into the flat table as one transaction.
pub fn denormalize(backend: &mut dyn StorageBackend) -> Result<(), StorageError> {
    let statements = denormalize_statements(backend.dialect());
    backend.execute_in_transaction(&statements)?;
    info!(dialect = backend.dialect().label(), "denormalization finished");
    Ok(())
}

/// Drops the named tables, or every user table when `tables` is `None`.
/// Returns the names that were dropped, in drop order.
pub fn clear(
    backend: &mut dyn StorageBackend,
    tables: Option<&[String]>,
) -> Result<Vec<String>, StorageError> {
    let names = match tables {
        Some(tables) => tables
            .iter()
            .map(|table| validate_identifier(table))
            .collect::<Result<Vec<_>, _>>()?,
        None => backend.table_names()?,
    };
    let ordered = drop_order(names);
    let dialect = backend.dialect();
    let statements: Vec<String> = ordered
        .iter()
        .map(|table| dialect.drop_table(table))
        .collect();
    backend.drop_tables(&statements)?;
    for table in &ordered {
        info!(table = %table, "dropped table");
    }
    Ok(ordered)
}

/// Children first so restrictive foreign keys never block a drop.
fn drop_order(mut tables: Vec<String>) -> Vec<String> {
    tables.sort();
    tables.dedup();
    tables.sort_by_key(|table| table != APPLICATION_TABLE);
    tables
}
