//! Table metadata and DDL for the flat and normalized layouts.
//!
//! Every statement exists in two flavors because the client/server engine has
//! fixed-length text, `NUMERIC`, `SERIAL` and a native `DATE`, while the
//! embedded engine only knows its storage classes.

use crate::domain::{Application, Candidate, Department};

mod identifier;

pub use identifier::{validate_identifier, InvalidIdentifier};

/// SQL flavor of a storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Positional bind marker for the 1-based parameter `index`.
    pub fn placeholder(self, index: usize) -> String {
        match self {
            Self::Postgres => format!("${index}"),
            Self::Sqlite => format!("?{index}"),
        }
    }

    /// Wraps `expr` so it reads back as a double regardless of column type.
    pub fn as_real(self, expr: &str) -> String {
        match self {
            Self::Postgres => format!("{expr}::DOUBLE PRECISION"),
            Self::Sqlite => format!("CAST({expr} AS REAL)"),
        }
    }

    /// Turns `YYYY-MM-DD` text into the engine's date representation.
    pub fn parse_date(self, expr: &str) -> String {
        match self {
            Self::Postgres => format!("TO_DATE({expr}::TEXT, 'YYYY-MM-DD')"),
            Self::Sqlite => format!("date({expr})"),
        }
    }

    /// Renders a date column back into `YYYY-MM-DD` text.
    pub fn format_date(self, expr: &str) -> String {
        match self {
            Self::Postgres => format!("TO_CHAR({expr}, 'YYYY-MM-DD')"),
            Self::Sqlite => format!("date({expr})"),
        }
    }

    pub fn drop_table(self, table: &str) -> String {
        match self {
            Self::Postgres => format!("DROP TABLE IF EXISTS {table} CASCADE"),
            Self::Sqlite => format!("DROP TABLE IF EXISTS {table}"),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }
}

/// Static description of one table.
pub trait Schema {
    /// Returns the name of the table in the database.
    fn name() -> &'static str;
    /// Returns the column names in declaration order.
    fn columns() -> &'static [&'static str];
    /// Returns the `CREATE TABLE IF NOT EXISTS` statement for `dialect`.
    fn creates(dialect: Dialect) -> &'static str;
}

pub const FLAT_TABLE: &str = "kandydaci";
pub const CANDIDATE_TABLE: &str = "kandydat";
pub const DEPARTMENT_TABLE: &str = "wydzial";
pub const APPLICATION_TABLE: &str = "aplikacja";

/// Normalized tables, children before parents.
pub const NORMALIZED_DROP_ORDER: [&str; 3] = [APPLICATION_TABLE, CANDIDATE_TABLE, DEPARTMENT_TABLE];

impl Schema for Candidate {
    fn name() -> &'static str {
        CANDIDATE_TABLE
    }

    fn columns() -> &'static [&'static str] {
        &[
            "pesel",
            "imie",
            "nazwisko",
            "kodpocztowy",
            "telefon",
            "sredniamaturalna",
        ]
    }

    fn creates(dialect: Dialect) -> &'static str {
        match dialect {
            Dialect::Postgres => {
                "CREATE TABLE IF NOT EXISTS kandydat (
                    pesel CHAR(11) PRIMARY KEY,
                    imie VARCHAR(100) NOT NULL,
                    nazwisko VARCHAR(100) NOT NULL,
                    kodpocztowy CHAR(6),
                    telefon VARCHAR(20),
                    sredniamaturalna NUMERIC(4, 2)
                )"
            }
            Dialect::Sqlite => {
                "CREATE TABLE IF NOT EXISTS kandydat (
                    pesel TEXT PRIMARY KEY,
                    imie TEXT NOT NULL,
                    nazwisko TEXT NOT NULL,
                    kodpocztowy TEXT,
                    telefon TEXT,
                    sredniamaturalna REAL
                )"
            }
        }
    }
}

impl Schema for Department {
    fn name() -> &'static str {
        DEPARTMENT_TABLE
    }

    fn columns() -> &'static [&'static str] {
        &["idwydzialu", "nazwawydzialu"]
    }

    fn creates(dialect: Dialect) -> &'static str {
        match dialect {
            Dialect::Postgres => {
                "CREATE TABLE IF NOT EXISTS wydzial (
                    idwydzialu SERIAL PRIMARY KEY,
                    nazwawydzialu VARCHAR(255) NOT NULL
                )"
            }
            Dialect::Sqlite => {
                "CREATE TABLE IF NOT EXISTS wydzial (
                    idwydzialu INTEGER PRIMARY KEY,
                    nazwawydzialu TEXT NOT NULL
                )"
            }
        }
    }
}

impl Schema for Application {
    fn name() -> &'static str {
        APPLICATION_TABLE
    }

    fn columns() -> &'static [&'static str] {
        &["pesel", "idwydzialu", "datarekrutacji", "statusaplikacji"]
    }

    fn creates(dialect: Dialect) -> &'static str {
        match dialect {
            Dialect::Postgres => {
                "CREATE TABLE IF NOT EXISTS aplikacja (
                    pesel CHAR(11),
                    idwydzialu INTEGER,
                    datarekrutacji DATE NOT NULL,
                    statusaplikacji VARCHAR(30),
                    PRIMARY KEY (pesel),
                    FOREIGN KEY (pesel) REFERENCES kandydat(pesel)
                        ON DELETE CASCADE ON UPDATE CASCADE,
                    FOREIGN KEY (idwydzialu) REFERENCES wydzial(idwydzialu)
                        ON DELETE RESTRICT ON UPDATE CASCADE
                )"
            }
            Dialect::Sqlite => {
                "CREATE TABLE IF NOT EXISTS aplikacja (
                    pesel TEXT,
                    idwydzialu INTEGER,
                    datarekrutacji TEXT NOT NULL,
                    statusaplikacji TEXT,
                    PRIMARY KEY (pesel),
                    FOREIGN KEY (pesel) REFERENCES kandydat(pesel)
                        ON DELETE CASCADE ON UPDATE CASCADE,
                    FOREIGN KEY (idwydzialu) REFERENCES wydzial(idwydzialu)
                        ON DELETE RESTRICT ON UPDATE CASCADE
                )"
            }
        }
    }
}

/// Flat table columns in file order.
pub const FLAT_COLUMNS: [&str; 10] = [
    "pesel",
    "imie",
    "nazwisko",
    "kodpocztowy",
    "telefon",
    "datarekrutacji",
    "sredniamaturalna",
    "statusaplikacji",
    "idwydzialu",
    "nazwawydzialu",
];

/// `CREATE TABLE` for a flat table under an arbitrary (validated) name.
pub fn create_flat_table(dialect: Dialect, table: &str) -> String {
    let columns = match dialect {
        Dialect::Postgres => [
            "TEXT",
            "TEXT",
            "TEXT",
            "TEXT",
            "TEXT",
            "TEXT",
            "DOUBLE PRECISION",
            "TEXT",
            "INTEGER",
            "TEXT",
        ],
        Dialect::Sqlite => [
            "TEXT", "TEXT", "TEXT", "TEXT", "TEXT", "TEXT", "REAL", "TEXT", "INTEGER", "TEXT",
        ],
    };
    let definitions = FLAT_COLUMNS
        .iter()
        .zip(columns)
        .map(|(name, ty)| format!("{name} {ty}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {table} ({definitions})")
}

/// Parameterized `INSERT` of one flat row into `table`.
pub fn insert_flat_row(dialect: Dialect, table: &str) -> String {
    let columns = FLAT_COLUMNS;
    let markers = (1..=columns.len())
        .map(|index| dialect.placeholder(index))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {table} ({}) VALUES ({markers})",
        columns.join(", ")
    )
}

/// `SELECT` that reads any flat table back with canonical column types.
pub fn select_flat_rows(dialect: Dialect, table: &str) -> String {
    let text = |column: &str| match dialect {
        Dialect::Postgres => format!("{column}::TEXT"),
        Dialect::Sqlite => format!("CAST({column} AS TEXT)"),
    };
    let integer = match dialect {
        Dialect::Postgres => "idwydzialu::INTEGER".to_string(),
        Dialect::Sqlite => "CAST(idwydzialu AS INTEGER)".to_string(),
    };
    format!(
        "SELECT {}, {}, {}, {}, {}, {}, {}, {}, {}, {} FROM {table}",
        text("pesel"),
        text("imie"),
        text("nazwisko"),
        text("kodpocztowy"),
        text("telefon"),
        text("datarekrutacji"),
        dialect.as_real("sredniamaturalna"),
        text("statusaplikacji"),
        integer,
        text("nazwawydzialu"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_ddl_uses_fixed_width_and_serial_types() {
        let candidate = Candidate::creates(Dialect::Postgres);
        assert!(candidate.contains("pesel CHAR(11) PRIMARY KEY"));
        assert!(candidate.contains("NUMERIC(4, 2)"));
        assert!(Department::creates(Dialect::Postgres).contains("SERIAL PRIMARY KEY"));
        assert!(Application::creates(Dialect::Postgres).contains("datarekrutacji DATE NOT NULL"));
    }

    #[test]
    fn sqlite_ddl_has_plain_integer_key_without_default() {
        let department = Department::creates(Dialect::Sqlite);
        assert!(department.contains("idwydzialu INTEGER PRIMARY KEY"));
        assert!(!department.contains("SERIAL"));
        assert!(!department.contains("DEFAULT"));
        assert!(Candidate::creates(Dialect::Sqlite).contains("sredniamaturalna REAL"));
    }

    #[test]
    fn both_dialects_declare_the_same_referential_actions() {
        for dialect in [Dialect::Postgres, Dialect::Sqlite] {
            let ddl = Application::creates(dialect);
            assert!(ddl.contains("PRIMARY KEY (pesel)"));
            assert!(ddl.contains("REFERENCES kandydat(pesel)"));
            assert!(ddl.contains("ON DELETE CASCADE ON UPDATE CASCADE"));
            assert!(ddl.contains("ON DELETE RESTRICT ON UPDATE CASCADE"));
            assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS"));
        }
    }

    #[test]
    fn insert_uses_dialect_placeholders() {
        let postgres = insert_flat_row(Dialect::Postgres, FLAT_TABLE);
        assert!(postgres.ends_with("VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"));
        let sqlite = insert_flat_row(Dialect::Sqlite, "archiwum");
        assert!(sqlite.starts_with("INSERT INTO archiwum (pesel, imie"));
        assert!(sqlite.ends_with("?10)"));
    }

    #[test]
    fn flat_table_column_order_matches_file_format() {
        let ddl = create_flat_table(Dialect::Sqlite, FLAT_TABLE);
        assert_eq!(
            ddl,
            "CREATE TABLE kandydaci (pesel TEXT, imie TEXT, nazwisko TEXT, kodpocztowy TEXT, \
telefon TEXT, datarekrutacji TEXT, sredniamaturalna REAL, statusaplikacji TEXT, \
idwydzialu INTEGER, nazwawydzialu TEXT)"
        );
    }
}
