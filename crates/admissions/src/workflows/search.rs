use crate::schema::Dialect;
use crate::storage::{SqlValue, StorageBackend, StorageError};
use serde::Serialize;
use tracing::info;

/// Optional, conjunctive search criteria. `None` means "no constraint";
/// `Some` of an empty string or zero is still a constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    /// Exact department name.
    pub department: Option<String>,
    /// Inclusive lower bound on the exam average.
    pub min_score: Option<f64>,
    /// Exact application status.
    pub status: Option<String>,
}

impl SearchFilter {
    pub fn department(mut self, name: impl Into<String>) -> Self {
        self.department = Some(name.into());
        self
    }

    pub fn min_score(mut self, score: f64) -> Self {
        self.min_score = Some(score);
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Renders the filter as one parameterized statement for `dialect`.
    pub fn build(&self, dialect: Dialect) -> SearchQuery {
        let mut sql = format!(
            "SELECT k.pesel, k.imie, k.nazwisko, {} AS sredniamaturalna, \
             w.nazwawydzialu, a.statusaplikacji \
             FROM kandydat k \
             JOIN aplikacja a ON k.pesel = a.pesel \
             JOIN wydzial w ON a.idwydzialu = w.idwydzialu",
            dialect.as_real("k.sredniamaturalna"),
        );
        let mut clauses = Vec::new();
        let mut params = Vec::new();

        if let Some(department) = &self.department {
            params.push(SqlValue::Text(department.clone()));
            clauses.push(format!(
                "w.nazwawydzialu = {}",
                dialect.placeholder(params.len())
            ));
        }
        if let Some(min_score) = self.min_score {
            params.push(SqlValue::Real(min_score));
            clauses.push(format!(
                "{} >= {}",
                dialect.as_real("k.sredniamaturalna"),
                dialect.placeholder(params.len())
            ));
        }
        if let Some(status) = &self.status {
            params.push(SqlValue::Text(status.clone()));
            clauses.push(format!(
                "a.statusaplikacji = {}",
                dialect.placeholder(params.len())
            ));
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY k.pesel");

        SearchQuery { sql, params }
    }
}

/// Statement text plus bind values, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// One row of the joined candidate/application/department view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub pesel: String,
    #[serde(rename = "imie")]
    pub first_name: String,
    #[serde(rename = "nazwisko")]
    pub last_name: String,
    #[serde(rename = "sredniamaturalna")]
    pub exam_average: Option<f64>,
    #[serde(rename = "nazwawydzialu")]
    pub department_name: String,
    #[serde(rename = "statusaplikacji")]
    pub status: Option<String>,
}

pub fn search_candidates(
    backend: &mut dyn StorageBackend,
    filter: &SearchFilter,
) -> Result<Vec<SearchHit>, StorageError> {
    let query = filter.build(backend.dialect());
    let hits = backend.search(&query)?;
    info!(hits = hits.len(), filters = query.params.len(), "search finished");
    Ok(hits)
}
