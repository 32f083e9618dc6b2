use crate::schema::Dialect;
use crate::storage::{StorageBackend, StorageError};
use serde::Serialize;
use tracing::info;

/// Candidate count and mean exam score for one department name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentSummary {
    pub department_name: String,
    pub candidate_count: i64,
    /// `None` when no candidate in the department has a score.
    pub average_score: Option<f64>,
}

/// Report rows ordered by descending candidate count.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DepartmentReport {
    pub departments: Vec<DepartmentSummary>,
}

impl DepartmentReport {
    pub fn total_candidates(&self) -> i64 {
        self.departments
            .iter()
            .map(|entry| entry.candidate_count)
            .sum()
    }

    pub fn busiest(&self) -> Option<&DepartmentSummary> {
        self.departments.first()
    }
}

pub(crate) fn department_summary_query(dialect: Dialect) -> String {
    format!(
        "SELECT w.nazwawydzialu, COUNT(a.pesel) AS liczba_kandydatow, {} AS srednia_matura
         FROM wydzial w
         JOIN aplikacja a ON w.idwydzialu = a.idwydzialu
         JOIN kandydat k ON a.pesel = k.pesel
         GROUP BY w.nazwawydzialu
         ORDER BY liczba_kandydatow DESC, w.nazwawydzialu",
        dialect.as_real("AVG(k.sredniamaturalna)"),
    )
}

pub fn generate_report(backend: &mut dyn StorageBackend) -> Result<DepartmentReport, StorageError> {
    let departments = backend.department_summary()?;
    info!(departments = departments.len(), "department report ready");
    Ok(DepartmentReport { departments })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_orders_by_count_then_name() {
        let sql = department_summary_query(Dialect::Sqlite);
        assert!(sql.contains("GROUP BY w.nazwawydzialu"));
        assert!(sql.trim_end().ends_with("ORDER BY liczba_kandydatow DESC, w.nazwawydzialu"));
        assert!(department_summary_query(Dialect::Postgres)
            .contains("AVG(k.sredniamaturalna)::DOUBLE PRECISION"));
    }

    #[test]
    fn totals_and_busiest_follow_row_order() {
        let report = DepartmentReport {
            departments: vec![
                DepartmentSummary {
                    department_name: "Medycyna".to_string(),
                    candidate_count: 5,
                    average_score: Some(81.2),
                },
                DepartmentSummary {
                    department_name: "Prawo".to_string(),
                    candidate_count: 3,
                    average_score: Some(64.0),
                },
            ],
        };
        assert_eq!(report.total_candidates(), 8);
        assert_eq!(report.busiest().map(|entry| entry.department_name.as_str()), Some("Medycyna"));
        assert!(DepartmentReport::default().busiest().is_none());
    }
}
