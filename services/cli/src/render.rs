use admissions::workflows::{DepartmentReport, SearchHit};
use std::fmt::Write;

pub(crate) fn render_report(report: &DepartmentReport) -> String {
    let mut out = String::new();
    if report.departments.is_empty() {
        out.push_str("No applications recorded\n");
        return out;
    }

    let _ = writeln!(out, "Department summary");
    let _ = writeln!(out, "  {:<20} {:>10} {:>9}", "Wydział", "Kandydaci", "Średnia");
    for entry in &report.departments {
        let _ = writeln!(
            out,
            "  {:<20} {:>10} {:>9}",
            entry.department_name,
            entry.candidate_count,
            score(entry.average_score)
        );
    }
    let _ = writeln!(out, "  {:<20} {:>10}", "Razem", report.total_candidates());
    out
}

/// Horizontal bars scaled so the busiest department spans `width` cells.
pub(crate) fn render_bar_chart(report: &DepartmentReport, width: usize) -> String {
    let mut out = String::new();
    let Some(busiest) = report.busiest() else {
        return out;
    };
    let max = busiest.candidate_count.max(1) as f64;

    let _ = writeln!(out, "Candidates per department");
    for entry in &report.departments {
        let cells = ((entry.candidate_count as f64 / max) * width as f64).round() as usize;
        let _ = writeln!(
            out,
            "  {:<20} |{} {}",
            entry.department_name,
            "#".repeat(cells),
            entry.candidate_count
        );
    }
    out
}

pub(crate) fn render_search(hits: &[SearchHit]) -> String {
    let mut out = String::new();
    if hits.is_empty() {
        out.push_str("No matching candidates\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<11}  {:<14} {:<16} {:>7}  {:<20} {}",
        "pesel", "imie", "nazwisko", "srednia", "wydzial", "status"
    );
    for hit in hits {
        let _ = writeln!(
            out,
            "{:<11}  {:<14} {:<16} {:>7}  {:<20} {}",
            hit.pesel,
            hit.first_name,
            hit.last_name,
            score(hit.exam_average),
            hit.department_name,
            hit.status.as_deref().unwrap_or("-")
        );
    }
    let _ = writeln!(out, "{} match(es)", hits.len());
    out
}

fn score(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}"),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use admissions::workflows::DepartmentSummary;

    fn report() -> DepartmentReport {
        DepartmentReport {
            departments: vec![
                DepartmentSummary {
                    department_name: "Medycyna".to_string(),
                    candidate_count: 4,
                    average_score: Some(74.87),
                },
                DepartmentSummary {
                    department_name: "Prawo".to_string(),
                    candidate_count: 2,
                    average_score: None,
                },
            ],
        }
    }

    #[test]
    fn report_lists_departments_and_total() {
        let rendered = render_report(&report());
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[2].starts_with("  Medycyna"));
        assert!(lines[2].ends_with("74.87"));
        assert!(lines[3].ends_with('-'));
        assert!(lines[4].trim_end().ends_with('6'));
    }

    #[test]
    fn chart_scales_to_the_busiest_department() {
        let rendered = render_bar_chart(&report(), 10);
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[1].matches('#').count(), 10);
        assert_eq!(lines[2].matches('#').count(), 5);
        assert!(render_bar_chart(&DepartmentReport::default(), 10).is_empty());
    }

    #[test]
    fn search_table_reports_empty_results() {
        assert_eq!(render_search(&[]), "No matching candidates\n");

        let hit = SearchHit {
            pesel: "12345678901".to_string(),
            first_name: "Anna".to_string(),
            last_name: "Kowalska".to_string(),
            exam_average: Some(85.5),
            department_name: "Informatyka".to_string(),
            status: Some("zaakceptowany".to_string()),
        };
        let unscored = SearchHit {
            pesel: "00210112345".to_string(),
            exam_average: None,
            status: None,
            ..hit.clone()
        };
        let rendered = render_search(&[hit, unscored]);
        assert!(rendered.contains("12345678901  Anna"));
        assert!(rendered.contains("85.50"));
        assert!(rendered.lines().nth(2).is_some_and(|line| line.ends_with(" -")));
        assert!(rendered.ends_with("2 match(es)\n"));
    }
}
