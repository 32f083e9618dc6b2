#![allow(dead_code)]

use admissions::domain::{FlatRecord, FlatRecordKey};
use admissions::schema::FLAT_TABLE;
use admissions::storage::{SqliteBackend, StorageBackend};
use chrono::NaiveDate;
use std::collections::BTreeSet;

pub fn record(
    pesel: &str,
    first_name: &str,
    last_name: &str,
    exam_average: f64,
    status: &str,
    department_id: i32,
    department_name: &str,
) -> FlatRecord {
    FlatRecord {
        pesel: pesel.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        postal_code: Some("00-001".to_string()),
        phone: Some("+48 600-100-100".to_string()),
        submitted_on: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        exam_average: Some(exam_average),
        status: Some(status.to_string()),
        department_id,
        department_name: department_name.to_string(),
    }
}

pub fn anna() -> FlatRecord {
    record(
        "12345678901",
        "Anna",
        "Kowalska",
        85.50,
        "zaakceptowany",
        0,
        "Informatyka",
    )
}

/// Eight applicants over three departments: Medycyna 4, Prawo 3, Informatyka 1.
pub fn sample() -> Vec<FlatRecord> {
    let mut rows = vec![
        anna(),
        record("00210112345", "Jakub", "Nowak", 75.00, "oczekuje", 7, "Medycyna"),
        record("00210112346", "Lena", "Mazur", 88.25, "zaakceptowany", 7, "Medycyna"),
        record("00210112347", "Oskar", "Wilk", 61.10, "odrzucony", 7, "Medycyna"),
        record("00210112348", "Iga", "Lis", 75.00, "oczekuje", 7, "Medycyna"),
        record("99123104567", "Filip", "Zając", 55.40, "odrzucony", 4, "Prawo"),
        record("99123104568", "Hanna", "Król", 79.99, "oczekuje", 4, "Prawo"),
        record("99123104569", "Eryk", "Baran", 82.00, "zaakceptowany", 4, "Prawo"),
    ];
    rows[2].submitted_on = NaiveDate::from_ymd_opt(2024, 2, 29).expect("leap day");
    rows
}

pub fn keys(rows: &[FlatRecord]) -> BTreeSet<FlatRecordKey> {
    rows.iter().map(FlatRecord::comparison_key).collect()
}

pub fn loaded_backend(rows: &[FlatRecord]) -> SqliteBackend {
    let mut backend = SqliteBackend::open_in_memory().expect("in-memory sqlite opens");
    backend
        .bulk_load(FLAT_TABLE, rows)
        .expect("flat rows load");
    backend
}

pub fn normalized_backend(rows: &[FlatRecord]) -> SqliteBackend {
    let mut backend = loaded_backend(rows);
    admissions::workflows::normalize(&mut backend).expect("normalization succeeds");
    backend
}
