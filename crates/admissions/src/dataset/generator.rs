use crate::domain::{ApplicationStatus, FlatRecord};
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Department names indexed by their id.
pub const DEPARTMENTS: [&str; 8] = [
    "Informatyka",
    "Matematyka",
    "Biologia",
    "Fizyka",
    "Prawo",
    "Ekonomia",
    "Filologia",
    "Medycyna",
];

const MALE_NAMES: [&str; 30] = [
    "Adam", "Aleksander", "Andrzej", "Bartosz", "Borys", "Cezary", "Damian", "Dawid", "Eryk",
    "Fabian", "Filip", "Grzegorz", "Hubert", "Igor", "Jakub", "Kamil", "Krzysztof", "Leon",
    "Maciej", "Mikołaj", "Nikodem", "Oskar", "Patryk", "Rafał", "Szymon", "Tobiasz", "Tymon",
    "Wiktor", "Zbigniew", "Zygmunt",
];

const FEMALE_NAMES: [&str; 30] = [
    "Alicja", "Anna", "Barbara", "Beata", "Cecylia", "Dominika", "Eliza", "Gabriela", "Hanna",
    "Iga", "Jagoda", "Julia", "Karolina", "Katarzyna", "Kinga", "Laura", "Lena", "Lidia",
    "Magdalena", "Marcelina", "Milena", "Natalia", "Natasza", "Oliwia", "Paulina", "Roksana",
    "Sandra", "Sylwia", "Weronika", "Zofia",
];

// Masculine forms; the feminine form swaps a trailing "i" for "a".
const SURNAMES: [&str; 70] = [
    "Kowalski", "Nowak", "Wiśniewski", "Dąbrowski", "Lewandowski", "Wójcik", "Kamiński",
    "Zieliński", "Szymański", "Woźniak", "Kozłowski", "Jankowski", "Mazur", "Kwiatkowski",
    "Wróbel", "Piotrowski", "Grabowski", "Zając", "Król", "Pawlak", "Michalski", "Adamczyk",
    "Nowicki", "Dudek", "Wieczorek", "Jabłoński", "Górski", "Walczak", "Rutkowski", "Michalak",
    "Sikora", "Ostrowski", "Baran", "Pietrzak", "Wasilewski", "Czarnecki", "Szulc", "Makowski",
    "Kubiak", "Wilk", "Grzelak", "Kucharski", "Wróblewski", "Lis", "Kaczmarek", "Mazurek",
    "Sobczak", "Czerwiński", "Andrzejewski", "Stępień", "Malinowski", "Urban", "Tokarski",
    "Tomczak", "Janik", "Bednarek", "Skiba", "Borowski", "Musiał", "Krajewski", "Polak",
    "Matusiak", "Gajewski", "Orłowski", "Kulesza", "Wilczyński", "Janowski", "Głowacki",
    "Sadowski", "Staniszewski",
];

/// Produces plausible fake applicants.
pub struct CandidateGenerator<R: Rng> {
    rng: R,
    today: NaiveDate,
}

impl CandidateGenerator<StdRng> {
    pub fn seeded(seed: u64, today: NaiveDate) -> Self {
        Self::new(StdRng::seed_from_u64(seed), today)
    }

    pub fn from_os_rng(today: NaiveDate) -> Self {
        Self::new(StdRng::from_os_rng(), today)
    }
}

impl<R: Rng> CandidateGenerator<R> {
    pub fn new(rng: R, today: NaiveDate) -> Self {
        Self { rng, today }
    }

    /// `count` records with pairwise distinct pesel numbers.
    pub fn records(&mut self, count: usize) -> Vec<FlatRecord> {
        let mut seen = HashSet::with_capacity(count);
        let mut records = Vec::with_capacity(count);
        while records.len() < count {
            let record = self.record();
            if seen.insert(record.pesel.clone()) {
                records.push(record);
            }
        }
        records
    }

    pub fn record(&mut self) -> FlatRecord {
        let pesel: String = (0..11)
            .map(|_| char::from(b'0' + self.rng.random_range(0..=9u8)))
            .collect();

        // Tenth digit: even for women, odd for men.
        let female = pesel.as_bytes()[9] % 2 == 0;
        let (first_name, last_name) = if female {
            (self.pick(&FEMALE_NAMES), feminine_surname(self.pick::<&str>(&SURNAMES)))
        } else {
            (self.pick(&MALE_NAMES), self.pick(&SURNAMES).to_string())
        };

        let postal_code = format!(
            "{:02}-{:03}",
            self.rng.random_range(0..=99),
            self.rng.random_range(0..=999)
        );
        let phone = format!(
            "+48 {}-{}-{}",
            self.rng.random_range(500..=899),
            self.rng.random_range(100..=999),
            self.rng.random_range(100..=999)
        );
        let exam_average = (self.rng.random_range(50.0..=90.0_f64) * 100.0).round() / 100.0;
        let status = self.status_for(exam_average);
        let submitted_on = self.today - Duration::days(self.rng.random_range(0..=30));
        let department_id = self.rng.random_range(0..DEPARTMENTS.len());

        FlatRecord {
            pesel,
            first_name: first_name.to_string(),
            last_name,
            postal_code: Some(postal_code),
            phone: Some(phone),
            submitted_on,
            exam_average: Some(exam_average),
            status: Some(status.label().to_string()),
            department_id: department_id as i32,
            department_name: DEPARTMENTS[department_id].to_string(),
        }
    }

    fn status_for(&mut self, exam_average: f64) -> ApplicationStatus {
        if exam_average > 80.0 {
            *self.pick(&[ApplicationStatus::Pending, ApplicationStatus::Accepted])
        } else if exam_average < 60.0 {
            ApplicationStatus::Rejected
        } else {
            *self.pick(&ApplicationStatus::ordered())
        }
    }

    fn pick<'a, T>(&mut self, values: &'a [T]) -> &'a T {
        // Every list passed in is a non-empty constant.
        values
            .choose(&mut self.rng)
            .unwrap_or(&values[0])
    }
}

fn feminine_surname(masculine: &str) -> String {
    match masculine.strip_suffix('i') {
        Some(stem) => format!("{stem}a"),
        None => masculine.to_string(),
    }
}
