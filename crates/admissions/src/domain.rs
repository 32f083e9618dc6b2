use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decision state of an application as stored in `statusaplikacji`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[serde(rename = "oczekuje")]
    Pending,
    #[serde(rename = "zaakceptowany")]
    Accepted,
    #[serde(rename = "odrzucony")]
    Rejected,
}

impl ApplicationStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Pending, Self::Accepted, Self::Rejected]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "oczekuje",
            Self::Accepted => "zaakceptowany",
            Self::Rejected => "odrzucony",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ordered()
            .into_iter()
            .find(|status| status.label() == value.trim())
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// One row of the flat `kandydaci` table and of the CSV/JSON files.
///
/// Field names follow the file format; `pesel` is always text so leading
/// zeros survive. Columns the tables declare nullable are `Option`s; an
/// empty CSV field or a JSON `null` reads as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub pesel: String,
    #[serde(rename = "imie")]
    pub first_name: String,
    #[serde(rename = "nazwisko")]
    pub last_name: String,
    #[serde(rename = "kodpocztowy")]
    pub postal_code: Option<String>,
    #[serde(rename = "telefon")]
    pub phone: Option<String>,
    #[serde(rename = "datarekrutacji")]
    pub submitted_on: NaiveDate,
    #[serde(rename = "sredniamaturalna")]
    pub exam_average: Option<f64>,
    #[serde(rename = "statusaplikacji")]
    pub status: Option<String>,
    #[serde(rename = "idwydzialu")]
    pub department_id: i32,
    #[serde(rename = "nazwawydzialu")]
    pub department_name: String,
}

impl FlatRecord {
    pub fn candidate(&self) -> Candidate {
        Candidate {
            pesel: self.pesel.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            postal_code: self.postal_code.clone(),
            phone: self.phone.clone(),
            exam_average: self.exam_average,
        }
    }

    pub fn department(&self) -> Department {
        Department {
            id: self.department_id,
            name: self.department_name.clone(),
        }
    }

    pub fn application(&self) -> Application {
        Application {
            pesel: self.pesel.clone(),
            department_id: self.department_id,
            submitted_on: self.submitted_on,
            status: self.status.clone(),
        }
    }

    /// Tuple key used to compare row sets regardless of order. Scores are
    /// compared at the stored two-decimal precision.
    pub fn comparison_key(&self) -> FlatRecordKey {
        (
            self.pesel.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.postal_code.clone(),
            self.phone.clone(),
            self.submitted_on,
            self.exam_average
                .map(|score| (score * 100.0).round() as i64),
            self.status.clone(),
            self.department_id,
            self.department_name.clone(),
        )
    }
}

pub type FlatRecordKey = (
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    NaiveDate,
    Option<i64>,
    Option<String>,
    i32,
    String,
);

/// `kandydat` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub pesel: String,
    pub first_name: String,
    pub last_name: String,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub exam_average: Option<f64>,
}

/// `wydzial` row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Department {
    pub id: i32,
    pub name: String,
}

/// `aplikacja` row. One per candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    pub pesel: String,
    pub department_id: i32,
    pub submitted_on: NaiveDate,
    pub status: Option<String>,
}
