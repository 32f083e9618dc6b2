//! Flat candidate files: CSV and JSON with the fixed field set.

mod generator;

pub use generator::{CandidateGenerator, DEPARTMENTS};

use crate::domain::FlatRecord;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Json,
}

impl DatasetFormat {
    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot tell the format of '{0}'; use a .csv or .json extension")]
    UnknownFormat(String),
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<FlatRecord>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let records = csv_reader
        .deserialize::<FlatRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

pub fn write_csv<W: Write>(writer: W, records: &[FlatRecord]) -> Result<(), DatasetError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn read_json<R: Read>(reader: R) -> Result<Vec<FlatRecord>, DatasetError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Pretty-printed array; non-ASCII names are written as-is.
pub fn write_json<W: Write>(mut writer: W, records: &[FlatRecord]) -> Result<(), DatasetError> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    Ok(())
}

pub fn read_path(path: &Path) -> Result<Vec<FlatRecord>, DatasetError> {
    let format = format_for(path)?;
    let file = std::io::BufReader::new(std::fs::File::open(path)?);
    match format {
        DatasetFormat::Csv => read_csv(file),
        DatasetFormat::Json => read_json(file),
    }
}

pub fn write_path(path: &Path, records: &[FlatRecord]) -> Result<(), DatasetError> {
    let format = format_for(path)?;
    let file = std::io::BufWriter::new(std::fs::File::create(path)?);
    match format {
        DatasetFormat::Csv => write_csv(file, records),
        DatasetFormat::Json => write_json(file, records),
    }
}

fn format_for(path: &Path) -> Result<DatasetFormat, DatasetError> {
    DatasetFormat::from_path(path)
        .ok_or_else(|| DatasetError::UnknownFormat(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    const HEADER: &str = "pesel,imie,nazwisko,kodpocztowy,telefon,datarekrutacji,sredniamaturalna,statusaplikacji,idwydzialu,nazwawydzialu";

    #[test]
    fn csv_keeps_leading_zeros_and_polish_letters() {
        let csv = format!(
            "{HEADER}\n01234567890,Mikołaj,Wiśniewski,02-495,+48 700-123-456,2024-02-29,58.25,odrzucony,6,Filologia\n"
        );
        let records = read_csv(Cursor::new(csv)).expect("csv parses");
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.pesel, "01234567890");
        assert_eq!(record.first_name, "Mikołaj");
        assert_eq!(record.last_name, "Wiśniewski");
        assert_eq!(
            record.submitted_on,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(record.exam_average, Some(58.25));
        assert_eq!(record.department_id, 6);
    }

    #[test]
    fn nullable_columns_read_as_none() {
        let csv = format!("{HEADER}
01234567890,Iga,Lis,,,2024-01-10,,,3,Fizyka
");
        let records = read_csv(Cursor::new(csv)).expect("csv parses");
        assert_eq!(records[0].postal_code, None);
        assert_eq!(records[0].phone, None);
        assert_eq!(records[0].exam_average, None);
        assert_eq!(records[0].status, None);

        let json = r#"[{
            "pesel": "01234567890",
            "imie": "Iga",
            "nazwisko": "Lis",
            "kodpocztowy": "00-950",
            "telefon": null,
            "datarekrutacji": "2024-01-10",
            "sredniamaturalna": null,
            "statusaplikacji": "oczekuje",
            "idwydzialu": 3,
            "nazwawydzialu": "Fizyka"
        }]"#;
        let records = read_json(Cursor::new(json)).expect("json parses");
        assert_eq!(records[0].phone, None);
        assert_eq!(records[0].exam_average, None);
        assert_eq!(records[0].postal_code.as_deref(), Some("00-950"));

        let mut out = Vec::new();
        write_json(&mut out, &records).expect("json writes");
        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.contains("\"telefon\": null"));
    }

    #[test]
    fn csv_writer_emits_the_fixed_header() {
        let csv = format!(
            "{HEADER}\n12345678901,Anna,Kowalska,00-001,+48 600-100-100,2024-01-01,85.5,zaakceptowany,0,Informatyka\n"
        );
        let records = read_csv(Cursor::new(csv)).expect("csv parses");
        let mut out = Vec::new();
        write_csv(&mut out, &records).expect("csv writes");
        let text = String::from_utf8(out).expect("utf-8");
        assert_eq!(text.lines().next(), Some(HEADER));
        assert!(text.contains("12345678901,Anna,Kowalska,00-001"));
    }

    #[test]
    fn json_uses_file_field_names() {
        let json = r#"[{
            "pesel": "98765432109",
            "imie": "Zofia",
            "nazwisko": "Zając",
            "kodpocztowy": "80-180",
            "telefon": "+48 811-222-333",
            "datarekrutacji": "2024-03-15",
            "sredniamaturalna": 90.0,
            "statusaplikacji": "oczekuje",
            "idwydzialu": 7,
            "nazwawydzialu": "Medycyna"
        }]"#;
        let records = read_json(Cursor::new(json)).expect("json parses");
        assert_eq!(records[0].last_name, "Zając");

        let mut out = Vec::new();
        write_json(&mut out, &records).expect("json writes");
        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.contains("\"nazwisko\": \"Zając\""));
        assert!(text.contains("\"idwydzialu\": 7"));
    }

    #[test]
    fn rejects_bad_rows() {
        let csv = format!("{HEADER}\n1,Anna,Nowak,00-001,+48,not-a-date,70,oczekuje,0,Prawo\n");
        assert!(matches!(
            read_csv(Cursor::new(csv)),
            Err(DatasetError::Csv(_))
        ));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            DatasetFormat::from_path(Path::new("kandydaci.CSV")),
            Some(DatasetFormat::Csv)
        );
        assert_eq!(
            DatasetFormat::from_path(Path::new("out/kandydaci.json")),
            Some(DatasetFormat::Json)
        );
        assert!(DatasetFormat::from_path(Path::new("kandydaci.xlsx")).is_none());
        assert!(matches!(
            read_path(Path::new("kandydaci.txt")),
            Err(DatasetError::UnknownFormat(_))
        ));
    }
}
