use crate::infra::{connect, parse_date, parse_status};
use crate::render::{render_bar_chart, render_report, render_search};
use admissions::config::AppConfig;
use admissions::dataset::{self, CandidateGenerator};
use admissions::domain::ApplicationStatus;
use admissions::error::AppError;
use admissions::schema::FLAT_TABLE;
use admissions::storage::BackupOutcome;
use admissions::workflows::{
    clear, denormalize, generate_report, normalize, search_candidates, SearchFilter,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// Destination file; the extension (.csv or .json) picks the format
    #[arg(long)]
    pub(crate) output: PathBuf,
    /// Number of applicants to generate
    #[arg(long, default_value_t = 300)]
    pub(crate) count: usize,
    /// Seed for a reproducible dataset
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Latest application date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV or JSON dataset to load
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Target table; replaced if it exists
    #[arg(long, default_value = FLAT_TABLE)]
    pub(crate) table: String,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// CSV or JSON file to write
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Flat table to read
    #[arg(long, default_value = FLAT_TABLE)]
    pub(crate) table: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Also draw candidate counts as a bar chart
    #[arg(long)]
    pub(crate) chart: bool,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    /// Exact department name
    #[arg(long)]
    pub(crate) department: Option<String>,
    /// Inclusive minimum exam average
    #[arg(long)]
    pub(crate) min_score: Option<f64>,
    /// Application status: oczekuje, zaakceptowany or odrzucony
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<ApplicationStatus>,
    /// Print matches as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl SearchArgs {
    fn filter(&self) -> SearchFilter {
        SearchFilter {
            department: self.department.clone(),
            min_score: self.min_score,
            status: self.status.map(|status| status.label().to_string()),
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct ClearArgs {
    /// Table to drop; repeat for several. Drops every table when omitted.
    #[arg(long)]
    pub(crate) table: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct BackupArgs {
    /// Backup file to create
    #[arg(long)]
    pub(crate) output: PathBuf,
}

pub(crate) fn run_generate(args: GenerateArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let mut generator = match args.seed {
        Some(seed) => CandidateGenerator::seeded(seed, today),
        None => CandidateGenerator::from_os_rng(today),
    };
    let records = generator.records(args.count);
    dataset::write_path(&args.output, &records)?;
    info!(rows = records.len(), path = %args.output.display(), "dataset generated");
    println!(
        "Generated {} applicants into {}",
        records.len(),
        args.output.display()
    );
    Ok(())
}

pub(crate) fn run_import(config: &AppConfig, args: ImportArgs) -> Result<(), AppError> {
    let records = dataset::read_path(&args.file)?;
    let mut backend = connect(config)?;
    let written = backend.bulk_load(&args.table, &records)?;
    println!(
        "Loaded {written} rows from {} into {}",
        args.file.display(),
        args.table
    );
    Ok(())
}

pub(crate) fn run_export(config: &AppConfig, args: ExportArgs) -> Result<(), AppError> {
    let mut backend = connect(config)?;
    let records = backend.bulk_export(&args.table)?;
    dataset::write_path(&args.file, &records)?;
    println!(
        "Exported {} rows from {} to {}",
        records.len(),
        args.table,
        args.file.display()
    );
    Ok(())
}

pub(crate) fn run_normalize(config: &AppConfig) -> Result<(), AppError> {
    let mut backend = connect(config)?;
    normalize(backend.as_mut())?;
    println!("Normalized {FLAT_TABLE} into kandydat, wydzial and aplikacja");
    Ok(())
}

pub(crate) fn run_denormalize(config: &AppConfig) -> Result<(), AppError> {
    let mut backend = connect(config)?;
    denormalize(backend.as_mut())?;
    println!("Denormalized kandydat, wydzial and aplikacja into {FLAT_TABLE}");
    Ok(())
}

pub(crate) fn run_report(config: &AppConfig, args: ReportArgs) -> Result<(), AppError> {
    let mut backend = connect(config)?;
    let report = generate_report(backend.as_mut())?;

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Report payload unavailable: {err}"),
        }
        return Ok(());
    }

    print!("{}", render_report(&report));
    if args.chart {
        print!("\n{}", render_bar_chart(&report, 40));
    }
    Ok(())
}

pub(crate) fn run_search(config: &AppConfig, args: SearchArgs) -> Result<(), AppError> {
    let mut backend = connect(config)?;
    let hits = search_candidates(backend.as_mut(), &args.filter())?;

    if args.json {
        match serde_json::to_string_pretty(&hits) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Search payload unavailable: {err}"),
        }
    } else {
        print!("{}", render_search(&hits));
    }
    Ok(())
}

pub(crate) fn run_clear(config: &AppConfig, args: ClearArgs) -> Result<(), AppError> {
    let mut backend = connect(config)?;
    let named = if args.table.is_empty() {
        None
    } else {
        Some(args.table.as_slice())
    };
    let dropped = clear(backend.as_mut(), named)?;
    if dropped.is_empty() {
        println!("No tables to drop");
    } else {
        println!("Dropped tables: {}", dropped.join(", "));
    }
    Ok(())
}

pub(crate) fn run_backup(config: &AppConfig, args: BackupArgs) -> Result<(), AppError> {
    let mut backend = connect(config)?;
    match backend.backup(&args.output)? {
        BackupOutcome::Completed { path } => {
            println!("Backup written to {}", path.display());
        }
        BackupOutcome::Failed {
            exit_code: Some(code),
        } => println!("Backup failed: pg_dump exited with status {code}"),
        BackupOutcome::Failed { exit_code: None } => {
            println!("Backup failed: pg_dump was terminated by a signal")
        }
    }
    Ok(())
}
