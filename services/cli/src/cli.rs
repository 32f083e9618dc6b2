use crate::commands::{
    run_backup, run_clear, run_denormalize, run_export, run_generate, run_import, run_normalize,
    run_report, run_search, BackupArgs, ClearArgs, ExportArgs, GenerateArgs, ImportArgs,
    ReportArgs, SearchArgs,
};
use crate::infra::ConnectionArgs;
use admissions::config::AppConfig;
use admissions::error::AppError;
use admissions::telemetry;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "admissions",
    about = "Prepare, normalize and query university admissions datasets",
    version
)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a synthetic applicant dataset to a CSV or JSON file
    Generate(GenerateArgs),
    /// Load a CSV or JSON dataset into a flat table (replacing it)
    Import(ImportArgs),
    /// Write the rows of a flat table to a CSV or JSON file
    Export(ExportArgs),
    /// Split the flat table into candidate, department and application tables
    Normalize,
    /// Join the normalized tables back into the flat table
    Denormalize,
    /// Per-department candidate counts and average exam scores
    Report(ReportArgs),
    /// Filter candidates by department, minimum score and status
    Search(SearchArgs),
    /// Drop the named tables, or every table when none are named
    Clear(ClearArgs),
    /// Back up the database to a file
    Backup(BackupArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    cli.connection.apply(&mut config);
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Import(args) => run_import(&config, args),
        Command::Export(args) => run_export(&config, args),
        Command::Normalize => run_normalize(&config),
        Command::Denormalize => run_denormalize(&config),
        Command::Report(args) => run_report(&config, args),
        Command::Search(args) => run_search(&config, args),
        Command::Clear(args) => run_clear(&config, args),
        Command::Backup(args) => run_backup(&config, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use admissions::config::BackendKind;
    use admissions::domain::ApplicationStatus;

    #[test]
    fn global_connection_flags_parse_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "admissions",
            "search",
            "--department",
            "Prawo",
            "--min-score",
            "0",
            "--status",
            "oczekuje",
            "--backend",
            "postgres",
        ])
        .expect("arguments parse");

        assert_eq!(cli.connection.backend, Some(BackendKind::Postgres));
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.department.as_deref(), Some("Prawo"));
                assert_eq!(args.min_score, Some(0.0));
                assert_eq!(args.status, Some(ApplicationStatus::Pending));
                assert!(!args.json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn clear_accepts_repeated_tables() {
        let cli = Cli::try_parse_from([
            "admissions",
            "clear",
            "--table",
            "kandydat",
            "--table",
            "wydzial",
        ])
        .expect("arguments parse");
        match cli.command {
            Command::Clear(args) => assert_eq!(args.table, ["kandydat", "wydzial"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn generate_defaults_to_three_hundred_rows() {
        let cli = Cli::try_parse_from(["admissions", "generate", "--output", "out.csv"])
            .expect("arguments parse");
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.count, 300);
                assert_eq!(args.seed, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(Cli::try_parse_from(["admissions", "--backend", "oracle", "normalize"]).is_err());
    }

    #[test]
    fn unknown_status_is_rejected_before_querying() {
        assert!(Cli::try_parse_from(["admissions", "search", "--status", "przyjety"]).is_err());
    }

    #[test]
    fn backup_requires_an_output_path() {
        assert!(Cli::try_parse_from(["admissions", "backup"]).is_err());
    }
}
