mod cli;
mod commands;
mod infra;
mod render;

use admissions::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
