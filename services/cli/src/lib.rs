mod cli;
mod infra;
mod report;

use result_analysis::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
