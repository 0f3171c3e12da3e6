mod run;

use chrono::{DateTime, NaiveDate, Utc};
use powerpos_core::SavedReports;
use serde::Serialize;
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Machine-readable summary of one `run` invocation.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub source: &'static str,
    pub trade_date: NaiveDate,
    pub run_time: String,
    pub input_zone: String,
    pub output_zone: String,
    pub batches: usize,
    pub validated_rows: usize,
    pub valid_rows: usize,
    pub exception_rows: usize,
    pub identifiers: usize,
    pub buckets: usize,
    pub files: SavedReports,
    pub warnings: Vec<String>,
}

impl RunReport {
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

pub async fn run(cli: &Cli) -> Result<RunReport, CliError> {
    match &cli.command {
        Command::Run(args) => run::run(args).await,
    }
}
