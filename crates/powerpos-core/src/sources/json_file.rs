use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use chrono::NaiveDate;
use serde_json::Value;

use super::{SourceError, TradeSource};
use crate::batch::{ColumnData, RawBatch, DATE_COLUMN};
use crate::domain::parse_record_date;

/// Reads a JSON array of batches, each a column-name to values mapping.
///
/// Every parseable `date` in the file must match the requested trade date;
/// a recording of another day is rejected as an invalid request. Dates that
/// do not parse are left for validation to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileTradeSource {
    path: PathBuf,
}

impl JsonFileTradeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TradeSource for JsonFileTradeSource {
    fn name(&self) -> &'static str {
        "json_file"
    }

    fn fetch_trades<'a>(
        &'a self,
        trade_date: NaiveDate,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawBatch>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let payload = tokio::fs::read_to_string(&self.path).await.map_err(|error| {
                SourceError::unavailable(format!(
                    "failed to read {}: {error}",
                    self.path.display()
                ))
            })?;

            let batches: Vec<RawBatch> = serde_json::from_str(&payload).map_err(|error| {
                SourceError::malformed(format!(
                    "{} is not a JSON array of batches: {error}",
                    self.path.display()
                ))
            })?;

            if let Some(other) = batches
                .iter()
                .flat_map(batch_dates)
                .find(|date| *date != trade_date)
            {
                return Err(SourceError::invalid_request(format!(
                    "{} records {} but trade date {trade_date} was requested",
                    self.path.display(),
                    other
                )));
            }

            tracing::info!(
                source = self.name(),
                path = %self.path.display(),
                %trade_date,
                batches = batches.len(),
                "loaded trade batches"
            );
            Ok(batches)
        })
    }
}

fn batch_dates(batch: &RawBatch) -> Vec<NaiveDate> {
    let values: Vec<&Value> = match batch.column(DATE_COLUMN) {
        Some(ColumnData::Values(values)) => values.iter().collect(),
        Some(ColumnData::Scalar(value)) => vec![value],
        None => Vec::new(),
    };
    values
        .into_iter()
        .filter_map(Value::as_str)
        .filter_map(parse_record_date)
        .collect()
}
