//! Batch orchestration: validate, profile and aggregate a trade day.
//!
//! ```text
//! TradeSource ──▶ RawBatch ──▶ Validator ──▶ valid / exceptions ──▶ Aggregator
//!                                   │                                  │
//!                                   └──▶ quality summary               ▼
//!                                                         ReportSink (3 tables)
//! ```

use std::env;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;

use crate::aggregator::{Aggregator, DEFAULT_INPUT_ZONE, DEFAULT_OUTPUT_ZONE};
use crate::batch::RawBatch;
use crate::domain::{
    parse_zone, AggregatedBucket, QualitySummary, RunTag, TradeRecord, ValidatedRecord,
};
use crate::quality::{exception_rows, quality_summary, valid_rows};
use crate::sink::{ReportSink, SavedReports};
use crate::sources::TradeSource;
use crate::validator::Validator;
use crate::{CoreError, ValidationError};

pub const INPUT_ZONE_ENV: &str = "POWERPOS_INPUT_TZ";
pub const OUTPUT_ZONE_ENV: &str = "POWERPOS_OUTPUT_TZ";

/// Fixed configuration of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input_zone: Tz,
    pub output_zone: Tz,
    pub run_time: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_zone: DEFAULT_INPUT_ZONE,
            output_zone: DEFAULT_OUTPUT_ZONE,
            run_time: String::from(RunTag::DEFAULT_RUN_TIME),
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by `POWERPOS_INPUT_TZ` / `POWERPOS_OUTPUT_TZ`.
    pub fn from_env() -> Result<Self, ValidationError> {
        let mut config = Self::default();
        if let Some(zone) = non_empty_env(INPUT_ZONE_ENV) {
            config.input_zone = parse_zone(&zone)?;
        }
        if let Some(zone) = non_empty_env(OUTPUT_ZONE_ENV) {
            config.output_zone = parse_zone(&zone)?;
        }
        Ok(config)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// The three result tables of a run plus row counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub aggregated: Vec<AggregatedBucket>,
    pub exceptions: Vec<ValidatedRecord>,
    pub quality_summary: Vec<QualitySummary>,
    pub batches: usize,
    pub validated_rows: usize,
    pub valid_rows: usize,
}

/// Validator and aggregator wired together.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    validator: Validator,
    aggregator: Aggregator,
}

impl Pipeline {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            validator: Validator::new(),
            aggregator: Aggregator::new(config.input_zone, config.output_zone),
        }
    }

    /// Process record batches independently, concatenate, then summarise and
    /// aggregate the combined tables.
    pub fn process(&self, batches: &[Vec<TradeRecord>]) -> Result<PipelineOutput, CoreError> {
        let mut validated = Vec::new();
        let mut valid = Vec::new();
        let mut exceptions = Vec::new();

        for (index, batch) in batches.iter().enumerate() {
            let table = self.validator.validate(batch)?;
            let batch_valid = valid_rows(&table);
            let batch_exceptions = exception_rows(&table);
            tracing::debug!(
                batch = index,
                rows = table.len(),
                valid = batch_valid.len(),
                exceptions = batch_exceptions.len(),
                "processed batch"
            );

            valid.extend(batch_valid);
            exceptions.extend(batch_exceptions);
            validated.extend(table);
        }

        let summary = quality_summary(&validated);
        let aggregated = self.aggregator.aggregate(&valid)?;

        if !exceptions.is_empty() {
            tracing::warn!(
                exceptions = exceptions.len(),
                identifiers = summary.len(),
                "data-quality exceptions found"
            );
        }

        Ok(PipelineOutput {
            aggregated,
            exceptions,
            quality_summary: summary.into_values().collect(),
            batches: batches.len(),
            validated_rows: validated.len(),
            valid_rows: valid.len(),
        })
    }

    /// Convert upstream batches, then [`process`](Self::process) them.
    pub fn process_raw(&self, batches: Vec<RawBatch>) -> Result<PipelineOutput, CoreError> {
        let tables = batches
            .into_iter()
            .map(RawBatch::into_records)
            .collect::<Result<Vec<_>, _>>()?;
        self.process(&tables)
    }

    /// Fetch a trade day from `source`, process it and hand the tables to `sink`.
    pub async fn run_day(
        &self,
        source: &dyn TradeSource,
        sink: &dyn ReportSink,
        trade_date: NaiveDate,
        run_time: &str,
    ) -> Result<(PipelineOutput, SavedReports), CoreError> {
        let tag = RunTag::new(trade_date, run_time)?;
        let batches = source.fetch_trades(trade_date).await?;
        let output = self.process_raw(batches)?;
        let saved = sink.save(&tag, &output)?;

        tracing::info!(
            source = source.name(),
            %trade_date,
            batches = output.batches,
            validated_rows = output.validated_rows,
            valid_rows = output.valid_rows,
            exceptions = output.exceptions.len(),
            buckets = output.aggregated.len(),
            "pipeline run complete"
        );
        Ok((output, saved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(id: &str, rows: &[(&str, &str)]) -> Vec<TradeRecord> {
        rows.iter()
            .map(|&(time, volume)| TradeRecord::new(id, "01/08/2022", Some(time), Some(volume)))
            .collect()
    }

    #[test]
    fn concatenates_batches_before_aggregating() {
        let batches = vec![
            batch("a", &[("00:00", "100"), ("00:05", "200"), ("00:10", "300")]),
            batch("b", &[("00:00", "110"), ("00:05", "220"), ("00:10", "330")]),
        ];
        let output = Pipeline::default().process(&batches).expect("process");

        assert_eq!(output.aggregated, vec![AggregatedBucket::new("23:00", 1260.0)]);
        assert_eq!(output.batches, 2);
        assert_eq!(output.valid_rows, 6);
        assert_eq!(output.validated_rows, 2 * 288);
        assert_eq!(output.exceptions.len(), 2 * 285);
        assert_eq!(output.quality_summary.len(), 2);
        assert_eq!(output.quality_summary[0].id, "a");
        assert_eq!(output.quality_summary[0].missing_time_count, 285);
    }

    #[test]
    fn empty_batch_fails_fast() {
        let err = Pipeline::default()
            .process(&[Vec::new()])
            .expect_err("must fail");
        assert!(matches!(err, CoreError::Validation(ValidationError::EmptyBatch)));
    }

    #[test]
    fn config_defaults_to_london_and_utc() {
        let config = PipelineConfig::default();
        assert_eq!(config.input_zone, Tz::Europe__London);
        assert_eq!(config.output_zone, Tz::UTC);
        assert_eq!(config.run_time, "0000");
    }
}
