use thiserror::Error;

use crate::sink::SinkError;
use crate::sources::SourceError;

/// Structural and contract errors exposed by `powerpos-core`.
///
/// Data-quality defects inside a batch are never reported here; they become
/// flags on the validated rows.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("batch must contain at least one record")]
    EmptyBatch,
    #[error("batch is missing required column '{column}'")]
    MissingColumn { column: &'static str },
    #[error("column '{column}' has {len} values, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        len: usize,
        expected: usize,
    },
    #[error("column '{column}' has no value at row {row}")]
    MissingValue { column: &'static str, row: usize },

    #[error("trade date must be DD/MM/YYYY: '{value}'")]
    InvalidTradeDate { value: String },
    #[error("run time tag must be HHMM: '{value}'")]
    InvalidRunTime { value: String },
    #[error("unknown time zone '{value}', expected an IANA name such as Europe/London")]
    UnknownTimeZone { value: String },
}

/// Defects that can only surface once rows reach the aggregator.
///
/// Rows that went through the validator and the valid-row projection never
/// trigger these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AggregationError {
    #[error("row {id}@{time} has non-numeric volume '{volume}'")]
    NonNumericVolume {
        id: String,
        time: String,
        volume: String,
    },
    #[error("row {id} has no volume")]
    MissingVolume { id: String },
    #[error("row {id} has unparseable date '{date}'")]
    InvalidDate { id: String, date: String },
    #[error("row {id} has unparseable time '{time}'")]
    InvalidTime { id: String, time: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}
