//! # PowerPos Core
//!
//! Day-ahead power position reporting: validation, data profiling and
//! hourly aggregation of intraday trade volumes.
//!
//! ## Overview
//!
//! - **Domain models** for raw trade rows, quality flags and hourly buckets
//! - **Canonical 5-minute grid** of the 288 expected trading slots
//! - **Validator** that flags defects instead of rejecting rows
//! - **Aggregator** that buckets valid volumes by hour across time zones
//! - **Trade sources** and a **report sink** at the pipeline edges
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`aggregator`] | Hourly bucketing with input/output zone conversion |
//! | [`batch`] | Column-oriented upstream batches |
//! | [`domain`] | Row models, run tag and zoned timestamps |
//! | [`error`] | Core error types |
//! | [`grid`] | Canonical 5-minute slot grid |
//! | [`pipeline`] | End-to-end orchestration |
//! | [`quality`] | Valid/exception projections and per-id summary |
//! | [`sink`] | CSV persistence of the result tables |
//! | [`sources`] | Trade source trait and implementations |
//! | [`validator`] | Per-row quality flags and missing-slot synthesis |
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────┐   ┌─────────────┐   ┌────────────┐
//! │ TradeSource  │──▶│ RawBatch  │──▶│  Validator  │──▶│ Aggregator │
//! └──────────────┘   └───────────┘   └──────┬──────┘   └─────┬──────┘
//!                                           │                │
//!                                    quality summary         │
//!                                           ▼                ▼
//!                                    ┌──────────────────────────┐
//!                                    │        ReportSink        │
//!                                    └──────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use powerpos_core::{CsvReportSink, Pipeline, PipelineConfig, SimulatedTradeSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = Pipeline::new(&PipelineConfig::from_env()?);
//!     let source = SimulatedTradeSource::with_seed(7);
//!     let sink = CsvReportSink::new("reports");
//!     let date = powerpos_core::parse_trade_date("01/08/2022")?;
//!
//!     let (output, saved) = pipeline.run_day(&source, &sink, date, "0000").await?;
//!     println!("{} buckets written to {}", output.aggregated.len(), saved.aggregated.display());
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod batch;
pub mod domain;
pub mod error;
pub mod grid;
pub mod pipeline;
pub mod quality;
pub mod sink;
pub mod sources;
pub mod validator;

pub use aggregator::{Aggregator, DEFAULT_INPUT_ZONE, DEFAULT_OUTPUT_ZONE};
pub use batch::{ColumnData, RawBatch};
pub use domain::{
    parse_trade_date, parse_zone, AggregatedBucket, QualityFlag, QualityFlags, QualitySummary,
    RunTag, TradeRecord, ValidatedRecord, ZonedTimestamp, TRADE_DATE_FORMAT,
};
pub use error::{AggregationError, CoreError, ValidationError};
pub use grid::{canonical_slots, SlotGrid, SLOT_COUNT};
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutput, INPUT_ZONE_ENV, OUTPUT_ZONE_ENV};
pub use quality::{exception_rows, quality_summary, valid_rows};
pub use sink::{CsvReportSink, ReportSink, SavedReports, SinkError};
pub use sources::{
    JsonFileTradeSource, SimulatedTradeSource, SourceError, SourceErrorKind, TradeSource,
};
pub use validator::Validator;
