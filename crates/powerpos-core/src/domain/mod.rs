//! # Domain Models
//!
//! Row-level types flowing through the power position pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TradeRecord`] | Raw upstream row (`id`, `date`, `time`, `volume`) |
//! | [`ValidatedRecord`] | Raw row plus its [`QualityFlags`] |
//! | [`QualitySummary`] | Per-identifier flag counts and time extremes |
//! | [`AggregatedBucket`] | Hourly volume labelled in the output zone |
//! | [`ZonedTimestamp`] | Absolute instant plus rendering zone |
//! | [`RunTag`] | Trade date and run-time tag naming the output files |
//!
//! Every value here is derived fresh per run and never mutated after
//! construction by the pipeline stages.

mod record;
mod run_tag;
mod zoned;

pub use record::{
    AggregatedBucket, QualityFlag, QualityFlags, QualitySummary, TradeRecord, ValidatedRecord,
};
pub use run_tag::{
    parse_hh_mm, parse_record_date, parse_trade_date, wall_clock, RunTag, TRADE_DATE_FORMAT,
};
pub use zoned::{parse_zone, ZonedTimestamp};
