//! Hourly volume aggregation with time-zone relabelling.
//!
//! Rows are bucketed on the wall clock of the input zone first; each bucket
//! start is then localized and rendered in the output zone. Buckets keep the
//! order of their input-zone wall-clock hours, so labels can wrap (`23:00`
//! before `00:00`) and two buckets may share a label across a DST change.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime, Timelike};
use chrono_tz::Tz;

use crate::domain::{
    parse_record_date, parse_zone, wall_clock, AggregatedBucket, ValidatedRecord, ZonedTimestamp,
};
use crate::validator::parse_volume;
use crate::{AggregationError, ValidationError};

pub const DEFAULT_INPUT_ZONE: Tz = Tz::Europe__London;
pub const DEFAULT_OUTPUT_ZONE: Tz = Tz::UTC;

/// Sums valid rows into hourly buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregator {
    input_zone: Tz,
    output_zone: Tz,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_ZONE, DEFAULT_OUTPUT_ZONE)
    }
}

impl Aggregator {
    pub const fn new(input_zone: Tz, output_zone: Tz) -> Self {
        Self {
            input_zone,
            output_zone,
        }
    }

    pub fn from_zone_names(input_zone: &str, output_zone: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(parse_zone(input_zone)?, parse_zone(output_zone)?))
    }

    pub const fn input_zone(&self) -> Tz {
        self.input_zone
    }

    pub const fn output_zone(&self) -> Tz {
        self.output_zone
    }

    /// Start of the input-zone wall-clock hour a row falls in.
    pub fn bucket_start(&self, row: &ValidatedRecord) -> Result<NaiveDateTime, AggregationError> {
        let time = row.time().ok_or_else(|| AggregationError::InvalidTime {
            id: row.id().to_owned(),
            time: String::new(),
        })?;
        let naive = wall_clock(&row.record.date, time).ok_or_else(|| {
            if parse_record_date(&row.record.date).is_none() {
                AggregationError::InvalidDate {
                    id: row.id().to_owned(),
                    date: row.record.date.clone(),
                }
            } else {
                AggregationError::InvalidTime {
                    id: row.id().to_owned(),
                    time: time.to_owned(),
                }
            }
        })?;
        Ok(naive - Duration::minutes(i64::from(naive.minute())))
    }

    /// `HH:MM` label of a bucket starting at `start` on the input wall clock.
    pub fn label(&self, start: NaiveDateTime) -> String {
        ZonedTimestamp::from_wall_clock(start, self.input_zone)
            .in_zone(self.output_zone)
            .format_hh_mm()
    }

    /// Aggregate rows that passed validation.
    ///
    /// Only non-empty buckets are emitted.
    pub fn aggregate(
        &self,
        rows: &[ValidatedRecord],
    ) -> Result<Vec<AggregatedBucket>, AggregationError> {
        let mut buckets: BTreeMap<NaiveDateTime, f64> = BTreeMap::new();

        for row in rows {
            let volume = volume_of(row)?;
            *buckets.entry(self.bucket_start(row)?).or_insert(0.0) += volume;
        }

        let aggregated: Vec<AggregatedBucket> = buckets
            .into_iter()
            .map(|(start, volume)| AggregatedBucket::new(self.label(start), volume))
            .collect();

        tracing::debug!(
            rows = rows.len(),
            buckets = aggregated.len(),
            input_zone = self.input_zone.name(),
            output_zone = self.output_zone.name(),
            "aggregated hourly volumes"
        );
        Ok(aggregated)
    }
}

fn volume_of(row: &ValidatedRecord) -> Result<f64, AggregationError> {
    let raw = row
        .record
        .volume()
        .ok_or_else(|| AggregationError::MissingVolume {
            id: row.id().to_owned(),
        })?;
    parse_volume(raw).ok_or_else(|| AggregationError::NonNumericVolume {
        id: row.id().to_owned(),
        time: row.time().unwrap_or_default().to_owned(),
        volume: raw.to_owned(),
    })
}
