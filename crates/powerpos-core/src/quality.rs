//! Read-only projections over a validated table.

use std::collections::BTreeMap;

use crate::domain::{QualitySummary, ValidatedRecord};

/// Rows with no quality flag raised.
pub fn valid_rows(table: &[ValidatedRecord]) -> Vec<ValidatedRecord> {
    table.iter().filter(|row| row.is_valid()).cloned().collect()
}

/// Rows with at least one quality flag raised; the exact complement of
/// [`valid_rows`].
pub fn exception_rows(table: &[ValidatedRecord]) -> Vec<ValidatedRecord> {
    table.iter().filter(|row| !row.is_valid()).cloned().collect()
}

/// Flag counts and `time` extremes per identifier, keyed and ordered by id.
pub fn quality_summary(table: &[ValidatedRecord]) -> BTreeMap<String, QualitySummary> {
    let mut summaries: BTreeMap<String, QualitySummary> = BTreeMap::new();

    for row in table {
        let summary = summaries
            .entry(row.id().to_owned())
            .or_insert_with(|| QualitySummary::empty(row.id()));

        summary.missing_time_count += usize::from(row.flags.missing_time);
        summary.invalid_time_format_count += usize::from(row.flags.invalid_time_format);
        summary.unexpected_time_count += usize::from(row.flags.unexpected_time);
        summary.invalid_volume_count += usize::from(row.flags.invalid_volume);

        if let Some(time) = row.time() {
            if summary.time_min.as_deref().map_or(true, |min| time < min) {
                summary.time_min = Some(time.to_owned());
            }
            if summary.time_max.as_deref().map_or(true, |max| time > max) {
                summary.time_max = Some(time.to_owned());
            }
        }
    }

    summaries
}
