//! Row-level and grid-level validation of trade batches.
//!
//! Every defect found in the data becomes a flag on a row; the only errors
//! returned are structural ones about the batch itself.

use std::collections::HashMap;

use crate::domain::{parse_hh_mm, QualityFlags, TradeRecord, ValidatedRecord};
use crate::grid::SlotGrid;
use crate::ValidationError;

/// `time` is absent or not strict `HH:MM`.
pub fn is_invalid_time_format(time: Option<&str>) -> bool {
    time.and_then(parse_hh_mm).is_none()
}

/// Numeric value of a raw volume. Sign and magnitude are unconstrained.
pub fn parse_volume(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// `volume` is absent, blank, or not a finite number.
pub fn is_invalid_volume(volume: Option<&str>) -> bool {
    volume.and_then(parse_volume).is_none()
}

/// Flags trade batches against the canonical slot grid.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    grid: &'static SlotGrid,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            grid: SlotGrid::canonical(),
        }
    }
}

struct SlotCoverage<'a> {
    id: &'a str,
    date: &'a str,
    seen: Vec<bool>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-row flags. `missing_time` is never set for a real row.
    pub fn flag(&self, record: &TradeRecord) -> QualityFlags {
        QualityFlags {
            invalid_time_format: is_invalid_time_format(record.time()),
            invalid_volume: is_invalid_volume(record.volume()),
            unexpected_time: !record
                .time()
                .is_some_and(|time| self.grid.contains(time)),
            missing_time: false,
        }
    }

    /// Flag every input row, then append one synthesized row per
    /// identifier, date and absent slot.
    ///
    /// Input rows keep their order. Synthesized rows follow, grouped by
    /// `(id, date)` in order of first appearance, slots ascending.
    pub fn validate(
        &self,
        batch: &[TradeRecord],
    ) -> Result<Vec<ValidatedRecord>, ValidationError> {
        if batch.is_empty() {
            return Err(ValidationError::EmptyBatch);
        }

        let mut rows: Vec<ValidatedRecord> = batch
            .iter()
            .map(|record| ValidatedRecord::new(record.clone(), self.flag(record)))
            .collect();
        let present = rows.len();
        rows.extend(self.missing_slots(batch));

        tracing::debug!(
            rows = present,
            synthesized = rows.len() - present,
            "validated batch"
        );
        Ok(rows)
    }

    /// Rows for canonical slots that no record of an `(id, date)` pair
    /// occupies. Each synthesized row carries the date of its own group.
    pub fn missing_slots(&self, batch: &[TradeRecord]) -> Vec<ValidatedRecord> {
        let mut groups: Vec<SlotCoverage<'_>> = Vec::new();
        let mut by_key: HashMap<(&str, &str), usize> = HashMap::new();

        for record in batch {
            let key = (record.id.as_str(), record.date.as_str());
            let index = *by_key.entry(key).or_insert_with(|| {
                groups.push(SlotCoverage {
                    id: record.id.as_str(),
                    date: record.date.as_str(),
                    seen: vec![false; self.grid.slots().len()],
                });
                groups.len() - 1
            });

            if let Some(position) = record.time().and_then(|time| self.grid.position(time)) {
                groups[index].seen[position] = true;
            }
        }

        let mut missing = Vec::new();
        for group in groups {
            for (slot, seen) in self.grid.slots().iter().zip(group.seen) {
                if !seen {
                    missing.push(ValidatedRecord::new(
                        TradeRecord::new(group.id, group.date, Some(slot), None),
                        QualityFlags::MISSING_SLOT,
                    ));
                }
            }
        }
        missing
    }
}
