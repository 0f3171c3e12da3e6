use std::future::Future;
use std::pin::Pin;

use chrono::NaiveDate;
use serde_json::{json, Value};
use uuid::Builder;

use super::{SourceError, TradeSource};
use crate::batch::{ColumnData, RawBatch, DATE_COLUMN, ID_COLUMN, TIME_COLUMN, VOLUME_COLUMN};
use crate::domain::TRADE_DATE_FORMAT;
use crate::grid::canonical_slots;

const DEFAULT_MAX_POSITIONS: usize = 101;
const VOLUME_POOL: u32 = 500;
const BLANK_ONE_IN: u32 = 15;

/// Generates a random day of open positions, one batch per position.
///
/// Every position covers the full grid with distinct volumes drawn from
/// `0..500`; each time and each volume is independently blanked with a
/// 1-in-15 chance, so the output exercises every validator flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedTradeSource {
    seed: Option<u64>,
    max_positions: usize,
}

impl Default for SimulatedTradeSource {
    fn default() -> Self {
        Self {
            seed: None,
            max_positions: DEFAULT_MAX_POSITIONS,
        }
    }
}

impl SimulatedTradeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic output for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn with_max_positions(self, max_positions: usize) -> Self {
        Self {
            max_positions: max_positions.max(1),
            ..self
        }
    }

    fn position(rng: &mut fastrand::Rng, trade_date: NaiveDate) -> RawBatch {
        let slots = canonical_slots();

        let mut pool: Vec<u32> = (0..VOLUME_POOL).collect();
        rng.shuffle(&mut pool);

        let times: Vec<Value> = slots
            .iter()
            .map(|slot| blank_or(rng, json!(slot)))
            .collect();
        let volumes: Vec<Value> = pool
            .into_iter()
            .take(slots.len())
            .map(|volume| blank_or(rng, json!(volume)))
            .collect();
        let id = Builder::from_random_bytes(rng.u128(..).to_le_bytes())
            .into_uuid()
            .simple()
            .to_string();

        RawBatch::new()
            .with_column(
                DATE_COLUMN,
                ColumnData::Scalar(json!(trade_date.format(TRADE_DATE_FORMAT).to_string())),
            )
            .with_column(TIME_COLUMN, ColumnData::Values(times))
            .with_column(VOLUME_COLUMN, ColumnData::Values(volumes))
            .with_column(ID_COLUMN, ColumnData::Scalar(json!(id)))
    }
}

fn blank_or(rng: &mut fastrand::Rng, value: Value) -> Value {
    if rng.u32(0..BLANK_ONE_IN) == 1 {
        Value::Null
    } else {
        value
    }
}

impl TradeSource for SimulatedTradeSource {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn fetch_trades<'a>(
        &'a self,
        trade_date: NaiveDate,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawBatch>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let mut rng = match self.seed {
                Some(seed) => fastrand::Rng::with_seed(seed),
                None => fastrand::Rng::new(),
            };
            let positions = rng.usize(1..=self.max_positions);
            tracing::info!(
                source = self.name(),
                %trade_date,
                positions,
                "generated open trade positions"
            );

            Ok((0..positions)
                .map(|_| Self::position(&mut rng, trade_date))
                .collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 8, 1).expect("date")
    }

    #[tokio::test]
    async fn seeded_output_is_deterministic() {
        let first = SimulatedTradeSource::with_seed(7)
            .fetch_trades(trade_date())
            .await
            .expect("fetch");
        let second = SimulatedTradeSource::with_seed(7)
            .fetch_trades(trade_date())
            .await
            .expect("fetch");
        assert_eq!(first, second);
        assert!((1..=DEFAULT_MAX_POSITIONS).contains(&first.len()));
    }

    #[tokio::test]
    async fn positions_cover_the_grid_with_distinct_volumes() {
        let batches = SimulatedTradeSource::with_seed(42)
            .with_max_positions(3)
            .fetch_trades(trade_date())
            .await
            .expect("fetch");

        for batch in batches {
            let records = batch.into_records().expect("records");
            assert_eq!(records.len(), 288);
            assert!(records.iter().all(|record| record.date == "01/08/2022"));
            assert_eq!(records[0].id.len(), 32);

            let mut volumes: Vec<&str> = records.iter().filter_map(|r| r.volume()).collect();
            let present = volumes.len();
            volumes.sort_unstable();
            volumes.dedup();
            assert_eq!(volumes.len(), present);
        }
    }
}
