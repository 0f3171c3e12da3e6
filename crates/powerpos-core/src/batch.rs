//! Conversion of upstream column mappings into trade record tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::TradeRecord;
use crate::ValidationError;

pub const ID_COLUMN: &str = "id";
pub const DATE_COLUMN: &str = "date";
pub const TIME_COLUMN: &str = "time";
pub const VOLUME_COLUMN: &str = "volume";

/// Values of one upstream column: a per-row array, or a scalar repeated on
/// every row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnData {
    Values(Vec<Value>),
    Scalar(Value),
}

impl ColumnData {
    fn len(&self) -> Option<usize> {
        match self {
            Self::Values(values) => Some(values.len()),
            Self::Scalar(_) => None,
        }
    }

    fn get(&self, row: usize) -> &Value {
        match self {
            Self::Values(values) => values.get(row).unwrap_or(&Value::Null),
            Self::Scalar(value) => value,
        }
    }
}

/// One upstream batch: column name to column values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawBatch {
    columns: BTreeMap<String, ColumnData>,
}

impl RawBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, name: impl Into<String>, data: ColumnData) -> Self {
        self.columns.insert(name.into(), data);
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns.get(name)
    }

    /// Number of rows implied by the array columns.
    pub fn row_count(&self) -> Result<usize, ValidationError> {
        let mut expected: Option<usize> = None;
        for (name, data) in &self.columns {
            let Some(len) = data.len() else { continue };
            match expected {
                None => expected = Some(len),
                Some(expected) if expected != len => {
                    return Err(ValidationError::ColumnLengthMismatch {
                        column: name.clone(),
                        len,
                        expected,
                    });
                }
                Some(_) => {}
            }
        }
        Ok(expected.unwrap_or(0))
    }

    /// Build the record table, failing fast on structural defects.
    ///
    /// Malformed `time`/`volume` values are carried through as text so the
    /// validator can flag them; only `id` and `date` must be present.
    pub fn into_records(self) -> Result<Vec<TradeRecord>, ValidationError> {
        let id = self.required(ID_COLUMN)?;
        let date = self.required(DATE_COLUMN)?;
        let time = self.required(TIME_COLUMN)?;
        let volume = self.required(VOLUME_COLUMN)?;
        let rows = self.row_count()?;
        if rows == 0 {
            return Err(ValidationError::EmptyBatch);
        }

        (0..rows)
            .map(|row| {
                Ok(TradeRecord {
                    id: text(id.get(row)).ok_or(ValidationError::MissingValue {
                        column: ID_COLUMN,
                        row,
                    })?,
                    date: text(date.get(row)).ok_or(ValidationError::MissingValue {
                        column: DATE_COLUMN,
                        row,
                    })?,
                    time: text(time.get(row)),
                    volume: text(volume.get(row)),
                })
            })
            .collect()
    }

    fn required(&self, column: &'static str) -> Result<&ColumnData, ValidationError> {
        self.columns
            .get(column)
            .ok_or(ValidationError::MissingColumn { column })
    }
}

// Nulls are absent; numbers and booleans keep their JSON spelling.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn upstream() -> RawBatch {
        serde_json::from_value(json!({
            "date": "01/08/2022",
            "time": ["00:00", null, "00:10"],
            "volume": [312, "xyz", null],
            "id": "07d01a7a08c646a68a3cc71b72c337c8"
        }))
        .expect("raw batch")
    }

    #[test]
    fn broadcasts_scalar_columns() {
        let records = upstream().into_records().expect("records");
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|record| record.date == "01/08/2022"));
        assert_eq!(records[1].time, None);
        assert_eq!(records[0].volume.as_deref(), Some("312"));
        assert_eq!(records[1].volume.as_deref(), Some("xyz"));
        assert_eq!(records[2].volume, None);
    }

    #[test]
    fn rejects_missing_column() {
        let batch = RawBatch::new()
            .with_column("id", ColumnData::Scalar(json!("a")))
            .with_column("date", ColumnData::Scalar(json!("01/08/2022")))
            .with_column("time", ColumnData::Values(vec![json!("00:00")]));
        let err = batch.into_records().expect_err("must fail");
        assert_eq!(err, ValidationError::MissingColumn { column: "volume" });
    }

    #[test]
    fn rejects_ragged_columns() {
        let batch = upstream().with_column("volume", ColumnData::Values(vec![json!(1)]));
        let err = batch.into_records().expect_err("must fail");
        assert!(matches!(err, ValidationError::ColumnLengthMismatch { .. }));
    }

    #[test]
    fn rejects_missing_identifier_value() {
        let batch = upstream().with_column(
            "id",
            ColumnData::Values(vec![json!("a"), Value::Null, json!("a")]),
        );
        let err = batch.into_records().expect_err("must fail");
        assert_eq!(err, ValidationError::MissingValue { column: "id", row: 1 });
    }

    #[test]
    fn all_scalar_batch_is_empty() {
        let batch = RawBatch::new()
            .with_column("id", ColumnData::Scalar(json!("a")))
            .with_column("date", ColumnData::Scalar(json!("01/08/2022")))
            .with_column("time", ColumnData::Scalar(json!("00:00")))
            .with_column("volume", ColumnData::Scalar(json!(1)));
        assert_eq!(batch.into_records().expect_err("must fail"), ValidationError::EmptyBatch);
    }
}
