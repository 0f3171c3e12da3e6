use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// One raw row of an upstream batch.
///
/// `time` and `volume` keep their upstream text untouched so that malformed
/// values can be flagged and reported verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: String,
    pub date: String,
    pub time: Option<String>,
    pub volume: Option<String>,
}

impl TradeRecord {
    pub fn new(
        id: impl Into<String>,
        date: impl Into<String>,
        time: Option<&str>,
        volume: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            time: time.map(str::to_owned),
            volume: volume.map(str::to_owned),
        }
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    pub fn volume(&self) -> Option<&str> {
        self.volume.as_deref()
    }
}

/// Independent data-quality predicates attached to a validated row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityFlag {
    InvalidTimeFormat,
    InvalidVolume,
    UnexpectedTime,
    MissingTime,
}

impl QualityFlag {
    /// Column order used by every tabular rendering of the flags.
    pub const ALL: [Self; 4] = [
        Self::InvalidTimeFormat,
        Self::InvalidVolume,
        Self::UnexpectedTime,
        Self::MissingTime,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidTimeFormat => "invalid_time_format",
            Self::InvalidVolume => "invalid_volume",
            Self::UnexpectedTime => "unexpected_time",
            Self::MissingTime => "missing_time",
        }
    }
}

impl Display for QualityFlag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-size record of the four quality flags. Several may be set at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualityFlags {
    pub invalid_time_format: bool,
    pub invalid_volume: bool,
    pub unexpected_time: bool,
    pub missing_time: bool,
}

impl QualityFlags {
    pub const CLEAN: Self = Self {
        invalid_time_format: false,
        invalid_volume: false,
        unexpected_time: false,
        missing_time: false,
    };

    /// Flags carried by a row synthesized for an absent grid slot.
    pub const MISSING_SLOT: Self = Self {
        missing_time: true,
        ..Self::CLEAN
    };

    pub const fn get(self, flag: QualityFlag) -> bool {
        match flag {
            QualityFlag::InvalidTimeFormat => self.invalid_time_format,
            QualityFlag::InvalidVolume => self.invalid_volume,
            QualityFlag::UnexpectedTime => self.unexpected_time,
            QualityFlag::MissingTime => self.missing_time,
        }
    }

    pub const fn is_clean(self) -> bool {
        !(self.invalid_time_format
            || self.invalid_volume
            || self.unexpected_time
            || self.missing_time)
    }

    pub fn raised(self) -> impl Iterator<Item = QualityFlag> {
        QualityFlag::ALL.into_iter().filter(move |flag| self.get(*flag))
    }
}

/// A trade record together with its quality flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedRecord {
    #[serde(flatten)]
    pub record: TradeRecord,
    #[serde(flatten)]
    pub flags: QualityFlags,
}

impl ValidatedRecord {
    pub fn new(record: TradeRecord, flags: QualityFlags) -> Self {
        Self { record, flags }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn time(&self) -> Option<&str> {
        self.record.time()
    }

    pub const fn is_valid(&self) -> bool {
        self.flags.is_clean()
    }

    pub const fn is_synthesized(&self) -> bool {
        self.flags.missing_time
    }
}

/// Per-identifier data-quality roll-up.
///
/// `time_min`/`time_max` are string extremes, so malformed values such as
/// `"25:05"` participate in the ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualitySummary {
    pub id: String,
    pub missing_time_count: usize,
    pub invalid_time_format_count: usize,
    pub unexpected_time_count: usize,
    pub invalid_volume_count: usize,
    pub time_min: Option<String>,
    pub time_max: Option<String>,
}

impl QualitySummary {
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            missing_time_count: 0,
            invalid_time_format_count: 0,
            unexpected_time_count: 0,
            invalid_volume_count: 0,
            time_min: None,
            time_max: None,
        }
    }

    pub const fn count(&self, flag: QualityFlag) -> usize {
        match flag {
            QualityFlag::InvalidTimeFormat => self.invalid_time_format_count,
            QualityFlag::InvalidVolume => self.invalid_volume_count,
            QualityFlag::UnexpectedTime => self.unexpected_time_count,
            QualityFlag::MissingTime => self.missing_time_count,
        }
    }
}

/// Hourly volume total labelled with the output-zone hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedBucket {
    #[serde(rename = "Local Time")]
    pub local_time: String,
    #[serde(rename = "Volume")]
    pub volume: f64,
}

impl AggregatedBucket {
    pub fn new(local_time: impl Into<String>, volume: f64) -> Self {
        Self {
            local_time: local_time.into(),
            volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_not_mutually_exclusive() {
        let flags = QualityFlags {
            invalid_time_format: true,
            unexpected_time: true,
            ..QualityFlags::CLEAN
        };
        assert!(!flags.is_clean());
        assert_eq!(
            flags.raised().collect::<Vec<_>>(),
            vec![QualityFlag::InvalidTimeFormat, QualityFlag::UnexpectedTime]
        );
    }

    #[test]
    fn validated_record_serializes_flat() {
        let row = ValidatedRecord::new(
            TradeRecord::new("abc", "01/08/2022", Some("00:00"), Some("312")),
            QualityFlags::CLEAN,
        );
        let value = serde_json::to_value(&row).expect("serialize");
        assert_eq!(value["time"], "00:00");
        assert_eq!(value["missing_time"], false);
    }
}
