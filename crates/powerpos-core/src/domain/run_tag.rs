use std::fmt::{Display, Formatter};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Upstream trade date format (day first).
pub const TRADE_DATE_FORMAT: &str = "%d/%m/%Y";

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const FILE_PREFIX: &str = "PowerPosition";

/// Parse a trade date given as `DD/MM/YYYY`.
pub fn parse_trade_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), TRADE_DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidTradeDate {
            value: input.to_owned(),
        }
    })
}

/// Lenient date parse used on record dates: day-first, or ISO as a fallback.
pub fn parse_record_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, TRADE_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT))
        .ok()
}

/// Strict 24-hour `HH:MM`: two zero-padded digits each side of a colon.
pub fn parse_hh_mm(input: &str) -> Option<NaiveTime> {
    let bytes = input.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let digit = |index: usize| {
        bytes[index]
            .is_ascii_digit()
            .then(|| u32::from(bytes[index] - b'0'))
    };
    let hour = digit(0)? * 10 + digit(1)?;
    let minute = digit(3)? * 10 + digit(4)?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Combine a record's date and time into a naive wall-clock reading.
pub fn wall_clock(date: &str, time: &str) -> Option<NaiveDateTime> {
    Some(parse_record_date(date)?.and_time(parse_hh_mm(time)?))
}

/// Trade date plus fixed run-time tag naming one set of output files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTag {
    trade_date: NaiveDate,
    run_time: String,
}

impl RunTag {
    pub const DEFAULT_RUN_TIME: &'static str = "0000";

    pub fn new(trade_date: NaiveDate, run_time: &str) -> Result<Self, ValidationError> {
        let trimmed = run_time.trim();
        let valid = trimmed.len() == 4
            && trimmed.chars().all(|ch| ch.is_ascii_digit())
            && parse_hh_mm(&format!("{}:{}", &trimmed[..2], &trimmed[2..])).is_some();
        if !valid {
            return Err(ValidationError::InvalidRunTime {
                value: run_time.to_owned(),
            });
        }

        Ok(Self {
            trade_date,
            run_time: trimmed.to_owned(),
        })
    }

    pub fn trade_date(&self) -> NaiveDate {
        self.trade_date
    }

    pub fn run_time(&self) -> &str {
        &self.run_time
    }

    /// `PowerPosition_<YYYYMMDD>_<HHMM>`
    pub fn file_stem(&self) -> String {
        format!(
            "{FILE_PREFIX}_{}_{}",
            self.trade_date.format("%Y%m%d"),
            self.run_time
        )
    }
}

impl Display for RunTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.file_stem())
    }
}
