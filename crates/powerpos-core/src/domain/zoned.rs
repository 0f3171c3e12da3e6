use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::ValidationError;

/// Parse an IANA time zone name such as `Europe/London`.
pub fn parse_zone(name: &str) -> Result<Tz, ValidationError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ValidationError::UnknownTimeZone {
            value: name.to_owned(),
        })
}

/// An absolute instant paired with the zone used to render it as wall-clock text.
///
/// Relabelling only swaps the zone and never moves the instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedTimestamp {
    instant: DateTime<Utc>,
    zone: Tz,
}

impl ZonedTimestamp {
    /// Interpret a naive wall-clock reading in `zone`.
    ///
    /// A reading inside an autumn fold resolves to its earlier occurrence. A
    /// reading inside a spring gap is taken with the offset in force before
    /// the transition.
    pub fn from_wall_clock(naive: NaiveDateTime, zone: Tz) -> Self {
        let instant = match zone.from_local_datetime(&naive) {
            LocalResult::Single(local) => local.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => {
                let offset = offset_before_gap(naive, zone);
                (naive - Duration::seconds(i64::from(offset))).and_utc()
            }
        };
        Self { instant, zone }
    }

    pub fn wall_clock(&self) -> DateTime<Tz> {
        self.instant.with_timezone(&self.zone)
    }

    /// Same instant, rendered in another zone.
    pub fn in_zone(&self, zone: Tz) -> Self {
        Self {
            instant: self.instant,
            zone,
        }
    }

    pub fn format_hh_mm(&self) -> String {
        self.wall_clock().format("%H:%M").to_string()
    }
}

// Transitions are months apart, so a day earlier is always on the old offset.
fn offset_before_gap(naive: NaiveDateTime, zone: Tz) -> i32 {
    let day_before = naive - Duration::hours(24);
    zone.offset_from_utc_datetime(&day_before).fix().local_minus_utc()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn naive(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(hh, mm, 0))
            .expect("valid wall clock")
    }

    #[test]
    fn parses_iana_zone() {
        assert_eq!(parse_zone(" Europe/London ").expect("zone"), Tz::Europe__London);
        let err = parse_zone("Mars/Olympus").expect_err("must fail");
        assert!(matches!(err, ValidationError::UnknownTimeZone { .. }));
    }

    #[test]
    fn localizes_summer_wall_clock_and_relabels() {
        let ts = ZonedTimestamp::from_wall_clock(naive(2022, 8, 1, 0, 10), Tz::Europe__London);
        assert_eq!(ts.format_hh_mm(), "00:10");
        assert_eq!(ts.in_zone(Tz::UTC).format_hh_mm(), "23:10");
    }

    #[test]
    fn fold_resolves_to_earlier_occurrence() {
        let ts = ZonedTimestamp::from_wall_clock(naive(2022, 10, 30, 1, 30), Tz::Europe__London);
        assert_eq!(ts.in_zone(Tz::UTC).format_hh_mm(), "00:30");
    }

    #[test]
    fn gap_uses_offset_before_transition() {
        let ts = ZonedTimestamp::from_wall_clock(naive(2022, 3, 27, 1, 5), Tz::Europe__London);
        assert_eq!(ts.in_zone(Tz::UTC).format_hh_mm(), "01:05");
        assert_eq!(ts.format_hh_mm(), "02:05");
    }
}
