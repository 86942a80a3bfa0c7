//! Period string parsing.
//!
//! EIA returns hourly periods in a few shapes depending on the requested
//! frequency:
//!
//! - `2023-06-24T05`        UTC hourly
//! - `2023-06-24T05-04`     local hourly with a trailing UTC offset
//! - `2023-06-24T05:00:00-04:00`  full RFC 3339 (saved payloads, other tools)
//!
//! Every accepted form is converted into the fixed grid offset.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::domain::{Timestamp, grid_offset};

/// Length of the `YYYY-MM-DDTHH` prefix.
const HOUR_PREFIX_LEN: usize = 13;

/// `%#z` takes `-04`, `-0400` and `-04:00`.
const HOUR_WITH_OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M%#z";

pub fn parse_period(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&grid_offset()));
    }

    let prefix = raw.get(..HOUR_PREFIX_LEN)?;
    let naive = parse_hour_prefix(prefix)?;
    let suffix = raw.get(HOUR_PREFIX_LEN..)?;

    if suffix.is_empty() {
        return Some(Utc.from_utc_datetime(&naive).with_timezone(&grid_offset()));
    }

    DateTime::parse_from_str(&format!("{prefix}:00{suffix}"), HOUR_WITH_OFFSET_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&grid_offset()))
}

fn parse_hour_prefix(prefix: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&format!("{prefix}:00"), "%Y-%m-%dT%H:%M").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32) -> Timestamp {
        grid_offset().with_ymd_and_hms(2023, 6, 24, hour, 0, 0).unwrap()
    }

    #[test]
    fn local_hourly_form_keeps_its_hour() {
        assert_eq!(parse_period("2023-06-24T05-04"), Some(at(5)));
    }

    #[test]
    fn other_offsets_are_converted_to_grid_offset() {
        // 05:00 at -05:00 is 06:00 at -04:00.
        assert_eq!(parse_period("2023-06-24T05-05"), Some(at(6)));
        assert_eq!(parse_period("2023-06-24T05-05:00"), Some(at(6)));
        assert_eq!(parse_period("2023-06-24T05-0500"), Some(at(6)));
        // 05:00 at +05:30 is 19:30 the day before at -04:00.
        let expected = grid_offset().with_ymd_and_hms(2023, 6, 23, 19, 30, 0).unwrap();
        assert_eq!(parse_period("2023-06-24T05+05:30"), Some(expected));
    }

    #[test]
    fn utc_hourly_form_is_read_as_utc() {
        // 09:00Z == 05:00-04:00
        assert_eq!(parse_period("2023-06-24T09"), Some(at(5)));
    }

    #[test]
    fn rfc3339_is_accepted() {
        assert_eq!(parse_period("2023-06-24T05:00:00-04:00"), Some(at(5)));
        assert_eq!(parse_period("2023-06-24T09:00:00Z"), Some(at(5)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_period(""), None);
        assert_eq!(parse_period("yesterday"), None);
        assert_eq!(parse_period("2023-06-24T25"), None);
        assert_eq!(parse_period("2023-06-24T05x04"), None);
        assert_eq!(parse_period("2023-06-24T05-4"), None);
        assert_eq!(parse_period("2023-06-24T05-04junk"), None);
    }
}
