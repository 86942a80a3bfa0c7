//! Shared domain types.
//!
//! Records are plain owned values so a series can be built once by the
//! normalizer and then handed around by reference without further mutation.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Seconds west of UTC for the grid's reporting offset (UTC-4, no DST).
pub const GRID_OFFSET_WEST_SECS: i32 = 4 * 3600;

/// Hour-resolution timestamp in a fixed offset.
pub type Timestamp = DateTime<FixedOffset>;

/// The fixed `-04:00` offset every period is expressed in.
pub fn grid_offset() -> FixedOffset {
    FixedOffset::west_opt(GRID_OFFSET_WEST_SECS).unwrap_or_else(|| Utc.fix())
}

/// One observation for a single hourly period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandRecord {
    pub period: Timestamp,
    /// Balancing authority / region code (e.g. `MIDA`).
    pub respondent_id: String,
    pub respondent_name: String,
    /// Measurement type code (e.g. `D` for demand).
    pub category: String,
    pub category_name: String,
    pub value: i64,
    pub value_units: String,
}

/// Hourly records in ascending `period` order.
///
/// Index adjacency is treated as time adjacency; the normalizer rejects
/// payloads with gaps before a series is built from API data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandSeries {
    records: Vec<DemandRecord>,
}

impl DemandSeries {
    pub fn new(records: Vec<DemandRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[DemandRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DemandRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DemandRecord> {
        self.records.iter()
    }

    /// Demand values in series order.
    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.records.iter().map(|r| r.value)
    }

    pub fn first_period(&self) -> Option<Timestamp> {
        self.records.first().map(|r| r.period)
    }

    pub fn last_period(&self) -> Option<Timestamp> {
        self.records.last().map(|r| r.period)
    }

    /// Units label shared by the series (taken from the first record).
    pub fn value_units(&self) -> Option<&str> {
        self.records.first().map(|r| r.value_units.as_str())
    }
}

impl<'a> IntoIterator for &'a DemandSeries {
    type Item = &'a DemandRecord;
    type IntoIter = std::slice::Iter<'a, DemandRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Sampling frequency requested from the data API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    /// Hourly periods in UTC.
    Hourly,
    /// Hourly periods in the respondent's local time.
    LocalHourly,
}

impl Frequency {
    /// Query-string value.
    pub fn as_param(self) -> &'static str {
        match self {
            Frequency::Hourly => "hourly",
            Frequency::LocalHourly => "local-hourly",
        }
    }
}

/// Which data column to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Value,
}

impl DataType {
    pub fn as_param(self) -> &'static str {
        match self {
            DataType::Value => "value",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(hour: u32, value: i64) -> DemandRecord {
        DemandRecord {
            period: grid_offset()
                .with_ymd_and_hms(2023, 6, 24, hour, 0, 0)
                .unwrap(),
            respondent_id: "MIDA".to_string(),
            respondent_name: "Mid-Atlantic".to_string(),
            category: "D".to_string(),
            category_name: "Demand".to_string(),
            value,
            value_units: "megawatthours".to_string(),
        }
    }

    #[test]
    fn grid_offset_is_four_hours_behind_utc() {
        assert_eq!(grid_offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn series_exposes_values_and_bounds_in_order() {
        let series = DemandSeries::new(vec![record(0, 5), record(1, 7), record(2, 3)]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.values().collect::<Vec<_>>(), vec![5, 7, 3]);
        assert_eq!(series.first_period(), Some(record(0, 0).period));
        assert_eq!(series.last_period(), Some(record(2, 0).period));
        assert_eq!(series.value_units(), Some("megawatthours"));
    }

    #[test]
    fn frequency_params_match_api_spelling() {
        assert_eq!(Frequency::Hourly.as_param(), "hourly");
        assert_eq!(Frequency::LocalHourly.as_param(), "local-hourly");
        assert_eq!(DataType::Value.as_param(), "value");
    }
}
