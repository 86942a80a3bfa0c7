//! Export a normalized series to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::DemandSeries;
use crate::error::{AppError, EXIT_CONFIG};
use crate::select::WindowChoice;

pub const SERIES_CSV_HEADER: &str =
    "period,respondent,respondent_name,category,category_name,value,value_units,in_window";

/// Write the series to `path`, flagging rows inside `window` when given.
pub fn write_series_csv(
    path: &Path,
    series: &DemandSeries,
    window: Option<&WindowChoice>,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    write_series_csv_to(&mut writer, series, window)
        .and_then(|_| writer.flush())
        .map_err(|e| AppError::new(EXIT_CONFIG, format!("Failed to write export CSV: {e}")))
}

pub fn write_series_csv_to<W: Write>(
    writer: &mut W,
    series: &DemandSeries,
    window: Option<&WindowChoice>,
) -> std::io::Result<()> {
    writeln!(writer, "{SERIES_CSV_HEADER}")?;

    for (i, r) in series.iter().enumerate() {
        let in_window = window
            .map(|w| i >= w.start_index && i < w.start_index + w.window_length)
            .unwrap_or(false);
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{}",
            r.period.to_rfc3339(),
            csv_field(&r.respondent_id),
            csv_field(&r.respondent_name),
            csv_field(&r.category),
            csv_field(&r.category_name),
            r.value,
            csv_field(&r.value_units),
            in_window,
        )?;
    }
    Ok(())
}

/// Quote a field when it contains a delimiter, quote or newline.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DemandRecord, grid_offset};
    use crate::select::find_min_window;
    use chrono::TimeZone;

    fn series(values: &[i64]) -> DemandSeries {
        DemandSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &value)| DemandRecord {
                    period: grid_offset()
                        .with_ymd_and_hms(2023, 6, 24, i as u32, 0, 0)
                        .unwrap(),
                    respondent_id: "MIDA".to_string(),
                    respondent_name: "Mid-Atlantic, Inc".to_string(),
                    category: "D".to_string(),
                    category_name: "Demand".to_string(),
                    value,
                    value_units: "megawatthours".to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn csv_has_header_and_one_row_per_record() {
        let s = series(&[5, 1, 1, 8]);
        let w = find_min_window(&s, 2).unwrap();

        let mut out = Vec::new();
        write_series_csv_to(&mut out, &s, Some(&w)).unwrap();
        let csv = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], SERIES_CSV_HEADER);
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[1],
            "2023-06-24T00:00:00-04:00,MIDA,\"Mid-Atlantic, Inc\",D,Demand,5,megawatthours,false"
        );
        assert!(lines[2].ends_with(",1,megawatthours,true"));
        assert!(lines[3].ends_with(",1,megawatthours,true"));
        assert!(lines[4].ends_with(",8,megawatthours,false"));
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(csv_field("a\"b"), "\"a\"\"b\"");
        assert_eq!(csv_field("plain"), "plain");
    }
}
