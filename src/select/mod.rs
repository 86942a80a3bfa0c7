//! Minimum-demand window selection.
//!
//! Given an hourly `DemandSeries` and a run length `w`, pick the contiguous
//! `w`-hour window with the smallest total demand. A single running-sum pass
//! covers every start index in O(n); the earliest window wins ties.

use chrono::Duration;

use crate::domain::{DemandSeries, Timestamp};
use crate::error::CoreError;

/// The winning window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowChoice {
    pub start_index: usize,
    /// Period of the first record in the window.
    pub start: Timestamp,
    /// Exclusive end: `start + window_length` hours.
    pub end: Timestamp,
    pub window_length: usize,
    /// Sum of `value` over the window.
    pub total: i64,
}

impl WindowChoice {
    /// Mean demand per hour over the window.
    pub fn mean(&self) -> f64 {
        self.total as f64 / self.window_length as f64
    }
}

/// Start timestamp of the cheapest `window_length`-hour window.
pub fn select_min_window(series: &DemandSeries, window_length: usize) -> Result<Timestamp, CoreError> {
    find_min_window(series, window_length).map(|choice| choice.start)
}

/// Cheapest `window_length`-hour window with its position and total.
pub fn find_min_window(series: &DemandSeries, window_length: usize) -> Result<WindowChoice, CoreError> {
    let sums = window_sums(series, window_length)?;

    // Strict `<` keeps the earliest start on ties.
    let mut best_index = 0usize;
    let mut best_total = sums[0];
    for (index, &total) in sums.iter().enumerate().skip(1) {
        if total < best_total {
            best_index = index;
            best_total = total;
        }
    }

    build_choice(series, window_length, best_index, best_total)
}

/// The `top_n` cheapest windows, cheapest first, earliest first on equal totals.
///
/// Windows may overlap; this is a ranking of start hours, not a schedule.
pub fn rank_windows(
    series: &DemandSeries,
    window_length: usize,
    top_n: usize,
) -> Result<Vec<WindowChoice>, CoreError> {
    let sums = window_sums(series, window_length)?;

    let mut order: Vec<usize> = (0..sums.len()).collect();
    // Stable sort keeps index order among equal totals.
    order.sort_by_key(|&i| sums[i]);

    order
        .into_iter()
        .take(top_n)
        .map(|i| build_choice(series, window_length, i, sums[i]))
        .collect()
}

/// Running sums for every start index `0..=n-w`.
fn window_sums(series: &DemandSeries, window_length: usize) -> Result<Vec<i64>, CoreError> {
    let n = series.len();
    if window_length == 0 || window_length > n {
        return Err(CoreError::InvalidWindow {
            window_length,
            series_len: n,
        });
    }

    let records = series.records();
    let overflow = || CoreError::malformed("window demand total overflows i64");

    let mut running = 0i64;
    for record in &records[..window_length] {
        running = running.checked_add(record.value).ok_or_else(overflow)?;
    }

    let mut sums = Vec::with_capacity(n - window_length + 1);
    sums.push(running);
    for start in 1..=(n - window_length) {
        let leaving = records[start - 1].value;
        let entering = records[start + window_length - 1].value;
        running = running
            .checked_sub(leaving)
            .and_then(|v| v.checked_add(entering))
            .ok_or_else(overflow)?;
        sums.push(running);
    }
    Ok(sums)
}

fn build_choice(
    series: &DemandSeries,
    window_length: usize,
    start_index: usize,
    total: i64,
) -> Result<WindowChoice, CoreError> {
    let start = series
        .get(start_index)
        .map(|r| r.period)
        .ok_or(CoreError::InvalidWindow {
            window_length,
            series_len: series.len(),
        })?;
    let hours = i64::try_from(window_length)
        .map_err(|_| CoreError::malformed("window length does not fit in an hour count"))?;

    Ok(WindowChoice {
        start_index,
        start,
        end: start + Duration::hours(hours),
        window_length,
        total,
    })
}
