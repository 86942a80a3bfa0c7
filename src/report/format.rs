//! Terminal formatting.
//!
//! We keep formatting code in one place so:
//! - the normalizer/selector stay free of presentation concerns
//! - output changes are localized (important for future snapshot tests)

use crate::device::ChargePlan;
use crate::domain::{DemandSeries, Timestamp};
use crate::normalize::ResponseMeta;
use crate::select::WindowChoice;

/// Width of the demand bar column.
const BAR_WIDTH: usize = 30;

/// Header block: respondent, range, record count and API notes.
pub fn format_series_summary(series: &DemandSeries, meta: &ResponseMeta) -> String {
    let mut out = String::new();

    out.push_str("=== dw - Grid Demand Window ===\n");
    if let Some(first) = series.get(0) {
        out.push_str(&format!(
            "Respondent: {} ({})\n",
            first.respondent_id, first.respondent_name
        ));
        out.push_str(&format!("Measure: {}\n", first.category_name));
    }
    match (series.first_period(), series.last_period()) {
        (Some(a), Some(b)) => out.push_str(&format!(
            "Periods: n={} | {} .. {}\n",
            series.len(),
            fmt_ts(a),
            fmt_ts(b)
        )),
        _ => out.push_str("Periods: n=0\n"),
    }
    if let Some(freq) = &meta.frequency {
        out.push_str(&format!("Frequency: {freq}\n"));
    }
    for w in &meta.warnings {
        out.push_str(&format!("API warning: {w}\n"));
    }
    out
}

/// Hour-by-hour table with a bar column; rows inside `window` are starred.
pub fn format_series_table(series: &DemandSeries, window: Option<&WindowChoice>) -> String {
    let mut out = String::new();
    let units = series.value_units().unwrap_or("");

    out.push_str(&format!("  {:<25} {:>10}  {}\n", "period", "value", units).trim_end().to_string());
    out.push('\n');
    out.push_str(&format!("  {:-<25} {:-<10}  {:-<w$}\n", "", "", "", w = BAR_WIDTH));

    let (lo, hi) = series
        .values()
        .fold((i64::MAX, i64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));

    for (i, r) in series.iter().enumerate() {
        let marker = match window {
            Some(w) if i >= w.start_index && i < w.start_index + w.window_length => '*',
            _ => ' ',
        };
        out.push_str(
            format!(
                "{marker} {:<25} {:>10}  {}\n",
                fmt_ts(r.period),
                r.value,
                bar(r.value, lo, hi)
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// The winning window.
pub fn format_window(choice: &WindowChoice, units: &str) -> String {
    let mut out = String::new();
    out.push_str("Lowest-demand window:\n");
    out.push_str(&format!("- start : {}\n", fmt_ts(choice.start)));
    out.push_str(&format!("- end   : {}\n", fmt_ts(choice.end)));
    out.push_str(&format!("- hours : {}\n", choice.window_length));
    out.push_str(&format!("- total : {} {units}\n", choice.total).trim_end().to_string());
    out.push('\n');
    out.push_str(&format!("- mean  : {:.1} {units}/h\n", choice.mean()).trim_end().to_string());
    out.push('\n');
    out
}

/// Top-N candidate windows.
pub fn format_rankings(ranked: &[WindowChoice]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>4} {:<25} {:>12} {:>10}\n", "rank", "start", "total", "mean"));
    out.push_str(&format!("{:-<4} {:-<25} {:-<12} {:-<10}\n", "", "", "", ""));
    for (i, c) in ranked.iter().enumerate() {
        out.push_str(&format!(
            "{:>4} {:<25} {:>12} {:>10.1}\n",
            i + 1,
            fmt_ts(c.start),
            c.total,
            c.mean()
        ));
    }
    out
}

pub fn format_plan(plan: &ChargePlan) -> String {
    format!(
        "Plan: turn on '{}' at {} for {}h (off at {})\n",
        plan.device_id,
        fmt_ts(plan.start),
        plan.duration_hours,
        fmt_ts(plan.end())
    )
}

fn fmt_ts(ts: Timestamp) -> String {
    ts.format("%Y-%m-%d %H:%M %:z").to_string()
}

fn bar(value: i64, lo: i64, hi: i64) -> String {
    if hi <= lo {
        return "#".repeat(BAR_WIDTH / 2);
    }
    let frac = (value as f64 - lo as f64) / (hi as f64 - lo as f64);
    let n = 1 + (frac * (BAR_WIDTH - 1) as f64).round() as usize;
    "#".repeat(n.min(BAR_WIDTH))
}
