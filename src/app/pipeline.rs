//! Shared "window pipeline" logic used by the `series` and `window` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch/load payload -> normalize -> select window -> rank -> (optional) plug plan
//!
//! The CLI can then focus on presentation.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::data::{DemandQuery, EiaClient};
use crate::device::{ChargePlan, DeviceControl, apply_plan};
use crate::error::AppError;
use crate::io::{read_payload, write_payload};
use crate::normalize::{NormalizedResponse, normalize_response};
use crate::select::{WindowChoice, find_min_window, rank_windows};

/// Where the raw payload comes from.
pub enum DataSource {
    /// A previously saved payload on disk.
    Payload(PathBuf),
    /// A live API request, optionally saving the raw body.
    Api {
        client: EiaClient,
        query: DemandQuery,
        save_to: Option<PathBuf>,
    },
}

/// Load the payload from `source` and normalize it.
pub fn load_series(source: &DataSource) -> Result<NormalizedResponse, AppError> {
    let (raw, respondent) = match source {
        DataSource::Payload(path) => {
            info!(path = %path.display(), "loading saved payload");
            (read_payload(path)?, None)
        }
        DataSource::Api {
            client,
            query,
            save_to,
        } => {
            let raw = client.fetch_raw(query)?;
            if let Some(path) = save_to {
                write_payload(path, &raw)?;
                info!(path = %path.display(), "saved raw payload");
            }
            (raw, query.respondent.as_deref())
        }
    };

    let normalized = normalize_response(&raw)?;
    log_response(&normalized, respondent);
    Ok(normalized)
}

/// Surface API warnings and truncated pages; neither stops the run.
fn log_response(normalized: &NormalizedResponse, respondent: Option<&str>) {
    let returned = normalized.series.len();
    for warning in &normalized.meta.warnings {
        warn!(%warning, "EIA response warning");
    }
    if let Some(total) = normalized.meta.total {
        if total > returned as u64 {
            warn!(total, returned, "EIA returned fewer rows than the query matched");
        }
    }
    info!(
        records = returned,
        respondent = respondent.unwrap_or("-"),
        "loaded demand series"
    );
}

/// All computed outputs of a single `dw window` run.
#[derive(Debug, Clone)]
pub struct WindowRun {
    pub choice: WindowChoice,
    pub ranked: Vec<WindowChoice>,
    pub plan: Option<ChargePlan>,
}

/// Select the cheapest window and, when a device is named, build its plan.
pub fn run_window(
    normalized: &NormalizedResponse,
    window_hours: usize,
    top_n: usize,
    device: Option<&str>,
) -> Result<WindowRun, AppError> {
    let series = &normalized.series;
    let choice = find_min_window(series, window_hours)?;
    let ranked = rank_windows(series, window_hours, top_n)?;

    info!(
        start = %choice.start.to_rfc3339(),
        hours = window_hours,
        total = choice.total,
        candidates = series.len() + 1 - window_hours,
        "selected lowest-demand window"
    );

    let plan = device.map(|d| ChargePlan::from_window(d, &choice));
    Ok(WindowRun {
        choice,
        ranked,
        plan,
    })
}

/// Hand the run's plan (if any) to a device controller.
pub fn dispatch_plan(run: &WindowRun, control: &mut dyn DeviceControl) -> Result<(), AppError> {
    if let Some(plan) = &run.plan {
        apply_plan(control, plan)?;
    }
    Ok(())
}
