//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs logging
//! - parses CLI arguments and resolves config
//! - fetches (or loads) demand data and normalizes it
//! - selects the cheapest window and prints reports
//! - writes optional exports and dry-runs the plug plan

use chrono::{Days, NaiveDate, Utc};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{Command, DEFAULT_RESPONDENT, SeriesArgs, SourceArgs, WindowArgs};
use crate::config::Config;
use crate::data::{DemandQuery, EiaClient, day_start};
use crate::device::DryRunControl;
use crate::domain::grid_offset;
use crate::error::{AppError, EXIT_CONFIG};
use crate::normalize::NormalizedResponse;

pub mod pipeline;

use pipeline::DataSource;

/// Entry point for the `dw` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Series(args) => handle_series(args),
        Command::Window(args) => handle_window(args),
    }
}

/// Log to stderr so stdout stays reserved for reports. `RUST_LOG` overrides the default.
pub fn init_logging() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_series(args: SeriesArgs) -> Result<(), AppError> {
    let config = resolve_config(&args.source)?;
    let normalized = load(&args.source, config.as_ref())?;

    println!(
        "{}",
        crate::report::format_series_summary(&normalized.series, &normalized.meta)
    );
    println!("{}", crate::report::format_series_table(&normalized.series, None));

    if let Some(path) = &args.export {
        crate::io::write_series_csv(path, &normalized.series, None)?;
    }
    Ok(())
}

fn handle_window(args: WindowArgs) -> Result<(), AppError> {
    let config = resolve_config(&args.source)?;

    let hours = args
        .hours
        .or_else(|| config.as_ref().and_then(|c| c.window_hours))
        .ok_or_else(|| {
            AppError::new(
                EXIT_CONFIG,
                "No window length: pass --hours or set window_hours in the config.",
            )
        })?;
    let device = args
        .device
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.device_alias.clone()));

    let normalized = load(&args.source, config.as_ref())?;
    let run = pipeline::run_window(&normalized, hours, args.top, device.as_deref())?;

    let units = normalized.series.value_units().unwrap_or("");
    println!(
        "{}",
        crate::report::format_series_summary(&normalized.series, &normalized.meta)
    );
    if args.table {
        println!(
            "{}",
            crate::report::format_series_table(&normalized.series, Some(&run.choice))
        );
    }
    println!("{}", crate::report::format_window(&run.choice, units));
    if args.top > 0 {
        println!("{}", crate::report::format_rankings(&run.ranked));
    }

    if let Some(plan) = &run.plan {
        println!("{}", crate::report::format_plan(plan));
        let mut control = DryRunControl::new();
        pipeline::dispatch_plan(&run, &mut control)?;
    }

    if let Some(path) = &args.export {
        crate::io::write_series_csv(path, &normalized.series, Some(&run.choice))?;
    }
    Ok(())
}

/// A saved payload needs no credential; a live request does.
fn resolve_config(source: &SourceArgs) -> Result<Option<Config>, AppError> {
    if source.config.is_none() && source.payload.is_some() {
        return Ok(None);
    }
    Config::resolve(source.config.as_deref()).map(Some)
}

fn load(source: &SourceArgs, config: Option<&Config>) -> Result<NormalizedResponse, AppError> {
    let data_source = match (&source.payload, config) {
        (Some(path), _) => DataSource::Payload(path.clone()),
        (None, Some(config)) => DataSource::Api {
            client: EiaClient::from_config(config),
            query: build_query(source, config)?,
            save_to: source.save_payload.clone(),
        },
        (None, None) => {
            return Err(AppError::new(
                EXIT_CONFIG,
                "No data source: pass --payload or provide an API key.",
            ));
        }
    };
    pipeline::load_series(&data_source)
}

pub fn build_query(source: &SourceArgs, config: &Config) -> Result<DemandQuery, AppError> {
    let today = Utc::now().with_timezone(&grid_offset()).date_naive();
    let (start_date, end_date) = resolve_dates(source.start, source.end, today)?;

    let start = day_start(start_date)
        .ok_or_else(|| AppError::new(EXIT_CONFIG, format!("Invalid start date {start_date}.")))?;
    let end = day_start(end_date)
        .ok_or_else(|| AppError::new(EXIT_CONFIG, format!("Invalid end date {end_date}.")))?;

    let respondent = source
        .respondent
        .clone()
        .or_else(|| config.respondent.clone())
        .unwrap_or_else(|| DEFAULT_RESPONDENT.to_string());

    Ok(DemandQuery::new(source.frequency, respondent, start, end))
}

/// Default: `[today, today + 1d]`; an explicit end must come after the start.
fn resolve_dates(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), AppError> {
    let start = start.unwrap_or(today);
    let end = match end {
        Some(e) => e,
        None => start
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::new(EXIT_CONFIG, "Start date out of range."))?,
    };
    if end <= start {
        return Err(AppError::new(
            EXIT_CONFIG,
            format!("End date {end} must be after start date {start}."),
        ));
    }
    Ok((start, end))
}
