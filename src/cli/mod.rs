//! Command-line parsing for the demand-window scheduler.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! normalizer/selector code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::Frequency;

/// Respondent used when neither `--respondent` nor the config names one.
pub const DEFAULT_RESPONDENT: &str = "MIDA";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "dw",
    version,
    about = "Find the lowest grid-demand window to run an appliance (EIA-based)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch (or load) hourly demand and print the normalized series.
    Series(SeriesArgs),
    /// Find the cheapest contiguous window and optionally dry-run a plug schedule.
    Window(WindowArgs),
}

/// Where the demand data comes from.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// JSON config file with `api_key` (falls back to EIA_API_KEY).
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Read a saved API payload instead of calling the API.
    #[arg(long, value_name = "JSON", conflicts_with = "save_payload")]
    pub payload: Option<PathBuf>,

    /// Save the raw API payload to this file.
    #[arg(long, value_name = "JSON")]
    pub save_payload: Option<PathBuf>,

    /// Balancing authority code (facet).
    #[arg(short = 'r', long)]
    pub respondent: Option<String>,

    /// Period frequency requested from the API.
    #[arg(long, value_enum, default_value_t = Frequency::LocalHourly)]
    pub frequency: Frequency,

    /// First day (local midnight, -04:00). Defaults to today.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub start: Option<NaiveDate>,

    /// Last day (local midnight, -04:00). Defaults to start + 1 day.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Export the series to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct WindowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Run length in hours (falls back to config `window_hours`).
    #[arg(short = 'w', long)]
    pub hours: Option<usize>,

    /// Show the top-N candidate windows.
    #[arg(long, default_value_t = 5)]
    pub top: usize,

    /// Print the hour-by-hour table with the window marked.
    #[arg(long)]
    pub table: bool,

    /// Smart-plug alias to schedule (dry run).
    #[arg(long)]
    pub device: Option<String>,

    /// Export the series (with window flags) to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}
