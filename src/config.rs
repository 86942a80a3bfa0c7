//! Local configuration: API credential and optional defaults.
//!
//! The file is plain JSON, e.g.
//!
//! ```json
//! { "api_key": "...", "respondent": "MIDA", "device_alias": "Charger", "window_hours": 4 }
//! ```
//!
//! When no file is given, the key is read from `EIA_API_KEY` (a `.env` file is honored).

use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{AppError, EXIT_CONFIG};

pub const API_KEY_ENV: &str = "EIA_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_key: String,
    /// Default respondent facet when `--respondent` is not given.
    #[serde(default)]
    pub respondent: Option<String>,
    /// Smart-plug alias to schedule when `--device` is not given.
    #[serde(default)]
    pub device_alias: Option<String>,
    /// Default run length in hours.
    #[serde(default)]
    pub window_hours: Option<usize>,
}

impl Config {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|e| {
            AppError::new(
                EXIT_CONFIG,
                format!("Failed to open config '{}': {e}", path.display()),
            )
        })?;
        let config: Config = serde_json::from_reader(file).map_err(|e| {
            AppError::new(
                EXIT_CONFIG,
                format!("Invalid config '{}': {e}", path.display()),
            )
        })?;
        debug!(path = %path.display(), "loaded config file");
        config.validated()
    }

    /// Build a config from `EIA_API_KEY` (environment or `.env`).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            AppError::new(
                EXIT_CONFIG,
                format!("Missing {API_KEY_ENV} in environment (.env) and no --config given."),
            )
        })?;
        Self {
            api_key,
            respondent: None,
            device_alias: None,
            window_hours: None,
        }
        .validated()
    }

    /// Prefer the file when given, else fall back to the environment.
    pub fn resolve(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(p) => Self::load(p),
            None => Self::from_env(),
        }
    }

    fn validated(self) -> Result<Self, AppError> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::new(EXIT_CONFIG, "Config api_key is empty."));
        }
        if self.window_hours == Some(0) {
            return Err(AppError::new(EXIT_CONFIG, "Config window_hours must be > 0."));
        }
        Ok(self)
    }
}
