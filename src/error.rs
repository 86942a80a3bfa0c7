//! Error types.
//!
//! - `CoreError`: typed failures of the pure core (normalizer + selector)
//! - `AppError`: process-level failure carrying the exit code for `dw`

use thiserror::Error;

/// Exit code for configuration / argument problems.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for transport failures talking to the data API.
pub const EXIT_TRANSPORT: u8 = 3;
/// Exit code for payload / window problems.
pub const EXIT_DATA: u8 = 4;

/// Failures surfaced by `normalize` and `select`.
///
/// None of these are coerced into defaults: a record without a `value` is an
/// error, never zero demand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The envelope or `response` section is missing, or the records section
    /// is not a list of mappings.
    #[error("malformed payload: {reason}")]
    MalformedPayload { reason: String },

    /// A per-period record is missing a required field or carries an unusable value.
    #[error("schema mismatch in record {index}, field '{field}': {reason}")]
    SchemaMismatch {
        index: usize,
        field: String,
        reason: String,
    },

    /// `window_length` is zero or longer than the series.
    #[error("invalid window: length {window_length} for a series of {series_len} records")]
    InvalidWindow {
        window_length: usize,
        series_len: usize,
    },
}

impl CoreError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            reason: reason.into(),
        }
    }

    pub fn schema(index: usize, field: &str, reason: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            index,
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::new(EXIT_DATA, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
