//! `demand-window` library crate.
//!
//! The binary (`dw`) is a thin wrapper around this library so that:
//!
//! - the normalizer and window selector are testable without network access
//! - the API client, config and plug control stay swappable collaborators
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod device;
pub mod domain;
pub mod error;
pub mod io;
pub mod normalize;
pub mod report;
pub mod select;

pub use domain::{DemandRecord, DemandSeries, Timestamp};
pub use error::CoreError;
pub use normalize::{normalize, to_snake_case};
pub use select::select_min_window;
