//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the fixed grid offset and `Timestamp` alias
//! - hourly demand observations (`DemandRecord`) and their ordered container (`DemandSeries`)
//! - API query enums (`Frequency`, `DataType`)

pub mod types;

pub use types::*;
