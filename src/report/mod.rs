//! Reporting utilities: formatted terminal output for series, windows and plans.

pub mod format;

pub use format::*;
