//! Input/output helpers.
//!
//! - saved API payloads (`payload`)
//! - series exports (CSV) (`export`)

pub mod export;
pub mod payload;

pub use export::*;
pub use payload::*;
