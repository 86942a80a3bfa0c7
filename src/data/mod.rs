//! Data sources.
//!
//! - `eia`: EIA v2 grid-operator demand API

pub mod eia;

pub use eia::*;
