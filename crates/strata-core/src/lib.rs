//! Strata Core - Three-band isolator signal path

pub mod dsp;
pub mod engine;
pub mod params;
pub mod types;

pub use types::*;
