//! Isolator engine - block orchestration over the DSP core
//!
//! This module ties the crossover and gain smoother together:
//! - Isolator: prepare/process lifecycle and the per-sample mix loop
//! - Boundary validation for host bus layouts

mod error;
mod isolator;

pub use error::*;
pub use isolator::*;
