//! DSP building blocks - crossover filters and gain smoothing
//!
//! This module contains the sample-accurate signal path of the isolator:
//! - Crossover: LR4 three-band split with independent per-channel state
//! - GainSmoother: click-free per-band gain glide

mod crossover;
mod smoother;

pub use crossover::*;
pub use smoother::*;
