//! Three-band isolator - split, gain, and sum
//!
//! Orchestrates the per-sample signal path: one smoothing update per
//! sample (shared across channels), then per channel a crossover split,
//! per-band gain, and summation back into the output sample.
//!
//! The processing path never blocks, allocates, or locks; controls are
//! read through lock-free atomic snapshots. `prepare` runs on a non-RT
//! thread before streaming starts and must complete before any
//! `process_block` call.

use std::sync::Arc;

use super::error::{IsolatorError, IsolatorResult};
use crate::dsp::{BandSamples, Crossover, GainSmoother};
use crate::params::IsolatorParams;
use crate::types::{Sample, StereoBuffer, NUM_BANDS, NUM_CHANNELS};

/// Validate a host bus layout at the boundary
///
/// Only stereo in / stereo out is supported; anything else is rejected
/// before `process_block` is ever invoked with it.
pub fn validate_layout(inputs: usize, outputs: usize) -> IsolatorResult<()> {
    if inputs == NUM_CHANNELS && outputs == NUM_CHANNELS {
        Ok(())
    } else {
        Err(IsolatorError::UnsupportedLayout { inputs, outputs })
    }
}

/// Sum the three gained bands into one output sample
#[inline]
fn mix(bands: BandSamples, gains: [Sample; NUM_BANDS]) -> Sample {
    bands.low * gains[0] + bands.mid * gains[1] + bands.high * gains[2]
}

/// The isolator engine: crossover plus gain smoothing over shared params
///
/// Lifecycle: Unprepared → Prepared (`prepare` fixes the sample rate and
/// resets all state) → Processing (`process_block` calls accumulate
/// filter/smoother state). A new `prepare` call is the only way back.
pub struct Isolator {
    params: Arc<IsolatorParams>,
    crossover: Crossover,
    smoother: GainSmoother,
    /// 0.0 until `prepare` has been called
    sample_rate: f32,
}

impl Isolator {
    /// Create an unprepared isolator reading controls from `params`
    pub fn new(params: Arc<IsolatorParams>) -> Self {
        Self {
            params,
            crossover: Crossover::new(),
            smoother: GainSmoother::new(),
            sample_rate: 0.0,
        }
    }

    /// The shared control parameters this engine reads
    pub fn params(&self) -> &Arc<IsolatorParams> {
        &self.params
    }

    /// Sample rate fixed by the last `prepare`, or 0.0 if unprepared
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Fix the sample rate and reset all filter and smoothing state
    ///
    /// Non-RT: runs before streaming starts (or while it is stopped).
    /// Calling again with the same rate resets to an identical state.
    pub fn prepare(&mut self, sample_rate: f32) -> IsolatorResult<()> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(IsolatorError::InvalidSampleRate(sample_rate));
        }

        self.crossover.prepare(sample_rate);
        self.smoother.prepare(sample_rate);
        self.sample_rate = sample_rate;

        log::debug!("isolator: prepared at {} Hz", sample_rate);
        Ok(())
    }

    /// Process one block of planar channel buffers in place
    ///
    /// Any block length is supported, including 1. Channels at index
    /// [`NUM_CHANNELS`] and beyond are cleared to silence (defensive
    /// behavior for mismatched bus layouts).
    pub fn process_block(&mut self, channels: &mut [&mut [Sample]]) {
        assert!(
            self.sample_rate > 0.0,
            "Isolator::process_block called before prepare"
        );

        let (active, extra) = channels.split_at_mut(channels.len().min(NUM_CHANNELS));
        for channel in extra {
            channel.fill(0.0);
        }
        let Some(block_len) = active.first().map(|ch| ch.len()) else {
            return;
        };
        debug_assert!(active.iter().all(|ch| ch.len() == block_len));

        for s in 0..block_len {
            let gains = self.advance_gains();
            for (ch, channel) in active.iter_mut().enumerate() {
                let bands = self.crossover.process_sample(ch, channel[s]);
                channel[s] = mix(bands, gains);
            }
        }
    }

    /// Process a stereo buffer in place (same path as `process_block`)
    pub fn process_buffer(&mut self, buffer: &mut StereoBuffer) {
        assert!(
            self.sample_rate > 0.0,
            "Isolator::process_buffer called before prepare"
        );

        for sample in buffer.iter_mut() {
            let gains = self.advance_gains();
            let left = self.crossover.process_sample(0, sample.left);
            let right = self.crossover.process_sample(1, sample.right);
            sample.left = mix(left, gains);
            sample.right = mix(right, gains);
        }
    }

    /// Snapshot controls and advance the smoother; once per sample
    #[inline]
    fn advance_gains(&mut self) -> [Sample; NUM_BANDS] {
        let (band_db, ceiling_db) = self.params.snapshot();
        self.smoother.advance(band_db, ceiling_db)
    }
}
