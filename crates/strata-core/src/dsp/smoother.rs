//! Per-band gain smoothing
//!
//! Control changes arrive asynchronously (at most once per block) but must
//! not step the output waveform. A one-pole smoother with a 5 ms time
//! constant glides each band's applied gain toward its target with an
//! exponential approach and no overshoot, bounding the worst-case
//! sample-to-sample delta regardless of how large the parameter jump is.

use crate::types::{Sample, NUM_BANDS};

/// Smoothing time constant in seconds (5 ms)
pub const GAIN_SMOOTH_TIME_SECS: f32 = 0.005;

/// At or below this many dB a band is hard-killed to exactly zero gain,
/// avoiding denormal/underflow noise at extreme attenuation
pub const KILL_THRESHOLD_DB: f32 = -100.0;

/// Within ±this many dB of zero, gain snaps to exactly 1.0 so a control
/// that means "off" renders as bit-exact unity
pub const UNITY_DEAD_ZONE_DB: f32 = 0.5;

/// Convert a band gain in dB to a linear multiplier
///
/// Three policy zones, in precedence order: hard kill, unity dead zone,
/// then the usual 10^(dB/20).
pub fn db_to_linear(db: f32) -> f32 {
    if db <= KILL_THRESHOLD_DB {
        return 0.0;
    }
    if db.abs() <= UNITY_DEAD_ZONE_DB {
        return 1.0;
    }
    10.0f32.powf(db / 20.0)
}

/// One-pole smoother for the three band gains
///
/// Gains are shared across channels: `advance` runs once per sample, not
/// once per channel. All state is three floats plus the coefficient.
#[derive(Debug, Clone)]
pub struct GainSmoother {
    smoothed: [Sample; NUM_BANDS],
    alpha: f32,
}

impl GainSmoother {
    /// Create a smoother at unity gain; `prepare` must run before use
    pub fn new() -> Self {
        Self {
            smoothed: [1.0; NUM_BANDS],
            alpha: 1.0,
        }
    }

    /// Compute the smoothing coefficient for `sample_rate` and reset all
    /// band gains to unity
    pub fn prepare(&mut self, sample_rate: f32) {
        self.alpha = 1.0 - (-1.0 / (GAIN_SMOOTH_TIME_SECS * sample_rate)).exp();
        self.smoothed = [1.0; NUM_BANDS];
    }

    /// Glide each band gain one step toward its target; call once per sample
    ///
    /// The boost ceiling caps each band via `min(band_db, ceiling_db)`:
    /// it only limits upward gain and leaves cuts untouched.
    #[inline]
    pub fn advance(&mut self, band_db: [f32; NUM_BANDS], boost_ceiling_db: f32) -> [Sample; NUM_BANDS] {
        for (gain, db) in self.smoothed.iter_mut().zip(band_db) {
            let target = db_to_linear(db.min(boost_ceiling_db));
            *gain += self.alpha * (target - *gain);
        }
        self.smoothed
    }
}

impl Default for GainSmoother {
    fn default() -> Self {
        Self::new()
    }
}
