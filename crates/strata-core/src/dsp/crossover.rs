//! Linkwitz-Riley three-band crossover
//!
//! Splits audio into low/mid/high bands using Linkwitz-Riley 24dB/oct
//! crossover filters. LR24 crossovers sum to an all-pass response of unit
//! magnitude, so the bands reconstruct the input with no level change.
//!
//! ## How it works
//!
//! A Linkwitz-Riley filter is created by cascading two Butterworth filters.
//! For LR24 (24dB/octave slope), we cascade two 12dB/oct (2-pole)
//! Butterworth filters with Q=0.707 (1/√2).
//!
//! Topology (two split points in series):
//!
//! ```text
//! input ── LR4 @ 250 Hz ── LP ──────────────────────── low
//!                       └─ HP ── LR4 @ 3140 Hz ── LP ── mid
//!                                               └─ HP ── high
//! ```

use crate::types::{Sample, NUM_CHANNELS};

/// Low/mid split frequency in Hz
pub const LOW_MID_CROSSOVER_HZ: f32 = 250.0;

/// Mid/high split frequency in Hz (π kHz)
pub const MID_HIGH_CROSSOVER_HZ: f32 = 3140.0;

/// One sample's worth of band outputs for a single channel
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandSamples {
    pub low: Sample,
    pub mid: Sample,
    pub high: Sample,
}

/// Integrator state for one channel of an SVF section
#[derive(Debug, Clone, Copy, Default)]
struct SvfState {
    ic1eq: Sample,
    ic2eq: Sample,
}

/// Two-pole (12dB/octave) Butterworth section
///
/// Uses the TPT state-variable topology because it's numerically stable
/// near Nyquist and stays well-conditioned if retuned while running.
/// State is an explicit per-channel array; coefficients are shared.
#[derive(Debug, Clone)]
struct SvfStage {
    state: [SvfState; NUM_CHANNELS],
    g: f32,
    k: f32,
    a1: f32,
    a2: f32,
    a3: f32,
}

impl SvfStage {
    fn new() -> Self {
        Self {
            state: [SvfState::default(); NUM_CHANNELS],
            g: 0.0,
            k: 0.0,
            a1: 0.0,
            a2: 0.0,
            a3: 0.0,
        }
    }

    /// Derive coefficients for a Butterworth section at `cutoff`, then
    /// zero the per-channel state.
    fn prepare(&mut self, cutoff: f32, sample_rate: f32) {
        // Q = 0.707 (1/sqrt(2)) for Butterworth, which cascades to LR24
        let q = std::f32::consts::FRAC_1_SQRT_2;

        self.g = (std::f32::consts::PI * cutoff / sample_rate).tan();
        self.k = 1.0 / q;
        self.a1 = 1.0 / (1.0 + self.g * (self.g + self.k));
        self.a2 = self.g * self.a1;
        self.a3 = self.g * self.a2;
        self.reset();
    }

    /// Process one sample for the given channel, returns (lowpass, highpass)
    #[inline]
    fn process(&mut self, channel: usize, input: Sample) -> (Sample, Sample) {
        let s = &mut self.state[channel];

        let v3 = input - s.ic2eq;
        let v1 = self.a1 * s.ic1eq + self.a2 * v3;
        let v2 = s.ic2eq + self.a2 * s.ic1eq + self.a3 * v3;
        s.ic1eq = 2.0 * v1 - s.ic1eq;
        s.ic2eq = 2.0 * v2 - s.ic2eq;

        let low = v2;
        let band = v1;
        let high = input - self.k * band - low;

        (low, high)
    }

    fn reset(&mut self) {
        self.state = [SvfState::default(); NUM_CHANNELS];
    }
}

/// Which output a crossover branch takes from its sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BranchKind {
    LowPass,
    HighPass,
}

/// 4th-order (24dB/oct) branch: two identical Butterworth sections cascaded
#[derive(Debug, Clone)]
struct CrossoverBranch {
    kind: BranchKind,
    first: SvfStage,
    second: SvfStage,
}

impl CrossoverBranch {
    fn new(kind: BranchKind) -> Self {
        Self {
            kind,
            first: SvfStage::new(),
            second: SvfStage::new(),
        }
    }

    fn prepare(&mut self, cutoff: f32, sample_rate: f32) {
        self.first.prepare(cutoff, sample_rate);
        self.second.prepare(cutoff, sample_rate);
    }

    #[inline]
    fn process(&mut self, channel: usize, input: Sample) -> Sample {
        match self.kind {
            BranchKind::LowPass => {
                let (lp1, _) = self.first.process(channel, input);
                let (lp2, _) = self.second.process(channel, lp1);
                lp2
            }
            BranchKind::HighPass => {
                let (_, hp1) = self.first.process(channel, input);
                let (_, hp2) = self.second.process(channel, hp1);
                hp2
            }
        }
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }
}

/// A single LR4 split point: matched low-pass/high-pass branch pair
/// sharing one cutoff frequency
#[derive(Debug, Clone)]
struct SplitPoint {
    lowpass: CrossoverBranch,
    highpass: CrossoverBranch,
}

impl SplitPoint {
    fn new() -> Self {
        Self {
            lowpass: CrossoverBranch::new(BranchKind::LowPass),
            highpass: CrossoverBranch::new(BranchKind::HighPass),
        }
    }

    fn prepare(&mut self, cutoff: f32, sample_rate: f32) {
        self.lowpass.prepare(cutoff, sample_rate);
        self.highpass.prepare(cutoff, sample_rate);
    }

    /// Split one channel's sample into (below cutoff, above cutoff)
    #[inline]
    fn process(&mut self, channel: usize, input: Sample) -> (Sample, Sample) {
        let low = self.lowpass.process(channel, input);
        let high = self.highpass.process(channel, input);
        (low, high)
    }

    fn reset(&mut self) {
        self.lowpass.reset();
        self.highpass.reset();
    }
}

/// LR4 three-band crossover with independent filter state per channel
///
/// Two split points in series: low/mid at 250 Hz, mid/high at 3140 Hz
/// (applied to the high-pass output of the first split). Summing the three
/// bands reconstructs the input up to an all-pass phase shift, so RMS
/// level is preserved.
#[derive(Debug, Clone)]
pub struct Crossover {
    low_mid: SplitPoint,
    mid_high: SplitPoint,
    /// 0.0 until `prepare` has been called
    sample_rate: f32,
}

impl Crossover {
    /// Create an unprepared crossover; `prepare` must run before processing
    pub fn new() -> Self {
        Self {
            low_mid: SplitPoint::new(),
            mid_high: SplitPoint::new(),
            sample_rate: 0.0,
        }
    }

    /// Derive all filter coefficients for `sample_rate` and zero all state
    ///
    /// Safe to call again at any time streaming is stopped; the result is
    /// identical to a freshly constructed crossover.
    pub fn prepare(&mut self, sample_rate: f32) {
        self.low_mid.prepare(LOW_MID_CROSSOVER_HZ, sample_rate);
        self.mid_high.prepare(MID_HIGH_CROSSOVER_HZ, sample_rate);
        self.sample_rate = sample_rate;
    }

    /// Split one channel's input sample into three bands
    ///
    /// `channel` must be below [`NUM_CHANNELS`]; bounds are enforced by the
    /// orchestrating engine.
    #[inline]
    pub fn process_sample(&mut self, channel: usize, input: Sample) -> BandSamples {
        debug_assert!(
            self.sample_rate > 0.0,
            "Crossover::process_sample called before prepare"
        );
        debug_assert!(channel < NUM_CHANNELS);

        let (low, remainder) = self.low_mid.process(channel, input);
        let (mid, high) = self.mid_high.process(channel, remainder);

        BandSamples { low, mid, high }
    }

    /// Zero all filter state without re-deriving coefficients
    pub fn reset(&mut self) {
        self.low_mid.reset();
        self.mid_high.reset();
    }
}

impl Default for Crossover {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const SAMPLE_RATE: f32 = crate::types::DEFAULT_SAMPLE_RATE as f32;
    const WARMUP_SAMPLES: usize = 10000;
    const TEST_SAMPLES: usize = 10000;

    fn sine(freq: f32, index: usize) -> f32 {
        (2.0 * std::f32::consts::PI * freq * index as f32 / SAMPLE_RATE).sin()
    }

    fn rms(data: &[f32]) -> f32 {
        let sum: f64 = data.iter().map(|&x| x as f64 * x as f64).sum();
        (sum / data.len() as f64).sqrt() as f32
    }

    /// Per-band energy fractions for a settled sine at `freq`
    fn band_energy_fractions(freq: f32) -> (f64, f64, f64) {
        let mut xover = Crossover::new();
        xover.prepare(SAMPLE_RATE);

        for i in 0..WARMUP_SAMPLES {
            xover.process_sample(0, sine(freq, i));
        }

        let (mut low_e, mut mid_e, mut high_e) = (0.0f64, 0.0f64, 0.0f64);
        for i in 0..TEST_SAMPLES {
            let bands = xover.process_sample(0, sine(freq, WARMUP_SAMPLES + i));
            low_e += bands.low as f64 * bands.low as f64;
            mid_e += bands.mid as f64 * bands.mid as f64;
            high_e += bands.high as f64 * bands.high as f64;
        }

        let total = low_e + mid_e + high_e;
        (low_e / total, mid_e / total, high_e / total)
    }

    #[test]
    fn test_band_sum_preserves_magnitude() {
        let mut xover = Crossover::new();
        xover.prepare(SAMPLE_RATE);

        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..WARMUP_SAMPLES {
            xover.process_sample(0, rng.gen_range(-1.0f32..1.0));
        }

        // LP + HP = allpass, so magnitudes match even though phase differs;
        // compare RMS levels, not sample values
        let mut inputs = Vec::with_capacity(TEST_SAMPLES);
        let mut outputs = Vec::with_capacity(TEST_SAMPLES);
        for _ in 0..TEST_SAMPLES {
            let input = rng.gen_range(-1.0f32..1.0);
            let bands = xover.process_sample(0, input);
            inputs.push(input);
            outputs.push(bands.low + bands.mid + bands.high);
        }

        let error_db = 20.0 * (rms(&outputs) / rms(&inputs)).log10();
        assert!(
            error_db.abs() < 0.1,
            "band sum should preserve magnitude, got {} dB difference",
            error_db
        );
    }

    #[test]
    fn test_low_tone_lands_in_low_band() {
        let (low, _, _) = band_energy_fractions(50.0);
        assert!(low > 0.99, "50Hz should be >99% in low band, got {}", low * 100.0);
    }

    #[test]
    fn test_mid_tone_lands_in_mid_band() {
        let (_, mid, _) = band_energy_fractions(1000.0);
        assert!(mid > 0.95, "1kHz should be >95% in mid band, got {}", mid * 100.0);
    }

    #[test]
    fn test_high_tone_lands_in_high_band() {
        let (_, _, high) = band_energy_fractions(10000.0);
        assert!(high > 0.95, "10kHz should be >95% in high band, got {}", high * 100.0);
    }

    #[test]
    fn test_crossover_slope_is_24db_per_octave() {
        let mut xover = Crossover::new();
        xover.prepare(SAMPLE_RATE);

        // One octave above the 250Hz split, the low band should be ~24dB down
        let freq = 500.0;

        for i in 0..WARMUP_SAMPLES {
            xover.process_sample(0, sine(freq, i));
        }

        let (mut low_e, mut input_e) = (0.0f64, 0.0f64);
        for i in 0..TEST_SAMPLES {
            let input = sine(freq, WARMUP_SAMPLES + i);
            let bands = xover.process_sample(0, input);
            low_e += bands.low as f64 * bands.low as f64;
            input_e += input as f64 * input as f64;
        }

        let attenuation_db = 10.0 * (low_e / input_e).log10();
        assert!(
            (attenuation_db - -24.0).abs() < 3.0,
            "low band at 500Hz should be ~-24dB, got {} dB",
            attenuation_db
        );
    }

    #[test]
    fn test_channels_have_independent_state() {
        let mut xover = Crossover::new();
        xover.prepare(SAMPLE_RATE);

        // Drive only channel 0; channel 1 state must stay untouched
        for i in 0..1000 {
            xover.process_sample(0, sine(440.0, i));
        }

        let bands = xover.process_sample(1, 0.0);
        assert_eq!(bands, BandSamples::default());
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(7);
        let input: Vec<f32> = (0..512).map(|_| rng.gen_range(-1.0f32..1.0)).collect();

        let mut first = Crossover::new();
        first.prepare(SAMPLE_RATE);
        let run_a: Vec<BandSamples> =
            input.iter().map(|&x| first.process_sample(0, x)).collect();

        // Re-preparing after processing must reset to the identical state
        first.prepare(SAMPLE_RATE);
        let run_b: Vec<BandSamples> =
            input.iter().map(|&x| first.process_sample(0, x)).collect();

        assert_eq!(run_a, run_b);
    }
}
