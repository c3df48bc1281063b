//! Lock-free control parameters shared between control and audio threads
//!
//! The control thread (UI or host automation) is the single writer; the
//! audio thread is the single reader. Each value is an individually
//! aligned atomic, so reads are tear-free without any locking. No
//! compound update needs to be atomic as a unit because the engine
//! consumes each value independently.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use crate::types::{Band, NUM_BANDS};

/// Minimum band gain in dB (the kill floor)
pub const BAND_GAIN_MIN_DB: f32 = -100.0;

/// Maximum band gain in dB (requires the +12dB boost ceiling)
pub const BAND_GAIN_MAX_DB: f32 = 12.0;

/// Control resolution in dB; the intended control skew puts the midpoint
/// of the range at 0 dB, matching analog isolators
pub const BAND_GAIN_STEP_DB: f32 = 0.1;

/// Selectable boost ceilings in dB
pub const BOOST_LEVELS_DB: [f32; 3] = [0.0, 6.0, 12.0];

/// Display labels for the boost ceiling selector
pub const BOOST_LABELS: [&str; 3] = ["0 dB", "+6 dB", "+12 dB"];

/// An f32 stored as an atomic bit pattern
///
/// Relaxed ordering is sufficient for the single-writer/single-reader
/// discipline used here: the reader only ever needs *some* recent,
/// untorn value.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Shared isolator controls: three band gains plus the boost ceiling
///
/// Wrapped in an `Arc` and handed to both the control thread and the
/// engine. Writers clamp on store, so the audio thread never sees an
/// out-of-range value.
#[derive(Debug)]
pub struct IsolatorParams {
    band_db: [AtomicF32; NUM_BANDS],
    boost_index: AtomicU8,
}

impl IsolatorParams {
    /// All bands flat (0 dB), boost ceiling at 0 dB
    pub fn new() -> Self {
        Self {
            band_db: [AtomicF32::new(0.0), AtomicF32::new(0.0), AtomicF32::new(0.0)],
            boost_index: AtomicU8::new(0),
        }
    }

    /// Set a band gain in dB, clamped to [-100, +12]
    pub fn set_band_db(&self, band: Band, db: f32) {
        self.band_db[band as usize].store(db.clamp(BAND_GAIN_MIN_DB, BAND_GAIN_MAX_DB));
    }

    /// Get a band gain in dB
    pub fn band_db(&self, band: Band) -> f32 {
        self.band_db[band as usize].load()
    }

    /// Select the boost ceiling by index into [`BOOST_LEVELS_DB`], clamped
    pub fn set_boost_index(&self, index: usize) {
        let index = index.min(BOOST_LEVELS_DB.len() - 1);
        self.boost_index.store(index as u8, Ordering::Relaxed);
    }

    /// Current boost ceiling selector index
    pub fn boost_index(&self) -> usize {
        self.boost_index.load(Ordering::Relaxed) as usize
    }

    /// Current boost ceiling in dB
    pub fn boost_ceiling_db(&self) -> f32 {
        BOOST_LEVELS_DB[self.boost_index()]
    }

    /// Snapshot for the audio thread: (band gains in dB, boost ceiling in dB)
    ///
    /// Four independent tear-free loads; values may change between
    /// samples, which is fine because the smoother absorbs any jump.
    #[inline]
    pub fn snapshot(&self) -> ([f32; NUM_BANDS], f32) {
        (
            [
                self.band_db[0].load(),
                self.band_db[1].load(),
                self.band_db[2].load(),
            ],
            self.boost_ceiling_db(),
        )
    }
}

impl Default for IsolatorParams {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_f32_roundtrip() {
        let value = AtomicF32::new(0.25);
        assert_eq!(value.load(), 0.25);

        value.store(-3.5);
        assert_eq!(value.load(), -3.5);
    }

    #[test]
    fn test_band_gain_clamping() {
        let params = IsolatorParams::new();

        params.set_band_db(Band::Low, -200.0);
        assert_eq!(params.band_db(Band::Low), BAND_GAIN_MIN_DB);

        params.set_band_db(Band::High, 24.0);
        assert_eq!(params.band_db(Band::High), BAND_GAIN_MAX_DB);

        params.set_band_db(Band::Mid, -6.0);
        assert_eq!(params.band_db(Band::Mid), -6.0);
    }

    #[test]
    fn test_boost_selector() {
        let params = IsolatorParams::new();
        assert_eq!(params.boost_ceiling_db(), 0.0);

        params.set_boost_index(2);
        assert_eq!(params.boost_ceiling_db(), 12.0);

        // Out-of-range index clamps to the top level
        params.set_boost_index(99);
        assert_eq!(params.boost_index(), 2);
    }

    #[test]
    fn test_snapshot_reflects_stores() {
        let params = IsolatorParams::new();
        params.set_band_db(Band::Low, -12.0);
        params.set_band_db(Band::Mid, 3.0);
        params.set_boost_index(1);

        let (band_db, ceiling) = params.snapshot();
        assert_eq!(band_db, [-12.0, 3.0, 0.0]);
        assert_eq!(ceiling, 6.0);
    }
}
