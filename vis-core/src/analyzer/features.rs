//! Feature Extraction
//!
//! Reduces one tick of byte spectra into the four coarse features the visuals react to.
//! Band edges are fractions of the bin count:
//!
//! | Feature  | Bins                | Reduction                        |
//! |----------|---------------------|----------------------------------|
//! | `volume` | all                 | mean                             |
//! | `bass`   | `[0, 15%)`          | peak                             |
//! | `mid`    | `[15%, 50%)`        | sum / nominal width (35% of N)   |
//! | `treble` | `[50%, 100%)`       | sum / nominal width (50% of N)   |
//!
//! Bass is a peak so that percussive transients register instead of being smeared out.
use crate::helpers;

/// Type Alias for Frequencies
pub type Frequency = f32;

/// Type Alias for Signal Strengths
pub type SignalStrength = f32;

const BASS_END: f32 = 0.15;
const MID_END: f32 = 0.5;
const MID_WIDTH: f32 = MID_END - BASS_END;
const TREBLE_WIDTH: f32 = 1.0 - MID_END;

/// Lowest accepted sensitivity multiplier
pub const MIN_SENSITIVITY: f32 = 0.1;
/// Highest accepted sensitivity multiplier
pub const MAX_SENSITIVITY: f32 = 3.0;

/// Number of segments in the signal strength meter
pub const METER_SEGMENTS: usize = 5;

/// One analysis tick worth of features and raw data
///
/// Published once per tick and never mutated afterwards.  The features are unscaled, apply
/// the sensitivity with [`Features::scaled`](struct.Features.html#method.scaled) when
/// consuming them.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSnapshot {
    pub volume: SignalStrength,
    pub bass: SignalStrength,
    pub mid: SignalStrength,
    pub treble: SignalStrength,
    pub frequency_bins: Vec<u8>,
    pub time_bins: Vec<u8>,
}

impl FeatureSnapshot {
    /// Features without the raw arrays
    pub fn features(&self) -> Features {
        Features {
            volume: self.volume,
            bass: self.bass,
            mid: self.mid,
            treble: self.treble,
        }
    }

    /// Number of bins in both arrays
    pub fn bins(&self) -> usize {
        self.frequency_bins.len()
    }
}

/// The four scalar features
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Features {
    pub volume: SignalStrength,
    pub bass: SignalStrength,
    pub mid: SignalStrength,
    pub treble: SignalStrength,
}

impl Features {
    /// Apply the sensitivity gain, each feature is capped at `1.0`
    pub fn scaled(&self, config: &EngineConfig) -> Features {
        let gain = config.sensitivity();
        let scale = |v: SignalStrength| helpers::unit(v * gain);

        Features {
            volume: scale(self.volume),
            bass: scale(self.bass),
            mid: scale(self.mid),
            treble: scale(self.treble),
        }
    }
}

/// Engine settings supplied by the surrounding program on every frame
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    sensitivity: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { sensitivity: 1.0 }
    }
}

impl EngineConfig {
    pub fn new(sensitivity: f32) -> EngineConfig {
        let mut c = EngineConfig::default();
        c.set_sensitivity(sensitivity);
        c
    }

    /// Load the sensitivity from `"engine.sensitivity"`
    pub fn from_config() -> EngineConfig {
        EngineConfig::new(crate::CONFIG.get_or("engine.sensitivity", 1.0))
    }

    #[inline]
    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Set the gain, clamped to `[0.1, 3.0]`
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = if sensitivity.is_nan() {
            1.0
        } else {
            sensitivity.max(MIN_SENSITIVITY).min(MAX_SENSITIVITY)
        };
    }
}

fn split(n: usize) -> (usize, usize) {
    let bass_end = (n as f32 * BASS_END).floor() as usize;
    let mid_end = (n as f32 * MID_END).floor() as usize;
    (bass_end, mid_end)
}

fn sum(bins: &[u8]) -> f32 {
    bins.iter().map(|b| *b as u32).sum::<u32>() as f32
}

/// Mean of all bins, normalized
pub fn volume(bins: &[u8]) -> SignalStrength {
    if bins.is_empty() {
        return 0.0;
    }
    sum(bins) / bins.len() as f32 / 255.0
}

/// Peak of the lowest 15% of bins, normalized
pub fn bass(bins: &[u8]) -> SignalStrength {
    let (bass_end, _) = split(bins.len());
    bins[..bass_end].iter().max().map(|m| *m as f32 / 255.0).unwrap_or(0.0)
}

/// Energy density of bins `[15%, 50%)`, divided by the nominal band width
pub fn mid(bins: &[u8]) -> SignalStrength {
    let (bass_end, mid_end) = split(bins.len());
    let width = bins.len() as f32 * MID_WIDTH;
    if width <= 0.0 {
        return 0.0;
    }
    helpers::unit(sum(&bins[bass_end..mid_end]) / width / 255.0)
}

/// Energy density of bins `[50%, 100%)`, divided by the nominal band width
pub fn treble(bins: &[u8]) -> SignalStrength {
    let (_, mid_end) = split(bins.len());
    let width = bins.len() as f32 * TREBLE_WIDTH;
    if width <= 0.0 {
        return 0.0;
    }
    helpers::unit(sum(&bins[mid_end..]) / width / 255.0)
}

/// Build a snapshot from one tick of analysis output
///
/// Both arrays are copied, the analysis engine reuses its buffers.
pub fn extract(frequency_bins: &[u8], time_bins: &[u8]) -> FeatureSnapshot {
    debug_assert_eq!(frequency_bins.len(), time_bins.len());

    FeatureSnapshot {
        volume: volume(frequency_bins),
        bass: bass(frequency_bins),
        mid: mid(frequency_bins),
        treble: treble(frequency_bins),
        frequency_bins: frequency_bins.to_vec(),
        time_bins: time_bins.to_vec(),
    }
}

/// Lit state of each segment of the signal strength meter
pub fn signal_segments(volume: SignalStrength) -> [bool; METER_SEGMENTS] {
    let lit = (volume * METER_SEGMENTS as f32).floor();
    let mut segments = [false; METER_SEGMENTS];
    for (i, s) in segments.iter_mut().enumerate() {
        *s = lit > i as f32;
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{} != {}", a, b);
    }

    #[test]
    fn test_volume_is_mean() {
        for k in 3..10 {
            let n = 1usize << k;
            let bins = (0..n).map(|i| (i * 7 % 256) as u8).collect::<Vec<_>>();
            let expected = bins.iter().map(|b| *b as f32).sum::<f32>() / n as f32 / 255.0;

            assert_close(volume(&bins), expected);
        }
    }

    #[test]
    fn test_bass_spike() {
        for k in 3..10 {
            let n = 1usize << k;
            let mut bins = vec![0u8; n];
            bins[0] = 200;

            assert_close(bass(&bins), 200.0 / 255.0);
        }
    }

    #[test]
    fn test_bass_is_peak_of_low_band() {
        let mut bins = vec![0u8; 128];
        // floor(0.15 * 128) = 19, so index 19 already belongs to the mid band
        bins[19] = 255;
        bins[18] = 100;

        assert_close(bass(&bins), 100.0 / 255.0);
    }

    #[test]
    fn test_nominal_divisors() {
        // 50 bins: bass 0..7, mid 7..25 (18 bins), treble 25..50 (25 bins)
        let bins = vec![51u8; 50];

        assert_close(mid(&bins), 18.0 * 51.0 / (50.0 * 0.35) / 255.0);
        assert_close(treble(&bins), 25.0 * 51.0 / (50.0 * 0.5) / 255.0);

        // Not the same as the mean over the actual slice
        assert!((mid(&bins) - 0.2).abs() > 1e-3);
    }

    #[test]
    fn test_nominal_divisor_odd_length() {
        // 37 bins: bass 0..5, mid 5..18 (13 bins), treble 18..37 (19 bins)
        let bins = (0..37).map(|i| i as u8 * 3).collect::<Vec<_>>();
        let mid_sum = (5..18).map(|i| i as f32 * 3.0).sum::<f32>();
        let treble_sum = (18..37).map(|i| i as f32 * 3.0).sum::<f32>();

        assert_close(mid(&bins), mid_sum / (37.0 * 0.35) / 255.0);
        assert_close(treble(&bins), treble_sum / (37.0 * 0.5) / 255.0);
    }

    #[test]
    fn test_full_scale() {
        let bins = vec![255u8; 128];
        let s = extract(&bins, &bins);

        assert_eq!(s.volume, 1.0);
        assert_eq!(s.bass, 1.0);
        assert_eq!(s.mid, 1.0);
        assert_eq!(s.treble, 1.0);
    }

    #[test]
    fn test_silence() {
        let bins = vec![0u8; 128];
        let s = extract(&bins, &vec![128u8; 128]);

        assert_eq!(s.features(), Features::default());
        assert_eq!(s.bins(), 128);
        assert_eq!(s.time_bins.len(), 128);
    }

    #[test]
    fn test_empty() {
        let s = extract(&[], &[]);

        assert_eq!(s.features(), Features::default());
    }

    #[test]
    fn test_scaled_bounds() {
        for r in 0..=10 {
            let raw = r as f32 / 10.0;
            for g in 1..=30 {
                let config = EngineConfig::new(g as f32 / 10.0);
                let f = Features {
                    volume: raw,
                    bass: raw,
                    mid: raw,
                    treble: raw,
                }
                .scaled(&config);

                let expected = (raw * config.sensitivity()).min(1.0);
                assert_close(f.volume, expected);
                assert!(f.bass >= 0.0 && f.bass <= 1.0);
                if raw * config.sensitivity() >= 1.0 {
                    assert_eq!(f.treble, 1.0);
                }
            }
        }
    }

    #[test]
    fn test_sensitivity_clamp() {
        assert_eq!(EngineConfig::new(0.0).sensitivity(), MIN_SENSITIVITY);
        assert_eq!(EngineConfig::new(10.0).sensitivity(), MAX_SENSITIVITY);
        assert_eq!(EngineConfig::new(f32::NAN).sensitivity(), 1.0);
        assert_eq!(EngineConfig::default().sensitivity(), 1.0);
    }

    #[test]
    fn test_meter() {
        assert_eq!(signal_segments(0.0), [false; 5]);
        assert_eq!(signal_segments(0.2), [true, false, false, false, false]);
        assert_eq!(signal_segments(0.59), [true, true, false, false, false]);
        assert_eq!(signal_segments(1.0), [true; 5]);
    }
}
