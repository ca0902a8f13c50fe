//! Frequency Analysis
//!
//! A byte-oriented analysis engine: every call to
//! [`analyze`](struct.FrequencyAnalyser.html#method.analyze) transforms the tail of a
//! [`SampleBuffer`](../samples/struct.SampleBuffer.html) and leaves two equally long byte
//! arrays behind, one for amplitude per frequency bin and one for the raw waveform.
use super::Sample;
use crate::analyzer;

/// Window functions
///
/// A window-function in this case takes a size and should return a `Vec` of that length filled
/// with the precomputed window coefficients.  The following are available by default:
///
/// * [None / Rectangle](fn.none.html)
/// * [Sine](fn.sine.html)
/// * [Hanning](fn.hanning.html)
/// * [Hamming](fn.hamming.html)
/// * [Blackman](fn.blackman.html)
/// * [Nuttall](fn.nuttall.html)
/// * [Triangular](fn.triangular.html)
pub mod window {
    /// Blackman Window
    pub fn blackman(size: usize) -> Vec<f32> {
        apodize::blackman_iter(size).map(|f| f as f32).collect()
    }

    /// Hamming Window
    pub fn hamming(size: usize) -> Vec<f32> {
        apodize::hamming_iter(size).map(|f| f as f32).collect()
    }

    /// Hanning Window
    pub fn hanning(size: usize) -> Vec<f32> {
        apodize::hanning_iter(size).map(|f| f as f32).collect()
    }

    /// No window function / Rectangle window
    pub fn none(size: usize) -> Vec<f32> {
        vec![1.0; size]
    }

    /// Nuttall Window
    pub fn nuttall(size: usize) -> Vec<f32> {
        apodize::nuttall_iter(size).map(|f| f as f32).collect()
    }

    /// Sine Window
    pub fn sine(size: usize) -> Vec<f32> {
        (0..size)
            .map(|i| (i as f32 / (size - 1) as f32 * std::f32::consts::PI).sin())
            .collect()
    }

    /// Triangular Window
    pub fn triangular(size: usize) -> Vec<f32> {
        apodize::triangular_iter(size).map(|f| f as f32).collect()
    }

    /// Get the window function for the specified name
    pub fn from_str(name: &str) -> Option<fn(usize) -> Vec<f32>> {
        match name {
            "blackman" => Some(blackman),
            "hamming" => Some(hamming),
            "hanning" => Some(hanning),
            "none" => Some(none),
            "nuttall" => Some(nuttall),
            "sine" => Some(sine),
            "triangular" => Some(triangular),
            _ => None,
        }
    }
}

/// Builder for FrequencyAnalyser
#[derive(Debug, Default, Clone)]
pub struct AnalyserBuilder {
    /// Length of the fourier transform
    ///
    /// Must be a power of two, other values get rounded up.  The analyser produces half as
    /// many frequency bins.
    ///
    /// Can also be set from config as `"audio.fft_size"`.
    pub fft_size: Option<usize>,

    /// Window Function
    ///
    /// A few window functions are defined in the [`window`](window/index.html) module.
    ///
    /// Can also be set from config as `"audio.window"`.
    pub window: Option<fn(usize) -> Vec<f32>>,

    /// Time constant of the exponential smoothing between two transforms
    ///
    /// Can also be set from config as `"audio.smoothing"`.
    pub smoothing: Option<f32>,

    /// Magnitude (dB) mapped to byte value 0
    ///
    /// Can also be set from config as `"audio.min_db"`.
    pub min_db: Option<f32>,

    /// Magnitude (dB) mapped to byte value 255
    ///
    /// Can also be set from config as `"audio.max_db"`.
    pub max_db: Option<f32>,
}

impl AnalyserBuilder {
    /// Create a new AnalyserBuilder
    pub fn new() -> AnalyserBuilder {
        Default::default()
    }

    /// Set the length of the transform buffer
    pub fn fft_size(&mut self, length: usize) -> &mut AnalyserBuilder {
        self.fft_size = Some(length);
        self
    }

    /// Set the window function
    pub fn window(&mut self, f: fn(usize) -> Vec<f32>) -> &mut AnalyserBuilder {
        self.window = Some(f);
        self
    }

    /// Set the smoothing time constant, `0.0` disables smoothing
    pub fn smoothing(&mut self, tau: f32) -> &mut AnalyserBuilder {
        self.smoothing = Some(tau);
        self
    }

    /// Set the decibel range mapped onto `0..=255`
    pub fn decibels(&mut self, min: f32, max: f32) -> &mut AnalyserBuilder {
        self.min_db = Some(min);
        self.max_db = Some(max);
        self
    }

    /// Plan the fourier transform and prepare buffers
    pub fn plan(&self) -> FrequencyAnalyser {
        let mut length = self
            .fft_size
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.fft_size", 256));
        if !length.is_power_of_two() {
            let rounded = length.max(2).next_power_of_two();
            log::warn!("FFT size {} is not a power of two, using {}", length, rounded);
            length = rounded;
        }

        let window = self.window.unwrap_or_else(|| {
            let name = crate::CONFIG.get_or("audio.window", "blackman".to_string());
            window::from_str(&name).unwrap_or_else(|| {
                log::warn!("Unknown window {:?}, falling back to blackman", name);
                window::blackman
            })
        })(length);

        let smoothing = self
            .smoothing
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.smoothing", 0.8))
            .max(0.0)
            .min(1.0);
        let min_db = self
            .min_db
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.min_db", -100.0));
        let max_db = self
            .max_db
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.max_db", -30.0));

        FrequencyAnalyser::new(length, window, smoothing, min_db, max_db)
    }
}

/// Frequency Analyser
///
/// # Example
/// ```
/// # use vis_core::analyzer::fourier::*;
/// let mut analyser = AnalyserBuilder::new()
///     .fft_size(256)
///     .window(window::blackman)
///     .smoothing(0.8)
///     .decibels(-100.0, -30.0)
///     .plan();
///
/// let buf = vis_core::analyzer::SampleBuffer::new(1024, 44100);
/// analyser.analyze(&buf);
/// assert_eq!(analyser.frequency_bins().len(), 128);
/// assert_eq!(analyser.time_bins().len(), 128);
/// ```
#[derive(Clone)]
pub struct FrequencyAnalyser {
    length: usize,
    bins: usize,
    window: Vec<Sample>,

    smoothing: f32,
    min_db: f32,
    max_db: f32,

    fft: std::sync::Arc<dyn rustfft::Fft<Sample>>,

    samples: Vec<Sample>,
    buffer: Vec<rustfft::num_complex::Complex<Sample>>,
    magnitudes: Vec<Sample>,

    frequency: Vec<u8>,
    time: Vec<u8>,
}

impl std::fmt::Debug for FrequencyAnalyser {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "FrequencyAnalyser {{ length: {:?}, smoothing: {:?}, min_db: {:?}, max_db: {:?} }}",
            self.length, self.smoothing, self.min_db, self.max_db,
        )
    }
}

impl FrequencyAnalyser {
    fn new(
        length: usize,
        window: Vec<f32>,
        smoothing: f32,
        min_db: f32,
        max_db: f32,
    ) -> FrequencyAnalyser {
        use rustfft::num_traits::Zero;

        let fft = rustfft::FftPlanner::new().plan_fft_forward(length);
        let bins = length / 2;

        let fa = FrequencyAnalyser {
            length,
            bins,
            window,

            smoothing,
            min_db,
            max_db,

            fft,

            samples: vec![0.0; length],
            buffer: vec![rustfft::num_complex::Complex::zero(); length],
            magnitudes: vec![0.0; bins],

            frequency: vec![0; bins],
            time: vec![128; bins],
        };

        log::debug!("FrequencyAnalyser({:p}):", &fa);
        log::debug!("    FFT Size            = {:8}", length);
        log::debug!("    Bins                = {:8}", bins);
        log::debug!("    Smoothing           = {:8.3}", smoothing);
        log::debug!("    Decibel Range       = {:8.1} .. {:.1}", min_db, max_db);

        fa
    }

    /// Return the number of bins in both output arrays
    #[inline]
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Return the length of the transform
    #[inline]
    pub fn fft_size(&self) -> usize {
        self.length
    }

    /// Frequency in Hz at the centre of bin `i` for a given sample rate
    pub fn bin_frequency(&self, i: usize, rate: usize) -> analyzer::features::Frequency {
        i as f32 * rate as f32 / self.length as f32
    }

    /// Analyze a `SampleBuffer`
    ///
    /// Afterwards [`frequency_bins`](#method.frequency_bins) and
    /// [`time_bins`](#method.time_bins) hold the result.  Both buffers are reused for the
    /// next call.
    pub fn analyze(&mut self, buf: &analyzer::SampleBuffer) {
        log::trace!("FrequencyAnalyser({:p}): Analyzing ...", &self);

        buf.fill_mono(&mut self.samples);

        for ((b, s), w) in self
            .buffer
            .iter_mut()
            .zip(self.samples.iter())
            .zip(self.window.iter())
        {
            *b = rustfft::num_complex::Complex::new(s * w, 0.0);
        }

        self.fft.process(&mut self.buffer);

        let scale = 1.0 / self.length as f32;
        let tau = self.smoothing;
        let range = self.max_db - self.min_db;
        for ((m, o), byte) in self
            .magnitudes
            .iter_mut()
            .zip(self.buffer.iter())
            .zip(self.frequency.iter_mut())
        {
            *m = tau * *m + (1.0 - tau) * o.norm() * scale;

            let db = 20.0 * m.log10();
            let v = (255.0 / range * (db - self.min_db)).floor();
            *byte = if v.is_nan() { 0 } else { v.max(0.0).min(255.0) as u8 };
        }

        let tail = &self.samples[self.length - self.bins..];
        for (byte, s) in self.time.iter_mut().zip(tail.iter()) {
            *byte = (128.0 * (1.0 + s)).floor().max(0.0).min(255.0) as u8;
        }
    }

    /// Amplitude per frequency bin from the last transform, low to high
    pub fn frequency_bins(&self) -> &[u8] {
        &self.frequency
    }

    /// Waveform of the most recent samples, `128` is silence
    pub fn time_bins(&self) -> &[u8] {
        &self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyser(tau: f32) -> FrequencyAnalyser {
        AnalyserBuilder::new()
            .fft_size(256)
            .window(window::from_str("blackman").unwrap())
            .smoothing(tau)
            .decibels(-100.0, -30.0)
            .plan()
    }

    // Wide range so loud test signals do not saturate at 255
    fn wide_analyser(tau: f32) -> FrequencyAnalyser {
        AnalyserBuilder::new()
            .fft_size(256)
            .window(window::blackman)
            .smoothing(tau)
            .decibels(-100.0, 0.0)
            .plan()
    }

    #[test]
    fn test_init() {
        let a = analyser(0.8);

        assert_eq!(a.fft_size(), 256);
        assert_eq!(a.bins(), 128);
    }

    #[test]
    fn test_rounds_to_power_of_two() {
        let a = AnalyserBuilder::new()
            .fft_size(200)
            .window(window::none)
            .smoothing(0.0)
            .decibels(-100.0, -30.0)
            .plan();

        assert_eq!(a.fft_size(), 256);
    }

    #[test]
    fn test_silence() {
        let mut a = analyser(0.0);
        let buf = crate::analyzer::SampleBuffer::new(1024, 8000);

        a.analyze(&buf);

        assert!(a.frequency_bins().iter().all(|b| *b == 0));
        assert!(a.time_bins().iter().all(|b| *b == 128));
    }

    #[test]
    fn test_sine_peak() {
        let mut a = wide_analyser(0.0);
        let rate = 8000;
        let buf = crate::analyzer::SampleBuffer::new(1024, rate);

        // Bin 16 of a 256 point transform at 8 kHz
        let freq = a.bin_frequency(16, rate);
        buf.push(
            &(0..1024)
                .map(|i| {
                    let s = (i as f32 / rate as f32 * freq * 2.0 * std::f32::consts::PI).sin();
                    [s * 0.5, s * 0.5]
                })
                .collect::<Vec<_>>(),
        );

        a.analyze(&buf);

        let bins = a.frequency_bins();
        let peak = bins
            .iter()
            .enumerate()
            .max_by_key(|(_, b)| **b)
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 16);
        assert!(bins[16] > 180);
        assert!(bins[100] < bins[16]);
    }

    #[test]
    fn test_smoothing_decays() {
        let mut a = wide_analyser(0.8);
        let buf = crate::analyzer::SampleBuffer::new(1024, 8000);
        buf.push(&[[1.0; 2]; 1024]);
        a.analyze(&buf);
        let loud = a.frequency_bins()[0];

        buf.push(&[[0.0; 2]; 1024]);
        a.analyze(&buf);
        let after = a.frequency_bins()[0];

        assert!(after > 0);
        assert!(after < loud);
    }

    #[test]
    fn test_time_domain() {
        let mut a = analyser(0.8);
        let buf = crate::analyzer::SampleBuffer::new(1024, 8000);
        buf.push(&[[1.0; 2]; 64]);

        a.analyze(&buf);

        let time = a.time_bins();
        assert_eq!(time[0], 128);
        assert_eq!(time[127], 255);
        assert_eq!(time.len(), a.frequency_bins().len());
    }
}
