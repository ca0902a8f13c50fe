pub mod features;
pub mod fourier;
pub mod samples;

pub use self::features::{extract, signal_segments, EngineConfig, FeatureSnapshot, Features};
pub use self::fourier::{window, AnalyserBuilder, FrequencyAnalyser};
pub use self::samples::{Sample, SampleBuffer};
