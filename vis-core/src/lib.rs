//! Microphone capture and coarse feature extraction for audio-reactive visuals.
//!
//! Capture is owned by a [`FeatureExtractor`](extractor/struct.FeatureExtractor.html)
//! which starts out inactive.  Every frame of the loop runs one analysis tick and hands
//! out the newest [`FeatureSnapshot`](analyzer/features/struct.FeatureSnapshot.html).
//!
//! # Example
//! ```rust,no_run
//! vis_core::default_log();
//! vis_core::default_config();
//!
//! let mut frames = vis_core::Visualizer::new()
//!     .analyser(vis_core::analyzer::AnalyserBuilder::new().fft_size(256).clone())
//!     .frames();
//!
//! // Stays silent (no snapshots) when the microphone is refused
//! if let Err(e) = frames.extractor_mut().activate() {
//!     eprintln!("No microphone: {}", e);
//! }
//!
//! for frame in frames.iter() {
//!     frame.info(|snapshot| {
//!         let volume = snapshot.map(|s| s.volume).unwrap_or(0.0);
//!         println!("{}", "#".repeat((volume * 60.0) as usize));
//!     });
//!     std::thread::sleep(std::time::Duration::from_millis(16));
//! #   if frame.frame > 20 {
//! #       break;
//! #   }
//! }
//! ```
pub mod analyzer;
pub mod extractor;
pub mod frames;
pub mod helpers;
pub mod recorder;
pub mod snapshot;
pub mod visualizer;

#[doc(inline)]
pub use crate::analyzer::{EngineConfig, FeatureSnapshot, Features};
#[doc(inline)]
pub use crate::extractor::FeatureExtractor;
#[doc(inline)]
pub use crate::frames::{Frame, Frames, StopHandle};
#[doc(inline)]
pub use crate::recorder::CaptureError;
#[doc(inline)]
pub use crate::visualizer::Visualizer;

/// Global `ezconf` configuration
///
/// Filled by [`default_config`](fn.default_config.html).  Builders only look here for
/// settings that were not given explicitly.
///
/// ```rust
/// # vis_core::default_config();
/// let sensitivity: f32 = vis_core::CONFIG.get_or("engine.sensitivity", 1.0);
/// assert!(sensitivity > 0.0);
/// ```
pub static CONFIG: ezconf::Config = ezconf::INIT;

/// Load `visualizer.toml` or `config/visualizer.toml`, whichever exists first
///
/// Missing keys fall back to the defaults in code.
pub fn default_config() {
    CONFIG
        .init(
            [
                ezconf::Source::File("visualizer.toml"),
                ezconf::Source::File("config/visualizer.toml"),
            ]
            .iter(),
        )
        .expect("Can't load config");
}

/// Install `env_logger` and colored backtraces
///
/// Debug builds log at debug level unless `RUST_LOG` says otherwise.
pub fn default_log() {
    #[cfg(not(debug_assertions))]
    env_logger::init();

    #[cfg(debug_assertions)]
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    color_backtrace::install();
}
