//! Command-line argument parsing.

use clap::Parser;
use mic_canvas::Mode;
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "mic-canvas")]
#[command(about = "Microphone-reactive canvas visualizer", long_about = None)]
pub struct Args {
    /// Drawing mode to start in
    #[arg(long, value_enum, default_value_t = Mode::Pure)]
    pub mode: Mode,

    /// Gain applied to all features, clamped to 0.1..=3.0 (default from config)
    #[arg(long, value_name = "GAIN")]
    pub sensitivity: Option<f32>,

    /// Start listening right away instead of waiting for Space
    #[arg(long)]
    pub capture: bool,

    /// Window or surface width in pixels (default from config)
    #[arg(long, value_name = "PIXELS")]
    pub width: Option<u32>,

    /// Window or surface height in pixels (default from config)
    #[arg(long, value_name = "PIXELS")]
    pub height: Option<u32>,

    /// Run without a window, printing a meter line per frame
    #[arg(long)]
    pub headless: bool,

    /// Stop after this many frames (headless only)
    #[arg(long, value_name = "N", default_value = "300")]
    pub frames: usize,

    /// Write the last frame to this PNG file (headless only)
    #[arg(long, value_name = "PATH")]
    pub png: Option<PathBuf>,
}

impl Args {
    /// Surface size, CLI flags first, then `window.width` / `window.height`
    pub fn size(&self) -> (u32, u32) {
        let width = self
            .width
            .unwrap_or_else(|| vis_core::CONFIG.get_or("window.width", 1280));
        let height = self
            .height
            .unwrap_or_else(|| vis_core::CONFIG.get_or("window.height", 720));
        (width.max(1), height.max(1))
    }

    pub fn engine_config(&self) -> vis_core::EngineConfig {
        match self.sensitivity {
            Some(s) => vis_core::EngineConfig::new(s),
            None => vis_core::EngineConfig::from_config(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let args = Args::try_parse_from([
            "mic-canvas",
            "--mode",
            "waves",
            "--sensitivity",
            "9",
            "--capture",
            "--width",
            "320",
            "--height",
            "200",
            "--headless",
            "--frames",
            "12",
            "--png",
            "out.png",
        ])
        .unwrap();

        assert_eq!(args.mode, Mode::Waves);
        assert!(args.capture && args.headless);
        assert_eq!(args.size(), (320, 200));
        assert_eq!(args.frames, 12);
        assert_eq!(args.png, Some(PathBuf::from("out.png")));
        assert_eq!(args.engine_config().sensitivity(), 3.0);
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["mic-canvas"]).unwrap();

        assert_eq!(args.mode, Mode::Pure);
        assert!(!args.capture && !args.headless);
        assert_eq!(args.frames, 300);
        assert!(args.png.is_none());
    }

    #[test]
    fn test_bad_mode() {
        assert!(Args::try_parse_from(["mic-canvas", "--mode", "disco"]).is_err());
    }
}
