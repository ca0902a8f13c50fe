use std::fmt;
use std::str::FromStr;

/// Drawing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Mode {
    /// Flashes and glitch lines driven by the bass
    #[default]
    Pure,
    /// Floating, spinning squares
    Cubic,
    /// Spectrum ribbons around a pulsing ring
    Waves,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Pure, Mode::Cubic, Mode::Waves];

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Pure => "pure",
            Mode::Cubic => "cubic",
            Mode::Waves => "waves",
        }
    }

    /// The next mode, wrapping around
    pub fn next(&self) -> Mode {
        match self {
            Mode::Pure => Mode::Cubic,
            Mode::Cubic => Mode::Waves,
            Mode::Waves => Mode::Pure,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Mode, String> {
        Mode::ALL
            .iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("unknown mode {:?}, expected pure, cubic or waves", s))
    }
}
