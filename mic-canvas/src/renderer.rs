//! Feature snapshot to pixels
use crate::cubic::{self, Particle};
use crate::mode::Mode;
use crate::surface::Surface;
use crate::{pure, waves};
use rand::rngs::StdRng;
use rand::SeedableRng;
use vis_core::{EngineConfig, FeatureSnapshot};

/// Draws frames onto a [`Surface`](../surface/struct.Surface.html)
///
/// Holds the only persistent drawing state, the cubic particle set, which survives mode
/// switches and resizes.
#[derive(Debug)]
pub struct Renderer {
    surface: Surface,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Renderer {
        Renderer::with_rng(width, height, StdRng::from_entropy())
    }

    /// Renderer with a reproducible random source
    pub fn with_seed(width: u32, height: u32, seed: u64) -> Renderer {
        Renderer::with_rng(width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: u32, height: u32, rng: StdRng) -> Renderer {
        Renderer {
            surface: Surface::new(width, height),
            particles: Vec::new(),
            rng,
        }
    }

    /// Recreate the surface, which clears it.  Particles are kept as they are.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.surface.width(), self.surface.height()) {
            self.surface.resize(width, height);
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Paint one frame
    ///
    /// Without a snapshot the surface is cleared to black.  `time` is in seconds and drives
    /// the color cycling and wobble.
    pub fn render(
        &mut self,
        snapshot: Option<&FeatureSnapshot>,
        mode: Mode,
        config: &EngineConfig,
        time: f32,
    ) {
        let snapshot = match snapshot {
            Some(s) => s,
            None => {
                self.surface.clear();
                return;
            }
        };

        let f = snapshot.features().scaled(config);
        match mode {
            Mode::Pure => pure::draw(&mut self.surface, &f, time, &mut self.rng),
            Mode::Cubic => cubic::draw(&mut self.surface, &mut self.particles, &f, &mut self.rng),
            Mode::Waves => waves::draw(&mut self.surface, &f, &snapshot.frequency_bins, time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vis_core::analyzer;

    fn snapshot(level: u8) -> FeatureSnapshot {
        analyzer::extract(&[level; 128], &[128; 128])
    }

    fn config() -> EngineConfig {
        EngineConfig::new(1.0)
    }

    #[test]
    fn test_idle_black() {
        let mut r = Renderer::with_seed(64, 48, 1);

        r.render(Some(&snapshot(255)), Mode::Pure, &config(), 0.0);
        assert!(!r.surface().is_black());

        r.render(None, Mode::Pure, &config(), 0.1);
        assert!(r.surface().is_black());
    }

    #[test]
    fn test_full_scale_pure() {
        let mut r = Renderer::with_seed(64, 48, 2);

        r.render(Some(&snapshot(255)), Mode::Pure, &config(), 0.0);

        let white_rows = (0..48)
            .filter(|y| {
                (0..64).all(|x| {
                    let p = r.surface().pixel(x, *y).unwrap();
                    p[0] >= 190 && p[1] >= 190 && p[2] >= 190
                })
            })
            .count();
        assert!(white_rows >= 1);
    }

    #[test]
    fn test_silence_pure() {
        let mut r = Renderer::with_seed(64, 48, 3);

        for i in 0..10 {
            r.render(Some(&snapshot(0)), Mode::Pure, &config(), i as f32 * 0.016);
        }

        assert!(r.surface().is_black());
    }

    #[test]
    fn test_sensitivity_floor() {
        let mut r = Renderer::with_seed(64, 48, 4);

        // 0.4 * 0.1 keeps bass far below the flash threshold
        let quiet = EngineConfig::new(0.0);
        r.render(Some(&snapshot(102)), Mode::Pure, &quiet, 0.0);

        let p = r.surface().pixel(5, 5).unwrap();
        assert!(p[0] < 20, "{:?}", p);
    }

    #[test]
    fn test_particles_survive_mode_switch() {
        let mut r = Renderer::with_seed(200, 100, 5);
        let s = snapshot(80);

        r.render(Some(&s), Mode::Cubic, &config(), 0.0);
        assert_eq!(r.particles().len(), cubic::COUNT);
        let sizes = r.particles().iter().map(|p| p.size).collect::<Vec<_>>();

        r.render(Some(&s), Mode::Pure, &config(), 0.1);
        r.render(Some(&s), Mode::Waves, &config(), 0.2);
        r.render(None, Mode::Cubic, &config(), 0.3);
        r.render(Some(&s), Mode::Cubic, &config(), 0.4);

        assert_eq!(r.particles().len(), cubic::COUNT);
        assert_eq!(
            r.particles().iter().map(|p| p.size).collect::<Vec<_>>(),
            sizes
        );
    }

    #[test]
    fn test_resize_keeps_particles() {
        let mut r = Renderer::with_seed(200, 100, 6);
        r.render(Some(&snapshot(80)), Mode::Cubic, &config(), 0.0);
        let before = r.particles().to_vec();

        r.resize(50, 40);

        assert_eq!((r.surface().width(), r.surface().height()), (50, 40));
        assert!(r.surface().is_black());
        assert_eq!(r.particles(), &before[..]);
    }

    #[test]
    fn test_waves_draws() {
        let mut r = Renderer::with_seed(128, 96, 7);

        r.render(Some(&snapshot(120)), Mode::Waves, &config(), 1.0);

        assert!(!r.surface().is_black());
        assert!(r.particles().is_empty());
    }
}
