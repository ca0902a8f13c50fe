//! "cubic" mode: a fixed swarm of spinning squares.
//!
//! Bass speeds the swarm up and inflates the squares, treble spins them.
use crate::palette;
use crate::surface::Surface;
use rand::Rng;
use vis_core::Features;

pub const FADE: f32 = 0.2;
pub const COUNT: usize = 45;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: palette::Rgb,
    pub rotation: f32,
    pub spin: f32,
}

impl Particle {
    pub fn spawn<R: Rng>(rng: &mut R, width: f32, height: f32) -> Particle {
        let hue = palette::HUES[rng.gen_range(0..palette::HUES.len())];

        Particle {
            x: rng.gen_range(0.0..width.max(1.0)),
            y: rng.gen_range(0.0..height.max(1.0)),
            size: rng.gen_range(15.0..50.0),
            vx: rng.gen_range(-3.0..3.0),
            vy: rng.gen_range(-3.0..3.0),
            color: palette::hsl(hue, 0.9, 0.55),
            rotation: rng.gen_range(0.0..std::f32::consts::TAU),
            spin: rng.gen_range(-0.05..0.05),
        }
    }

    /// Advance by one frame and bounce off the edges
    pub fn step(&mut self, f: &Features, width: f32, height: f32) {
        let speed = 1.0 + f.bass * 8.0;
        self.x += self.vx * speed;
        self.y += self.vy * speed;
        self.rotation += self.spin * (1.0 + f.treble * 5.0);

        if (self.x < 0.0 && self.vx < 0.0) || (self.x > width && self.vx > 0.0) {
            self.vx = -self.vx;
        }
        if (self.y < 0.0 && self.vy < 0.0) || (self.y > height && self.vy > 0.0) {
            self.vy = -self.vy;
        }
    }

    /// Side length as drawn
    pub fn drawn_size(&self, bass: f32) -> f32 {
        self.size * (1.0 + bass * 1.5)
    }

    fn draw(&self, surface: &mut Surface, bass: f32) {
        let size = self.drawn_size(bass);

        // Glow
        for (grow, a) in [(14.0, 0.08), (7.0, 0.16)].iter() {
            surface.square(
                self.x,
                self.y,
                size + grow,
                self.rotation,
                Some(self.color.alpha(*a)),
                None,
            );
        }

        surface.square(
            self.x,
            self.y,
            size,
            self.rotation,
            Some(self.color.alpha(0.85)),
            Some((palette::WHITE.alpha(0.5), 1.5)),
        );
        surface.square(
            self.x,
            self.y,
            size * 0.4,
            self.rotation,
            Some(palette::WHITE.alpha(0.35)),
            None,
        );
    }
}

/// Draw one frame, spawning the swarm if `particles` is empty
pub fn draw<R: Rng>(
    surface: &mut Surface,
    particles: &mut Vec<Particle>,
    f: &Features,
    rng: &mut R,
) {
    surface.fade(FADE);

    let (w, h) = surface.size();
    if particles.is_empty() {
        log::debug!("Spawning {} particles", COUNT);
        particles.extend((0..COUNT).map(|_| Particle::spawn(rng, w, h)));
    }

    for p in particles.iter_mut() {
        p.step(f, w, h);
        p.draw(surface, f.bass);
    }
}
