//! "pure" mode: long trails, a faint wash, and full-screen flashes on strong bass.
use crate::palette;
use crate::surface::Surface;
use rand::Rng;
use vis_core::Features;

pub const FADE: f32 = 0.25;
pub const WASH: f32 = 0.1;
pub const FLASH_THRESHOLD: f32 = 0.5;
pub const FLASH: f32 = 0.6;
pub const GLITCH_THRESHOLD: f32 = 0.8;
pub const GLITCH_LINES: usize = 8;

/// Flash hue in degrees, cycles every 3.6 seconds
pub fn hue(time: f32) -> f32 {
    (time * 100.0).rem_euclid(360.0)
}

/// Vertical placement `(y, thickness)` of one burst of glitch lines
pub fn glitch_lines<R: Rng>(rng: &mut R, height: f32) -> Vec<(f32, f32)> {
    (0..GLITCH_LINES)
        .map(|_| {
            let thickness = rng.gen_range(2.0..6.0f32).min(height);
            let y = rng.gen_range(0.0..(height - thickness).max(f32::EPSILON));
            (y, thickness)
        })
        .collect()
}

pub fn draw<R: Rng>(surface: &mut Surface, f: &Features, time: f32, rng: &mut R) {
    surface.fade(FADE);

    let color = palette::hsl(hue(time), 1.0, 0.5);
    if f.volume > 0.0 {
        surface.wash(color.alpha(f.volume * WASH));
    }

    if f.bass > FLASH_THRESHOLD {
        surface.wash(color.alpha(f.bass * FLASH));
    }

    if f.bass > GLITCH_THRESHOLD {
        let (w, h) = surface.size();
        for (y, thickness) in glitch_lines(rng, h) {
            surface.fill_rect(0.0, y, w, thickness, palette::WHITE.alpha(0.8));
        }
        log::trace!("Glitch at bass {:.3}", f.bass);
    }
}
