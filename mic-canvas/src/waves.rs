//! "waves" mode: five ribbons tracing the lower spectrum and a pulsing ring.
use crate::palette;
use crate::surface::Surface;
use vis_core::Features;

pub const FADE: f32 = 0.12;
pub const RIBBONS: usize = 5;
/// Peak wobble in pixels at full bass
pub const WOBBLE: f32 = 120.0;

/// Radius of the centre ring
pub fn ring_radius(bass: f32) -> f32 {
    50.0 + 150.0 * bass
}

/// Points of ribbon `index`, spanning the full width over the first half of `bins`
pub fn ribbon(
    bins: &[u8],
    index: usize,
    width: f32,
    height: f32,
    bass: f32,
    time: f32,
) -> Vec<(f32, f32)> {
    let half = &bins[..bins.len() / 2];
    let step = if half.len() > 1 {
        width / (half.len() - 1) as f32
    } else {
        0.0
    };
    let baseline = height / 2.0 + (index as f32 - 2.0) * 12.0;
    let phase = index as f32 * 0.8;

    half.iter()
        .enumerate()
        .map(|(j, b)| {
            let amp = *b as f32 / 255.0 * (height / 4.0);
            let wobble = (j as f32 * 0.1 + time * 2.0 + phase).sin() * WOBBLE * bass;
            (j as f32 * step, baseline - amp + wobble)
        })
        .collect()
}

pub fn draw(surface: &mut Surface, f: &Features, bins: &[u8], time: f32) {
    surface.fade(FADE);

    let (w, h) = surface.size();
    let line = 1.5 + f.volume * 4.0;
    let glow = line * (2.0 + f.volume * 4.0);

    for (i, hue) in palette::HUES.iter().enumerate().take(RIBBONS) {
        let color = palette::hsl(*hue, 1.0, 0.6);
        let points = ribbon(bins, i, w, h, f.bass, time);

        surface.polyline(&points, glow, color.alpha(0.1 + f.volume * 0.15));
        surface.polyline(&points, line, color.alpha(0.8));
    }

    if f.bass > 0.0 {
        let ring = palette::hsl(palette::HUES[0], 1.0, 0.7);
        surface.ring(w / 2.0, h / 2.0, ring_radius(f.bass), 3.0, ring.alpha(f.bass));
    }
}
