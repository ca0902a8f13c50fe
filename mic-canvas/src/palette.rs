//! Colors

/// Fixed hues (degrees) shared by the cubic and waves modes
pub const HUES: [f32; 5] = [190.0, 280.0, 320.0, 45.0, 150.0];

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// This color with the given opacity
    pub fn alpha(&self, a: f32) -> tiny_skia::Color {
        let a = (a.max(0.0).min(1.0) * 255.0).round() as u8;
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, a)
    }

    pub fn opaque(&self) -> tiny_skia::Color {
        self.alpha(1.0)
    }
}

/// HSL to RGB, hue in degrees, saturation and lightness in `[0, 1]`
pub fn hsl(h: f32, s: f32, l: f32) -> Rgb {
    let h = h.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let byte = |v: f32| ((v + m) * 255.0).round().max(0.0).min(255.0) as u8;
    Rgb {
        r: byte(r),
        g: byte(g),
        b: byte(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primaries() {
        assert_eq!(hsl(0.0, 1.0, 0.5), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(hsl(120.0, 1.0, 0.5), Rgb { r: 0, g: 255, b: 0 });
        assert_eq!(hsl(240.0, 1.0, 0.5), Rgb { r: 0, g: 0, b: 255 });
        assert_eq!(hsl(360.0, 1.0, 0.5), hsl(0.0, 1.0, 0.5));
        assert_eq!(hsl(-120.0, 1.0, 0.5), hsl(240.0, 1.0, 0.5));
    }

    #[test]
    fn test_grey() {
        assert_eq!(hsl(77.0, 0.0, 1.0), WHITE);
        assert_eq!(hsl(77.0, 0.0, 0.0), BLACK);
    }
}
