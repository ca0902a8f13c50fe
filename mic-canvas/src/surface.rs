//! Drawing surface
//!
//! A `tiny_skia` pixmap sized to the viewport.  Content is always opaque, so the raw
//! (premultiplied) RGBA bytes can go straight to the screen.
use crate::palette;
use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

const MAX_SIDE: u32 = 16384;

#[derive(Debug, Clone)]
pub struct Surface {
    pixmap: Pixmap,
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

fn blank(width: u32, height: u32) -> Pixmap {
    let mut pixmap = Pixmap::new(width.max(1).min(MAX_SIDE), height.max(1).min(MAX_SIDE))
        .expect("clamped surface size is valid");
    pixmap.fill(palette::BLACK.opaque());
    pixmap
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Surface {
        Surface {
            pixmap: blank(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Width and height as floats, for drawing math
    pub fn size(&self) -> (f32, f32) {
        (self.width() as f32, self.height() as f32)
    }

    /// Change size, which also clears the content
    pub fn resize(&mut self, width: u32, height: u32) {
        log::debug!("Surface resized to {}x{}", width, height);
        self.pixmap = blank(width, height);
    }

    /// Paint everything solid black
    pub fn clear(&mut self) {
        self.pixmap.fill(palette::BLACK.opaque());
    }

    /// Darken the previous frame by a translucent black overlay
    pub fn fade(&mut self, alpha: f32) {
        self.wash(palette::BLACK.alpha(alpha));
    }

    /// Cover the whole surface with a (usually translucent) color
    pub fn wash(&mut self, color: Color) {
        let (w, h) = self.size();
        self.fill_rect(0.0, 0.0, w, h, color);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        if let Some(rect) = Rect::from_xywh(x, y, w, h) {
            self.pixmap
                .fill_rect(rect, &paint(color), Transform::identity(), None);
        }
    }

    /// Square of side `size` centred on `(cx, cy)`, rotated by `rotation` radians
    ///
    /// Filled if `fill` is given, outlined if `outline` (color, width) is given.
    pub fn square(
        &mut self,
        cx: f32,
        cy: f32,
        size: f32,
        rotation: f32,
        fill: Option<Color>,
        outline: Option<(Color, f32)>,
    ) {
        let half = size / 2.0;
        let rect = match Rect::from_xywh(-half, -half, size, size) {
            Some(r) => r,
            None => return,
        };
        let path = PathBuilder::from_rect(rect);
        let transform = Transform::from_rotate(rotation.to_degrees()).post_translate(cx, cy);

        if let Some(color) = fill {
            self.pixmap
                .fill_path(&path, &paint(color), FillRule::Winding, transform, None);
        }
        if let Some((color, width)) = outline {
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &paint(color), &stroke, transform, None);
        }
    }

    /// Open polyline through `points`
    pub fn polyline(&mut self, points: &[(f32, f32)], width: f32, color: Color) {
        let mut pb = PathBuilder::new();
        let mut iter = points.iter();
        match iter.next() {
            Some((x, y)) => pb.move_to(*x, *y),
            None => return,
        }
        for (x, y) in iter {
            pb.line_to(*x, *y);
        }

        if let Some(path) = pb.finish() {
            let stroke = Stroke {
                width,
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
        }
    }

    /// Circle outline
    pub fn ring(&mut self, cx: f32, cy: f32, radius: f32, width: f32, color: Color) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            let stroke = Stroke {
                width,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
        }
    }

    /// RGBA of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    /// Raw RGBA bytes, row major
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Whether every pixel is opaque black
    pub fn is_black(&self) -> bool {
        self.data().chunks_exact(4).all(|p| p == [0, 0, 0, 255])
    }
}
