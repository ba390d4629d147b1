//! Software canvas for layered windows.
//!
//! Pixels are premultiplied BGRA (`0xAARRGGBB` in a `u32`), the format
//! `UpdateLayeredWindow` expects with `AC_SRC_ALPHA`.

use crate::appearance::Color;
use crate::rect::Rect;

/// Corner radii in pixels, clockwise from top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadii {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl CornerRadii {
    pub fn uniform(r: f64) -> Self {
        Self {
            top_left: r,
            top_right: r,
            bottom_right: r,
            bottom_left: r,
        }
    }

    /// Flat top edge, rounded bottom corners. Used for a tab hanging from
    /// the top of the screen.
    pub fn bottom(r: f64) -> Self {
        Self {
            top_left: 0.0,
            top_right: 0.0,
            bottom_right: r,
            bottom_left: r,
        }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            top_left: self.top_left * factor,
            top_right: self.top_right * factor,
            bottom_right: self.bottom_right * factor,
            bottom_left: self.bottom_left * factor,
        }
    }
}

/// A pixel rectangle with fractional coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub radii: CornerRadii,
}

impl Shape {
    /// Signed distance from (`px`, `py`) to the shape outline; negative
    /// inside.
    fn distance(&self, px: f64, py: f64) -> f64 {
        let hw = self.w / 2.0;
        let hh = self.h / 2.0;
        let dx = px - (self.x + hw);
        let dy = py - (self.y + hh);
        let r = match (dx >= 0.0, dy >= 0.0) {
            (false, false) => self.radii.top_left,
            (true, false) => self.radii.top_right,
            (true, true) => self.radii.bottom_right,
            (false, true) => self.radii.bottom_left,
        }
        .min(hw)
        .min(hh)
        .max(0.0);
        let qx = dx.abs() - hw + r;
        let qy = dy.abs() - hh + r;
        let outside = qx.max(0.0).hypot(qy.max(0.0));
        outside + qx.max(qy).min(0.0) - r
    }
}

/// Converts a color with straight alpha (0-255) to a premultiplied pixel.
pub fn pixel_from_color_alpha(c: Color, alpha: u8) -> u32 {
    let a = u32::from(alpha);
    let r = u32::from(c.r) * a / 255;
    let g = u32::from(c.g) * a / 255;
    let b = u32::from(c.b) * a / 255;
    (a << 24) | (r << 16) | (g << 8) | b
}

/// Converts a color to a fully opaque pixel.
pub fn pixel_from_color(c: Color) -> u32 {
    pixel_from_color_alpha(c, 0xFF)
}

/// An owned premultiplied BGRA bitmap.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub width: i32,
    pub height: i32,
    pub pixels: Vec<u32>,
}

impl Canvas {
    /// A fully transparent canvas.
    pub fn new(width: i32, height: i32) -> Self {
        let (w, h) = (width.max(0), height.max(0));
        Self {
            width: w,
            height: h,
            pixels: vec![0; (w * h) as usize],
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Alpha-blends `src` (premultiplied) over the pixel at (`x`, `y`)
    /// scaled by `coverage` in [0, 1].
    fn blend(&mut self, x: i32, y: i32, src: u32, coverage: f64) {
        if coverage <= 0.0 || x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        let idx = (y * self.width + x) as usize;
        let cov = (coverage.min(1.0) * 256.0) as u32;
        let scale = |v: u32| (v * cov) >> 8;
        let sa = scale(src >> 24);
        let sr = scale((src >> 16) & 0xFF);
        let sg = scale((src >> 8) & 0xFF);
        let sb = scale(src & 0xFF);

        let dst = self.pixels[idx];
        let inv = 255 - sa;
        let over = |s: u32, d: u32| s + d * inv / 255;
        let a = over(sa, dst >> 24);
        let r = over(sr, (dst >> 16) & 0xFF);
        let g = over(sg, (dst >> 8) & 0xFF);
        let b = over(sb, dst & 0xFF);
        self.pixels[idx] = (a.min(255) << 24) | (r.min(255) << 16) | (g.min(255) << 8) | b.min(255);
    }

    /// Fills `shape` with `color` at `alpha`, antialiasing the outline.
    pub fn fill_shape(&mut self, shape: Shape, color: Color, alpha: u8) {
        let src = pixel_from_color_alpha(color, alpha);
        let (x0, y0, x1, y1) = self.bounds(shape, 1.0);
        for py in y0..y1 {
            for px in x0..x1 {
                let d = shape.distance(f64::from(px) + 0.5, f64::from(py) + 0.5);
                self.blend(px, py, src, 0.5 - d);
            }
        }
    }

    /// Draws a soft shadow around `shape`, shifted down by `depth` pixels
    /// and fading out over `blur` pixels.
    pub fn shadow(&mut self, shape: Shape, color: Color, opacity: f64, depth: f64, blur: f64) {
        if opacity <= 0.0 {
            return;
        }
        let shifted = Shape {
            y: shape.y + depth,
            ..shape
        };
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0) as u8;
        let src = pixel_from_color_alpha(color, alpha);
        let blur = blur.max(1.0);
        let (x0, y0, x1, y1) = self.bounds(shifted, blur + 1.0);
        for py in y0..y1 {
            for px in x0..x1 {
                let d = shifted.distance(f64::from(px) + 0.5, f64::from(py) + 0.5);
                let falloff = if d <= 0.0 {
                    1.0
                } else {
                    let f = (1.0 - d / blur).max(0.0);
                    f * f
                };
                self.blend(px, py, src, falloff);
            }
        }
    }

    fn bounds(&self, shape: Shape, pad: f64) -> (i32, i32, i32, i32) {
        let x0 = ((shape.x - pad).floor() as i32).max(0);
        let y0 = ((shape.y - pad).floor() as i32).max(0);
        let x1 = ((shape.x + shape.w + pad).ceil() as i32).min(self.width);
        let y1 = ((shape.y + shape.h + pad).ceil() as i32).min(self.height);
        (x0, y0, x1, y1)
    }
}

/// Text to draw over a canvas, centered in `bounds`.
///
/// Text rendering is left to the platform (GDI), which draws labels after
/// the canvas is filled.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub bounds: Rect,
    pub color: Color,
    /// Font cell height in pixels.
    pub font_px: i32,
    pub bold: bool,
}

/// A rendered window surface: pixels plus the labels to draw on top.
#[derive(Debug, Clone)]
pub struct Frame {
    pub canvas: Canvas,
    pub labels: Vec<Label>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: Color = Color {
        r: 0x40,
        g: 0x70,
        b: 0xFF,
    };

    #[test]
    fn premultiplied_pixel_scales_channels() {
        assert_eq!(pixel_from_color(BLUE), 0xFF40_70FF);
        assert_eq!(
            pixel_from_color_alpha(Color::WHITE, 0x80),
            0x8080_8080
        );
        assert_eq!(pixel_from_color_alpha(BLUE, 0), 0);
    }

    #[test]
    fn fill_covers_interior_and_leaves_outside_transparent() {
        // Arrange
        let mut canvas = Canvas::new(20, 20);
        let shape = Shape {
            x: 5.0,
            y: 5.0,
            w: 10.0,
            h: 10.0,
            radii: CornerRadii::default(),
        };

        // Act
        canvas.fill_shape(shape, BLUE, 0xFF);

        // Assert
        assert_eq!(canvas.pixel(10, 10), Some(0xFF40_70FF));
        assert_eq!(canvas.pixel(2, 2), Some(0));
        assert_eq!(canvas.pixel(30, 2), None);
    }

    #[test]
    fn bottom_radii_round_only_the_bottom_corners() {
        // Arrange
        let mut canvas = Canvas::new(20, 20);
        let shape = Shape {
            x: 0.0,
            y: 0.0,
            w: 20.0,
            h: 20.0,
            radii: CornerRadii::bottom(6.0),
        };

        // Act
        canvas.fill_shape(shape, BLUE, 0xFF);

        // Assert: top corners are square, bottom corners are cut.
        assert_eq!(canvas.pixel(0, 0), Some(0xFF40_70FF));
        assert_eq!(canvas.pixel(19, 0), Some(0xFF40_70FF));
        assert_eq!(canvas.pixel(0, 19), Some(0));
        assert_eq!(canvas.pixel(19, 19), Some(0));
    }

    #[test]
    fn shadow_fades_with_distance() {
        // Arrange
        let mut canvas = Canvas::new(40, 40);
        let shape = Shape {
            x: 10.0,
            y: 10.0,
            w: 20.0,
            h: 10.0,
            radii: CornerRadii::default(),
        };

        // Act
        canvas.shadow(shape, BLUE, 1.0, 2.0, 8.0);

        // Assert: alpha decreases moving away below the shape.
        let alpha = |y| canvas.pixel(20, y).unwrap() >> 24;
        assert!(alpha(23) > alpha(26));
        assert!(alpha(26) > alpha(29));
        assert_eq!(alpha(39), 0);
    }
}
