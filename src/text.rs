use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::canvas::Canvas;
use crate::color::Color;
use crate::error::{GaugeError, Result};
use crate::geometry::{Point, RectF};

/// Horizontal anchor of a text run relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Size and color of a text run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPaint {
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
}

impl TextPaint {
    pub fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            color,
            align: TextAlign::Left,
        }
    }
}

/// Text extents relative to the baseline origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

/// A loaded font face.
pub struct Typeface {
    font: Font<'static>,
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typeface")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl Typeface {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Font::try_from_vec(data)
            .map(|font| Self { font })
            .ok_or_else(|| GaugeError::Font("unable to parse font data".to_string()))
    }

    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    pub fn measure(&self, text: &str, size: f32) -> TextMetrics {
        let scale = Scale::uniform(size);
        let v_metrics = self.font.v_metrics(scale);
        let glyphs: Vec<PositionedGlyph> = self.font.layout(text, scale, point(0.0, 0.0)).collect();
        let width = glyphs
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);
        TextMetrics {
            width,
            ascent: v_metrics.ascent,
            descent: -v_metrics.descent,
        }
    }

    /// Draws `text` with its baseline at `y`. The origin goes through the
    /// canvas transform; glyphs stay upright.
    pub fn draw(&self, canvas: &mut Canvas, text: &str, x: f32, y: f32, paint: &TextPaint) {
        let width = self.measure(text, paint.size).width;
        let left = match paint.align {
            TextAlign::Left => x,
            TextAlign::Center => x - width * 0.5,
            TextAlign::Right => x - width,
        };
        let origin = canvas.transform().map(Point::new(left, y));
        let scale = Scale::uniform(paint.size);
        for glyph in self.font.layout(text, scale, point(origin.x, origin.y)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    canvas.blend_device_pixel(
                        bb.min.x + gx as i32,
                        bb.min.y + gy as i32,
                        paint.color,
                        v,
                    );
                });
            }
        }
    }
}

/// Measures with `typeface`, or estimates a monospace run of
/// `0.6 * size` per char when no font is loaded.
pub fn measure_text(typeface: Option<&Typeface>, text: &str, size: f32) -> TextMetrics {
    match typeface {
        Some(face) => face.measure(text, size),
        None => TextMetrics {
            width: text.chars().count() as f32 * size * 0.6,
            ascent: size * 0.8,
            descent: size * 0.2,
        },
    }
}

/// Bounds of `text` drawn at baseline `(x, y)` with `paint`.
pub fn text_bounds(typeface: Option<&Typeface>, text: &str, x: f32, y: f32, paint: &TextPaint) -> RectF {
    let m = measure_text(typeface, text, paint.size);
    let left = match paint.align {
        TextAlign::Left => x,
        TextAlign::Center => x - m.width * 0.5,
        TextAlign::Right => x - m.width,
    };
    RectF::new(left, y - m.ascent, left + m.width, y + m.descent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_without_font() {
        let m = measure_text(None, "12.5", 10.0);
        assert!((m.width - 24.0).abs() < 1e-4);
        assert!((m.ascent - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_centered_bounds() {
        let mut paint = TextPaint::new(10.0, Color::WHITE);
        paint.align = TextAlign::Center;
        let r = text_bounds(None, "ab", 50.0, 20.0, &paint);
        let expected = RectF::new(44.0, 12.0, 56.0, 22.0);
        for (got, want) in [
            (r.left, expected.left),
            (r.top, expected.top),
            (r.right, expected.right),
            (r.bottom, expected.bottom),
        ] {
            assert!((got - want).abs() < 1e-4, "{got} != {want}");
        }
    }

    #[test]
    fn test_invalid_font_data_is_an_error() {
        assert!(matches!(
            Typeface::from_bytes(vec![0, 1, 2, 3]),
            Err(GaugeError::Font(_))
        ));
    }
}
