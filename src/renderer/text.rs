//! Bitmap text as vertex quads
//!
//! Glyphs come from the `embedded-graphics` mono fonts, rasterised into a
//! draw target that emits one small quad per lit pixel.

use std::convert::Infallible;

use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use glam::Vec2;

use super::shapes::rect_into;
use super::vertex::Vertex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// 10x20 glyphs for titles and story text
    Large,
    /// 6x10 glyphs for labels
    Small,
}

impl Font {
    fn mono(self) -> &'static MonoFont<'static> {
        match self {
            Font::Large => &FONT_10X20,
            Font::Small => &FONT_6X10,
        }
    }
}

/// Where `pos` sits relative to the text box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    MidTop,
    MidBottom,
}

/// Size of `text` in logical pixels at `scale`
pub fn measure(text: &str, font: Font, scale: f32) -> Vec2 {
    let mono = font.mono();
    let count = text.chars().count() as u32;
    if count == 0 {
        return Vec2::ZERO;
    }
    let width = count * mono.character_size.width + (count - 1) * mono.character_spacing;
    Vec2::new(width as f32, mono.character_size.height as f32) * scale
}

/// Collects lit glyph pixels as quads
struct GlyphCollector<'a> {
    out: &'a mut Vec<Vertex>,
    origin: Vec2,
    scale: f32,
    color: [f32; 4],
}

impl OriginDimensions for GlyphCollector<'_> {
    fn size(&self) -> Size {
        Size::new(4096, 256)
    }
}

impl DrawTarget for GlyphCollector<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if color.is_on() {
                let pos = self.origin + Vec2::new(point.x as f32, point.y as f32) * self.scale;
                rect_into(self.out, pos, Vec2::splat(self.scale), self.color);
            }
        }
        Ok(())
    }
}

/// Append `text` to `out`
pub fn text(
    out: &mut Vec<Vertex>,
    text: &str,
    pos: Vec2,
    anchor: Anchor,
    font: Font,
    scale: f32,
    color: [f32; 4],
) {
    let size = measure(text, font, scale);
    let origin = match anchor {
        Anchor::TopLeft => pos,
        Anchor::MidTop => pos - Vec2::new(size.x / 2.0, 0.0),
        Anchor::MidBottom => pos - Vec2::new(size.x / 2.0, size.y),
    };

    let mut collector = GlyphCollector {
        out,
        origin,
        scale,
        color,
    };
    let style = MonoTextStyle::new(font.mono(), BinaryColor::On);
    let _ = Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut collector);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure() {
        assert_eq!(measure("", Font::Large, 1.0), Vec2::ZERO);
        assert_eq!(measure("abc", Font::Large, 1.0), Vec2::new(30.0, 20.0));
        assert_eq!(measure("ab", Font::Small, 2.0), Vec2::new(24.0, 20.0));
    }

    #[test]
    fn test_text_stays_inside_its_box() {
        let mut out = Vec::new();
        let pos = Vec2::new(100.0, 50.0);
        text(&mut out, "Hi!", pos, Anchor::MidTop, Font::Large, 1.0, [1.0; 4]);
        assert!(!out.is_empty());
        assert_eq!(out.len() % 6, 0);

        let size = measure("Hi!", Font::Large, 1.0);
        for v in &out {
            assert!(v.position[0] >= pos.x - size.x / 2.0 - 1e-3);
            assert!(v.position[0] <= pos.x + size.x / 2.0 + 1e-3);
            assert!(v.position[1] >= pos.y && v.position[1] <= pos.y + size.y);
        }
    }

    #[test]
    fn test_blank_text_draws_nothing() {
        let mut out = Vec::new();
        text(&mut out, "   ", Vec2::ZERO, Anchor::TopLeft, Font::Small, 1.0, [1.0; 4]);
        assert!(out.is_empty());
    }
}
