//! Text labels rendered with an embedded TrueType font.
//!
//! Glyph coverage from rusttype is blended straight into the pixmap's
//! premultiplied pixels.

use rusttype::{point, Font, PositionedGlyph, Scale};
use tiny_skia::{Pixmap, PremultipliedColorU8};

use crate::colormap::Color;
use crate::draw;

/// Embedded font data - DejaVu Sans Mono (a clean, readable monospace font)
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

fn load_font() -> Option<Font<'static>> {
    let font = Font::try_from_bytes(FONT_DATA);
    if font.is_none() {
        tracing::warn!("Failed to load embedded label font");
    }
    font
}

/// Horizontal placement of a label relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    pub color: Color,
    /// Box drawn behind the text for legibility over data
    pub background: Option<Color>,
    pub anchor: Anchor,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 12.0,
            color: Color::BLACK,
            background: None,
            anchor: Anchor::Left,
        }
    }
}

impl TextStyle {
    pub fn sized(size: f32) -> Self {
        Self {
            size,
            ..Default::default()
        }
    }

    pub fn anchored(self, anchor: Anchor) -> Self {
        Self { anchor, ..self }
    }

    pub fn on(self, background: Color) -> Self {
        Self {
            background: Some(background),
            ..self
        }
    }
}

/// Title and axis captions of a figure.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlotLabels<'a> {
    pub title: &'a str,
    pub x: &'a str,
    pub y: &'a str,
}

fn layout<'f>(font: &'f Font<'static>, text: &str, size: f32, x: f32, baseline: f32) -> Vec<PositionedGlyph<'f>> {
    font.layout(text, Scale::uniform(size), point(x, baseline))
        .collect()
}

fn advance(font: &Font<'static>, text: &str, size: f32) -> f32 {
    layout(font, text, size, 0.0, 0.0)
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Width in pixels that `text` occupies at font size `size`.
pub fn text_width(text: &str, size: f32) -> f32 {
    load_font().map_or(0.0, |font| advance(&font, text, size))
}

/// Draw `text` with its vertical center at `y`.
pub fn draw_text(pixmap: &mut Pixmap, x: f32, y: f32, text: &str, style: &TextStyle) {
    let Some(font) = load_font() else {
        return;
    };
    let width = advance(&font, text, style.size);
    let left = match style.anchor {
        Anchor::Left => x,
        Anchor::Center => x - width / 2.0,
        Anchor::Right => x - width,
    };

    let metrics = font.v_metrics(Scale::uniform(style.size));
    // descent is negative; center the ascent..descent box on y
    let baseline = y + (metrics.ascent + metrics.descent) / 2.0;

    if let Some(bg) = style.background {
        let pad = style.size * 0.2;
        draw::fill_rect(
            pixmap,
            left - pad,
            baseline - metrics.ascent - pad,
            width + 2.0 * pad,
            metrics.ascent - metrics.descent + 2.0 * pad,
            bg,
        );
    }

    for glyph in layout(&font, text, style.size, left, baseline) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            blend(pixmap, bb.min.x + gx as i32, bb.min.y + gy as i32, style.color, coverage);
        });
    }
}

/// Source-over blend of `color` at `coverage` into one pixel.
fn blend(pixmap: &mut Pixmap, x: i32, y: i32, color: Color, coverage: f32) {
    let (w, h) = (pixmap.width() as i32, pixmap.height() as i32);
    if x < 0 || y < 0 || x >= w || y >= h {
        return;
    }
    let idx = (y * w + x) as usize;
    let dst = pixmap.pixels()[idx];

    let sa = coverage.clamp(0.0, 1.0) * color.a as f32 / 255.0;
    let over = |s: f32, d: u8| (s * sa + d as f32 * (1.0 - sa)).round() as u8;
    let blended = PremultipliedColorU8::from_rgba(
        over(color.r as f32, dst.red()),
        over(color.g as f32, dst.green()),
        over(color.b as f32, dst.blue()),
        over(255.0, dst.alpha()),
    );
    if let Some(px) = blended {
        pixmap.pixels_mut()[idx] = px;
    }
}

/// Tick label for `value`: fixed point for moderate magnitudes, else scientific.
pub fn format_tick(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let magnitude = value.abs();
    if magnitude == 0.0 {
        "0".to_string()
    } else if !(1e-2..1e4).contains(&magnitude) {
        format!("{:.2e}", value)
    } else if magnitude >= 100.0 {
        format!("{:.0}", value)
    } else if magnitude >= 1.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.3}", value)
    }
}
