//! Colors and continuous colormaps.

use crate::style::StyleError;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::opaque(255, 255, 255);
    pub const BLACK: Color = Color::opaque(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// Same color with alpha scaled by `alpha` in [0, 1].
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = (self.a as f32 * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }
}

/// Linear color interpolation
fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)).round() as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)).round() as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)).round() as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)).round() as u8,
    )
}

/// Piecewise-linear colormap over normalized values in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    positions: Vec<f32>,
    colors: Vec<Color>,
}

impl Colormap {
    /// Build from (position, color) stops.
    ///
    /// Needs at least two stops, positions strictly increasing from 0 to 1.
    pub fn new(stops: Vec<(f32, Color)>) -> Result<Self, StyleError> {
        if stops.len() < 2 {
            return Err(StyleError::TooFewStops(stops.len()));
        }
        let increasing = stops.windows(2).all(|w| w[0].0 < w[1].0);
        let first = stops[0].0;
        let last = stops[stops.len() - 1].0;
        if !increasing || first != 0.0 || last != 1.0 {
            return Err(StyleError::InvalidStops);
        }
        let (positions, colors) = stops.into_iter().unzip();
        Ok(Self { positions, colors })
    }

    fn from_hex_table(table: &[(f32, (u8, u8, u8))]) -> Self {
        Self {
            positions: table.iter().map(|(p, _)| *p).collect(),
            colors: table
                .iter()
                .map(|(_, (r, g, b))| Color::opaque(*r, *g, *b))
                .collect(),
        }
    }

    /// Perceptually uniform purple-to-yellow map (matplotlib's default).
    pub fn viridis() -> Self {
        Self::from_hex_table(&[
            (0.0, (68, 1, 84)),
            (0.125, (71, 44, 122)),
            (0.25, (59, 81, 139)),
            (0.375, (44, 113, 142)),
            (0.5, (33, 144, 141)),
            (0.625, (39, 173, 129)),
            (0.75, (92, 200, 99)),
            (0.875, (170, 220, 50)),
            (1.0, (253, 231, 37)),
        ])
    }

    /// Blue-white-red diverging map for signed fields.
    pub fn diverging() -> Self {
        Self::from_hex_table(&[
            (0.0, (5, 48, 97)),
            (0.25, (67, 147, 195)),
            (0.5, (247, 247, 247)),
            (0.75, (214, 96, 77)),
            (1.0, (103, 0, 31)),
        ])
    }

    pub fn grayscale() -> Self {
        Self::from_hex_table(&[(0.0, (0, 0, 0)), (1.0, (255, 255, 255))])
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "viridis" => Some(Self::viridis()),
            "diverging" | "rdbu" => Some(Self::diverging()),
            "gray" | "grey" | "grayscale" => Some(Self::grayscale()),
            _ => None,
        }
    }

    /// Color at normalized value `t`; values outside [0, 1] clamp.
    pub fn sample(&self, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let upper = self
            .positions
            .iter()
            .position(|&p| p >= t)
            .unwrap_or(self.positions.len() - 1);
        if upper == 0 {
            return self.colors[0];
        }
        let lower = upper - 1;
        let span = self.positions[upper] - self.positions[lower];
        let local = if span > 0.0 {
            (t - self.positions[lower]) / span
        } else {
            0.0
        };
        interpolate_color(self.colors[lower], self.colors[upper], local)
    }

    /// `n` evenly spaced samples, first at 0 and last at 1.
    pub fn lut(&self, n: usize) -> Vec<Color> {
        match n {
            0 => Vec::new(),
            1 => vec![self.sample(0.5)],
            _ => (0..n)
                .map(|i| self.sample(i as f32 / (n - 1) as f32))
                .collect(),
        }
    }
}
