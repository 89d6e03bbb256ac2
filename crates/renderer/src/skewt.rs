//! Skew-T log-P diagrams.
//!
//! Pressure runs logarithmically down the vertical axis. Isotherms lean to
//! the right by the skew angle, so temperature at a given pixel depends on
//! both x and y. Everything drawn through [`SkewT::plot`] and the adiabat
//! helpers is clipped to the plot area.

use tiny_skia::{FillRule, Mask, PathBuilder, Pixmap, Transform};
use tracing::debug;

use crate::colormap::Color;
use crate::draw;
use crate::text::{self, Anchor, TextStyle};
use crate::thermo::{self, ZERO_CELSIUS};

const MARGIN_LEFT: f32 = 60.0;
const MARGIN_RIGHT: f32 = 24.0;
const MARGIN_TOP: f32 = 24.0;
const MARGIN_BOTTOM: f32 = 40.0;

/// Isobars drawn and labeled on the background (hPa).
const ISOBARS: [f64; 10] = [1000.0, 900.0, 800.0, 700.0, 600.0, 500.0, 400.0, 300.0, 200.0, 100.0];
const ISOTHERM_SPACING_C: f64 = 10.0;
/// Pressure resolution of reference adiabats (hPa).
const ADIABAT_STEP_HPA: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct SkewTConfig {
    pub width: u32,
    pub height: u32,
    /// Pressure at the bottom edge (hPa)
    pub p_bottom: f64,
    /// Pressure at the top edge (hPa)
    pub p_top: f64,
    /// Temperature at the bottom-left corner (°C)
    pub t_left: f64,
    /// Temperature at the bottom-right corner (°C)
    pub t_right: f64,
    pub skew_degrees: f64,
    pub background: Color,
    pub grid: Color,
    pub label_size: f32,
}

impl Default for SkewTConfig {
    fn default() -> Self {
        // 9x11 aspect
        Self {
            width: 900,
            height: 1100,
            p_bottom: 1050.0,
            p_top: 100.0,
            t_left: -40.0,
            t_right: 50.0,
            skew_degrees: 45.0,
            background: Color::WHITE,
            grid: Color::opaque(190, 190, 190),
            label_size: 12.0,
        }
    }
}

/// Stroke style for a profile or reference line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width: f32,
    pub alpha: f32,
}

impl LineStyle {
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            alpha: 1.0,
        }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    fn stroke_color(&self) -> Color {
        self.color.with_alpha(self.alpha)
    }
}

pub struct SkewT {
    pixmap: Pixmap,
    config: SkewTConfig,
    left: f32,
    top: f32,
    plot_w: f32,
    plot_h: f32,
    clip: Mask,
}

impl SkewT {
    /// Create a diagram with its isobar/isotherm background drawn.
    pub fn new(config: SkewTConfig) -> Result<Self, String> {
        if !(config.p_bottom > config.p_top && config.p_top > 0.0) {
            return Err(format!(
                "pressure range must satisfy p_bottom > p_top > 0, got {} and {}",
                config.p_bottom, config.p_top
            ));
        }
        if config.t_right <= config.t_left {
            return Err(format!(
                "temperature range is empty: {} to {}",
                config.t_left, config.t_right
            ));
        }

        let mut pixmap = Pixmap::new(config.width, config.height)
            .ok_or_else(|| format!("invalid image size {}x{}", config.width, config.height))?;
        let bg = config.background;
        pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));

        let plot_w = config.width as f32 - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = config.height as f32 - MARGIN_TOP - MARGIN_BOTTOM;
        if plot_w < 1.0 || plot_h < 1.0 {
            return Err(format!(
                "image {}x{} too small for plot margins",
                config.width, config.height
            ));
        }

        let mut clip = Mask::new(config.width, config.height)
            .ok_or_else(|| "failed to allocate clip mask".to_string())?;
        let area = tiny_skia::Rect::from_xywh(MARGIN_LEFT, MARGIN_TOP, plot_w, plot_h)
            .map(PathBuilder::from_rect)
            .ok_or_else(|| "invalid plot area".to_string())?;
        clip.fill_path(&area, FillRule::Winding, false, Transform::identity());

        let mut skew = Self {
            pixmap,
            config,
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            plot_w,
            plot_h,
            clip,
        };
        skew.draw_background();
        Ok(skew)
    }

    fn bottom(&self) -> f32 {
        self.top + self.plot_h
    }

    fn skew_factor(&self) -> f32 {
        self.config.skew_degrees.to_radians().tan() as f32
    }

    /// Pixel y of pressure `p` (hPa).
    fn y_of(&self, p: f64) -> f32 {
        let c = &self.config;
        let frac = (c.p_bottom / p).ln() / (c.p_bottom / c.p_top).ln();
        self.bottom() - self.plot_h * frac as f32
    }

    /// Pixel position of (`p` hPa, `t` °C).
    ///
    /// Non-positive pressures map to NaN so they break drawn lines.
    pub fn to_pixel(&self, p: f64, t: f64) -> (f32, f32) {
        if p.is_nan() || p <= 0.0 || !t.is_finite() {
            return (f32::NAN, f32::NAN);
        }
        let c = &self.config;
        let y = self.y_of(p);
        let x = self.left
            + ((t - c.t_left) / (c.t_right - c.t_left)) as f32 * self.plot_w
            + (self.bottom() - y) * self.skew_factor();
        (x, y)
    }

    fn draw_background(&mut self) {
        let grid = self.config.grid;
        let label = TextStyle::sized(self.config.label_size);

        for p in ISOBARS {
            if p > self.config.p_bottom || p < self.config.p_top {
                continue;
            }
            let y = self.y_of(p);
            draw::stroke_polyline(
                &mut self.pixmap,
                &[(self.left, y), (self.left + self.plot_w, y)],
                grid,
                1.0,
                Some(&self.clip),
            );
            text::draw_text(
                &mut self.pixmap,
                self.left - 6.0,
                y,
                &format!("{}", p as i64),
                &label.anchored(Anchor::Right),
            );
        }

        // Lean means isotherms colder than t_left still cross the upper plot
        let span = self.config.t_right - self.config.t_left;
        let lean = (self.plot_h * self.skew_factor() / self.plot_w) as f64 * span;
        let first = ((self.config.t_left - lean) / ISOTHERM_SPACING_C).floor() * ISOTHERM_SPACING_C;
        let isotherms = thermo::arange(first, self.config.t_right + 1e-9, ISOTHERM_SPACING_C);
        let (p_bottom, p_top) = (self.config.p_bottom, self.config.p_top);
        for t in isotherms {
            let line = [self.to_pixel(p_bottom, t), self.to_pixel(p_top, t)];
            let width = if t == 0.0 { 1.5 } else { 1.0 };
            draw::stroke_polyline(&mut self.pixmap, &line, grid, width, Some(&self.clip));

            let (x, _) = line[0];
            if x >= self.left - 0.5 && x <= self.left + self.plot_w + 0.5 {
                let y = self.bottom() + self.config.label_size;
                text::draw_text(
                    &mut self.pixmap,
                    x,
                    y,
                    &format!("{}", t as i64),
                    &label.anchored(Anchor::Center),
                );
            }
        }

        text::draw_text(
            &mut self.pixmap,
            self.left - 6.0,
            self.top / 2.0,
            "hPa",
            &label.anchored(Anchor::Right),
        );
        let y = self.bottom() + 2.4 * self.config.label_size;
        text::draw_text(
            &mut self.pixmap,
            self.left + self.plot_w,
            y,
            "°C",
            &label.anchored(Anchor::Right),
        );
    }

    /// Draw a profile of temperatures (°C) against pressures (hPa).
    pub fn plot(&mut self, pressures: &[f64], temperatures: &[f64], style: &LineStyle) {
        let points: Vec<(f32, f32)> = pressures
            .iter()
            .zip(temperatures)
            .map(|(&p, &t)| self.to_pixel(p, t))
            .collect();
        draw::stroke_polyline(
            &mut self.pixmap,
            &points,
            style.stroke_color(),
            style.width,
            Some(&self.clip),
        );
    }

    fn adiabat_pressures(&self) -> Vec<f64> {
        let mut levels = thermo::arange(self.config.p_bottom, self.config.p_top, -ADIABAT_STEP_HPA);
        levels.push(self.config.p_top);
        levels
    }

    /// Dry adiabats through each starting temperature `t0` (K at 1000 hPa).
    pub fn plot_dry_adiabats(&mut self, t0s: &[f64], style: &LineStyle) {
        let pressures = self.adiabat_pressures();
        for &t0 in t0s {
            let temps: Vec<f64> = pressures
                .iter()
                .map(|&p| thermo::dry_adiabat(p, t0) - ZERO_CELSIUS)
                .collect();
            self.plot(&pressures, &temps, style);
        }
        debug!(count = t0s.len(), "Drew dry adiabats");
    }

    /// Saturated pseudo-adiabats through each starting temperature `t0`
    /// (K at 1000 hPa).
    pub fn plot_moist_adiabats(&mut self, t0s: &[f64], style: &LineStyle) {
        let pressures = self.adiabat_pressures();
        for &t0 in t0s {
            let temps: Vec<f64> = thermo::moist_adiabat(&pressures, t0)
                .into_iter()
                .map(|t| t - ZERO_CELSIUS)
                .collect();
            self.plot(&pressures, &temps, style);
        }
        debug!(count = t0s.len(), "Drew moist adiabats");
    }

    /// Draw the plot frame and hand back the finished image.
    pub fn finish(mut self) -> Pixmap {
        draw::stroke_rect(
            &mut self.pixmap,
            self.left,
            self.top,
            self.plot_w,
            self.plot_h,
            Color::BLACK,
        );
        self.pixmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagram() -> SkewT {
        SkewT::new(SkewTConfig::default()).unwrap()
    }

    #[test]
    fn test_bottom_left_corner() {
        let skew = diagram();
        let (x, y) = skew.to_pixel(1050.0, -40.0);
        assert!((x - MARGIN_LEFT).abs() < 1e-3);
        assert!((y - (1100.0 - MARGIN_BOTTOM)).abs() < 1e-3);
    }

    #[test]
    fn test_top_edge_is_p_top() {
        let skew = diagram();
        let (_, y) = skew.to_pixel(100.0, 0.0);
        assert!((y - MARGIN_TOP).abs() < 1e-3);
    }

    #[test]
    fn test_isotherms_lean_right_with_height() {
        let skew = diagram();
        let (x_low, _) = skew.to_pixel(1000.0, 0.0);
        let (x_high, _) = skew.to_pixel(500.0, 0.0);
        assert!(x_high > x_low);
    }

    #[test]
    fn test_skew_is_forty_five_degrees() {
        let skew = diagram();
        let (x1, y1) = skew.to_pixel(1000.0, 10.0);
        let (x2, y2) = skew.to_pixel(300.0, 10.0);
        assert!(((x2 - x1) - (y1 - y2)).abs() < 1e-2);
    }

    #[test]
    fn test_invalid_pressure_maps_to_nan() {
        let skew = diagram();
        assert!(skew.to_pixel(0.0, 10.0).0.is_nan());
        assert!(skew.to_pixel(f64::NAN, 10.0).0.is_nan());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SkewTConfig {
            p_top: 1100.0,
            ..Default::default()
        };
        assert!(SkewT::new(config).is_err());
    }

    #[test]
    fn test_adiabat_pressures_cover_range() {
        let levels = diagram().adiabat_pressures();
        assert_eq!(levels.first(), Some(&1050.0));
        assert_eq!(levels.last(), Some(&100.0));
    }
}
