//! Color-mapped rendering of 2-D field slices.
//!
//! Values are laid out row-major with row 0 at the bottom of the plot, the
//! usual orientation for vertical (x-z) cross sections. Each cell is drawn
//! as a flat nearest-neighbor block; NaN cells get the no-data color.

use rayon::prelude::*;
use tiny_skia::{ColorU8, Pixmap};

use crate::colormap::{Color, Colormap};
use crate::draw;
use crate::text::{self, Anchor, PlotLabels, TextStyle};

const MARGIN_LEFT: f32 = 56.0;
const MARGIN_RIGHT: f32 = 110.0;
const MARGIN_TOP: f32 = 36.0;
const MARGIN_BOTTOM: f32 = 44.0;
const COLORBAR_GAP: f32 = 16.0;
const COLORBAR_WIDTH: f32 = 20.0;

#[derive(Debug, Clone)]
pub struct FieldPlotOptions {
    pub width: u32,
    pub height: u32,
    /// Center the color scale on zero
    pub symmetric: bool,
    pub background: Color,
    pub nodata: Color,
    pub colorbar: bool,
    pub label_size: f32,
}

impl Default for FieldPlotOptions {
    fn default() -> Self {
        Self {
            width: 900,
            height: 450,
            symmetric: false,
            background: Color::WHITE,
            nodata: Color::opaque(200, 200, 200),
            colorbar: true,
            label_size: 11.0,
        }
    }
}

/// Data range used for color scaling, ignoring non-finite values.
pub fn color_range(values: &[f64], symmetric: bool) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    if symmetric {
        let m = lo.abs().max(hi.abs());
        Some((-m, m))
    } else {
        Some((lo, hi))
    }
}

fn normalize(v: f64, lo: f64, hi: f64) -> f32 {
    if hi > lo {
        ((v - lo) / (hi - lo)) as f32
    } else {
        0.5
    }
}

fn premultiplied(color: Color) -> tiny_skia::PremultipliedColorU8 {
    ColorU8::from_rgba(color.r, color.g, color.b, color.a).premultiply()
}

/// Render an `nrows` x `ncols` field into a new pixmap.
pub fn render_field(
    values: &[f64],
    nrows: usize,
    ncols: usize,
    colormap: &Colormap,
    labels: &PlotLabels,
    options: &FieldPlotOptions,
) -> Result<Pixmap, String> {
    if nrows == 0 || ncols == 0 {
        return Err(format!("cannot plot an empty {}x{} field", nrows, ncols));
    }
    if values.len() != nrows * ncols {
        return Err(format!(
            "field has {} values, expected {}x{}",
            values.len(),
            nrows,
            ncols
        ));
    }

    let mut pixmap = Pixmap::new(options.width, options.height)
        .ok_or_else(|| format!("invalid image size {}x{}", options.width, options.height))?;
    pixmap.fill(tiny_skia::Color::from_rgba8(
        options.background.r,
        options.background.g,
        options.background.b,
        options.background.a,
    ));

    let right_margin = if options.colorbar { MARGIN_RIGHT } else { 20.0 };
    let plot_w = options.width as f32 - MARGIN_LEFT - right_margin;
    let plot_h = options.height as f32 - MARGIN_TOP - MARGIN_BOTTOM;
    if plot_w < 1.0 || plot_h < 1.0 {
        return Err(format!(
            "image {}x{} too small for plot margins",
            options.width, options.height
        ));
    }

    let (lo, hi) = color_range(values, options.symmetric).unwrap_or((0.0, 1.0));
    let lut: Vec<_> = colormap
        .lut(256)
        .into_iter()
        .map(premultiplied)
        .collect();
    let nodata = premultiplied(options.nodata);

    let x0 = MARGIN_LEFT as usize;
    let y0 = MARGIN_TOP as usize;
    let pw = plot_w as usize;
    let ph = plot_h as usize;
    let stride = options.width as usize;

    pixmap
        .pixels_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .skip(y0)
        .take(ph)
        .for_each(|(py, row)| {
            // Flip so row 0 sits at the bottom
            let from_bottom = ph - 1 - (py - y0);
            let data_row = (from_bottom * nrows / ph).min(nrows - 1);
            for px in 0..pw {
                let data_col = (px * ncols / pw).min(ncols - 1);
                let v = values[data_row * ncols + data_col];
                row[x0 + px] = if v.is_finite() {
                    let t = normalize(v, lo, hi).clamp(0.0, 1.0);
                    lut[(t * 255.0).round() as usize]
                } else {
                    nodata
                };
            }
        });

    draw::stroke_rect(
        &mut pixmap,
        MARGIN_LEFT,
        MARGIN_TOP,
        pw as f32,
        ph as f32,
        Color::BLACK,
    );

    let label = TextStyle::sized(options.label_size);
    let bottom = MARGIN_TOP + ph as f32;
    let tick_y = bottom + options.label_size;
    text::draw_text(&mut pixmap, MARGIN_LEFT, tick_y, "0", &label.anchored(Anchor::Center));
    text::draw_text(
        &mut pixmap,
        MARGIN_LEFT + pw as f32,
        tick_y,
        &(ncols - 1).to_string(),
        &label.anchored(Anchor::Center),
    );
    text::draw_text(&mut pixmap, MARGIN_LEFT - 6.0, bottom, "0", &label.anchored(Anchor::Right));
    text::draw_text(
        &mut pixmap,
        MARGIN_LEFT - 6.0,
        MARGIN_TOP,
        &(nrows - 1).to_string(),
        &label.anchored(Anchor::Right),
    );

    draw_captions(&mut pixmap, labels, pw as f32, ph as f32, options.label_size);

    if options.colorbar {
        draw_colorbar(&mut pixmap, colormap, lo, hi, MARGIN_LEFT + pw as f32 + COLORBAR_GAP, ph as f32, options);
    }

    Ok(pixmap)
}

fn draw_captions(pixmap: &mut Pixmap, labels: &PlotLabels, plot_w: f32, plot_h: f32, size: f32) {
    let caption = TextStyle::sized(size);
    text::draw_text(
        pixmap,
        MARGIN_LEFT + plot_w / 2.0,
        MARGIN_TOP / 2.0,
        labels.title,
        &TextStyle::sized(size * 1.3).anchored(Anchor::Center),
    );
    text::draw_text(
        pixmap,
        MARGIN_LEFT + plot_w / 2.0,
        MARGIN_TOP + plot_h + 2.4 * size,
        labels.x,
        &caption.anchored(Anchor::Center),
    );
    text::draw_text(
        pixmap,
        MARGIN_LEFT - 6.0,
        MARGIN_TOP + plot_h / 2.0,
        labels.y,
        &caption.anchored(Anchor::Right),
    );
}

fn draw_colorbar(
    pixmap: &mut Pixmap,
    colormap: &Colormap,
    lo: f64,
    hi: f64,
    x: f32,
    height: f32,
    options: &FieldPlotOptions,
) {
    let steps = height.max(1.0) as usize;
    for i in 0..steps {
        let t = 1.0 - i as f32 / (steps - 1).max(1) as f32;
        draw::fill_rect(pixmap, x, MARGIN_TOP + i as f32, COLORBAR_WIDTH, 1.0, colormap.sample(t));
    }
    draw::stroke_rect(pixmap, x, MARGIN_TOP, COLORBAR_WIDTH, height, Color::BLACK);

    let label = TextStyle::sized(options.label_size).anchored(Anchor::Left);
    let text_x = x + COLORBAR_WIDTH + 6.0;
    let mid = 0.5 * (lo + hi);
    for (value, y) in [
        (hi, MARGIN_TOP),
        (mid, MARGIN_TOP + height / 2.0),
        (lo, MARGIN_TOP + height),
    ] {
        text::draw_text(pixmap, text_x, y, &text::format_tick(value), &label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> ColorU8 {
        pixmap.pixel(x, y).unwrap().demultiply()
    }

    #[test]
    fn test_color_range() {
        assert_eq!(color_range(&[1.0, f64::NAN, -2.0], false), Some((-2.0, 1.0)));
        assert_eq!(color_range(&[1.0, -2.0], true), Some((-2.0, 2.0)));
        assert_eq!(color_range(&[f64::NAN], false), None);
    }

    #[test]
    fn test_row_zero_drawn_at_bottom() {
        let options = FieldPlotOptions {
            width: 200,
            height: 120,
            colorbar: false,
            ..Default::default()
        };
        let cmap = Colormap::grayscale();
        // Two rows: bottom row black (0), top row white (1)
        let pixmap = render_field(&[0.0, 0.0, 1.0, 1.0], 2, 2, &cmap, &PlotLabels::default(), &options).unwrap();

        let near_top = pixel(&pixmap, 100, MARGIN_TOP as u32 + 5);
        let near_bottom = pixel(&pixmap, 100, 120 - MARGIN_BOTTOM as u32 - 5);
        assert_eq!(near_top.red(), 255);
        assert_eq!(near_bottom.red(), 0);
    }

    #[test]
    fn test_nan_uses_nodata_color() {
        let options = FieldPlotOptions {
            width: 200,
            height: 120,
            colorbar: false,
            nodata: Color::opaque(255, 0, 255),
            ..Default::default()
        };
        let pixmap =
            render_field(&[f64::NAN, 1.0], 1, 2, &Colormap::viridis(), &PlotLabels::default(), &options).unwrap();
        let left = pixel(&pixmap, MARGIN_LEFT as u32 + 10, 60);
        assert_eq!((left.red(), left.green(), left.blue()), (255, 0, 255));
    }

    #[test]
    fn test_shape_mismatch_is_error() {
        let err = render_field(
            &[1.0; 5],
            2,
            3,
            &Colormap::viridis(),
            &PlotLabels::default(),
            &FieldPlotOptions::default(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_constant_field_renders() {
        let pixmap = render_field(
            &[3.0; 12],
            3,
            4,
            &Colormap::viridis(),
            &PlotLabels::default(),
            &FieldPlotOptions::default(),
        );
        assert!(pixmap.is_ok());
    }

    #[test]
    fn test_title_is_drawn_above_plot() {
        let options = FieldPlotOptions {
            width: 300,
            height: 160,
            colorbar: false,
            ..Default::default()
        };
        let inked = |title: &str| {
            let labels = PlotLabels {
                title,
                ..Default::default()
            };
            let pixmap = render_field(&[1.0, 2.0], 1, 2, &Colormap::viridis(), &labels, &options).unwrap();
            (0..300u32)
                .flat_map(|x| (0..MARGIN_TOP as u32 - 8).map(move |y| (x, y)))
                .filter(|&(x, y)| pixel(&pixmap, x, y).red() < 128)
                .count()
        };
        assert_eq!(inked(""), 0);
        assert!(inked("qxz.0") > 10);
    }
}
