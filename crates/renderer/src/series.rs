//! Time-series line plots for scalar statistics.

use tiny_skia::Pixmap;

use crate::colormap::Color;
use crate::draw;
use crate::text::{self, Anchor, PlotLabels, TextStyle};

const MARGIN_LEFT: f32 = 80.0;
const MARGIN_RIGHT: f32 = 24.0;
const MARGIN_TOP: f32 = 36.0;
const MARGIN_BOTTOM: f32 = 44.0;

#[derive(Debug, Clone)]
pub struct SeriesPlotOptions {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub line: Color,
    pub line_width: f32,
    /// Draw a dashed-gray y=0 reference when zero is in range
    pub zero_line: bool,
    pub label_size: f32,
}

impl Default for SeriesPlotOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            background: Color::WHITE,
            line: Color::opaque(31, 119, 180),
            line_width: 1.5,
            zero_line: true,
            label_size: 11.0,
        }
    }
}

/// Fractional change of each sample from the first one.
///
/// When the first sample is zero the absolute change is returned instead.
pub fn relative_change(values: &[f64]) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    if first == 0.0 {
        values.iter().map(|v| v - first).collect()
    } else {
        values.iter().map(|v| (v - first) / first).collect()
    }
}

/// Index and value of the smallest and largest finite samples.
fn extrema(values: &[f64]) -> Option<((usize, f64), (usize, f64))> {
    values
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .fold(None, |acc, (i, v)| match acc {
            None => Some(((i, v), (i, v))),
            Some((min, max)) => Some((
                if v < min.1 { (i, v) } else { min },
                if v > max.1 { (i, v) } else { max },
            )),
        })
}

/// Plot `values` against sample index.
pub fn render_series(
    values: &[f64],
    labels: &PlotLabels,
    options: &SeriesPlotOptions,
) -> Result<Pixmap, String> {
    let mut pixmap = Pixmap::new(options.width, options.height)
        .ok_or_else(|| format!("invalid image size {}x{}", options.width, options.height))?;
    let bg = options.background;
    pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));

    let plot_w = options.width as f32 - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = options.height as f32 - MARGIN_TOP - MARGIN_BOTTOM;
    if plot_w < 1.0 || plot_h < 1.0 {
        return Err(format!(
            "image {}x{} too small for plot margins",
            options.width, options.height
        ));
    }
    let bottom = MARGIN_TOP + plot_h;

    draw::stroke_rect(&mut pixmap, MARGIN_LEFT, MARGIN_TOP, plot_w, plot_h, Color::BLACK);
    draw_captions(&mut pixmap, labels, plot_w, plot_h, options.label_size);

    let Some(((min_i, min_v), (max_i, max_v))) = extrema(values) else {
        // Nothing finite to draw; an empty frame still marks the request
        return Ok(pixmap);
    };

    // Pad flat series so the line sits mid-plot
    let (lo, hi) = if max_v > min_v {
        let pad = 0.05 * (max_v - min_v);
        (min_v - pad, max_v + pad)
    } else {
        let pad = if min_v == 0.0 { 1.0 } else { 0.05 * min_v.abs() };
        (min_v - pad, max_v + pad)
    };

    let n = values.len();
    let x_of = |i: usize| -> f32 {
        if n > 1 {
            MARGIN_LEFT + plot_w * i as f32 / (n - 1) as f32
        } else {
            MARGIN_LEFT + plot_w / 2.0
        }
    };
    let y_of = |v: f64| -> f32 { bottom - plot_h * ((v - lo) / (hi - lo)) as f32 };

    if options.zero_line && lo < 0.0 && hi > 0.0 {
        draw::stroke_polyline(
            &mut pixmap,
            &[(MARGIN_LEFT, y_of(0.0)), (MARGIN_LEFT + plot_w, y_of(0.0))],
            Color::opaque(160, 160, 160),
            1.0,
            None,
        );
    }

    let points: Vec<(f32, f32)> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if v.is_finite() {
                (x_of(i), y_of(v))
            } else {
                (f32::NAN, f32::NAN)
            }
        })
        .collect();
    if n == 1 {
        let (x, y) = points[0];
        draw::fill_rect(&mut pixmap, x - 2.0, y - 2.0, 4.0, 4.0, options.line);
    } else {
        draw::stroke_polyline(&mut pixmap, &points, options.line, options.line_width, None);
    }

    let label = TextStyle::sized(options.label_size);
    let axis = label.anchored(Anchor::Right);
    text::draw_text(&mut pixmap, MARGIN_LEFT - 6.0, y_of(max_v), &text::format_tick(max_v), &axis);
    text::draw_text(&mut pixmap, MARGIN_LEFT - 6.0, y_of(min_v), &text::format_tick(min_v), &axis);

    let tick_y = bottom + options.label_size;
    text::draw_text(&mut pixmap, x_of(0), tick_y, "0", &label.anchored(Anchor::Center));
    if n > 1 {
        text::draw_text(
            &mut pixmap,
            x_of(n - 1),
            tick_y,
            &(n - 1).to_string(),
            &label.anchored(Anchor::Center),
        );
    }

    let marker = Color::opaque(214, 39, 40);
    for (i, v) in [(min_i, min_v), (max_i, max_v)] {
        draw::fill_rect(&mut pixmap, x_of(i) - 2.5, y_of(v) - 2.5, 5.0, 5.0, marker);
    }

    Ok(pixmap)
}

fn draw_captions(pixmap: &mut Pixmap, labels: &PlotLabels, plot_w: f32, plot_h: f32, size: f32) {
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
        &TextStyle::sized(size).anchored(Anchor::Center),
    );
    // Top-left corner, above the value ticks
    text::draw_text(
        pixmap,
        8.0,
        MARGIN_TOP / 2.0,
        labels.y,
        &TextStyle::sized(size).anchored(Anchor::Left),
    );
}
