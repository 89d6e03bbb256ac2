//! Shape helpers over tiny-skia.

use tiny_skia::{LineJoin, Mask, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::colormap::Color;

pub(crate) fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// Fill an axis-aligned rectangle, ignoring degenerate sizes.
pub(crate) fn fill_rect(pixmap: &mut Pixmap, x: f32, y: f32, w: f32, h: f32, color: Color) {
    if let Some(rect) = Rect::from_xywh(x, y, w, h) {
        pixmap.fill_rect(rect, &paint_for(color), Transform::identity(), None);
    }
}

/// Stroke a polyline; runs of non-finite points split it into pieces.
pub(crate) fn stroke_polyline(
    pixmap: &mut Pixmap,
    points: &[(f32, f32)],
    color: Color,
    width: f32,
    mask: Option<&Mask>,
) {
    let mut pb = PathBuilder::new();
    let mut pen_down = false;
    for &(px, py) in points {
        if !(px.is_finite() && py.is_finite()) {
            pen_down = false;
            continue;
        }
        if pen_down {
            pb.line_to(px, py);
        } else {
            pb.move_to(px, py);
            pen_down = true;
        }
    }
    let Some(path) = pb.finish() else {
        return;
    };
    let stroke = Stroke {
        width,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint_for(color), &stroke, Transform::identity(), mask);
}

/// Outline a rectangle.
pub(crate) fn stroke_rect(pixmap: &mut Pixmap, x: f32, y: f32, w: f32, h: f32, color: Color) {
    let mut pb = PathBuilder::new();
    pb.move_to(x, y);
    pb.line_to(x + w, y);
    pb.line_to(x + w, y + h);
    pb.line_to(x, y + h);
    pb.close();
    if let Some(path) = pb.finish() {
        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint_for(color), &stroke, Transform::identity(), None);
    }
}
