use std::f64::consts::PI;

use rog_shared::point::PointKind;
use web_sys::CanvasRenderingContext2d;

pub(crate) fn kind_color(kind: PointKind) -> &'static str {
    match kind {
        PointKind::Feeder => "#2e7d32",
        PointKind::Hide => "#8d5524",
        PointKind::Cabin => "#c62828",
        PointKind::Field => "#f9a825",
        PointKind::Other => "#546e7a",
    }
}

/// Marker glyph letter, initial of the Slovenian type name.
fn kind_glyph(kind: PointKind) -> &'static str {
    match kind {
        PointKind::Feeder => "K",
        PointKind::Hide => "O",
        PointKind::Cabin => "L",
        PointKind::Field => "N",
        PointKind::Other => "?",
    }
}

const MARKER_RADIUS: f64 = 9.0;

pub(crate) fn draw_marker(ctx: &CanvasRenderingContext2d, x: f64, y: f64, kind: PointKind) {
    ctx.begin_path();
    let _ = ctx.arc(x, y, MARKER_RADIUS, 0.0, 2.0 * PI);
    ctx.set_fill_style_str(kind_color(kind));
    ctx.fill();
    ctx.set_line_width(2.0);
    ctx.set_stroke_style_str("#ffffff");
    ctx.stroke();

    ctx.set_fill_style_str("#ffffff");
    ctx.set_font("bold 10px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let _ = ctx.fill_text(kind_glyph(kind), x, y);
}

/// Single highlight pin used by the per-row map modal.
pub(crate) fn draw_pin(ctx: &CanvasRenderingContext2d, x: f64, y: f64) {
    ctx.begin_path();
    let _ = ctx.arc(x, y, 6.0, 0.0, 2.0 * PI);
    ctx.set_fill_style_str("#d32f2f");
    ctx.fill();
    ctx.set_line_width(2.0);
    ctx.set_stroke_style_str("#ffffff");
    ctx.stroke();
}
