//! Rendering: draws the full editor scene to a 2D context.
//!
//! This module is the only place that touches
//! [`web_sys::CanvasRenderingContext2d`]. It receives read-only views of the
//! active side, selection, and in-progress gesture and produces pixels — it
//! does not mutate any application state.
//!
//! Layers, in order: cleared background, template image, restriction areas,
//! print areas, resize handles on the selected zone, in-progress draw rect.
//! The full scene is redrawn every time; at the fixed logical canvas size
//! there is nothing to gain from dirty-rect tracking.
//!
//! All fallible Canvas2D calls propagate errors via `Result<(), JsValue>`.

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, HANDLE_RADIUS_PX};
use crate::geom::Rect;
use crate::hit::handle_positions;
use crate::product::{Selection, Side, Zone, ZoneKind};

/// Editor background behind the template image.
const BACKGROUND: &str = "#FAF7F2";

/// Print-area palette: solid outline, translucent fill.
const PRINT_STROKE: &str = "#1E6FD9";
const PRINT_FILL: &str = "rgba(30, 111, 217, 0.15)";

/// Restriction-area palette: dashed outline, translucent fill.
const RESTRICTION_STROKE: &str = "#D94B4B";
const RESTRICTION_FILL: &str = "rgba(217, 75, 75, 0.12)";

/// Backing patch behind zone labels so they stay legible over images.
const LABEL_BACKING: &str = "rgba(255, 255, 255, 0.75)";
const LABEL_COLOR: &str = "#1F1A17";
const LABEL_FONT: &str = "12px sans-serif";

/// Dash segment length for restriction outlines and the in-progress rect.
const DASH_PX: f64 = 6.0;

/// Draw the full scene for one side.
///
/// `template` is the side's image element, if the host has one cached; it is
/// skipped (blank background) until it has finished loading, and the load
/// callback triggers another render.
///
/// # Errors
///
/// Returns `Err` if any Canvas2D call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    side: &Side,
    selection: Option<Selection>,
    in_progress: Option<(ZoneKind, Rect)>,
    template: Option<&HtmlImageElement>,
) -> Result<(), JsValue> {
    // Layer 1: background.
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT);

    // Layer 2: template image scaled to the canvas, once loaded.
    if let Some(img) = template {
        if img.complete() && img.natural_width() > 0 {
            ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img,
                0.0,
                0.0,
                CANVAS_WIDTH,
                CANVAS_HEIGHT,
            )?;
        }
    }

    // Layers 3 and 4: restriction areas beneath print areas.
    for zone in &side.restriction_areas {
        draw_zone(ctx, zone, ZoneKind::Restriction)?;
    }
    for zone in &side.print_areas {
        draw_zone(ctx, zone, ZoneKind::Print)?;
    }

    // Layer 5: resize handles on the selected zone only.
    if let Some(sel) = selection {
        if let Some(zone) = side.zones(sel.kind).get(sel.index) {
            draw_handles(ctx, &zone.rect);
        }
    }

    // Layer 6: in-progress draw rect, dashed, keyed to the active tool.
    if let Some((kind, rect)) = in_progress {
        draw_in_progress(ctx, &rect, kind)?;
    }

    Ok(())
}

fn zone_palette(kind: ZoneKind) -> (&'static str, &'static str, bool) {
    match kind {
        ZoneKind::Print => (PRINT_STROKE, PRINT_FILL, false),
        ZoneKind::Restriction => (RESTRICTION_STROKE, RESTRICTION_FILL, true),
    }
}

fn draw_zone(ctx: &CanvasRenderingContext2d, zone: &Zone, kind: ZoneKind) -> Result<(), JsValue> {
    let (stroke, fill, dashed) = zone_palette(kind);
    let r = &zone.rect;

    ctx.save();
    ctx.set_fill_style_str(fill);
    ctx.fill_rect(r.x, r.y, r.width, r.height);

    ctx.set_stroke_style_str(stroke);
    ctx.set_line_width(2.0);
    if dashed {
        set_dash(ctx, DASH_PX)?;
    }
    ctx.stroke_rect(r.x, r.y, r.width, r.height);
    ctx.restore();

    draw_label(ctx, &zone.name, r)?;
    Ok(())
}

/// Label text with a semi-opaque backing patch for legibility.
fn draw_label(ctx: &CanvasRenderingContext2d, text: &str, rect: &Rect) -> Result<(), JsValue> {
    if text.is_empty() {
        return Ok(());
    }

    ctx.save();
    ctx.set_font(LABEL_FONT);
    ctx.set_text_align("left");
    ctx.set_text_baseline("top");

    let width = ctx.measure_text(text)?.width();
    let pad = 3.0;
    ctx.set_fill_style_str(LABEL_BACKING);
    ctx.fill_rect(rect.x + 2.0, rect.y + 2.0, width + pad * 2.0, 16.0);

    ctx.set_fill_style_str(LABEL_COLOR);
    ctx.fill_text(text, rect.x + 2.0 + pad, rect.y + 4.0)?;
    ctx.restore();
    Ok(())
}

fn draw_handles(ctx: &CanvasRenderingContext2d, rect: &Rect) {
    let half = HANDLE_RADIUS_PX / 2.0;

    ctx.save();
    ctx.set_fill_style_str("#fff");
    ctx.set_stroke_style_str(PRINT_STROKE);
    ctx.set_line_width(1.0);

    for pos in handle_positions(rect) {
        ctx.fill_rect(pos.x - half, pos.y - half, half * 2.0, half * 2.0);
        ctx.stroke_rect(pos.x - half, pos.y - half, half * 2.0, half * 2.0);
    }

    ctx.restore();
}

fn draw_in_progress(
    ctx: &CanvasRenderingContext2d,
    rect: &Rect,
    kind: ZoneKind,
) -> Result<(), JsValue> {
    let (stroke, fill, _) = zone_palette(kind);

    ctx.save();
    set_dash(ctx, DASH_PX)?;
    ctx.set_fill_style_str(fill);
    ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    ctx.set_stroke_style_str(stroke);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
    ctx.restore();
    Ok(())
}

fn set_dash(ctx: &CanvasRenderingContext2d, dash: f64) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    dash_array.push(&dash.into());
    dash_array.push(&dash.into());
    ctx.set_line_dash(&dash_array)
}
