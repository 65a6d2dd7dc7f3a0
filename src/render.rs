//! Rendering: draws the full scene onto a [`Surface`].
//!
//! The renderer receives a read-only [`Frame`] and produces drawing calls;
//! it never mutates editor state. Output depends only on the frame and the
//! surface size, so the same inputs always yield the same call sequence.
//!
//! Fallible surface calls propagate their error. The top-level caller
//! ([`crate::engine::Engine::render`]) handles the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::consts::{ARROW_HEAD_ANGLE, ARROW_HEAD_SIZE, GRID_SIZE, SELECTION_PADDING};
use crate::doc::{Shape, ShapeId, ShapeKind};
use crate::hit;
use crate::surface::Surface;
use crate::viewport::{Point, Viewport};

/// Grid line color.
const GRID_COLOR: &str = "#E5E7EB";

/// Selection outline color.
const SELECTION_COLOR: &str = "#3B82F6";

/// Selection outline width and dash segment length in screen pixels.
const SELECTION_LINE_PX: f64 = 2.0;
const SELECTION_DASH_PX: f64 = 5.0;

/// Everything one frame depends on.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Committed shapes in paint order.
    pub shapes: &'a [Shape],
    /// Shape being dragged out, drawn above the scene.
    pub in_progress: Option<&'a Shape>,
    pub selected: Option<ShapeId>,
    pub viewport: Viewport,
    pub show_grid: bool,
}

/// Draw the full frame: grid, shapes, in-progress shape, selection outline.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn draw<S: Surface>(
    surface: &S,
    frame: &Frame<'_>,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), S::Error> {
    let viewport = frame.viewport;

    // Layer 1: clear in device-scaled screen space.
    surface.set_transform(dpr, 0.0, 0.0)?;
    surface.clear(viewport_w, viewport_h);

    // Everything below is in world space.
    surface.set_transform(dpr * viewport.zoom, dpr * viewport.offset.x, dpr * viewport.offset.y)?;

    // Layer 2: grid.
    if frame.show_grid {
        draw_grid(surface, &viewport, viewport_w, viewport_h);
    }

    // Layer 3: committed shapes, then the in-progress shape on top.
    for shape in frame.shapes {
        draw_shape(surface, shape, viewport.zoom)?;
    }
    if let Some(shape) = frame.in_progress {
        draw_shape(surface, shape, viewport.zoom)?;
    }

    // Layer 4: selection outline.
    if let Some(id) = frame.selected {
        if let Some(shape) = frame.shapes.iter().find(|s| s.id == id) {
            draw_selection(surface, shape, viewport.zoom)?;
        }
    }

    Ok(())
}

// =============================================================
// Grid
// =============================================================

fn draw_grid<S: Surface>(surface: &S, viewport: &Viewport, viewport_w: f64, viewport_h: f64) {
    let visible = viewport.visible_world_rect(viewport_w, viewport_h);
    let start_x = (visible.min.x / GRID_SIZE).floor() * GRID_SIZE;
    let end_x = (visible.max.x / GRID_SIZE).ceil() * GRID_SIZE;
    let start_y = (visible.min.y / GRID_SIZE).floor() * GRID_SIZE;
    let end_y = (visible.max.y / GRID_SIZE).ceil() * GRID_SIZE;

    surface.set_stroke_style(GRID_COLOR);
    surface.set_line_width(1.0 / viewport.zoom);
    surface.begin_path();

    let mut x = start_x;
    while x <= end_x {
        surface.move_to(x, start_y);
        surface.line_to(x, end_y);
        x += GRID_SIZE;
    }
    let mut y = start_y;
    while y <= end_y {
        surface.move_to(start_x, y);
        surface.line_to(end_x, y);
        y += GRID_SIZE;
    }

    surface.stroke();
}

// =============================================================
// Shape dispatch
// =============================================================

fn draw_shape<S: Surface>(surface: &S, shape: &Shape, zoom: f64) -> Result<(), S::Error> {
    surface.set_stroke_style(&shape.color);
    surface.set_line_width(shape.stroke_width / zoom);
    surface.set_round_lines();

    match shape.kind {
        ShapeKind::Rectangle | ShapeKind::Circle | ShapeKind::Triangle => draw_closed(surface, shape),
        ShapeKind::Line | ShapeKind::Arrow => {
            draw_segment(surface, shape, zoom);
            Ok(())
        }
        ShapeKind::Freehand => {
            draw_polyline(surface, &shape.points);
            Ok(())
        }
        ShapeKind::Text => draw_text(surface, shape, zoom),
        ShapeKind::Image => draw_image(surface, shape, zoom),
    }
}

// =============================================================
// Shape renderers
// =============================================================

/// Rectangle, circle, and triangle: a closed path from two corner points.
fn draw_closed<S: Surface>(surface: &S, shape: &Shape) -> Result<(), S::Error> {
    let [a, b] = match shape.points.as_slice() {
        [a, b, ..] => [*a, *b],
        _ => return Ok(()),
    };

    surface.begin_path();
    match shape.kind {
        ShapeKind::Circle => surface.circle(a.x, a.y, a.distance(b))?,
        ShapeKind::Triangle => {
            let base = b.x - a.x;
            let height = b.y - a.y;
            surface.move_to(a.x + base / 2.0, a.y);
            surface.line_to(a.x + base, a.y + height);
            surface.line_to(a.x, a.y + height);
            surface.close_path();
        }
        _ => surface.rect(a.x, a.y, b.x - a.x, b.y - a.y),
    }

    if let Some(fill) = &shape.fill {
        surface.set_fill_style(fill);
        surface.fill();
    }
    surface.stroke();
    Ok(())
}

fn draw_segment<S: Surface>(surface: &S, shape: &Shape, zoom: f64) {
    let [from, to] = match shape.points.as_slice() {
        [a, b, ..] => [*a, *b],
        _ => return,
    };

    surface.begin_path();
    surface.move_to(from.x, from.y);
    surface.line_to(to.x, to.y);
    surface.stroke();

    if shape.kind == ShapeKind::Arrow {
        draw_arrowhead(surface, from, to, zoom);
    }
}

/// Two strokes from the tip, each `ARROW_HEAD_SIZE / zoom` long, splayed
/// `ARROW_HEAD_ANGLE` either side of the segment direction.
fn draw_arrowhead<S: Surface>(surface: &S, from: Point, to: Point, zoom: f64) {
    let angle = (to.y - from.y).atan2(to.x - from.x);
    let size = ARROW_HEAD_SIZE / zoom;

    surface.begin_path();
    for side in [-ARROW_HEAD_ANGLE, ARROW_HEAD_ANGLE] {
        let a = angle + side;
        surface.move_to(to.x, to.y);
        surface.line_to(to.x - size * a.cos(), to.y - size * a.sin());
    }
    surface.stroke();
}

fn draw_polyline<S: Surface>(surface: &S, points: &[Point]) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    if rest.is_empty() {
        return;
    }

    surface.begin_path();
    surface.move_to(first.x, first.y);
    for p in rest {
        surface.line_to(p.x, p.y);
    }
    surface.stroke();
}

fn draw_text<S: Surface>(surface: &S, shape: &Shape, zoom: f64) -> Result<(), S::Error> {
    let Some(anchor) = shape.points.first() else {
        return Ok(());
    };
    let text = shape.text();
    if text.is_empty() {
        return Ok(());
    }

    surface.set_font(&format!("{}px Inter, system-ui, sans-serif", shape.font_size() / zoom));
    surface.set_fill_style(&shape.color);
    surface.fill_text(text, anchor.x, anchor.y)
}

/// Images keep a constant on-screen size, like text.
fn draw_image<S: Surface>(surface: &S, shape: &Shape, zoom: f64) -> Result<(), S::Error> {
    let (Some(anchor), Some(image)) = (shape.points.first(), shape.image.as_ref()) else {
        return Ok(());
    };
    let (w, h) = image.display_size();
    surface.draw_image(shape.id, image, anchor.x, anchor.y, w / zoom, h / zoom)
}

// =============================================================
// Selection UI
// =============================================================

fn draw_selection<S: Surface>(surface: &S, shape: &Shape, zoom: f64) -> Result<(), S::Error> {
    let Some(bounds) = hit::bounds_of(shape) else {
        return Ok(());
    };
    let b = bounds.expand(SELECTION_PADDING);

    surface.save();
    surface.set_stroke_style(SELECTION_COLOR);
    surface.set_line_width(SELECTION_LINE_PX / zoom);
    surface.set_line_dash(&[SELECTION_DASH_PX / zoom, SELECTION_DASH_PX / zoom])?;
    surface.begin_path();
    surface.rect(b.min_x, b.min_y, b.width(), b.height());
    surface.stroke();
    surface.set_line_dash(&[])?;
    surface.restore();
    Ok(())
}
