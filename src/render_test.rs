#![allow(clippy::float_cmp)]

use std::cell::RefCell;
use std::convert::Infallible;

use super::*;
use crate::doc::{ImageSource, Style};

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
enum Op {
    Save,
    Restore,
    Transform(f64, f64, f64),
    Clear(f64, f64),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    ClosePath,
    Rect(f64, f64, f64, f64),
    Circle(f64, f64, f64),
    Stroke,
    Fill,
    StrokeStyle(String),
    FillStyle(String),
    LineWidth(f64),
    RoundLines,
    LineDash(Vec<f64>),
    Font(String),
    FillText(String, f64, f64),
    DrawImage(ShapeId, f64, f64, f64, f64),
}

#[derive(Default)]
struct RecordingSurface {
    ops: RefCell<Vec<Op>>,
}

impl RecordingSurface {
    fn push(&self, op: Op) {
        self.ops.borrow_mut().push(op);
    }

    fn ops(&self) -> Vec<Op> {
        self.ops.borrow().clone()
    }
}

impl Surface for RecordingSurface {
    type Error = Infallible;

    fn save(&self) {
        self.push(Op::Save);
    }
    fn restore(&self) {
        self.push(Op::Restore);
    }
    fn set_transform(&self, scale: f64, tx: f64, ty: f64) -> Result<(), Infallible> {
        self.push(Op::Transform(scale, tx, ty));
        Ok(())
    }
    fn clear(&self, width: f64, height: f64) {
        self.push(Op::Clear(width, height));
    }
    fn begin_path(&self) {
        self.push(Op::BeginPath);
    }
    fn move_to(&self, x: f64, y: f64) {
        self.push(Op::MoveTo(x, y));
    }
    fn line_to(&self, x: f64, y: f64) {
        self.push(Op::LineTo(x, y));
    }
    fn close_path(&self) {
        self.push(Op::ClosePath);
    }
    fn rect(&self, x: f64, y: f64, w: f64, h: f64) {
        self.push(Op::Rect(x, y, w, h));
    }
    fn circle(&self, cx: f64, cy: f64, radius: f64) -> Result<(), Infallible> {
        self.push(Op::Circle(cx, cy, radius));
        Ok(())
    }
    fn stroke(&self) {
        self.push(Op::Stroke);
    }
    fn fill(&self) {
        self.push(Op::Fill);
    }
    fn set_stroke_style(&self, color: &str) {
        self.push(Op::StrokeStyle(color.to_owned()));
    }
    fn set_fill_style(&self, color: &str) {
        self.push(Op::FillStyle(color.to_owned()));
    }
    fn set_line_width(&self, width: f64) {
        self.push(Op::LineWidth(width));
    }
    fn set_round_lines(&self) {
        self.push(Op::RoundLines);
    }
    fn set_line_dash(&self, segments: &[f64]) -> Result<(), Infallible> {
        self.push(Op::LineDash(segments.to_vec()));
        Ok(())
    }
    fn set_font(&self, font: &str) {
        self.push(Op::Font(font.to_owned()));
    }
    fn fill_text(&self, text: &str, x: f64, y: f64) -> Result<(), Infallible> {
        self.push(Op::FillText(text.to_owned(), x, y));
        Ok(())
    }
    fn draw_image(&self, id: ShapeId, _image: &ImageSource, x: f64, y: f64, w: f64, h: f64) -> Result<(), Infallible> {
        self.push(Op::DrawImage(id, x, y, w, h));
        Ok(())
    }
}

fn shape(kind: ShapeKind, points: &[(f64, f64)]) -> Shape {
    let mut s = Shape::new(kind, Point::new(points[0].0, points[0].1), &Style::default());
    s.points = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
    s
}

fn frame<'a>(shapes: &'a [Shape]) -> Frame<'a> {
    Frame { shapes, in_progress: None, selected: None, viewport: Viewport::default(), show_grid: false }
}

fn render(frame: &Frame<'_>) -> Vec<Op> {
    let surface = RecordingSurface::default();
    let Ok(()) = draw(&surface, frame, 800.0, 600.0, 1.0);
    surface.ops()
}

fn count(ops: &[Op], pred: impl Fn(&Op) -> bool) -> usize {
    ops.iter().filter(|op| pred(op)).count()
}

// =============================================================
// Frame setup
// =============================================================

#[test]
fn frame_starts_with_clear_then_world_transform() {
    let ops = render(&frame(&[]));
    assert_eq!(ops[0], Op::Transform(1.0, 0.0, 0.0));
    assert_eq!(ops[1], Op::Clear(800.0, 600.0));
    assert_eq!(ops[2], Op::Transform(1.0, 0.0, 0.0));
}

#[test]
fn world_transform_folds_in_zoom_pan_and_dpr() {
    let mut f = frame(&[]);
    f.viewport.zoom = 2.0;
    f.viewport.offset = Point::new(50.0, -10.0);

    let surface = RecordingSurface::default();
    let Ok(()) = draw(&surface, &f, 400.0, 300.0, 2.0);
    let ops = surface.ops();

    assert_eq!(ops[0], Op::Transform(2.0, 0.0, 0.0));
    assert_eq!(ops[1], Op::Clear(400.0, 300.0));
    assert_eq!(ops[2], Op::Transform(4.0, 100.0, -20.0));
}

#[test]
fn same_inputs_render_identically() {
    let shapes = vec![shape(ShapeKind::Rectangle, &[(0.0, 0.0), (10.0, 10.0)])];
    let mut f = frame(&shapes);
    f.show_grid = true;
    f.selected = Some(shapes[0].id);
    assert_eq!(render(&f), render(&f));
}

// =============================================================
// Grid
// =============================================================

#[test]
fn grid_hidden_draws_no_grid_color() {
    let ops = render(&frame(&[]));
    assert!(!ops.contains(&Op::StrokeStyle(GRID_COLOR.to_owned())));
}

#[test]
fn grid_lines_cover_visible_rect_at_20_unit_spacing() {
    let mut f = frame(&[]);
    f.show_grid = true;
    let surface = RecordingSurface::default();
    let Ok(()) = draw(&surface, &f, 100.0, 40.0, 1.0);
    let ops = surface.ops();

    // x = 0, 20, ..., 100 and y = 0, 20, 40.
    assert_eq!(count(&ops, |op| matches!(op, Op::MoveTo(..))), 6 + 3);
    assert!(ops.contains(&Op::MoveTo(100.0, 0.0)));
    assert!(ops.contains(&Op::LineTo(100.0, 40.0)));
    assert!(ops.contains(&Op::MoveTo(0.0, 40.0)));
}

#[test]
fn grid_snaps_to_multiples_when_panned() {
    let mut f = frame(&[]);
    f.show_grid = true;
    f.viewport.offset = Point::new(-30.0, -30.0);
    let surface = RecordingSurface::default();
    let Ok(()) = draw(&surface, &f, 40.0, 40.0, 1.0);
    let ops = surface.ops();

    // Visible world x spans 30..70: lines from 20 through 80.
    assert!(ops.contains(&Op::MoveTo(20.0, 20.0)));
    assert!(ops.contains(&Op::LineTo(80.0, 80.0)));
    assert!(!ops.contains(&Op::MoveTo(0.0, 20.0)));
}

#[test]
fn grid_line_width_scales_inverse_with_zoom() {
    let mut f = frame(&[]);
    f.show_grid = true;
    f.viewport.zoom = 4.0;
    let ops = render(&f);
    assert!(ops.contains(&Op::LineWidth(0.25)));
}

// =============================================================
// Shapes
// =============================================================

#[test]
fn rectangle_is_rect_path_stroked() {
    let shapes = vec![shape(ShapeKind::Rectangle, &[(10.0, 20.0), (110.0, 70.0)])];
    let ops = render(&frame(&shapes));
    assert!(ops.contains(&Op::Rect(10.0, 20.0, 100.0, 50.0)));
    assert!(ops.contains(&Op::Stroke));
    assert!(!ops.contains(&Op::Fill));
}

#[test]
fn filled_rectangle_fills_before_stroke() {
    let mut rect = shape(ShapeKind::Rectangle, &[(0.0, 0.0), (10.0, 10.0)]);
    rect.fill = Some("#FFEEAA".to_owned());
    let shapes = vec![rect];
    let ops = render(&frame(&shapes));

    let fill = ops.iter().position(|op| *op == Op::Fill).unwrap();
    let stroke = ops.iter().rposition(|op| *op == Op::Stroke).unwrap();
    assert!(fill < stroke);
    assert!(ops.contains(&Op::FillStyle("#FFEEAA".to_owned())));
}

#[test]
fn circle_radius_is_distance_to_second_point() {
    let shapes = vec![shape(ShapeKind::Circle, &[(0.0, 0.0), (3.0, 4.0)])];
    let ops = render(&frame(&shapes));
    assert!(ops.contains(&Op::Circle(0.0, 0.0, 5.0)));
}

#[test]
fn triangle_apex_top_center_base_bottom() {
    let shapes = vec![shape(ShapeKind::Triangle, &[(0.0, 0.0), (100.0, 50.0)])];
    let ops = render(&frame(&shapes));
    assert!(ops.contains(&Op::MoveTo(50.0, 0.0)));
    assert!(ops.contains(&Op::LineTo(100.0, 50.0)));
    assert!(ops.contains(&Op::LineTo(0.0, 50.0)));
    assert!(ops.contains(&Op::ClosePath));
}

#[test]
fn single_point_shapes_draw_nothing() {
    let shapes = vec![
        shape(ShapeKind::Rectangle, &[(0.0, 0.0)]),
        shape(ShapeKind::Line, &[(0.0, 0.0)]),
        shape(ShapeKind::Freehand, &[(0.0, 0.0)]),
    ];
    let ops = render(&frame(&shapes));
    assert_eq!(count(&ops, |op| *op == Op::Stroke), 0);
}

#[test]
fn line_is_single_segment() {
    let shapes = vec![shape(ShapeKind::Line, &[(0.0, 0.0), (30.0, 40.0)])];
    let ops = render(&frame(&shapes));
    assert_eq!(count(&ops, |op| matches!(op, Op::LineTo(..))), 1);
    assert!(ops.contains(&Op::LineTo(30.0, 40.0)));
}

#[test]
fn arrow_adds_two_head_strokes() {
    let shapes = vec![shape(ShapeKind::Arrow, &[(0.0, 0.0), (100.0, 0.0)])];
    let ops = render(&frame(&shapes));

    let head: Vec<_> = ops
        .iter()
        .filter_map(|op| match op {
            Op::LineTo(x, y) if (*x - 100.0).abs() > 1e-9 => Some((*x, *y)),
            _ => None,
        })
        .collect();
    assert_eq!(head.len(), 2);

    let expected_x = 100.0 - 15.0 * ARROW_HEAD_ANGLE.cos();
    let expected_y = 15.0 * ARROW_HEAD_ANGLE.sin();
    for (x, y) in head {
        assert!((x - expected_x).abs() < 1e-9);
        assert!((y.abs() - expected_y).abs() < 1e-9);
    }
}

#[test]
fn arrowhead_shrinks_with_zoom() {
    let shapes = vec![shape(ShapeKind::Arrow, &[(0.0, 0.0), (100.0, 0.0)])];
    let mut f = frame(&shapes);
    f.viewport.zoom = 3.0;
    let ops = render(&f);
    let expected_x = 100.0 - 5.0 * ARROW_HEAD_ANGLE.cos();
    assert!(ops.iter().any(|op| matches!(op, Op::LineTo(x, _) if (*x - expected_x).abs() < 1e-9)));
}

#[test]
fn freehand_polyline_visits_every_point() {
    let shapes = vec![shape(ShapeKind::Freehand, &[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (3.0, 1.0)])];
    let ops = render(&frame(&shapes));
    assert!(ops.contains(&Op::MoveTo(0.0, 0.0)));
    assert_eq!(count(&ops, |op| matches!(op, Op::LineTo(..))), 3);
}

#[test]
fn line_width_is_stroke_width_over_zoom() {
    let mut s = shape(ShapeKind::Line, &[(0.0, 0.0), (1.0, 1.0)]);
    s.stroke_width = 6.0;
    let shapes = vec![s];
    let mut f = frame(&shapes);
    f.viewport.zoom = 2.0;
    assert!(render(&f).contains(&Op::LineWidth(3.0)));
}

#[test]
fn text_filled_in_stroke_color_with_scaled_font() {
    let mut s = Shape::text_at(Point::new(10.0, 20.0), &Style::default());
    s.text = Some("hi".to_owned());
    s.color = "#FF0000".to_owned();
    let shapes = vec![s];
    let mut f = frame(&shapes);
    f.viewport.zoom = 2.0;
    let ops = render(&f);

    assert!(ops.contains(&Op::FillStyle("#FF0000".to_owned())));
    assert!(ops.contains(&Op::Font("8px Inter, system-ui, sans-serif".to_owned())));
    assert!(ops.contains(&Op::FillText("hi".to_owned(), 10.0, 20.0)));
}

#[test]
fn empty_text_is_skipped() {
    let shapes = vec![Shape::text_at(Point::new(0.0, 0.0), &Style::default())];
    let ops = render(&frame(&shapes));
    assert_eq!(count(&ops, |op| matches!(op, Op::FillText(..))), 0);
}

#[test]
fn image_drawn_at_display_size() {
    let src = ImageSource { source: "data:x".to_owned(), natural_width: 800.0, natural_height: 400.0 };
    let s = Shape::image_at(Point::new(5.0, 6.0), src, &Style::default());
    let id = s.id;
    let shapes = vec![s];
    let ops = render(&frame(&shapes));
    assert!(ops.contains(&Op::DrawImage(id, 5.0, 6.0, 200.0, 100.0)));
}

#[test]
fn image_keeps_screen_size_when_zoomed() {
    let src = ImageSource { source: "data:x".to_owned(), natural_width: 800.0, natural_height: 400.0 };
    let s = Shape::image_at(Point::new(5.0, 6.0), src, &Style::default());
    let id = s.id;
    let shapes = vec![s];
    let mut f = frame(&shapes);
    f.viewport.zoom = 2.0;
    let ops = render(&f);
    assert!(ops.contains(&Op::DrawImage(id, 5.0, 6.0, 100.0, 50.0)));
}

#[test]
fn in_progress_drawn_after_committed_shapes() {
    let committed = vec![shape(ShapeKind::Rectangle, &[(0.0, 0.0), (10.0, 10.0)])];
    let pending = shape(ShapeKind::Rectangle, &[(50.0, 50.0), (60.0, 60.0)]);
    let mut f = frame(&committed);
    f.in_progress = Some(&pending);
    let ops = render(&f);

    let first = ops.iter().position(|op| *op == Op::Rect(0.0, 0.0, 10.0, 10.0)).unwrap();
    let second = ops.iter().position(|op| *op == Op::Rect(50.0, 50.0, 10.0, 10.0)).unwrap();
    assert!(first < second);
}

#[test]
fn shapes_paint_in_scene_order() {
    let shapes = vec![
        shape(ShapeKind::Circle, &[(0.0, 0.0), (1.0, 0.0)]),
        shape(ShapeKind::Circle, &[(9.0, 9.0), (10.0, 9.0)]),
    ];
    let ops = render(&frame(&shapes));
    let a = ops.iter().position(|op| *op == Op::Circle(0.0, 0.0, 1.0)).unwrap();
    let b = ops.iter().position(|op| *op == Op::Circle(9.0, 9.0, 1.0)).unwrap();
    assert!(a < b);
}

// =============================================================
// Selection
// =============================================================

#[test]
fn selection_is_dashed_rect_padded_by_five() {
    let shapes = vec![shape(ShapeKind::Rectangle, &[(0.0, 0.0), (100.0, 50.0)])];
    let mut f = frame(&shapes);
    f.selected = Some(shapes[0].id);
    let ops = render(&f);

    assert!(ops.contains(&Op::Rect(-5.0, -5.0, 110.0, 60.0)));
    assert!(ops.contains(&Op::LineDash(vec![5.0, 5.0])));
    assert!(ops.contains(&Op::StrokeStyle(SELECTION_COLOR.to_owned())));
    assert_eq!(ops.last(), Some(&Op::Restore));
}

#[test]
fn selection_padding_stays_in_world_units_when_zoomed() {
    let shapes = vec![shape(ShapeKind::Rectangle, &[(0.0, 0.0), (100.0, 50.0)])];
    let mut f = frame(&shapes);
    f.selected = Some(shapes[0].id);
    f.viewport.zoom = 2.0;
    let ops = render(&f);

    assert!(ops.contains(&Op::Rect(-5.0, -5.0, 110.0, 60.0)));
    assert!(ops.contains(&Op::LineDash(vec![2.5, 2.5])));
    assert!(ops.contains(&Op::LineDash(vec![])));
}

#[test]
fn stale_selection_draws_nothing() {
    let shapes = vec![shape(ShapeKind::Rectangle, &[(0.0, 0.0), (10.0, 10.0)])];
    let mut f = frame(&shapes);
    f.selected = Some(uuid::Uuid::new_v4());
    let ops = render(&f);
    assert_eq!(count(&ops, |op| matches!(op, Op::LineDash(_))), 0);
}
