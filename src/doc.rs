//! Document model: shapes, their styling, and the scene store with history.
//!
//! This module defines what is on the canvas (`Shape`, `ShapeKind`), the
//! style applied to new shapes (`Style`), and the runtime store that owns the
//! committed scene plus its undo/redo snapshots (`SceneStore`).
//!
//! Data flows into this layer from the input engine (mutations) and from
//! snapshot loading. The renderer and hit-tester read `SceneStore::shapes`,
//! whose order is paint order: later shapes draw on top and hit first.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::consts::{DEFAULT_FONT_SIZE, IMAGE_MAX_DISPLAY, STROKE_WIDTH_MAX, STROKE_WIDTH_MIN};
use crate::viewport::Point;

/// Unique identifier for a shape.
pub type ShapeId = Uuid;

/// The kind of a shape. Each kind fixes how `Shape::points` is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle between two corners.
    Rectangle,
    /// Circle centered on the first point, radius reaching the second.
    Circle,
    /// Isosceles triangle inscribed in the box spanned by two corners.
    Triangle,
    /// Straight segment between two endpoints.
    Line,
    /// Segment with a chevron head at the second endpoint.
    Arrow,
    /// Polyline through every sampled point.
    Freehand,
    /// Single line of text anchored at the first point.
    Text,
    /// Bitmap anchored at its top-left corner.
    Image,
}

impl ShapeKind {
    /// Minimum number of points a committed shape of this kind carries.
    #[must_use]
    pub fn min_points(self) -> usize {
        match self {
            Self::Text | Self::Image => 1,
            _ => 2,
        }
    }

    /// Whether this kind is a closed outline that may be filled.
    #[must_use]
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Rectangle | Self::Circle | Self::Triangle)
    }
}

/// Image payload carried by [`ShapeKind::Image`] shapes.
///
/// `natural_width` / `natural_height` are the decoded source dimensions; any
/// display downscaling is computed at draw time and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    /// Loadable image source, typically a `data:` URL.
    pub source: String,
    /// Source width in pixels.
    pub natural_width: f64,
    /// Source height in pixels.
    pub natural_height: f64,
}

impl ImageSource {
    /// On-canvas size: natural size, scaled down with aspect ratio preserved
    /// when either side exceeds [`IMAGE_MAX_DISPLAY`].
    #[must_use]
    pub fn display_size(&self) -> (f64, f64) {
        let (w, h) = (self.natural_width, self.natural_height);
        if w > IMAGE_MAX_DISPLAY || h > IMAGE_MAX_DISPLAY {
            let ratio = (IMAGE_MAX_DISPLAY / w).min(IMAGE_MAX_DISPLAY / h);
            (w * ratio, h * ratio)
        } else {
            (w, h)
        }
    }
}

/// Stroke and text styling applied to newly created shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Stroke color as a CSS color string.
    pub color: String,
    /// Stroke width in screen pixels.
    pub stroke_width: f64,
    /// Optional fill for closed shapes.
    pub fill: Option<String>,
    /// Font size for new text shapes.
    pub font_size: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: "#3B82F6".to_owned(),
            stroke_width: 2.0,
            fill: None,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl Style {
    /// Clamp a requested stroke width into the selectable range.
    #[must_use]
    pub fn clamp_stroke_width(width: f64) -> f64 {
        width.clamp(STROKE_WIDTH_MIN, STROKE_WIDTH_MAX)
    }
}

/// A shape as stored in the scene and in exported snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier, stable for the shape's lifetime.
    pub id: ShapeId,
    /// Shape type.
    pub kind: ShapeKind,
    /// World-space points, interpreted per `kind`.
    pub points: Vec<Point>,
    /// Stroke color (also the text color for text shapes).
    pub color: String,
    /// Stroke width in screen pixels.
    pub stroke_width: f64,
    /// Fill color for closed shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Text content, for text shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Font size, for text shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Image payload, for image shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSource>,
    /// True only while this text shape is being typed into.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_editing: bool,
}

impl Shape {
    /// Start a stroke or area shape at `start`. The second point arrives with
    /// the first pointer-move.
    #[must_use]
    pub fn new(kind: ShapeKind, start: Point, style: &Style) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            points: vec![start],
            color: style.color.clone(),
            stroke_width: style.stroke_width,
            fill: if kind.is_closed() { style.fill.clone() } else { None },
            text: None,
            font_size: None,
            image: None,
            is_editing: false,
        }
    }

    /// Create an empty text shape at `anchor`, already in editing mode.
    #[must_use]
    pub fn text_at(anchor: Point, style: &Style) -> Self {
        Self {
            text: Some(String::new()),
            font_size: Some(style.font_size),
            is_editing: true,
            ..Self::new(ShapeKind::Text, anchor, style)
        }
    }

    /// Create an image shape whose top-left corner sits at `anchor`.
    #[must_use]
    pub fn image_at(anchor: Point, image: ImageSource, style: &Style) -> Self {
        Self {
            image: Some(image),
            ..Self::new(ShapeKind::Image, anchor, style)
        }
    }

    /// Text content. Empty string when absent.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Font size. Defaults to [`DEFAULT_FONT_SIZE`] when absent.
    #[must_use]
    pub fn font_size(&self) -> f64 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    /// Whether `points` meets the minimum for this kind.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.points.len() >= self.kind.min_points()
    }

    /// Shift every point by `delta`.
    pub fn translate(&mut self, delta: Point) {
        for p in &mut self.points {
            *p = *p + delta;
        }
    }
}

/// The committed scene plus its snapshot history.
///
/// `history[index]` is the scene as of the last commit that has not been
/// undone. `index` is the number of available undo steps and
/// `history.len() - 1 - index` the number of redo steps.
pub struct SceneStore {
    shapes: Vec<Shape>,
    history: Vec<Vec<Shape>>,
    index: usize,
}

impl SceneStore {
    /// Create an empty store with a single empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self { shapes: Vec::new(), history: vec![Vec::new()], index: 0 }
    }

    /// Shapes in paint order.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Return a reference to a shape by id.
    #[must_use]
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == *id)
    }

    /// Whether a shape with `id` is in the live scene.
    #[must_use]
    pub fn contains(&self, id: &ShapeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of shapes in the live scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the live scene has no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Append a shape on top. A shape whose id is already present replaces
    /// the existing one in place. Does not snapshot.
    pub fn add_shape(&mut self, shape: Shape) {
        if let Some(existing) = self.shapes.iter_mut().find(|s| s.id == shape.id) {
            *existing = shape;
        } else {
            self.shapes.push(shape);
        }
    }

    /// Apply `f` to the shape with `id`. Returns false if it doesn't exist.
    pub fn update_shape<F>(&mut self, id: &ShapeId, f: F) -> bool
    where
        F: FnOnce(&mut Shape),
    {
        let Some(shape) = self.shapes.iter_mut().find(|s| s.id == *id) else {
            return false;
        };
        f(shape);
        true
    }

    /// Remove a shape by id, returning it if it was present. Does not snapshot.
    pub fn remove_shape(&mut self, id: &ShapeId) -> Option<Shape> {
        let pos = self.shapes.iter().position(|s| s.id == *id)?;
        Some(self.shapes.remove(pos))
    }

    /// Snapshot the live scene: drop any redo tail, append, advance.
    pub fn commit(&mut self) {
        self.history.truncate(self.index + 1);
        self.history.push(self.shapes.clone());
        self.index += 1;
        debug!(index = self.index, shapes = self.shapes.len(), "scene committed");
    }

    /// Append a shape and commit in one step.
    pub fn add_committed(&mut self, shape: Shape) {
        self.add_shape(shape);
        self.commit();
    }

    /// Append a shape to the live scene and commit it on top of the last
    /// snapshot. Uncommitted live edits stay live and out of history.
    pub fn add_over_committed(&mut self, shape: Shape) {
        let mut snapshot = self.history[self.index].clone();
        snapshot.retain(|s| s.id != shape.id);
        snapshot.push(shape.clone());
        self.add_shape(shape);
        self.history.truncate(self.index + 1);
        self.history.push(snapshot);
        self.index += 1;
        debug!(index = self.index, shapes = self.shapes.len(), "shape committed over live edits");
    }

    /// Remove a shape and commit in one step. No-op (and no commit) if absent.
    pub fn remove_committed(&mut self, id: &ShapeId) -> Option<Shape> {
        let removed = self.remove_shape(id)?;
        self.commit();
        Some(removed)
    }

    /// Step back one snapshot. Returns false at the start of history.
    pub fn undo(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        self.shapes = self.history[self.index].clone();
        debug!(index = self.index, "undo");
        true
    }

    /// Step forward one snapshot. Returns false at the tail of history.
    pub fn redo(&mut self) -> bool {
        if self.index + 1 >= self.history.len() {
            return false;
        }
        self.index += 1;
        self.shapes = self.history[self.index].clone();
        debug!(index = self.index, "redo");
        true
    }

    /// Empty the scene and reset history to a single empty snapshot.
    pub fn clear(&mut self) {
        self.load_snapshot(Vec::new());
    }

    /// Replace the scene and make it the only history entry.
    pub fn load_snapshot(&mut self, shapes: Vec<Shape>) {
        self.history = vec![shapes.clone()];
        self.shapes = shapes;
        self.index = 0;
    }

    /// Whether the last committed snapshot contains `id`.
    #[must_use]
    pub fn is_committed(&self, id: &ShapeId) -> bool {
        self.history[self.index].iter().any(|s| s.id == *id)
    }

    /// Number of available undo steps.
    #[must_use]
    pub fn undo_steps(&self) -> usize {
        self.index
    }

    /// Number of available redo steps.
    #[must_use]
    pub fn redo_steps(&self) -> usize {
        self.history.len() - 1 - self.index
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo_steps() > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.redo_steps() > 0
    }

    /// Number of snapshots, including the initial one.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Position of the current snapshot.
    #[must_use]
    pub fn history_index(&self) -> usize {
        self.index
    }

    /// The snapshot at `index`, if any.
    #[must_use]
    pub fn snapshot(&self, index: usize) -> Option<&[Shape]> {
        self.history.get(index).map(Vec::as_slice)
    }
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}
