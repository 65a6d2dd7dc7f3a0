//! Engine: the input state machine and its browser wrapper.
//!
//! [`EngineCore`] owns the scene, viewport, and gesture state and turns raw
//! pointer/keyboard/wheel events into scene mutations. It never touches the
//! DOM, so the whole state machine runs under native `cargo test`.
//! [`Engine`] adds the canvas element, the decoded-image cache, and
//! rendering.
//!
//! Handlers return [`Action`]s for the host: redraw requests, cursor
//! changes, the text overlay lifecycle, file-picker requests, and commit
//! notifications.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::EditorConfig;
use crate::decode::{self, DecodedImage};
use crate::doc::{SceneStore, Shape, ShapeId, ShapeKind, Style};
use crate::error::EditorError;
use crate::hit::{self, Bounds};
use crate::input::{Button, InputState, Key, Modifiers, Tool, UiState, WheelDelta};
use crate::render::{self, Frame};
use crate::surface::{CanvasSurface, ImageCache};
use crate::viewport::{Point, Viewport};

/// Cursor shown while the canvas is being dragged.
const CURSOR_GRABBING: &str = "grabbing";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A new history snapshot was appended; `index` is the new history index.
    Committed { index: usize },
    SelectionChanged(Option<ShapeId>),
    /// Show a text input over the shape. `screen` is the anchor in CSS
    /// pixels and `font_size` is already scaled by zoom.
    EditTextRequested { id: ShapeId, text: String, screen: Point, font_size: f64 },
    /// Hide the text input opened for `id`.
    EditTextEnded { id: ShapeId },
    /// Open a file picker. Report the outcome with
    /// [`EngineCore::image_decoded`] (or [`EngineCore::image_bytes`]) using the same `request`.
    ImageRequested { request: u64 },
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub doc: SceneStore,
    pub viewport: Viewport,
    pub ui: UiState,
    pub input: InputState,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    /// Outstanding file-picker requests and the world point each was issued at.
    pending_images: HashMap<u64, Point>,
    next_request: u64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            doc: SceneStore::new(),
            viewport: Viewport::default(),
            ui: UiState::default(),
            input: InputState::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            pending_images: HashMap::new(),
            next_request: 1,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the style and grid visibility from `config`.
    #[must_use]
    pub fn from_config(config: &EditorConfig) -> Self {
        let mut core = Self::new();
        core.ui.style = config.style();
        core.ui.show_grid = config.show_grid;
        core
    }

    // --- Tool, style, and view settings ---

    /// Switch tools. An open text edit is finalized, a half-drawn shape is
    /// abandoned, and any other gesture is finished as if the pointer was released.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = match self.input {
            InputState::EditingText { .. } => self.finish_text_editing(),
            InputState::Drawing { .. } => {
                self.input = InputState::Idle;
                debug!("in-progress shape abandoned");
                vec![Action::RenderNeeded]
            }
            _ => self.finish_gesture(),
        };
        self.ui.tool = tool;
        debug!(?tool, "tool changed");
        actions.push(Action::SetCursor(tool.cursor().to_owned()));
        actions
    }

    /// Stroke color for shapes created from now on.
    pub fn set_color(&mut self, color: &str) {
        self.ui.style.color = color.to_owned();
    }

    /// Stroke width for shapes created from now on, clamped to the selectable range.
    pub fn set_stroke_width(&mut self, width: f64) {
        self.ui.style.stroke_width = Style::clamp_stroke_width(width);
    }

    /// Fill for closed shapes created from now on. `None` leaves them hollow.
    pub fn set_fill(&mut self, fill: Option<String>) {
        self.ui.style.fill = fill;
    }

    pub fn set_show_grid(&mut self, show: bool) -> Vec<Action> {
        self.ui.show_grid = show;
        vec![Action::RenderNeeded]
    }

    /// Return to zoom 1 with the world origin at the top-left corner.
    pub fn reset_view(&mut self) -> Vec<Action> {
        self.viewport.reset();
        vec![Action::RenderNeeded]
    }

    /// Record the canvas size in CSS pixels and the device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        // Clicking the canvas blurs an open text input; a stale gesture is
        // closed out before the new one starts.
        let mut actions = match self.input {
            InputState::Idle => Vec::new(),
            InputState::EditingText { .. } => self.finish_text_editing(),
            _ => self.finish_gesture(),
        };
        let world = self.viewport.to_world(screen_pt);

        match button {
            Button::Secondary => return actions,
            Button::Middle => {
                self.start_pan(screen_pt, &mut actions);
                return actions;
            }
            Button::Primary => {}
        }

        match self.ui.tool {
            Tool::Pan => self.start_pan(screen_pt, &mut actions),
            Tool::Select => {
                let target = hit::hit_test_scene(world, self.doc.shapes(), &self.viewport);
                self.set_selection(target, &mut actions);
            }
            Tool::Move => self.start_move(world, &mut actions),
            Tool::Text => self.start_text(world, &mut actions),
            Tool::Image => {
                let request = self.next_request;
                self.next_request += 1;
                self.pending_images.insert(request, world);
                info!(request, x = world.x, y = world.y, "image requested");
                actions.push(Action::ImageRequested { request });
            }
            tool => {
                if let Some(kind) = tool.draws() {
                    self.input = InputState::Drawing { shape: Shape::new(kind, world, &self.ui.style) };
                    actions.push(Action::RenderNeeded);
                }
            }
        }
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.viewport.to_world(screen_pt);

        match &mut self.input {
            InputState::Panning { last_screen } => {
                let delta = screen_pt - *last_screen;
                *last_screen = screen_pt;
                self.viewport.pan_by(delta);
            }
            InputState::Drawing { shape } => {
                if shape.kind == ShapeKind::Freehand {
                    shape.points.push(world);
                } else {
                    // Rubber band: anchor plus the current pointer.
                    shape.points.truncate(1);
                    shape.points.push(world);
                }
            }
            InputState::DraggingSelection { id, anchor, moved } => {
                let Some(center) = self.doc.get(id).and_then(hit::bounds_of).as_ref().map(Bounds::center) else {
                    return Vec::new();
                };
                let delta = (world - *anchor) - center;
                self.doc.update_shape(id, |s| s.translate(delta));
                *moved = true;
            }
            InputState::Idle | InputState::EditingText { .. } => return Vec::new(),
        }

        vec![Action::RenderNeeded]
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.finish_gesture()
    }

    /// The pointer left the canvas. Treated exactly like a release.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.finish_gesture()
    }

    // --- Wheel and keyboard ---

    /// Zoom one step about the cursor. Active under every tool and state.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        if delta.dy == 0.0 {
            return Vec::new();
        }
        self.viewport.wheel(screen_pt, delta.dy);
        debug!(zoom = self.viewport.zoom, "zoomed");
        vec![Action::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        if let InputState::EditingText { id, .. } = self.input {
            return self.text_key(id, &key, modifiers);
        }

        if modifiers.command() {
            return match key.0.to_ascii_lowercase().as_str() {
                "z" if modifiers.shift => self.redo(),
                "z" => self.undo(),
                "y" => self.redo(),
                _ => Vec::new(),
            };
        }

        match key.0.as_str() {
            "Delete" | "Backspace" => self.delete_selected(),
            "Escape" => self.escape(),
            _ => Vec::new(),
        }
    }

    // --- Text editing ---

    /// Replace the content of the text shape being edited (host input overlay).
    pub fn set_text(&mut self, text: &str) -> Vec<Action> {
        let InputState::EditingText { id, .. } = self.input else {
            debug!(error = %EditorError::InvalidGesture("set_text outside text editing"), "ignored");
            return Vec::new();
        };
        self.doc.update_shape(&id, |s| s.text = Some(text.to_owned()));
        vec![Action::RenderNeeded]
    }

    /// Finalize the open text edit (Enter or blur). Empty text deletes the
    /// shape; the deletion is committed only if the shape was already in history.
    pub fn finish_text_editing(&mut self) -> Vec<Action> {
        let InputState::EditingText { id, .. } = self.input else {
            return Vec::new();
        };
        self.input = InputState::Idle;
        let mut actions = vec![Action::EditTextEnded { id }];

        if self.text_is_empty(&id) {
            debug!(%id, error = %EditorError::EmptyCommit, "empty text removed");
            self.doc.remove_shape(&id);
            if self.doc.is_committed(&id) {
                self.doc.commit();
                actions.push(self.committed());
            }
            if self.ui.selected_id == Some(id) {
                self.set_selection(None, &mut actions);
            }
        } else {
            self.doc.update_shape(&id, |s| s.is_editing = false);
            self.doc.commit();
            actions.push(self.committed());
        }

        actions.push(Action::RenderNeeded);
        actions
    }

    /// Leave text editing without committing (Escape). A brand-new shape
    /// that is still empty is discarded; anything else keeps its live text.
    pub fn cancel_text_editing(&mut self) -> Vec<Action> {
        let InputState::EditingText { id, is_new } = self.input else {
            return Vec::new();
        };
        self.input = InputState::Idle;

        if is_new && self.text_is_empty(&id) {
            self.doc.remove_shape(&id);
        } else {
            self.doc.update_shape(&id, |s| s.is_editing = false);
        }
        vec![Action::EditTextEnded { id }, Action::RenderNeeded]
    }

    // --- Scene and history ---

    /// Delete the selected shape and commit.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        if !self.input.is_idle() {
            debug!(error = %EditorError::InvalidGesture("delete during a gesture"), "ignored");
            return Vec::new();
        }
        let Some(id) = self.ui.selected_id else {
            debug!(error = %EditorError::InvalidGesture("delete with no selection"), "ignored");
            return Vec::new();
        };

        let mut actions = Vec::new();
        if self.doc.remove_committed(&id).is_some() {
            info!(%id, "shape deleted");
            actions.push(self.committed());
        } else {
            debug!(error = %EditorError::UnknownShape(id), "delete ignored");
        }
        self.set_selection(None, &mut actions);
        actions
    }

    /// Step back one snapshot. No-op at the start of history or mid-gesture.
    pub fn undo(&mut self) -> Vec<Action> {
        if self.gesture_blocks_history() || !self.doc.undo() {
            return Vec::new();
        }
        self.after_history_move()
    }

    /// Step forward one snapshot. No-op at the end of history or mid-gesture.
    pub fn redo(&mut self) -> Vec<Action> {
        if self.gesture_blocks_history() || !self.doc.redo() {
            return Vec::new();
        }
        self.after_history_move()
    }

    /// Empty the scene, reset history to a single empty snapshot, and drop
    /// the selection and any gesture in progress.
    pub fn clear(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let InputState::EditingText { id, .. } = std::mem::take(&mut self.input) {
            actions.push(Action::EditTextEnded { id });
        }
        self.doc.clear();
        self.set_selection(None, &mut actions);
        info!("scene cleared");
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Images ---

    /// Complete an [`Action::ImageRequested`]. Success inserts an image shape
    /// at the point the request was issued and commits; failure changes nothing.
    ///
    /// Completions are never cancelled: one arriving after the user moved on
    /// still inserts into the current scene.
    pub fn image_decoded(&mut self, request: u64, result: Result<DecodedImage, EditorError>) -> Vec<Action> {
        let Some(anchor) = self.pending_images.remove(&request) else {
            debug!(request, error = %EditorError::InvalidGesture("unknown image request"), "ignored");
            return Vec::new();
        };
        let decoded = match result {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(request, error = %e, "image decode failed");
                return Vec::new();
            }
        };

        if self.ui.tool != Tool::Image || !self.input.is_idle() {
            warn!(request, tool = ?self.ui.tool, "image decode completed after the editor moved on; inserting anyway");
        }

        let shape = Shape::image_at(anchor, decoded.into_source(), &self.ui.style);
        info!(id = %shape.id, request, "image inserted");
        if self.input.is_idle() {
            self.doc.add_committed(shape);
        } else {
            // A text edit or drag is still open; its own commit comes later.
            self.doc.add_over_committed(shape);
        }
        vec![self.committed(), Action::RenderNeeded]
    }

    /// Decode raw file bytes and complete the request with the outcome.
    pub fn image_bytes(&mut self, request: u64, bytes: &[u8]) -> Vec<Action> {
        self.image_decoded(request, decode::decode_bytes(bytes))
    }

    /// The file picker closed without a file.
    pub fn image_cancelled(&mut self, request: u64) {
        if self.pending_images.remove(&request).is_some() {
            debug!(request, "image request cancelled");
        }
    }

    // --- Snapshots ---

    /// Serialize the live scene (shape list) as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Config`] if serialization fails.
    pub fn export_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string(self.doc.shapes())?)
    }

    /// Replace the scene with a JSON shape list. History restarts at the
    /// loaded scene; selection and any gesture are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Config`] if `json` is not a shape list, or
    /// [`EditorError::InvalidSnapshot`] if two shapes share an id or a shape
    /// has fewer points than its kind needs. The scene is left untouched in
    /// either case.
    pub fn load_json(&mut self, json: &str) -> Result<Vec<Action>, EditorError> {
        let mut shapes: Vec<Shape> = serde_json::from_str(json)?;
        let mut seen = HashSet::with_capacity(shapes.len());
        for shape in &mut shapes {
            if !seen.insert(shape.id) {
                return Err(EditorError::InvalidSnapshot { id: shape.id, reason: "duplicate id" });
            }
            if !shape.is_complete() {
                return Err(EditorError::InvalidSnapshot { id: shape.id, reason: "too few points" });
            }
            shape.is_editing = false;
        }

        let mut actions = Vec::new();
        if let InputState::EditingText { id, .. } = std::mem::take(&mut self.input) {
            actions.push(Action::EditTextEnded { id });
        }
        info!(count = shapes.len(), "scene loaded");
        self.doc.load_snapshot(shapes);
        self.set_selection(None, &mut actions);
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.doc.get(id)
    }

    /// The uncommitted shape currently being drawn.
    #[must_use]
    pub fn in_progress(&self) -> Option<&Shape> {
        self.input.in_progress()
    }

    /// Id of the text shape receiving keystrokes, if any.
    #[must_use]
    pub fn editing_text(&self) -> Option<ShapeId> {
        match self.input {
            InputState::EditingText { id, .. } => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.doc.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.doc.can_redo()
    }

    /// Everything the renderer needs for the current state.
    #[must_use]
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            shapes: self.doc.shapes(),
            in_progress: self.input.in_progress(),
            selected: self.ui.selected_id,
            viewport: self.viewport,
            show_grid: self.ui.show_grid,
        }
    }

    // --- Internals ---

    /// Close out the active pointer gesture (pointer-up or pointer-leave).
    fn finish_gesture(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Drawing { mut shape } => {
                // A click without drag still yields a well-formed shape.
                if let Some(&first) = shape.points.first() {
                    while shape.points.len() < shape.kind.min_points() {
                        shape.points.push(first);
                    }
                }
                debug!(id = %shape.id, kind = ?shape.kind, points = shape.points.len(), "shape drawn");
                self.doc.add_committed(shape);
                vec![self.committed(), Action::RenderNeeded]
            }
            InputState::DraggingSelection { id, moved: true, .. } => {
                debug!(%id, "shape moved");
                self.doc.commit();
                vec![self.committed(), Action::RenderNeeded]
            }
            InputState::Panning { .. } => vec![Action::SetCursor(self.ui.tool.cursor().to_owned())],
            editing @ InputState::EditingText { .. } => {
                self.input = editing;
                Vec::new()
            }
            InputState::DraggingSelection { .. } | InputState::Idle => Vec::new(),
        }
    }

    fn start_pan(&mut self, screen_pt: Point, actions: &mut Vec<Action>) {
        self.input = InputState::Panning { last_screen: screen_pt };
        actions.push(Action::SetCursor(CURSOR_GRABBING.to_owned()));
    }

    fn start_move(&mut self, world: Point, actions: &mut Vec<Action>) {
        let target_id = hit::hit_test_scene(world, self.doc.shapes(), &self.viewport);
        self.set_selection(target_id, actions);

        let target = target_id.and_then(|id| self.doc.get(&id).and_then(hit::bounds_of).map(|b| (id, b)));
        let Some((id, bounds)) = target else {
            debug!(error = %EditorError::InvalidGesture("move with nothing under the pointer"), "ignored");
            return;
        };
        self.input = InputState::DraggingSelection { id, anchor: world - bounds.center(), moved: false };
    }

    /// Reopen the topmost text shape under `world`, or place a new empty one.
    /// A new shape joins the scene immediately but is not committed.
    fn start_text(&mut self, world: Point, actions: &mut Vec<Action>) {
        let (id, is_new) = match hit::hit_test_text(world, self.doc.shapes(), &self.viewport) {
            Some(id) => {
                self.doc.update_shape(&id, |s| s.is_editing = true);
                (id, false)
            }
            None => {
                let shape = Shape::text_at(world, &self.ui.style);
                let id = shape.id;
                self.doc.add_shape(shape);
                (id, true)
            }
        };
        debug!(%id, is_new, "text editing started");
        self.input = InputState::EditingText { id, is_new };
        actions.extend(self.edit_text_request(&id));
        actions.push(Action::RenderNeeded);
    }

    fn edit_text_request(&self, id: &ShapeId) -> Option<Action> {
        let shape = self.doc.get(id)?;
        let anchor = *shape.points.first()?;
        Some(Action::EditTextRequested {
            id: *id,
            text: shape.text().to_owned(),
            screen: self.viewport.to_screen(anchor),
            font_size: shape.font_size() * self.viewport.zoom,
        })
    }

    fn text_key(&mut self, id: ShapeId, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        match key.0.as_str() {
            "Enter" => self.finish_text_editing(),
            "Escape" => self.cancel_text_editing(),
            "Backspace" => {
                self.doc.update_shape(&id, |s| {
                    if let Some(text) = s.text.as_mut() {
                        text.pop();
                    }
                });
                vec![Action::RenderNeeded]
            }
            _ => match key.printable() {
                Some(c) if !modifiers.command() => {
                    self.doc.update_shape(&id, |s| s.text.get_or_insert_with(String::new).push(c));
                    vec![Action::RenderNeeded]
                }
                _ => Vec::new(),
            },
        }
    }

    /// Escape outside text editing: drop a half-drawn shape, else the selection.
    fn escape(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if matches!(self.input, InputState::Drawing { .. }) {
            self.input = InputState::Idle;
            actions.push(Action::RenderNeeded);
        } else {
            self.set_selection(None, &mut actions);
        }
        actions
    }

    fn text_is_empty(&self, id: &ShapeId) -> bool {
        self.doc.get(id).is_none_or(|s| s.text().trim().is_empty())
    }

    fn gesture_blocks_history(&self) -> bool {
        let blocked = matches!(
            self.input,
            InputState::Drawing { .. } | InputState::DraggingSelection { .. } | InputState::EditingText { .. }
        );
        if blocked {
            debug!(error = %EditorError::InvalidGesture("history move during a gesture"), "ignored");
        }
        blocked
    }

    fn after_history_move(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(id) = self.ui.selected_id {
            if !self.doc.contains(&id) {
                self.set_selection(None, &mut actions);
            }
        }
        debug!(index = self.doc.history_index(), shapes = self.doc.len(), "history moved");
        actions.push(Action::RenderNeeded);
        actions
    }

    fn set_selection(&mut self, id: Option<ShapeId>, actions: &mut Vec<Action>) {
        if self.ui.selected_id != id {
            self.ui.selected_id = id;
            actions.push(Action::SelectionChanged(id));
        }
        actions.push(Action::RenderNeeded);
    }

    fn committed(&self) -> Action {
        Action::Committed { index: self.doc.history_index() }
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    images: ImageCache,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self::with_config(canvas, &EditorConfig::default())
    }

    #[must_use]
    pub fn with_config(canvas: HtmlCanvasElement, config: &EditorConfig) -> Self {
        Self { canvas, images: ImageCache::default(), core: EngineCore::from_config(config) }
    }

    /// Function the engine calls when a lazily decoded image becomes
    /// drawable. The host should schedule a [`Engine::render`].
    pub fn set_redraw_callback(&self, callback: js_sys::Function) {
        self.images.set_on_ready(callback);
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio, resizing the
    /// canvas backing store to match.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        let dpr = self.core.dpr;
        self.canvas.set_width((width_css * dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * dpr).round().max(0.0) as u32);
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button, modifiers)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.core.on_pointer_leave()
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(screen_pt, delta, modifiers)
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    // --- Delegated commands ---

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool)
    }

    pub fn set_text(&mut self, text: &str) -> Vec<Action> {
        self.core.set_text(text)
    }

    pub fn finish_text_editing(&mut self) -> Vec<Action> {
        self.core.finish_text_editing()
    }

    pub fn cancel_text_editing(&mut self) -> Vec<Action> {
        self.core.cancel_text_editing()
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        self.core.delete_selected()
    }

    pub fn undo(&mut self) -> Vec<Action> {
        self.core.undo()
    }

    pub fn redo(&mut self) -> Vec<Action> {
        self.core.redo()
    }

    /// Clear the scene and drop every cached image element.
    pub fn clear(&mut self) -> Vec<Action> {
        self.images.clear();
        self.core.clear()
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        self.core.reset_view()
    }

    pub fn image_decoded(&mut self, request: u64, result: Result<DecodedImage, EditorError>) -> Vec<Action> {
        self.core.image_decoded(request, result)
    }

    pub fn image_bytes(&mut self, request: u64, bytes: &[u8]) -> Vec<Action> {
        self.core.image_bytes(request, bytes)
    }

    pub fn image_cancelled(&mut self, request: u64) {
        self.core.image_cancelled(request);
    }

    /// Load a snapshot and drop every cached image element.
    ///
    /// # Errors
    ///
    /// See [`EngineCore::load_json`].
    pub fn load_json(&mut self, json: &str) -> Result<Vec<Action>, EditorError> {
        let actions = self.core.load_json(json)?;
        self.images.clear();
        Ok(actions)
    }

    /// # Errors
    ///
    /// See [`EngineCore::export_json`].
    pub fn export_json(&self) -> Result<String, EditorError> {
        self.core.export_json()
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a canvas call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let surface = CanvasSurface::new(&ctx, &self.images);
        render::draw(&surface, &self.core.frame(), self.core.viewport_width, self.core.viewport_height, self.core.dpr)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.core.selection()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.core.viewport()
    }

    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.core.shape(id)
    }
}
