//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! This module defines the types consumed by the input engine. `Tool` and
//! `Modifiers` capture the user's intent at the time of a pointer event.
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up (or, for text, between the click that opens an editor and the
//! key or blur that closes it).

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::{Shape, ShapeId, ShapeKind, Style};
use crate::viewport::Point;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Click to select the topmost shape (default).
    #[default]
    Select,
    /// Select and drag a shape.
    Move,
    /// Drag the canvas.
    Pan,
    /// Draw a rectangle.
    Rectangle,
    /// Draw a circle from its center.
    Circle,
    /// Draw a triangle.
    Triangle,
    /// Draw a straight line segment.
    Line,
    /// Draw an arrow.
    Arrow,
    /// Draw freehand.
    Pen,
    /// Place or edit text.
    Text,
    /// Insert an image from a file.
    Image,
}

impl Tool {
    /// The shape kind this tool draws by dragging, if any.
    #[must_use]
    pub fn draws(self) -> Option<ShapeKind> {
        match self {
            Self::Rectangle => Some(ShapeKind::Rectangle),
            Self::Circle => Some(ShapeKind::Circle),
            Self::Triangle => Some(ShapeKind::Triangle),
            Self::Line => Some(ShapeKind::Line),
            Self::Arrow => Some(ShapeKind::Arrow),
            Self::Pen => Some(ShapeKind::Freehand),
            Self::Select | Self::Move | Self::Pan | Self::Text | Self::Image => None,
        }
    }

    /// CSS cursor shown over the canvas while this tool is active.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Select => "pointer",
            Self::Move => "move",
            Self::Pan => "grab",
            Self::Text => "text",
            _ => "crosshair",
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`, `"a"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// The character this key types, if it is a single printable character.
    #[must_use]
    pub fn printable(&self) -> Option<char> {
        let mut chars = self.0.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Some(c),
            _ => None,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// The id of the currently selected shape, if any.
    pub selected_id: Option<ShapeId>,
    /// Style applied to shapes created from now on.
    pub style: Style,
    /// Whether the background grid is drawn.
    pub show_grid: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self { tool: Tool::default(), selected_id: None, style: Style::default(), show_grid: true }
    }
}

/// Internal state for the input state machine.
///
/// Each active variant carries the gesture context needed to compute deltas
/// and emit the final commit.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A shape tool is dragging out a new, uncommitted shape.
    Drawing {
        /// The in-progress shape. Not part of the scene until pointer-up.
        shape: Shape,
    },
    /// The move tool is dragging the selected shape.
    DraggingSelection {
        /// Id of the shape being dragged.
        id: ShapeId,
        /// Pointer position minus the shape's bounds center at pointer-down.
        anchor: Point,
        /// Whether any pointer-move has translated the shape yet.
        moved: bool,
    },
    /// The canvas is being dragged.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
    },
    /// A text shape is receiving keystrokes.
    EditingText {
        /// Id of the text shape being edited.
        id: ShapeId,
        /// Whether the shape was created by this gesture rather than reopened.
        is_new: bool,
    },
}

impl InputState {
    /// The uncommitted shape being drawn, if any.
    #[must_use]
    pub fn in_progress(&self) -> Option<&Shape> {
        match self {
            Self::Drawing { shape } => Some(shape),
            _ => None,
        }
    }

    /// Whether no gesture is active.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
