//! Shared numeric constants for the sketchboard crate.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.1;

/// Largest allowed zoom factor.
pub const ZOOM_MAX: f64 = 5.0;

/// Zoom multiplier applied per wheel step toward the user (zoom in).
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// Zoom multiplier applied per wheel step away from the user (zoom out).
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space grab margin in pixels around a shape's bounding box.
pub const HIT_TOLERANCE_PX: f64 = 10.0;

/// Approximate glyph advance as a fraction of the font size.
pub const TEXT_CHAR_WIDTH_RATIO: f64 = 0.6;

// ── Rendering ───────────────────────────────────────────────────

/// Grid line spacing in world units.
pub const GRID_SIZE: f64 = 20.0;

/// Padding between a selected shape's bounds and its dashed outline, in world units.
pub const SELECTION_PADDING: f64 = 5.0;

/// Length of each arrowhead stroke before inverse-zoom scaling.
pub const ARROW_HEAD_SIZE: f64 = 15.0;

/// Arrowhead half-angle in radians (30°).
pub const ARROW_HEAD_ANGLE: f64 = std::f64::consts::FRAC_PI_6;

/// Largest width or height an image is displayed at, in logical units.
pub const IMAGE_MAX_DISPLAY: f64 = 200.0;

// ── Style defaults ──────────────────────────────────────────────

/// Font size used when a text shape carries none.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Thinnest selectable stroke width.
pub const STROKE_WIDTH_MIN: f64 = 1.0;

/// Thickest selectable stroke width.
pub const STROKE_WIDTH_MAX: f64 = 10.0;
