#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::consts::{HIT_TOLERANCE_PX, ZOOM_IN_FACTOR, ZOOM_MAX, ZOOM_MIN, ZOOM_OUT_FACTOR};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point { x: self.x + other.x, y: self.y + other.y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point { x: self.x - other.x, y: self.y - other.y }
    }
}

/// An axis-aligned rectangle in world space, used for the visible area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRect {
    pub min: Point,
    pub max: Point,
}

/// Pan/zoom state for the infinite canvas.
///
/// `offset` is the screen position (CSS pixels) of the world origin.
/// `zoom` is a scale factor clamped to `[ZOOM_MIN, ZOOM_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset: Point,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { offset: Point::default(), zoom: 1.0 }
    }
}

impl Viewport {
    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.offset.x) / self.zoom,
            y: (screen.y - self.offset.y) / self.zoom,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.offset.x,
            y: world.y * self.zoom + self.offset.y,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Hit-test grab margin in world units; shrinks as zoom grows.
    #[must_use]
    pub fn hit_tolerance(&self) -> f64 {
        self.screen_dist_to_world(HIT_TOLERANCE_PX)
    }

    /// Multiply the zoom by `factor` while keeping the world point under
    /// `cursor` (screen space) fixed on screen.
    pub fn zoom_at(&mut self, cursor: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        let ratio = new_zoom / self.zoom;
        self.offset = Point {
            x: cursor.x - (cursor.x - self.offset.x) * ratio,
            y: cursor.y - (cursor.y - self.offset.y) * ratio,
        };
        self.zoom = new_zoom;
    }

    /// Apply one wheel step at `cursor`. Negative `dy` zooms in, positive
    /// zooms out, zero is ignored.
    pub fn wheel(&mut self, cursor: Point, dy: f64) {
        if dy > 0.0 {
            self.zoom_at(cursor, ZOOM_OUT_FACTOR);
        } else if dy < 0.0 {
            self.zoom_at(cursor, ZOOM_IN_FACTOR);
        }
    }

    /// Shift the canvas by a screen-space delta.
    pub fn pan_by(&mut self, delta: Point) {
        self.offset = self.offset + delta;
    }

    /// Restore the identity view.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// World-space rectangle covered by a `width` x `height` screen area.
    #[must_use]
    pub fn visible_world_rect(&self, width: f64, height: f64) -> WorldRect {
        WorldRect {
            min: self.to_world(Point::new(0.0, 0.0)),
            max: self.to_world(Point::new(width, height)),
        }
    }

    /// Zoom as a rounded percentage, for status display.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn zoom_percent(&self) -> i64 {
        (self.zoom * 100.0).round() as i64
    }
}
