//! Bounding boxes and hit-testing for shapes.
//!
//! Selection is box-based: a point hits a shape when it falls inside the
//! shape's axis-aligned bounds grown by a margin of `HIT_TOLERANCE_PX`
//! screen pixels, converted to world units at the current zoom.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::TEXT_CHAR_WIDTH_RATIO;
use crate::doc::{Shape, ShapeId, ShapeKind};
use crate::viewport::{Point, Viewport};

/// Axis-aligned bounding box in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Grow the box by `margin` on every side.
    #[must_use]
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.min_x && pt.x <= self.max_x && pt.y >= self.min_y && pt.y <= self.max_y
    }
}

/// Bounding box of a shape, or `None` if it has no points.
///
/// Circles use their full disk (center ± radius). Text uses an approximate
/// advance of `0.6 * font_size` per character and one `font_size` of height;
/// this only gates selection, never rendering.
#[must_use]
pub fn bounds_of(shape: &Shape) -> Option<Bounds> {
    let first = *shape.points.first()?;

    match shape.kind {
        ShapeKind::Circle if shape.points.len() >= 2 => {
            let radius = first.distance(shape.points[1]);
            Some(Bounds {
                min_x: first.x - radius,
                min_y: first.y - radius,
                max_x: first.x + radius,
                max_y: first.y + radius,
            })
        }
        ShapeKind::Text => {
            let size = shape.font_size();
            #[allow(clippy::cast_precision_loss)]
            let chars = shape.text().chars().count() as f64;
            Some(Bounds {
                min_x: first.x,
                min_y: first.y,
                max_x: first.x + TEXT_CHAR_WIDTH_RATIO * size * chars,
                max_y: first.y + size,
            })
        }
        _ => Some(tight_bounds(&shape.points, first)),
    }
}

fn tight_bounds(points: &[Point], first: Point) -> Bounds {
    points.iter().fold(
        Bounds { min_x: first.x, min_y: first.y, max_x: first.x, max_y: first.y },
        |b, p| Bounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        },
    )
}

/// Whether `world_pt` lies within the shape's bounds grown by the zoom-scaled
/// tolerance.
#[must_use]
pub fn hit_test(world_pt: Point, shape: &Shape, viewport: &Viewport) -> bool {
    bounds_of(shape).is_some_and(|b| b.expand(viewport.hit_tolerance()).contains(world_pt))
}

/// Topmost shape under `world_pt`, testing in reverse paint order.
#[must_use]
pub fn hit_test_scene(world_pt: Point, shapes: &[Shape], viewport: &Viewport) -> Option<ShapeId> {
    shapes
        .iter()
        .rev()
        .find(|s| hit_test(world_pt, s, viewport))
        .map(|s| s.id)
}

/// Topmost text shape under `world_pt`, ignoring every other kind.
#[must_use]
pub fn hit_test_text(world_pt: Point, shapes: &[Shape], viewport: &Viewport) -> Option<ShapeId> {
    shapes
        .iter()
        .rev()
        .filter(|s| s.kind == ShapeKind::Text)
        .find(|s| hit_test(world_pt, s, viewport))
        .map(|s| s.id)
}
