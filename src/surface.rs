//! Drawing surface abstraction and its browser implementation.
//!
//! [`crate::render`] draws through the [`Surface`] trait so the frame
//! sequence can run natively against a recording double. In the browser,
//! [`CanvasSurface`] forwards to a [`CanvasRenderingContext2d`] and decodes
//! image shapes lazily through an [`ImageCache`].

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::doc::{ImageSource, ShapeId};

/// The drawing primitives the renderer needs: paths, text, images, and a
/// translate + uniform-scale transform.
pub trait Surface {
    /// Error produced by fallible drawing calls.
    type Error;

    fn save(&self);
    fn restore(&self);
    /// Replace the current transform with `scale` about the origin followed by a `(tx, ty)` translation.
    fn set_transform(&self, scale: f64, tx: f64, ty: f64) -> Result<(), Self::Error>;
    /// Clear `width` x `height` starting at the current origin.
    fn clear(&self, width: f64, height: f64);

    fn begin_path(&self);
    fn move_to(&self, x: f64, y: f64);
    fn line_to(&self, x: f64, y: f64);
    fn close_path(&self);
    fn rect(&self, x: f64, y: f64, w: f64, h: f64);
    /// Add a full circle to the current path.
    fn circle(&self, cx: f64, cy: f64, radius: f64) -> Result<(), Self::Error>;
    fn stroke(&self);
    fn fill(&self);

    fn set_stroke_style(&self, color: &str);
    fn set_fill_style(&self, color: &str);
    fn set_line_width(&self, width: f64);
    /// Round caps and joins for hand-drawn strokes.
    fn set_round_lines(&self);
    /// Dash pattern; an empty slice restores solid lines.
    fn set_line_dash(&self, segments: &[f64]) -> Result<(), Self::Error>;

    fn set_font(&self, font: &str);
    fn fill_text(&self, text: &str, x: f64, y: f64) -> Result<(), Self::Error>;

    /// Draw the image belonging to shape `id` into the given world rectangle.
    /// Surfaces that decode asynchronously may skip the draw until ready.
    fn draw_image(&self, id: ShapeId, image: &ImageSource, x: f64, y: f64, w: f64, h: f64)
    -> Result<(), Self::Error>;
}

// =============================================================
// Browser image cache
// =============================================================

/// Per-shape entries remembered together with the image source they were
/// built from. A lookup with a different source evicts the stale entry.
pub struct ElementCache<E> {
    entries: RefCell<HashMap<ShapeId, (String, E)>>,
}

impl<E> Default for ElementCache<E> {
    fn default() -> Self {
        Self { entries: RefCell::new(HashMap::new()) }
    }
}

impl<E: Clone> ElementCache<E> {
    /// The entry for `id` if it was built from `source`.
    #[must_use]
    pub fn get(&self, id: ShapeId, source: &str) -> Option<E> {
        let mut entries = self.entries.borrow_mut();
        let (cached, element) = entries.get(&id)?;
        if cached == source {
            return Some(element.clone());
        }
        debug!(%id, "image source changed; evicting cached element");
        entries.remove(&id);
        None
    }

    pub fn insert(&self, id: ShapeId, source: &str, element: E) {
        self.entries.borrow_mut().insert(id, (source.to_owned(), element));
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Decoded `<img>` elements keyed by shape id and source. Never serialized.
#[derive(Default)]
pub struct ImageCache {
    images: ElementCache<HtmlImageElement>,
    on_ready: Rc<RefCell<Option<js_sys::Function>>>,
}

impl ImageCache {
    /// Register the function invoked whenever a pending image finishes loading.
    pub fn set_on_ready(&self, callback: js_sys::Function) {
        *self.on_ready.borrow_mut() = Some(callback);
    }

    /// Drop every cached element.
    pub fn clear(&self) {
        self.images.clear();
    }

    /// Return the element for `id` if it has finished decoding; otherwise
    /// start loading it (once per source) and return `None`.
    fn ready(&self, id: ShapeId, image: &ImageSource) -> Result<Option<HtmlImageElement>, JsValue> {
        if let Some(img) = self.images.get(id, &image.source) {
            let loaded = img.complete() && img.natural_width() > 0;
            return Ok(loaded.then_some(img));
        }

        let img = HtmlImageElement::new()?;
        let on_ready = Rc::clone(&self.on_ready);
        let onload = Closure::once_into_js(move || {
            debug!(%id, "image decoded");
            if let Some(callback) = on_ready.borrow().as_ref() {
                if let Err(e) = callback.call0(&JsValue::NULL) {
                    warn!(?e, "redraw callback failed");
                }
            }
        });
        img.set_onload(Some(onload.unchecked_ref()));
        img.set_src(&image.source);
        self.images.insert(id, &image.source, img);
        Ok(None)
    }
}

// =============================================================
// CanvasRenderingContext2d surface
// =============================================================

/// A [`Surface`] backed by a browser 2D context.
pub struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    images: &'a ImageCache,
}

impl<'a> CanvasSurface<'a> {
    #[must_use]
    pub fn new(ctx: &'a CanvasRenderingContext2d, images: &'a ImageCache) -> Self {
        Self { ctx, images }
    }
}

impl Surface for CanvasSurface<'_> {
    type Error = JsValue;

    fn save(&self) {
        self.ctx.save();
    }

    fn restore(&self) {
        self.ctx.restore();
    }

    fn set_transform(&self, scale: f64, tx: f64, ty: f64) -> Result<(), JsValue> {
        self.ctx.set_transform(scale, 0.0, 0.0, scale, tx, ty)
    }

    fn clear(&self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn begin_path(&self) {
        self.ctx.begin_path();
    }

    fn move_to(&self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn close_path(&self) {
        self.ctx.close_path();
    }

    fn rect(&self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.rect(x, y, w, h);
    }

    fn circle(&self, cx: f64, cy: f64, radius: f64) -> Result<(), JsValue> {
        self.ctx.arc(cx, cy, radius, 0.0, std::f64::consts::TAU)
    }

    fn stroke(&self) {
        self.ctx.stroke();
    }

    fn fill(&self) {
        self.ctx.fill();
    }

    fn set_stroke_style(&self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_fill_style(&self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_line_width(&self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_round_lines(&self) {
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
    }

    fn set_line_dash(&self, segments: &[f64]) -> Result<(), JsValue> {
        let dash_array = js_sys::Array::new();
        for seg in segments {
            dash_array.push(&(*seg).into());
        }
        self.ctx.set_line_dash(&dash_array)
    }

    fn set_font(&self, font: &str) {
        self.ctx.set_font(font);
    }

    fn fill_text(&self, text: &str, x: f64, y: f64) -> Result<(), JsValue> {
        self.ctx.fill_text(text, x, y)
    }

    fn draw_image(&self, id: ShapeId, image: &ImageSource, x: f64, y: f64, w: f64, h: f64) -> Result<(), JsValue> {
        match self.images.ready(id, image)? {
            Some(img) => self
                .ctx
                .draw_image_with_html_image_element_and_dw_and_dh(&img, x, y, w, h),
            None => Ok(()),
        }
    }
}
