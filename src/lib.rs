//! Drawing and editing engine for a collaborative whiteboard canvas.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! editable scene: translating raw DOM input events into shape mutations,
//! keeping an undo/redo history of scene snapshots, maintaining the pan/zoom
//! viewport, hit-testing shapes, and redrawing the scene. The host
//! JavaScript layer wires DOM events to the engine and acts on the returned
//! [`engine::Action`]s (redraws, cursor changes, the text overlay, the file
//! picker).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Input state machine ([`engine::EngineCore`]) and the browser [`engine::Engine`] |
//! | [`doc`] | Shape types and the scene store with snapshot history |
//! | [`viewport`] | Pan/zoom transform and screen/world conversions |
//! | [`input`] | Tools, input event types, and gesture state |
//! | [`hit`] | Bounding boxes and hit-testing |
//! | [`render`] | Per-frame drawing onto a [`surface::Surface`] |
//! | [`surface`] | Drawing surface trait, 2D canvas implementation, image cache |
//! | [`decode`] | Image file decoding for the image tool |
//! | [`config`] | Host-supplied editor configuration |
//! | [`error`] | Editor error taxonomy |
//! | [`consts`] | Shared numeric constants (zoom limits, tolerances, sizes) |

pub mod config;
pub mod consts;
pub mod decode;
pub mod doc;
pub mod engine;
pub mod error;
pub mod hit;
pub mod input;
pub mod render;
pub mod surface;
pub mod viewport;
