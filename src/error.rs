//! Editor error taxonomy.
//!
//! None of these are fatal. Event handlers in [`crate::engine`] log them and
//! leave the scene untouched (or, for [`EditorError::EmptyCommit`], delete
//! the empty text shape) so the editor stays interactive.

use crate::doc::ShapeId;

/// Conditions the editor handles without surfacing to the user.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// The gesture makes no sense in the current state (e.g. moving with nothing under the pointer).
    #[error("invalid gesture: {0}")]
    InvalidGesture(&'static str),
    /// An image could not be read or decoded.
    #[error("image decode failed: {0}")]
    DecodeFailure(String),
    /// A text shape was finalized with no content.
    #[error("empty text commit")]
    EmptyCommit,
    /// A shape id was referenced that is not in the scene.
    #[error("unknown shape: {0}")]
    UnknownShape(ShapeId),
    /// A loaded snapshot breaks a scene invariant.
    #[error("invalid snapshot: shape {id}: {reason}")]
    InvalidSnapshot { id: ShapeId, reason: &'static str },
    /// Configuration or snapshot JSON could not be parsed.
    #[error("invalid json: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<image::ImageError> for EditorError {
    fn from(err: image::ImageError) -> Self {
        Self::DecodeFailure(err.to_string())
    }
}
