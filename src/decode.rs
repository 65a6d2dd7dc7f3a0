//! Image file decoding for the image tool.
//!
//! The host reads the picked file into bytes and hands them here. Decoding
//! validates the whole image, records its natural size, and produces a
//! `data:` URL the renderer can load.

#[cfg(test)]
#[path = "decode_test.rs"]
mod decode_test;

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::ImageReader;

use crate::doc::ImageSource;
use crate::error::EditorError;

/// A successfully decoded image, ready to become an image shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// `data:` URL carrying the original file bytes.
    pub source: String,
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
}

impl DecodedImage {
    /// Build from a source the host already decoded (e.g. an `<img>` element).
    #[must_use]
    pub fn new(source: impl Into<String>, width: u32, height: u32) -> Self {
        Self { source: source.into(), width, height }
    }

    /// Convert into the payload stored on a shape.
    #[must_use]
    pub fn into_source(self) -> ImageSource {
        ImageSource {
            source: self.source,
            natural_width: f64::from(self.width),
            natural_height: f64::from(self.height),
        }
    }
}

/// Decode an image file's bytes.
///
/// # Errors
///
/// Returns [`EditorError::DecodeFailure`] if the bytes are empty, the format
/// is unrecognized, the data is corrupt, or the image has zero area.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedImage, EditorError> {
    if bytes.is_empty() {
        return Err(EditorError::DecodeFailure("empty file".to_owned()));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| EditorError::DecodeFailure(e.to_string()))?;
    let Some(format) = reader.format() else {
        return Err(EditorError::DecodeFailure("unrecognized image format".to_owned()));
    };

    let decoded = reader.decode()?;
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(EditorError::DecodeFailure(format!("degenerate image {width}x{height}")));
    }

    let source = format!("data:{};base64,{}", format.to_mime_type(), STANDARD.encode(bytes));
    Ok(DecodedImage { source, width, height })
}
