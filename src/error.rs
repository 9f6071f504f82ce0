//! Canvas error types

use thiserror::Error;

use crate::sprite::SpriteId;

/// Errors reported by canvas, stencil, codec and config operations.
///
/// Every variant is raised before any pixel is touched, so a failed call
/// leaves the canvas exactly as it was.
#[derive(Error, Debug)]
pub enum CanvasError {
    /// Drawing or algebra attempted outside an edit transaction
    #[error("canvas is not in an edit transaction")]
    NotEditing,

    /// Pixel algebra between buffers of different sizes
    #[error("dimension mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },

    /// Construction with a zero width or height
    #[error("invalid size {width}x{height}, both sides must be at least 1")]
    InvalidSize { width: u32, height: u32 },

    /// Pixel vector length disagrees with the declared size
    #[error("expected {expected} pixels, found {found}")]
    PixelCount { expected: usize, found: usize },

    /// Pixel access outside the buffer
    #[error("pixel ({x}, {y}) is outside {width}x{height}")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    /// Argument outside the accepted domain
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Sprite list mutation attempted while a transaction is open
    #[error("sprites cannot be added or removed during an edit transaction")]
    SpriteBusy,

    /// Sprite handle does not belong to this canvas
    #[error("unknown sprite {0:?}")]
    UnknownSprite(SpriteId),

    /// Codec could not parse image bytes
    #[error("image decode failed: {0}")]
    Decode(String),

    /// Codec could not produce image bytes
    #[error("image encode failed: {0}")]
    Encode(String),

    /// Stencil stream header or payload is inconsistent
    #[error("malformed stencil: {0}")]
    MalformedStencil(String),

    /// Canvas description could not be parsed or written
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for canvas operations
pub type Result<T> = std::result::Result<T, CanvasError>;
