//! Software ARGB canvas with draw transactions, alpha compositing, bit-packed
//! stencils and sprite overlays.
//!
//! ```
//! use spritecanvas::{BlendMode, Canvas, PixelBuffer, Source};
//! use spritecanvas::shape::Rect;
//!
//! let mut canvas = Canvas::with_color(32, 32, 0xFF000000)?;
//! {
//!     let mut edit = canvas.begin_edit();
//!     edit.draw_line(0, 0, 31, 31, 0xFFFFFFFF, BlendMode::Override)?;
//!     edit.fill_rectangle(Rect::new(4, 4, 8, 8), Source::Color(0x80FF0000), BlendMode::Alpha)?;
//! }
//!
//! let sprite = canvas.create_sprite_from(10, 10, PixelBuffer::filled(4, 4, 0xFF00FF00)?)?;
//! canvas.show_sprite(sprite)?;
//! assert_eq!(canvas.pick(11, 11)?, 0xFF00FF00);
//! # Ok::<(), spritecanvas::CanvasError>(())
//! ```

pub mod buffer;
pub mod canvas;
pub mod codec;
pub mod color;
pub mod config;
pub mod error;
pub mod mask;
pub mod paint;
pub mod shape;
pub mod sprite;
pub mod text;

pub use buffer::PixelBuffer;
pub use canvas::{BumpSettings, Canvas, CanvasId, ChangeListener, EditGuard, ListenerSet, Source};
pub use codec::{ImageCodec, PngCodec};
pub use color::{BlendMode, PixelCombination};
pub use config::{CanvasConfig, SpriteSpec};
pub use error::{CanvasError, Result};
pub use mask::Mask;
pub use paint::Paint;
pub use sprite::{Sprite, SpriteId};
pub use text::{BitmapFont, GlyphRasterizer};
