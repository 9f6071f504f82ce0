//! Canvas: pixel surface, edit transactions and the sprite stack
//!
//! A canvas is driven by a single thread. Nothing protects the pixels, the
//! sprite list or the transaction state from concurrent mutation; only the
//! listener set is shared (see [`ListenerSet`]).
//!
//! Raw drawing happens inside an edit transaction opened with
//! [`Canvas::begin_edit`]. Opening one lifts every visible sprite off the
//! pixels (highest index first) so drawing never lands under a sprite's back
//! snapshot; closing it puts them back and fires one change notification.

mod algebra;
mod draw;
mod edit;
mod fill;
mod listeners;
mod sprites;

pub use algebra::BumpSettings;
pub use edit::EditGuard;
pub use fill::Source;
pub use listeners::{ChangeListener, ListenerSet};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::buffer::PixelBuffer;
use crate::codec::ImageCodec;
use crate::color;
use crate::error::{CanvasError, Result};
use crate::sprite::Sprite;

static NEXT_CANVAS_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique canvas identity, used by sprites as a non-owning back-reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanvasId(u64);

impl CanvasId {
    fn next() -> Self {
        Self(NEXT_CANVAS_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug)]
pub struct Canvas {
    id: CanvasId,
    surface: PixelBuffer,
    editing: bool,
    sprites: Vec<Sprite>,
    listeners: Arc<ListenerSet>,
}

impl Canvas {
    /// Create a transparent canvas
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_color(width, height, color::TRANSPARENT)
    }

    /// Create a canvas with every pixel set to `fill`
    pub fn with_color(width: u32, height: u32, fill: u32) -> Result<Self> {
        Ok(Self::from_buffer(PixelBuffer::filled(width, height, fill)?))
    }

    /// Take ownership of existing pixels
    pub fn from_buffer(surface: PixelBuffer) -> Self {
        let canvas = Self {
            id: CanvasId::next(),
            surface,
            editing: false,
            sprites: Vec::new(),
            listeners: Arc::new(ListenerSet::new()),
        };
        debug!(id = ?canvas.id, width = canvas.width(), height = canvas.height(), "created canvas");
        canvas
    }

    #[inline]
    pub fn id(&self) -> CanvasId {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// Current pixels, sprites included when shown
    #[inline]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.surface
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        self.surface.pixels()
    }

    /// Independent copy of the current pixels
    pub fn to_buffer(&self) -> PixelBuffer {
        self.surface.clone()
    }

    /// Give up the pixels, sprites stay baked in where shown
    pub fn into_buffer(self) -> PixelBuffer {
        self.surface
    }

    /// Read one pixel. Allowed in or out of a transaction.
    pub fn pick(&self, x: i32, y: i32) -> Result<u32> {
        self.surface.get(x, y).ok_or(CanvasError::OutOfBounds {
            x,
            y,
            width: self.width(),
            height: self.height(),
        })
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    #[inline]
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Open an edit transaction, closed when the returned guard drops.
    /// Re-entering while one is open returns an inert guard.
    pub fn begin_edit(&mut self) -> EditGuard<'_> {
        EditGuard::new(self)
    }

    /// Enter edit mode. Returns false if already editing.
    fn start_edit(&mut self) -> bool {
        if self.editing {
            return false;
        }
        self.editing = true;

        let mut lifted = 0usize;
        for sprite in self.sprites.iter_mut().rev() {
            if sprite.is_shown() {
                sprite.hide_from(&mut self.surface);
                lifted += 1;
            }
        }
        trace!(id = ?self.id, lifted, "edit started");
        true
    }

    /// Leave edit mode, replay requested sprite visibility bottom-up, notify once
    fn end_edit(&mut self) {
        if !self.editing {
            return;
        }
        self.editing = false;

        let mut shown = 0usize;
        for sprite in &mut self.sprites {
            if sprite.is_visible() {
                sprite.show_on(&mut self.surface);
                shown += 1;
            }
        }
        trace!(id = ?self.id, shown, "edit finished");
        self.listeners.notify();
    }

    #[inline]
    fn ensure_editing(&self) -> Result<()> {
        if self.editing {
            Ok(())
        } else {
            Err(CanvasError::NotEditing)
        }
    }

    // ========================================================================
    // Change listeners
    // ========================================================================

    /// Add a listener; registering the same one twice has no effect
    pub fn register(&self, listener: Arc<dyn ChangeListener>) -> bool {
        self.listeners.register(listener)
    }

    pub fn unregister(&self, listener: &Arc<dyn ChangeListener>) -> bool {
        self.listeners.unregister(listener)
    }

    /// Shared listener set, usable from other threads
    pub fn listeners(&self) -> Arc<ListenerSet> {
        Arc::clone(&self.listeners)
    }

    /// Notify listeners without a transaction
    pub fn update(&self) {
        self.listeners.notify();
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Encode the current pixels
    pub fn save_image(&self, codec: &dyn ImageCodec) -> Result<Vec<u8>> {
        codec.encode(&self.surface)
    }

    /// Build a new canvas from encoded bytes
    pub fn load_image(bytes: &[u8], codec: &dyn ImageCodec) -> Result<Self> {
        codec.decode(bytes).map(Self::from_buffer)
    }
}
