//! Sprite records
//!
//! A sprite is a fixed-size overlay owned by exactly one canvas. The canvas
//! keeps sprites in an ordered list and composites them itself; a sprite only
//! remembers which canvas owns it (by id) and the pixels it covered when it
//! was last shown.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::buffer::PixelBuffer;
use crate::canvas::CanvasId;
use crate::error::{CanvasError, Result};

static NEXT_SPRITE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable handle to a sprite, valid across reindexing and transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(u64);

impl SpriteId {
    fn next() -> Self {
        Self(NEXT_SPRITE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug)]
pub struct Sprite {
    id: SpriteId,
    owner: CanvasId,
    index: usize,
    x: i32,
    y: i32,
    content: PixelBuffer,
    back: PixelBuffer,
    /// Visibility the caller asked for
    visible: bool,
    /// Whether the content is currently composited onto the owner's pixels
    shown: bool,
}

impl Sprite {
    pub(crate) fn new(owner: CanvasId, index: usize, x: i32, y: i32, content: PixelBuffer) -> Result<Self> {
        let back = PixelBuffer::new(content.width(), content.height())?;
        Ok(Self {
            id: SpriteId::next(),
            owner,
            index,
            x,
            y,
            content,
            back,
            visible: false,
            shown: false,
        })
    }

    #[inline]
    pub fn id(&self) -> SpriteId {
        self.id
    }

    /// Canvas this sprite belongs to
    #[inline]
    pub fn owner(&self) -> CanvasId {
        self.owner
    }

    /// Position in the owner's list, 0 being the bottom layer
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.content.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.content.height()
    }

    /// Requested visibility. During an edit transaction this is the state
    /// that will be restored when the transaction closes.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> &PixelBuffer {
        &self.content
    }

    /// Mutable content. Changes reach the canvas only when the sprite is
    /// shown again or refreshed through the canvas.
    pub fn content_mut(&mut self) -> &mut PixelBuffer {
        &mut self.content
    }

    /// Replace the content with a buffer of the same size
    pub fn set_content(&mut self, content: PixelBuffer) -> Result<()> {
        self.content.ensure_same_size(&content)?;
        self.content = content;
        Ok(())
    }

    /// Pixels captured under the sprite when it was last shown
    pub fn back_snapshot(&self) -> &PixelBuffer {
        &self.back
    }

    // ========================================================================
    // Compositing (driven by the owning canvas)
    // ========================================================================

    #[inline]
    pub(crate) fn is_shown(&self) -> bool {
        self.shown
    }

    pub(crate) fn set_requested(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub(crate) fn set_owner(&mut self, owner: CanvasId) {
        self.owner = owner;
    }

    pub(crate) fn move_to(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Snapshot what is under the footprint, then alpha-mix the content over it
    pub(crate) fn show_on(&mut self, surface: &mut PixelBuffer) {
        if self.shown {
            return;
        }
        self.back.snapshot_from(surface, self.x, self.y);
        surface.blit_blend(&self.content, self.x, self.y);
        self.shown = true;
    }

    /// Put the snapshot back
    pub(crate) fn hide_from(&mut self, surface: &mut PixelBuffer) {
        if !self.shown {
            return;
        }
        surface.blit(&self.back, self.x, self.y);
        self.shown = false;
    }

    /// Restore the snapshot and composite the current content again
    pub(crate) fn redraw_on(&mut self, surface: &mut PixelBuffer) {
        if !self.shown {
            return;
        }
        surface.blit(&self.back, self.x, self.y);
        surface.blit_blend(&self.content, self.x, self.y);
    }
}

/// Reject sprite content with a zero side
pub(crate) fn check_sprite_size(width: u32, height: u32) -> Result<()> {
    if width < 1 || height < 1 {
        return Err(CanvasError::InvalidSize { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;

    fn sprite_on(canvas: &Canvas, color: u32) -> Sprite {
        let content = PixelBuffer::filled(2, 2, color).unwrap();
        Sprite::new(canvas.id(), 0, 1, 1, content).unwrap()
    }

    #[test]
    fn test_ids_are_unique() {
        let canvas = Canvas::new(4, 4).unwrap();
        let a = sprite_on(&canvas, 0xFFFF0000);
        let b = sprite_on(&canvas, 0xFFFF0000);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.owner(), canvas.id());
    }

    #[test]
    fn test_show_hide_restores_surface() {
        let mut surface = PixelBuffer::filled(4, 4, 0xFF101010).unwrap();
        surface.set(2, 2, 0xFF202020);
        let original = surface.clone();

        let canvas = Canvas::new(4, 4).unwrap();
        let mut sprite = sprite_on(&canvas, 0xFFFF0000);
        sprite.show_on(&mut surface);
        assert_eq!(surface.get(2, 2), Some(0xFFFF0000));
        assert_eq!(sprite.back_snapshot().get(1, 1), Some(0xFF202020));

        sprite.show_on(&mut surface);
        assert_eq!(sprite.back_snapshot().get(1, 1), Some(0xFF202020));

        sprite.hide_from(&mut surface);
        sprite.hide_from(&mut surface);
        assert_eq!(surface, original);
    }

    #[test]
    fn test_set_content_size_checked() {
        let canvas = Canvas::new(4, 4).unwrap();
        let mut sprite = sprite_on(&canvas, 0);
        assert!(sprite.set_content(PixelBuffer::new(3, 2).unwrap()).is_err());
        assert!(sprite.set_content(PixelBuffer::filled(2, 2, 7).unwrap()).is_ok());
        assert_eq!(sprite.content().get(0, 0), Some(7));
    }

    #[test]
    fn test_redraw_picks_up_new_content() {
        let mut surface = PixelBuffer::filled(4, 4, 0xFF000000).unwrap();
        let canvas = Canvas::new(4, 4).unwrap();
        let mut sprite = sprite_on(&canvas, 0xFFFF0000);
        sprite.show_on(&mut surface);
        sprite.content_mut().fill(0xFF00FF00);
        assert_eq!(surface.get(1, 1), Some(0xFFFF0000));
        sprite.redraw_on(&mut surface);
        assert_eq!(surface.get(1, 1), Some(0xFF00FF00));
        sprite.hide_from(&mut surface);
        assert_eq!(surface.get(1, 1), Some(0xFF000000));
    }
}
