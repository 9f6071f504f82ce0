//! Sprite stack management
//!
//! All sprites share the canvas pixels; each one only keeps what it covered.
//! Changing sprite `i` therefore lifts every shown sprite above it first
//! (top-down), applies the change, then puts those back (bottom-up), so each
//! back snapshot always holds exactly the layers below its sprite.

use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::error::{CanvasError, Result};
use crate::sprite::{check_sprite_size, Sprite, SpriteId};

use super::Canvas;

impl Canvas {
    // ========================================================================
    // Lookup
    // ========================================================================

    /// Sprites in stacking order, bottom first
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.id() == id)
    }

    /// Mutable access for content edits. Shown pixels are not refreshed
    /// until [`Canvas::refresh_sprite`] or the next transaction closes.
    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.iter_mut().find(|s| s.id() == id)
    }

    fn position(&self, id: SpriteId) -> Result<usize> {
        self.sprites
            .iter()
            .position(|s| s.id() == id)
            .ok_or(CanvasError::UnknownSprite(id))
    }

    // ========================================================================
    // Creation and removal
    // ========================================================================

    /// Add a hidden, transparent sprite on top of the stack
    pub fn create_sprite(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<SpriteId> {
        check_sprite_size(width, height)?;
        self.create_sprite_from(x, y, PixelBuffer::new(width, height)?)
    }

    /// Add a hidden sprite showing `content` on top of the stack
    pub fn create_sprite_from(&mut self, x: i32, y: i32, content: PixelBuffer) -> Result<SpriteId> {
        if self.editing {
            return Err(CanvasError::SpriteBusy);
        }
        let sprite = Sprite::new(self.id, self.sprites.len(), x, y, content)?;
        let id = sprite.id();
        debug!(canvas = ?self.id, sprite = ?id, index = sprite.index(), "created sprite");
        self.sprites.push(sprite);
        Ok(id)
    }

    /// Take a sprite off the canvas, restoring what it covered, and hand it
    /// back. Higher sprites move down one index.
    pub fn remove_sprite(&mut self, id: SpriteId) -> Result<Sprite> {
        if self.editing {
            return Err(CanvasError::SpriteBusy);
        }
        let index = self.position(id)?;

        let lifted = self.lift_above(index);
        self.sprites[index].hide_from(&mut self.surface);
        let mut sprite = self.sprites.remove(index);
        for (i, s) in self.sprites.iter_mut().enumerate().skip(index) {
            s.set_index(i);
        }
        self.restore(lifted.into_iter().map(|i| i - 1).collect());

        sprite.set_requested(false);
        debug!(canvas = ?self.id, sprite = ?id, index, "removed sprite");
        self.update();
        Ok(sprite)
    }

    /// Move every sprite onto `target`, above its own sprites, keeping order
    /// and requested visibility
    pub fn transfer_sprites_to(&mut self, target: &mut Canvas) -> Result<()> {
        if self.editing || target.editing {
            return Err(CanvasError::SpriteBusy);
        }
        if self.sprites.is_empty() {
            return Ok(());
        }

        for sprite in self.sprites.iter_mut().rev() {
            sprite.hide_from(&mut self.surface);
        }
        let base = target.sprites.len();
        let count = self.sprites.len();
        for (i, mut sprite) in self.sprites.drain(..).enumerate() {
            sprite.set_owner(target.id);
            sprite.set_index(base + i);
            if sprite.is_visible() {
                sprite.show_on(&mut target.surface);
            }
            target.sprites.push(sprite);
        }
        debug!(from = ?self.id, to = ?target.id, count, "transferred sprites");

        self.update();
        target.update();
        Ok(())
    }

    // ========================================================================
    // Visibility and movement
    // ========================================================================

    /// Request a sprite shown or hidden. Inside a transaction only the
    /// request is recorded; it takes effect when the transaction closes.
    pub fn set_sprite_visible(&mut self, id: SpriteId, visible: bool) -> Result<()> {
        let index = self.position(id)?;
        self.sprites[index].set_requested(visible);
        if self.editing || self.sprites[index].is_shown() == visible {
            return Ok(());
        }

        let lifted = self.lift_above(index);
        let sprite = &mut self.sprites[index];
        if visible {
            sprite.show_on(&mut self.surface);
        } else {
            sprite.hide_from(&mut self.surface);
        }
        self.restore(lifted);
        Ok(())
    }

    pub fn show_sprite(&mut self, id: SpriteId) -> Result<()> {
        self.set_sprite_visible(id, true)
    }

    pub fn hide_sprite(&mut self, id: SpriteId) -> Result<()> {
        self.set_sprite_visible(id, false)
    }

    /// Move a sprite. A shown sprite is hidden at the old place and shown at
    /// the new one, so nothing is left behind.
    pub fn set_sprite_position(&mut self, id: SpriteId, x: i32, y: i32) -> Result<()> {
        let index = self.position(id)?;
        let sprite = &self.sprites[index];
        if sprite.x() == x && sprite.y() == y {
            return Ok(());
        }
        if self.editing || !sprite.is_shown() {
            self.sprites[index].move_to(x, y);
            return Ok(());
        }

        let lifted = self.lift_above(index);
        let sprite = &mut self.sprites[index];
        sprite.hide_from(&mut self.surface);
        sprite.move_to(x, y);
        sprite.show_on(&mut self.surface);
        self.restore(lifted);
        Ok(())
    }

    /// Move a sprite by (`dx`, `dy`)
    pub fn translate_sprite(&mut self, id: SpriteId, dx: i32, dy: i32) -> Result<()> {
        let index = self.position(id)?;
        let (x, y) = (self.sprites[index].x(), self.sprites[index].y());
        self.set_sprite_position(id, x.saturating_add(dx), y.saturating_add(dy))
    }

    /// Recomposite a shown sprite after its content changed
    pub fn refresh_sprite(&mut self, id: SpriteId) -> Result<()> {
        let index = self.position(id)?;
        if self.editing || !self.sprites[index].is_shown() {
            return Ok(());
        }
        let lifted = self.lift_above(index);
        self.sprites[index].redraw_on(&mut self.surface);
        self.restore(lifted);
        Ok(())
    }

    /// Hide every shown sprite above `index`, top-down. Returns their
    /// indices in the order they were hidden.
    fn lift_above(&mut self, index: usize) -> Vec<usize> {
        let mut lifted = Vec::new();
        for sprite in self.sprites[index + 1..].iter_mut().rev() {
            if sprite.is_shown() {
                sprite.hide_from(&mut self.surface);
                lifted.push(sprite.index());
            }
        }
        lifted
    }

    /// Show lifted sprites again, bottom-up
    fn restore(&mut self, lifted: Vec<usize>) {
        for index in lifted.into_iter().rev() {
            self.sprites[index].show_on(&mut self.surface);
        }
    }
}
