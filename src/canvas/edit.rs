//! Edit transactions as a scope guard

use std::ops::{Deref, DerefMut};

use super::Canvas;

/// Open edit transaction on a canvas.
///
/// While the guard lives every sprite is lifted off the canvas and drawing
/// operations are allowed. Dropping it puts the sprites back (lowest index
/// first) and notifies listeners once. A guard taken while a transaction is
/// already open is inert: only the outermost one closes the transaction.
pub struct EditGuard<'a> {
    canvas: &'a mut Canvas,
    opened: bool,
}

impl<'a> EditGuard<'a> {
    pub(super) fn new(canvas: &'a mut Canvas) -> Self {
        let opened = canvas.start_edit();
        Self { canvas, opened }
    }

    /// Whether dropping this guard closes the transaction
    pub fn is_outermost(&self) -> bool {
        self.opened
    }

    /// Close the transaction now
    pub fn finish(self) {}
}

impl Deref for EditGuard<'_> {
    type Target = Canvas;

    fn deref(&self) -> &Canvas {
        self.canvas
    }
}

impl DerefMut for EditGuard<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        self.canvas
    }
}

impl Drop for EditGuard<'_> {
    fn drop(&mut self) {
        if self.opened {
            self.canvas.end_edit();
        }
    }
}
