//! Procedural per-pixel color sources

mod line;
mod radial;

pub use line::LightLine;
pub use radial::{
    AlphaCircle, MULTIPLIER_NORMAL, MULTIPLIER_THICK, MULTIPLIER_THIN, MULTIPLIER_VERY_THICK,
    MULTIPLIER_VERY_THIN,
};

/// Color source evaluated once per covered pixel during a fill
pub trait Paint {
    /// Prepare for one fill whose covered region is `width` x `height`.
    /// Called exactly once before any `color_at` of that fill.
    fn initialize(&mut self, width: u32, height: u32);

    /// ARGB color at local coordinates, (0, 0) being the region's top-left
    fn color_at(&self, x: u32, y: u32) -> u32;
}
