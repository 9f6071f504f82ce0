//! Plain ARGB pixel storage
//!
//! `PixelBuffer` is the owned pixel grid behind a canvas, a sprite's content
//! and its back snapshot, textures and codec round-trips. It has no
//! transaction state; the canvas layers that on top.

use crate::color::{self, PixelCombination};
use crate::error::{CanvasError, Result};

/// Clipped copy window: destination origin, source origin and extent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    dx: usize,
    dy: usize,
    sx: usize,
    sy: usize,
    w: usize,
    h: usize,
}

/// Row-major ARGB pixel grid, `pixels.len() == width * height` always
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Create a transparent buffer
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, color::TRANSPARENT)
    }

    /// Create a buffer with every pixel set to `color`
    pub fn filled(width: u32, height: u32, color: u32) -> Result<Self> {
        check_size(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        })
    }

    /// Wrap an existing row-major pixel vector
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self> {
        check_size(width, height)?;
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(CanvasError::PixelCount {
                expected,
                found: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Read one pixel, `None` outside the buffer
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        self.in_bounds(x, y).then(|| self.pixels[self.index(x, y)])
    }

    /// Write one pixel, ignored outside the buffer
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: u32) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.pixels[idx] = color;
        }
    }

    /// Set every pixel to `color`
    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Fail unless `other` has the same size
    pub fn ensure_same_size(&self, other: &Self) -> Result<()> {
        if self.size() == other.size() {
            Ok(())
        } else {
            Err(CanvasError::DimensionMismatch {
                expected: self.size(),
                found: other.size(),
            })
        }
    }

    // ========================================================================
    // Region compositing
    // ========================================================================

    /// Clip a `w`x`h` block read from `src` at (`sx`, `sy`) and written here at (`x`, `y`).
    /// Origins may sit anywhere in `i32`, so the window is worked out in `i64`.
    #[allow(clippy::too_many_arguments)]
    fn clip(&self, x: i32, y: i32, src: &Self, sx: i32, sy: i32, w: i32, h: i32) -> Option<Window> {
        let (mut x, mut y) = (i64::from(x), i64::from(y));
        let (mut sx, mut sy) = (i64::from(sx), i64::from(sy));
        let (mut w, mut h) = (i64::from(w), i64::from(h));

        if x < 0 {
            sx -= x;
            w += x;
            x = 0;
        }
        if sx < 0 {
            x -= sx;
            w += sx;
            sx = 0;
        }
        if y < 0 {
            sy -= y;
            h += y;
            y = 0;
        }
        if sy < 0 {
            y -= sy;
            h += sy;
            sy = 0;
        }

        let w = w
            .min(i64::from(self.width) - x)
            .min(i64::from(src.width) - sx);
        let h = h
            .min(i64::from(self.height) - y)
            .min(i64::from(src.height) - sy);

        if w <= 0 || h <= 0 {
            return None;
        }

        // Every value is now inside one of the two buffers
        Some(Window {
            dx: x as usize,
            dy: y as usize,
            sx: sx as usize,
            sy: sy as usize,
            w: w as usize,
            h: h as usize,
        })
    }

    /// Run `op(dst, src)` over a clipped block, row by row
    #[allow(clippy::too_many_arguments)]
    fn compose_region(
        &mut self,
        x: i32,
        y: i32,
        src: &Self,
        sx: i32,
        sy: i32,
        w: i32,
        h: i32,
        op: impl Fn(u32, u32) -> u32,
    ) {
        let Some(win) = self.clip(x, y, src, sx, sy, w, h) else {
            return;
        };
        let dst_w = self.width as usize;
        let src_w = src.width as usize;

        for row in 0..win.h {
            let d = (win.dy + row) * dst_w + win.dx;
            let s = (win.sy + row) * src_w + win.sx;
            let dst_row = &mut self.pixels[d..d + win.w];
            let src_row = &src.pixels[s..s + win.w];
            for (dp, &sp) in dst_row.iter_mut().zip(src_row) {
                *dp = op(*dp, sp);
            }
        }
    }

    /// Plain copy of a block of `src`, alpha included
    #[allow(clippy::too_many_arguments)]
    pub fn copy_region(&mut self, x: i32, y: i32, src: &Self, sx: i32, sy: i32, w: i32, h: i32) {
        let Some(win) = self.clip(x, y, src, sx, sy, w, h) else {
            return;
        };
        let dst_w = self.width as usize;
        let src_w = src.width as usize;

        for row in 0..win.h {
            let d = (win.dy + row) * dst_w + win.dx;
            let s = (win.sy + row) * src_w + win.sx;
            self.pixels[d..d + win.w].copy_from_slice(&src.pixels[s..s + win.w]);
        }
    }

    /// Alpha-mix a block of `src` using each source pixel's alpha
    #[allow(clippy::too_many_arguments)]
    pub fn blend_region(&mut self, x: i32, y: i32, src: &Self, sx: i32, sy: i32, w: i32, h: i32) {
        self.compose_region(x, y, src, sx, sy, w, h, color::mix_over);
    }

    /// Mix a block of `src` with one constant alpha
    #[allow(clippy::too_many_arguments)]
    pub fn blend_region_alpha(
        &mut self,
        x: i32,
        y: i32,
        src: &Self,
        sx: i32,
        sy: i32,
        w: i32,
        h: i32,
        alpha: u8,
    ) {
        match alpha {
            0 => {}
            255 => self.copy_region(x, y, src, sx, sy, w, h),
            a => self.compose_region(x, y, src, sx, sy, w, h, |d, s| color::mix_with_alpha(d, s, a)),
        }
    }

    /// Bitwise-combine a block of `src` into this buffer
    #[allow(clippy::too_many_arguments)]
    pub fn combine_region(
        &mut self,
        x: i32,
        y: i32,
        src: &Self,
        sx: i32,
        sy: i32,
        w: i32,
        h: i32,
        combination: PixelCombination,
    ) {
        self.compose_region(x, y, src, sx, sy, w, h, |d, s| combination.combine(d, s));
    }

    /// Copy all of `src` with its top-left at (`x`, `y`)
    pub fn blit(&mut self, src: &Self, x: i32, y: i32) {
        self.copy_region(x, y, src, 0, 0, src.width as i32, src.height as i32);
    }

    /// Alpha-mix all of `src` with its top-left at (`x`, `y`)
    pub fn blit_blend(&mut self, src: &Self, x: i32, y: i32) {
        self.blend_region(x, y, src, 0, 0, src.width as i32, src.height as i32);
    }

    /// Capture the block of `src` whose top-left is (`x`, `y`) into this buffer's origin
    pub fn snapshot_from(&mut self, src: &Self, x: i32, y: i32) {
        self.copy_region(0, 0, src, x, y, self.width as i32, self.height as i32);
    }
}

fn check_size(width: u32, height: u32) -> Result<()> {
    if width < 1 || height < 1 {
        return Err(CanvasError::InvalidSize { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(width: u32, height: u32) -> PixelBuffer {
        let pixels = (0..width * height).map(|i| 0xFF00_0000 | i).collect();
        PixelBuffer::from_pixels(width, height, pixels).unwrap()
    }

    #[test]
    fn test_filled_reads_back() {
        let buf = PixelBuffer::filled(7, 3, 0x12345678).unwrap();
        for y in 0..3 {
            for x in 0..7 {
                assert_eq!(buf.get(x, y), Some(0x12345678));
            }
        }
        assert_eq!(buf.get(7, 0), None);
        assert_eq!(buf.get(0, -1), None);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            PixelBuffer::new(0, 4),
            Err(CanvasError::InvalidSize { width: 0, height: 4 })
        ));
        assert!(PixelBuffer::new(4, 0).is_err());
    }

    #[test]
    fn test_from_pixels_length_checked() {
        assert!(matches!(
            PixelBuffer::from_pixels(2, 2, vec![0; 3]),
            Err(CanvasError::PixelCount { expected: 4, found: 3 })
        ));
    }

    #[test]
    fn test_copy_region_clips_negative_origin() {
        let src = numbered(4, 4);
        let mut dst = PixelBuffer::new(4, 4).unwrap();
        dst.blit(&src, -2, -1);
        assert_eq!(dst.get(0, 0), src.get(2, 1));
        assert_eq!(dst.get(1, 2), src.get(3, 3));
        assert_eq!(dst.get(2, 0), Some(0));
        assert_eq!(dst.get(0, 3), Some(0));
    }

    #[test]
    fn test_copy_region_clips_right_edge() {
        let src = numbered(4, 4);
        let mut dst = PixelBuffer::new(5, 5).unwrap();
        dst.blit(&src, 3, 3);
        assert_eq!(dst.get(3, 3), src.get(0, 0));
        assert_eq!(dst.get(4, 4), src.get(1, 1));
    }

    #[test]
    fn test_snapshot_outside_leaves_untouched() {
        let src = numbered(4, 4);
        let mut snap = PixelBuffer::filled(2, 2, 0xDEADBEEF).unwrap();
        snap.snapshot_from(&src, 3, 3);
        assert_eq!(snap.get(0, 0), src.get(3, 3));
        assert_eq!(snap.get(1, 1), Some(0xDEADBEEF));
    }

    #[test]
    fn test_extreme_origins_clip_to_nothing() {
        let src = numbered(4, 4);
        let mut dst = PixelBuffer::filled(4, 4, 0xDEADBEEF).unwrap();
        dst.blit(&src, i32::MIN, 0);
        dst.blit(&src, i32::MAX, i32::MAX);
        dst.blit_blend(&src, 0, i32::MIN);
        assert!(dst.pixels().iter().all(|&p| p == 0xDEADBEEF));

        let mut snap = PixelBuffer::filled(2, 2, 7).unwrap();
        snap.snapshot_from(&src, i32::MIN, i32::MAX);
        snap.snapshot_from(&src, i32::MAX, i32::MIN);
        assert!(snap.pixels().iter().all(|&p| p == 7));
    }

    #[test]
    fn test_blend_region_alpha_zero_noop() {
        let src = PixelBuffer::filled(2, 2, 0xFFFFFFFF).unwrap();
        let mut dst = PixelBuffer::filled(2, 2, 0xFF000000).unwrap();
        dst.blend_region_alpha(0, 0, &src, 0, 0, 2, 2, 0);
        assert_eq!(dst.get(1, 1), Some(0xFF000000));
        dst.blend_region_alpha(0, 0, &src, 0, 0, 2, 2, 255);
        assert_eq!(dst.get(1, 1), Some(0xFFFFFFFF));
    }

    #[test]
    fn test_ensure_same_size() {
        let a = PixelBuffer::new(2, 3).unwrap();
        let b = PixelBuffer::new(3, 2).unwrap();
        assert!(a.ensure_same_size(&a.clone()).is_ok());
        assert!(matches!(
            a.ensure_same_size(&b),
            Err(CanvasError::DimensionMismatch { .. })
        ));
    }
}
