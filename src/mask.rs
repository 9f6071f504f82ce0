//! Bit-packed stencil
//!
//! One bit per pixel, row-major, most significant bit first inside each byte.
//! Used to pick foreground/background sources per pixel when painting.

use std::io::{Read, Write};

use tracing::debug;

use crate::error::{CanvasError, Result};
use crate::text::GlyphRasterizer;

/// Width x height boolean grid stored in `ceil(width * height / 8)` bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<u8>,
}

impl Mask {
    /// Create a stencil with every bit clear
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width < 1 || height < 1 {
            return Err(CanvasError::InvalidSize { width, height });
        }
        Ok(Self {
            width,
            height,
            bits: vec![0; byte_len(width, height)],
        })
    }

    /// Rasterize `character` and scale it to fill a `width` x `height` box,
    /// keeping its aspect ratio
    pub fn from_character(
        width: u32,
        height: u32,
        character: char,
        font: &dyn GlyphRasterizer,
    ) -> Result<Self> {
        let mut mask = Self::new(width, height)?;
        let mut text = [0u8; 4];
        let Some(glyph) = font.rasterize(character.encode_utf8(&mut text))? else {
            return Ok(mask);
        };
        let Some((gx, gy, gw, gh)) = glyph.bounds() else {
            return Ok(mask);
        };

        let factor = (width as f64 / gw as f64).min(height as f64 / gh as f64);
        for y in 0..height {
            for x in 0..width {
                let sx = (x as f64 / factor) as u32;
                let sy = (y as f64 / factor) as u32;
                if sx < gw && sy < gh && glyph.get((gx + sx) as i32, (gy + sy) as i32) {
                    mask.set(x as i32, y as i32, true);
                }
            }
        }
        Ok(mask)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed bits, MSB-first
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Byte index and bit mask for (x, y)
    #[inline]
    fn locate(&self, x: i32, y: i32) -> (usize, u8) {
        let pix = x as usize + y as usize * self.width as usize;
        (pix >> 3, 1 << (7 - (pix & 7)))
    }

    /// Read a bit, `false` outside the grid
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let (index, bit) = self.locate(x, y);
        self.bits[index] & bit != 0
    }

    /// Write a bit, ignored outside the grid
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, value: bool) {
        if !self.in_bounds(x, y) {
            return;
        }
        let (index, bit) = self.locate(x, y);
        if value {
            self.bits[index] |= bit;
        } else {
            self.bits[index] &= !bit;
        }
    }

    /// Clear every bit
    pub fn clear(&mut self) {
        self.bits.fill(0);
    }

    /// Number of set bits
    pub fn count(&self) -> usize {
        (0..self.height as i32)
            .flat_map(|y| (0..self.width as i32).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get(x, y))
            .count()
    }

    /// Bounding box (x, y, w, h) of the set bits, `None` when empty
    pub fn bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let mut min = (u32::MAX, u32::MAX);
        let mut max = (0u32, 0u32);
        let mut any = false;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x as i32, y as i32) {
                    any = true;
                    min = (min.0.min(x), min.1.min(y));
                    max = (max.0.max(x), max.1.max(y));
                }
            }
        }
        any.then(|| (min.0, min.1, max.0 - min.0 + 1, max.1 - min.1 + 1))
    }

    /// Set bits that touch a clear 4-neighbour or the grid edge
    pub fn outline(&self) -> Self {
        let mut edge = Self {
            width: self.width,
            height: self.height,
            bits: vec![0; self.bits.len()],
        };
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if !self.get(x, y) {
                    continue;
                }
                let interior = self.in_bounds(x - 1, y)
                    && self.in_bounds(x + 1, y)
                    && self.in_bounds(x, y - 1)
                    && self.in_bounds(x, y + 1)
                    && self.get(x - 1, y)
                    && self.get(x + 1, y)
                    && self.get(x, y - 1)
                    && self.get(x, y + 1);
                if !interior {
                    edge.set(x, y, true);
                }
            }
        }
        edge
    }

    /// Set the seed and every clear bit 4-connected to it.
    ///
    /// Stops at set bits and grid edges. A set or out-of-grid seed does nothing.
    pub fn flood_fill(&mut self, x: i32, y: i32) {
        if !self.in_bounds(x, y) || self.get(x, y) {
            return;
        }

        let w = self.width as i32;
        let h = self.height as i32;
        let mut stack = vec![(x, y)];

        while let Some((px, py)) = stack.pop() {
            if self.get(px, py) {
                continue;
            }
            self.set(px, py, true);

            if px > 0 && !self.get(px - 1, py) {
                stack.push((px - 1, py));
            }
            if py > 0 && !self.get(px, py - 1) {
                stack.push((px, py - 1));
            }
            if px < w - 1 && !self.get(px + 1, py) {
                stack.push((px + 1, py));
            }
            if py < h - 1 && !self.get(px, py + 1) {
                stack.push((px, py + 1));
            }
        }
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Write `int32 width, int32 height, int32 length, bytes`, big-endian
    pub fn save(&self, out: &mut impl Write) -> Result<()> {
        out.write_all(&(self.width as i32).to_be_bytes())?;
        out.write_all(&(self.height as i32).to_be_bytes())?;
        out.write_all(&(self.bits.len() as i32).to_be_bytes())?;
        out.write_all(&self.bits)?;
        debug!(width = self.width, height = self.height, "saved stencil");
        Ok(())
    }

    /// Read a stencil written by [`Mask::save`]
    pub fn load(input: &mut impl Read) -> Result<Self> {
        let width = read_i32(input)?;
        let height = read_i32(input)?;
        let length = read_i32(input)?;

        if width < 1 || height < 1 {
            return Err(CanvasError::MalformedStencil(format!(
                "size {width}x{height}"
            )));
        }
        let expected = byte_len(width as u32, height as u32);
        if length < 0 || length as usize != expected {
            return Err(CanvasError::MalformedStencil(format!(
                "{length} bytes for {width}x{height}, expected {expected}"
            )));
        }

        let mut bits = vec![0; expected];
        input.read_exact(&mut bits)?;
        debug!(width, height, "loaded stencil");
        Ok(Self {
            width: width as u32,
            height: height as u32,
            bits,
        })
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    (width as usize * height as usize + 7) >> 3
}

fn read_i32(input: &mut impl Read) -> Result<i32> {
    let mut raw = [0u8; 4];
    input.read_exact(&mut raw)?;
    Ok(i32::from_be_bytes(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::BitmapFont;

    fn ring(size: u32) -> Mask {
        let mut mask = Mask::new(size, size).unwrap();
        let last = size as i32 - 1;
        for i in 0..size as i32 {
            mask.set(i, 0, true);
            mask.set(i, last, true);
            mask.set(0, i, true);
            mask.set(last, i, true);
        }
        mask
    }

    #[test]
    fn test_new_is_clear() {
        let mask = Mask::new(9, 3).unwrap();
        assert_eq!(mask.as_bytes().len(), 4);
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn test_invalid_size() {
        assert!(Mask::new(0, 1).is_err());
        assert!(Mask::new(1, 0).is_err());
    }

    #[test]
    fn test_msb_first_layout() {
        let mut mask = Mask::new(4, 4).unwrap();
        mask.set(0, 0, true);
        mask.set(1, 2, true);
        assert_eq!(mask.as_bytes(), &[0b1000_0000, 0b0100_0000]);
        mask.set(0, 0, false);
        assert!(!mask.get(0, 0));
        assert!(mask.get(1, 2));
    }

    #[test]
    fn test_out_of_grid_access() {
        let mut mask = Mask::new(2, 2).unwrap();
        mask.set(5, 5, true);
        assert!(!mask.get(5, 5));
        assert!(!mask.get(-1, 0));
        assert_eq!(mask.count(), 0);
    }

    #[test]
    fn test_flood_fill_all_clear() {
        let mut mask = Mask::new(13, 7).unwrap();
        mask.flood_fill(6, 3);
        assert_eq!(mask.count(), 13 * 7);
    }

    #[test]
    fn test_flood_fill_inside_ring() {
        let mut mask = ring(8);
        mask.set(3, 3, true);
        mask.flood_fill(1, 1);
        for y in 0..8 {
            for x in 0..8 {
                assert!(mask.get(x, y), "({x}, {y}) should be set");
            }
        }
    }

    #[test]
    fn test_flood_fill_leaks_through_gap() {
        let mut mask = Mask::new(10, 10).unwrap();
        for i in 2..=7 {
            mask.set(i, 2, true);
            mask.set(i, 7, true);
            mask.set(2, i, true);
            mask.set(7, i, true);
        }
        mask.set(2, 4, false);
        mask.flood_fill(0, 0);
        assert!(mask.get(5, 5));
        assert_eq!(mask.count(), 100);
    }

    #[test]
    fn test_flood_fill_stays_inside_closed_ring() {
        let mut mask = Mask::new(10, 10).unwrap();
        for i in 2..=7 {
            mask.set(i, 2, true);
            mask.set(i, 7, true);
            mask.set(2, i, true);
            mask.set(7, i, true);
        }
        mask.flood_fill(4, 4);
        assert!(mask.get(3, 3));
        assert!(mask.get(6, 6));
        assert!(!mask.get(0, 0));
        assert!(!mask.get(9, 9));
        assert!(!mask.get(1, 4));
        assert_eq!(mask.count(), 36);
    }

    #[test]
    fn test_outline_of_solid_block() {
        let mut mask = Mask::new(5, 5).unwrap();
        for y in 1..4 {
            for x in 0..5 {
                mask.set(x, y, true);
            }
        }
        let edge = mask.outline();
        assert!(edge.get(0, 2));
        assert!(edge.get(2, 1));
        assert!(!edge.get(2, 2));
        assert!(!edge.get(1, 2));
        assert!(!edge.get(2, 0));
        // 5 + 5 across the top and bottom rows, 2 on the middle row
        assert_eq!(edge.count(), 12);
    }

    #[test]
    fn test_flood_fill_on_set_seed_is_noop() {
        let mut mask = ring(5);
        let before = mask.clone();
        mask.flood_fill(0, 0);
        assert_eq!(mask, before);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut mask = Mask::new(11, 5).unwrap();
        mask.set(0, 0, true);
        mask.set(10, 4, true);
        mask.set(3, 2, true);

        let mut bytes = Vec::new();
        mask.save(&mut bytes).unwrap();
        assert_eq!(&bytes[..12], &[0, 0, 0, 11, 0, 0, 0, 5, 0, 0, 0, 7]);

        let loaded = Mask::load(&mut bytes.as_slice()).unwrap();
        for y in 0..5 {
            for x in 0..11 {
                assert_eq!(loaded.get(x, y), mask.get(x, y));
            }
        }
    }

    #[test]
    fn test_load_rejects_bad_length() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&4i32.to_be_bytes());
        bytes.extend_from_slice(&4i32.to_be_bytes());
        bytes.extend_from_slice(&3i32.to_be_bytes());
        bytes.extend_from_slice(&[0, 0, 0]);
        assert!(matches!(
            Mask::load(&mut bytes.as_slice()),
            Err(CanvasError::MalformedStencil(_))
        ));
    }

    #[test]
    fn test_load_truncated_is_io_error() {
        let bytes = [0u8, 0, 0, 4];
        assert!(matches!(
            Mask::load(&mut bytes.as_slice()),
            Err(CanvasError::Io(_))
        ));
    }

    #[test]
    fn test_from_character_fills_box() {
        let font = BitmapFont::new();
        let mask = Mask::from_character(10, 14, 'I', &font).unwrap();
        assert!(mask.count() > 0);
        let (_, _, w, h) = mask.bounds().unwrap();
        assert!(w <= 10 && h <= 14);
        assert!(h >= 13);
    }

    #[test]
    fn test_from_character_blank_glyph() {
        let font = BitmapFont::new();
        let mask = Mask::from_character(6, 6, ' ', &font).unwrap();
        assert_eq!(mask.count(), 0);
    }
}
