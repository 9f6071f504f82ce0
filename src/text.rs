//! Text rasterization into stencils
//!
//! The canvas never shapes text itself. It asks a [`GlyphRasterizer`] for a
//! [`Mask`] covering the whole string and paints the set bits. [`BitmapFont`]
//! is the built-in 5x7 implementation.

use crate::error::{CanvasError, Result};
use crate::mask::Mask;

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal distance between glyph origins: glyph width plus one pixel spacing
pub const GLYPH_ADVANCE: u32 = 6;

/// Produces a rectangular stencil for a run of text
pub trait GlyphRasterizer {
    /// Stencil whose set bits are the inked pixels, `Ok(None)` for empty text
    fn rasterize(&self, text: &str) -> Result<Option<Mask>>;
}

/// Fixed 5x7 bitmap font with integer upscaling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFont {
    scale: u32,
}

impl BitmapFont {
    pub fn new() -> Self {
        Self { scale: 1 }
    }

    /// Each glyph pixel becomes a `scale` x `scale` block (minimum 1)
    pub fn scaled(scale: u32) -> Self {
        Self {
            scale: scale.max(1),
        }
    }

    #[inline]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Width in pixels of `text` at this scale, `None` when it overflows
    pub fn text_width(&self, text: &str) -> Option<u32> {
        let count = u32::try_from(text.chars().count()).ok()?;
        if count == 0 {
            return Some(0);
        }
        count.checked_mul(GLYPH_ADVANCE)?.checked_sub(1)?.checked_mul(self.scale)
    }

    /// Height in pixels at this scale, `None` when it overflows
    pub fn text_height(&self) -> Option<u32> {
        GLYPH_HEIGHT.checked_mul(self.scale)
    }
}

impl Default for BitmapFont {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphRasterizer for BitmapFont {
    fn rasterize(&self, text: &str) -> Result<Option<Mask>> {
        // Stencil coordinates are `i32`, so both sides must fit one
        let fits = |v: Option<u32>| v.filter(|&v| i32::try_from(v).is_ok());
        let (Some(width), Some(height)) = (fits(self.text_width(text)), fits(self.text_height())) else {
            return Err(CanvasError::InvalidParameter(format!(
                "{} characters at scale {} exceed the stencil range",
                text.chars().count(),
                self.scale
            )));
        };
        if width == 0 {
            return Ok(None);
        }
        let mut mask = Mask::new(width, height)?;
        let scale = self.scale as i32;

        for (i, ch) in text.chars().enumerate() {
            let Some(rows) = get_glyph(ch) else {
                continue;
            };
            let origin = (i as u32 * GLYPH_ADVANCE) as i32 * scale;
            for (ry, bits) in rows.iter().enumerate() {
                for rx in 0..GLYPH_WIDTH as i32 {
                    if bits & (1 << (4 - rx)) == 0 {
                        continue;
                    }
                    let px = origin + rx * scale;
                    let py = ry as i32 * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            mask.set(px + dx, py + dy, true);
                        }
                    }
                }
            }
        }
        Ok(Some(mask))
    }
}

/// 5x7 rows for `ch`; bit 4 is the leftmost pixel. Lowercase maps to uppercase.
pub fn get_glyph(ch: char) -> Option<&'static [u8; 7]> {
    macro_rules! g {
        ($a:expr, $b:expr, $c:expr, $d:expr, $e:expr, $f:expr, $g:expr) => {
            Some(&[$a, $b, $c, $d, $e, $f, $g])
        };
    }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110),
        '1' => g!(0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110),
        '2' => g!(0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111),
        '3' => g!(0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110),
        '4' => g!(0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010),
        '5' => g!(0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110),
        '6' => g!(0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110),
        '7' => g!(0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000),
        '8' => g!(0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110),
        '9' => g!(0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100),

        'A' => g!(0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001),
        'B' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110),
        'C' => g!(0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110),
        'D' => g!(0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100),
        'E' => g!(0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111),
        'F' => g!(0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000),
        'G' => g!(0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111),
        'H' => g!(0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001),
        'I' => g!(0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110),
        'J' => g!(0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100),
        'K' => g!(0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001),
        'L' => g!(0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111),
        'M' => g!(0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001),
        'N' => g!(0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001),
        'O' => g!(0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110),
        'P' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000),
        'Q' => g!(0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101),
        'R' => g!(0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001),
        'S' => g!(0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110),
        'T' => g!(0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100),
        'U' => g!(0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110),
        'V' => g!(0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100),
        'W' => g!(0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010),
        'X' => g!(0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001),
        'Y' => g!(0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100),
        'Z' => g!(0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111),

        ' ' => g!(0, 0, 0, 0, 0, 0, 0),
        '|' => g!(0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100),
        ':' => g!(0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000),
        '.' => g!(0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00000),
        ',' => g!(0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00100, 0b01000),
        '-' => g!(0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000),
        '+' => g!(0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000),
        '=' => g!(0b00000, 0b00000, 0b11111, 0b00000, 0b11111, 0b00000, 0b00000),
        '!' => g!(0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100),
        '?' => g!(0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100),
        '/' => g!(0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        let font = BitmapFont::new();
        assert_eq!(font.text_width(""), Some(0));
        assert_eq!(font.text_width("A"), Some(5));
        assert_eq!(font.text_width("AB"), Some(11));
        assert_eq!(BitmapFont::scaled(3).text_width("AB"), Some(33));
        assert_eq!(BitmapFont::scaled(3).text_height(), Some(21));
    }

    #[test]
    fn test_empty_text_has_no_stencil() {
        assert!(BitmapFont::new().rasterize("").unwrap().is_none());
    }

    #[test]
    fn test_huge_scale_is_an_error() {
        let font = BitmapFont::scaled(u32::MAX);
        assert_eq!(font.text_width("AB"), None);
        assert_eq!(font.text_height(), None);
        assert!(matches!(
            font.rasterize("A"),
            Err(CanvasError::InvalidParameter(_))
        ));
        assert!(matches!(
            BitmapFont::scaled(1 << 29).rasterize("A"),
            Err(CanvasError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_rasterize_letter_l() {
        let mask = BitmapFont::new().rasterize("L").unwrap().unwrap();
        assert_eq!((mask.width(), mask.height()), (5, 7));
        for y in 0..7 {
            assert!(mask.get(0, y));
        }
        for x in 0..5 {
            assert!(mask.get(x, 6));
        }
        assert!(!mask.get(4, 0));
        assert_eq!(mask.count(), 11);
    }

    #[test]
    fn test_rasterize_scaled_and_spaced() {
        let mask = BitmapFont::scaled(2).rasterize("LL").unwrap().unwrap();
        assert_eq!((mask.width(), mask.height()), (22, 14));
        assert!(mask.get(1, 1));
        assert!(mask.get(12, 0));
        assert!(!mask.get(10, 0));
        assert_eq!(mask.count(), 11 * 4 * 2);
    }

    #[test]
    fn test_lowercase_maps_to_uppercase() {
        assert_eq!(get_glyph('q'), get_glyph('Q'));
        assert!(get_glyph('\u{263a}').is_none());
    }
}
