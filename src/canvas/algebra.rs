//! Whole-canvas pixel algebra and color filters
//!
//! Binary operators take a buffer of exactly the canvas size. Channel math
//! saturates to 0..=255 and keeps the canvas alpha. All of these need an
//! open edit transaction.

use crate::buffer::PixelBuffer;
use crate::color::{self, PALETTE, PALETTE_SIZE};
use crate::error::{CanvasError, Result};
use crate::mask::Mask;

use super::Canvas;

/// Parameters of [`Canvas::bump`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BumpSettings {
    /// Relief strength in `0.0..=1.0`
    pub contrast: f64,
    /// Amount both shading layers are darkened by
    pub dark: u8,
    /// Offset of the shadow layer, usually within -3..=3
    pub shift_x: i32,
    pub shift_y: i32,
}

impl Default for BumpSettings {
    fn default() -> Self {
        Self {
            contrast: 0.75,
            dark: 12,
            shift_x: 1,
            shift_y: 1,
        }
    }
}

impl BumpSettings {
    /// Default relief lit from the opposite corner
    pub fn reversed() -> Self {
        Self {
            shift_x: -1,
            shift_y: -1,
            ..Self::default()
        }
    }
}

// ============================================================================
// Pixel slice helpers
// ============================================================================

fn map(pixels: &mut [u32], op: impl Fn(u32) -> u32) {
    for px in pixels {
        *px = op(*px);
    }
}

fn zip_with(pixels: &mut [u32], other: &[u32], op: fn(u32, u32) -> u32) {
    for (dst, &src) in pixels.iter_mut().zip(other) {
        *dst = op(*dst, src);
    }
}

fn gray(pixels: &mut [u32]) {
    map(pixels, |c| color::gray_level(c, color::luma(c)));
}

fn luma_of(c: u32) -> f64 {
    color::to_yuv(c).0
}

fn stretch_luma(pixels: &mut [u32], pivot: f64, factor: f64) {
    map(pixels, |c| {
        let (y, u, v) = color::to_yuv(c);
        color::from_yuv(color::alpha(c), pivot + factor * (y - pivot), u, v)
    });
}

/// Stretch luma around the midpoint of its range
fn contrast(pixels: &mut [u32], factor: f64) {
    let (min, max) = pixels
        .iter()
        .map(|&c| luma_of(c))
        .fold((f64::MAX, f64::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)));
    stretch_luma(pixels, (min + max) / 2.0, factor);
}

fn mean_luma(pixels: &[u32]) -> f64 {
    pixels.iter().map(|&c| luma_of(c)).sum::<f64>() / pixels.len() as f64
}

/// Rotate left by `dx + dy * width` positions
fn rotate(pixels: &mut [u32], width: u32, dx: i64, dy: i64) {
    let len = pixels.len() as i64;
    let offset = (dx + dy * i64::from(width)).rem_euclid(len) as usize;
    pixels.rotate_left(offset);
}

impl Canvas {
    fn combine_with(&mut self, other: &PixelBuffer, op: fn(u32, u32) -> u32) -> Result<()> {
        self.ensure_editing()?;
        self.surface.ensure_same_size(other)?;
        zip_with(self.surface.pixels_mut(), other.pixels(), op);
        Ok(())
    }

    fn map_pixels(&mut self, op: impl Fn(u32) -> u32) -> Result<()> {
        self.ensure_editing()?;
        map(self.surface.pixels_mut(), op);
        Ok(())
    }

    // ========================================================================
    // Binary operators
    // ========================================================================

    pub fn add(&mut self, other: &PixelBuffer) -> Result<()> {
        self.combine_with(other, color::add)
    }

    pub fn subtract(&mut self, other: &PixelBuffer) -> Result<()> {
        self.combine_with(other, color::subtract)
    }

    /// `d * s / 255` per channel
    pub fn multiply(&mut self, other: &PixelBuffer) -> Result<()> {
        self.combine_with(other, color::multiply)
    }

    /// `d * 256 / (s + 1)` per channel, clamped
    pub fn divide(&mut self, other: &PixelBuffer) -> Result<()> {
        self.combine_with(other, color::divide)
    }

    pub fn minimum(&mut self, other: &PixelBuffer) -> Result<()> {
        self.combine_with(other, color::minimum)
    }

    pub fn maximum(&mut self, other: &PixelBuffer) -> Result<()> {
        self.combine_with(other, color::maximum)
    }

    pub fn average(&mut self, other: &PixelBuffer) -> Result<()> {
        self.combine_with(other, color::average)
    }

    /// Overwrite every pixel, alpha included, from a same-sized buffer
    pub fn copy_from(&mut self, other: &PixelBuffer) -> Result<()> {
        self.combine_with(other, |_, src| src)
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Raise R, G and B by `amount`, saturating
    pub fn brighter(&mut self, amount: u8) -> Result<()> {
        self.map_pixels(|c| color::offset(c, amount as i32))
    }

    pub fn darker(&mut self, amount: u8) -> Result<()> {
        self.map_pixels(|c| color::offset(c, -(amount as i32)))
    }

    /// Scale luma by `factor`, keeping chroma
    pub fn brightness(&mut self, factor: f64) -> Result<()> {
        self.map_pixels(|c| {
            let (y, u, v) = color::to_yuv(c);
            color::from_yuv(color::alpha(c), y * factor, u, v)
        })
    }

    /// Stretch luma around the midpoint of its range.
    ///
    /// A canvas with a single luma level is left as it is.
    pub fn contrast(&mut self, factor: f64) -> Result<()> {
        self.ensure_editing()?;
        contrast(self.surface.pixels_mut(), factor);
        Ok(())
    }

    /// Stretch luma around its mean
    pub fn contrast_average(&mut self, factor: f64) -> Result<()> {
        self.ensure_editing()?;
        let pivot = mean_luma(self.surface.pixels());
        stretch_luma(self.surface.pixels_mut(), pivot, factor);
        Ok(())
    }

    /// Replace every pixel by its luma
    pub fn gray(&mut self) -> Result<()> {
        self.ensure_editing()?;
        gray(self.surface.pixels_mut());
        Ok(())
    }

    /// Gray, then negate
    pub fn gray_invert(&mut self) -> Result<()> {
        self.map_pixels(|c| color::gray_level(c, 255 - color::luma(c)))
    }

    pub fn invert_colors(&mut self) -> Result<()> {
        self.map_pixels(color::invert)
    }

    /// Swap the two chroma components
    pub fn invert_uv(&mut self) -> Result<()> {
        self.map_pixels(|c| {
            let (y, u, v) = color::to_yuv(c);
            color::from_yuv(color::alpha(c), y, v, u)
        })
    }

    pub fn filter_red(&mut self) -> Result<()> {
        self.map_pixels(|c| color::gray_level(c, color::red(c)))
    }

    pub fn filter_green(&mut self) -> Result<()> {
        self.map_pixels(|c| color::gray_level(c, color::green(c)))
    }

    pub fn filter_blue(&mut self) -> Result<()> {
        self.map_pixels(|c| color::gray_level(c, color::blue(c)))
    }

    /// Show the Y component as gray
    pub fn filter_y(&mut self) -> Result<()> {
        self.map_pixels(|c| color::gray_level(c, color::limit_0_255(color::to_yuv(c).0 as i32)))
    }

    pub fn filter_u(&mut self) -> Result<()> {
        self.map_pixels(|c| color::gray_level(c, color::limit_0_255(color::to_yuv(c).1 as i32)))
    }

    pub fn filter_v(&mut self) -> Result<()> {
        self.map_pixels(|c| color::gray_level(c, color::limit_0_255(color::to_yuv(c).2 as i32)))
    }

    /// Replace pixels within `near` of `old` on every channel by `new`
    pub fn replace_color(&mut self, old: u32, new: u32, near: u8) -> Result<()> {
        self.map_pixels(|c| if color::is_near(c, old, near) { new } else { c })
    }

    /// Two-tone mask: `ok` where a pixel equals `target` exactly, `ko` elsewhere
    pub fn filter_on(&mut self, target: u32, ok: u32, ko: u32) -> Result<()> {
        self.map_pixels(|c| if c == target { ok } else { ko })
    }

    /// Two-tone mask on RGB distance: `ok` where every color channel is
    /// within `near` of `target`, `ko` elsewhere. Alpha is not compared.
    pub fn filter_on_near(&mut self, target: u32, near: u8, ok: u32, ko: u32) -> Result<()> {
        self.map_pixels(|c| if color::is_near_rgb(c, target, near) { ok } else { ko })
    }

    /// [`Canvas::filter_on_near`] against palette entry `index` (wrapping)
    /// with a tolerance of 16
    pub fn filter_palette(&mut self, index: usize, ok: u32, ko: u32) -> Result<()> {
        self.filter_on_near(PALETTE[index % PALETTE_SIZE], 0x10, ok, ko)
    }

    /// Three-level posterize on luma: pixels within `precision` of the mean
    /// luma become `middle`, darker ones `low`, lighter ones `high`
    pub fn categorize_by_y(&mut self, low: u32, middle: u32, high: u32, precision: f64) -> Result<()> {
        self.ensure_editing()?;
        let mean = mean_luma(self.surface.pixels());
        self.map_pixels(|c| {
            let y = luma_of(c);
            if (y - mean).abs() <= precision {
                middle
            } else if y < mean {
                low
            } else {
                high
            }
        })
    }

    /// Group pixels into color classes and paint each class with its own
    /// palette entry.
    ///
    /// Pixels are visited from the last one back to the first. A pixel joins
    /// the first class whose founding color is within `precision` on R, G and
    /// B; otherwise it founds a new class. Classes past the palette size
    /// wrap around. Returns the number of classes.
    pub fn apply_palette(&mut self, precision: u8) -> Result<usize> {
        self.ensure_editing()?;
        let mut founders: Vec<u32> = Vec::new();
        for px in self.surface.pixels_mut().iter_mut().rev() {
            let class = match founders.iter().position(|&f| color::is_near_rgb(f, *px, precision)) {
                Some(class) => class,
                None => {
                    founders.push(*px);
                    founders.len() - 1
                }
            };
            *px = PALETTE[class % PALETTE_SIZE];
        }
        Ok(founders.len())
    }

    /// Label connected regions of similar color.
    ///
    /// Starting from the last unlabeled pixel, a region grows through
    /// 4-neighbours within `precision` (R, G and B) of its seed color. Every
    /// region is then painted with a distinct opaque label, `0xFF000000`
    /// for the first one, counting up. Returns the number of regions.
    pub fn colorize_with_palette(&mut self, precision: u8) -> Result<usize> {
        self.ensure_editing()?;
        let (w, h) = self.surface.size();
        let mut seen = Mask::new(w, h)?;
        let mut labels = vec![0u32; self.surface.pixels().len()];
        let mut stack: Vec<(i32, i32)> = Vec::new();
        let mut regions = 0usize;
        let stride = w as usize;

        let pixels = self.surface.pixels();
        for start in (0..pixels.len()).rev() {
            let (sx, sy) = ((start % stride) as i32, (start / stride) as i32);
            if seen.get(sx, sy) {
                continue;
            }
            let seed = pixels[start];
            let label = 0xFF00_0000u32.wrapping_add(regions as u32);
            regions += 1;

            seen.set(sx, sy, true);
            stack.push((sx, sy));
            while let Some((x, y)) = stack.pop() {
                labels[y as usize * stride + x as usize] = label;
                for (nx, ny) in [(x - 1, y), (x, y - 1), (x + 1, y), (x, y + 1)] {
                    if !self.surface.in_bounds(nx, ny) || seen.get(nx, ny) {
                        continue;
                    }
                    if color::is_near_rgb(seed, pixels[ny as usize * stride + nx as usize], precision) {
                        seen.set(nx, ny, true);
                        stack.push((nx, ny));
                    }
                }
            }
        }

        self.surface.pixels_mut().copy_from_slice(&labels);
        Ok(regions)
    }

    /// Rotate the pixel array by `dx + dy * width` positions, wrapping rows
    /// into each other
    pub fn shift(&mut self, dx: i32, dy: i32) -> Result<()> {
        self.ensure_editing()?;
        let width = self.width();
        rotate(self.surface.pixels_mut(), width, i64::from(dx), i64::from(dy));
        Ok(())
    }

    // ========================================================================
    // Composite filters
    // ========================================================================

    /// Replace the canvas by the borders of its dark shapes.
    ///
    /// Each pixel becomes its gray level plus the smallest inverted gray
    /// level among the offsets `-width..=width` (both axes, `step` apart),
    /// so dark pixels touching light ones stay dark and the rest turns
    /// light. Offsets wrap the way [`Canvas::shift`] does.
    pub fn extract_border(&mut self, width: u32, step: u32) -> Result<()> {
        self.ensure_editing()?;
        if step < 1 {
            return Err(CanvasError::InvalidParameter(format!(
                "border step must be at least 1, got {step}"
            )));
        }
        let stride = self.width();
        let mut gray_pixels = self.surface.pixels().to_vec();
        gray(&mut gray_pixels);
        let mut inverted = gray_pixels.clone();
        map(&mut inverted, color::invert);

        let mut result = inverted.clone();
        rotate(&mut result, stride, 1, 1);
        zip_with(&mut result, &gray_pixels, color::add);

        let reach = i64::from(width);
        let mut shifted = vec![0u32; result.len()];
        for dy in (-reach..=reach).step_by(step as usize) {
            for dx in (-reach..=reach).step_by(step as usize) {
                shifted.copy_from_slice(&inverted);
                rotate(&mut shifted, stride, dx, dy);
                zip_with(&mut shifted, &gray_pixels, color::add);
                zip_with(&mut result, &shifted, color::minimum);
            }
        }

        self.surface.pixels_mut().copy_from_slice(&result);
        Ok(())
    }

    /// Emboss the canvas with the relief of `bump`, a same-sized height map.
    ///
    /// The gray, contrasted height map lights the canvas once directly and
    /// once inverted and shifted; the two darkened layers are added.
    pub fn bump(&mut self, bump: &PixelBuffer, settings: BumpSettings) -> Result<()> {
        self.ensure_editing()?;
        self.surface.ensure_same_size(bump)?;
        if !(0.0..=1.0).contains(&settings.contrast) {
            return Err(CanvasError::InvalidParameter(format!(
                "bump contrast must be in 0..=1, got {}",
                settings.contrast
            )));
        }
        let factor = if settings.contrast < 0.5 {
            settings.contrast * 2.0
        } else {
            settings.contrast * 18.0 - 8.0
        };
        let dark = -i32::from(settings.dark);
        let source = self.surface.pixels();

        let mut relief = bump.pixels().to_vec();
        gray(&mut relief);
        contrast(&mut relief, factor);

        let mut lit = relief.clone();
        zip_with(&mut lit, source, color::multiply);
        map(&mut lit, |c| color::offset(c, dark));

        map(&mut relief, color::invert);
        zip_with(&mut relief, source, color::multiply);
        map(&mut relief, |c| color::offset(c, dark));
        rotate(
            &mut relief,
            self.width(),
            i64::from(settings.shift_x),
            i64::from(settings.shift_y),
        );
        zip_with(&mut relief, &lit, color::add);

        self.surface.pixels_mut().copy_from_slice(&relief);
        Ok(())
    }
}
