//! Area fills and stencil painting
//!
//! A fill scans the shape's bounding box clipped to the canvas and tests
//! each pixel center for containment. Cost is proportional to the clipped
//! box, not to the covered area.
//!
//! Local coordinates handed to textures and paints start at the top-left of
//! the clipped box, and a paint is initialized with the clipped size.

use crate::buffer::PixelBuffer;
use crate::color::BlendMode;
use crate::error::Result;
use crate::mask::Mask;
use crate::paint::Paint;
use crate::shape::{saturate, Ellipse, Polygon, Rect, RoundRect, Shape};
use crate::text::GlyphRasterizer;

use super::Canvas;

/// Where fill colors come from
pub enum Source<'a> {
    /// Leave covered pixels untouched
    None,
    Color(u32),
    /// Buffer repeated from the fill's top-left
    Texture(&'a PixelBuffer),
    /// Buffer scaled to the fill's size
    Stretched(&'a PixelBuffer),
    /// Buffer scaled to the fill's size with bilinear filtering
    Smoothed(&'a PixelBuffer),
    /// Buffer placed at canvas coordinates (`x`, `y`); pixels it does not
    /// reach are left untouched
    Image {
        buffer: &'a PixelBuffer,
        x: i32,
        y: i32,
    },
    /// Procedural color, initialized once per fill
    Paint(&'a mut dyn Paint),
}

impl std::fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Color(c) => write!(f, "Color({c:#010x})"),
            Self::Texture(b) => write!(f, "Texture({}x{})", b.width(), b.height()),
            Self::Stretched(b) => write!(f, "Stretched({}x{})", b.width(), b.height()),
            Self::Smoothed(b) => write!(f, "Smoothed({}x{})", b.width(), b.height()),
            Self::Image { buffer, x, y } => {
                write!(f, "Image({}x{} at {x},{y})", buffer.width(), buffer.height())
            }
            Self::Paint(_) => f.write_str("Paint"),
        }
    }
}

/// A source bound to one fill region
enum Sampler<'a> {
    Skip,
    Color(u32),
    Tiled(&'a PixelBuffer),
    Stretched {
        buffer: &'a PixelBuffer,
        width: u64,
        height: u64,
    },
    Smoothed {
        buffer: &'a PixelBuffer,
        width: u64,
        height: u64,
    },
    Image {
        buffer: &'a PixelBuffer,
        x: i32,
        y: i32,
    },
    Paint(&'a dyn Paint),
}

impl<'a> Source<'a> {
    fn prepare(self, width: u32, height: u32) -> Sampler<'a> {
        match self {
            Self::None => Sampler::Skip,
            Self::Color(c) => Sampler::Color(c),
            Self::Texture(buffer) => Sampler::Tiled(buffer),
            Self::Stretched(buffer) => Sampler::Stretched {
                buffer,
                width: width as u64,
                height: height as u64,
            },
            Self::Smoothed(buffer) => Sampler::Smoothed {
                buffer,
                width: width as u64,
                height: height as u64,
            },
            Self::Image { buffer, x, y } => Sampler::Image { buffer, x, y },
            Self::Paint(paint) => {
                paint.initialize(width, height);
                Sampler::Paint(paint)
            }
        }
    }
}

impl Sampler<'_> {
    /// Color for local (`lx`, `ly`) at canvas (`cx`, `cy`), `None` to skip
    #[inline]
    fn sample(&self, lx: u32, ly: u32, cx: i32, cy: i32) -> Option<u32> {
        match self {
            Self::Skip => None,
            Self::Color(c) => Some(*c),
            Self::Tiled(buffer) => {
                let (tw, th) = buffer.size();
                buffer.get((lx % tw) as i32, (ly % th) as i32)
            }
            Self::Stretched {
                buffer,
                width,
                height,
            } => {
                let (tw, th) = buffer.size();
                let tx = lx as u64 * tw as u64 / width;
                let ty = ly as u64 * th as u64 / height;
                buffer.get(tx as i32, ty as i32)
            }
            Self::Smoothed {
                buffer,
                width,
                height,
            } => {
                let (tw, th) = buffer.size();
                let (u0, u1, du) = filter_taps(lx, *width, tw);
                let (v0, v1, dv) = filter_taps(ly, *height, th);
                let top = lerp(buffer.get(u0, v0)?, buffer.get(u1, v0)?, du);
                let bottom = lerp(buffer.get(u0, v1)?, buffer.get(u1, v1)?, du);
                Some(lerp(top, bottom, dv))
            }
            Self::Image { buffer, x, y } => buffer.get(offset(cx, *x), offset(cy, *y)),
            Self::Paint(paint) => Some(paint.color_at(lx, ly)),
        }
    }
}

/// Source texels around the center of local pixel `l` out of `span`, with
/// the 8-bit weight of the second one
#[inline]
fn filter_taps(l: u32, span: u64, texels: u32) -> (i32, i32, u32) {
    // 16.16 fixed point, texel centers at +0.5
    let pos = ((2 * l as u64 + 1) * texels as u64 * 0x1_0000 / (2 * span)).saturating_sub(0x8000);
    let last = texels as u64 - 1;
    let t0 = (pos >> 16).min(last);
    let t1 = (t0 + 1).min(last);
    (t0 as i32, t1 as i32, ((pos >> 8) & 0xFF) as u32)
}

/// Per-channel blend of `a` toward `b` by `weight`/256
#[inline]
fn lerp(a: u32, b: u32, weight: u32) -> u32 {
    let inv = 256 - weight;
    [24, 16, 8, 0].iter().fold(0, |acc, &shift| {
        let ca = (a >> shift) & 0xFF;
        let cb = (b >> shift) & 0xFF;
        acc | (((ca * inv + cb * weight) >> 8) << shift)
    })
}

/// `v - origin` for an origin that may lie far off the canvas
#[inline]
fn offset(v: i32, origin: i32) -> i32 {
    saturate(i64::from(v) - i64::from(origin))
}

impl Canvas {
    pub(super) fn bounds_rect(&self) -> Rect {
        Rect::new(0, 0, self.width(), self.height())
    }

    /// Scan `area` clipped to the canvas, painting pixels `covers` accepts
    fn fill_covered(
        &mut self,
        area: Rect,
        source: Source<'_>,
        mode: BlendMode,
        covers: impl Fn(i32, i32) -> bool,
    ) -> Result<()> {
        self.ensure_editing()?;
        let Some(clip) = area.intersect(&self.bounds_rect()) else {
            return Ok(());
        };
        let sampler = source.prepare(clip.width, clip.height);
        if matches!(sampler, Sampler::Skip) {
            return Ok(());
        }

        let stride = self.width() as usize;
        let pixels = self.surface.pixels_mut();
        let (right, bottom) = (saturate(clip.right()), saturate(clip.bottom()));
        for cy in clip.y..=bottom {
            let row = cy as usize * stride;
            for cx in clip.x..=right {
                if !covers(cx, cy) {
                    continue;
                }
                let (lx, ly) = ((cx - clip.x) as u32, (cy - clip.y) as u32);
                if let Some(color) = sampler.sample(lx, ly, cx, cy) {
                    let px = &mut pixels[row + cx as usize];
                    *px = mode.apply(*px, color);
                }
            }
        }
        Ok(())
    }

    /// Fill every pixel of an axis-aligned block
    pub fn fill_rectangle(&mut self, rect: Rect, source: Source<'_>, mode: BlendMode) -> Result<()> {
        self.fill_covered(rect, source, mode, |_, _| true)
    }

    /// Fill every pixel whose center lies inside `shape`
    pub fn fill_shape(&mut self, shape: &dyn Shape, source: Source<'_>, mode: BlendMode) -> Result<()> {
        self.ensure_editing()?;
        let Some(bounds) = shape.bounds() else {
            return Ok(());
        };
        self.fill_covered(bounds, source, mode, |x, y| shape.covers(x, y))
    }

    pub fn fill_ellipse(&mut self, frame: Rect, source: Source<'_>, mode: BlendMode) -> Result<()> {
        let ellipse = Ellipse { frame };
        self.fill_shape(&ellipse, source, mode)
    }

    pub fn fill_round_rectangle(
        &mut self,
        frame: Rect,
        arc_width: u32,
        arc_height: u32,
        source: Source<'_>,
        mode: BlendMode,
    ) -> Result<()> {
        let shape = RoundRect {
            frame,
            arc_width,
            arc_height,
        };
        self.fill_shape(&shape, source, mode)
    }

    pub fn fill_polygon(&mut self, xs: &[i32], ys: &[i32], source: Source<'_>, mode: BlendMode) -> Result<()> {
        self.fill_shape(&Polygon::from_coords(xs, ys), source, mode)
    }

    // ========================================================================
    // Stencils and text
    // ========================================================================

    /// Paint `mask` with its top-left at (`x`, `y`): `fg` where a bit is set,
    /// `bg` where it is clear. Pass [`Source::None`] to leave either side alone.
    #[allow(clippy::too_many_arguments)]
    pub fn paint_mask(
        &mut self,
        mask: &Mask,
        x: i32,
        y: i32,
        fg: Source<'_>,
        bg: Source<'_>,
        mode: BlendMode,
    ) -> Result<()> {
        self.ensure_editing()?;
        let area = Rect::new(x, y, mask.width(), mask.height());
        let Some(clip) = area.intersect(&self.bounds_rect()) else {
            return Ok(());
        };
        let fg = fg.prepare(clip.width, clip.height);
        let bg = bg.prepare(clip.width, clip.height);

        let stride = self.width() as usize;
        let pixels = self.surface.pixels_mut();
        let (right, bottom) = (saturate(clip.right()), saturate(clip.bottom()));
        for cy in clip.y..=bottom {
            let row = cy as usize * stride;
            for cx in clip.x..=right {
                let sampler = if mask.get(offset(cx, x), offset(cy, y)) { &fg } else { &bg };
                let (lx, ly) = ((cx - clip.x) as u32, (cy - clip.y) as u32);
                if let Some(color) = sampler.sample(lx, ly, cx, cy) {
                    let px = &mut pixels[row + cx as usize];
                    *px = mode.apply(*px, color);
                }
            }
        }
        Ok(())
    }

    /// Paint the inked pixels of `text` with its top-left at (`x`, `y`)
    #[allow(clippy::too_many_arguments)]
    pub fn fill_string(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font: &dyn GlyphRasterizer,
        source: Source<'_>,
        mode: BlendMode,
    ) -> Result<()> {
        self.ensure_editing()?;
        let Some(mask) = font.rasterize(text)? else {
            return Ok(());
        };
        self.paint_mask(&mask, x, y, source, Source::None, mode)
    }

    /// Paint only the edge pixels of `text`'s glyphs
    #[allow(clippy::too_many_arguments)]
    pub fn draw_string(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font: &dyn GlyphRasterizer,
        source: Source<'_>,
        mode: BlendMode,
    ) -> Result<()> {
        self.ensure_editing()?;
        let Some(mask) = font.rasterize(text)? else {
            return Ok(());
        };
        self.paint_mask(&mask.outline(), x, y, source, Source::None, mode)
    }
}
