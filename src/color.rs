//! Packed ARGB color math
//!
//! Colors are `u32` values laid out as `0xAARRGGBB`. Everything here is pure
//! per-pixel arithmetic; the canvas applies it across buffers.

// ============================================================================
// Channels
// ============================================================================

pub const BLACK: u32 = 0xFF00_0000;
pub const WHITE: u32 = 0xFFFF_FFFF;
pub const TRANSPARENT: u32 = 0x0000_0000;

/// Pack four channels into an ARGB value
#[inline]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Pack an opaque color
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    argb(255, r, g, b)
}

#[inline]
pub const fn alpha(color: u32) -> u8 {
    (color >> 24) as u8
}

#[inline]
pub const fn red(color: u32) -> u8 {
    (color >> 16) as u8
}

#[inline]
pub const fn green(color: u32) -> u8 {
    (color >> 8) as u8
}

#[inline]
pub const fn blue(color: u32) -> u8 {
    color as u8
}

/// Replace the alpha channel, keeping RGB
#[inline]
pub const fn with_alpha(color: u32, a: u8) -> u32 {
    (color & 0x00FF_FFFF) | ((a as u32) << 24)
}

/// Clamp an intermediate channel value into a byte
#[inline]
pub fn limit_0_255(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Apply `op` to R, G and B, keeping the alpha of `color`
#[inline]
fn map_rgb(color: u32, op: impl Fn(u8) -> u8) -> u32 {
    argb(alpha(color), op(red(color)), op(green(color)), op(blue(color)))
}

/// Combine R, G and B of two colors channel by channel, keeping `dst` alpha
#[inline]
fn zip_rgb(dst: u32, src: u32, op: impl Fn(i32, i32) -> i32) -> u32 {
    argb(
        alpha(dst),
        limit_0_255(op(red(dst) as i32, red(src) as i32)),
        limit_0_255(op(green(dst) as i32, green(src) as i32)),
        limit_0_255(op(blue(dst) as i32, blue(src) as i32)),
    )
}

// ============================================================================
// Compositing
// ============================================================================

/// How a drawn color lands on the destination pixel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// Destination takes the source color, alpha included
    Override,
    /// Source-over mix with saturating alpha accumulation
    #[default]
    Alpha,
}

impl BlendMode {
    #[inline]
    pub fn apply(self, dst: u32, src: u32) -> u32 {
        match self {
            Self::Override => src,
            Self::Alpha => mix_over(dst, src),
        }
    }

    /// True when drawing `color` in this mode cannot change any pixel
    #[inline]
    pub fn is_noop(self, color: u32) -> bool {
        self == Self::Alpha && alpha(color) == 0
    }
}

#[inline]
fn mix_channels(dst: u32, src: u32, a: u32) -> u32 {
    let i = 256 - a;
    let out_a = (a + alpha(dst) as u32).min(255);
    let mix = |s: u8, d: u8| (s as u32 * a + d as u32 * i) >> 8;
    (out_a << 24)
        | (mix(red(src), red(dst)) << 16)
        | (mix(green(src), green(dst)) << 8)
        | mix(blue(src), blue(dst))
}

/// Source-over mix using the source's own alpha.
///
/// Alpha 255 copies the source verbatim and alpha 0 leaves `dst` untouched.
#[inline]
pub fn mix_over(dst: u32, src: u32) -> u32 {
    match alpha(src) {
        255 => src,
        0 => dst,
        a => mix_channels(dst, src, a as u32),
    }
}

/// Mix `src` over `dst` with a constant alpha, ignoring the source alpha.
#[inline]
pub fn mix_with_alpha(dst: u32, src: u32, a: u8) -> u32 {
    match a {
        255 => src,
        0 => dst,
        a => mix_channels(dst, src, a as u32),
    }
}

// ============================================================================
// Pixel algebra (destination alpha preserved)
// ============================================================================

#[inline]
pub fn add(dst: u32, src: u32) -> u32 {
    zip_rgb(dst, src, |d, s| d + s)
}

#[inline]
pub fn subtract(dst: u32, src: u32) -> u32 {
    zip_rgb(dst, src, |d, s| d - s)
}

#[inline]
pub fn multiply(dst: u32, src: u32) -> u32 {
    zip_rgb(dst, src, |d, s| d * s / 255)
}

/// `d * 256 / (s + 1)`, clamped to 255
#[inline]
pub fn divide(dst: u32, src: u32) -> u32 {
    zip_rgb(dst, src, |d, s| (d << 8) / (s + 1))
}

#[inline]
pub fn minimum(dst: u32, src: u32) -> u32 {
    zip_rgb(dst, src, i32::min)
}

#[inline]
pub fn maximum(dst: u32, src: u32) -> u32 {
    zip_rgb(dst, src, i32::max)
}

#[inline]
pub fn average(dst: u32, src: u32) -> u32 {
    zip_rgb(dst, src, |d, s| (d + s) >> 1)
}

/// Shift R, G and B by `amount`, saturating
#[inline]
pub fn offset(color: u32, amount: i32) -> u32 {
    map_rgb(color, |c| limit_0_255(c as i32 + amount))
}

#[inline]
pub fn invert(color: u32) -> u32 {
    map_rgb(color, |c| 255 - c)
}

/// Gray with the same alpha and all three channels set to `level`
#[inline]
pub const fn gray_level(color: u32, level: u8) -> u32 {
    argb(alpha(color), level, level, level)
}

/// Bitwise combinations of a destination pixel with an overlaid one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelCombination {
    /// RGB and-ed, destination alpha kept
    And,
    /// All four channels and-ed
    AndAlpha,
    Or,
    OrAlpha,
    Xor,
    XorAlpha,
}

impl PixelCombination {
    #[inline]
    pub fn combine(self, dst: u32, over: u32) -> u32 {
        const RGB: u32 = 0x00FF_FFFF;
        let keep = dst & !RGB;
        match self {
            Self::And => keep | (dst & over & RGB),
            Self::AndAlpha => dst & over,
            Self::Or => keep | ((dst | over) & RGB),
            Self::OrAlpha => dst | over,
            Self::Xor => keep | ((dst ^ over) & RGB),
            Self::XorAlpha => dst ^ over,
        }
    }
}

// ============================================================================
// Luma / chroma
// ============================================================================

#[inline]
pub fn compute_y(r: u8, g: u8, b: u8) -> f64 {
    r as f64 * 0.299 + g as f64 * 0.587 + b as f64 * 0.114
}

#[inline]
pub fn compute_u(r: u8, g: u8, b: u8) -> f64 {
    -0.169 * r as f64 - 0.331 * g as f64 + 0.500 * b as f64 + 128.0
}

#[inline]
pub fn compute_v(r: u8, g: u8, b: u8) -> f64 {
    0.500 * r as f64 - 0.419 * g as f64 - 0.081 * b as f64 + 128.0
}

#[inline]
pub fn compute_red(y: f64, u: f64, v: f64) -> u8 {
    limit_0_255((y - 0.0009267 * (u - 128.0) + 1.4016868 * (v - 128.0)) as i32)
}

#[inline]
pub fn compute_green(y: f64, u: f64, v: f64) -> u8 {
    limit_0_255((y - 0.3436954 * (u - 128.0) - 0.7141690 * (v - 128.0)) as i32)
}

#[inline]
pub fn compute_blue(y: f64, u: f64, v: f64) -> u8 {
    limit_0_255((y + 1.7721604 * (u - 128.0) + 0.0009902 * (v - 128.0)) as i32)
}

/// Split a color into (Y, U, V)
#[inline]
pub fn to_yuv(color: u32) -> (f64, f64, f64) {
    let (r, g, b) = (red(color), green(color), blue(color));
    (compute_y(r, g, b), compute_u(r, g, b), compute_v(r, g, b))
}

/// Rebuild a color from (Y, U, V) with the given alpha
#[inline]
pub fn from_yuv(a: u8, y: f64, u: f64, v: f64) -> u32 {
    argb(a, compute_red(y, u, v), compute_green(y, u, v), compute_blue(y, u, v))
}

/// Integer luma of a color, clamped
#[inline]
pub fn luma(color: u32) -> u8 {
    limit_0_255(compute_y(red(color), green(color), blue(color)) as i32)
}

/// True when every channel of `a` is within `near` of the same channel of `b`
#[inline]
pub fn is_near(a: u32, b: u32, near: u8) -> bool {
    let near = near as i32;
    let close = |x: u8, y: u8| (x as i32 - y as i32).abs() <= near;
    close(alpha(a), alpha(b)) && close(red(a), red(b)) && close(green(a), green(b)) && close(blue(a), blue(b))
}

/// Like [`is_near`] but ignoring alpha
#[inline]
pub fn is_near_rgb(a: u32, b: u32, near: u8) -> bool {
    is_near(a | 0xFF00_0000, b | 0xFF00_0000, near)
}

// ============================================================================
// Palette
// ============================================================================

pub const PALETTE_SIZE: usize = 125;

/// Opaque colors over five levels per channel, red varying slowest, from
/// white down to black
pub const PALETTE: [u32; PALETTE_SIZE] = build_palette();

const fn build_palette() -> [u32; PALETTE_SIZE] {
    const LEVELS: [u8; 5] = [0xFF, 0xC0, 0x80, 0x40, 0x00];
    let mut palette = [0; PALETTE_SIZE];
    let mut i = 0;
    while i < PALETTE_SIZE {
        palette[i] = argb(0xFF, LEVELS[i / 25], LEVELS[(i / 5) % 5], LEVELS[i % 5]);
        i += 1;
    }
    palette
}
