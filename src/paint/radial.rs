//! Radial alpha falloff

use super::Paint;
use crate::color;

pub const MULTIPLIER_NORMAL: f64 = 1.0;
pub const MULTIPLIER_THICK: f64 = 1.5;
pub const MULTIPLIER_THIN: f64 = 0.75;
pub const MULTIPLIER_VERY_THICK: f64 = 2.0;
pub const MULTIPLIER_VERY_THIN: f64 = 0.5;

/// Constant RGB whose alpha fades linearly with distance from the fill center.
///
/// `alpha(d) = clamp(a0 - d * a0 / (m * max(w, h)), 0, a0)`
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaCircle {
    alpha: u8,
    rgb: u32,
    multiplier: f64,
    cx: f64,
    cy: f64,
    factor: f64,
}

impl AlphaCircle {
    pub fn new(color: u32, multiplier: f64) -> Self {
        Self {
            alpha: color::alpha(color),
            rgb: color & 0x00FF_FFFF,
            multiplier,
            cx: 0.0,
            cy: 0.0,
            factor: 0.0,
        }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl Paint for AlphaCircle {
    fn initialize(&mut self, width: u32, height: u32) {
        self.cx = width as f64 / 2.0;
        self.cy = height as f64 / 2.0;
        let ray = self.multiplier * width.max(height) as f64;
        self.factor = if ray > 0.0 { -(self.alpha as f64) / ray } else { 0.0 };
    }

    fn color_at(&self, x: u32, y: u32) -> u32 {
        let dx = self.cx - x as f64;
        let dy = self.cy - y as f64;
        let dist = (dx * dx + dy * dy).sqrt();
        let a0 = self.alpha as i32;
        let a = ((self.factor * dist + a0 as f64) as i32).clamp(0, a0);
        ((a as u32) << 24) | self.rgb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_keeps_full_alpha() {
        let mut paint = AlphaCircle::new(0xC0FF8000, MULTIPLIER_NORMAL);
        paint.initialize(10, 10);
        assert_eq!(paint.color_at(5, 5), 0xC0FF8000);
    }

    #[test]
    fn test_alpha_decreases_with_distance() {
        let mut paint = AlphaCircle::new(0xFF00FF00, MULTIPLIER_NORMAL);
        paint.initialize(20, 20);
        let near = color::alpha(paint.color_at(10, 12));
        let far = color::alpha(paint.color_at(10, 19));
        assert!(near > far);
        assert_eq!(paint.color_at(10, 19) & 0x00FF_FFFF, 0x0000FF00);
    }

    #[test]
    fn test_exact_falloff() {
        let mut paint = AlphaCircle::new(0xC8000000, MULTIPLIER_NORMAL);
        paint.initialize(40, 20);
        // center (20, 10), ray 40, d = 15
        let a = color::alpha(paint.color_at(5, 10));
        assert_eq!(a, 125);
    }

    #[test]
    fn test_thick_reaches_further() {
        let mut thin = AlphaCircle::new(0xFFFFFFFF, MULTIPLIER_VERY_THIN);
        let mut thick = AlphaCircle::new(0xFFFFFFFF, MULTIPLIER_VERY_THICK);
        thin.initialize(16, 16);
        thick.initialize(16, 16);
        assert_eq!(color::alpha(thin.color_at(0, 8)), 0);
        assert!(color::alpha(thick.color_at(0, 8)) > 0);
    }
}
