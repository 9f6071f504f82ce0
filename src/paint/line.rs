//! Light falling off on both sides of a line

use super::Paint;
use crate::color;
use crate::error::{CanvasError, Result};

/// Every channel, alpha included, drops by `round(d * k)` where `d` is the
/// perpendicular distance to the line through two points.
#[derive(Debug, Clone, PartialEq)]
pub struct LightLine {
    channels: [i32; 4],
    attenuation: f64,
    origin: (f64, f64),
    direction: (f64, f64),
}

impl LightLine {
    /// Fails when both points coincide. Attenuation is raised to at least 1.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32, color: u32, attenuation: u32) -> Result<Self> {
        if x1 == x2 && y1 == y2 {
            return Err(CanvasError::InvalidParameter(
                "light line needs two distinct points".into(),
            ));
        }
        let dx = (x2 - x1) as f64;
        let dy = (y2 - y1) as f64;
        let len = dx.hypot(dy);
        Ok(Self {
            channels: [
                color::alpha(color) as i32,
                color::red(color) as i32,
                color::green(color) as i32,
                color::blue(color) as i32,
            ],
            attenuation: attenuation.max(1) as f64,
            origin: (x1 as f64, y1 as f64),
            direction: (dx / len, dy / len),
        })
    }

    /// Perpendicular distance from (x, y) to the line
    pub fn distance(&self, x: f64, y: f64) -> f64 {
        let (ox, oy) = self.origin;
        let (ux, uy) = self.direction;
        ((x - ox) * uy - (y - oy) * ux).abs()
    }
}

impl Paint for LightLine {
    fn initialize(&mut self, _width: u32, _height: u32) {}

    fn color_at(&self, x: u32, y: u32) -> u32 {
        let minus = (self.distance(x as f64, y as f64) * self.attenuation).round() as i32;
        let [a, r, g, b] = self.channels.map(|c| (c - minus).max(0) as u8);
        color::argb(a, r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_points_rejected() {
        assert!(LightLine::new(3, 3, 3, 3, 0xFFFFFFFF, 4).is_err());
    }

    #[test]
    fn test_on_line_is_full_color() {
        let paint = LightLine::new(0, 0, 10, 10, 0xFF806040, 8).unwrap();
        assert_eq!(paint.color_at(4, 4), 0xFF806040);
    }

    #[test]
    fn test_vertical_line_falloff() {
        let paint = LightLine::new(5, 0, 5, 9, 0xFF806040, 10).unwrap();
        assert_eq!(paint.color_at(7, 3), color::argb(235, 108, 76, 44));
        assert_eq!(paint.color_at(0, 3), color::argb(205, 78, 46, 14));
        assert_eq!(paint.color_at(15, 0), color::argb(155, 28, 0, 0));
    }

    #[test]
    fn test_attenuation_floor() {
        let paint = LightLine::new(0, 0, 10, 0, 0xFF0A0A0A, 0).unwrap();
        assert_eq!(paint.color_at(0, 3), color::argb(252, 7, 7, 7));
    }

    #[test]
    fn test_diagonal_distance_rounded() {
        let paint = LightLine::new(0, 0, 1, 1, 0xFFFFFFFF, 1).unwrap();
        // distance of (1, 0) to y = x is sqrt(2) / 2, rounds to 1
        assert_eq!(color::alpha(paint.color_at(1, 0)), 254);
    }
}
