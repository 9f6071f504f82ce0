use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::{arc_points, Polyline, Rect, Shape};
use serde::{Deserialize, Serialize};

/// Ellipse inscribed in a pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ellipse {
    pub frame: Rect,
}

impl Ellipse {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            frame: Rect::new(x, y, width, height),
        }
    }

    /// Circle centered on (cx, cy)
    pub fn circle(cx: i32, cy: i32, radius: u32) -> Self {
        let r = radius as i32;
        Self::new(cx - r, cy - r, radius * 2 + 1, radius * 2 + 1)
    }
}

impl Shape for Ellipse {
    fn bounds(&self) -> Option<Rect> {
        self.frame.bounds()
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        if self.frame.is_empty() {
            return false;
        }
        let w = self.frame.width as f32;
        let h = self.frame.height as f32;
        let nx = (x - (self.frame.x as f32 + w / 2.0)) / w;
        let ny = (y - (self.frame.y as f32 + h / 2.0)) / h;
        nx * nx + ny * ny <= 0.25
    }

    fn outline(&self) -> Vec<Polyline> {
        if self.frame.is_empty() {
            return Vec::new();
        }
        let rx = (self.frame.width - 1) as f32 / 2.0;
        let ry = (self.frame.height - 1) as f32 / 2.0;
        let cx = self.frame.x as f32 + rx;
        let cy = self.frame.y as f32 + ry;
        let mut points = arc_points(cx, cy, rx, ry, 0.0, TAU);
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        vec![Polyline::closed(points)]
    }
}

/// Rectangle whose corners are quarter ellipses of `arc_width` x `arc_height`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRect {
    pub frame: Rect,
    pub arc_width: u32,
    pub arc_height: u32,
}

impl RoundRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32, arc_width: u32, arc_height: u32) -> Self {
        Self {
            frame: Rect::new(x, y, width, height),
            arc_width,
            arc_height,
        }
    }

    /// Corner radii, each capped at half the side
    fn radii(&self) -> (f32, f32) {
        (
            self.arc_width.min(self.frame.width) as f32 / 2.0,
            self.arc_height.min(self.frame.height) as f32 / 2.0,
        )
    }
}

impl Shape for RoundRect {
    fn bounds(&self) -> Option<Rect> {
        self.frame.bounds()
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        if !self.frame.contains(x, y) {
            return false;
        }
        let (rx, ry) = self.radii();
        if rx <= 0.0 || ry <= 0.0 {
            return true;
        }
        let left = self.frame.x as f32;
        let top = self.frame.y as f32;
        let right = left + self.frame.width as f32;
        let bottom = top + self.frame.height as f32;

        let cx = x.clamp(left + rx, right - rx);
        let cy = y.clamp(top + ry, bottom - ry);
        let nx = (x - cx) / rx;
        let ny = (y - cy) / ry;
        nx * nx + ny * ny <= 1.0
    }

    fn outline(&self) -> Vec<Polyline> {
        if self.frame.is_empty() {
            return Vec::new();
        }
        let (rx, ry) = self.radii();
        if rx < 1.0 || ry < 1.0 {
            return self.frame.outline();
        }
        // Arc centers on the inclusive pixel grid
        let (rx, ry) = (rx - 0.5, ry - 0.5);
        let left = self.frame.x as f32 + rx;
        let top = self.frame.y as f32 + ry;
        let right = self.frame.right() as f32 - rx;
        let bottom = self.frame.bottom() as f32 - ry;

        let mut points = Vec::new();
        for (cx, cy, start) in [
            (right, bottom, 0.0),
            (left, bottom, FRAC_PI_2),
            (left, top, PI),
            (right, top, PI + FRAC_PI_2),
        ] {
            for p in arc_points(cx, cy, rx, ry, start, start + FRAC_PI_2) {
                if points.last() != Some(&p) {
                    points.push(p);
                }
            }
        }
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        vec![Polyline::closed(points)]
    }
}
