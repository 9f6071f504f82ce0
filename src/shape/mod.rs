//! Shapes rasterized by bounding-box scan
//!
//! A shape only has to answer three questions: which pixels might it cover,
//! does it contain a given point, and what polylines trace its outline. The
//! canvas samples `contains` at pixel centers over the whole bounding box.

mod ellipse;
mod path;
mod polygon;

pub use ellipse::{Ellipse, RoundRect};
pub use path::Path;
pub use polygon::Polygon;

use serde::{Deserialize, Serialize};

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Nearest integer pixel
    pub fn rounded(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

/// Integer rectangle, also used as the bounding box of every shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Last covered column. A rectangle may run past `i32::MAX`, hence `i64`.
    #[inline]
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width) - 1
    }

    /// Last covered row
    #[inline]
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height) - 1
    }

    /// Intersection with `other`, `None` when they do not overlap
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        let width = u32::try_from(x2 - i64::from(x1) + 1).ok().filter(|&w| w > 0)?;
        let height = u32::try_from(y2 - i64::from(y1) + 1).ok().filter(|&h| h > 0)?;
        Some(Rect::new(x1, y1, width, height))
    }
}

/// Connected run of outline vertices in pixel coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polyline {
    pub points: Vec<(i32, i32)>,
    /// Last point joins back to the first
    pub closed: bool,
}

impl Polyline {
    pub fn closed(points: Vec<(i32, i32)>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    pub fn open(points: Vec<(i32, i32)>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    /// Consecutive segments, including the closing one
    pub fn segments(&self) -> Vec<((i32, i32), (i32, i32))> {
        let mut segments: Vec<_> = self.points.windows(2).map(|w| (w[0], w[1])).collect();
        if self.closed && self.points.len() > 2 {
            if let (Some(&last), Some(&first)) = (self.points.last(), self.points.first()) {
                if last != first {
                    segments.push((last, first));
                }
            }
        }
        segments
    }
}

/// Anything the canvas can fill or outline
pub trait Shape {
    /// Pixels that may be covered, `None` for a degenerate shape
    fn bounds(&self) -> Option<Rect>;

    /// Containment of a continuous point; pixels are tested at their centers
    fn contains(&self, x: f32, y: f32) -> bool;

    /// Polylines tracing the edge
    fn outline(&self) -> Vec<Polyline>;

    /// Whether pixel (x, y) is covered
    fn covers(&self, x: i32, y: i32) -> bool {
        self.contains(x as f32 + 0.5, y as f32 + 0.5)
    }
}

impl Shape for Rect {
    fn bounds(&self) -> Option<Rect> {
        (!self.is_empty()).then_some(*self)
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x as f32
            && y >= self.y as f32
            && x < (self.right() + 1) as f32
            && y < (self.bottom() + 1) as f32
    }

    fn outline(&self) -> Vec<Polyline> {
        if self.is_empty() {
            return Vec::new();
        }
        let (x1, y1) = (self.x, self.y);
        let (x2, y2) = (saturate(self.right()), saturate(self.bottom()));
        vec![Polyline::closed(vec![(x1, y1), (x2, y1), (x2, y2), (x1, y2)])]
    }
}

/// Narrow to `i32`, pinning values beyond either end
#[inline]
pub(crate) fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Sample points along an elliptical arc from `start` to `end` radians
pub(crate) fn arc_points(cx: f32, cy: f32, rx: f32, ry: f32, start: f32, end: f32) -> Vec<(i32, i32)> {
    let sweep = (end - start).abs();
    let steps = (((rx + ry) * sweep / 2.0).ceil() as usize).clamp(2, 512);
    let mut points: Vec<(i32, i32)> = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let t = start + (end - start) * i as f32 / steps as f32;
        let p = Point::new(cx + rx * t.cos(), cy + ry * t.sin()).rounded();
        if points.last() != Some(&p) {
            points.push(p);
        }
    }
    points
}
