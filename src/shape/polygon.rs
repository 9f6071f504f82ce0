use super::{Point, Polyline, Rect, Shape};
use serde::{Deserialize, Serialize};

/// A simple polygon defined by vertices, implicitly closed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Point>,
}

impl Polygon {
    /// Polygon through fractional vertices
    pub fn from_vertices(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Build from parallel integer coordinate lists; extra entries in the
    /// longer list are ignored
    pub fn from_coords(xs: &[i32], ys: &[i32]) -> Self {
        Self {
            vertices: xs
                .iter()
                .zip(ys)
                .map(|(&x, &y)| Point::new(x as f32, y as f32))
                .collect(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.vertices.len() >= 3
    }
}

/// Ray-casting (even-odd) containment
pub(crate) fn point_in_polygon(x: f32, y: f32, vertices: &[Point]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = &vertices[i];
        let vj = &vertices[j];

        if ((vi.y > y) != (vj.y > y)) && (x < (vj.x - vi.x) * (y - vi.y) / (vj.y - vi.y) + vi.x) {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Pixel box covering every pixel center inside the given points
pub(crate) fn pixel_bounds<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Rect> {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    let mut any = false;

    for v in points {
        any = true;
        min_x = min_x.min(v.x);
        min_y = min_y.min(v.y);
        max_x = max_x.max(v.x);
        max_y = max_y.max(v.y);
    }
    if !any {
        return None;
    }

    let x = min_x.floor() as i32;
    let y = min_y.floor() as i32;
    let width = (max_x.ceil() as i32 - x).max(0) as u32;
    let height = (max_y.ceil() as i32 - y).max(0) as u32;
    let rect = Rect::new(x, y, width, height);
    (!rect.is_empty()).then_some(rect)
}

impl Shape for Polygon {
    fn bounds(&self) -> Option<Rect> {
        if !self.is_closed() {
            return None;
        }
        pixel_bounds(&self.vertices)
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        point_in_polygon(x, y, &self.vertices)
    }

    fn outline(&self) -> Vec<Polyline> {
        if self.vertices.len() < 2 {
            return Vec::new();
        }
        let points = self.vertices.iter().map(Point::rounded).collect();
        vec![Polyline::closed(points)]
    }
}
