use super::polygon::{pixel_bounds, point_in_polygon};
use super::{Point, Polyline, Rect, Shape};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Subpath {
    points: Vec<Point>,
    closed: bool,
}

/// Free-form outline made of straight segments, built with
/// `move_to` / `line_to` / `close`.
///
/// Filling treats every subpath as closed and combines them even-odd, so an
/// inner subpath cuts a hole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    subpaths: Vec<Subpath>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new subpath at (x, y)
    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.subpaths.push(Subpath {
            points: vec![Point::new(x, y)],
            closed: false,
        });
        self
    }

    /// Extend the current subpath; starts one at (x, y) if there is none
    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        match self.subpaths.last_mut() {
            Some(sub) if !sub.closed => sub.points.push(Point::new(x, y)),
            _ => return self.move_to(x, y),
        }
        self
    }

    /// Join the current subpath back to its start
    pub fn close(mut self) -> Self {
        if let Some(sub) = self.subpaths.last_mut() {
            sub.closed = true;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }
}

impl Shape for Path {
    fn bounds(&self) -> Option<Rect> {
        pixel_bounds(
            self.subpaths
                .iter()
                .filter(|s| s.points.len() >= 3)
                .flat_map(|s| s.points.iter()),
        )
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        self.subpaths
            .iter()
            .filter(|s| point_in_polygon(x, y, &s.points))
            .count()
            % 2
            == 1
    }

    fn outline(&self) -> Vec<Polyline> {
        self.subpaths
            .iter()
            .filter(|s| s.points.len() >= 2)
            .map(|s| Polyline {
                points: s.points.iter().map(Point::rounded).collect(),
                closed: s.closed,
            })
            .collect()
    }
}
