//! Obstacle variants traced uniformly by the beam
//!
//! Walls, rectangles and circles reflect. The goal is a circle that ends
//! the trace instead of reflecting.

use super::geometry::{
    Bounds, Circle, EPSILON, Ray, RayHit, Rect, ray_bounds, ray_circle, ray_rect,
};

/// What a beam struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Wall,
    Rect,
    Circle,
    Goal,
}

/// A single surface the tracer can hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Obstacle {
    Walls(Bounds),
    Rect(Rect),
    Circle(Circle),
    Goal(Circle),
}

impl Obstacle {
    pub fn kind(&self) -> ObstacleKind {
        match self {
            Obstacle::Walls(_) => ObstacleKind::Wall,
            Obstacle::Rect(_) => ObstacleKind::Rect,
            Obstacle::Circle(_) => ObstacleKind::Circle,
            Obstacle::Goal(_) => ObstacleKind::Goal,
        }
    }

    /// Whether hitting this obstacle bounces the beam
    pub fn is_reflective(&self) -> bool {
        !matches!(self, Obstacle::Goal(_))
    }

    /// Nearest valid intersection with this obstacle
    ///
    /// Reflective circles reject `t <= EPSILON` so a beam leaving a circle it
    /// just bounced off is not caught at its own origin. The goal keeps the
    /// inside-hit at `t = 0`.
    pub fn intersect(&self, ray: &Ray) -> Option<RayHit> {
        match self {
            Obstacle::Walls(bounds) => ray_bounds(ray, bounds),
            Obstacle::Rect(rect) => ray_rect(ray, rect),
            Obstacle::Circle(circle) => ray_circle(ray, circle).filter(|hit| hit.t > EPSILON),
            Obstacle::Goal(circle) => ray_circle(ray, circle),
        }
    }
}
