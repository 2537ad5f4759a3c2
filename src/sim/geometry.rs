//! Ray intersection primitives
//!
//! The tricky part of Ray Puzzle: finding where a beam first meets each kind
//! of surface and which way that surface faces.
//!
//! Every test takes a ray with a unit direction and returns the parametric
//! distance `t` along it together with the outward surface normal.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Guards against self-intersection and near-parallel division
pub const EPSILON: f32 = 1e-4;

/// A half-line with an origin and a (unit) direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec2,
    pub dir: Vec2,
}

impl Ray {
    pub fn new(origin: Vec2, dir: Vec2) -> Self {
        Self { origin, dir }
    }

    /// Point at distance `t` along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec2 {
        self.origin + self.dir * t
    }
}

/// Nearest valid intersection of a ray with a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the ray
    pub t: f32,
    /// Surface normal at the hit, facing the incoming ray
    pub normal: Vec2,
}

/// A circle (obstacle or goal)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// An axis-aligned rectangle, `(x, y)` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict interior test (points on the boundary are outside)
    pub fn contains_point_strict(&self, p: Vec2) -> bool {
        p.x > self.x && p.x < self.right() && p.y > self.y && p.y < self.bottom()
    }
}

/// Inner edges of the arena walls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl Bounds {
    /// Arena of `width` x `height` enclosed by walls of the given thickness
    pub fn from_walls(width: f32, height: f32, wall_thickness: f32) -> Self {
        Self {
            x_min: wall_thickness,
            x_max: width - wall_thickness,
            y_min: wall_thickness,
            y_max: height - wall_thickness,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.x_min + self.x_max) * 0.5,
            (self.y_min + self.y_max) * 0.5,
        )
    }
}

/// Ray vs circle
///
/// Solves `|P + tD - C|² = r²` for the nearer root. A ray starting inside
/// the circle hits at `t = 0`. A ray outside and heading away never hits.
pub fn ray_circle(ray: &Ray, circle: &Circle) -> Option<RayHit> {
    let m = ray.origin - circle.center;
    let b = m.dot(ray.dir);
    let c = m.length_squared() - circle.radius * circle.radius;

    if c > 0.0 && b > 0.0 {
        return None;
    }

    let discr = b * b - c;
    if discr < 0.0 {
        return None;
    }

    let t = (-b - discr.sqrt()).max(0.0);
    let n = ray.at(t) - circle.center;
    let len = n.length();
    let normal = if len > EPSILON { n / len } else { n };

    Some(RayHit { t, normal })
}

/// Ray vs axis-aligned rectangle (slab method)
///
/// Origins strictly inside the rectangle, and entries within `EPSILON` of
/// the origin, report no hit so a beam never re-hits the face it left.
pub fn ray_rect(ray: &Ray, rect: &Rect) -> Option<RayHit> {
    let pos = ray.origin;
    let dir = ray.dir;

    if rect.contains_point_strict(pos) {
        return None;
    }

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    let mut normal = Vec2::ZERO;

    if dir.x.abs() < EPSILON {
        if pos.x < rect.x || pos.x > rect.right() {
            return None;
        }
    } else {
        let t1 = (rect.x - pos.x) / dir.x;
        let t2 = (rect.right() - pos.x) / dir.x;
        let (entry, exit, n) = if t1 < t2 {
            (t1, t2, Vec2::NEG_X)
        } else {
            (t2, t1, Vec2::X)
        };
        if entry > t_min {
            t_min = entry;
            normal = n;
        }
        t_max = t_max.min(exit);
    }

    if dir.y.abs() < EPSILON {
        if pos.y < rect.y || pos.y > rect.bottom() {
            return None;
        }
    } else {
        let t1 = (rect.y - pos.y) / dir.y;
        let t2 = (rect.bottom() - pos.y) / dir.y;
        let (entry, exit, n) = if t1 < t2 {
            (t1, t2, Vec2::NEG_Y)
        } else {
            (t2, t1, Vec2::Y)
        };
        if entry > t_min {
            t_min = entry;
            normal = n;
        }
        t_max = t_max.min(exit);
    }

    if t_max < t_min || t_max < 0.0 || t_min < EPSILON {
        return None;
    }

    Some(RayHit { t: t_min, normal })
}

/// Ray vs arena boundary
///
/// Only the walls the ray is moving toward are tested. The returned normal
/// points back into the arena. A corner hit, where both walls are crossed
/// within `EPSILON` of each other, returns the diagonal normal so both
/// components reflect. A ray sitting on a wall and heading out through it
/// is blocked at `t = 0`.
pub fn ray_bounds(ray: &Ray, bounds: &Bounds) -> Option<RayHit> {
    let pos = ray.origin;
    let dir = ray.dir;

    let x_wall = if dir.x > EPSILON {
        Some(((bounds.x_max - pos.x) / dir.x, Vec2::NEG_X))
    } else if dir.x < -EPSILON {
        Some(((bounds.x_min - pos.x) / dir.x, Vec2::X))
    } else {
        None
    };
    let y_wall = if dir.y > EPSILON {
        Some(((bounds.y_max - pos.y) / dir.y, Vec2::NEG_Y))
    } else if dir.y < -EPSILON {
        Some(((bounds.y_min - pos.y) / dir.y, Vec2::Y))
    } else {
        None
    };

    if let Some((_, normal)) = x_wall.into_iter().chain(y_wall).find(|&(t, _)| t <= EPSILON) {
        return Some(RayHit { t: 0.0, normal });
    }

    if let (Some((tx, nx)), Some((ty, ny))) = (x_wall, y_wall) {
        if (tx - ty).abs() <= EPSILON {
            return Some(RayHit {
                t: tx.min(ty),
                normal: (nx + ny).normalize(),
            });
        }
    }

    let x_hit = x_wall.filter(|&(t, _)| {
        let y = pos.y + dir.y * t;
        y >= bounds.y_min && y <= bounds.y_max
    });
    let y_hit = y_wall.filter(|&(t, _)| {
        let x = pos.x + dir.x * t;
        x >= bounds.x_min && x <= bounds.x_max
    });

    match (x_hit, y_hit) {
        (Some((tx, nx)), Some((ty, ny))) => {
            let (t, normal) = if tx < ty { (tx, nx) } else { (ty, ny) };
            Some(RayHit { t, normal })
        }
        (Some((t, normal)), None) | (None, Some((t, normal))) => Some(RayHit { t, normal }),
        (None, None) => None,
    }
}

/// Specular reflection: d' = d - 2(d·n)n
#[inline]
pub fn reflect(dir: Vec2, normal: Vec2) -> Vec2 {
    dir - 2.0 * dir.dot(normal) * normal
}
