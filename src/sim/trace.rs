//! Beam propagation
//!
//! Walks a beam through the arena one surface at a time: find the nearest
//! reflective hit, give the goal a chance to claim the beam first, then
//! either stop or reflect and continue with whatever budget is left.

use glam::Vec2;

use super::geometry::{Bounds, EPSILON, Ray, RayHit, reflect};
use super::obstacle::{Obstacle, ObstacleKind};
use super::stage::Stage;

/// Hard cap on reflections per trace
pub const DEFAULT_MAX_BOUNCES: u32 = 6;

/// One straight, drawable piece of the beam
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }
}

/// A bounce, reported once per reflection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    /// Where the beam struck
    pub pos: Vec2,
    /// Surface normal at the strike point
    pub normal: Vec2,
    /// What was struck
    pub kind: ObstacleKind,
    /// Beam length travelled from the origin up to this point
    pub distance: f32,
}

/// Result of tracing one beam
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    /// Segments in travel order
    pub segments: Vec<Segment>,
    /// Bounces in travel order
    pub impacts: Vec<Impact>,
    /// The beam ended inside the goal
    pub goal_captured: bool,
    /// Number of reflections performed
    pub bounces: u32,
    /// Total length of all segments
    pub traveled: f32,
}

impl Trace {
    /// Where the beam currently ends (None if nothing was traced)
    pub fn end_point(&self) -> Option<Vec2> {
        self.segments.last().map(|s| s.end)
    }

    /// Impacts whose travelled distance lies in `[from, up_to)`
    ///
    /// A trace with budget `b` only holds impacts closer than `b`, so
    /// consecutive frame windows `[prev, progress)` report each bounce on
    /// exactly one frame, including one landing right on a frame boundary.
    pub fn impacts_between(&self, from: f32, up_to: f32) -> impl Iterator<Item = &Impact> {
        self.impacts
            .iter()
            .filter(move |i| i.distance >= from && i.distance < up_to)
    }

    fn push_segment(&mut self, start: Vec2, end: Vec2) {
        let segment = Segment { start, end };
        self.traveled += segment.length();
        self.segments.push(segment);
    }
}

/// Traces beams through an arena and stage
#[derive(Debug, Clone, Copy)]
pub struct Tracer {
    pub bounds: Bounds,
    pub max_bounces: u32,
}

impl Tracer {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            max_bounces: DEFAULT_MAX_BOUNCES,
        }
    }

    pub fn with_max_bounces(mut self, max_bounces: u32) -> Self {
        self.max_bounces = max_bounces;
        self
    }

    /// Trace a beam from `origin` toward `dir` through the walls and `stage`
    pub fn trace(&self, stage: &Stage, origin: Vec2, dir: Vec2, budget: f32) -> Trace {
        let mut obstacles = Vec::with_capacity(stage.rect_count() + stage.circle_count() + 2);
        obstacles.push(Obstacle::Walls(self.bounds));
        obstacles.extend(stage.obstacles());
        if let Some(goal) = stage.goal() {
            obstacles.push(Obstacle::Goal(*goal));
        }
        trace_obstacles(&obstacles, origin, dir, budget, self.max_bounces)
    }
}

/// Trace a beam through an arbitrary obstacle list
///
/// `dir` is normalized here. A zero direction or non-positive budget yields
/// an empty trace. Goal hits win ties with reflective surfaces.
pub fn trace_obstacles(
    obstacles: &[Obstacle],
    origin: Vec2,
    dir: Vec2,
    budget: f32,
    max_bounces: u32,
) -> Trace {
    let mut trace = Trace::default();

    let dir = dir.normalize_or_zero();
    if dir.length_squared() < EPSILON {
        return trace;
    }

    let mut ray = Ray::new(origin, dir);
    let mut remaining = budget;

    while remaining > 0.0 {
        let mut best_t = remaining;
        let mut best: Option<(RayHit, ObstacleKind)> = None;
        let mut goal_t: Option<f32> = None;

        for obstacle in obstacles {
            let Some(hit) = obstacle.intersect(&ray) else {
                continue;
            };
            if obstacle.is_reflective() {
                if hit.t < best_t {
                    best_t = hit.t;
                    best = Some((hit, obstacle.kind()));
                }
            } else if goal_t.is_none_or(|t| hit.t < t) {
                goal_t = Some(hit.t);
            }
        }

        if let Some(t_goal) = goal_t {
            if t_goal <= best_t && t_goal <= remaining {
                trace.push_segment(ray.origin, ray.at(t_goal));
                trace.goal_captured = true;
                break;
            }
        }

        let hit_pos = ray.at(best_t);
        trace.push_segment(ray.origin, hit_pos);
        remaining -= best_t;

        // Ran out of length, or stuck on a degenerate contact
        let Some((hit, kind)) = best else {
            break;
        };
        if best_t <= EPSILON || trace.bounces >= max_bounces {
            break;
        }

        trace.impacts.push(Impact {
            pos: hit_pos,
            normal: hit.normal,
            kind,
            distance: trace.traveled,
        });
        ray = Ray::new(hit_pos, reflect(ray.dir, hit.normal));
        trace.bounces += 1;
    }

    trace
}
