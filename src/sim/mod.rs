//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module renders, plays
//! sound or reads input devices:
//! - Geometry and tracing are pure functions of their inputs
//! - The stage is read-only while a beam is traced
//! - Cosmetic randomness comes from a seeded RNG

pub mod effects;
pub mod geometry;
pub mod obstacle;
pub mod stage;
pub mod state;
pub mod tick;
pub mod trace;

pub use effects::{Effects, Particle, ParticlePool, Ripple, RippleRing, Star, StarField};
pub use geometry::{
    Bounds, Circle, EPSILON, Ray, RayHit, Rect, ray_bounds, ray_circle, ray_rect, reflect,
};
pub use obstacle::{Obstacle, ObstacleKind};
pub use stage::{MAX_STAGE_CIRCLES, MAX_STAGE_RECTS, Stage, StageError};
pub use state::{GameEvent, GamePhase, GameState, Shot};
pub use tick::{ButtonInput, TickInput, tick};
pub use trace::{DEFAULT_MAX_BOUNCES, Impact, Segment, Trace, Tracer, trace_obstacles};
