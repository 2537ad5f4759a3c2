//! Cosmetic effect pools
//!
//! Ripples, particle bursts and menu shooting stars. None of this affects
//! gameplay; the tick drives it from beam impacts and the renderer reads it.
//!
//! Every pool has a fixed capacity:
//! - ripples live in a ring buffer that overwrites the oldest slot
//! - particles use a free list and drop spawns when it runs dry
//! - stars take the first free slot, or skip the spawn

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Ripple ring buffer size
pub const MAX_RIPPLES: usize = 16;
/// Seconds a ripple takes to fully expand and fade
pub const RIPPLE_DURATION: f32 = 0.5;
pub const RIPPLE_MIN_RADIUS: f32 = 6.0;
pub const RIPPLE_MAX_RADIUS: f32 = 28.0;
/// Half the ring stroke width
const RIPPLE_HALF_WIDTH: f32 = 2.0;

/// Maximum live particles
pub const MAX_PARTICLES: usize = 64;
/// Per-tick velocity damping
const PARTICLE_DAMPING: f32 = 0.96;

/// Maximum live shooting stars
pub const MAX_STARS: usize = 24;

/// An expanding ring left where the beam bounced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub pos: Vec2,
    pub age: f32,
}

impl Ripple {
    /// Lifetime fraction in [0, 1)
    pub fn progress(&self) -> f32 {
        self.age / RIPPLE_DURATION
    }

    pub fn radius(&self) -> f32 {
        RIPPLE_MIN_RADIUS + (RIPPLE_MAX_RADIUS - RIPPLE_MIN_RADIUS) * self.progress()
    }

    /// Inner and outer radius of the drawn ring
    pub fn ring(&self) -> (f32, f32) {
        let r = self.radius();
        let inner = if r > RIPPLE_HALF_WIDTH {
            r - RIPPLE_HALF_WIDTH
        } else {
            1.0
        };
        (inner, r + RIPPLE_HALF_WIDTH)
    }

    /// Opacity, fades out linearly
    pub fn alpha(&self) -> f32 {
        1.0 - self.progress()
    }
}

/// Fixed-size ring of ripples; adding to a full ring replaces the oldest
#[derive(Debug, Clone)]
pub struct RippleRing {
    slots: [Option<Ripple>; MAX_RIPPLES],
    next: usize,
}

impl Default for RippleRing {
    fn default() -> Self {
        Self {
            slots: [None; MAX_RIPPLES],
            next: 0,
        }
    }
}

impl RippleRing {
    pub fn add(&mut self, pos: Vec2) {
        self.slots[self.next] = Some(Ripple { pos, age: 0.0 });
        self.next = (self.next + 1) % MAX_RIPPLES;
    }

    pub fn update(&mut self, dt: f32) {
        for slot in &mut self.slots {
            if let Some(ripple) = slot {
                ripple.age += dt;
                if ripple.age >= RIPPLE_DURATION {
                    *slot = None;
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ripple> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.slots = [None; MAX_RIPPLES];
        self.next = 0;
    }
}

/// A spark thrown off by a bounce
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub age: f32,
    pub life: f32,
}

impl Particle {
    /// Opacity, fades out linearly over the particle's life
    pub fn alpha(&self) -> f32 {
        1.0 - self.age / self.life
    }
}

/// Fixed-capacity particle arena with a free list
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Option<Particle>>,
    free: Vec<usize>,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::with_capacity(MAX_PARTICLES)
    }
}

impl ParticlePool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            // Reversed so slots fill from index 0 upward
            free: (0..capacity).rev().collect(),
        }
    }

    /// Spawn up to `count` particles at `pos`, returns how many fit
    pub fn burst<R: Rng>(&mut self, rng: &mut R, pos: Vec2, count: usize) -> usize {
        let mut spawned = 0;
        while spawned < count {
            let Some(idx) = self.free.pop() else {
                break;
            };
            let angle = (rng.random_range(0..360u32) as f32).to_radians();
            let speed = rng.random_range(80..=220u32) as f32;
            self.slots[idx] = Some(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                age: 0.0,
                life: 0.35 + rng.random_range(0..=20u32) as f32 / 100.0,
            });
            spawned += 1;
        }
        spawned
    }

    pub fn update(&mut self, dt: f32) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            let Some(p) = slot else {
                continue;
            };
            p.age += dt;
            if p.age >= p.life {
                *slot = None;
                self.free.push(idx);
                continue;
            }
            p.vel *= PARTICLE_DAMPING;
            p.pos += p.vel * dt;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

/// A shooting star streaking across the menu background
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    /// Position last tick, the streak is drawn from here to `pos`
    pub prev: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
}

impl Star {
    pub fn alpha(&self) -> f32 {
        1.0 - self.life / self.max_life
    }
}

/// Menu star field with a randomized spawn cadence
#[derive(Debug, Clone)]
pub struct StarField {
    slots: [Option<Star>; MAX_STARS],
    spawn_timer: f32,
}

impl Default for StarField {
    fn default() -> Self {
        Self {
            slots: [None; MAX_STARS],
            spawn_timer: 0.0,
        }
    }
}

impl StarField {
    /// Advance stars; when `spawn` is set a new star may be launched
    pub fn update<R: Rng>(&mut self, rng: &mut R, dt: f32, spawn: bool) {
        if spawn {
            self.spawn_timer -= dt;
            if self.spawn_timer <= 0.0 {
                if let Some(slot) = self.slots.iter_mut().find(|s| s.is_none()) {
                    let pos = Vec2::new(
                        rng.random_range(0.0..=SCREEN_WIDTH),
                        rng.random_range(0.0..=SCREEN_HEIGHT / 2.0),
                    );
                    let speed = rng.random_range(300..=520u32) as f32;
                    let angle = (rng.random_range(225..=255u32) as f32).to_radians();
                    *slot = Some(Star {
                        pos,
                        prev: pos,
                        vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                        life: 0.0,
                        max_life: 1.0 + rng.random_range(0..=60u32) as f32 / 100.0,
                    });
                }
                self.spawn_timer = 0.35 + rng.random_range(0..=40u32) as f32 / 100.0;
            }
        }

        for slot in &mut self.slots {
            if let Some(star) = slot {
                star.life += dt;
                if star.life >= star.max_life {
                    *slot = None;
                    continue;
                }
                star.prev = star.pos;
                star.pos += star.vel * dt;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Star> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All cosmetic pools plus the RNG that feeds them
#[derive(Debug, Clone)]
pub struct Effects {
    pub ripples: RippleRing,
    pub particles: ParticlePool,
    pub stars: StarField,
    rng: Pcg32,
}

impl Effects {
    pub fn new(seed: u64) -> Self {
        Self {
            ripples: RippleRing::default(),
            particles: ParticlePool::default(),
            stars: StarField::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// React to one beam bounce
    pub fn on_impact(&mut self, pos: Vec2, ripple: bool, particle_count: usize) {
        if ripple {
            self.ripples.add(pos);
        }
        if particle_count > 0 {
            self.particles.burst(&mut self.rng, pos, particle_count);
        }
    }

    pub fn update(&mut self, dt: f32, spawn_stars: bool) {
        self.ripples.update(dt);
        self.particles.update(dt);
        self.stars.update(&mut self.rng, dt, spawn_stars);
    }
}
