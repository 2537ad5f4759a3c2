//! Session state and core simulation types
//!
//! Everything that changes from tick to tick lives in `GameState`; the tick
//! function is the only thing that mutates it.

use std::path::Path;

use glam::Vec2;

use super::effects::Effects;
use super::geometry::{Bounds, Circle};
use super::obstacle::ObstacleKind;
use super::stage::Stage;
use super::trace::{Trace, Tracer};
use crate::consts::*;
use crate::{Settings, Tuning, direction_from_angle};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for start
    Menu,
    /// Fading to black before entering play
    FadeOut,
    /// In play, fading back in from black
    FadeIn,
    /// In play
    Playing,
}

impl GamePhase {
    /// Whether gameplay input and the beam are live
    pub fn in_game(&self) -> bool {
        matches!(self, GamePhase::FadeIn | GamePhase::Playing)
    }
}

/// Something the audio/UI layer should react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Menu start button accepted
    Click,
    /// The beam front reached a bounce point this tick
    WallHit { pos: Vec2, kind: ObstacleKind },
    /// The beam reached the goal
    GoalCleared,
}

/// The shot currently (or last) in flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Seconds left before the beam disappears
    pub timer: f32,
    /// Current beam length
    pub progress: f32,
    /// Fire direction (unit)
    pub dir: Vec2,
}

impl Default for Shot {
    fn default() -> Self {
        Self {
            timer: 0.0,
            progress: 0.0,
            dir: Vec2::X,
        }
    }
}

impl Shot {
    pub fn is_active(&self) -> bool {
        self.timer > 0.0
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for the cosmetic RNG
    pub seed: u64,
    pub phase: GamePhase,
    /// Black overlay opacity during menu transitions (0-1)
    pub transition_alpha: f32,
    /// Player facing angle (radians, [-π, π])
    pub facing: f32,
    pub shot: Shot,
    /// The goal has been reached by the current shot
    pub goal_cleared: bool,
    pub stage: Stage,
    /// Beam as traced on the last tick (empty when no shot is active)
    pub trace: Trace,
    pub effects: Effects,
    pub tracer: Tracer,
    pub tuning: Tuning,
    pub settings: Settings,
    stage_loaded: bool,
}

impl GameState {
    /// Create a new session with default tuning and settings
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), Settings::default())
    }

    pub fn with_config(seed: u64, tuning: Tuning, settings: Settings) -> Self {
        let bounds = Bounds::from_walls(SCREEN_WIDTH, SCREEN_HEIGHT, WALL_THICKNESS);
        Self {
            seed,
            phase: GamePhase::Menu,
            transition_alpha: 0.0,
            facing: START_FACING,
            shot: Shot::default(),
            goal_cleared: false,
            stage: Stage::new(),
            trace: Trace::default(),
            effects: Effects::new(seed),
            tracer: Tracer::new(bounds).with_max_bounces(tuning.max_bounces),
            tuning,
            settings,
            stage_loaded: false,
        }
    }

    /// Play has begun but no stage has been installed yet
    pub fn needs_stage(&self) -> bool {
        self.phase.in_game() && !self.stage_loaded
    }

    /// Mark the stage stale so it is reloaded on entering play
    pub fn invalidate_stage(&mut self) {
        self.stage_loaded = false;
    }

    /// Load the stage file at `path`
    ///
    /// A failed load leaves an empty stage. Either way the stage ends up
    /// with a goal so it stays completable. Returns whether the file loaded.
    pub fn load_stage(&mut self, path: impl AsRef<Path>) -> bool {
        let mut stage = Stage::new();
        let loaded = match stage.load_file(path.as_ref()) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Stage load failed, using empty stage: {}", err);
                false
            }
        };
        self.install_stage(stage);
        loaded
    }

    /// Install an already-built stage, filling in the default goal
    pub fn install_stage(&mut self, mut stage: Stage) {
        if stage.ensure_goal(Circle::new(DEFAULT_GOAL_POS, DEFAULT_GOAL_RADIUS)) {
            log::info!("Stage has no goal, using default");
        }
        self.stage = stage;
        self.goal_cleared = false;
        self.stage_loaded = true;
    }

    /// Unit vector the player is facing
    pub fn facing_dir(&self) -> Vec2 {
        direction_from_angle(self.facing)
    }

    pub fn beam_active(&self) -> bool {
        self.shot.is_active()
    }
}
