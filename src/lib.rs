//! Ray Puzzle - A single-screen light-beam puzzle
//!
//! Core modules:
//! - `sim`: Beam tracing, stage model, cosmetic effect pools and the session tick
//! - `tuning`: Data-driven beam and control constants
//! - `settings`: Player-facing effect preferences

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 1200.0;
    pub const SCREEN_HEIGHT: f32 = 900.0;
    /// Thickness of the four arena walls (inner edges bound the beam)
    pub const WALL_THICKNESS: f32 = 40.0;

    /// The player sits in the middle of the screen and never moves
    pub const PLAYER_POS: Vec2 = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0);
    /// Initial facing angle (straight up in screen coordinates)
    pub const START_FACING: f32 = -std::f32::consts::FRAC_PI_2;

    /// Goal used when the stage file does not provide one
    pub const DEFAULT_GOAL_POS: Vec2 = Vec2::new(SCREEN_WIDTH * 0.75, SCREEN_HEIGHT * 0.35);
    pub const DEFAULT_GOAL_RADIUS: f32 = 30.0;

    /// Stage file loaded when entering play
    pub const DEFAULT_STAGE_PATH: &str = "stages/stage1.json";
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit direction for a facing angle (screen coordinates, y down)
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
