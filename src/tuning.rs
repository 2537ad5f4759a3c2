//! Data-driven beam and control tuning
//!
//! Every field has a default, so a tuning file only needs the values it
//! changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::trace::DEFAULT_MAX_BOUNCES;

/// Beam and control constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// How fast the beam front advances (pixels/s)
    pub beam_speed: f32,
    /// Seconds a shot stays alive after the fire input stops
    pub beam_duration: f32,
    /// Maximum beam length (pixels)
    pub beam_length: f32,
    /// Reflections allowed per trace
    pub max_bounces: u32,
    /// Facing change per rotate click (radians)
    pub rotation_step: f32,
    /// Facing change while a rotate button is held (radians/s)
    pub rotation_speed: f32,
    /// Menu fade out / fade in duration (seconds)
    pub transition_duration: f32,
    /// Particles spawned per bounce at the medium preset
    pub particles_per_impact: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            beam_speed: 1200.0,
            beam_duration: 0.4,
            beam_length: 10_000.0,
            max_bounces: DEFAULT_MAX_BOUNCES,
            rotation_step: std::f32::consts::PI / 24.0,
            rotation_speed: std::f32::consts::FRAC_PI_2,
            transition_duration: 0.6,
            particles_per_impact: 8,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file, falling back to defaults
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(err) => {
                    log::warn!("Invalid tuning file {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(err) => {
                log::debug!("No tuning file at {} ({}), using defaults", path.display(), err);
                Self::default()
            }
        }
    }
}
