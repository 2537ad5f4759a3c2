//! Stage model and JSON stage loading
//!
//! A stage is the static layout for one playthrough: up to
//! `MAX_STAGE_RECTS` rectangles, up to `MAX_STAGE_CIRCLES` circles and at
//! most one goal. Stage files look like:
//!
//! ```json
//! {
//!   "rects":   [{ "x": 300, "y": 200, "w": 120, "h": 40 }],
//!   "circles": [{ "x": 600, "y": 300, "r": 50 }],
//!   "goal":    { "x": 900, "y": 315, "r": 30 }
//! }
//! ```
//!
//! Malformed entries are skipped one by one. Only unreadable input, invalid
//! JSON or a non-object root fail the whole load.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::geometry::{Circle, Rect};
use super::obstacle::Obstacle;

/// Maximum rectangles kept from a stage file
pub const MAX_STAGE_RECTS: usize = 32;
/// Maximum circles kept from a stage file
pub const MAX_STAGE_CIRCLES: usize = 32;

/// Why a stage failed to load
#[derive(Debug, Error)]
pub enum StageError {
    #[error("failed to read stage file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("stage is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("stage root must be a JSON object")]
    InvalidRoot,
}

#[derive(Debug, Deserialize)]
struct RectEntry {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

#[derive(Debug, Deserialize)]
struct CircleEntry {
    x: f32,
    y: f32,
    r: f32,
}

impl CircleEntry {
    fn into_circle(self) -> Option<Circle> {
        (self.r > 0.0).then(|| Circle::new(Vec2::new(self.x, self.y), self.r))
    }
}

/// Static obstacle and goal layout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stage {
    rects: Vec<Rect>,
    circles: Vec<Circle>,
    goal: Option<Circle>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stage from JSON text
    pub fn from_json(text: &str) -> Result<Self, StageError> {
        let mut stage = Self::new();
        stage.load_str(text)?;
        Ok(stage)
    }

    /// Read and parse a stage file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StageError> {
        let mut stage = Self::new();
        stage.load_file(path)?;
        Ok(stage)
    }

    /// Clear all obstacles and the goal
    pub fn reset(&mut self) {
        self.rects.clear();
        self.circles.clear();
        self.goal = None;
    }

    /// Replace the contents with the stage read from `path`
    ///
    /// The stage is reset first and stays empty on error.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), StageError> {
        self.reset();
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| StageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_str(&text)?;
        log::info!(
            "Loaded stage {}: {} rects, {} circles, goal: {}",
            path.display(),
            self.rects.len(),
            self.circles.len(),
            self.has_goal()
        );
        Ok(())
    }

    /// Replace the contents with the stage described by `text`
    ///
    /// The stage is reset first and stays empty on error.
    pub fn load_str(&mut self, text: &str) -> Result<(), StageError> {
        self.reset();

        let root: Value = serde_json::from_str(text)?;
        let Some(root) = root.as_object() else {
            return Err(StageError::InvalidRoot);
        };

        if let Some(entries) = root.get("rects").and_then(Value::as_array) {
            for (i, item) in entries.iter().enumerate() {
                if self.rects.len() >= MAX_STAGE_RECTS {
                    log::warn!(
                        "Stage has more than {} rects, ignoring the rest",
                        MAX_STAGE_RECTS
                    );
                    break;
                }
                match RectEntry::deserialize(item) {
                    Ok(e) if e.w >= 0.0 && e.h >= 0.0 => {
                        self.rects.push(Rect::new(e.x, e.y, e.w, e.h));
                    }
                    Ok(_) => log::debug!("Skipping rect {}: negative size", i),
                    Err(err) => log::debug!("Skipping rect {}: {}", i, err),
                }
            }
        }

        if let Some(entries) = root.get("circles").and_then(Value::as_array) {
            for (i, item) in entries.iter().enumerate() {
                if self.circles.len() >= MAX_STAGE_CIRCLES {
                    log::warn!(
                        "Stage has more than {} circles, ignoring the rest",
                        MAX_STAGE_CIRCLES
                    );
                    break;
                }
                match CircleEntry::deserialize(item).map(CircleEntry::into_circle) {
                    Ok(Some(circle)) => self.circles.push(circle),
                    Ok(None) => log::debug!("Skipping circle {}: radius must be positive", i),
                    Err(err) => log::debug!("Skipping circle {}: {}", i, err),
                }
            }
        }

        if let Some(goal) = root.get("goal").filter(|g| g.is_object()) {
            match CircleEntry::deserialize(goal).map(CircleEntry::into_circle) {
                Ok(circle) => self.goal = circle,
                Err(err) => log::debug!("Ignoring goal: {}", err),
            }
        }

        Ok(())
    }

    /// Add a rectangle, returns false when the stage is full
    pub fn add_rect(&mut self, rect: Rect) -> bool {
        if self.rects.len() >= MAX_STAGE_RECTS {
            return false;
        }
        self.rects.push(rect);
        true
    }

    /// Add a circle, returns false when the stage is full
    pub fn add_circle(&mut self, circle: Circle) -> bool {
        if self.circles.len() >= MAX_STAGE_CIRCLES {
            return false;
        }
        self.circles.push(circle);
        true
    }

    pub fn set_goal(&mut self, goal: Circle) {
        self.goal = Some(goal);
    }

    /// Install `default` if the stage has no goal of its own
    ///
    /// Returns true when the default was used.
    pub fn ensure_goal(&mut self, default: Circle) -> bool {
        if self.goal.is_some() {
            return false;
        }
        self.goal = Some(default);
        true
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn goal(&self) -> Option<&Circle> {
        self.goal.as_ref()
    }

    pub fn has_goal(&self) -> bool {
        self.goal.is_some()
    }

    pub fn rect_count(&self) -> usize {
        self.rects.len()
    }

    pub fn circle_count(&self) -> usize {
        self.circles.len()
    }

    /// Reflective obstacles in stage order (rects, then circles)
    pub fn obstacles(&self) -> impl Iterator<Item = Obstacle> + '_ {
        self.rects
            .iter()
            .copied()
            .map(Obstacle::Rect)
            .chain(self.circles.iter().copied().map(Obstacle::Circle))
    }
}
