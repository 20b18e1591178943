use engine::{Rect, Rgba, Vec2, Viewport};

use super::config::LevelConfig;

/// Vertical size of one reported level band.
pub(crate) const LEVEL_BAND_HEIGHT: f32 = 100.0;
pub(crate) const MAX_LEVEL: u32 = 4;
/// Landing accepts a bottom edge this far below the platform's underside.
pub(crate) const LANDING_BAND: f32 = 10.0;
/// Bottom edge may sit this far below the goal top and still count.
pub(crate) const GOAL_TOLERANCE: f32 = 5.0;
/// Respawn once the actor's top passes this far below the ground line.
pub(crate) const FALL_THROUGH_MARGIN: f32 = 100.0;
/// Drawn thickness of the ground band.
pub(crate) const GROUND_DEPTH: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Actor {
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) speed: f32,
    pub(crate) jump_power: f32,
    pub(crate) on_ground: bool,
}

impl Actor {
    pub(crate) fn spawn(level: &LevelConfig) -> Self {
        let settings = &level.actor;
        Self {
            position: Vec2::new(settings.spawn_x, settings.spawn_y),
            velocity: Vec2::default(),
            width: settings.width,
            height: settings.height,
            speed: settings.speed,
            jump_power: settings.jump_power,
            on_ground: false,
        }
    }

    pub(crate) fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    pub(crate) fn bottom(&self) -> f32 {
        self.position.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Platform {
    pub(crate) rect: Rect,
    pub(crate) color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WorldConfig {
    pub(crate) gravity: f32,
    pub(crate) ground_y: f32,
    pub(crate) world_width: f32,
    pub(crate) viewport: Viewport,
    pub(crate) level_height: f32,
}

impl WorldConfig {
    pub(crate) fn from_level(level: &LevelConfig, viewport: Viewport) -> Self {
        Self {
            gravity: level.world.gravity,
            ground_y: level.world.ground_y,
            world_width: level.world.world_width,
            viewport,
            level_height: level.level_height(),
        }
    }

    /// Normalized climb from the ground line (0) to the topmost platform (1).
    pub(crate) fn height_progress(&self, actor_y: f32) -> f32 {
        clamp01((self.ground_y - actor_y) / (self.ground_y - self.level_height))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum RunState {
    #[default]
    Playing,
    Won,
}

/// Control multipliers at the actor's current altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Difficulty {
    pub(crate) sensitivity_multiplier: f32,
    pub(crate) friction_reduction: f32,
    pub(crate) jump_sensitivity: f32,
}

impl Difficulty {
    pub(crate) fn from_height_progress(height_progress: f32) -> Self {
        let progress = clamp01(height_progress);
        Self {
            sensitivity_multiplier: 1.0 + progress * 2.5,
            friction_reduction: (0.8 - progress * 0.5).max(0.3),
            jump_sensitivity: 1.0 + progress * 0.8,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::from_height_progress(0.0)
    }
}

/// Per-run counters; reset together with the actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RunStats {
    pub(crate) ticks: u64,
    pub(crate) best_level: u32,
}

pub(crate) fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
