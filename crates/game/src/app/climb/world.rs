use std::sync::Arc;

use engine::{ActionStates, Camera2D, Rect, Rgba, Viewport};

use super::config::{LevelConfig, LevelError};
use super::snapshot::WorldSnapshot;
use super::systems::{level_for_altitude, run_phase, StepContext, STEP_PHASE_ORDER};
use super::types::{Actor, Difficulty, Platform, RunState, RunStats, WorldConfig, GROUND_DEPTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepOutcome {
    /// Run already won; nothing moved.
    Frozen,
    Advanced,
    /// This step latched the win.
    Won,
    /// Fell past the ground margin and was put back at the spawn point.
    Respawned,
}

/// Per-step decisions carried out of the phase context.
#[derive(Debug, Clone, Copy)]
struct PhaseResults {
    difficulty: Difficulty,
    landed_on: Option<usize>,
    reached_goal: bool,
    fell_through: bool,
    current_level: u32,
}

/// Simulation state for one level. Platforms and tuning never change after
/// construction; actor, camera and run state reset together.
#[derive(Debug)]
pub(crate) struct ClimbWorld {
    config: WorldConfig,
    platforms: Arc<[Platform]>,
    spawn: Actor,
    actor_color: Rgba,
    actor: Actor,
    camera: Camera2D,
    run_state: RunState,
    current_level: u32,
    difficulty: Difficulty,
    standing_on: Option<usize>,
    stats: RunStats,
}

impl ClimbWorld {
    pub(crate) fn new(level: &LevelConfig, viewport: Viewport) -> Result<Self, LevelError> {
        level.validate()?;
        let platforms = level
            .platforms
            .iter()
            .map(|platform| Platform {
                rect: Rect::new(platform.x, platform.y, platform.width, platform.height),
                color: platform.color.0,
            })
            .collect::<Arc<[Platform]>>();
        let spawn = Actor::spawn(level);

        let mut world = Self {
            config: WorldConfig::from_level(level, viewport),
            platforms,
            spawn,
            actor_color: level.actor.color.0,
            actor: spawn,
            camera: Camera2D::default(),
            run_state: RunState::Playing,
            current_level: 1,
            difficulty: Difficulty::default(),
            standing_on: None,
            stats: RunStats::default(),
        };
        world.reset();
        Ok(world)
    }

    pub(crate) fn step(&mut self, actions: &ActionStates) -> StepOutcome {
        if self.run_state == RunState::Won {
            return StepOutcome::Frozen;
        }

        let mut context = StepContext {
            actions,
            config: &self.config,
            platforms: &self.platforms,
            actor: &mut self.actor,
            camera: &mut self.camera,
            difficulty: self.difficulty,
            landed_on: None,
            reached_goal: false,
            fell_through: false,
            current_level: self.current_level,
        };
        for phase in STEP_PHASE_ORDER {
            run_phase(phase, &mut context);
        }
        let StepContext {
            difficulty,
            landed_on,
            reached_goal,
            fell_through,
            current_level,
            ..
        } = context;
        self.settle(PhaseResults {
            difficulty,
            landed_on,
            reached_goal,
            fell_through,
            current_level,
        })
    }

    /// Applies what the phases decided: respawn first, then level and win.
    fn settle(&mut self, results: PhaseResults) -> StepOutcome {
        self.difficulty = results.difficulty;
        self.standing_on = results.landed_on;
        self.stats.ticks = self.stats.ticks.saturating_add(1);

        if results.fell_through {
            self.reset();
            self.current_level = level_for_altitude(self.actor.position.y, self.config.ground_y);
            return StepOutcome::Respawned;
        }

        self.current_level = results.current_level;
        self.stats.best_level = self.stats.best_level.max(results.current_level);
        if results.reached_goal {
            self.run_state = RunState::Won;
            return StepOutcome::Won;
        }
        StepOutcome::Advanced
    }

    /// Soft reset: actor, camera, run state and stats. Level geometry stays.
    pub(crate) fn restart(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.actor = self.spawn;
        self.camera = Camera2D::default();
        self.run_state = RunState::Playing;
        self.current_level = 1;
        self.difficulty =
            Difficulty::from_height_progress(self.config.height_progress(self.spawn.position.y));
        self.standing_on = None;
        self.stats = RunStats {
            ticks: 0,
            best_level: 1,
        };
    }

    /// Takes effect on the next step's camera clamp. Empty sizes are ignored.
    pub(crate) fn set_viewport(&mut self, viewport: Viewport) {
        if !viewport.is_empty() {
            self.config.viewport = viewport;
        }
    }

    pub(crate) fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            actor: self.actor,
            actor_color: self.actor_color,
            camera: self.camera,
            platforms: Arc::clone(&self.platforms),
            ground: Rect::new(
                0.0,
                self.config.ground_y,
                self.config.world_width,
                GROUND_DEPTH,
            ),
            world_width: self.config.world_width,
            viewport: self.config.viewport,
            run_state: self.run_state,
            current_level: self.current_level,
            difficulty: self.difficulty,
            standing_on: self.standing_on,
            stats: self.stats,
        }
    }

    pub(crate) fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub(crate) fn run_state(&self) -> RunState {
        self.run_state
    }

    pub(crate) fn current_level(&self) -> u32 {
        self.current_level
    }

    pub(crate) fn stats(&self) -> RunStats {
        self.stats
    }

    #[cfg(test)]
    pub(crate) fn actor(&self) -> &Actor {
        &self.actor
    }

    #[cfg(test)]
    pub(crate) fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    /// Runs the post-phase bookkeeping as if the fall-through phase had fired.
    /// A full step can never get there because the ground phase catches first.
    #[cfg(test)]
    pub(crate) fn settle_fall_through(&mut self) -> StepOutcome {
        let actor = self.actor;
        self.settle(PhaseResults {
            difficulty: self.difficulty,
            landed_on: None,
            reached_goal: false,
            fell_through: super::systems::fell_through(&actor, self.config.ground_y),
            current_level: level_for_altitude(actor.position.y, self.config.ground_y),
        })
    }
}
