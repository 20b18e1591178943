use engine::{InputAction, InputSnapshot, RenderFrame, Scene, SceneCommand, Viewport};
use tracing::{debug, info};

use super::config::{LevelConfig, LevelError};
use super::hud::{build_frame, difficulty_label};
use super::types::RunState;
use super::world::{ClimbWorld, StepOutcome};

const DEFAULT_TICK_SECONDS: f32 = 1.0 / 60.0;

/// Adapts the climbing simulation to the engine's frame loop.
pub(crate) struct ClimbScene {
    world: ClimbWorld,
    level_source: String,
    tick_seconds: f32,
}

impl ClimbScene {
    pub(crate) fn new(
        level: &LevelConfig,
        level_source: impl Into<String>,
        viewport: Viewport,
    ) -> Result<Self, LevelError> {
        Ok(Self {
            world: ClimbWorld::new(level, viewport)?,
            level_source: level_source.into(),
            tick_seconds: DEFAULT_TICK_SECONDS,
        })
    }

    #[cfg(test)]
    pub(crate) fn world(&self) -> &ClimbWorld {
        &self.world
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut ClimbWorld {
        &mut self.world
    }

    fn wants_restart(&self, input: &InputSnapshot) -> bool {
        input.restart_pressed()
            || (self.world.run_state() == RunState::Won && input.pointer_pressed())
    }

    fn log_outcome(&self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Won => {
                let stats = self.world.stats();
                info!(
                    ticks = stats.ticks,
                    seconds = stats.ticks as f64 * self.tick_seconds as f64,
                    best_level = stats.best_level,
                    "run_won"
                );
            }
            StepOutcome::Respawned => {
                info!(reason = "fell_through", "respawned");
            }
            StepOutcome::Frozen | StepOutcome::Advanced => {}
        }
    }
}

impl Scene for ClimbScene {
    fn load(&mut self) {
        self.world.restart();
        let config = self.world.config();
        info!(
            source = %self.level_source,
            platforms = self.world.snapshot().platforms.len(),
            ground_y = config.ground_y,
            level_height = config.level_height,
            world_width = config.world_width,
            "level_loaded"
        );
    }

    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if input.is_down(InputAction::Quit) {
            return SceneCommand::Quit;
        }
        if fixed_dt_seconds > 0.0 {
            self.tick_seconds = fixed_dt_seconds;
        }
        self.world.set_viewport(input.viewport());

        if self.wants_restart(input) {
            let previous = self.world.run_state();
            self.world.restart();
            info!(previous = ?previous, "restarted");
            return SceneCommand::None;
        }

        let previous_level = self.world.current_level();
        let outcome = self.world.step(input.actions());
        let level = self.world.current_level();
        if level != previous_level {
            debug!(level, label = difficulty_label(level), "level_changed");
        }
        self.log_outcome(outcome);
        SceneCommand::None
    }

    fn render(&self) -> RenderFrame {
        build_frame(&self.world.snapshot(), self.tick_seconds)
    }

    fn unload(&mut self) {
        let stats = self.world.stats();
        info!(
            ticks = stats.ticks,
            best_level = stats.best_level,
            "level_unloaded"
        );
    }

    fn debug_title(&self) -> Option<String> {
        let title = match self.world.run_state() {
            RunState::Won => "Sky Climb | Won!".to_string(),
            RunState::Playing => format!("Sky Climb | Level {}", self.world.current_level()),
        };
        Some(title)
    }

    fn debug_lines(&self) -> Vec<String> {
        let snapshot = self.world.snapshot();
        let actor = snapshot.actor;
        let standing = match snapshot.standing_on {
            Some(index) => format!("platform {index}"),
            None if actor.on_ground => "ground".to_string(),
            None => "air".to_string(),
        };
        let mut lines = vec![
            format!(
                "Pos: {:.1}, {:.1} of {:.0}",
                actor.position.x, actor.position.y, snapshot.world_width
            ),
            format!("Vel: {:.2}, {:.2}", actor.velocity.x, actor.velocity.y),
            format!("On: {standing}"),
            format!(
                "Sens: x{:.2} Jump: x{:.2}",
                snapshot.difficulty.sensitivity_multiplier, snapshot.difficulty.jump_sensitivity
            ),
            format!("Friction: {:.2}", snapshot.difficulty.friction_reduction),
            format!(
                "Camera: {:.0}, {:.0}",
                snapshot.camera.position.x, snapshot.camera.position.y
            ),
            format!("Ticks: {}", snapshot.stats.ticks),
        ];
        if let Some(goal) = snapshot.goal() {
            lines.push(format!(
                "Goal: {:.0}, {:.0}",
                goal.rect.x - actor.position.x,
                goal.rect.y - actor.bottom()
            ));
        }
        lines
    }
}
