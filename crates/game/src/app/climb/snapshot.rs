use std::sync::Arc;

use engine::{Camera2D, Rect, Rgba, Viewport};

use super::types::{Actor, Difficulty, Platform, RunState, RunStats};

/// Read-only view of the world after a step. Platforms are shared with the
/// world, everything else is copied.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WorldSnapshot {
    pub(crate) actor: Actor,
    pub(crate) actor_color: Rgba,
    pub(crate) camera: Camera2D,
    pub(crate) platforms: Arc<[Platform]>,
    pub(crate) ground: Rect,
    pub(crate) world_width: f32,
    pub(crate) viewport: Viewport,
    pub(crate) run_state: RunState,
    pub(crate) current_level: u32,
    pub(crate) difficulty: Difficulty,
    pub(crate) standing_on: Option<usize>,
    pub(crate) stats: RunStats,
}

impl WorldSnapshot {
    pub(crate) fn game_won(&self) -> bool {
        self.run_state == RunState::Won
    }

    pub(crate) fn goal(&self) -> Option<&Platform> {
        self.platforms.last()
    }
}
