use engine::{ActionStates, Camera2D, InputAction, Vec2};

use super::types::{
    Actor, Difficulty, Platform, WorldConfig, FALL_THROUGH_MARGIN, GOAL_TOLERANCE, LANDING_BAND,
    LEVEL_BAND_HEIGHT, MAX_LEVEL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepPhase {
    Difficulty,
    Controls,
    Gravity,
    Integrate,
    PlatformLanding,
    Ground,
    GoalCheck,
    WorldBounds,
    Camera,
    FallThrough,
    Level,
}

impl StepPhase {
    #[cfg(test)]
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Difficulty => "Difficulty",
            Self::Controls => "Controls",
            Self::Gravity => "Gravity",
            Self::Integrate => "Integrate",
            Self::PlatformLanding => "PlatformLanding",
            Self::Ground => "Ground",
            Self::GoalCheck => "GoalCheck",
            Self::WorldBounds => "WorldBounds",
            Self::Camera => "Camera",
            Self::FallThrough => "FallThrough",
            Self::Level => "Level",
        }
    }
}

/// Goal check precedes the bounds clamp: landing on a goal near the ceiling
/// leaves the actor above y=0 for that one phase.
pub(crate) const STEP_PHASE_ORDER: [StepPhase; 11] = [
    StepPhase::Difficulty,
    StepPhase::Controls,
    StepPhase::Gravity,
    StepPhase::Integrate,
    StepPhase::PlatformLanding,
    StepPhase::Ground,
    StepPhase::GoalCheck,
    StepPhase::WorldBounds,
    StepPhase::Camera,
    StepPhase::FallThrough,
    StepPhase::Level,
];

pub(crate) struct StepContext<'a> {
    pub(crate) actions: &'a ActionStates,
    pub(crate) config: &'a WorldConfig,
    pub(crate) platforms: &'a [Platform],
    pub(crate) actor: &'a mut Actor,
    pub(crate) camera: &'a mut Camera2D,
    pub(crate) difficulty: Difficulty,
    pub(crate) landed_on: Option<usize>,
    pub(crate) reached_goal: bool,
    pub(crate) fell_through: bool,
    pub(crate) current_level: u32,
}

pub(crate) fn run_phase(phase: StepPhase, context: &mut StepContext<'_>) {
    match phase {
        StepPhase::Difficulty => {
            context.difficulty = Difficulty::from_height_progress(
                context.config.height_progress(context.actor.position.y),
            );
        }
        StepPhase::Controls => apply_controls(context.actor, context.actions, context.difficulty),
        StepPhase::Gravity => apply_gravity(context.actor, context.config.gravity),
        StepPhase::Integrate => integrate(context.actor),
        StepPhase::PlatformLanding => {
            context.landed_on = resolve_platform_landing(context.actor, context.platforms);
        }
        StepPhase::Ground => resolve_ground(context.actor, context.config.ground_y),
        StepPhase::GoalCheck => {
            let actor: &Actor = context.actor;
            context.reached_goal = context
                .platforms
                .last()
                .is_some_and(|goal| reached_goal(actor, goal));
        }
        StepPhase::WorldBounds => clamp_to_world(context.actor, context.config.world_width),
        StepPhase::Camera => *context.camera = follow_camera(context.actor, context.config),
        StepPhase::FallThrough => {
            context.fell_through = fell_through(context.actor, context.config.ground_y);
        }
        StepPhase::Level => {
            context.current_level =
                level_for_altitude(context.actor.position.y, context.config.ground_y);
        }
    }
}

/// Left wins when both directions are held. With neither, velocity decays.
pub(crate) fn apply_controls(actor: &mut Actor, actions: &ActionStates, difficulty: Difficulty) {
    if actions.is_down(InputAction::MoveLeft) {
        actor.velocity.x = -actor.speed * difficulty.sensitivity_multiplier;
    } else if actions.is_down(InputAction::MoveRight) {
        actor.velocity.x = actor.speed * difficulty.sensitivity_multiplier;
    } else {
        actor.velocity.x *= difficulty.friction_reduction;
    }

    if actions.is_down(InputAction::Jump) && actor.on_ground {
        actor.velocity.y = -actor.jump_power * difficulty.jump_sensitivity;
        actor.on_ground = false;
    }
}

pub(crate) fn apply_gravity(actor: &mut Actor, gravity: f32) {
    actor.velocity.y += gravity;
}

pub(crate) fn integrate(actor: &mut Actor) {
    actor.position.x += actor.velocity.x;
    actor.position.y += actor.velocity.y;
}

fn lands_on(actor: &Actor, platform: &Platform) -> bool {
    let bottom = actor.bottom();
    actor.rect().overlaps_horizontally(&platform.rect)
        && bottom > platform.rect.y
        && bottom < platform.rect.bottom() + LANDING_BAND
        && actor.velocity.y > 0.0
}

/// Snaps onto the first platform in sequence order that the descending actor
/// entered from above. Later platforms are never considered once one matches.
pub(crate) fn resolve_platform_landing(actor: &mut Actor, platforms: &[Platform]) -> Option<usize> {
    actor.on_ground = false;
    let index = platforms
        .iter()
        .position(|platform| lands_on(actor, platform))?;
    actor.position.y = platforms[index].rect.y - actor.height;
    actor.velocity.y = 0.0;
    actor.on_ground = true;
    Some(index)
}

pub(crate) fn resolve_ground(actor: &mut Actor, ground_y: f32) {
    if actor.bottom() > ground_y {
        actor.position.y = ground_y - actor.height;
        actor.velocity.y = 0.0;
        actor.on_ground = true;
    }
}

pub(crate) fn reached_goal(actor: &Actor, goal: &Platform) -> bool {
    actor.rect().overlaps_horizontally(&goal.rect)
        && actor.bottom() <= goal.rect.y + GOAL_TOLERANCE
}

pub(crate) fn clamp_to_world(actor: &mut Actor, world_width: f32) {
    let max_x = (world_width - actor.width).max(0.0);
    if actor.position.x < 0.0 {
        actor.position.x = 0.0;
        actor.velocity.x = 0.0;
    } else if actor.position.x > max_x {
        actor.position.x = max_x;
        actor.velocity.x = 0.0;
    }

    if actor.position.y < 0.0 {
        actor.position.y = 0.0;
        actor.velocity.y = 0.0;
    }
}

/// Centers the actor, then pins to the world edges. A viewport larger than the
/// world on an axis pins that axis to 0.
pub(crate) fn follow_camera(actor: &Actor, config: &WorldConfig) -> Camera2D {
    let viewport_width = config.viewport.width as f32;
    let viewport_height = config.viewport.height as f32;
    Camera2D {
        position: Vec2::new(
            pin_to_range(
                actor.position.x - viewport_width / 2.0,
                config.world_width - viewport_width,
            ),
            pin_to_range(
                actor.position.y - viewport_height / 2.0,
                config.ground_y - viewport_height,
            ),
        ),
    }
}

fn pin_to_range(value: f32, max: f32) -> f32 {
    value.min(max).max(0.0)
}

pub(crate) fn fell_through(actor: &Actor, ground_y: f32) -> bool {
    actor.position.y > ground_y + FALL_THROUGH_MARGIN
}

/// 1 at the ground band, one more per 100 units of climb, capped at 4.
pub(crate) fn level_for_altitude(actor_y: f32, ground_y: f32) -> u32 {
    let band = ((ground_y - actor_y) / LEVEL_BAND_HEIGHT).floor() + 1.0;
    if band.is_nan() {
        return 1;
    }
    band.clamp(1.0, MAX_LEVEL as f32) as u32
}
