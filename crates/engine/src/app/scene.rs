use super::input::{ActionStates, InputAction};
use super::rendering::{RenderFrame, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    actions: ActionStates,
    restart_pressed: bool,
    pointer_pressed: bool,
    viewport_width: u32,
    viewport_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        actions: ActionStates,
        restart_pressed: bool,
        pointer_pressed: bool,
        viewport: Viewport,
    ) -> Self {
        Self {
            actions,
            restart_pressed,
            pointer_pressed,
            viewport_width: viewport.width,
            viewport_height: viewport.height,
        }
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn actions(&self) -> &ActionStates {
        &self.actions
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_restart_pressed(mut self, restart_pressed: bool) -> Self {
        self.restart_pressed = restart_pressed;
        self
    }

    pub fn with_pointer_pressed(mut self, pointer_pressed: bool) -> Self {
        self.pointer_pressed = pointer_pressed;
        self
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport_width = viewport.width;
        self.viewport_height = viewport.height;
        self
    }

    /// Restart key went down since the previous tick.
    pub fn restart_pressed(&self) -> bool {
        self.restart_pressed
    }

    /// Mouse button or touch went down since the previous tick.
    pub fn pointer_pressed(&self) -> bool {
        self.pointer_pressed
    }

    /// Zero until the loop has reported a window size.
    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.viewport_width,
            height: self.viewport_height,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner, y growing downward.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap on the x axis; touching edges do not count.
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.right() > other.x && self.x < other.right()
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// World-space top-left corner of the visible viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
}

pub trait Scene {
    fn load(&mut self);
    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand;
    fn render(&self) -> RenderFrame;
    fn unload(&mut self);
    fn debug_title(&self) -> Option<String> {
        None
    }
    fn debug_lines(&self) -> Vec<String> {
        Vec::new()
    }
}
