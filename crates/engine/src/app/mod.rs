mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod tools;
mod touch;

pub use input::{ActionStates, InputAction, InputLatch, InputSource, MAX_KEY_SLOT};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use rendering::{
    rgb, text_width_px, world_rect_to_screen_px, world_to_screen_px, DrawCommand, Outline,
    PixelRect, RenderFrame, Renderer, Rgba, TextAlign, Viewport, GLYPH_HEIGHT,
};
pub use scene::{Camera2D, InputSnapshot, Rect, Scene, SceneCommand, Vec2};
pub(crate) use tools::OverlayData;
pub use touch::{
    resolve_window_layout, TouchButton, TouchButtonLayout, TouchControls,
    COMPACT_SCREEN_MAX_WIDTH, JUMP_PULSE,
};
