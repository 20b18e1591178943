pub mod app;

pub use app::{
    resolve_window_layout, rgb, run_app, text_width_px, world_rect_to_screen_px,
    world_to_screen_px, ActionStates, AppError, Camera2D, DrawCommand, InputAction, InputLatch,
    InputSnapshot, InputSource, LoopConfig, Outline, PixelRect, Rect, RenderFrame, Renderer, Rgba,
    Scene, SceneCommand, TextAlign, TouchButton, TouchButtonLayout, TouchControls, Vec2,
    Viewport, GLYPH_HEIGHT, JUMP_PULSE,
};
