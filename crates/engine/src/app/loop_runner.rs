use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, MouseButton, TouchPhase, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::metrics::LoopMetrics;
use super::touch::{resolve_window_layout, TouchPointer, MOUSE_POINTER_ID};
use super::{
    InputAction, InputLatch, InputSnapshot, InputSource, OverlayData, Renderer, Scene,
    SceneCommand, TouchButtonLayout, TouchControls, Vec2, Viewport,
};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Simulation constants are tuned per tick, so this is also the game speed.
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    pub max_render_fps: Option<u32>,
    pub touch_controls: TouchControls,
    pub show_debug_overlay: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Sky Climb".to_string(),
            window_width: 800,
            window_height: 600,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            max_render_fps: None,
            touch_controls: TouchControls::Auto,
            show_debug_overlay: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Runs the window loop until the scene or the window asks to quit. Input
/// callbacks write the latch; every tick reads it once.
pub fn run_app(config: LoopConfig, mut scene: Box<dyn Scene>) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let monitor_size = event_loop.primary_monitor().map(|monitor| {
        let size = monitor.size();
        (size.width, size.height)
    });
    let (window_size, touch_enabled) = resolve_window_layout(
        config.touch_controls,
        Viewport::new(config.window_width, config.window_height),
        monitor_size,
    );
    info!(
        width = window_size.width,
        height = window_size.height,
        touch_enabled,
        monitor = ?monitor_size,
        "startup"
    );

    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                window_size.width as f64,
                window_size.height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();
    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);
    let mut input_collector =
        InputCollector::new(InputLatch::new(), renderer.viewport(), touch_enabled);
    scene.load();

    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        render_fps_cap = %format_render_cap(effective_render_cap),
        "loop_config"
    );

    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut metrics = LoopMetrics::new(metrics_log_interval, Instant::now());
    let mut last_applied_title: Option<String> = None;
    let mut overlay_visible = config.show_debug_overlay;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                    input_collector.set_viewport(renderer.viewport());
                }
                WindowEvent::Focused(false) => {
                    input_collector.handle_focus_lost();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input_collector.set_cursor_position_px(position.x as f32, position.y as f32);
                }
                WindowEvent::CursorLeft { .. } => {
                    input_collector.handle_cursor_left();
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    input_collector.handle_mouse_input(button, state, Instant::now());
                }
                WindowEvent::Touch(touch) => {
                    input_collector.handle_touch(
                        touch.id,
                        touch.phase,
                        touch.location.x as f32,
                        touch.location.y as f32,
                        Instant::now(),
                    );
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(event.physical_key, event.state);
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    input_collector.expire_touch_pulse(now);
                    if input_collector.take_overlay_toggle_pressed() {
                        overlay_visible = !overlay_visible;
                        info!(overlay_visible, "overlay_toggled");
                    }

                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    let clamped_frame_dt = clamp_frame_delta(raw_frame_dt, max_frame_delta);
                    accumulator = accumulator.saturating_add(clamped_frame_dt);

                    let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                    let mut ticks_run = 0u32;
                    for _ in 0..step_plan.ticks_to_run {
                        let input_snapshot = input_collector.snapshot_for_tick();
                        let step_start = Instant::now();
                        let command = scene.update(fixed_dt_seconds, &input_snapshot);
                        metrics.record_step(step_start.elapsed());
                        ticks_run += 1;
                        if command == SceneCommand::Quit {
                            info!(reason = "scene_command", "shutdown_requested");
                            window_target.exit();
                            break;
                        }
                    }
                    accumulator = step_plan.remaining_accumulator;

                    if step_plan.dropped_backlog > Duration::ZERO {
                        let dropped_ticks = dropped_tick_count(step_plan.dropped_backlog, fixed_dt);
                        metrics.record_dropped_ticks(dropped_ticks);
                        warn!(
                            dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                            dropped_ticks,
                            max_ticks_per_frame,
                            "sim_clamp_triggered"
                        );
                    }

                    let elapsed_since_last_present =
                        Instant::now().saturating_duration_since(last_present_instant);
                    let cap_sleep =
                        compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }

                    let render_frame = scene.render();
                    let overlay = overlay_visible.then(|| OverlayData {
                        metrics: metrics.latest(),
                        render_fps_cap: effective_render_cap,
                        touch_controls: touch_enabled,
                        scene_lines: scene.debug_lines(),
                    });
                    if let Err(error) = renderer.render(
                        &render_frame,
                        input_collector.touch_layout.as_ref(),
                        overlay.as_ref(),
                    ) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    last_present_instant = Instant::now();

                    let next_title = scene.debug_title();
                    if next_title != last_applied_title {
                        match &next_title {
                            Some(title) => window.set_title(title),
                            None => window.set_title(&config.window_title),
                        }
                        last_applied_title = next_title;
                    }
                    metrics.record_frame(raw_frame_dt, ticks_run);

                    if let Some(snapshot) = metrics.roll_window(now) {
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            step_time_ms = snapshot.step_time_ms,
                            peak_ticks_per_frame = snapshot.peak_ticks_per_frame,
                            dropped_ticks = snapshot.dropped_ticks,
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                scene.unload();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

/// Maps a physical key to the logical action it drives and the latch source
/// slot it owns. Arrow keys and WASD are independent writers of the same action.
fn key_binding(key: PhysicalKey) -> Option<(InputAction, InputSource)> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let (action, slot) = match code {
        KeyCode::ArrowLeft => (InputAction::MoveLeft, 0),
        KeyCode::KeyA => (InputAction::MoveLeft, 1),
        KeyCode::ArrowRight => (InputAction::MoveRight, 0),
        KeyCode::KeyD => (InputAction::MoveRight, 1),
        KeyCode::ArrowUp => (InputAction::Jump, 0),
        KeyCode::KeyW => (InputAction::Jump, 1),
        KeyCode::Space => (InputAction::Jump, 2),
        KeyCode::Enter => (InputAction::Restart, 0),
        KeyCode::KeyR => (InputAction::Restart, 1),
        KeyCode::Escape => (InputAction::Quit, 0),
        _ => return None,
    };
    Some((action, InputSource::Key(slot)))
}

fn is_overlay_toggle_key(key: PhysicalKey) -> bool {
    matches!(key, PhysicalKey::Code(KeyCode::F3))
}

struct InputCollector {
    latch: InputLatch,
    pointer: TouchPointer,
    touch_layout: Option<TouchButtonLayout>,
    restart_pressed_edge: bool,
    pointer_pressed_edge: bool,
    overlay_toggle_is_down: bool,
    overlay_toggle_pressed_edge: bool,
    cursor_position_px: Option<Vec2>,
    viewport: Viewport,
}

impl InputCollector {
    fn new(latch: InputLatch, viewport: Viewport, touch_enabled: bool) -> Self {
        Self {
            latch,
            pointer: TouchPointer::default(),
            touch_layout: touch_enabled.then(|| TouchButtonLayout::for_viewport(viewport)),
            restart_pressed_edge: false,
            pointer_pressed_edge: false,
            overlay_toggle_is_down: false,
            overlay_toggle_pressed_edge: false,
            cursor_position_px: None,
            viewport,
        }
    }

    fn handle_keyboard_input(&mut self, key: PhysicalKey, state: ElementState) {
        self.handle_overlay_toggle_key_state(is_overlay_toggle_key(key), state);

        let Some((action, source)) = key_binding(key) else {
            return;
        };
        let is_pressed = state == ElementState::Pressed;
        let latch = &self.latch;
        if is_pressed && action == InputAction::Restart && !latch.is_active(action) {
            self.restart_pressed_edge = true;
        }
        latch.set_active(action, source, is_pressed);
    }

    fn handle_overlay_toggle_key_state(&mut self, is_toggle_key: bool, state: ElementState) {
        if !is_toggle_key {
            return;
        }

        match state {
            ElementState::Pressed => {
                if !self.overlay_toggle_is_down {
                    self.overlay_toggle_pressed_edge = true;
                }
                self.overlay_toggle_is_down = true;
            }
            ElementState::Released => self.overlay_toggle_is_down = false,
        }
    }

    fn take_overlay_toggle_pressed(&mut self) -> bool {
        let was_pressed = self.overlay_toggle_pressed_edge;
        self.overlay_toggle_pressed_edge = false;
        was_pressed
    }

    fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState, now: Instant) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => {
                if let Some(cursor) = self.cursor_position_px {
                    self.pointer_down(MOUSE_POINTER_ID, cursor.x, cursor.y, now);
                } else {
                    self.pointer_pressed_edge = true;
                }
            }
            ElementState::Released => self.pointer.release(MOUSE_POINTER_ID, &self.latch),
        }
    }

    /// Each finger is its own pointer; lifting one never releases another's hold.
    fn handle_touch(&mut self, finger_id: u64, phase: TouchPhase, x: f32, y: f32, now: Instant) {
        match phase {
            TouchPhase::Started => self.pointer_down(finger_id, x, y, now),
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.pointer.release(finger_id, &self.latch);
            }
            TouchPhase::Moved => {}
        }
    }

    fn pointer_down(&mut self, pointer_id: u64, x: f32, y: f32, now: Instant) {
        self.pointer_pressed_edge = true;
        if let Some(layout) = self.touch_layout.as_ref() {
            self.pointer.press(pointer_id, layout, x, y, now, &self.latch);
        }
    }

    fn handle_cursor_left(&mut self) {
        self.cursor_position_px = None;
        self.pointer.release(MOUSE_POINTER_ID, &self.latch);
    }

    fn handle_focus_lost(&mut self) {
        self.latch.release_all_keys();
        self.pointer.release_all(&self.latch);
        self.overlay_toggle_is_down = false;
    }

    fn expire_touch_pulse(&mut self, now: Instant) {
        self.pointer.expire_pulse(now, &self.latch);
    }

    fn set_cursor_position_px(&mut self, x: f32, y: f32) {
        self.cursor_position_px = Some(Vec2 { x, y });
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.touch_layout.is_some() {
            self.touch_layout = Some(TouchButtonLayout::for_viewport(viewport));
        }
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::new(
            self.latch.snapshot(),
            self.restart_pressed_edge,
            self.pointer_pressed_edge,
            self.viewport,
        );
        self.restart_pressed_edge = false;
        self.pointer_pressed_edge = false;
        snapshot
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn dropped_tick_count(backlog: Duration, fixed_dt: Duration) -> u32 {
    if fixed_dt.is_zero() {
        return 0;
    }
    (backlog.as_nanos() / fixed_dt.as_nanos()).min(u32::MAX as u128) as u32
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}
