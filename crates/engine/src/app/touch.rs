use std::collections::HashMap;
use std::str::FromStr;
use std::time::{Duration, Instant};

use super::input::{InputAction, InputLatch, InputSource};
use super::rendering::Viewport;
use super::Rect;

/// How long a tap on the on-screen jump button keeps Jump asserted.
pub const JUMP_PULSE: Duration = Duration::from_millis(100);

/// Monitors at or below this width get the compact layout in `Auto` mode.
pub const COMPACT_SCREEN_MAX_WIDTH: u32 = 768;
const COMPACT_WIDTH_MARGIN_PX: u32 = 40;
const COMPACT_HEIGHT_FRACTION: f32 = 0.6;
const BUTTON_MARGIN_PX: f32 = 16.0;
const BUTTON_GAP_PX: f32 = 12.0;
const BUTTON_MIN_SIZE_PX: f32 = 40.0;
const BUTTON_MAX_SIZE_PX: f32 = 80.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TouchControls {
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for TouchControls {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" | "on" | "1" => Ok(Self::Always),
            "never" | "off" | "0" => Ok(Self::Never),
            other => Err(format!(
                "unknown touch controls mode '{other}' (expected auto|always|never)"
            )),
        }
    }
}

/// Window size and whether on-screen buttons are shown, decided once at
/// startup from the requested size and the primary monitor.
pub fn resolve_window_layout(
    mode: TouchControls,
    requested: Viewport,
    monitor_size: Option<(u32, u32)>,
) -> (Viewport, bool) {
    let compact = match mode {
        TouchControls::Always => true,
        TouchControls::Never => false,
        TouchControls::Auto => {
            matches!(monitor_size, Some((width, _)) if width <= COMPACT_SCREEN_MAX_WIDTH)
        }
    };
    if !compact {
        return (requested, false);
    }

    let Some((screen_width, screen_height)) = monitor_size else {
        return (requested, true);
    };
    let width = screen_width
        .saturating_sub(COMPACT_WIDTH_MARGIN_PX)
        .min(requested.width)
        .max(1);
    let height = ((screen_height as f32 * COMPACT_HEIGHT_FRACTION) as u32)
        .min(requested.height)
        .max(1);
    (Viewport::new(width, height), true)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchButton {
    Left,
    Right,
    Jump,
}

impl TouchButton {
    pub fn label(self) -> &'static str {
        match self {
            TouchButton::Left => "<",
            TouchButton::Right => ">",
            TouchButton::Jump => "JUMP",
        }
    }
}

/// Screen-space placement of the on-screen buttons along the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchButtonLayout {
    buttons: [(TouchButton, Rect); 3],
}

impl TouchButtonLayout {
    pub fn for_viewport(viewport: Viewport) -> Self {
        let width = viewport.width as f32;
        let height = viewport.height as f32;
        let size = (width.min(height) / 7.0).clamp(BUTTON_MIN_SIZE_PX, BUTTON_MAX_SIZE_PX);
        let top = height - BUTTON_MARGIN_PX - size;
        let jump_width = size * 1.5;
        Self {
            buttons: [
                (
                    TouchButton::Left,
                    Rect::new(BUTTON_MARGIN_PX, top, size, size),
                ),
                (
                    TouchButton::Right,
                    Rect::new(BUTTON_MARGIN_PX + size + BUTTON_GAP_PX, top, size, size),
                ),
                (
                    TouchButton::Jump,
                    Rect::new(width - BUTTON_MARGIN_PX - jump_width, top, jump_width, size),
                ),
            ],
        }
    }

    pub fn buttons(&self) -> &[(TouchButton, Rect)] {
        &self.buttons
    }

    pub fn hit_test(&self, x: f32, y: f32) -> Option<TouchButton> {
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains_point(x, y))
            .map(|(button, _)| *button)
    }
}

/// Pointer id used for the mouse. Touch ids come from the platform.
pub(crate) const MOUSE_POINTER_ID: u64 = u64::MAX;

/// On-screen button state per pointer. Left/Right stay held while the finger
/// that pressed them is down; Jump is a fixed-length pulse.
#[derive(Debug, Default)]
pub(crate) struct TouchPointer {
    held: HashMap<u64, TouchButton>,
    jump_release_at: Option<Instant>,
}

impl TouchPointer {
    pub(crate) fn press(
        &mut self,
        pointer_id: u64,
        layout: &TouchButtonLayout,
        x: f32,
        y: f32,
        now: Instant,
        latch: &InputLatch,
    ) -> Option<TouchButton> {
        let button = layout.hit_test(x, y)?;
        match button {
            TouchButton::Left | TouchButton::Right => {
                self.release(pointer_id, latch);
                self.held.insert(pointer_id, button);
                latch.set_active(hold_action(button), InputSource::Touch, true);
            }
            TouchButton::Jump => {
                latch.set_active(InputAction::Jump, InputSource::Touch, true);
                self.jump_release_at = Some(now + JUMP_PULSE);
            }
        }
        Some(button)
    }

    /// One pointer lifted or left the window. Its button stays asserted while
    /// another pointer still holds it; the jump pulse runs out on its own.
    pub(crate) fn release(&mut self, pointer_id: u64, latch: &InputLatch) {
        let Some(button) = self.held.remove(&pointer_id) else {
            return;
        };
        if !self.held.values().any(|other| *other == button) {
            latch.set_active(hold_action(button), InputSource::Touch, false);
        }
    }

    pub(crate) fn release_all(&mut self, latch: &InputLatch) {
        for (_, button) in self.held.drain() {
            latch.set_active(hold_action(button), InputSource::Touch, false);
        }
    }

    pub(crate) fn expire_pulse(&mut self, now: Instant, latch: &InputLatch) {
        match self.jump_release_at {
            Some(release_at) if now >= release_at => {
                latch.set_active(InputAction::Jump, InputSource::Touch, false);
                self.jump_release_at = None;
            }
            _ => {}
        }
    }
}

fn hold_action(button: TouchButton) -> InputAction {
    match button {
        TouchButton::Left => InputAction::MoveLeft,
        TouchButton::Right => InputAction::MoveRight,
        TouchButton::Jump => InputAction::Jump,
    }
}
