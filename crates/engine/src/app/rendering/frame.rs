use crate::app::{Camera2D, Rect};

pub type Rgba = [u8; 4];

pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    [r, g, b, 255]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outline {
    pub color: Rgba,
    pub width_px: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

/// One drawing step. `Rect` is in world space and follows the frame camera;
/// everything else is in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SkyGradient {
        top: Rgba,
        bottom: Rgba,
    },
    Rect {
        rect: Rect,
        fill: Rgba,
        outline: Option<Outline>,
    },
    Panel {
        rect: Rect,
        fill: Rgba,
        outline: Option<Outline>,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        color: Rgba,
        scale: i32,
        align: TextAlign,
    },
}

/// Read-only description of a frame, built by the scene after its tick and
/// consumed by the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    pub camera: Camera2D,
    pub clear_color: Rgba,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    pub fn new(camera: Camera2D, clear_color: Rgba) -> Self {
        Self {
            camera,
            clear_color,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn text(&mut self, x: i32, y: i32, text: impl Into<String>, color: Rgba, scale: i32) {
        self.push(DrawCommand::Text {
            x,
            y,
            text: text.into(),
            color,
            scale,
            align: TextAlign::Left,
        });
    }

    pub fn centered_text(
        &mut self,
        center_x: i32,
        y: i32,
        text: impl Into<String>,
        color: Rgba,
        scale: i32,
    ) {
        self.push(DrawCommand::Text {
            x: center_x,
            y,
            text: text.into(),
            color,
            scale,
            align: TextAlign::Center,
        });
    }
}
