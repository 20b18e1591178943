use crate::app::{Camera2D, Rect, Vec2};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Integer screen rectangle, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

pub fn world_to_screen_px(world: Vec2, camera: &Camera2D) -> (i32, i32) {
    let x = world.x - camera.position.x;
    let y = world.y - camera.position.y;
    (x.round() as i32, y.round() as i32)
}

/// Edges are rounded independently so rects sharing an edge in world space
/// share it on screen as well.
pub fn world_rect_to_screen_px(rect: &Rect, camera: &Camera2D) -> PixelRect {
    let (left, top) = world_to_screen_px(Vec2::new(rect.x, rect.y), camera);
    let (right, bottom) = world_to_screen_px(Vec2::new(rect.right(), rect.bottom()), camera);
    PixelRect {
        x: left,
        y: top,
        width: right - left,
        height: bottom - top,
    }
}
