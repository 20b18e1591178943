use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::tools::{draw_overlay, draw_touch_buttons, OverlayData};
use crate::app::TouchButtonLayout;

use super::frame::{DrawCommand, Outline, RenderFrame, Rgba, TextAlign};
use super::text::{draw_text_clipped, text_width_px};
use super::transform::{world_rect_to_screen_px, PixelRect, Viewport};

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport::new(size.width, size.height),
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport::new(width, height);
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render(
        &mut self,
        render_frame: &RenderFrame,
        touch_buttons: Option<&TouchButtonLayout>,
        overlay_data: Option<&OverlayData>,
    ) -> Result<(), Error> {
        if self.viewport.is_empty() {
            return Ok(());
        }

        let Viewport { width, height } = self.viewport;
        let frame = self.pixels.frame_mut();
        rasterize(frame, width, height, render_frame);
        if let Some(layout) = touch_buttons {
            draw_touch_buttons(frame, width, height, layout);
        }
        if let Some(data) = overlay_data {
            draw_overlay(frame, width, height, data);
        }
        self.pixels.render()
    }
}

/// Paints every command of `render_frame` in order into an RGBA buffer of
/// `width * height` pixels.
pub(crate) fn rasterize(frame: &mut [u8], width: u32, height: u32, render_frame: &RenderFrame) {
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&render_frame.clear_color);
    }

    for command in &render_frame.commands {
        match command {
            DrawCommand::SkyGradient { top, bottom } => {
                draw_vertical_gradient(frame, width, height, *top, *bottom);
            }
            DrawCommand::Rect {
                rect,
                fill,
                outline,
            } => {
                let px = world_rect_to_screen_px(rect, &render_frame.camera);
                draw_outlined_rect(frame, width, height, px, *fill, *outline);
            }
            DrawCommand::Panel {
                rect,
                fill,
                outline,
            } => {
                let px = PixelRect {
                    x: rect.x.round() as i32,
                    y: rect.y.round() as i32,
                    width: rect.width.round() as i32,
                    height: rect.height.round() as i32,
                };
                draw_outlined_rect(frame, width, height, px, *fill, *outline);
            }
            DrawCommand::Text {
                x,
                y,
                text,
                color,
                scale,
                align,
            } => {
                let left = match align {
                    TextAlign::Left => *x,
                    TextAlign::Center => *x - text_width_px(text, *scale) / 2,
                };
                draw_text_clipped(frame, width, height, left, *y, text, *color, *scale);
            }
        }
    }
}

fn draw_vertical_gradient(frame: &mut [u8], width: u32, height: u32, top: Rgba, bottom: Rgba) {
    if width == 0 || height == 0 {
        return;
    }
    let span = height.saturating_sub(1).max(1) as f32;
    for y in 0..height {
        let t = y as f32 / span;
        let color = lerp_rgba(top, bottom, t);
        let row_start = y as usize * width as usize * 4;
        let row_end = row_start + width as usize * 4;
        let Some(row) = frame.get_mut(row_start..row_end) else {
            return;
        };
        for chunk in row.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }
}

fn lerp_rgba(a: Rgba, b: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0u8; 4];
    for channel in 0..4 {
        let value = a[channel] as f32 + (b[channel] as f32 - a[channel] as f32) * t;
        out[channel] = value.round() as u8;
    }
    out
}

/// Fill first, then an outline straddling the edge the way a canvas stroke does.
fn draw_outlined_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    rect: PixelRect,
    fill: Rgba,
    outline: Option<Outline>,
) {
    draw_filled_rect(
        frame,
        width,
        height,
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        fill,
    );
    let Some(outline) = outline else {
        return;
    };
    let inset_out = outline.width_px / 2;
    for ring in 0..outline.width_px.max(0) {
        let offset = inset_out - ring;
        draw_rect_outline(
            frame,
            width,
            height,
            rect.x - offset,
            rect.y - offset,
            rect.width + offset * 2,
            rect.height + offset * 2,
            outline.color,
        );
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_filled_rect(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: Rgba,
) {
    let start_x = x.max(0);
    let start_y = y.max(0);
    let end_x = x.saturating_add(rect_width).min(width as i32);
    let end_y = y.saturating_add(rect_height).min(height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }

    for py in start_y..end_y {
        for px in start_x..end_x {
            blend_pixel(frame, width, height, px, py, color);
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_rect_outline(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: Rgba,
) {
    if rect_width <= 1 || rect_height <= 1 {
        return;
    }
    draw_filled_rect(frame, width, height, x, y, rect_width, 1, color);
    draw_filled_rect(
        frame,
        width,
        height,
        x,
        y + rect_height - 1,
        rect_width,
        1,
        color,
    );
    draw_filled_rect(frame, width, height, x, y, 1, rect_height, color);
    draw_filled_rect(
        frame,
        width,
        height,
        x + rect_width - 1,
        y,
        1,
        rect_height,
        color,
    );
}

/// Writes one pixel, alpha-blending over the existing value when `color` is
/// translucent. Out-of-range coordinates are ignored.
pub(crate) fn blend_pixel(frame: &mut [u8], width: u32, height: u32, x: i32, y: i32, color: Rgba) {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return;
    }
    let Some(pixel_offset) = (y as usize)
        .checked_mul(width as usize)
        .and_then(|row| row.checked_add(x as usize))
    else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(dst) = frame.get_mut(byte_offset..byte_offset + 4) else {
        return;
    };

    match color[3] {
        255 => dst.copy_from_slice(&color),
        0 => {}
        alpha => {
            let a = alpha as u32;
            for channel in 0..3 {
                let blended = (color[channel] as u32 * a + dst[channel] as u32 * (255 - a)) / 255;
                dst[channel] = blended as u8;
            }
            dst[3] = 255;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::rendering::rgb;
    use crate::app::{Camera2D, Rect, Vec2};

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> Rgba {
        let offset = ((y * width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    #[test]
    fn clear_color_fills_whole_buffer() {
        let mut frame = vec![0u8; 8 * 4 * 4];
        let render_frame = RenderFrame::new(Camera2D::default(), rgb(1, 2, 3));
        rasterize(&mut frame, 8, 4, &render_frame);
        assert!(frame.chunks_exact(4).all(|px| px == [1, 2, 3, 255]));
    }

    #[test]
    fn gradient_runs_from_top_to_bottom_color() {
        let mut frame = vec![0u8; 2 * 5 * 4];
        let mut render_frame = RenderFrame::new(Camera2D::default(), rgb(0, 0, 0));
        render_frame.push(DrawCommand::SkyGradient {
            top: rgb(0, 0, 0),
            bottom: rgb(200, 100, 40),
        });
        rasterize(&mut frame, 2, 5, &render_frame);

        assert_eq!(pixel(&frame, 2, 0, 0), rgb(0, 0, 0));
        assert_eq!(pixel(&frame, 2, 1, 4), rgb(200, 100, 40));
        assert_eq!(pixel(&frame, 2, 0, 2), rgb(100, 50, 20));
    }

    #[test]
    fn world_rect_follows_camera_offset() {
        let mut frame = vec![0u8; 20 * 10 * 4];
        let mut render_frame = RenderFrame::new(
            Camera2D {
                position: Vec2::new(100.0, 0.0),
            },
            rgb(0, 0, 0),
        );
        render_frame.push(DrawCommand::Rect {
            rect: Rect::new(105.0, 2.0, 3.0, 3.0),
            fill: rgb(255, 0, 0),
            outline: None,
        });
        rasterize(&mut frame, 20, 10, &render_frame);

        assert_eq!(pixel(&frame, 20, 5, 2), rgb(255, 0, 0));
        assert_eq!(pixel(&frame, 20, 7, 4), rgb(255, 0, 0));
        assert_eq!(pixel(&frame, 20, 8, 4), rgb(0, 0, 0));
        assert_eq!(pixel(&frame, 20, 4, 2), rgb(0, 0, 0));
    }

    #[test]
    fn outline_straddles_rect_edge() {
        let mut frame = vec![0u8; 20 * 20 * 4];
        let mut render_frame = RenderFrame::new(Camera2D::default(), rgb(0, 0, 0));
        render_frame.push(DrawCommand::Panel {
            rect: Rect::new(5.0, 5.0, 10.0, 10.0),
            fill: rgb(10, 10, 10),
            outline: Some(Outline {
                color: rgb(200, 200, 200),
                width_px: 2,
            }),
        });
        rasterize(&mut frame, 20, 20, &render_frame);

        assert_eq!(pixel(&frame, 20, 4, 10), rgb(200, 200, 200));
        assert_eq!(pixel(&frame, 20, 5, 10), rgb(200, 200, 200));
        assert_eq!(pixel(&frame, 20, 6, 10), rgb(10, 10, 10));
        assert_eq!(pixel(&frame, 20, 3, 10), rgb(0, 0, 0));
    }

    #[test]
    fn translucent_fill_blends_over_existing_pixels() {
        let mut frame = vec![0u8; 4];
        blend_pixel(&mut frame, 1, 1, 0, 0, [255, 255, 255, 255]);
        blend_pixel(&mut frame, 1, 1, 0, 0, [0, 0, 0, 51]);
        assert_eq!(pixel(&frame, 1, 0, 0), [204, 204, 204, 255]);
    }

    #[test]
    fn offscreen_geometry_is_clipped_safely() {
        let mut frame = vec![0u8; 3 * 3 * 4];
        let mut render_frame = RenderFrame::new(Camera2D::default(), rgb(0, 0, 0));
        render_frame.push(DrawCommand::Rect {
            rect: Rect::new(-50.0, -50.0, 500.0, 500.0),
            fill: rgb(9, 9, 9),
            outline: Some(Outline {
                color: rgb(1, 1, 1),
                width_px: 2,
            }),
        });
        render_frame.centered_text(1, -2, "CLIPPED", rgb(255, 255, 255), 4);
        rasterize(&mut frame, 3, 3, &render_frame);
        assert_eq!(frame.len(), 36);
    }
}
