mod frame;
mod renderer;
mod text;
mod transform;

pub use frame::{rgb, DrawCommand, Outline, RenderFrame, Rgba, TextAlign};
pub use renderer::Renderer;
pub(crate) use renderer::{draw_filled_rect, draw_rect_outline};
pub use text::{text_width_px, GLYPH_HEIGHT};
pub(crate) use text::draw_text_clipped;
pub use transform::{world_rect_to_screen_px, world_to_screen_px, PixelRect, Viewport};
