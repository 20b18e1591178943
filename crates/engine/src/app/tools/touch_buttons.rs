use crate::app::rendering::{
    draw_filled_rect, draw_rect_outline, draw_text_clipped, text_width_px, Rgba, GLYPH_HEIGHT,
};
use crate::app::TouchButtonLayout;

const BUTTON_FILL_COLOR: Rgba = [44, 62, 80, 150];
const BUTTON_BORDER_COLOR: Rgba = [236, 240, 241, 220];
const BUTTON_LABEL_COLOR: Rgba = [255, 255, 255, 255];
const BUTTON_LABEL_SCALE: i32 = 3;

pub(crate) fn draw_touch_buttons(
    frame: &mut [u8],
    width: u32,
    height: u32,
    layout: &TouchButtonLayout,
) {
    for (button, rect) in layout.buttons() {
        let x = rect.x.round() as i32;
        let y = rect.y.round() as i32;
        let w = rect.width.round() as i32;
        let h = rect.height.round() as i32;
        draw_filled_rect(frame, width, height, x, y, w, h, BUTTON_FILL_COLOR);
        draw_rect_outline(frame, width, height, x, y, w, h, BUTTON_BORDER_COLOR);

        let label = button.label();
        let label_x = x + (w - text_width_px(label, BUTTON_LABEL_SCALE)) / 2;
        let label_y = y + (h - GLYPH_HEIGHT * BUTTON_LABEL_SCALE) / 2;
        draw_text_clipped(
            frame,
            width,
            height,
            label_x,
            label_y,
            label,
            BUTTON_LABEL_COLOR,
            BUTTON_LABEL_SCALE,
        );
    }
}
