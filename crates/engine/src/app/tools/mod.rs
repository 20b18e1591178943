mod overlay;
mod touch_buttons;

pub(crate) use overlay::{draw_overlay, OverlayData};
pub(crate) use touch_buttons::draw_touch_buttons;
