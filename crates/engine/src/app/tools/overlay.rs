use crate::app::rendering::{
    draw_filled_rect, draw_rect_outline, draw_text_clipped, text_width_px, Rgba, GLYPH_HEIGHT,
};
use crate::app::metrics::LoopMetricsSnapshot;

const TEXT_SCALE: i32 = 2;
const LINE_ADVANCE: i32 = (GLYPH_HEIGHT + 2) * TEXT_SCALE;
const OVERLAY_PADDING: i32 = 6 * TEXT_SCALE;
const OVERLAY_PANEL_INSET_X: i32 = 4 * TEXT_SCALE;
const OVERLAY_PANEL_INSET_Y: i32 = 3 * TEXT_SCALE;
const OVERLAY_TEXT_PRIMARY_COLOR: Rgba = [244, 248, 252, 255];
const OVERLAY_TEXT_DIM_COLOR: Rgba = [176, 198, 220, 255];
const OVERLAY_PANEL_BG_COLOR: Rgba = [10, 12, 16, 210];
const OVERLAY_PANEL_BORDER_COLOR: Rgba = [92, 106, 126, 255];
const PERF_SECTION_LABEL: &str = "Perf";
const SCENE_SECTION_LABEL: &str = "Scene";

#[derive(Debug, Clone)]
pub(crate) struct OverlayData {
    pub metrics: LoopMetricsSnapshot,
    pub render_fps_cap: Option<u32>,
    pub touch_controls: bool,
    pub scene_lines: Vec<String>,
}

/// Debug panel anchored to the top-right corner, toggled with F3.
pub(crate) fn draw_overlay(frame: &mut [u8], width: u32, height: u32, data: &OverlayData) {
    if width == 0 || height == 0 {
        return;
    }

    let lines = build_overlay_lines(data);
    let longest_line_px = lines
        .iter()
        .map(|line| text_width_px(line, TEXT_SCALE))
        .max()
        .unwrap_or(0);
    let panel_width = longest_line_px + OVERLAY_PANEL_INSET_X * 2;
    let panel_height = lines.len() as i32 * LINE_ADVANCE + OVERLAY_PANEL_INSET_Y * 2;
    let panel_left = width as i32 - OVERLAY_PADDING - panel_width;
    let panel_top = OVERLAY_PADDING - OVERLAY_PANEL_INSET_Y;
    draw_filled_rect(
        frame,
        width,
        height,
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        OVERLAY_PANEL_BG_COLOR,
    );
    draw_rect_outline(
        frame,
        width,
        height,
        panel_left,
        panel_top,
        panel_width,
        panel_height,
        OVERLAY_PANEL_BORDER_COLOR,
    );

    let text_left = panel_left + OVERLAY_PANEL_INSET_X;
    let mut y = OVERLAY_PADDING;
    for line in lines {
        let color = overlay_line_color(&line);
        draw_text_clipped(frame, width, height, text_left, y, &line, color, TEXT_SCALE);
        y += LINE_ADVANCE;
    }
}

fn build_overlay_lines(data: &OverlayData) -> Vec<String> {
    let mut lines = vec![
        PERF_SECTION_LABEL.to_string(),
        format_fps_line(data.metrics.fps, data.render_fps_cap),
        format!("TPS: {:.1}", data.metrics.tps),
        format!("Frame: {:.2} ms", data.metrics.frame_time_ms),
        format!("Step: {:.2} ms", data.metrics.step_time_ms),
        format!(
            "Catch-up: {}/frame, {} dropped",
            data.metrics.peak_ticks_per_frame, data.metrics.dropped_ticks
        ),
        format!("Touch: {}", if data.touch_controls { "on" } else { "off" }),
    ];

    if !data.scene_lines.is_empty() {
        lines.push(String::new());
        lines.push(SCENE_SECTION_LABEL.to_string());
        lines.extend(data.scene_lines.iter().cloned());
    }

    lines
}

fn overlay_line_color(line: &str) -> Rgba {
    if matches!(line, PERF_SECTION_LABEL | SCENE_SECTION_LABEL) {
        OVERLAY_TEXT_DIM_COLOR
    } else {
        OVERLAY_TEXT_PRIMARY_COLOR
    }
}

fn format_fps_line(current_fps: f32, cap: Option<u32>) -> String {
    let cap_text = match cap {
        Some(value) => value.to_string(),
        None => "inf".to_string(),
    };
    format!("[{:.0} / {}]", current_fps, cap_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data(scene_lines: Vec<String>) -> OverlayData {
        OverlayData {
            metrics: LoopMetricsSnapshot {
                fps: 59.6,
                tps: 60.0,
                frame_time_ms: 16.7,
                step_time_ms: 0.4,
                peak_ticks_per_frame: 1,
                dropped_ticks: 0,
            },
            render_fps_cap: None,
            touch_controls: false,
            scene_lines,
        }
    }

    #[test]
    fn fps_line_formats_cap_on_and_off() {
        assert_eq!(format_fps_line(59.6, Some(60)), "[60 / 60]");
        assert_eq!(format_fps_line(143.2, None), "[143 / inf]");
    }

    #[test]
    fn scene_section_only_when_scene_reports_lines() {
        assert!(!build_overlay_lines(&sample_data(Vec::new()))
            .iter()
            .any(|line| line == SCENE_SECTION_LABEL));

        let lines = build_overlay_lines(&sample_data(vec!["pos: 1,2".to_string()]));
        assert_eq!(lines.last().map(String::as_str), Some("pos: 1,2"));
        assert!(lines.iter().any(|line| line == SCENE_SECTION_LABEL));
    }

    #[test]
    fn perf_section_reports_step_cost_and_catch_up() {
        let lines = build_overlay_lines(&sample_data(Vec::new()));
        assert!(lines.contains(&"Step: 0.40 ms".to_string()));
        assert!(lines.contains(&"Catch-up: 1/frame, 0 dropped".to_string()));
    }

    #[test]
    fn draw_overlay_writes_backing_plate_near_top_right() {
        let width = 400;
        let height = 200;
        let mut frame = vec![0u8; (width * height * 4) as usize];
        draw_overlay(&mut frame, width, height, &sample_data(Vec::new()));

        let top_right = ((OVERLAY_PADDING as u32 * width + width - OVERLAY_PADDING as u32 - 2)
            * 4) as usize;
        let top_left = ((OVERLAY_PADDING as u32 * width + 2) * 4) as usize;
        assert_ne!(&frame[top_right..top_right + 4], &[0, 0, 0, 0]);
        assert_eq!(&frame[top_left..top_left + 4], &[0, 0, 0, 0]);
    }

    #[test]
    fn tiny_viewports_never_panic() {
        for (width, height) in [(1, 1), (3, 2), (16, 4)] {
            let mut frame = vec![0u8; (width * height * 4) as usize];
            draw_overlay(&mut frame, width, height, &sample_data(vec!["x".into()]));
        }
    }
}
