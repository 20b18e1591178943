use engine::{
    rgb, text_width_px, DrawCommand, Outline, Rect, RenderFrame, Rgba, Viewport, GLYPH_HEIGHT,
};

use super::snapshot::WorldSnapshot;

const SKY_TOP: Rgba = rgb(0x87, 0xCE, 0xEB);
const SKY_BOTTOM: Rgba = rgb(0xE0, 0xF6, 0xFF);
const GROUND_COLOR: Rgba = rgb(0x8B, 0x45, 0x13);
const INK: Rgba = rgb(0x2C, 0x3E, 0x50);
const EDGE: Outline = Outline {
    color: INK,
    width_px: 2,
};
const TIER_CALM: Rgba = rgb(0x4E, 0xCD, 0xC4);
const TIER_WARN: Rgba = rgb(0xFE, 0xCA, 0x57);
const TIER_DANGER: Rgba = rgb(0xFF, 0x6B, 0x6B);
const PANEL_FILL: Rgba = [20, 26, 36, 225];
const PANEL_EDGE: Outline = Outline {
    color: rgb(0xFD, 0x79, 0xA8),
    width_px: 3,
};
const PANEL_TEXT: Rgba = rgb(0xF4, 0xF8, 0xFC);

/// Eyes then mouth, as (dx, dy, width, height) from the actor's top-left.
const FACE_MARKS: [(f32, f32, f32, f32); 3] = [
    (8.0, 8.0, 4.0, 4.0),
    (18.0, 8.0, 4.0, 4.0),
    (10.0, 20.0, 10.0, 2.0),
];

const HUD_MARGIN: i32 = 16;
const FOOTER_TEXT: &str = "JUMP THROUGH THE FLOOR LEVELS TO REACH THE TOP!";
const WIN_TITLE: &str = "CONGRATULATIONS!";
const WIN_SUBTITLE: &str = "YOU REACHED THE TOP!";
const RESTART_PROMPT: &str = "PRESS R OR TAP TO PLAY AGAIN";

pub(crate) fn difficulty_label(level: u32) -> &'static str {
    match level {
        0 | 1 => "Normal",
        2 => "Getting Slippery",
        3 => "Very Slippery",
        _ => "SUPER SLIPPERY",
    }
}

pub(crate) fn difficulty_color(level: u32) -> Rgba {
    match level {
        0 | 1 => TIER_CALM,
        2 => TIER_WARN,
        _ => TIER_DANGER,
    }
}

pub(crate) fn format_climb_time(ticks: u64, tick_seconds: f32) -> String {
    let seconds = ticks as f64 * tick_seconds as f64;
    format!("TIME: {seconds:.1}s")
}

/// Builds the full frame: world layers under the camera, then screen-space HUD.
pub(crate) fn build_frame(snapshot: &WorldSnapshot, tick_seconds: f32) -> RenderFrame {
    let mut frame = RenderFrame::new(snapshot.camera, SKY_BOTTOM);
    frame.push(DrawCommand::SkyGradient {
        top: SKY_TOP,
        bottom: SKY_BOTTOM,
    });

    for platform in snapshot.platforms.iter() {
        frame.push(DrawCommand::Rect {
            rect: platform.rect,
            fill: platform.color,
            outline: Some(EDGE),
        });
    }
    frame.push(DrawCommand::Rect {
        rect: snapshot.ground,
        fill: GROUND_COLOR,
        outline: None,
    });

    let actor = snapshot.actor.rect();
    frame.push(DrawCommand::Rect {
        rect: actor,
        fill: snapshot.actor_color,
        outline: Some(EDGE),
    });
    for (dx, dy, width, height) in FACE_MARKS {
        frame.push(DrawCommand::Rect {
            rect: Rect::new(actor.x + dx, actor.y + dy, width, height),
            fill: INK,
            outline: None,
        });
    }

    push_level_readout(&mut frame, snapshot.current_level);
    push_footer(&mut frame, snapshot.viewport);
    if snapshot.game_won() {
        push_victory_panel(&mut frame, snapshot, tick_seconds);
    }
    frame
}

fn push_level_readout(frame: &mut RenderFrame, level: u32) {
    let scale = 3;
    frame.text(HUD_MARGIN, HUD_MARGIN, format!("LEVEL: {level}"), INK, scale);
    frame.text(
        HUD_MARGIN,
        HUD_MARGIN + (GLYPH_HEIGHT + 3) * scale,
        difficulty_label(level),
        difficulty_color(level),
        2,
    );
}

fn push_footer(frame: &mut RenderFrame, viewport: Viewport) {
    let width = viewport.width as i32;
    let scale = if text_width_px(FOOTER_TEXT, 2) <= width - HUD_MARGIN * 2 {
        2
    } else {
        1
    };
    let y = viewport.height as i32 - HUD_MARGIN - GLYPH_HEIGHT * scale;
    frame.centered_text(width / 2, y, FOOTER_TEXT, INK, scale);
}

fn push_victory_panel(frame: &mut RenderFrame, snapshot: &WorldSnapshot, tick_seconds: f32) {
    let viewport_width = snapshot.viewport.width as f32;
    let viewport_height = snapshot.viewport.height as f32;
    let panel_width = (viewport_width - 40.0).clamp(1.0, 440.0);
    let panel_height = 190.0_f32.min(viewport_height - 20.0).max(1.0);
    let panel = Rect::new(
        (viewport_width - panel_width) / 2.0,
        (viewport_height - panel_height) / 2.0,
        panel_width,
        panel_height,
    );
    frame.push(DrawCommand::Panel {
        rect: panel,
        fill: PANEL_FILL,
        outline: Some(PANEL_EDGE),
    });

    let center_x = (panel.x + panel.width / 2.0).round() as i32;
    let title_scale = if text_width_px(WIN_TITLE, 4) <= panel_width as i32 - 16 {
        4
    } else {
        2
    };
    let mut y = panel.y.round() as i32 + 24;
    frame.centered_text(center_x, y, WIN_TITLE, PANEL_EDGE.color, title_scale);
    y += (GLYPH_HEIGHT + 4) * title_scale;
    frame.centered_text(center_x, y, WIN_SUBTITLE, PANEL_TEXT, 2);
    y += (GLYPH_HEIGHT + 6) * 2;
    frame.centered_text(
        center_x,
        y,
        format_climb_time(snapshot.stats.ticks, tick_seconds),
        TIER_WARN,
        2,
    );
    y += (GLYPH_HEIGHT + 8) * 2;
    frame.centered_text(center_x, y, RESTART_PROMPT, PANEL_TEXT, 1);
}

#[cfg(test)]
mod tests {
    use engine::{TextAlign, Viewport};

    use super::*;
    use crate::app::climb::config::LevelConfig;
    use crate::app::climb::types::RunState;
    use crate::app::climb::world::ClimbWorld;

    fn snapshot() -> WorldSnapshot {
        ClimbWorld::new(&LevelConfig::default(), Viewport::new(800, 600))
            .expect("world")
            .snapshot()
    }

    fn texts(frame: &RenderFrame) -> Vec<&str> {
        frame
            .commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn labels_follow_level() {
        assert_eq!(difficulty_label(1), "Normal");
        assert_eq!(difficulty_label(2), "Getting Slippery");
        assert_eq!(difficulty_label(3), "Very Slippery");
        assert_eq!(difficulty_label(4), "SUPER SLIPPERY");
        assert_eq!(difficulty_color(1), TIER_CALM);
        assert_eq!(difficulty_color(2), TIER_WARN);
        assert_eq!(difficulty_color(3), TIER_DANGER);
        assert_eq!(difficulty_color(4), TIER_DANGER);
    }

    #[test]
    fn climb_time_uses_tick_length() {
        assert_eq!(format_climb_time(150, 1.0 / 60.0), "TIME: 2.5s");
        assert_eq!(format_climb_time(0, 1.0 / 60.0), "TIME: 0.0s");
    }

    #[test]
    fn world_layers_draw_in_order() {
        let frame = build_frame(&snapshot(), 1.0 / 60.0);
        assert_eq!(
            frame.commands.first(),
            Some(&DrawCommand::SkyGradient {
                top: SKY_TOP,
                bottom: SKY_BOTTOM
            })
        );

        let rects: Vec<(Rect, Rgba)> = frame
            .commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Rect { rect, fill, .. } => Some((*rect, *fill)),
                _ => None,
            })
            .collect();
        // 10 platforms, ground, actor body, three face marks.
        assert_eq!(rects.len(), 15);
        assert_eq!(rects[10], (Rect::new(0.0, 470.0, 2000.0, 200.0), GROUND_COLOR));
        assert_eq!(
            rects[11],
            (Rect::new(50.0, 400.0, 30.0, 40.0), rgb(0xFF, 0x6B, 0x6B))
        );
        assert_eq!(rects[12].0, Rect::new(58.0, 408.0, 4.0, 4.0));
        assert_eq!(rects[14].0, Rect::new(60.0, 420.0, 10.0, 2.0));
    }

    #[test]
    fn hud_shows_level_and_footer_without_win_panel() {
        let frame = build_frame(&snapshot(), 1.0 / 60.0);
        let lines = texts(&frame);
        assert!(lines.contains(&"LEVEL: 1"));
        assert!(lines.contains(&"Normal"));
        assert!(lines.contains(&FOOTER_TEXT));
        assert!(!lines.contains(&WIN_TITLE));
        assert!(!frame
            .commands
            .iter()
            .any(|command| matches!(command, DrawCommand::Panel { .. })));
    }

    #[test]
    fn victory_panel_when_won() {
        let mut won = snapshot();
        won.run_state = RunState::Won;
        won.stats.ticks = 600;
        let frame = build_frame(&won, 1.0 / 60.0);
        let lines = texts(&frame);
        assert!(lines.contains(&WIN_TITLE));
        assert!(lines.contains(&WIN_SUBTITLE));
        assert!(lines.contains(&"TIME: 10.0s"));
        assert!(lines.contains(&RESTART_PROMPT));
    }

    #[test]
    fn narrow_viewport_shrinks_footer() {
        let mut narrow = snapshot();
        narrow.viewport = Viewport::new(360, 480);
        let frame = build_frame(&narrow, 1.0 / 60.0);
        let footer = frame.commands.iter().find_map(|command| match command {
            DrawCommand::Text {
                text, scale, align, ..
            } if text == FOOTER_TEXT => Some((*scale, *align)),
            _ => None,
        });
        assert_eq!(footer, Some((1, TextAlign::Center)));
    }
}
