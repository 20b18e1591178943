use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use engine::Rgba;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum LevelError {
    #[error("read level '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse level json{}: {message}", at_path(.path))]
    Parse { path: String, message: String },
    #[error("validation failed at {path}: {reason}")]
    Invalid { path: String, reason: String },
}

fn at_path(path: &str) -> String {
    if path.is_empty() || path == "." {
        String::new()
    } else {
        format!(" at {path}")
    }
}

/// `#RRGGBB` color as written in level files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct HexColor(pub(crate) Rgba);

impl HexColor {
    pub(crate) const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        parse_hex_color(&raw)
            .map(HexColor)
            .ok_or_else(|| format!("expected #RRGGBB color, got '{raw}'"))
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        let [r, g, b, _] = color.0;
        format!("#{r:02X}{g:02X}{b:02X}")
    }
}

pub(crate) fn parse_hex_color(raw: &str) -> Option<Rgba> {
    let digits = raw.trim().strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255])
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct WorldSettings {
    pub(crate) gravity: f32,
    pub(crate) ground_y: f32,
    pub(crate) world_width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ActorSettings {
    pub(crate) spawn_x: f32,
    pub(crate) spawn_y: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) speed: f32,
    pub(crate) jump_power: f32,
    pub(crate) color: HexColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PlatformSettings {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) color: HexColor,
}

/// Level layout and tuning. The last platform is the goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LevelConfig {
    pub(crate) world: WorldSettings,
    pub(crate) actor: ActorSettings,
    pub(crate) platforms: Vec<PlatformSettings>,
}

const START_COLOR: HexColor = HexColor::new(0x4E, 0xCD, 0xC4);
const LOW_COLOR: HexColor = HexColor::new(0x45, 0xB7, 0xD1);
const MID_COLOR: HexColor = HexColor::new(0x96, 0xCE, 0xB4);
const HIGH_COLOR: HexColor = HexColor::new(0xFF, 0xEA, 0xA7);
const GOAL_COLOR: HexColor = HexColor::new(0xFD, 0x79, 0xA8);

const fn platform(x: f32, y: f32, width: f32, color: HexColor) -> PlatformSettings {
    PlatformSettings {
        x,
        y,
        width,
        height: 20.0,
        color,
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            world: WorldSettings {
                gravity: 0.8,
                ground_y: 470.0,
                world_width: 2000.0,
            },
            actor: ActorSettings {
                spawn_x: 50.0,
                spawn_y: 400.0,
                width: 30.0,
                height: 40.0,
                speed: 5.0,
                jump_power: 15.0,
                color: HexColor::new(0xFF, 0x6B, 0x6B),
            },
            platforms: vec![
                platform(0.0, 450.0, 200.0, START_COLOR),
                platform(250.0, 400.0, 150.0, LOW_COLOR),
                platform(450.0, 350.0, 120.0, LOW_COLOR),
                platform(620.0, 300.0, 100.0, LOW_COLOR),
                platform(780.0, 250.0, 130.0, MID_COLOR),
                platform(950.0, 200.0, 110.0, MID_COLOR),
                platform(1120.0, 150.0, 140.0, MID_COLOR),
                platform(1320.0, 100.0, 120.0, HIGH_COLOR),
                platform(1500.0, 50.0, 100.0, HIGH_COLOR),
                platform(1650.0, 20.0, 200.0, GOAL_COLOR),
            ],
        }
    }
}

impl LevelConfig {
    /// Topmost platform edge; the altitude at which difficulty saturates.
    pub(crate) fn level_height(&self) -> f32 {
        self.platforms
            .iter()
            .map(|platform| platform.y)
            .fold(f32::INFINITY, f32::min)
    }

    pub(crate) fn validate(&self) -> Result<(), LevelError> {
        let world = &self.world;
        require_positive("world.gravity", world.gravity)?;
        require_finite("world.ground_y", world.ground_y)?;
        require_positive("world.world_width", world.world_width)?;

        let actor = &self.actor;
        require_positive("actor.width", actor.width)?;
        require_positive("actor.height", actor.height)?;
        require_positive("actor.speed", actor.speed)?;
        require_positive("actor.jump_power", actor.jump_power)?;
        require_finite("actor.spawn_x", actor.spawn_x)?;
        require_finite("actor.spawn_y", actor.spawn_y)?;
        if actor.width > world.world_width {
            return Err(expected_actual(
                "actor.width",
                format!("at most world_width {}", world.world_width),
                actor.width,
            ));
        }
        if actor.spawn_x < 0.0 || actor.spawn_x + actor.width > world.world_width {
            return Err(expected_actual(
                "actor.spawn_x",
                format!("within [0, {}]", world.world_width - actor.width),
                actor.spawn_x,
            ));
        }
        if actor.spawn_y < 0.0 || actor.spawn_y + actor.height > world.ground_y {
            return Err(expected_actual(
                "actor.spawn_y",
                format!("within [0, {}]", world.ground_y - actor.height),
                actor.spawn_y,
            ));
        }

        if self.platforms.is_empty() {
            return Err(invalid("platforms", "at least one platform is required"));
        }
        for (index, platform) in self.platforms.iter().enumerate() {
            require_finite(&format!("platforms[{index}].x"), platform.x)?;
            require_finite(&format!("platforms[{index}].y"), platform.y)?;
            require_positive(&format!("platforms[{index}].width"), platform.width)?;
            require_positive(&format!("platforms[{index}].height"), platform.height)?;
        }

        let level_height = self.level_height();
        if level_height >= world.ground_y {
            return Err(expected_actual(
                "platforms",
                format!("a platform above ground_y {}", world.ground_y),
                format!("highest platform at y={level_height}"),
            ));
        }
        Ok(())
    }
}

fn invalid(path: &str, reason: impl Into<String>) -> LevelError {
    LevelError::Invalid {
        path: path.to_string(),
        reason: reason.into(),
    }
}

fn expected_actual(path: &str, expected: impl Display, actual: impl Display) -> LevelError {
    invalid(path, format!("expected {expected}, got {actual}"))
}

fn require_finite(path: &str, value: f32) -> Result<(), LevelError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(expected_actual(path, "finite number", value))
    }
}

fn require_positive(path: &str, value: f32) -> Result<(), LevelError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(expected_actual(path, "finite number > 0", value))
    }
}

pub(crate) fn parse_level_json(raw: &str) -> Result<LevelConfig, LevelError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let level = serde_path_to_error::deserialize::<_, LevelConfig>(&mut deserializer).map_err(
        |error| {
            let path = error.path().to_string();
            LevelError::Parse {
                path,
                message: error.into_inner().to_string(),
            }
        },
    )?;
    level.validate()?;
    Ok(level)
}

pub(crate) fn load_level(path: &Path) -> Result<LevelConfig, LevelError> {
    let raw = fs::read_to_string(path).map_err(|source| LevelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_level_json(&raw)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_level_is_valid_with_goal_last() {
        let level = LevelConfig::default();
        level.validate().expect("default level");
        assert_eq!(level.platforms.len(), 10);
        assert_eq!(level.level_height(), 20.0);
        let goal = level.platforms.last().expect("goal");
        assert_eq!((goal.x, goal.y, goal.width), (1650.0, 20.0, 200.0));
    }

    #[test]
    fn hex_colors_parse_and_print() {
        assert_eq!(parse_hex_color("#2C3E50"), Some([0x2C, 0x3E, 0x50, 255]));
        assert_eq!(parse_hex_color("#fd79a8"), Some([0xFD, 0x79, 0xA8, 255]));
        assert_eq!(parse_hex_color("2C3E50"), None);
        assert_eq!(parse_hex_color("#2C3E5"), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
        assert_eq!(parse_hex_color("#+F+F+F"), None);
        assert_eq!(parse_hex_color("#-1-1-1"), None);
        assert_eq!(String::from(HexColor::new(0x8B, 0x45, 0x13)), "#8B4513");
    }

    #[test]
    fn parse_error_reports_field_path() {
        let mut value = serde_json::to_value(LevelConfig::default()).expect("encode");
        value["platforms"][3]["color"] = serde_json::json!("teal");

        let error = parse_level_json(&value.to_string()).expect_err("bad color");
        let LevelError::Parse { path, message } = &error else {
            panic!("expected parse error, got {error:?}");
        };
        assert_eq!(path, "platforms[3].color");
        assert!(message.contains("teal"), "{message}");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut value = serde_json::to_value(LevelConfig::default()).expect("encode");
        value["world"]["wind"] = serde_json::json!(1.0);

        let error = parse_level_json(&value.to_string()).expect_err("unknown field");
        assert!(error.to_string().contains("at world"), "{error}");
    }

    #[test]
    fn empty_platform_list_is_rejected() {
        let mut level = LevelConfig::default();
        level.platforms.clear();
        let error = level.validate().expect_err("no platforms");
        assert!(matches!(error, LevelError::Invalid { ref path, .. } if path == "platforms"));
    }

    #[test]
    fn platforms_below_ground_are_rejected() {
        let mut level = LevelConfig::default();
        level.platforms = vec![platform(0.0, 480.0, 100.0, START_COLOR)];
        assert!(level.validate().is_err());
    }

    #[test]
    fn non_positive_sizes_are_rejected_with_index() {
        let mut level = LevelConfig::default();
        level.platforms[2].width = 0.0;
        let error = level.validate().expect_err("zero width");
        assert_eq!(
            error.to_string(),
            "validation failed at platforms[2].width: expected finite number > 0, got 0"
        );

        let mut level = LevelConfig::default();
        level.world.gravity = f32::NAN;
        assert!(level.validate().is_err());
    }

    #[test]
    fn spawn_outside_world_is_rejected() {
        let mut level = LevelConfig::default();
        level.actor.spawn_x = 1990.0;
        assert!(level.validate().is_err());

        let mut level = LevelConfig::default();
        level.actor.spawn_y = 460.0;
        assert!(level.validate().is_err());
    }

    #[test]
    fn level_file_loads_from_disk() {
        let mut level = LevelConfig::default();
        level.world.gravity = 0.5;
        level.platforms.truncate(3);

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        let json = serde_json::to_string_pretty(&level).expect("encode");
        file.write_all(json.as_bytes()).expect("write");

        let loaded = load_level(file.path()).expect("load");
        assert_eq!(loaded.world.gravity, 0.5);
        assert_eq!(loaded.platforms.len(), 3);
        assert_eq!(loaded.level_height(), 350.0);
    }

    #[test]
    fn missing_level_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing.json");
        let error = load_level(&path).expect_err("missing");
        assert!(matches!(error, LevelError::Read { .. }));
    }
}
