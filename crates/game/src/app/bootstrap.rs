use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use engine::{LoopConfig, Scene, TouchControls, Viewport};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::climb::{load_level, ClimbScene, LevelConfig, LevelError};

const LEVEL_ENV_VAR: &str = "SKYCLIMB_LEVEL";
const TOUCH_ENV_VAR: &str = "SKYCLIMB_TOUCH";
const BUILT_IN_LEVEL: &str = "built-in";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> Result<AppWiring, LevelError> {
    init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "=== Sky Climb Startup ===");

    let config = LoopConfig {
        touch_controls: parse_touch_controls(env::var(TOUCH_ENV_VAR).ok().as_deref()),
        ..LoopConfig::default()
    };

    let (level, source) = match parse_level_path(env::var_os(LEVEL_ENV_VAR)) {
        Some(path) => (load_level(&path)?, path.display().to_string()),
        None => (LevelConfig::default(), BUILT_IN_LEVEL.to_string()),
    };
    let scene = ClimbScene::new(
        &level,
        source,
        Viewport::new(config.window_width, config.window_height),
    )?;

    Ok(AppWiring {
        config,
        scene: Box::new(scene),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn parse_touch_controls(raw: Option<&str>) -> TouchControls {
    let Some(raw) = raw else {
        return TouchControls::default();
    };
    raw.parse().unwrap_or_else(|error: String| {
        warn!(var = TOUCH_ENV_VAR, error = %error, "invalid_touch_mode_ignored");
        TouchControls::default()
    })
}

fn parse_level_path(raw: Option<OsString>) -> Option<PathBuf> {
    raw.filter(|value| !value.is_empty()).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_mode_defaults_to_auto() {
        assert_eq!(parse_touch_controls(None), TouchControls::Auto);
        assert_eq!(parse_touch_controls(Some("bogus")), TouchControls::Auto);
        assert_eq!(parse_touch_controls(Some("always")), TouchControls::Always);
        assert_eq!(parse_touch_controls(Some("never")), TouchControls::Never);
    }

    #[test]
    fn empty_level_path_means_built_in() {
        assert_eq!(parse_level_path(None), None);
        assert_eq!(parse_level_path(Some(OsString::new())), None);
        assert_eq!(
            parse_level_path(Some(OsString::from("levels/tall.json"))),
            Some(PathBuf::from("levels/tall.json"))
        );
    }
}
