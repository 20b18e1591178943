mod config;
mod hud;
mod scene_impl;
mod snapshot;
mod systems;
mod types;
mod world;

pub(crate) use config::{load_level, LevelConfig, LevelError};
pub(crate) use scene_impl::ClimbScene;
