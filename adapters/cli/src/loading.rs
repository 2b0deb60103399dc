//! Reads configuration and level files from disk.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use tile_defence_core::{GameConfig, LevelDescription};
use tracing::info;

const BUNDLED_LEVEL: &str = include_str!("../levels/level_01.toml");

/// Loads the game configuration, falling back to defaults without a path.
pub(crate) fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    let config = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config at {}", path.display()))?;
    info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Loads a level description, falling back to the bundled level without a path.
pub(crate) fn load_level(path: Option<&Path>) -> Result<LevelDescription> {
    let Some(path) = path else {
        return parse_level(BUNDLED_LEVEL).context("failed to parse bundled level");
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level at {}", path.display()))?;
    let level = parse_level(&contents)
        .with_context(|| format!("failed to parse level at {}", path.display()))?;
    info!(path = %path.display(), "level loaded");
    Ok(level)
}

fn parse_level(contents: &str) -> Result<LevelDescription> {
    Ok(toml::from_str(contents)?)
}
