//! Runtime configuration loaded by adapters before a session starts.

use serde::Deserialize;

use crate::{Difficulty, EnemyCatalog, TowerCatalog, WaveTable};

/// Complete configuration of a game session.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Starting resources.
    pub economy: EconomyConfig,
    /// Loop timing and wave progression.
    pub session: SessionConfig,
    /// Screen layout.
    pub window: WindowConfig,
    /// Policy used to space enemy releases.
    pub spawning: SpawnCadence,
    /// Purchasable towers.
    pub towers: TowerCatalog,
    /// Enemy kinds referenced by wave rosters.
    pub enemies: EnemyCatalog,
    /// Per-difficulty wave definitions.
    pub waves: WaveTable,
}

/// Starting resources of the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Coins available before the first purchase.
    pub coins: u32,
    /// Enemies that may leak before the game is lost.
    pub lives: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            coins: 100,
            lives: 20,
        }
    }
}

/// Timing and wave progression settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Target ticks per second.
    pub fps: u32,
    /// Difficulty used to generate waves.
    pub difficulty: Difficulty,
    /// Index of the first wave.
    pub start_wave: u32,
    /// Global seed mixed into every wave.
    pub seed: u64,
    /// Ticks to wait after a cleared wave before queuing the next one.
    pub inter_wave_pause_frames: u32,
    /// Last wave to play; clearing it wins the session.
    pub max_waves: Option<u32>,
}

impl SessionConfig {
    /// Simulated duration of a single tick.
    #[must_use]
    pub fn tick_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            difficulty: Difficulty::Normal,
            start_wave: 1,
            seed: 0x7469_6c65,
            inter_wave_pause_frames: 180,
            max_waves: None,
        }
    }
}

/// Screen layout measured in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Edge length of one map cell.
    pub cell_size: u32,
    /// Height of the HUD strip above the map.
    pub hud_height: u32,
    /// Edge length of a tower card.
    pub card_size: u32,
    /// Gap between tower cards.
    pub card_spacing: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            cell_size: 16,
            hud_height: 64,
            card_size: 48,
            card_spacing: 5,
        }
    }
}

/// Policy deciding how many ticks separate two enemy releases.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpawnCadence {
    /// Constant number of ticks between releases.
    Fixed {
        /// Ticks between releases.
        frames: u32,
    },
    /// Keeps `gap` pixels between consecutive enemies on the route.
    Spacing {
        /// Pixels left between the edges of two consecutive enemies.
        gap: f32,
    },
}

impl Default for SpawnCadence {
    fn default() -> Self {
        Self::Spacing { gap: 8.0 }
    }
}
