#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave generation system.
//!
//! Every wave draws its composition from a ChaCha stream whose seed is the
//! SHA-256 digest of the global seed, the difficulty label, and the wave
//! index. Replaying the same inputs therefore always yields the same wave.

use rand::{distributions::WeightedIndex, prelude::Distribution, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tile_defence_core::{
    Command, Difficulty, EnemyBlueprint, EnemyCatalog, RosterEntry, WaveTable,
};
use tracing::{debug, warn};

/// Raised when a roster names an enemy kind the catalog does not define.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("enemy kind `{name}` is not in the enemy catalog")]
pub struct UnknownEnemyKind {
    /// Name found in the roster.
    pub name: String,
}

/// Enemies generated for a single wave, in release order.
#[derive(Clone, Debug, PartialEq)]
pub struct WavePlan {
    /// Wave index the plan belongs to.
    pub wave: u32,
    /// Resolved enemies, head of the queue first.
    pub enemies: Vec<EnemyBlueprint>,
    /// Draws that were dropped because their kind is unknown.
    pub skipped: Vec<UnknownEnemyKind>,
}

impl WavePlan {
    /// Converts the plan into the command that queues it in the world.
    #[must_use]
    pub fn into_command(self) -> Command {
        Command::QueueWave {
            wave: self.wave,
            enemies: self.enemies,
        }
    }
}

/// Configuration parameters required to construct the wave generator.
#[derive(Clone, Debug)]
pub struct Config {
    seed: u64,
    waves: WaveTable,
    enemies: EnemyCatalog,
}

impl Config {
    /// Creates a configuration from the global seed and the catalogs.
    #[must_use]
    pub fn new(seed: u64, waves: WaveTable, enemies: EnemyCatalog) -> Self {
        Self {
            seed,
            waves,
            enemies,
        }
    }
}

/// Pure system that expands a difficulty and wave index into enemies.
#[derive(Debug)]
pub struct WaveGeneration {
    seed: u64,
    waves: WaveTable,
    enemies: EnemyCatalog,
}

impl WaveGeneration {
    /// Creates a new generator using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            seed: config.seed,
            waves: config.waves,
            enemies: config.enemies,
        }
    }

    /// Generates the enemies of `wave` for the provided difficulty.
    #[must_use]
    pub fn generate(&self, difficulty: Difficulty, wave: u32) -> WavePlan {
        let mut plan = WavePlan {
            wave,
            enemies: Vec::new(),
            skipped: Vec::new(),
        };

        let Some(definition) = self.waves.definition(difficulty) else {
            warn!(difficulty = difficulty.label(), "no wave definition for difficulty");
            return plan;
        };

        let count = definition.growth.count(wave);
        let eligible: Vec<&RosterEntry> = definition
            .roster
            .iter()
            .filter(|entry| wave >= entry.unlock_wave)
            .collect();

        if count > 0 {
            match WeightedIndex::new(eligible.iter().map(|entry| entry.weight)) {
                Ok(distribution) => {
                    let mut rng = ChaCha8Rng::from_seed(derive_seed(self.seed, difficulty, wave));
                    for _ in 0..count {
                        let entry = eligible[distribution.sample(&mut rng)];
                        match self.resolve(entry) {
                            Ok(blueprint) => plan.enemies.push(blueprint),
                            Err(error) => {
                                warn!(%error, wave, "skipping enemy");
                                plan.skipped.push(error);
                            }
                        }
                    }
                }
                Err(error) => {
                    warn!(
                        %error,
                        wave,
                        difficulty = difficulty.label(),
                        "roster has no eligible enemies"
                    );
                }
            }
        }

        if plan.enemies.is_empty() && !definition.growth.allow_empty {
            warn!(wave, difficulty = difficulty.label(), "generated an empty wave");
        }
        debug!(wave, enemies = plan.enemies.len(), "wave generated");
        plan
    }

    fn resolve(&self, entry: &RosterEntry) -> Result<EnemyBlueprint, UnknownEnemyKind> {
        let spec = self.enemies.get(&entry.name).ok_or_else(|| UnknownEnemyKind {
            name: entry.name.clone(),
        })?;
        Ok(EnemyBlueprint {
            name: entry.name.clone(),
            health: spec.health,
            speed: spec.speed,
            size: spec.size,
            detectable: spec.detectable,
            level: spec.level,
            reward: spec.reward,
        })
    }
}

fn derive_seed(global_seed: u64, difficulty: Difficulty, wave: u32) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(difficulty.label().as_bytes());
    hasher.update(wave.to_le_bytes());
    let digest = hasher.finalize();
    let mut seed = [0_u8; 32];
    seed.copy_from_slice(&digest);
    seed
}
