//! Validated catalogs describing towers, enemies, and wave composition.

use std::{collections::BTreeMap, time::Duration};

use serde::Deserialize;
use thiserror::Error;

use crate::{AmmoKind, CellRectSize, Difficulty, Targeting, TowerKind};

/// Errors raised while validating catalog contents.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The tower catalog lacks an entry for a purchasable kind.
    #[error("tower catalog has no entry for `{0}`")]
    MissingTower(&'static str),
    /// The tower catalog names a kind that cannot be purchased.
    #[error("tower catalog lists unknown kind `{0}`")]
    UnknownTower(String),
    /// The wave table names a difficulty that does not exist.
    #[error("wave table lists unknown difficulty `{0}`")]
    UnknownDifficulty(String),
    /// A tower entry carries a value that cannot be simulated.
    #[error("tower `{kind}` has invalid {field}")]
    InvalidTower {
        /// Tower kind whose entry is invalid.
        kind: &'static str,
        /// Field that failed validation.
        field: &'static str,
    },
    /// An enemy entry carries a value that cannot be simulated.
    #[error("enemy `{name}` has invalid {field}")]
    InvalidEnemy {
        /// Catalog name of the enemy.
        name: String,
        /// Field that failed validation.
        field: &'static str,
    },
    /// A roster entry can never be drawn.
    #[error("roster entry `{name}` for {difficulty:?} has zero weight")]
    ZeroWeight {
        /// Difficulty whose roster holds the entry.
        difficulty: Difficulty,
        /// Enemy name referenced by the entry.
        name: String,
    },
}

/// Attributes shared by every tower of a kind.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct TowerSpec {
    /// Coins debited on purchase.
    pub cost: u32,
    /// Damage applied by each projectile.
    pub damage: u32,
    /// Delay between shots in milliseconds.
    pub reload_ms: u64,
    /// Targeting range in pixels.
    pub range: f32,
    /// Single target or splash.
    pub targeting: Targeting,
    /// Projectile visual.
    pub ammo: AmmoKind,
    /// Cells covered by the tower.
    pub footprint: CellRectSize,
    /// Projectile speed in pixels per second.
    pub projectile_speed: f32,
}

impl TowerSpec {
    /// Delay between two shots.
    #[must_use]
    pub fn reload(&self) -> Duration {
        Duration::from_millis(self.reload_ms)
    }

    fn validate(&self, kind: TowerKind) -> Result<(), CatalogError> {
        let invalid = |field| CatalogError::InvalidTower {
            kind: kind.name(),
            field,
        };
        if self.footprint.is_empty() {
            return Err(invalid("footprint"));
        }
        if !(self.range.is_finite() && self.range > 0.0) {
            return Err(invalid("range"));
        }
        if !(self.projectile_speed.is_finite() && self.projectile_speed > 0.0) {
            return Err(invalid("projectile_speed"));
        }
        if let Targeting::Splash { radius } = self.targeting {
            if !(radius.is_finite() && radius >= 0.0) {
                return Err(invalid("splash radius"));
            }
        }
        Ok(())
    }
}

/// Tower attributes for every purchasable kind.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, TowerSpec>")]
pub struct TowerCatalog {
    arrow: TowerSpec,
    cannon: TowerSpec,
}

impl TowerCatalog {
    /// Validates the provided entries and builds a catalog.
    pub fn new(mut entries: BTreeMap<TowerKind, TowerSpec>) -> Result<Self, CatalogError> {
        let mut take = |kind: TowerKind| {
            let spec = entries
                .remove(&kind)
                .ok_or(CatalogError::MissingTower(kind.name()))?;
            spec.validate(kind)?;
            Ok::<_, CatalogError>(spec)
        };

        Ok(Self {
            arrow: take(TowerKind::Arrow)?,
            cannon: take(TowerKind::Cannon)?,
        })
    }

    /// Attributes of the provided tower kind.
    #[must_use]
    pub fn spec(&self, kind: TowerKind) -> &TowerSpec {
        match kind {
            TowerKind::Arrow => &self.arrow,
            TowerKind::Cannon => &self.cannon,
        }
    }
}

impl TryFrom<BTreeMap<String, TowerSpec>> for TowerCatalog {
    type Error = CatalogError;

    fn try_from(entries: BTreeMap<String, TowerSpec>) -> Result<Self, Self::Error> {
        let entries = entries
            .into_iter()
            .map(|(name, spec)| {
                TowerKind::parse(&name)
                    .map(|kind| (kind, spec))
                    .ok_or(CatalogError::UnknownTower(name))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Self::new(entries)
    }
}

impl Default for TowerCatalog {
    fn default() -> Self {
        Self {
            arrow: TowerSpec {
                cost: 60,
                damage: 2,
                reload_ms: 600,
                range: 96.0,
                targeting: Targeting::Projectile,
                ammo: AmmoKind::Arrow,
                footprint: CellRectSize::new(2, 2),
                projectile_speed: 360.0,
            },
            cannon: TowerSpec {
                cost: 120,
                damage: 5,
                reload_ms: 1500,
                range: 80.0,
                targeting: Targeting::Splash { radius: 32.0 },
                ammo: AmmoKind::Cannonball,
                footprint: CellRectSize::new(2, 2),
                projectile_speed: 240.0,
            },
        }
    }
}

/// Attributes of a single enemy kind.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct EnemySpec {
    /// Starting health.
    pub health: u32,
    /// Travel speed in pixels per second.
    pub speed: f32,
    /// Diameter in pixels.
    pub size: f32,
    /// Whether towers can target the enemy.
    #[serde(default = "detectable_by_default")]
    pub detectable: bool,
    /// Difficulty level of the kind.
    #[serde(default = "first_level")]
    pub level: u32,
    /// Coins credited on kill.
    #[serde(default)]
    pub reward: u32,
}

fn detectable_by_default() -> bool {
    true
}

fn first_level() -> u32 {
    1
}

/// Enemy attributes keyed by catalog name.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "BTreeMap<String, EnemySpec>")]
pub struct EnemyCatalog {
    entries: BTreeMap<String, EnemySpec>,
}

impl EnemyCatalog {
    /// Validates the provided entries and builds a catalog.
    pub fn new(entries: BTreeMap<String, EnemySpec>) -> Result<Self, CatalogError> {
        for (name, spec) in &entries {
            let invalid = |field| CatalogError::InvalidEnemy {
                name: name.clone(),
                field,
            };
            if spec.health == 0 {
                return Err(invalid("health"));
            }
            if !(spec.speed.is_finite() && spec.speed > 0.0) {
                return Err(invalid("speed"));
            }
            if !(spec.size.is_finite() && spec.size > 0.0) {
                return Err(invalid("size"));
            }
        }
        Ok(Self { entries })
    }

    /// Looks up an enemy kind by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EnemySpec> {
        self.entries.get(name)
    }

    /// Iterates catalog names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl TryFrom<BTreeMap<String, EnemySpec>> for EnemyCatalog {
    type Error = CatalogError;

    fn try_from(entries: BTreeMap<String, EnemySpec>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl Default for EnemyCatalog {
    fn default() -> Self {
        let spec = |health, speed, size, detectable, level, reward| EnemySpec {
            health,
            speed,
            size,
            detectable,
            level,
            reward,
        };
        let entries = BTreeMap::from([
            ("slime".to_owned(), spec(4, 40.0, 12.0, true, 1, 5)),
            ("runner".to_owned(), spec(3, 80.0, 10.0, true, 2, 6)),
            ("brute".to_owned(), spec(14, 28.0, 16.0, true, 3, 15)),
            ("ghost".to_owned(), spec(5, 50.0, 12.0, false, 2, 8)),
        ]);
        Self { entries }
    }
}

/// Number of enemies per wave as a function of the wave index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct WaveGrowth {
    /// Constant term.
    pub base: u32,
    /// Coefficient applied to the wave index.
    #[serde(default)]
    pub linear: u32,
    /// Coefficient applied to the squared wave index.
    #[serde(default)]
    pub quadratic: u32,
    /// Whether a wave without enemies is acceptable.
    #[serde(default)]
    pub allow_empty: bool,
}

impl WaveGrowth {
    /// Evaluates the curve at the provided wave index.
    #[must_use]
    pub fn count(&self, wave: u32) -> u32 {
        let wave = u64::from(wave);
        let total = u64::from(self.base)
            .saturating_add(u64::from(self.linear).saturating_mul(wave))
            .saturating_add(
                u64::from(self.quadratic).saturating_mul(wave.saturating_mul(wave)),
            );
        u32::try_from(total).unwrap_or(u32::MAX)
    }
}

/// Weighted enemy choice within a difficulty roster.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RosterEntry {
    /// Enemy catalog name.
    pub name: String,
    /// Relative draw weight.
    pub weight: u32,
    /// First wave in which the entry may appear.
    #[serde(default)]
    pub unlock_wave: u32,
}

/// Growth curve and roster of a difficulty.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct WaveDefinition {
    /// Enemy count curve.
    pub growth: WaveGrowth,
    /// Weighted enemy choices.
    pub roster: Vec<RosterEntry>,
}

/// Wave definitions keyed by difficulty.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, WaveDefinition>")]
pub struct WaveTable {
    definitions: BTreeMap<Difficulty, WaveDefinition>,
}

impl WaveTable {
    /// Validates the provided definitions and builds a table.
    pub fn new(definitions: BTreeMap<Difficulty, WaveDefinition>) -> Result<Self, CatalogError> {
        for (difficulty, definition) in &definitions {
            if let Some(entry) = definition.roster.iter().find(|entry| entry.weight == 0) {
                return Err(CatalogError::ZeroWeight {
                    difficulty: *difficulty,
                    name: entry.name.clone(),
                });
            }
        }
        Ok(Self { definitions })
    }

    /// Definition used for the provided difficulty, if any.
    #[must_use]
    pub fn definition(&self, difficulty: Difficulty) -> Option<&WaveDefinition> {
        self.definitions.get(&difficulty)
    }
}

impl TryFrom<BTreeMap<String, WaveDefinition>> for WaveTable {
    type Error = CatalogError;

    fn try_from(definitions: BTreeMap<String, WaveDefinition>) -> Result<Self, Self::Error> {
        let definitions = definitions
            .into_iter()
            .map(|(label, definition)| {
                Difficulty::parse(&label)
                    .map(|difficulty| (difficulty, definition))
                    .ok_or(CatalogError::UnknownDifficulty(label))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Self::new(definitions)
    }
}

impl Default for WaveTable {
    fn default() -> Self {
        let entry = |name: &str, weight, unlock_wave| RosterEntry {
            name: name.to_owned(),
            weight,
            unlock_wave,
        };
        let growth = |base, linear, quadratic| WaveGrowth {
            base,
            linear,
            quadratic,
            allow_empty: false,
        };

        let definitions = BTreeMap::from([
            (
                Difficulty::Easy,
                WaveDefinition {
                    growth: growth(3, 1, 0),
                    roster: vec![entry("slime", 5, 0), entry("runner", 2, 3)],
                },
            ),
            (
                Difficulty::Normal,
                WaveDefinition {
                    growth: growth(4, 2, 0),
                    roster: vec![
                        entry("slime", 5, 0),
                        entry("runner", 3, 2),
                        entry("brute", 1, 4),
                        entry("ghost", 1, 6),
                    ],
                },
            ),
            (
                Difficulty::Hard,
                WaveDefinition {
                    growth: growth(5, 2, 1),
                    roster: vec![
                        entry("slime", 3, 0),
                        entry("runner", 3, 0),
                        entry("brute", 2, 2),
                        entry("ghost", 2, 3),
                    ],
                },
            ),
        ]);
        Self { definitions }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{CatalogError, EnemyCatalog, TowerCatalog, WaveGrowth};
    use crate::TowerKind;

    #[test]
    fn growth_curve_is_non_decreasing() {
        let growth = WaveGrowth {
            base: 2,
            linear: 3,
            quadratic: 1,
            allow_empty: false,
        };
        let counts: Vec<u32> = (0..6).map(|wave| growth.count(wave)).collect();
        assert_eq!(counts, vec![2, 6, 12, 20, 30, 42]);
    }

    #[test]
    fn tower_catalog_requires_every_kind() {
        let mut entries = BTreeMap::new();
        let _ = entries.insert(
            TowerKind::Arrow,
            *TowerCatalog::default().spec(TowerKind::Arrow),
        );
        assert_eq!(
            TowerCatalog::new(entries),
            Err(CatalogError::MissingTower("cannon"))
        );
    }

    #[test]
    fn default_catalogs_hold_expected_entries() {
        let towers = TowerCatalog::default();
        assert_eq!(towers.spec(TowerKind::Arrow).cost, 60);
        let enemies = EnemyCatalog::default();
        assert!(enemies.get("slime").is_some());
        assert!(!enemies.get("ghost").map_or(true, |spec| spec.detectable));
        assert!(enemies.get("dragon").is_none());
    }
}
