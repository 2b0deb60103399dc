//! Symbolic asset keys and their resolution at startup.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tile_defence_core::{GameConfig, SpriteKey, TileCategory, TowerKind};
use tracing::debug;

/// Symbolic name of a texture.
pub type AssetKey = SpriteKey;

/// Opaque reference to a loaded texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetHandle(u32);

impl AssetHandle {
    /// Wraps a backend-specific texture index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Backend-specific texture index.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Errors raised while resolving assets.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AssetError {
    /// The source has no texture for a referenced key.
    #[error("no asset registered for {0:?}")]
    Missing(AssetKey),
}

/// Backend capable of turning asset keys into texture handles.
pub trait AssetSource {
    /// Resolves the key, or returns `None` when the texture is unknown.
    fn resolve(&self, key: &AssetKey) -> Option<AssetHandle>;
}

/// Every key a session configured by `config` can draw.
#[must_use]
pub fn referenced_keys(config: &GameConfig) -> BTreeSet<AssetKey> {
    let mut keys: BTreeSet<AssetKey> = TileCategory::ALL
        .into_iter()
        .map(SpriteKey::Tile)
        .collect();
    for kind in TowerKind::ALL {
        let _ = keys.insert(SpriteKey::Tower(kind));
        let _ = keys.insert(SpriteKey::Ammo(config.towers.spec(kind).ammo));
    }
    keys.extend(
        config
            .enemies
            .names()
            .map(|name| SpriteKey::Enemy(name.to_owned())),
    );
    keys
}

/// Handles resolved for every referenced key.
#[derive(Clone, Debug, Default)]
pub struct AssetCatalog {
    handles: BTreeMap<AssetKey, AssetHandle>,
}

impl AssetCatalog {
    /// Resolves every key, failing on the first one the source does not know.
    pub fn load(
        source: &impl AssetSource,
        keys: impl IntoIterator<Item = AssetKey>,
    ) -> Result<Self, AssetError> {
        let mut handles = BTreeMap::new();
        for key in keys {
            let handle = source
                .resolve(&key)
                .ok_or_else(|| AssetError::Missing(key.clone()))?;
            debug!(?key, handle = handle.get(), "asset resolved");
            let _ = handles.insert(key, handle);
        }
        Ok(Self { handles })
    }

    /// Handle loaded for the key.
    #[must_use]
    pub fn handle(&self, key: &AssetKey) -> Option<AssetHandle> {
        self.handles.get(key).copied()
    }

    /// Number of loaded assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Reports whether no asset was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_defence_core::AmmoKind;

    struct Known(Vec<AssetKey>);

    impl AssetSource for Known {
        fn resolve(&self, key: &AssetKey) -> Option<AssetHandle> {
            self.0
                .iter()
                .position(|known| known == key)
                .map(|index| AssetHandle::new(index as u32))
        }
    }

    #[test]
    fn default_config_references_every_drawable() {
        let keys = referenced_keys(&GameConfig::default());
        assert!(keys.contains(&SpriteKey::Tile(TileCategory::Walls)));
        assert!(keys.contains(&SpriteKey::Tower(TowerKind::Cannon)));
        assert!(keys.contains(&SpriteKey::Ammo(AmmoKind::Cannonball)));
        assert!(keys.contains(&SpriteKey::Enemy("ghost".to_owned())));
        assert_eq!(keys.len(), 5 + 2 + 2 + 4);
    }

    #[test]
    fn load_reports_the_first_missing_key() {
        let source = Known(vec![SpriteKey::Tower(TowerKind::Arrow)]);
        let error = AssetCatalog::load(
            &source,
            [
                SpriteKey::Tower(TowerKind::Arrow),
                SpriteKey::Enemy("slime".to_owned()),
            ],
        )
        .expect_err("slime has no texture");
        assert_eq!(error, AssetError::Missing(SpriteKey::Enemy("slime".to_owned())));
    }

    #[test]
    fn load_keeps_resolved_handles() {
        let keys = vec![
            SpriteKey::Tower(TowerKind::Arrow),
            SpriteKey::Ammo(AmmoKind::Arrow),
        ];
        let catalog = AssetCatalog::load(&Known(keys.clone()), keys).expect("all keys known");
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.handle(&SpriteKey::Ammo(AmmoKind::Arrow)),
            Some(AssetHandle::new(1))
        );
        assert!(catalog.handle(&SpriteKey::Tile(TileCategory::Path)).is_none());
    }
}
