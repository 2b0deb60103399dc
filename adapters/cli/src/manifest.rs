//! Sprite manifests mapping asset keys onto texture files.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tile_defence_core::{AmmoKind, SpriteKey, TileCategory, TowerKind};
use tile_defence_rendering::{AssetHandle, AssetKey, AssetSource};
use tracing::warn;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;
const AMMO_KINDS: [AmmoKind; 2] = [AmmoKind::Arrow, AmmoKind::Cannonball];

/// Textures listed by a manifest file, indexed in file order.
#[derive(Debug)]
pub(crate) struct SpriteManifest {
    entries: BTreeMap<AssetKey, (AssetHandle, PathBuf)>,
}

impl SpriteManifest {
    /// Loads the manifest located at the provided path.
    ///
    /// Texture paths are resolved relative to the manifest's directory.
    pub(crate) fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read sprite manifest at {}", path.display()))?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let manifest = Self::parse(&contents, &base)?;
        for (key, (_, texture)) in &manifest.entries {
            if !texture.is_file() {
                warn!(?key, path = %texture.display(), "sprite texture missing on disk");
            }
        }
        Ok(manifest)
    }

    fn parse(contents: &str, base: &Path) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
        if manifest.version != SUPPORTED_MANIFEST_VERSION {
            bail!(
                "unsupported sprite manifest version {}; expected {}",
                manifest.version,
                SUPPORTED_MANIFEST_VERSION
            );
        }

        let mut entries = BTreeMap::new();
        for (index, (name, relative_path)) in manifest.sprites.into_iter().enumerate() {
            let key = parse_asset_key(&name)
                .with_context(|| format!("unknown sprite key `{name}` in manifest"))?;
            let handle = AssetHandle::new(index as u32);
            if entries
                .insert(key.clone(), (handle, base.join(relative_path)))
                .is_some()
            {
                bail!("sprite manifest contains duplicate entry for {key:?}");
            }
        }
        Ok(Self { entries })
    }
}

impl AssetSource for SpriteManifest {
    fn resolve(&self, key: &AssetKey) -> Option<AssetHandle> {
        self.entries.get(key).map(|(handle, _)| *handle)
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    version: u32,
    sprites: BTreeMap<String, String>,
}

/// Parses `tile.<category>`, `tower.<kind>`, `ammo.<kind>` and `enemy.<name>`.
fn parse_asset_key(name: &str) -> Result<AssetKey> {
    let Some((group, item)) = name.split_once('.') else {
        bail!("sprite key `{name}` lacks a group prefix");
    };
    let key = match group {
        "tile" => SpriteKey::Tile(TileCategory::parse(item)?),
        "tower" => SpriteKey::Tower(
            TowerKind::parse(item).with_context(|| format!("unknown tower kind `{item}`"))?,
        ),
        "ammo" => SpriteKey::Ammo(
            AMMO_KINDS
                .into_iter()
                .find(|kind| kind.name() == item)
                .with_context(|| format!("unknown ammo kind `{item}`"))?,
        ),
        "enemy" if !item.is_empty() => SpriteKey::Enemy(item.to_owned()),
        _ => bail!("unknown sprite group `{group}`"),
    };
    Ok(key)
}

/// Resolves every key to a solid-colour placeholder per sprite group.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PlaceholderSprites;

impl AssetSource for PlaceholderSprites {
    fn resolve(&self, key: &AssetKey) -> Option<AssetHandle> {
        let handle = match key {
            SpriteKey::Tile(_) => 0,
            SpriteKey::Tower(_) => 1,
            SpriteKey::Ammo(_) => 2,
            SpriteKey::Enemy(_) => 3,
        };
        Some(AssetHandle::new(handle))
    }
}
