//! Rendering backend that reports frames through the log.

use anyhow::{Context, Result};
use tile_defence_core::HudSnapshot;
use tile_defence_rendering::{AssetCatalog, DrawRequest, Frame, RenderingBackend};
use tracing::{debug, info};

/// Presents frames by logging what a windowed backend would draw.
#[derive(Debug)]
pub(crate) struct LoggingBackend {
    assets: AssetCatalog,
    frames_presented: u64,
    last_hud: Option<HudSnapshot>,
}

impl LoggingBackend {
    pub(crate) fn new(assets: AssetCatalog) -> Self {
        info!(assets = assets.len(), "logging backend ready");
        Self {
            assets,
            frames_presented: 0,
            last_hud: None,
        }
    }

    pub(crate) fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl RenderingBackend for LoggingBackend {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        let mut drawn = 0_usize;
        for draw in &frame.draws {
            let batch = match draw {
                DrawRequest::Layer { sprites, .. } => sprites.as_slice(),
                DrawRequest::Sprite(sprite) => std::slice::from_ref(sprite),
            };
            for sprite in batch {
                let _ = self
                    .assets
                    .handle(&sprite.key)
                    .with_context(|| format!("sprite {:?} missing from atlas", sprite.key))?;
            }
            drawn += batch.len();
        }

        if self.last_hud != Some(frame.hud) {
            self.last_hud = Some(frame.hud);
            info!(
                lives = frame.hud.lives,
                coins = frame.hud.coins,
                wave = frame.hud.wave,
                paused = frame.hud.paused,
                "hud"
            );
        }
        if !frame.is_idle() {
            debug!(
                frame = frame.number,
                regions = frame.changed.len(),
                sprites = drawn,
                "frame presented"
            );
        }
        self.frames_presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_defence_core::{PixelRect, Sprite, SpriteKey, TowerKind};
    use tile_defence_rendering::{AssetHandle, AssetKey, AssetSource};

    struct Towers;

    impl AssetSource for Towers {
        fn resolve(&self, key: &AssetKey) -> Option<AssetHandle> {
            matches!(key, SpriteKey::Tower(_)).then_some(AssetHandle::new(0))
        }
    }

    fn frame(key: SpriteKey) -> Frame {
        Frame {
            number: 1,
            changed: Vec::new(),
            draws: vec![DrawRequest::Sprite(Sprite {
                key,
                rect: PixelRect::new(0, 0, 16, 16),
            })],
            hud: HudSnapshot::default(),
        }
    }

    #[test]
    fn frames_with_loaded_sprites_are_presented() {
        let assets = AssetCatalog::load(&Towers, [SpriteKey::Tower(TowerKind::Arrow)])
            .expect("tower keys resolve");
        let mut backend = LoggingBackend::new(assets);
        backend
            .present(&frame(SpriteKey::Tower(TowerKind::Arrow)))
            .expect("sprite is loaded");
        assert_eq!(backend.frames_presented(), 1);
    }

    #[test]
    fn unknown_sprites_fail_presentation() {
        let mut backend = LoggingBackend::new(AssetCatalog::default());
        let error = backend
            .present(&frame(SpriteKey::Enemy("slime".to_owned())))
            .expect_err("slime was never loaded");
        assert!(error.to_string().contains("missing from atlas"));
        assert_eq!(backend.frames_presented(), 0);
    }
}
