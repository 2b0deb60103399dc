#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tile Defence adapters.
//!
//! Adapters never read the world directly. Each tick the loop hands the
//! emitted events, the HUD snapshot and the sprite batches to [`RenderSync`],
//! which turns them into a [`Frame`] for a [`RenderingBackend`].

mod assets;

pub use assets::{referenced_keys, AssetCatalog, AssetError, AssetHandle, AssetKey, AssetSource};

use anyhow::Result as AnyResult;
use glam::Vec2;
use tile_defence_core::{
    Event, HudSnapshot, InputEvent, PixelRect, RenderLayer, Sprite, SpriteKey, TowerKind,
};

/// Single drawing instruction emitted for a frame.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawRequest {
    /// Redraw a whole layer from the provided sprites.
    Layer {
        /// Layer being redrawn.
        layer: RenderLayer,
        /// Sprites in draw order, in window pixels.
        sprites: Vec<Sprite>,
    },
    /// Draw a single entity.
    Sprite(Sprite),
}

/// Everything a backend needs to present one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Frame counter of the session after the tick.
    pub number: u64,
    /// Window regions whose pixels changed since the previous frame.
    pub changed: Vec<PixelRect>,
    /// Drawing instructions in order.
    pub draws: Vec<DrawRequest>,
    /// HUD values to display.
    pub hud: HudSnapshot,
}

impl Frame {
    /// Reports whether nothing needs to be redrawn.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Tracks what was drawn last and derives the next [`Frame`].
#[derive(Clone, Debug)]
pub struct RenderSync {
    map_offset: Vec2,
    cell_size: u32,
    projectile_extent: f32,
    hud_rect: PixelRect,
    cards: Vec<Sprite>,
    static_dirty: bool,
    last_hud: Option<HudSnapshot>,
}

impl RenderSync {
    /// Creates a synchroniser for a map drawn at `map_offset` below the HUD strip.
    #[must_use]
    pub fn new(
        map_offset: Vec2,
        cell_size: u32,
        projectile_extent: f32,
        hud_rect: PixelRect,
        cards: &[(TowerKind, PixelRect)],
    ) -> Self {
        Self {
            map_offset,
            cell_size,
            projectile_extent,
            hud_rect,
            cards: cards
                .iter()
                .map(|(kind, rect)| Sprite {
                    key: SpriteKey::Tower(*kind),
                    rect: *rect,
                })
                .collect(),
            static_dirty: true,
            last_hud: None,
        }
    }

    /// Builds the frame for a tick.
    ///
    /// `static_layer` is only invoked when tiles or towers changed.
    pub fn sync(
        &mut self,
        number: u64,
        events: &[Event],
        hud: HudSnapshot,
        static_layer: impl FnOnce() -> Vec<Sprite>,
        moving_layer: Vec<Sprite>,
    ) -> Frame {
        let mut changed = Vec::new();
        for event in events {
            if let Some(region) = self.changed_region(event) {
                changed.push(self.to_window(region));
            }
            if matches!(event, Event::TowerPlaced { .. }) {
                self.static_dirty = true;
            }
        }

        let mut draws = Vec::new();
        if std::mem::take(&mut self.static_dirty) {
            let sprites: Vec<Sprite> = static_layer()
                .into_iter()
                .map(|sprite| self.sprite_to_window(sprite))
                .collect();
            if let Some(bounds) = bounds(sprites.iter().map(|sprite| sprite.rect)) {
                changed.push(bounds);
            }
            draws.push(DrawRequest::Layer {
                layer: RenderLayer::Static,
                sprites,
            });
        }

        draws.push(DrawRequest::Layer {
            layer: RenderLayer::Moving,
            sprites: moving_layer
                .into_iter()
                .map(|sprite| self.sprite_to_window(sprite))
                .collect(),
        });

        if self.last_hud != Some(hud) {
            self.last_hud = Some(hud);
            changed.push(self.hud_rect);
            draws.extend(self.cards.iter().cloned().map(DrawRequest::Sprite));
        }

        Frame {
            number,
            changed,
            draws,
            hud,
        }
    }

    fn changed_region(&self, event: &Event) -> Option<PixelRect> {
        match event {
            Event::TowerPlaced { region, .. } => Some(region.to_pixels(self.cell_size)),
            Event::EnemySpawned { position, size, .. }
            | Event::EnemyLeaked { position, size, .. }
            | Event::EnemyKilled { position, size, .. } => {
                Some(PixelRect::around(*position, *size))
            }
            Event::EnemyMoved { from, to, size, .. } => {
                Some(PixelRect::around(*from, *size).union(&PixelRect::around(*to, *size)))
            }
            Event::ProjectileFired { position, .. }
            | Event::ProjectileImpacted { position, .. }
            | Event::ProjectileExpired { position, .. } => {
                Some(PixelRect::around(*position, self.projectile_extent))
            }
            Event::ProjectileMoved { from, to, .. } => Some(
                PixelRect::around(*from, self.projectile_extent)
                    .union(&PixelRect::around(*to, self.projectile_extent)),
            ),
            _ => None,
        }
    }

    fn to_window(&self, rect: PixelRect) -> PixelRect {
        let offset = self.map_offset.round();
        rect.translated(offset.x as i32, offset.y as i32)
    }

    fn sprite_to_window(&self, sprite: Sprite) -> Sprite {
        Sprite {
            rect: self.to_window(sprite.rect),
            key: sprite.key,
        }
    }
}

fn bounds(rects: impl Iterator<Item = PixelRect>) -> Option<PixelRect> {
    rects.reduce(|acc, rect| acc.union(&rect))
}

/// Presents frames produced by [`RenderSync`].
pub trait RenderingBackend {
    /// Draws the frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;
}

/// Supplies the input gathered since the previous tick.
pub trait InputSource {
    /// Returns every pending event in arrival order without blocking.
    fn drain(&mut self) -> Vec<InputEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_defence_core::{
        CellCoord, CellRect, CellRectSize, EnemyId, PixelPoint, TileCategory, TowerId,
    };

    fn sync() -> RenderSync {
        RenderSync::new(
            Vec2::new(0.0, 64.0),
            16,
            6.0,
            PixelRect::new(0, 0, 320, 64),
            &[(TowerKind::Arrow, PixelRect::new(5, 8, 48, 48))],
        )
    }

    fn tile(column: u32, row: u32) -> Sprite {
        Sprite {
            key: SpriteKey::Tile(TileCategory::FreeTile),
            rect: PixelRect::new((column * 16) as i32, (row * 16) as i32, 16, 16),
        }
    }

    fn hud() -> HudSnapshot {
        HudSnapshot {
            lives: 20,
            coins: 100,
            wave: 1,
            paused: false,
        }
    }

    #[test]
    fn first_frame_draws_static_layer_and_hud() {
        let mut sync = sync();
        let frame = sync.sync(0, &[], hud(), || vec![tile(0, 0), tile(1, 1)], Vec::new());

        assert_eq!(
            frame.changed,
            vec![PixelRect::new(0, 64, 32, 32), PixelRect::new(0, 0, 320, 64)]
        );
        assert!(matches!(
            &frame.draws[0],
            DrawRequest::Layer { layer: RenderLayer::Static, sprites } if sprites.len() == 2
        ));
        assert!(frame.draws.contains(&DrawRequest::Sprite(Sprite {
            key: SpriteKey::Tower(TowerKind::Arrow),
            rect: PixelRect::new(5, 8, 48, 48),
        })));
    }

    #[test]
    fn static_layer_is_skipped_until_a_tower_is_placed() {
        let mut sync = sync();
        let _ = sync.sync(0, &[], hud(), Vec::new, Vec::new());

        let frame = sync.sync(1, &[], hud(), || panic!("static layer rebuilt"), Vec::new());
        assert!(frame.is_idle(), "nothing changed between identical ticks");

        let placed = Event::TowerPlaced {
            tower: TowerId::new(0),
            kind: TowerKind::Arrow,
            region: CellRect::from_origin_and_size(CellCoord::new(2, 0), CellRectSize::new(2, 2)),
        };
        let frame = sync.sync(2, &[placed], hud(), || vec![tile(0, 0)], Vec::new());
        assert_eq!(frame.changed[0], PixelRect::new(32, 64, 32, 32));
        assert!(matches!(
            &frame.draws[0],
            DrawRequest::Layer {
                layer: RenderLayer::Static,
                ..
            }
        ));
    }

    #[test]
    fn moving_entities_mark_both_positions() {
        let mut sync = sync();
        let _ = sync.sync(0, &[], hud(), Vec::new, Vec::new());
        let moved = Event::EnemyMoved {
            enemy: EnemyId::new(0),
            from: PixelPoint::new(8.0, 8.0),
            to: PixelPoint::new(12.0, 8.0),
            size: 4.0,
        };

        let frame = sync.sync(1, &[moved], hud(), Vec::new, Vec::new());
        assert_eq!(frame.changed, vec![PixelRect::new(6, 70, 8, 4)]);
    }

    #[test]
    fn hud_changes_redraw_the_strip() {
        let mut sync = sync();
        let _ = sync.sync(0, &[], hud(), Vec::new, Vec::new());
        let poorer = HudSnapshot { coins: 40, ..hud() };

        let frame = sync.sync(1, &[], poorer, Vec::new, Vec::new());
        assert_eq!(frame.changed, vec![PixelRect::new(0, 0, 320, 64)]);
        assert_eq!(frame.hud.coins, 40);
    }
}
