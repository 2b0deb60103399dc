#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tile Defence.

mod economy;
mod enemies;
mod projectiles;
pub mod route;
pub mod tiles;
mod towers;

use tile_defence_core::{
    CellCoord, CellRect, Command, EnemyBlueprint, EnemyId, Event, LevelDescription,
    PlacementError, TileClass, TowerCatalog, TowerId, TowerKind,
};
use tracing::{debug, info};

use economy::Economy;
use enemies::{EnemyRegistry, Lifecycle};
use projectiles::ProjectileRegistry;
use route::{LevelError, Route};
use tiles::TileGrid;
use towers::TowerRegistry;

/// Parameters required to build a world from a level.
#[derive(Clone, Debug, Default)]
pub struct WorldConfig {
    /// Edge length of a cell in map pixels.
    pub cell_size: u32,
    /// Coins available at the start.
    pub coins: u32,
    /// Lives available at the start.
    pub lives: u32,
    /// Wave counter value at the start.
    pub start_wave: u32,
    /// Purchasable towers.
    pub towers: TowerCatalog,
}

/// Represents the authoritative Tile Defence world state.
#[derive(Debug)]
pub struct World {
    cell_size: u32,
    tiles: TileGrid,
    route: Route,
    catalog: TowerCatalog,
    economy: Economy,
    towers: TowerRegistry,
    enemies: EnemyRegistry,
    projectiles: ProjectileRegistry,
    active_wave: Option<u32>,
    game_over: bool,
}

impl World {
    /// Creates a world from a level description.
    pub fn new(level: &LevelDescription, config: WorldConfig) -> Result<Self, LevelError> {
        let cell_size = config.cell_size.max(1);
        let tiles = TileGrid::from_level(level)?;
        let route = Route::trace(level, cell_size)?;
        info!(
            columns = tiles.columns(),
            rows = tiles.rows(),
            route_cells = route.cells().len(),
            "world created"
        );
        Ok(Self {
            cell_size,
            tiles,
            route,
            catalog: config.towers,
            economy: Economy::new(config.coins, config.lives, config.start_wave),
            towers: TowerRegistry::new(),
            enemies: EnemyRegistry::new(),
            projectiles: ProjectileRegistry::new(),
            active_wave: None,
            game_over: false,
        })
    }

    fn purge_dead(&mut self, out_events: &mut Vec<Event>) {
        let mut coins_changed = false;
        for enemy in self.enemies.purge_dead() {
            if enemy.health > 0 {
                continue;
            }
            self.economy.earn(enemy.blueprint.reward);
            coins_changed = true;
            out_events.push(Event::EnemyKilled {
                enemy: enemy.id,
                position: enemy.position,
                size: enemy.blueprint.size,
                reward: enemy.blueprint.reward,
            });
        }
        if coins_changed {
            out_events.push(Event::CoinsChanged {
                coins: self.economy.coins(),
            });
        }
    }

    fn settle_wave(&mut self, out_events: &mut Vec<Event>) {
        let Some(wave) = self.active_wave else {
            return;
        };
        if !self.enemies.is_empty() {
            return;
        }
        self.active_wave = None;
        let next_wave = self.economy.advance_wave();
        info!(wave, next_wave, "wave cleared");
        out_events.push(Event::WaveCleared { wave, next_wave });
    }

    fn advance_enemies(&mut self, dt: std::time::Duration, out_events: &mut Vec<Event>) {
        let length = self.route.length();
        let seconds = dt.as_secs_f32();
        let mut leaked = 0_u32;
        for enemy in self.enemies.live_mut() {
            let from = enemy.position;
            enemy.progress += enemy.blueprint.speed * seconds;
            if enemy.progress >= length {
                enemy.lifecycle = Lifecycle::Dead;
                leaked += 1;
                out_events.push(Event::EnemyLeaked {
                    enemy: enemy.id,
                    position: from,
                    size: enemy.blueprint.size,
                });
                continue;
            }
            enemy.position = self.route.point_at(enemy.progress);
            out_events.push(Event::EnemyMoved {
                enemy: enemy.id,
                from,
                to: enemy.position,
                size: enemy.blueprint.size,
            });
        }

        for _ in 0..leaked {
            let lives = self.economy.lose_life();
            out_events.push(Event::LivesChanged { lives });
            if lives == 0 && !self.game_over {
                self.game_over = true;
                let wave = self.economy.wave();
                info!(wave, "no lives left");
                out_events.push(Event::GameOver { wave });
            }
        }
    }

    fn fire(&mut self, tower: TowerId, targets: Vec<EnemyId>, out_events: &mut Vec<Event>) {
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };
        if !state.ready_in.is_zero() {
            return;
        }

        let mut fired = false;
        for target in targets {
            if !self.enemies.get(target).is_some_and(|enemy| enemy.is_live()) {
                continue;
            }
            let projectile = self.projectiles.spawn(
                tower,
                target,
                state.spec.ammo,
                state.spec.damage,
                state.center,
                state.spec.projectile_speed,
            );
            fired = true;
            out_events.push(Event::ProjectileFired {
                projectile,
                tower,
                target,
                position: state.center,
            });
        }

        if fired {
            state.ready_in = state.spec.reload();
        }
    }

    fn resolve_projectiles(&mut self, dt: std::time::Duration, out_events: &mut Vec<Event>) {
        let seconds = dt.as_secs_f32();
        for id in self.projectiles.ids() {
            let Some(projectile) = self.projectiles.get_mut(id) else {
                continue;
            };
            let target = self
                .enemies
                .get_mut(projectile.target)
                .filter(|enemy| enemy.is_live());
            let Some(target) = target else {
                let position = projectile.position;
                let _ = self.projectiles.remove(id);
                out_events.push(Event::ProjectileExpired {
                    projectile: id,
                    position,
                });
                continue;
            };

            let from = projectile.position;
            let (to, reached) = from.step_towards(target.position, projectile.speed * seconds);
            projectile.position = to;
            if !reached {
                out_events.push(Event::ProjectileMoved {
                    projectile: id,
                    from,
                    to,
                });
                continue;
            }

            target.health = target.health.saturating_sub(projectile.damage);
            if target.health == 0 {
                target.lifecycle = Lifecycle::Dead;
            }
            debug!(
                projectile = id.get(),
                tower = projectile.tower.get(),
                enemy = target.id.get(),
                health = target.health,
                "projectile impact"
            );
            out_events.push(Event::ProjectileImpacted {
                projectile: id,
                target: target.id,
                damage: projectile.damage,
                position: to,
            });
            let _ = self.projectiles.remove(id);
        }
    }

    fn release(&mut self, enemy: EnemyId, out_events: &mut Vec<Event>) {
        let start = self.route.point_at(0.0);
        match self.enemies.release(enemy, start) {
            Some(state) => {
                debug!(enemy = enemy.get(), name = %state.blueprint.name, "enemy spawned");
                out_events.push(Event::EnemySpawned {
                    enemy,
                    position: state.position,
                    size: state.blueprint.size,
                });
            }
            None => debug!(enemy = enemy.get(), "ignoring release of non-head enemy"),
        }
    }

    fn queue_wave(&mut self, wave: u32, enemies: Vec<EnemyBlueprint>, out_events: &mut Vec<Event>) {
        let count = self.enemies.queue(enemies);
        self.active_wave = Some(wave);
        info!(wave, enemies = count, "wave queued");
        out_events.push(Event::WaveQueued {
            wave,
            enemies: count,
        });
        self.settle_wave(out_events);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            for tower in world.towers.iter_mut() {
                tower.ready_in = tower.ready_in.saturating_sub(dt);
            }
            world.advance_enemies(dt, out_events);
            let _ = world.enemies.purge_dead();
            world.settle_wave(out_events);
        }
        Command::PlaceTower { kind, origin } => {
            let _ = place_tower(world, kind, origin, out_events);
        }
        Command::QueueWave { wave, enemies } => world.queue_wave(wave, enemies, out_events),
        Command::ReleaseEnemy { enemy } => world.release(enemy, out_events),
        Command::FireProjectile { tower, targets } => world.fire(tower, targets, out_events),
        Command::ResolveProjectiles { dt } => {
            world.resolve_projectiles(dt, out_events);
            world.purge_dead(out_events);
            world.settle_wave(out_events);
        }
    }
}

/// Validates and commits a tower purchase.
///
/// The grid and economy are left untouched whenever an error is returned.
pub fn place_tower(
    world: &mut World,
    kind: TowerKind,
    origin: CellCoord,
    out_events: &mut Vec<Event>,
) -> Result<TowerId, PlacementError> {
    match validate_placement(world, kind, origin) {
        Ok(region) => {
            let spec = *world.catalog.spec(kind);
            if world.tiles.occupy(region.cells()).is_err() {
                return reject(kind, origin, PlacementError::InvalidTile, out_events);
            }
            world.economy.spend(spec.cost);
            let center = region.center(world.cell_size);
            let anchor = world.route.closest_progress(center);
            let tower = world.towers.insert(kind, spec, region, center, anchor);
            debug!(
                tower = tower.get(),
                kind = kind.name(),
                column = origin.column(),
                row = origin.row(),
                "tower placed"
            );
            out_events.push(Event::TowerPlaced {
                tower,
                kind,
                region,
            });
            out_events.push(Event::CoinsChanged {
                coins: world.economy.coins(),
            });
            Ok(tower)
        }
        Err(reason) => reject(kind, origin, reason, out_events),
    }
}

fn reject(
    kind: TowerKind,
    origin: CellCoord,
    reason: PlacementError,
    out_events: &mut Vec<Event>,
) -> Result<TowerId, PlacementError> {
    debug!(
        kind = kind.name(),
        column = origin.column(),
        row = origin.row(),
        %reason,
        "tower placement rejected"
    );
    out_events.push(Event::TowerPlacementRejected {
        kind,
        origin,
        reason,
    });
    Err(reason)
}

fn validate_placement(
    world: &World,
    kind: TowerKind,
    origin: CellCoord,
) -> Result<CellRect, PlacementError> {
    let spec = world.catalog.spec(kind);
    if !world.economy.can_afford(spec.cost) {
        return Err(PlacementError::InsufficientFunds);
    }

    let region = CellRect::from_origin_and_size(origin, spec.footprint);
    for cell in region.cells() {
        if !world.tiles.contains(cell)
            || cell.column() < origin.column()
            || cell.row() < origin.row()
        {
            return Err(PlacementError::OutOfBounds);
        }
        match world.tiles.classify(cell) {
            Some(TileClass::Default) => {}
            Some(TileClass::Wall) => return Err(PlacementError::BlockedByWall),
            Some(TileClass::Occupied) => {
                return Err(if world.towers.occupying(cell).is_some() {
                    PlacementError::BlockedByTower
                } else {
                    PlacementError::BlockedByPath
                });
            }
            None => return Err(PlacementError::InvalidTile),
        }
    }
    Ok(region)
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tile_defence_core::{
        CellCoord, EnemyView, HudSnapshot, PendingView, PixelRect, RenderLayer, Sprite,
        SpriteKey, TileClass, TowerSpec, TowerKind, TowerView,
    };

    use super::{route::Route, tiles::TileGrid, World};

    /// Edge length of a cell in map pixels.
    #[must_use]
    pub fn cell_size(world: &World) -> u32 {
        world.cell_size
    }

    /// Provides read-only access to the tile grid.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.tiles
    }

    /// Provides read-only access to the enemy route.
    #[must_use]
    pub fn route(world: &World) -> &Route {
        &world.route
    }

    /// Current classification of a cell.
    #[must_use]
    pub fn classify(world: &World, cell: CellCoord) -> Option<TileClass> {
        world.tiles.classify(cell)
    }

    /// Catalog attributes of a tower kind.
    #[must_use]
    pub fn tower_spec(world: &World, kind: TowerKind) -> &TowerSpec {
        world.catalog.spec(kind)
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.live().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures the pending queue in release order.
    #[must_use]
    pub fn pending_view(world: &World) -> PendingView {
        PendingView::from_queue(world.enemies.pending().collect())
    }

    /// Number of projectiles in flight.
    #[must_use]
    pub fn projectile_count(world: &World) -> usize {
        world.projectiles.iter().count()
    }

    /// Coins available to the player.
    #[must_use]
    pub fn coins(world: &World) -> u32 {
        world.economy.coins()
    }

    /// Lives remaining.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.economy.lives()
    }

    /// Current wave counter.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.economy.wave()
    }

    /// Wave whose enemies are still pending or live, if any.
    #[must_use]
    pub fn active_wave(world: &World) -> Option<u32> {
        world.active_wave
    }

    /// Reports whether the player ran out of lives.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }

    /// Samples the values shown by the HUD.
    #[must_use]
    pub fn hud(world: &World, paused: bool) -> HudSnapshot {
        HudSnapshot {
            lives: world.economy.lives(),
            coins: world.economy.coins(),
            wave: world.economy.wave(),
            paused,
        }
    }

    /// Sprites making up a render layer in draw order.
    #[must_use]
    pub fn render_batch(world: &World, layer: RenderLayer) -> Vec<Sprite> {
        let cell_size = world.cell_size;
        match layer {
            RenderLayer::Static => {
                let tiles = world.tiles.iter().map(|(cell, tile)| Sprite {
                    key: SpriteKey::Tile(tile.category),
                    rect: cell_rect(cell, cell_size),
                });
                let towers = world.towers.iter().map(|tower| Sprite {
                    key: SpriteKey::Tower(tower.kind),
                    rect: tower.region.to_pixels(cell_size),
                });
                tiles.chain(towers).collect()
            }
            RenderLayer::Moving => {
                let enemies = world.enemies.live().map(|enemy| Sprite {
                    key: SpriteKey::Enemy(enemy.blueprint.name.clone()),
                    rect: PixelRect::around(enemy.position, enemy.blueprint.size),
                });
                let projectiles = world.projectiles.iter().map(|projectile| Sprite {
                    key: SpriteKey::Ammo(projectile.ammo),
                    rect: PixelRect::around(projectile.position, PROJECTILE_EXTENT),
                });
                enemies.chain(projectiles).collect()
            }
        }
    }

    /// Edge length of a projectile sprite in pixels.
    pub const PROJECTILE_EXTENT: f32 = 6.0;

    fn cell_rect(cell: CellCoord, cell_size: u32) -> PixelRect {
        let corner = cell.top_left(cell_size);
        PixelRect::new(corner.x as i32, corner.y as i32, cell_size, cell_size)
    }
}
