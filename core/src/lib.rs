#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tile Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! the render sync to react to. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

pub mod catalog;
pub mod config;
pub mod level;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::{
    CatalogError, EnemyCatalog, EnemySpec, RosterEntry, TowerCatalog, TowerSpec, WaveDefinition,
    WaveGrowth, WaveTable,
};
pub use config::{EconomyConfig, GameConfig, SessionConfig, SpawnCadence, WindowConfig};
pub use level::{LevelDescription, TileCategory, UnrecognizedTileCategory};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances reload countdowns and moves live enemies along the route.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests placement of a tower anchored at the provided origin cell.
    PlaceTower {
        /// Type of tower to construct at the origin.
        kind: TowerKind,
        /// Upper-left cell that defines the tower's footprint.
        origin: CellCoord,
    },
    /// Registers the enemies of a freshly generated wave as pending.
    QueueWave {
        /// Wave index the enemies belong to.
        wave: u32,
        /// Ordered enemy descriptors, head of the queue first.
        enemies: Vec<EnemyBlueprint>,
    },
    /// Releases a pending enemy into the live simulation.
    ReleaseEnemy {
        /// Identifier of the enemy at the head of the pending queue.
        enemy: EnemyId,
    },
    /// Requests that a tower fires one projectile at each listed enemy.
    FireProjectile {
        /// Tower that fires.
        tower: TowerId,
        /// Enemies to shoot at, primary target first.
        targets: Vec<EnemyId>,
    },
    /// Moves projectiles, applies impacts, and removes defeated enemies.
    ResolveProjectiles {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Region of cells occupied by the tower.
        region: CellRect,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Origin cell provided in the placement request.
        origin: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Announces that a wave's enemies are waiting to be spawned.
    WaveQueued {
        /// Wave index that was queued.
        wave: u32,
        /// Number of enemies registered as pending.
        enemies: usize,
    },
    /// Confirms that a pending enemy entered the live simulation.
    EnemySpawned {
        /// Identifier of the released enemy.
        enemy: EnemyId,
        /// Pixel position at which the enemy appeared.
        position: PixelPoint,
        /// Diameter of the enemy in pixels.
        size: f32,
    },
    /// Reports that a live enemy moved along the route.
    EnemyMoved {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Position before the move.
        from: PixelPoint,
        /// Position after the move.
        to: PixelPoint,
        /// Diameter of the enemy in pixels.
        size: f32,
    },
    /// Reports that an enemy reached the end of the route.
    EnemyLeaked {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
        /// Last position of the enemy.
        position: PixelPoint,
        /// Diameter of the enemy in pixels.
        size: f32,
    },
    /// Reports that an enemy's health dropped to zero.
    EnemyKilled {
        /// Identifier of the defeated enemy.
        enemy: EnemyId,
        /// Last position of the enemy.
        position: PixelPoint,
        /// Diameter of the enemy in pixels.
        size: f32,
        /// Coins credited for the kill.
        reward: u32,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy being chased.
        target: EnemyId,
        /// Launch position.
        position: PixelPoint,
    },
    /// Reports that a projectile travelled toward its target.
    ProjectileMoved {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Position before the move.
        from: PixelPoint,
        /// Position after the move.
        to: PixelPoint,
    },
    /// Reports that a projectile hit its target and was removed.
    ProjectileImpacted {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Enemy that was hit.
        target: EnemyId,
        /// Damage applied to the target.
        damage: u32,
        /// Impact position.
        position: PixelPoint,
    },
    /// Reports that a projectile lost its target and was removed.
    ProjectileExpired {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Last position of the projectile.
        position: PixelPoint,
    },
    /// Announces the new coin balance.
    CoinsChanged {
        /// Coins available after the change.
        coins: u32,
    },
    /// Announces the new number of lives.
    LivesChanged {
        /// Lives remaining after the change.
        lives: u32,
    },
    /// Announces that every enemy of a wave was spawned and resolved.
    WaveCleared {
        /// Wave that was cleared.
        wave: u32,
        /// Wave index that becomes current.
        next_wave: u32,
    },
    /// Announces that the player ran out of lives.
    GameOver {
        /// Wave during which the session ended.
        wave: u32,
    },
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy when its wave is queued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Pixel position of the cell's top-left corner.
    #[must_use]
    pub fn top_left(self, cell_size: u32) -> PixelPoint {
        PixelPoint::new(
            (self.column as f32) * cell_size as f32,
            (self.row as f32) * cell_size as f32,
        )
    }

    /// Pixel position of the cell's center.
    #[must_use]
    pub fn center(self, cell_size: u32) -> PixelPoint {
        let half = cell_size as f32 / 2.0;
        let corner = self.top_left(cell_size);
        PixelPoint::new(corner.x + half, corner.y + half)
    }
}

impl From<[u32; 2]> for CellCoord {
    fn from([column, row]: [u32; 2]) -> Self {
        Self::new(column, row)
    }
}

impl From<CellCoord> for [u32; 2] {
    fn from(cell: CellCoord) -> Self {
        [cell.column, cell.row]
    }
}

/// Axis-aligned rectangle expressed in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    origin: CellCoord,
    size: CellRectSize,
}

impl CellRect {
    /// Constructs a rectangle from an origin cell and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: CellCoord, size: CellRectSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole cells.
    #[must_use]
    pub const fn size(&self) -> CellRectSize {
        self.size
    }

    /// Iterates the covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let origin = self.origin;
        let size = self.size;
        (0..size.height()).flat_map(move |dy| {
            (0..size.width()).map(move |dx| {
                CellCoord::new(
                    origin.column().saturating_add(dx),
                    origin.row().saturating_add(dy),
                )
            })
        })
    }

    /// Reports whether the rectangle covers the provided cell.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        let column = u64::from(cell.column());
        let row = u64::from(cell.row());
        let left = u64::from(self.origin.column());
        let top = u64::from(self.origin.row());
        column >= left
            && row >= top
            && column < left + u64::from(self.size.width())
            && row < top + u64::from(self.size.height())
    }

    /// Converts the rectangle into screen pixels using the given cell size.
    #[must_use]
    pub fn to_pixels(&self, cell_size: u32) -> PixelRect {
        let corner = self.origin.top_left(cell_size);
        PixelRect::new(
            corner.x as i32,
            corner.y as i32,
            self.size.width().saturating_mul(cell_size),
            self.size.height().saturating_mul(cell_size),
        )
    }

    /// Pixel position of the rectangle's center.
    #[must_use]
    pub fn center(&self, cell_size: u32) -> PixelPoint {
        let corner = self.origin.top_left(cell_size);
        PixelPoint::new(
            corner.x + (self.size.width() * cell_size) as f32 / 2.0,
            corner.y + (self.size.height() * cell_size) as f32 / 2.0,
        )
    }
}

/// Size of a [`CellRect`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRectSize {
    width: u32,
    height: u32,
}

impl CellRectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the size covers no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Continuous position measured in map pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PixelPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl PixelPoint {
    /// Creates a new pixel position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another position.
    #[must_use]
    pub fn distance_squared(self, other: PixelPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance(self, other: PixelPoint) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Moves toward `target` by at most `max_step` pixels.
    ///
    /// Returns the new position and whether the target was reached.
    #[must_use]
    pub fn step_towards(self, target: PixelPoint, max_step: f32) -> (PixelPoint, bool) {
        let distance = self.distance(target);
        if distance <= max_step || distance <= f32::EPSILON {
            return (target, true);
        }

        let ratio = max_step / distance;
        let next = PixelPoint::new(
            self.x + (target.x - self.x) * ratio,
            self.y + (target.y - self.y) * ratio,
        );
        (next, false)
    }
}

/// Integer screen rectangle used to report changed regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelRect {
    /// Left edge in pixels.
    pub x: i32,
    /// Top edge in pixels.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Creates a rectangle from its top-left corner and dimensions.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest integer rectangle enclosing a square of `extent` pixels centered on `center`.
    #[must_use]
    pub fn around(center: PixelPoint, extent: f32) -> Self {
        let half = extent.max(0.0) / 2.0;
        let left = (center.x - half).floor();
        let top = (center.y - half).floor();
        let right = (center.x + half).ceil();
        let bottom = (center.y + half).ceil();
        Self::new(
            left as i32,
            top as i32,
            (right - left).max(1.0) as u32,
            (bottom - top).max(1.0) as u32,
        )
    }

    /// Smallest rectangle enclosing both rectangles.
    #[must_use]
    pub fn union(&self, other: &PixelRect) -> Self {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(
            left,
            top,
            (right - i64::from(left)) as u32,
            (bottom - i64::from(top)) as u32,
        )
    }

    /// Returns the rectangle shifted by the provided offsets.
    #[must_use]
    pub const fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Reports whether the point lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= self.x as f32
            && point.y >= self.y as f32
            && point.x < self.right() as f32
            && point.y < self.bottom() as f32
    }

    fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }
}

/// Occupancy classification of a map tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileClass {
    /// Free tile that accepts tower placement.
    Default,
    /// Tile taken by the enemy route or by a tower footprint.
    Occupied,
    /// Blocking tile that never accepts towers.
    Wall,
}

/// Types of towers that can be purchased.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Fast single-target tower.
    Arrow,
    /// Slow tower whose shots hit every enemy around the primary target.
    Cannon,
}

impl TowerKind {
    /// Every tower kind in card order.
    pub const ALL: [TowerKind; 2] = [TowerKind::Arrow, TowerKind::Cannon];

    /// Symbolic name used for asset lookup and logging.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Arrow => "arrow",
            Self::Cannon => "cannon",
        }
    }

    /// Resolves a symbolic name back into a tower kind.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Kind of projectile a tower launches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmmoKind {
    /// Thin fast projectile.
    Arrow,
    /// Heavy projectile.
    Cannonball,
}

impl AmmoKind {
    /// Symbolic name used for asset lookup.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Arrow => "arrow",
            Self::Cannonball => "cannonball",
        }
    }
}

/// Targeting behaviour of a tower.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Targeting {
    /// Shoots only the selected enemy.
    Projectile,
    /// Also shoots every enemy within `radius` pixels of the selected enemy.
    Splash {
        /// Radius around the primary target in pixels.
        radius: f32,
    },
}

/// Difficulty setting that selects the wave growth curve and roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Slow-growing waves.
    Easy,
    /// Default growth.
    Normal,
    /// Fast-growing waves with tougher rosters.
    Hard,
}

impl Difficulty {
    /// Stable label mixed into wave seeds.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }

    /// Resolves a label back into a difficulty.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        [Self::Easy, Self::Normal, Self::Hard]
            .into_iter()
            .find(|difficulty| difficulty.label() == label)
    }
}

/// Fully resolved enemy attributes produced by wave generation.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyBlueprint {
    /// Catalog name of the enemy kind.
    pub name: String,
    /// Starting health.
    pub health: u32,
    /// Travel speed in pixels per second.
    pub speed: f32,
    /// Diameter in pixels.
    pub size: f32,
    /// Whether towers can see the enemy.
    pub detectable: bool,
    /// Difficulty level of the enemy kind.
    pub level: u32,
    /// Coins credited when the enemy is defeated.
    pub reward: u32,
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The player cannot afford the tower.
    #[error("not enough coins to buy the tower")]
    InsufficientFunds,
    /// A footprint cell is a wall.
    #[error("tower footprint overlaps a wall")]
    BlockedByWall,
    /// A footprint cell belongs to an existing tower.
    #[error("tower footprint overlaps another tower")]
    BlockedByTower,
    /// A footprint cell belongs to the enemy route.
    #[error("tower footprint overlaps the enemy path")]
    BlockedByPath,
    /// The footprint extends beyond the map.
    #[error("tower footprint extends beyond the map")]
    OutOfBounds,
    /// A footprint cell carries no usable classification.
    #[error("tower footprint covers an unclassified tile")]
    InvalidTile,
}

/// Read-only snapshot describing all towers placed within the map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of towers captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Region of cells occupied by the tower.
    pub region: CellRect,
    /// Pixel center of the footprint.
    pub center: PixelPoint,
    /// Targeting range in pixels.
    pub range: f32,
    /// Targeting behaviour.
    pub targeting: Targeting,
    /// Route progress of the path point nearest to the tower.
    pub anchor_progress: f32,
    /// Time left until the tower may fire again.
    pub ready_in: Duration,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a live enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Catalog name of the enemy kind.
    pub name: String,
    /// Current pixel position.
    pub position: PixelPoint,
    /// Distance travelled along the route in pixels.
    pub progress: f32,
    /// Remaining health.
    pub health: u32,
    /// Diameter in pixels.
    pub size: f32,
    /// Whether towers can see the enemy.
    pub detectable: bool,
    /// Difficulty level of the enemy kind.
    pub level: u32,
    /// Position of the enemy in the order enemies were queued.
    pub spawn_order: u64,
}

/// Minimal description of a queued enemy consumed by the spawner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingEnemy {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Travel speed in pixels per second.
    pub speed: f32,
    /// Diameter in pixels.
    pub size: f32,
}

/// Targets selected for a single tower during one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TowerTarget {
    /// Tower that owns the selection.
    pub tower: TowerId,
    /// Enemies to shoot at, primary target first.
    pub targets: Vec<EnemyId>,
}

/// Values shown by the HUD, sampled once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct HudSnapshot {
    /// Lives remaining.
    pub lives: u32,
    /// Coins available.
    pub coins: u32,
    /// Current wave index.
    pub wave: u32,
    /// Whether the simulation is paused.
    pub paused: bool,
}

/// Keyboard keys the core reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCode {
    /// Toggles pause.
    Escape,
    /// Any key without a binding.
    Other,
}

/// Pointer buttons the core distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Usually the left mouse button.
    Primary,
    /// Usually the right mouse button.
    Secondary,
    /// Any other button.
    Other,
}

/// Abstract input events drained from the input collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// The window was asked to close.
    Quit,
    /// A key was pressed.
    KeyDown(KeyCode),
    /// A pointer button was pressed at a window position.
    PointerDown {
        /// Button that was pressed.
        button: PointerButton,
        /// Window position in pixels.
        position: PixelPoint,
    },
}

/// Read-only snapshot of the pending enemy queue, head first.
#[derive(Clone, Debug, Default)]
pub struct PendingView {
    queue: Vec<PendingEnemy>,
}

impl PendingView {
    /// Creates a view from enemies listed in release order.
    #[must_use]
    pub fn from_queue(queue: Vec<PendingEnemy>) -> Self {
        Self { queue }
    }

    /// Enemy that will be released next.
    #[must_use]
    pub fn head(&self) -> Option<&PendingEnemy> {
        self.queue.first()
    }

    /// Enemy that follows the head.
    #[must_use]
    pub fn second(&self) -> Option<&PendingEnemy> {
        self.queue.get(1)
    }

    /// Number of enemies waiting to be released.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Reports whether no enemy waits to be released.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Render batches that are redrawn as a whole.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Tiles and towers.
    Static,
    /// Enemies and projectiles.
    Moving,
}

/// Symbolic reference to a texture resolved by the asset collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKey {
    /// Terrain of a tile category.
    Tile(TileCategory),
    /// Tower body, also used for the HUD card.
    Tower(TowerKind),
    /// Projectile.
    Ammo(AmmoKind),
    /// Enemy kind by catalog name.
    Enemy(String),
}

/// Single drawable placed in map pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    /// Texture to draw.
    pub key: SpriteKey,
    /// Destination rectangle in map pixels.
    pub rect: PixelRect,
}
