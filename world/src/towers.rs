//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use tile_defence_core::{
    CellCoord, CellRect, PixelPoint, TowerId, TowerKind, TowerSnapshot, TowerSpec,
};

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Catalog attributes captured at construction time.
    pub(crate) spec: TowerSpec,
    /// Region of cells occupied by the tower.
    pub(crate) region: CellRect,
    /// Pixel center of the footprint.
    pub(crate) center: PixelPoint,
    /// Route progress nearest to the center.
    pub(crate) anchor_progress: f32,
    /// Time left before the tower may fire.
    pub(crate) ready_in: Duration,
}

impl TowerState {
    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            region: self.region,
            center: self.center,
            range: self.spec.range,
            targeting: self.spec.targeting,
            anchor_progress: self.anchor_progress,
            ready_in: self.ready_in,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Stores a freshly built tower, ready to fire immediately.
    pub(crate) fn insert(
        &mut self,
        kind: TowerKind,
        spec: TowerSpec,
        region: CellRect,
        center: PixelPoint,
        anchor_progress: f32,
    ) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            TowerState {
                id,
                kind,
                spec,
                region,
                center,
                anchor_progress,
                ready_in: Duration::ZERO,
            },
        );
        id
    }

    /// Tower whose footprint covers the provided cell.
    pub(crate) fn occupying(&self, cell: CellCoord) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| tower.region.contains(cell))
            .map(|tower| tower.id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_defence_core::{CellRectSize, TowerCatalog};

    fn region(column: u32, row: u32) -> CellRect {
        CellRect::from_origin_and_size(CellCoord::new(column, row), CellRectSize::new(2, 2))
    }

    #[test]
    fn registry_allocates_sequential_identifiers() {
        let catalog = TowerCatalog::default();
        let spec = *catalog.spec(TowerKind::Arrow);
        let mut registry = TowerRegistry::new();

        let center = PixelPoint::default();
        let first = registry.insert(TowerKind::Arrow, spec, region(0, 0), center, 0.0);
        let second = registry.insert(TowerKind::Arrow, spec, region(4, 0), center, 0.0);

        assert_eq!(first, TowerId::new(0));
        assert_eq!(second, TowerId::new(1));
        assert_eq!(registry.iter().count(), 2);
    }

    #[test]
    fn occupying_finds_tower_by_footprint_cell() {
        let catalog = TowerCatalog::default();
        let spec = *catalog.spec(TowerKind::Cannon);
        let mut registry = TowerRegistry::new();
        let id = registry.insert(TowerKind::Cannon, spec, region(2, 3), PixelPoint::default(), 0.0);

        assert_eq!(registry.occupying(CellCoord::new(3, 4)), Some(id));
        assert_eq!(registry.occupying(CellCoord::new(4, 4)), None);
        let state = registry.get_mut(id).expect("tower stored");
        assert_eq!(state.ready_in, Duration::ZERO, "new towers are ready to fire");
    }
}
