//! Projectile registry.

use std::collections::BTreeMap;

use tile_defence_core::{AmmoKind, EnemyId, PixelPoint, ProjectileId, TowerId};

#[derive(Clone, Debug)]
pub(crate) struct ProjectileState {
    pub(crate) tower: TowerId,
    pub(crate) target: EnemyId,
    pub(crate) ammo: AmmoKind,
    pub(crate) damage: u32,
    pub(crate) position: PixelPoint,
    pub(crate) speed: f32,
}

#[derive(Debug)]
pub(crate) struct ProjectileRegistry {
    entries: BTreeMap<ProjectileId, ProjectileState>,
    next_projectile_id: ProjectileId,
}

impl ProjectileRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    pub(crate) fn spawn(
        &mut self,
        tower: TowerId,
        target: EnemyId,
        ammo: AmmoKind,
        damage: u32,
        position: PixelPoint,
        speed: f32,
    ) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            ProjectileState {
                tower,
                target,
                ammo,
                damage,
                position,
                speed,
            },
        );
        id
    }

    /// Identifiers of every projectile in flight, oldest first.
    pub(crate) fn ids(&self) -> Vec<ProjectileId> {
        self.entries.keys().copied().collect()
    }

    pub(crate) fn get_mut(&mut self, id: ProjectileId) -> Option<&mut ProjectileState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: ProjectileId) -> Option<ProjectileState> {
        self.entries.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ProjectileState> {
        self.entries.values()
    }
}
