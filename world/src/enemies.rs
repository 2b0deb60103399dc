//! Enemy registry tracking the pending queue and live enemies.

use std::collections::{BTreeMap, VecDeque};

use tile_defence_core::{EnemyBlueprint, EnemyId, EnemySnapshot, PendingEnemy, PixelPoint};

/// Lifecycle stage of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    /// Queued, waiting for the spawner.
    Pending,
    /// Walking the route.
    Live,
    /// Killed or leaked, removed before the command returns.
    Dead,
}

#[derive(Clone, Debug)]
pub(crate) struct EnemyState {
    pub(crate) id: EnemyId,
    pub(crate) blueprint: EnemyBlueprint,
    pub(crate) health: u32,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) position: PixelPoint,
    pub(crate) progress: f32,
    pub(crate) spawn_order: u64,
}

impl EnemyState {
    pub(crate) fn is_live(&self) -> bool {
        self.lifecycle == Lifecycle::Live
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            name: self.blueprint.name.clone(),
            position: self.position,
            progress: self.progress,
            health: self.health,
            size: self.blueprint.size,
            detectable: self.blueprint.detectable,
            level: self.blueprint.level,
            spawn_order: self.spawn_order,
        }
    }
}

/// Stores every enemy of the session keyed by identifier.
#[derive(Debug)]
pub(crate) struct EnemyRegistry {
    entries: BTreeMap<EnemyId, EnemyState>,
    pending: VecDeque<EnemyId>,
    next_enemy_id: EnemyId,
    next_spawn_order: u64,
}

impl EnemyRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            pending: VecDeque::new(),
            next_enemy_id: EnemyId::new(0),
            next_spawn_order: 0,
        }
    }

    /// Appends the blueprints to the pending queue in order.
    pub(crate) fn queue(&mut self, blueprints: Vec<EnemyBlueprint>) -> usize {
        let count = blueprints.len();
        for blueprint in blueprints {
            let id = self.next_enemy_id;
            self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
            let spawn_order = self.next_spawn_order;
            self.next_spawn_order = self.next_spawn_order.saturating_add(1);
            let _ = self.entries.insert(
                id,
                EnemyState {
                    id,
                    health: blueprint.health,
                    blueprint,
                    lifecycle: Lifecycle::Pending,
                    position: PixelPoint::default(),
                    progress: 0.0,
                    spawn_order,
                },
            );
            self.pending.push_back(id);
        }
        count
    }

    /// Moves the head of the pending queue into the live set.
    ///
    /// Returns `None` without side effects when `id` is not the queue head.
    pub(crate) fn release(&mut self, id: EnemyId, position: PixelPoint) -> Option<&EnemyState> {
        if self.pending.front() != Some(&id) {
            return None;
        }
        let _ = self.pending.pop_front();
        let enemy = self.entries.get_mut(&id)?;
        enemy.lifecycle = Lifecycle::Live;
        enemy.position = position;
        enemy.progress = 0.0;
        Some(enemy)
    }

    pub(crate) fn get(&self, id: EnemyId) -> Option<&EnemyState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EnemyId) -> Option<&mut EnemyState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn live(&self) -> impl Iterator<Item = &EnemyState> {
        self.entries.values().filter(|enemy| enemy.is_live())
    }

    pub(crate) fn live_mut(&mut self) -> impl Iterator<Item = &mut EnemyState> {
        self.entries.values_mut().filter(|enemy| enemy.is_live())
    }

    /// Pending enemies in release order.
    pub(crate) fn pending(&self) -> impl Iterator<Item = PendingEnemy> + '_ {
        self.pending.iter().filter_map(|id| {
            self.entries.get(id).map(|enemy| PendingEnemy {
                id: enemy.id,
                speed: enemy.blueprint.speed,
                size: enemy.blueprint.size,
            })
        })
    }

    /// Removes and returns every enemy tagged as dead, in identifier order.
    pub(crate) fn purge_dead(&mut self) -> Vec<EnemyState> {
        let dead: Vec<EnemyId> = self
            .entries
            .values()
            .filter(|enemy| enemy.lifecycle == Lifecycle::Dead)
            .map(|enemy| enemy.id)
            .collect();
        dead.into_iter()
            .filter_map(|id| self.entries.remove(&id))
            .collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{EnemyRegistry, Lifecycle};
    use tile_defence_core::{EnemyBlueprint, EnemyId, PixelPoint};

    fn blueprint(name: &str) -> EnemyBlueprint {
        EnemyBlueprint {
            name: name.to_owned(),
            health: 3,
            speed: 10.0,
            size: 8.0,
            detectable: true,
            level: 1,
            reward: 2,
        }
    }

    #[test]
    fn release_only_accepts_queue_head() {
        let mut registry = EnemyRegistry::new();
        let queued = registry.queue(vec![blueprint("slime"), blueprint("runner")]);
        assert_eq!(queued, 2);

        assert!(
            registry.release(EnemyId::new(1), PixelPoint::default()).is_none(),
            "second enemy cannot skip the queue"
        );
        assert_eq!(registry.pending().count(), 2);

        let released = registry
            .release(EnemyId::new(0), PixelPoint::new(4.0, 4.0))
            .expect("head is released");
        assert_eq!(released.lifecycle, Lifecycle::Live);
        assert_eq!(registry.pending().count(), 1);
        assert_eq!(registry.live().count(), 1);
    }

    #[test]
    fn purge_removes_only_dead_enemies() {
        let mut registry = EnemyRegistry::new();
        let _ = registry.queue(vec![blueprint("slime"), blueprint("runner")]);
        let _ = registry.release(EnemyId::new(0), PixelPoint::default());
        if let Some(enemy) = registry.get_mut(EnemyId::new(0)) {
            enemy.lifecycle = Lifecycle::Dead;
        }

        let purged = registry.purge_dead();
        assert_eq!(purged.len(), 1);
        assert_eq!(purged[0].id, EnemyId::new(0));
        assert!(registry.get(EnemyId::new(0)).is_none());
        assert!(!registry.is_empty(), "pending enemy remains registered");
    }
}
