#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use tile_defence_core::{EnemyId, EnemyView, PixelPoint, Targeting, TowerTarget, TowerView};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// Each tower picks the visible enemy in range whose route progress lies
    /// closest to the tower's anchor, breaking ties by spawn order. Splash
    /// towers add every visible enemy within the splash radius of that pick.
    /// The output buffer is cleared before populating it.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();

        if towers.is_empty() || enemies.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in towers.iter() {
            let range_sq = tower.range * tower.range;
            let mut best: Option<BestCandidate> = None;

            for candidate in &self.enemy_workspace {
                if tower.center.distance_squared(candidate.position) > range_sq {
                    continue;
                }

                let current = BestCandidate {
                    route_gap: (candidate.progress - tower.anchor_progress).abs(),
                    spawn_order: candidate.spawn_order,
                    enemy: candidate.id,
                    position: candidate.position,
                };

                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            let Some(primary) = best else {
                continue;
            };

            let mut targets = vec![primary.enemy];
            if let Targeting::Splash { radius } = tower.targeting {
                let radius_sq = radius * radius;
                targets.extend(
                    self.enemy_workspace
                        .iter()
                        .filter(|candidate| candidate.id != primary.enemy)
                        .filter(|candidate| {
                            primary.position.distance_squared(candidate.position) <= radius_sq
                        })
                        .map(|candidate| candidate.id),
                );
            }

            out.push(TowerTarget {
                tower: tower.id,
                targets,
            });
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());

        for snapshot in enemies.iter() {
            if !snapshot.detectable {
                continue;
            }
            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
                progress: snapshot.progress,
                spawn_order: snapshot.spawn_order,
            });
        }

        self.enemy_workspace
            .sort_by_key(|candidate| (candidate.spawn_order, candidate.id));
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: PixelPoint,
    progress: f32,
    spawn_order: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    route_gap: f32,
    spawn_order: u64,
    enemy: EnemyId,
    position: PixelPoint,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.route_gap != other.route_gap {
            return self.route_gap < other.route_gap;
        }

        if self.spawn_order != other.spawn_order {
            return self.spawn_order < other.spawn_order;
        }

        self.enemy < other.enemy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(gap: f32, spawn_order: u64, id: u32) -> BestCandidate {
        BestCandidate {
            route_gap: gap,
            spawn_order,
            enemy: EnemyId::new(id),
            position: PixelPoint::default(),
        }
    }

    #[test]
    fn smaller_route_gap_wins() {
        assert!(candidate(1.0, 5, 5).precedes(&candidate(2.0, 0, 0)));
        assert!(!candidate(2.0, 0, 0).precedes(&candidate(1.0, 5, 5)));
    }

    #[test]
    fn spawn_order_breaks_ties() {
        assert!(candidate(1.0, 0, 9).precedes(&candidate(1.0, 1, 0)));
        assert!(!candidate(1.0, 1, 0).precedes(&candidate(1.0, 0, 9)));
    }
}
