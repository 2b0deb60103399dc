#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turns target selections into firing commands for reloaded towers.

use std::collections::BTreeSet;

use tile_defence_core::{Command, TowerId, TowerTarget, TowerView};

/// Gates target selections on tower reload state.
#[derive(Debug, Default)]
pub struct TowerCombat {
    armed: BTreeSet<TowerId>,
}

impl TowerCombat {
    /// Creates the combat system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one `Command::FireProjectile` per reloaded tower with a
    /// non-empty selection, in selection order.
    ///
    /// A tower fires at most once per call even when it appears in several
    /// selections; its first selection wins.
    pub fn handle(
        &mut self,
        towers: &TowerView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        self.armed.clear();
        self.armed.extend(
            towers
                .iter()
                .filter(|tower| tower.ready_in.is_zero())
                .map(|tower| tower.id),
        );

        for selection in tower_targets {
            if selection.targets.is_empty() || !self.armed.remove(&selection.tower) {
                continue;
            }
            out.push(Command::FireProjectile {
                tower: selection.tower,
                targets: selection.targets.clone(),
            });
        }
    }
}
