use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use tile_defence_core::{
    CellCoord, Command, EnemyBlueprint, EnemyId, LevelDescription, TowerKind, TowerTarget,
};
use tile_defence_system_tower_targeting::TowerTargeting;
use tile_defence_world::{self as world, query, World, WorldConfig};

fn corridor() -> LevelDescription {
    let mut free = Vec::new();
    for row in 0..6 {
        for column in 0..20 {
            if row != 2 {
                free.push(CellCoord::new(column, row));
            }
        }
    }
    LevelDescription::new()
        .with_cells("start", [CellCoord::new(0, 2)])
        .with_cells("path", (1..19).map(|column| CellCoord::new(column, 2)))
        .with_cells("end", [CellCoord::new(19, 2)])
        .with_cells("free_tile", free)
}

fn enemy(speed: f32, detectable: bool) -> EnemyBlueprint {
    EnemyBlueprint {
        name: "slime".to_owned(),
        health: 10,
        speed,
        size: 8.0,
        detectable,
        level: 1,
        reward: 1,
    }
}

/// Builds a world with one tower at (4, 3) and enemies advanced for one second.
fn scenario(kind: TowerKind, enemies: Vec<EnemyBlueprint>) -> World {
    let mut world = World::new(
        &corridor(),
        WorldConfig {
            cell_size: 16,
            coins: 1_000,
            lives: 20,
            start_wave: 1,
            ..WorldConfig::default()
        },
    )
    .expect("corridor is a valid level");

    let mut events = Vec::new();
    let _ = world::place_tower(&mut world, kind, CellCoord::new(4, 3), &mut events)
        .expect("tower fits on free tiles");

    let count = enemies.len() as u32;
    world::apply(&mut world, Command::QueueWave { wave: 1, enemies }, &mut events);
    for id in 0..count {
        world::apply(
            &mut world,
            Command::ReleaseEnemy {
                enemy: EnemyId::new(id),
            },
            &mut events,
        );
    }
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(1),
        },
        &mut events,
    );
    world
}

fn targets(world: &World) -> Vec<TowerTarget> {
    let mut targeting = TowerTargeting::new();
    let mut out = Vec::new();
    targeting.handle(&query::tower_view(world), &query::enemy_view(world), &mut out);
    out
}

#[test]
fn enemy_nearest_to_tower_anchor_is_selected() {
    let world = scenario(
        TowerKind::Arrow,
        vec![enemy(60.0, true), enemy(100.0, true), enemy(80.0, true)],
    );

    let selected = targets(&world);
    assert_eq!(selected.len(), 1);
    assert_eq!(
        selected[0].targets,
        vec![EnemyId::new(2)],
        "enemy whose progress is closest to the anchor wins"
    );
}

#[test]
fn spawn_order_breaks_route_ties() {
    let world = scenario(TowerKind::Arrow, vec![enemy(80.0, true), enemy(64.0, true)]);

    let selected = targets(&world);
    assert_eq!(selected[0].targets, vec![EnemyId::new(0)]);
}

#[test]
fn undetectable_enemies_are_ignored() {
    let world = scenario(TowerKind::Arrow, vec![enemy(80.0, false)]);
    assert!(targets(&world).is_empty(), "hidden enemies cannot be targeted");
}

#[test]
fn splash_towers_add_enemies_around_primary() {
    let world = scenario(
        TowerKind::Cannon,
        vec![enemy(80.0, true), enemy(100.0, true), enemy(140.0, true)],
    );

    let selected = targets(&world);
    assert_eq!(
        selected[0].targets,
        vec![EnemyId::new(0), EnemyId::new(1)],
        "enemy 2 lies outside the splash radius"
    );
}

#[test]
fn deterministic_replay_produces_identical_targets() {
    let build = || {
        scenario(
            TowerKind::Cannon,
            vec![enemy(70.0, true), enemy(90.0, true), enemy(85.0, false)],
        )
    };
    let first = targets(&build());
    let second = targets(&build());
    assert_eq!(first, second, "targeting diverged between runs");
    assert_eq!(fingerprint(&first), fingerprint(&second));
}

fn fingerprint(targets: &[TowerTarget]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for target in targets {
        target.tower.hash(&mut hasher);
        target.targets.hash(&mut hasher);
    }
    hasher.finish()
}
