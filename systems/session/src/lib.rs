#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-tick orchestration of the world and its systems.
//!
//! A [`Session`] owns the world together with every pure system. Each call to
//! [`Session::tick`] routes the drained input, then, unless paused, queues
//! waves, releases enemies, moves them, lets towers fire, and resolves
//! projectiles. All world mutation flows through `world::apply`.

use std::time::Duration;

use thiserror::Error;
use tile_defence_core::{
    Command, Event, GameConfig, HudSnapshot, InputEvent, LevelDescription, PlacementError,
    SessionConfig, TowerId,
};
use tile_defence_system_input::{HudLayout, InputRouter, RoutedAction};
use tile_defence_system_spawning::{self as spawning, Spawning};
use tile_defence_system_tower_combat::TowerCombat;
use tile_defence_system_tower_targeting::TowerTargeting;
use tile_defence_system_wave_generation::{self as wave_generation, WaveGeneration};
use tile_defence_world::{self as world, query, route::LevelError, World, WorldConfig};
use tracing::{debug, info};

/// Errors raised while starting a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The level cannot be turned into a playable world.
    #[error("invalid level")]
    Level(#[from] LevelError),
}

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// The simulation keeps running.
    Running,
    /// The player asked to quit.
    Quit,
    /// Every life was lost.
    Defeat,
    /// The last configured wave was cleared.
    Victory,
}

impl SessionStatus {
    /// Reports whether the loop should stop.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Everything that happened during one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    /// Frame counter after the tick.
    pub frame: u64,
    /// Actions routed from the drained input, in arrival order.
    pub actions: Vec<RoutedAction>,
    /// Outcome of every placement attempt made during the tick.
    pub placements: Vec<Result<TowerId, PlacementError>>,
    /// Events emitted by the world, in emission order.
    pub events: Vec<Event>,
    /// HUD values after the tick.
    pub hud: HudSnapshot,
    /// Session lifecycle after the tick.
    pub status: SessionStatus,
}

/// Owns the world and drives every system once per tick.
#[derive(Debug)]
pub struct Session {
    world: World,
    router: InputRouter,
    waves: WaveGeneration,
    spawning: Spawning,
    targeting: TowerTargeting,
    combat: TowerCombat,
    config: SessionConfig,
    tick_duration: Duration,
    frame: u64,
    status: SessionStatus,
    wave_cooldown: u32,
}

impl Session {
    /// Builds the world from the level and wires every system from the config.
    pub fn new(config: GameConfig, level: &LevelDescription) -> Result<Self, SessionError> {
        let world = World::new(
            level,
            WorldConfig {
                cell_size: config.window.cell_size,
                coins: config.economy.coins,
                lives: config.economy.lives,
                start_wave: config.session.start_wave,
                towers: config.towers,
            },
        )?;

        let grid = query::tile_grid(&world);
        let layout = HudLayout::new(
            &config.window,
            grid.origin().column() + grid.columns(),
            grid.origin().row() + grid.rows(),
        );

        info!(
            difficulty = config.session.difficulty.label(),
            fps = config.session.fps,
            "session started"
        );

        Ok(Self {
            world,
            router: InputRouter::new(layout),
            waves: WaveGeneration::new(wave_generation::Config::new(
                config.session.seed,
                config.waves,
                config.enemies,
            )),
            spawning: Spawning::new(spawning::Config::new(config.spawning, config.session.fps)),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            tick_duration: config.session.tick_duration(),
            config: config.session,
            frame: 0,
            status: SessionStatus::Running,
            wave_cooldown: 0,
        })
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the input router.
    #[must_use]
    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Number of simulated frames so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated duration of one tick.
    #[must_use]
    pub const fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// Runs one loop iteration with the input drained for this tick.
    pub fn tick(&mut self, input: impl IntoIterator<Item = InputEvent>) -> TickReport {
        let mut report = TickReport {
            frame: self.frame,
            actions: Vec::new(),
            placements: Vec::new(),
            events: Vec::new(),
            hud: HudSnapshot::default(),
            status: self.status,
        };

        for event in input {
            let first_new = report.actions.len();
            self.router.handle(event, &mut report.actions);
            for index in first_new..report.actions.len() {
                let action = report.actions[index];
                self.perform(action, &mut report);
            }
            if self.status == SessionStatus::Quit {
                break;
            }
        }

        if !self.router.paused() && self.status == SessionStatus::Running {
            self.simulate(&mut report.events);
        }

        report.frame = self.frame;
        report.hud = query::hud(&self.world, self.router.paused());
        report.status = self.status;
        report
    }

    fn perform(&mut self, action: RoutedAction, report: &mut TickReport) {
        match action {
            RoutedAction::Quit => {
                info!(frame = self.frame, "quit requested");
                self.status = SessionStatus::Quit;
            }
            RoutedAction::TogglePause { paused } => info!(paused, "pause toggled"),
            RoutedAction::SelectCard(kind) => debug!(kind = kind.name(), "card selected"),
            RoutedAction::CancelSelection => debug!("selection cancelled"),
            RoutedAction::PlaceTower { kind, cell } => {
                if self.status != SessionStatus::Running {
                    return;
                }
                let outcome = world::place_tower(&mut self.world, kind, cell, &mut report.events);
                report.placements.push(outcome);
            }
        }
    }

    fn simulate(&mut self, events: &mut Vec<Event>) {
        let first_event = events.len();
        self.queue_wave_when_due(events);

        self.frame = self.frame.saturating_add(1);
        let dt = self.tick_duration;

        let mut commands = Vec::new();
        self.spawning
            .handle(self.frame, &query::pending_view(&self.world), &mut commands);
        commands.push(Command::Tick { dt });
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }

        let towers = query::tower_view(&self.world);
        let mut targets = Vec::new();
        self.targeting
            .handle(&towers, &query::enemy_view(&self.world), &mut targets);
        self.combat.handle(&towers, &targets, &mut commands);
        commands.push(Command::ResolveProjectiles { dt });
        for command in commands {
            world::apply(&mut self.world, command, events);
        }

        self.observe(&events[first_event..]);
    }

    fn queue_wave_when_due(&mut self, events: &mut Vec<Event>) {
        if query::active_wave(&self.world).is_some() {
            return;
        }
        if self.wave_cooldown > 0 {
            self.wave_cooldown -= 1;
            return;
        }

        let wave = query::wave(&self.world);
        let plan = self.waves.generate(self.config.difficulty, wave);
        world::apply(&mut self.world, plan.into_command(), events);
    }

    fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::GameOver { wave } => {
                    info!(wave, frame = self.frame, "defeat");
                    self.status = SessionStatus::Defeat;
                }
                Event::WaveCleared { wave, .. } => {
                    self.wave_cooldown = self.config.inter_wave_pause_frames;
                    let last_wave = self.config.max_waves.is_some_and(|last| *wave >= last);
                    if last_wave && self.status == SessionStatus::Running {
                        info!(wave, frame = self.frame, "victory");
                        self.status = SessionStatus::Victory;
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SessionStatus;

    #[test]
    fn only_running_sessions_continue() {
        assert!(!SessionStatus::Running.is_finished());
        assert!(SessionStatus::Quit.is_finished());
        assert!(SessionStatus::Defeat.is_finished());
        assert!(SessionStatus::Victory.is_finished());
    }
}
