#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-driven spawning system that releases queued enemies one at a time.

use tile_defence_core::{Command, EnemyId, PendingEnemy, PendingView, SpawnCadence};
use tracing::debug;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    cadence: SpawnCadence,
    fps: u32,
}

impl Config {
    /// Creates a new configuration using the provided cadence and tick rate.
    #[must_use]
    pub const fn new(cadence: SpawnCadence, fps: u32) -> Self {
        Self { cadence, fps }
    }
}

/// Pure system that releases the head of the pending queue on interval frames.
#[derive(Debug)]
pub struct Spawning {
    cadence: SpawnCadence,
    fps: u32,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            cadence: config.cadence,
            fps: config.fps.max(1),
        }
    }

    /// Selects the enemy to release on the provided frame, if any.
    #[must_use]
    pub fn tick(&self, frame: u64, pending: &PendingView) -> Option<EnemyId> {
        let head = pending.head()?;
        let follower = pending.second().unwrap_or(head);
        let interval = self.interval(head, follower);
        if frame % interval != 0 {
            return None;
        }
        debug!(enemy = head.id.get(), frame, interval, "releasing enemy");
        Some(head.id)
    }

    /// Emits a release command when [`Spawning::tick`] selects an enemy.
    pub fn handle(&self, frame: u64, pending: &PendingView, out: &mut Vec<Command>) {
        if let Some(enemy) = self.tick(frame, pending) {
            out.push(Command::ReleaseEnemy { enemy });
        }
    }

    /// Number of frames separating the release of `head` and `follower`.
    #[must_use]
    pub fn interval(&self, head: &PendingEnemy, follower: &PendingEnemy) -> u64 {
        match self.cadence {
            SpawnCadence::Fixed { frames } => u64::from(frames.max(1)),
            SpawnCadence::Spacing { gap } => {
                let distance = gap.max(0.0) + (head.size + follower.size) / 2.0;
                let speed = follower.speed;
                if !(speed.is_finite() && speed > 0.0) {
                    return 1;
                }
                let frames = (distance / speed * self.fps as f32).ceil();
                if frames.is_finite() && frames >= 1.0 {
                    frames as u64
                } else {
                    1
                }
            }
        }
    }
}
