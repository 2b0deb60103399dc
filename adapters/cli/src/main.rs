#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Tile Defence session.

mod backend;
mod clock;
mod loading;
mod manifest;
mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use tile_defence_core::RenderLayer;
use tile_defence_rendering::{
    referenced_keys, AssetCatalog, InputSource, RenderSync, RenderingBackend,
};
use tile_defence_session::Session;
use tile_defence_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    backend::LoggingBackend, clock::FrameClock, manifest::SpriteManifest, script::ScriptedInput,
};

/// Runs a Tile Defence session without a window.
#[derive(Parser, Debug)]
#[command(name = "tile-defence")]
#[command(about = "Headless Tile Defence session runner")]
struct Args {
    /// Game configuration TOML; built-in defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Level description TOML; the bundled level applies when omitted.
    #[arg(long)]
    level: Option<PathBuf>,

    /// Scripted input TOML replayed tick by tick.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Sprite manifest TOML; placeholder sprites apply when omitted.
    #[arg(long)]
    sprites: Option<PathBuf>,

    /// Stop after this many loop iterations.
    #[arg(long)]
    frames: Option<u64>,

    /// Run as fast as possible instead of pacing ticks at the configured rate.
    #[arg(long)]
    unthrottled: bool,
}

/// Entry point for the Tile Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    let config = loading::load_config(args.config.as_deref())?;
    let level = loading::load_level(args.level.as_deref())?;

    let keys = referenced_keys(&config);
    let assets = match args.sprites.as_deref() {
        Some(path) => AssetCatalog::load(&SpriteManifest::from_path(path)?, keys),
        None => AssetCatalog::load(&manifest::PlaceholderSprites, keys),
    }
    .context("failed to resolve sprite assets")?;

    let cell_size = config.window.cell_size;
    let mut session = Session::new(config, &level).context("failed to start session")?;
    info!(
        coins = query::coins(session.world()),
        lives = query::lives(session.world()),
        wave = query::wave(session.world()),
        "session started"
    );

    let layout = session.router().layout();
    let (map_x, map_y) = layout.map_origin();
    let mut sync = RenderSync::new(
        Vec2::new(map_x as f32, map_y as f32),
        cell_size,
        query::PROJECTILE_EXTENT,
        layout.hud(),
        layout.cards(),
    );

    let mut input = match args.script.as_deref() {
        Some(path) => ScriptedInput::from_path(path)?,
        None => ScriptedInput::default(),
    };
    let mut backend = LoggingBackend::new(assets);
    let mut clock = FrameClock::new(session.tick_duration(), !args.unthrottled);

    let mut ticks = 0_u64;
    loop {
        if args.frames.is_some_and(|limit| ticks >= limit) {
            info!(ticks, "frame limit reached");
            break;
        }
        clock.start();

        let report = session.tick(input.drain());
        ticks += 1;
        for rejection in report.placements.iter().filter_map(|outcome| outcome.err()) {
            info!(reason = %rejection, "tower placement rejected");
        }

        let world = session.world();
        let frame = sync.sync(
            report.frame,
            &report.events,
            report.hud,
            || query::render_batch(world, RenderLayer::Static),
            query::render_batch(world, RenderLayer::Moving),
        );
        backend
            .present(&frame)
            .with_context(|| format!("failed to present frame {}", frame.number))?;

        if report.status.is_finished() {
            info!(
                status = ?report.status,
                wave = report.hud.wave,
                lives = report.hud.lives,
                coins = report.hud.coins,
                "session finished"
            );
            break;
        }
        clock.finish();
    }

    info!(
        ticks,
        frames = backend.frames_presented(),
        "shutting down"
    );
    Ok(())
}
