//! Headless arena host.

use arena::{Command, Config, Controls, Game, WorldSnapshot, run_game_loop};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "arena.toml";
const HUD_INTERVAL: Duration = Duration::from_secs(2);
const AUTOPILOT_INTERVAL: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Arena v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&path)?.sanitized();
    info!("Loaded configuration from {}", path);
    info!("  World: {}x{}", config.world.size, config.world.size);
    info!("  Bots: {} (difficulty {:.2})", config.bots.count, config.bots.difficulty);
    info!("  Food: {}", config.food.count);

    let duration = config.session.duration_secs;
    let game = match config.session.seed {
        Some(seed) => {
            info!("  Seed: {}", seed);
            Game::with_seed(config, seed)
        }
        None => Game::new(config),
    };

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(game.snapshot()));

    let game_loop = tokio::spawn(run_game_loop(game, command_rx, snapshot_tx));
    let autopilot = tokio::spawn(autopilot(command_tx.clone()));
    let hud = tokio::spawn(hud(snapshot_rx));

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!("Failed to listen for Ctrl-C: {}", e);
            }
            info!("Interrupted, shutting down");
        }
        _ = session_timer(duration) => info!("Session of {}s finished", duration),
    }

    autopilot.abort();
    let _ = command_tx.send(Command::Stop);
    let game = game_loop.await?;
    hud.abort();

    let world = game.world();
    info!(
        "Final: {} ticks, level {}, mass {:.1}, {} deaths",
        game.tick_count,
        world.progression.level,
        world.player.total_mass(),
        world.deaths
    );
    Ok(())
}

/// Resolves after `secs` seconds, or never when `secs` is zero.
async fn session_timer(secs: u64) {
    if secs == 0 {
        std::future::pending::<()>().await;
    } else {
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }
}

/// Drives the player with randomly held keys.
async fn autopilot(commands: mpsc::UnboundedSender<Command>) {
    let mut rng = StdRng::from_os_rng();
    let mut controls = Controls::new();
    let mut ticker = tokio::time::interval(AUTOPILOT_INTERVAL);

    loop {
        ticker.tick().await;
        if rng.random_bool(0.3) {
            controls.release_all();
            controls.up = rng.random_bool(0.5);
            controls.down = !controls.up && rng.random_bool(0.5);
            controls.left = rng.random_bool(0.5);
            controls.right = !controls.left && rng.random_bool(0.5);
        }
        controls.boost = rng.random_bool(0.15);
        controls.split = rng.random_bool(0.04);
        controls.eject = rng.random_bool(0.06);

        let input = controls.sample();
        let mut sends = vec![Command::Intent(input.intent)];
        if input.split {
            sends.push(Command::Split);
        }
        if input.eject {
            sends.push(Command::Eject);
        }
        for command in sends {
            if commands.send(command).is_err() {
                return;
            }
        }
    }
}

/// Periodically logs the player's status and the leaderboard head.
async fn hud(snapshots: watch::Receiver<Arc<WorldSnapshot>>) {
    let mut ticker = tokio::time::interval(HUD_INTERVAL);
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let snapshot = snapshots.borrow().clone();
        let leader = snapshot
            .leaderboard
            .first()
            .map(|e| format!("{} ({:.0})", e.name, e.mass))
            .unwrap_or_default();
        info!(
            "Level {} ({}/{} XP, {:.0}%) | mass {:.1} in {} cells | rank #{} | boost {:.0}% | leader {}",
            snapshot.level,
            snapshot.xp.floor(),
            snapshot.xp_to_next,
            snapshot.xp_fraction * 100.0,
            snapshot.player_mass,
            snapshot.player_cells.len(),
            snapshot.rank,
            snapshot.boost_energy * 100.0,
            leader
        );
        if let Some(event) = snapshot.events.first() {
            info!("  Latest: {}", event);
        }
    }
}
