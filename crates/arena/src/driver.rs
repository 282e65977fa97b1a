//! Fixed-cadence async host for a [`Game`].
//!
//! Commands arrive over an unbounded channel and are folded into the next
//! tick's input; every tick publishes a fresh snapshot on a watch channel.

use crate::game::{FrameClock, Game};
use crate::input::{InputIntent, TickInput};
use crate::snapshot::WorldSnapshot;
use futures_util::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

/// Input sent to a running game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Replace the held movement intent.
    Intent(InputIntent),
    /// Request a split on the next tick.
    Split,
    /// Request a mass ejection on the next tick.
    Eject,
    Stop,
}

/// Drain queued commands into `input`. Returns false once the loop should stop.
fn apply_commands(commands: &mut mpsc::UnboundedReceiver<Command>, input: &mut TickInput) -> bool {
    loop {
        match commands.try_recv() {
            Ok(Command::Intent(intent)) => input.intent = intent,
            Ok(Command::Split) => input.split = true,
            Ok(Command::Eject) => input.eject = true,
            Ok(Command::Stop) | Err(TryRecvError::Disconnected) => return false,
            Err(TryRecvError::Empty) => return true,
        }
    }
}

/// Run the game until a [`Command::Stop`] arrives or every sender is dropped.
/// Returns the game so callers can inspect the final state.
pub async fn run_game_loop(
    mut game: Game,
    mut commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<Arc<WorldSnapshot>>,
) -> Game {
    let session = game.world().config.session.clone();
    let tick_interval_ms = session.frame_interval_ms.max(1);
    let period = Duration::from_millis(tick_interval_ms);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut clock = FrameClock::new(session.min_frame_secs, session.max_frame_secs);
    let mut input = TickInput::default();
    info!("Game loop started ({}ms frames)", tick_interval_ms);

    loop {
        let scheduled = ticker.tick().await;

        let mut skipped = 0u32;
        while ticker.tick().now_or_never().is_some() {
            skipped += 1;
        }
        if skipped > 0 {
            debug!(
                "Skipped {} frames to stay current (lag: {:?})",
                skipped,
                Instant::now().saturating_duration_since(scheduled)
            );
        }

        if !apply_commands(&mut commands, &mut input) {
            break;
        }

        let dt = clock.delta(Instant::now().into_std());
        let tick_start = std::time::Instant::now();
        let report = game.tick(dt, &input);
        let tick_ms = tick_start.elapsed().as_secs_f64() * 1000.0;
        input.split = false;
        input.eject = false;

        let tick_budget = tick_interval_ms as f64 * 0.9;
        if tick_ms > tick_budget {
            warn!(
                "Slow tick #{}: {:.3}ms (budget: {:.1}ms) - {} bots, {} food",
                game.tick_count,
                tick_ms,
                tick_budget,
                game.world().bots.len(),
                game.world().foods.len()
            );
        }
        if report.player_died {
            info!("Player respawned (deaths: {})", game.world().deaths);
        }

        snapshots.send_replace(Arc::new(game.snapshot()));
    }

    info!("Game loop stopped after {} ticks", game.tick_count);
    game
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_commands_fold_into_input() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut input = TickInput::default();
        tx.send(Command::Intent(InputIntent::new(1, 0, true))).unwrap();
        tx.send(Command::Split).unwrap();
        assert!(apply_commands(&mut rx, &mut input));
        assert_eq!(input.intent, InputIntent::new(1, 0, true));
        assert!(input.split);
        assert!(!input.eject);

        tx.send(Command::Stop).unwrap();
        assert!(!apply_commands(&mut rx, &mut input));
        drop(tx);
        assert!(!apply_commands(&mut rx, &mut input));
    }

    #[tokio::test]
    async fn test_loop_publishes_snapshots_and_stops() {
        let game = Game::with_seed(Config::default(), 7);
        let (tx, rx) = mpsc::unbounded_channel();
        let (snap_tx, mut snap_rx) = watch::channel(Arc::new(game.snapshot()));
        let handle = tokio::spawn(run_game_loop(game, rx, snap_tx));

        tx.send(Command::Intent(InputIntent::new(0, 1, false))).unwrap();
        snap_rx.changed().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(Command::Stop).unwrap();

        let game = handle.await.unwrap();
        assert!(game.tick_count >= 1);
        assert_eq!(game.world().bots.len(), 28);
        assert!(snap_rx.borrow().clock > 0.0);
    }
}
