//! Game service - a tokio task that exclusively owns one [`Game`]
//!
//! Callers never touch the game directly. They push actions through a bounded
//! command channel and receive every [`TurnEvent`] on an unbounded channel, so a
//! game is only ever mutated from a single task.

use std::time::Duration;

use log::{debug, warn};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::types::{GameAction, TICK_MS};
use crate::core::GameConfig;
use crate::event::TurnEvent;
use crate::game::Game;
use crate::snapshot::GameSnapshot;

/// Service tuning
#[derive(Debug, Clone, Copy)]
pub struct ServiceConfig {
    /// Fixed timestep in milliseconds
    pub tick_ms: u32,
    /// Command channel capacity
    pub max_pending_commands: usize,
    /// Play each resolution out immediately instead of pacing it over ticks
    pub instant_resolution: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            max_pending_commands: 64,
            instant_resolution: false,
        }
    }
}

/// Command delivered to the game task
#[derive(Debug)]
pub enum GameCommand {
    /// Apply an action; the reply says whether it was accepted
    Action {
        action: GameAction,
        reply: Option<oneshot::Sender<bool>>,
    },
    Snapshot(oneshot::Sender<GameSnapshot>),
    Shutdown,
}

/// Caller side of a running game
pub struct GameHandle {
    cmd_tx: mpsc::Sender<GameCommand>,
    event_rx: mpsc::UnboundedReceiver<TurnEvent>,
    task: JoinHandle<()>,
}

impl GameHandle {
    /// Apply an action and wait for the verdict
    ///
    /// Returns false when the action was rejected (for example while the board is
    /// resolving) or the task has stopped.
    pub async fn send(&self, action: GameAction) -> bool {
        let (reply, verdict) = oneshot::channel();
        let command = GameCommand::Action {
            action,
            reply: Some(reply),
        };
        if self.cmd_tx.send(command).await.is_err() {
            return false;
        }
        verdict.await.unwrap_or(false)
    }

    /// Queue an action without waiting; false when the queue is full or closed
    pub fn try_send(&self, action: GameAction) -> bool {
        self.cmd_tx
            .try_send(GameCommand::Action {
                action,
                reply: None,
            })
            .is_ok()
    }

    pub async fn snapshot(&self) -> Option<GameSnapshot> {
        let (reply, snapshot) = oneshot::channel();
        self.cmd_tx.send(GameCommand::Snapshot(reply)).await.ok()?;
        snapshot.await.ok()
    }

    /// Next event, waiting for one; None after shutdown once drained
    pub async fn next_event(&mut self) -> Option<TurnEvent> {
        self.event_rx.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<TurnEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Stop the task and wait for it to exit
    pub async fn shutdown(self) {
        let _ = self.cmd_tx.send(GameCommand::Shutdown).await;
        if let Err(err) = self.task.await {
            warn!("game task ended abnormally: {}", err);
        }
    }
}

/// Start a game on the current tokio runtime with default service settings
pub fn spawn_game(config: GameConfig, seed: u32) -> GameHandle {
    spawn_game_with(Game::new(config, seed), ServiceConfig::default())
}

/// Start a prepared game on the current tokio runtime
pub fn spawn_game_with(game: Game, service: ServiceConfig) -> GameHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(service.max_pending_commands.max(1));
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run_game(game, service, cmd_rx, event_tx));

    GameHandle {
        cmd_tx,
        event_rx,
        task,
    }
}

fn forward_events(game: &mut Game, event_tx: &mpsc::UnboundedSender<TurnEvent>) {
    for event in game.drain_events() {
        // A dropped receiver just means nobody is listening anymore
        let _ = event_tx.send(event);
    }
}

async fn run_game(
    mut game: Game,
    service: ServiceConfig,
    mut cmd_rx: mpsc::Receiver<GameCommand>,
    event_tx: mpsc::UnboundedSender<TurnEvent>,
) {
    game.start();
    forward_events(&mut game, &event_tx);

    let tick_ms = service.tick_ms.max(1);
    let mut interval = tokio::time::interval(Duration::from_millis(tick_ms as u64));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                game.tick(tick_ms, false);
                if service.instant_resolution {
                    game.resolve_all();
                }
            }
            command = cmd_rx.recv() => match command {
                Some(GameCommand::Action { action, reply }) => {
                    let accepted = game.apply_action(action);
                    if service.instant_resolution {
                        game.resolve_all();
                    }
                    if !accepted {
                        debug!("rejected {} in status {:?}", action, game.status());
                    }
                    if let Some(reply) = reply {
                        let _ = reply.send(accepted);
                    }
                }
                Some(GameCommand::Snapshot(reply)) => {
                    let _ = reply.send(game.snapshot());
                }
                Some(GameCommand::Shutdown) | None => break,
            },
        }
        forward_events(&mut game, &event_tx);
    }
    debug!("game task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameStatus;

    #[tokio::test]
    async fn test_spawn_emits_first_tile() {
        let mut handle = spawn_game(GameConfig::default(), 12345);
        let event = handle.next_event().await.unwrap();
        assert!(matches!(event, TurnEvent::Spawned { x: 4, y: 0, .. }));
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let handle = spawn_game(GameConfig::default(), 1);
        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.status, GameStatus::Playing);
        assert_eq!(snap.seed, 1);
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_instant_resolution_accepts_back_to_back_drops() {
        let service = ServiceConfig {
            instant_resolution: true,
            ..ServiceConfig::default()
        };
        let handle = spawn_game_with(Game::new(GameConfig::default(), 2), service);
        assert!(handle.send(GameAction::HardDrop).await);
        assert!(handle.send(GameAction::HardDrop).await);
        let snap = handle.snapshot().await.unwrap();
        assert!(snap.turn >= 2);
        handle.shutdown().await;
    }
}
