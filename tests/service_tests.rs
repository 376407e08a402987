//! Service tests - the game task behind channels

use std::time::Duration;

use drop_merge::core::GameConfig;
use drop_merge::engine::{
    spawn_game, spawn_game_with, Game, GameStatus, ServiceConfig, TurnEvent,
};
use drop_merge::types::{GameAction, SPAWN_X};

const WAIT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_actions_rejected_while_resolving() {
    let mut game = Game::new(GameConfig::default(), 8);
    game.start();
    let k = game.active().unwrap().exponent();
    let below = game.board_mut().create_tile(k, SPAWN_X as i8, 12);
    assert!(game.board_mut().place_tile(below));

    let mut handle = spawn_game_with(game, ServiceConfig::default());
    assert!(handle.send(GameAction::HardDrop).await);
    // The merge playback holds the board for hundreds of milliseconds
    assert!(!handle.send(GameAction::MoveLeft).await);

    let merged = tokio::time::timeout(WAIT, async {
        let mut saw_merge = false;
        while let Some(event) = handle.next_event().await {
            match event {
                TurnEvent::Merged { new_k, .. } => {
                    assert_eq!(new_k, k + 1);
                    saw_merge = true;
                }
                TurnEvent::Spawned { .. } if saw_merge => return true,
                _ => {}
            }
        }
        false
    })
    .await
    .unwrap();
    assert!(merged);

    // Input is accepted again once the next tile is out
    assert!(handle.send(GameAction::MoveLeft).await);
    handle.shutdown().await;
}

#[tokio::test]
async fn test_events_stream_in_order() {
    let service = ServiceConfig {
        instant_resolution: true,
        ..ServiceConfig::default()
    };
    let mut handle = spawn_game_with(Game::new(GameConfig::default(), 3), service);
    assert!(handle.send(GameAction::DropToColumn(0)).await);

    let events = tokio::time::timeout(WAIT, async {
        let mut events = Vec::new();
        while let Some(event) = handle.next_event().await {
            let done = events.iter().any(|e| matches!(e, TurnEvent::Locked { .. }))
                && matches!(event, TurnEvent::Spawned { .. });
            events.push(event);
            if done {
                break;
            }
        }
        events
    })
    .await
    .unwrap();

    assert!(matches!(events.first(), Some(TurnEvent::Spawned { .. })));
    let locked = events
        .iter()
        .position(|e| matches!(e, TurnEvent::Locked { x: 0, .. }))
        .unwrap();
    assert!(matches!(events.last(), Some(TurnEvent::Spawned { x: 0, .. })));
    assert!(locked < events.len() - 1);
    handle.shutdown().await;
}

#[tokio::test]
async fn test_commands_apply_in_order() {
    let handle = spawn_game(GameConfig::default(), 1);
    assert!(handle.try_send(GameAction::Pause));
    // The snapshot request is queued behind the pause
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.status, GameStatus::Paused);
    assert!(!snapshot.playable());
    handle.shutdown().await;
}
