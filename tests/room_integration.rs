//! End-to-end room lifecycle tests driven through the registry.

use std::time::Duration;

use kitten_kaboom::game::{GamePhase, GameState};
use kitten_kaboom::room::{RoomConfig, RoomError, RoomEvent, RoomRegistry};

fn config(max_players: usize) -> RoomConfig {
    RoomConfig {
        name: "test room".to_string(),
        max_players,
        nope_window_ms: 50,
        ..RoomConfig::default()
    }
}

#[tokio::test]
async fn lobby_flow_rejects_every_illegal_move() {
    let registry = RoomRegistry::new();

    // Bad config never spawns a room.
    let bad = RoomConfig {
        max_players: 9,
        ..RoomConfig::default()
    };
    assert!(matches!(
        registry.create_room(bad, "alice").await,
        Err(RoomError::InvalidConfig(_))
    ));

    let (room_id, alice) = registry.create_room(config(3), "alice").await.unwrap();

    // Unknown room id.
    let ghost = uuid::Uuid::new_v4();
    assert_eq!(
        registry.join_room(ghost, "bob").await.unwrap_err(),
        RoomError::RoomNotFound
    );

    // Duplicate seat name.
    assert_eq!(
        registry.join_room(room_id, "alice").await.unwrap_err(),
        RoomError::DuplicateName
    );

    let bob = registry.join_room(room_id, "bob").await.unwrap();
    let carol = registry.join_room(room_id, "carol").await.unwrap();
    assert_eq!(
        registry.join_room(room_id, "dave").await.unwrap_err(),
        RoomError::RoomFull
    );

    // A stranger cannot leave or ready up.
    let stranger = uuid::Uuid::new_v4();
    assert_eq!(
        registry.leave_room(room_id, stranger).await.unwrap_err(),
        RoomError::PlayerNotInRoom
    );
    assert_eq!(
        registry
            .set_ready(room_id, stranger, true)
            .await
            .unwrap_err(),
        RoomError::PlayerNotInRoom
    );

    // Only the owner starts, and only once everyone is ready.
    assert_eq!(
        registry.start_game(room_id, bob).await.unwrap_err(),
        RoomError::NotRoomOwner
    );
    assert_eq!(
        registry.start_game(room_id, alice).await.unwrap_err(),
        RoomError::PlayersNotReady
    );

    for player in [alice, bob, carol] {
        registry.set_ready(room_id, player, true).await.unwrap();
    }
    registry.start_game(room_id, alice).await.unwrap();

    // Once running, the room admits nobody and cannot restart.
    assert_eq!(
        registry.join_room(room_id, "dave").await.unwrap_err(),
        RoomError::GameAlreadyStarted
    );
    assert_eq!(
        registry.start_game(room_id, alice).await.unwrap_err(),
        RoomError::GameAlreadyStarted
    );
}

#[tokio::test]
async fn a_solo_room_cannot_start() {
    let registry = RoomRegistry::new();
    let (room_id, alice) = registry.create_room(config(5), "alice").await.unwrap();
    registry.set_ready(room_id, alice, true).await.unwrap();
    assert_eq!(
        registry.start_game(room_id, alice).await.unwrap_err(),
        RoomError::NotEnoughPlayers
    );
}

#[tokio::test]
async fn two_player_game_runs_to_a_winner_on_draws_alone() {
    let registry = RoomRegistry::new();
    let (room_id, alice) = registry.create_room(config(2), "alice").await.unwrap();
    let bob = registry.join_room(room_id, "bob").await.unwrap();
    registry.set_ready(room_id, alice, true).await.unwrap();
    registry.set_ready(room_id, bob, true).await.unwrap();
    registry.start_game(room_id, alice).await.unwrap();

    // Drawing forever must end the game: the kitten keeps coming back
    // until the defuses run out.
    let mut finished = None;
    for _ in 0..300 {
        let state = registry.game_state(room_id).await.unwrap().unwrap();
        if state.phase == GamePhase::GameOver {
            finished = Some(state);
            break;
        }
        let current = state.current_player().id;
        registry.draw_card(room_id, current).await.unwrap();
    }

    let state = finished.expect("game never finished");
    assert!(state.winner.is_some());
    assert_eq!(state.alive_count(), 1);
    let winner = state.player(state.winner.unwrap()).unwrap();
    assert!(winner.is_alive);
}

#[tokio::test]
async fn game_state_snapshots_survive_serialization() {
    let registry = RoomRegistry::new();
    let (room_id, alice) = registry.create_room(config(2), "alice").await.unwrap();
    let bob = registry.join_room(room_id, "bob").await.unwrap();
    registry.set_ready(room_id, alice, true).await.unwrap();
    registry.set_ready(room_id, bob, true).await.unwrap();
    registry.start_game(room_id, alice).await.unwrap();

    let state = registry.game_state(room_id).await.unwrap().unwrap();
    let encoded = serde_json::to_string(&state).unwrap();
    let decoded: GameState = serde_json::from_str(&encoded).unwrap();

    let original = serde_json::to_value(&state).unwrap();
    let round_tripped = serde_json::to_value(&decoded).unwrap();
    assert_eq!(original, round_tripped);
}

#[tokio::test]
async fn subscribers_receive_the_game_start() {
    let registry = RoomRegistry::new();
    let (room_id, alice) = registry.create_room(config(2), "alice").await.unwrap();
    let bob = registry.join_room(room_id, "bob").await.unwrap();
    let mut events = registry.subscribe(room_id, alice).await.unwrap();

    registry.set_ready(room_id, alice, true).await.unwrap();
    registry.set_ready(room_id, bob, true).await.unwrap();
    registry.start_game(room_id, alice).await.unwrap();

    let mut saw_started = false;
    let mut saw_state = false;
    while let Ok(Some(event)) =
        tokio::time::timeout(Duration::from_millis(200), events.recv()).await
    {
        match event {
            RoomEvent::GameStarted => saw_started = true,
            RoomEvent::GameStateUpdate { state } => {
                saw_state = true;
                assert_eq!(state.phase, GamePhase::Playing);
            }
            _ => {}
        }
        if saw_started && saw_state {
            break;
        }
    }
    assert!(saw_started);
    assert!(saw_state);
}

#[tokio::test]
async fn reap_drops_rooms_whose_actors_shut_down() {
    let registry = RoomRegistry::new();
    let (room_id, alice) = registry.create_room(config(2), "alice").await.unwrap();
    assert_eq!(registry.room_count().await, 1);

    // Last player out closes the room.
    registry.leave_room(room_id, alice).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(registry.reap().await, 1);
    assert_eq!(registry.room_count().await, 0);
    assert_eq!(
        registry.game_state(room_id).await.unwrap_err(),
        RoomError::RoomNotFound
    );
}

#[tokio::test]
async fn closed_rooms_are_forgotten_immediately() {
    let registry = RoomRegistry::new();
    let (room_id, _) = registry.create_room(config(2), "alice").await.unwrap();

    registry.close_room(room_id).await.unwrap();
    assert_eq!(registry.room_count().await, 0);
    assert_eq!(
        registry.close_room(room_id).await.unwrap_err(),
        RoomError::RoomNotFound
    );
}

#[tokio::test]
async fn open_room_listing_hides_full_and_running_rooms() {
    let registry = RoomRegistry::new();

    let (open_id, _) = registry.create_room(config(3), "alice").await.unwrap();

    let (full_id, owner) = registry.create_room(config(2), "bella").await.unwrap();
    let guest = registry.join_room(full_id, "carla").await.unwrap();

    let open = registry.list_open().await;
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, open_id);

    // Start the full room and confirm nothing new shows up.
    registry.set_ready(full_id, owner, true).await.unwrap();
    registry.set_ready(full_id, guest, true).await.unwrap();
    registry.start_game(full_id, owner).await.unwrap();

    let open = registry.list_open().await;
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, open_id);
}
