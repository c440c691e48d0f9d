//! Room mailbox protocol: commands in, events out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::game::cards::CardId;
use crate::game::engine::DealError;
use crate::game::entities::{GameState, PlayerId};

pub type RoomId = Uuid;

#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum RoomError {
    #[error(transparent)]
    Deal(#[from] DealError),
    #[error("room is full")]
    RoomFull,
    #[error("a player with that name is already seated")]
    DuplicateName,
    #[error("the game has already started")]
    GameAlreadyStarted,
    #[error("only the room owner can start the game")]
    NotRoomOwner,
    #[error("not enough players to start")]
    NotEnoughPlayers,
    #[error("all players must be ready to start")]
    PlayersNotReady,
    #[error("room not found")]
    RoomNotFound,
    #[error("player is not in this room")]
    PlayerNotInRoom,
    #[error("room is closed")]
    RoomClosed,
    #[error("invalid room config: {0}")]
    InvalidConfig(String),
}

/// Commands accepted by a room actor. Lobby operations carry a response
/// channel; in-game actions are fire-and-forget and surface through the
/// event stream instead.
#[derive(Debug)]
pub enum RoomMessage {
    Join {
        name: String,
        response: oneshot::Sender<Result<PlayerId, RoomError>>,
    },
    Leave {
        player_id: PlayerId,
        response: oneshot::Sender<Result<(), RoomError>>,
    },
    SetReady {
        player_id: PlayerId,
        is_ready: bool,
        response: oneshot::Sender<Result<(), RoomError>>,
    },
    StartGame {
        player_id: PlayerId,
        response: oneshot::Sender<Result<(), RoomError>>,
    },
    DrawCard {
        player_id: PlayerId,
    },
    PlayCard {
        player_id: PlayerId,
        card_id: CardId,
        target_id: Option<PlayerId>,
    },
    PlayNope {
        player_id: PlayerId,
        card_id: CardId,
    },
    EndTurn {
        player_id: PlayerId,
    },
    GetSummary {
        response: oneshot::Sender<RoomSummary>,
    },
    GetGameState {
        response: oneshot::Sender<Option<Box<GameState>>>,
    },
    Subscribe {
        player_id: PlayerId,
        sender: mpsc::Sender<RoomEvent>,
    },
    Unsubscribe {
        player_id: PlayerId,
    },
    /// Internal: the veto window for `token` elapsed.
    ResolvePending {
        token: Uuid,
    },
    Close,
}

/// Events broadcast to room subscribers.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RoomEvent {
    PlayerJoined {
        player_id: PlayerId,
        name: String,
    },
    PlayerLeft {
        player_id: PlayerId,
    },
    PlayerReady {
        player_id: PlayerId,
        is_ready: bool,
    },
    GameStarted,
    GameStateUpdate {
        state: Box<GameState>,
    },
    /// A contestable play opened its veto window.
    ActionPending {
        actor_id: PlayerId,
        card_id: CardId,
        target_id: Option<PlayerId>,
        time_remaining_ms: u64,
    },
    ActionNoped {
        vetoer_id: PlayerId,
    },
    ActionResolved,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: String,
    pub player_count: usize,
    pub max_players: usize,
    pub is_started: bool,
    pub created_at: DateTime<Utc>,
}
