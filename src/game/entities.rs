//! Game entities shared by the engine and the room layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::cards::{Card, CardId, CardType};

/// Opaque player identifier, stable for the room's lifetime.
pub type PlayerId = Uuid;

/// Resolution token tying a veto window to exactly one pending action.
pub type ActionToken = Uuid;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Setup,
    Playing,
    GameOver,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Setup => "setup",
            Self::Playing => "playing",
            Self::GameOver => "game over",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Unordered multiset; insertion order carries no meaning.
    pub hand: Vec<Card>,
    pub is_alive: bool,
    /// Derived flag kept in sync with `GameState::current_player_idx`.
    pub is_current_player: bool,
    pub is_ready: bool,
}

impl Player {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            hand: Vec::new(),
            is_alive: true,
            is_current_player: false,
            is_ready: false,
        }
    }

    pub(crate) fn hand_index(&self, card_id: CardId) -> Option<usize> {
        self.hand.iter().position(|c| c.id == card_id)
    }

    pub(crate) fn first_of_type(&self, card_type: CardType) -> Option<usize> {
        self.hand.iter().position(|c| c.card_type == card_type)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

/// A contestable play waiting out its veto window.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PendingAction {
    pub actor_id: PlayerId,
    pub card_id: CardId,
    pub target_id: Option<PlayerId>,
    pub token: ActionToken,
    pub deadline: DateTime<Utc>,
}

/// The full, authoritative state of one game. Owned exclusively by the
/// room's actor task; engine operations mutate it in place.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Seating order, fixed for the game's lifetime.
    pub players: Vec<Player>,
    pub current_player_idx: usize,
    /// Top of pile = end of vec.
    pub draw_pile: Vec<Card>,
    pub discard_pile: Vec<Card>,
    pub winner: Option<PlayerId>,
    pub turn_count: u32,
    /// Forced turns the current player still owes from an Attack.
    pub attack_turns_remaining: u32,
    /// Attack debt to hand to the next player when the turn advances.
    pub pending_attack_turns: u32,
    pub last_action: String,
    /// Transient See The Future peek, top card first.
    pub future_cards: Option<Vec<Card>>,
    pub pending_action: Option<PendingAction>,
}

impl GameState {
    #[must_use]
    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_idx]
    }

    #[must_use]
    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive).count()
    }

    pub(crate) fn player_index(&self, player_id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }
}
