//! Core game engine: card catalog, deal, and the turn state machine.
//!
//! Everything here is synchronous and side-effect free apart from RNG.
//! Timed veto windows and player messaging live in [`crate::room`].

pub mod cards;
pub mod constants;
pub mod engine;
pub mod entities;

pub use cards::{Card, CardId, CardInfo, CardType, build_deck, shuffle_pile};
pub use engine::{DealError, DrawOutcome, PlayOutcome};
pub use entities::{ActionToken, GamePhase, GameState, PendingAction, Player, PlayerId};
