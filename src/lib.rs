//! # Kitten Kaboom
//!
//! An exploding-kitten style elimination card game engine with multi-room
//! support.
//!
//! Players take turns drawing from a shared pile seeded with one fewer
//! exploding kitten than there are players. Drawing a kitten eliminates you
//! unless you hold a Defuse; the last player alive wins. Action cards
//! (Attack, Skip, Favor, Shuffle, See The Future, and cat pairs) bend the
//! turn order and move cards around, and almost any play can be cancelled
//! by a Nope within its veto window.
//!
//! ## Core Modules
//!
//! - [`game`]: Card catalog, deal, and the synchronous turn state machine
//! - [`room`]: Room actors, the registry, and the timed veto scheduler
//!
//! ## Example
//!
//! ```
//! use kitten_kaboom::game::{GameState, Player};
//!
//! let roster = vec![Player::new("alice"), Player::new("bob")];
//! let state = GameState::deal(roster).unwrap();
//! assert_eq!(state.players[0].hand.len(), 5);
//! ```

/// Core game logic, entities, and the turn state machine.
pub mod game;
pub use game::{
    Card, CardId, CardType, DealError, DrawOutcome, GamePhase, GameState, PlayOutcome, Player,
    PlayerId,
    constants::{self, MAX_PLAYERS, MIN_PLAYERS},
};

/// Rooms, the registry, and the veto-window scheduler.
pub mod room;
pub use room::{RoomConfig, RoomError, RoomEvent, RoomId, RoomRegistry, RoomSummary};
