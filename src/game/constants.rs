//! Core game tunables.

/// Minimum roster size for a deal.
pub const MIN_PLAYERS: usize = 2;
/// Maximum roster size for a deal.
pub const MAX_PLAYERS: usize = 5;

/// Cards dealt to each player before their defuse is added.
pub const STARTING_HAND_SIZE: usize = 4;

/// How many cards a See The Future peek reveals.
pub const FUTURE_PEEK_COUNT: usize = 3;

/// Total printed cards across the whole catalog.
pub const DECK_SIZE: usize = 56;

/// How long a contestable play stays open for a veto.
pub const DEFAULT_NOPE_WINDOW_MS: u64 = 5_000;

/// Empty rooms older than this are shut down.
pub const DEFAULT_IDLE_ROOM_TIMEOUT_SECS: u64 = 3_600;
