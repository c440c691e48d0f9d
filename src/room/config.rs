//! Per-room configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::game::constants::{
    DEFAULT_IDLE_ROOM_TIMEOUT_SECS, DEFAULT_NOPE_WINDOW_MS, MAX_PLAYERS, MIN_PLAYERS,
};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RoomConfig {
    pub name: String,
    pub max_players: usize,
    /// How long a contestable play stays open before it resolves.
    pub nope_window_ms: u64,
    /// An empty room older than this shuts itself down.
    pub idle_timeout_secs: u64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            name: "Default Room".to_string(),
            max_players: MAX_PLAYERS,
            nope_window_ms: DEFAULT_NOPE_WINDOW_MS,
            idle_timeout_secs: DEFAULT_IDLE_ROOM_TIMEOUT_SECS,
        }
    }
}

impl RoomConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("room name cannot be empty".to_string());
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.max_players) {
            return Err(format!(
                "max_players must be between {MIN_PLAYERS} and {MAX_PLAYERS}, got {}",
                self.max_players
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn nope_window(&self) -> Duration {
        Duration::from_millis(self.nope_window_ms)
    }

    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}
