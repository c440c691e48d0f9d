//! Room module providing multi-room support with async actor model.
//!
//! This module implements:
//! - RoomActor: Async actor managing a single game room
//! - RoomRegistry: Shared directory for spawning and finding rooms
//! - Message-based communication with tokio channels
//! - Timed veto windows for contestable plays
//!
//! ## Architecture
//!
//! Each room runs in a separate Tokio task with an mpsc message inbox and
//! exclusive ownership of its game state. The RoomRegistry spawns RoomActor
//! instances and hands out cloneable handles; subscribers receive room
//! events over their own mpsc channels.
//!
//! ## Example
//!
//! ```ignore
//! use kitten_kaboom::room::{RoomConfig, RoomRegistry};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = RoomRegistry::new();
//!     let (room_id, owner_id) = registry
//!         .create_room(RoomConfig::default(), "alice")
//!         .await
//!         .unwrap();
//!
//!     let bob_id = registry.join_room(room_id, "bob").await.unwrap();
//!     registry.set_ready(room_id, owner_id, true).await.unwrap();
//!     registry.set_ready(room_id, bob_id, true).await.unwrap();
//!     registry.start_game(room_id, owner_id).await.unwrap();
//! }
//! ```

pub mod actor;
pub mod config;
pub mod messages;
pub mod registry;

pub use actor::{RoomActor, RoomHandle};
pub use config::RoomConfig;
pub use messages::{RoomError, RoomEvent, RoomId, RoomMessage, RoomSummary};
pub use registry::RoomRegistry;
