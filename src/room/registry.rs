//! Room registry for spawning and looking up room actors.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc, oneshot};
use uuid::Uuid;

use super::actor::{RoomActor, RoomHandle};
use super::config::RoomConfig;
use super::messages::{RoomError, RoomEvent, RoomId, RoomMessage, RoomSummary};
use crate::game::cards::CardId;
use crate::game::entities::{GameState, PlayerId};

/// Shared directory of live rooms. Cheap to clone; all clones see the same
/// rooms.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<RwLock<HashMap<RoomId, RoomHandle>>>,
}

impl RoomRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a new room and seat its creator. Returns the room id and the
    /// creator's player id.
    pub async fn create_room(
        &self,
        config: RoomConfig,
        creator_name: &str,
    ) -> Result<(RoomId, PlayerId), RoomError> {
        config.validate().map_err(RoomError::InvalidConfig)?;

        let room_id = Uuid::new_v4();
        let (actor, handle) = RoomActor::new(room_id, config);
        tokio::spawn(actor.run());

        let player_id = Self::request(&handle, |response| RoomMessage::Join {
            name: creator_name.to_string(),
            response,
        })
        .await??;

        self.rooms.write().await.insert(room_id, handle);
        log::info!("Created room {room_id} for {creator_name}");
        Ok((room_id, player_id))
    }

    pub async fn get(&self, room_id: RoomId) -> Option<RoomHandle> {
        self.rooms.read().await.get(&room_id).cloned()
    }

    pub async fn join_room(
        &self,
        room_id: RoomId,
        name: &str,
    ) -> Result<PlayerId, RoomError> {
        let handle = self.handle(room_id).await?;
        Self::request(&handle, |response| RoomMessage::Join {
            name: name.to_string(),
            response,
        })
        .await?
    }

    pub async fn leave_room(&self, room_id: RoomId, player_id: PlayerId) -> Result<(), RoomError> {
        let handle = self.handle(room_id).await?;
        Self::request(&handle, |response| RoomMessage::Leave {
            player_id,
            response,
        })
        .await?
    }

    pub async fn set_ready(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        is_ready: bool,
    ) -> Result<(), RoomError> {
        let handle = self.handle(room_id).await?;
        Self::request(&handle, |response| RoomMessage::SetReady {
            player_id,
            is_ready,
            response,
        })
        .await?
    }

    pub async fn start_game(&self, room_id: RoomId, player_id: PlayerId) -> Result<(), RoomError> {
        let handle = self.handle(room_id).await?;
        Self::request(&handle, |response| RoomMessage::StartGame {
            player_id,
            response,
        })
        .await?
    }

    pub async fn draw_card(&self, room_id: RoomId, player_id: PlayerId) -> Result<(), RoomError> {
        let handle = self.handle(room_id).await?;
        handle.send(RoomMessage::DrawCard { player_id }).await
    }

    pub async fn play_card(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        card_id: CardId,
        target_id: Option<PlayerId>,
    ) -> Result<(), RoomError> {
        let handle = self.handle(room_id).await?;
        handle
            .send(RoomMessage::PlayCard {
                player_id,
                card_id,
                target_id,
            })
            .await
    }

    pub async fn play_nope(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
        card_id: CardId,
    ) -> Result<(), RoomError> {
        let handle = self.handle(room_id).await?;
        handle
            .send(RoomMessage::PlayNope { player_id, card_id })
            .await
    }

    pub async fn end_turn(&self, room_id: RoomId, player_id: PlayerId) -> Result<(), RoomError> {
        let handle = self.handle(room_id).await?;
        handle.send(RoomMessage::EndTurn { player_id }).await
    }

    /// Subscribe to a room's event stream.
    pub async fn subscribe(
        &self,
        room_id: RoomId,
        player_id: PlayerId,
    ) -> Result<mpsc::Receiver<RoomEvent>, RoomError> {
        let handle = self.handle(room_id).await?;
        let (sender, receiver) = mpsc::channel(64);
        handle
            .send(RoomMessage::Subscribe { player_id, sender })
            .await?;
        Ok(receiver)
    }

    pub async fn game_state(&self, room_id: RoomId) -> Result<Option<Box<GameState>>, RoomError> {
        let handle = self.handle(room_id).await?;
        Self::request(&handle, |response| RoomMessage::GetGameState { response }).await
    }

    pub async fn summary(&self, room_id: RoomId) -> Result<RoomSummary, RoomError> {
        let handle = self.handle(room_id).await?;
        Self::request(&handle, |response| RoomMessage::GetSummary { response }).await
    }

    /// List rooms still accepting players.
    pub async fn list_open(&self) -> Vec<RoomSummary> {
        let handles: Vec<RoomHandle> = self.rooms.read().await.values().cloned().collect();
        let mut open = Vec::new();
        for handle in handles {
            let Ok(summary) =
                Self::request(&handle, |response| RoomMessage::GetSummary { response }).await
            else {
                continue;
            };
            if !summary.is_started && summary.player_count < summary.max_players {
                open.push(summary);
            }
        }
        open
    }

    /// Shut a room down and forget it.
    pub async fn close_room(&self, room_id: RoomId) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .write()
            .await
            .remove(&room_id)
            .ok_or(RoomError::RoomNotFound)?;
        handle.send(RoomMessage::Close).await
    }

    /// Drop handles to rooms whose actors have shut down.
    pub async fn reap(&self) -> usize {
        let mut rooms = self.rooms.write().await;
        let before = rooms.len();
        rooms.retain(|_, handle| !handle.is_closed());
        before - rooms.len()
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    async fn handle(&self, room_id: RoomId) -> Result<RoomHandle, RoomError> {
        self.get(room_id).await.ok_or(RoomError::RoomNotFound)
    }

    /// One oneshot round-trip with a room actor.
    async fn request<T>(
        handle: &RoomHandle,
        message: impl FnOnce(oneshot::Sender<T>) -> RoomMessage,
    ) -> Result<T, RoomError> {
        let (sender, receiver) = oneshot::channel();
        handle.send(message(sender)).await?;
        receiver.await.map_err(|_| RoomError::RoomClosed)
    }
}
