//! Room actor with async message handling.
//!
//! Each room owns its lobby roster and game state exclusively and is driven
//! by messages on its inbox. Contestable plays do not apply immediately:
//! the actor opens a veto window, parks the play as a pending action, and
//! applies it only when the window's timer fires with a matching token. A
//! veto aborts the timer; a stale timer that fires anyway finds its token
//! gone and does nothing.

use std::collections::HashMap;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::{Duration, interval, sleep};
use uuid::Uuid;

use super::config::RoomConfig;
use super::messages::{RoomError, RoomEvent, RoomId, RoomMessage, RoomSummary};
use crate::game::cards::{CardId, CardType};
use crate::game::constants::MIN_PLAYERS;
use crate::game::entities::{GamePhase, GameState, PendingAction, Player, PlayerId};
use crate::game::engine::{DrawOutcome, PlayOutcome};

/// Room actor handle for sending messages.
#[derive(Clone)]
pub struct RoomHandle {
    sender: mpsc::Sender<RoomMessage>,
    room_id: RoomId,
}

impl RoomHandle {
    pub fn new(sender: mpsc::Sender<RoomMessage>, room_id: RoomId) -> Self {
        Self { sender, room_id }
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Send a message to the room.
    pub async fn send(&self, message: RoomMessage) -> Result<(), RoomError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| RoomError::RoomClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Room actor managing a single game room.
pub struct RoomActor {
    id: RoomId,
    config: RoomConfig,
    /// Lobby roster; seat 0 is the room owner.
    players: Vec<Player>,
    /// Live game, if one has been dealt.
    game: Option<GameState>,
    inbox: mpsc::Receiver<RoomMessage>,
    /// Loopback sender used by veto-window timer tasks.
    self_sender: mpsc::Sender<RoomMessage>,
    subscribers: HashMap<PlayerId, mpsc::Sender<RoomEvent>>,
    /// Timer for the currently open veto window, if any.
    nope_timer: Option<AbortHandle>,
    created_at: chrono::DateTime<Utc>,
    last_activity: Instant,
    is_closed: bool,
}

impl RoomActor {
    pub fn new(id: RoomId, config: RoomConfig) -> (Self, RoomHandle) {
        let (sender, inbox) = mpsc::channel(100);

        let actor = Self {
            id,
            config,
            players: Vec::new(),
            game: None,
            inbox,
            self_sender: sender.clone(),
            subscribers: HashMap::new(),
            nope_timer: None,
            created_at: Utc::now(),
            last_activity: Instant::now(),
            is_closed: false,
        };

        let handle = RoomHandle::new(sender, id);

        (actor, handle)
    }

    /// Run the room actor event loop.
    pub async fn run(mut self) {
        log::info!("Room {} '{}' starting", self.id, self.config.name);

        let mut tick_interval = interval(Duration::from_secs(1));

        loop {
            tokio::select! {
                Some(message) = self.inbox.recv() => {
                    self.last_activity = Instant::now();
                    self.handle_message(message);

                    if self.is_closed {
                        break;
                    }
                }

                _ = tick_interval.tick() => {
                    if self.players.is_empty()
                        && self.last_activity.elapsed() >= self.config.idle_timeout()
                    {
                        log::info!("Room {} idle timeout, shutting down", self.id);
                        break;
                    }
                }
            }
        }

        if let Some(timer) = self.nope_timer.take() {
            timer.abort();
        }
        log::info!("Room {} '{}' closed", self.id, self.config.name);
    }

    fn handle_message(&mut self, message: RoomMessage) {
        match message {
            RoomMessage::Join { name, response } => {
                let _ = response.send(self.handle_join(name));
            }

            RoomMessage::Leave {
                player_id,
                response,
            } => {
                let _ = response.send(self.handle_leave(player_id));
            }

            RoomMessage::SetReady {
                player_id,
                is_ready,
                response,
            } => {
                let _ = response.send(self.handle_set_ready(player_id, is_ready));
            }

            RoomMessage::StartGame {
                player_id,
                response,
            } => {
                let _ = response.send(self.handle_start_game(player_id));
            }

            RoomMessage::DrawCard { player_id } => self.handle_draw(player_id),

            RoomMessage::PlayCard {
                player_id,
                card_id,
                target_id,
            } => self.handle_play_card(player_id, card_id, target_id),

            RoomMessage::PlayNope { player_id, card_id } => {
                self.handle_play_nope(player_id, card_id);
            }

            RoomMessage::EndTurn { player_id } => self.handle_end_turn(player_id),

            RoomMessage::GetSummary { response } => {
                let _ = response.send(self.summary());
            }

            RoomMessage::GetGameState { response } => {
                let _ = response.send(self.game.clone().map(Box::new));
            }

            RoomMessage::Subscribe { player_id, sender } => {
                self.subscribers.insert(player_id, sender);
            }

            RoomMessage::Unsubscribe { player_id } => {
                self.subscribers.remove(&player_id);
            }

            RoomMessage::ResolvePending { token } => self.handle_resolve_pending(token),

            RoomMessage::Close => {
                self.is_closed = true;
            }
        }
    }

    fn is_started(&self) -> bool {
        self.game
            .as_ref()
            .is_some_and(|g| g.phase == GamePhase::Playing)
    }

    fn handle_join(&mut self, name: String) -> Result<PlayerId, RoomError> {
        if self.is_started() {
            return Err(RoomError::GameAlreadyStarted);
        }
        if self.players.len() >= self.config.max_players {
            return Err(RoomError::RoomFull);
        }
        if self.players.iter().any(|p| p.name == name) {
            return Err(RoomError::DuplicateName);
        }

        let player = Player::new(&name);
        let player_id = player.id;
        self.players.push(player);
        log::info!("Room {}: {} joined", self.id, name);
        self.broadcast(RoomEvent::PlayerJoined { player_id, name });
        Ok(player_id)
    }

    fn handle_leave(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        let Some(idx) = self.players.iter().position(|p| p.id == player_id) else {
            return Err(RoomError::PlayerNotInRoom);
        };
        let player = self.players.remove(idx);
        self.subscribers.remove(&player_id);
        log::info!("Room {}: {} left", self.id, player.name);

        // A mid-game leave counts as an elimination.
        if let Some(game) = self.game.as_mut() {
            if game
                .pending_action
                .as_ref()
                .is_some_and(|p| p.actor_id == player_id)
            {
                game.pending_action = None;
                if let Some(timer) = self.nope_timer.take() {
                    timer.abort();
                }
            }
            if game.eliminate_player(player_id) {
                self.broadcast_state();
            }
        }

        self.broadcast(RoomEvent::PlayerLeft { player_id });
        if self.players.is_empty() {
            self.is_closed = true;
        }
        Ok(())
    }

    fn handle_set_ready(&mut self, player_id: PlayerId, is_ready: bool) -> Result<(), RoomError> {
        let Some(player) = self.players.iter_mut().find(|p| p.id == player_id) else {
            return Err(RoomError::PlayerNotInRoom);
        };
        player.is_ready = is_ready;
        self.broadcast(RoomEvent::PlayerReady {
            player_id,
            is_ready,
        });
        Ok(())
    }

    fn handle_start_game(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        if !self.players.iter().any(|p| p.id == player_id) {
            return Err(RoomError::PlayerNotInRoom);
        }
        if self.players[0].id != player_id {
            return Err(RoomError::NotRoomOwner);
        }
        if self.is_started() {
            return Err(RoomError::GameAlreadyStarted);
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(RoomError::NotEnoughPlayers);
        }
        if !self.players.iter().all(|p| p.is_ready) {
            return Err(RoomError::PlayersNotReady);
        }

        let state = GameState::deal(self.players.clone())?;
        self.game = Some(state);
        log::info!(
            "Room {}: game started with {} players",
            self.id,
            self.players.len()
        );
        self.broadcast(RoomEvent::GameStarted);
        self.broadcast_state();
        Ok(())
    }

    fn handle_draw(&mut self, player_id: PlayerId) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        // No draws while a veto window is open.
        if game.pending_action.is_some() {
            return;
        }
        match game.draw_card(player_id) {
            DrawOutcome::Ignored => {}
            DrawOutcome::Exploded => {
                // Elimination does not advance the turn by itself.
                if game.phase == GamePhase::Playing {
                    game.end_turn();
                }
                self.broadcast_state();
            }
            _ => self.broadcast_state(),
        }
    }

    fn handle_play_card(
        &mut self,
        player_id: PlayerId,
        card_id: CardId,
        target_id: Option<PlayerId>,
    ) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        if game.phase != GamePhase::Playing {
            return;
        }
        let Some(player) = game.player(player_id) else {
            return;
        };
        let Some(card_idx) = player.hand_index(card_id) else {
            return;
        };
        let card_type = player.hand[card_idx].card_type;

        if !card_type.is_contestable() {
            // Only a Nope has a play effect here, and it rides the veto path.
            self.handle_play_nope(player_id, card_id);
            return;
        }

        // One veto window at a time; the play itself must be the current
        // player's to make.
        if game.pending_action.is_some()
            || !player.is_alive
            || game.current_player().id != player_id
        {
            return;
        }

        let token = Uuid::new_v4();
        let deadline = Utc::now() + chrono::Duration::milliseconds(self.config.nope_window_ms as i64);
        game.pending_action = Some(PendingAction {
            actor_id: player_id,
            card_id,
            target_id,
            token,
            deadline,
        });
        self.broadcast(RoomEvent::ActionPending {
            actor_id: player_id,
            card_id,
            target_id,
            time_remaining_ms: self.config.nope_window_ms,
        });

        let sender = self.self_sender.clone();
        let window = self.config.nope_window();
        let timer = tokio::spawn(async move {
            sleep(window).await;
            let _ = sender.send(RoomMessage::ResolvePending { token }).await;
        });
        self.nope_timer = Some(timer.abort_handle());
    }

    fn handle_play_nope(&mut self, player_id: PlayerId, card_id: CardId) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        // Only an actual Nope card rides the veto path.
        let Some(player) = game.player(player_id) else {
            return;
        };
        let holds_nope = player
            .hand
            .iter()
            .any(|c| c.id == card_id && c.card_type == CardType::Nope);
        if !holds_nope {
            return;
        }

        let had_pending = game.pending_action.is_some();
        if game.play_card(player_id, card_id, None) != PlayOutcome::Applied {
            return;
        }

        if had_pending {
            // The contested play never applies, but the card stays in its
            // owner's hand and can be replayed later.
            game.pending_action = None;
            if let Some(timer) = self.nope_timer.take() {
                timer.abort();
            }
            self.broadcast(RoomEvent::ActionNoped {
                vetoer_id: player_id,
            });
        }
        self.broadcast_state();
    }

    fn handle_resolve_pending(&mut self, token: Uuid) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        let Some(pending) = game.pending_action.clone() else {
            // Stale timer after a veto or a leave.
            log::debug!("Room {}: timer fired with no pending action", self.id);
            return;
        };
        if pending.token != token {
            log::debug!("Room {}: stale resolution token ignored", self.id);
            return;
        }

        game.pending_action = None;
        self.nope_timer = None;
        let outcome = game.play_card(pending.actor_id, pending.card_id, pending.target_id);
        if outcome == PlayOutcome::Ignored {
            log::debug!(
                "Room {}: pending play no longer legal at resolution",
                self.id
            );
        }
        self.broadcast(RoomEvent::ActionResolved);
        self.broadcast_state();
    }

    fn handle_end_turn(&mut self, player_id: PlayerId) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        if game.pending_action.is_some() || game.current_player().id != player_id {
            return;
        }
        if game.end_turn() {
            self.broadcast_state();
        }
    }

    fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id,
            name: self.config.name.clone(),
            player_count: self.players.len(),
            max_players: self.config.max_players,
            is_started: self.is_started(),
            created_at: self.created_at,
        }
    }

    fn broadcast_state(&mut self) {
        if let Some(game) = &self.game {
            let event = RoomEvent::GameStateUpdate {
                state: Box::new(game.clone()),
            };
            self.broadcast(event);
        }
    }

    /// Fan an event out to all subscribers, dropping the disconnected.
    fn broadcast(&mut self, event: RoomEvent) {
        let room_id = self.id;
        self.subscribers
            .retain(|player_id, sender| match sender.try_send(event.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!("Room {room_id}: subscriber {player_id} lagging, event dropped");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => false,
            });
    }
}
