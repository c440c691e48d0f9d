//! The deal / draw / play / end-turn state machine.
//!
//! Every operation is total over its input domain: illegal input leaves the
//! state untouched and reports an `Ignored` outcome instead of erroring.
//! Room-management faults (a bad roster size at deal time) are the one
//! exception and surface as explicit errors.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cards::{CardId, CardType, build_deck, shuffle_pile};
use super::constants::{FUTURE_PEEK_COUNT, MAX_PLAYERS, MIN_PLAYERS, STARTING_HAND_SIZE};
use super::entities::{GamePhase, GameState, Player, PlayerId};

#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum DealError {
    #[error("need {MIN_PLAYERS}-{MAX_PLAYERS} players, got {0}")]
    InvalidPlayerCount(usize),
}

/// What a `draw_card` call did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DrawOutcome {
    /// Ordinary card added to the hand; turn auto-ended.
    Drew,
    /// Kitten drawn and defused; pile reshuffled; turn auto-ended.
    Defused,
    /// Kitten drawn with no defuse in hand; player eliminated.
    Exploded,
    /// Draw pile was empty with 2+ players alive; game ends in a stalemate.
    PileExhausted,
    /// Precondition failed; state unchanged.
    Ignored,
}

/// What a `play_card` call did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlayOutcome {
    Applied,
    /// Precondition failed; state unchanged.
    Ignored,
}

impl GameState {
    /// Deal a fresh game for a 2-5 player roster.
    ///
    /// Each player gets 4 cards plus one Defuse; leftover defuses go back
    /// into the pile along with `roster - 1` exploding kittens, so the last
    /// player standing can never draw one.
    pub fn deal(roster: Vec<Player>) -> Result<Self, DealError> {
        let count = roster.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(DealError::InvalidPlayerCount(count));
        }

        let mut kittens = Vec::new();
        let mut defuses = Vec::new();
        let mut rest = Vec::new();
        for card in build_deck() {
            match card.card_type {
                CardType::ExplodingKitten => kittens.push(card),
                CardType::Defuse => defuses.push(card),
                _ => rest.push(card),
            }
        }
        shuffle_pile(&mut rest);

        let mut players: Vec<Player> = roster
            .into_iter()
            .enumerate()
            .map(|(seat, player)| Player {
                hand: Vec::new(),
                is_alive: true,
                is_current_player: seat == 0,
                is_ready: false,
                ..player
            })
            .collect();

        for player in &mut players {
            for _ in 0..STARTING_HAND_SIZE {
                if let Some(card) = rest.pop() {
                    player.hand.push(card);
                }
            }
        }
        for (player, defuse) in players.iter_mut().zip(defuses.drain(..count)) {
            player.hand.push(defuse);
        }

        // Leftover defuses rejoin the pile; one fewer kitten than players.
        rest.append(&mut defuses);
        rest.extend(kittens.into_iter().take(count - 1));
        shuffle_pile(&mut rest);

        Ok(Self {
            phase: GamePhase::Playing,
            players,
            current_player_idx: 0,
            draw_pile: rest,
            discard_pile: Vec::new(),
            winner: None,
            turn_count: 1,
            attack_turns_remaining: 0,
            pending_attack_turns: 0,
            last_action: "game started".to_string(),
            future_cards: None,
            pending_action: None,
        })
    }

    /// Draw the top card for `player_id`, resolving kittens and auto-ending
    /// the turn on any non-fatal draw. Elimination does not advance the
    /// turn; the layer above issues the follow-up `end_turn`.
    pub fn draw_card(&mut self, player_id: PlayerId) -> DrawOutcome {
        if self.phase != GamePhase::Playing {
            return DrawOutcome::Ignored;
        }
        let Some(idx) = self.player_index(player_id) else {
            return DrawOutcome::Ignored;
        };
        if !self.players[idx].is_alive || idx != self.current_player_idx {
            return DrawOutcome::Ignored;
        }
        self.future_cards = None;

        if self.draw_pile.is_empty() {
            // Stalemate policy: nobody left anything to draw, nobody wins.
            self.phase = GamePhase::GameOver;
            self.winner = None;
            self.last_action = "draw pile exhausted, game ends in a stalemate".to_string();
            return DrawOutcome::PileExhausted;
        }
        let Some(card) = self.draw_pile.pop() else {
            return DrawOutcome::Ignored;
        };

        if card.card_type == CardType::ExplodingKitten {
            if let Some(defuse_idx) = self.players[idx].first_of_type(CardType::Defuse) {
                let defuse = self.players[idx].hand.remove(defuse_idx);
                self.discard_pile.push(defuse);
                // Returning the kitten to a secret position is modeled as a
                // full reshuffle.
                self.draw_pile.push(card);
                shuffle_pile(&mut self.draw_pile);
                self.last_action =
                    format!("{} defused an exploding kitten", self.players[idx].name);
                self.end_turn();
                DrawOutcome::Defused
            } else {
                self.players[idx].is_alive = false;
                // A dead player's hand leaves the game entirely, not the
                // discard pile.
                self.players[idx].hand.clear();
                self.discard_pile.push(card);
                self.last_action = format!("{} exploded", self.players[idx].name);
                let survivors: Vec<usize> = self
                    .players
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.is_alive)
                    .map(|(i, _)| i)
                    .collect();
                if let [last] = survivors[..] {
                    self.winner = Some(self.players[last].id);
                    self.phase = GamePhase::GameOver;
                    self.last_action = format!(
                        "{} exploded, {} wins",
                        self.players[idx].name, self.players[last].name
                    );
                }
                DrawOutcome::Exploded
            }
        } else {
            self.last_action = format!("{} drew a card", self.players[idx].name);
            self.players[idx].hand.push(card);
            self.end_turn();
            DrawOutcome::Drew
        }
    }

    /// Apply a card's effect for `player_id`.
    ///
    /// Legal off-turn play is limited to Nope while an action is pending.
    /// The veto semantics themselves live in the room scheduler; here a
    /// Nope is discard-only.
    pub fn play_card(
        &mut self,
        player_id: PlayerId,
        card_id: CardId,
        target_id: Option<PlayerId>,
    ) -> PlayOutcome {
        if self.phase != GamePhase::Playing {
            return PlayOutcome::Ignored;
        }
        let Some(idx) = self.player_index(player_id) else {
            return PlayOutcome::Ignored;
        };
        if !self.players[idx].is_alive {
            return PlayOutcome::Ignored;
        }
        let Some(card_idx) = self.players[idx].hand_index(card_id) else {
            return PlayOutcome::Ignored;
        };
        let card_type = self.players[idx].hand[card_idx].card_type;

        let is_turn = idx == self.current_player_idx;
        let off_turn_nope = card_type == CardType::Nope && self.pending_action.is_some();
        if !is_turn && !off_turn_nope {
            return PlayOutcome::Ignored;
        }

        // Any applied play invalidates a standing peek; rejected plays
        // leave it alone.
        match card_type {
            CardType::Skip => {
                self.future_cards = None;
                self.discard_from_hand(idx, card_idx);
                self.last_action = format!("{} played a skip", self.players[idx].name);
                // A skip pays off one owed turn on top of the turn it ends,
                // so one skip escapes a plain 2-turn attack entirely.
                if self.attack_turns_remaining > 0 {
                    self.attack_turns_remaining -= 1;
                }
                self.end_turn();
            }
            CardType::Attack => {
                self.future_cards = None;
                self.discard_from_hand(idx, card_idx);
                // Any turns the actor still owed are pushed onto the next
                // player along with the two new ones, and the actor's own
                // turn ends immediately without a draw.
                self.pending_attack_turns = self.attack_turns_remaining + 2;
                self.attack_turns_remaining = 0;
                self.last_action = format!("{} played an attack", self.players[idx].name);
                self.end_turn();
            }
            CardType::Shuffle => {
                self.future_cards = None;
                self.discard_from_hand(idx, card_idx);
                shuffle_pile(&mut self.draw_pile);
                self.last_action = format!("{} shuffled the draw pile", self.players[idx].name);
            }
            CardType::SeeTheFuture => {
                self.discard_from_hand(idx, card_idx);
                self.future_cards = Some(
                    self.draw_pile
                        .iter()
                        .rev()
                        .take(FUTURE_PEEK_COUNT)
                        .cloned()
                        .collect(),
                );
                self.last_action = format!("{} peeked at the future", self.players[idx].name);
            }
            CardType::Favor => {
                let Some(target_idx) = self.steal_target(target_id) else {
                    return PlayOutcome::Ignored;
                };
                self.future_cards = None;
                self.discard_from_hand(idx, card_idx);
                self.steal_random_card(target_idx, idx);
                self.last_action = format!(
                    "{} got a card from {}",
                    self.players[idx].name, self.players[target_idx].name
                );
            }
            CardType::Nope => {
                // Discard-only at this layer; veto semantics live in the
                // room scheduler. On-turn a Nope can be burned any time.
                self.future_cards = None;
                self.discard_from_hand(idx, card_idx);
                self.last_action = format!("{} played a nope", self.players[idx].name);
            }
            _ if card_type.is_cat() => {
                let Some(target_idx) = self.steal_target(target_id) else {
                    return PlayOutcome::Ignored;
                };
                // A pair means a second card of the same variant besides the
                // one being played.
                let pair_idx = self.players[idx]
                    .hand
                    .iter()
                    .position(|c| c.card_type == card_type && c.id != card_id);
                let Some(pair_idx) = pair_idx else {
                    return PlayOutcome::Ignored;
                };
                // Remove the higher index first so the lower stays valid.
                let (first, second) = if card_idx > pair_idx {
                    (card_idx, pair_idx)
                } else {
                    (pair_idx, card_idx)
                };
                self.future_cards = None;
                self.discard_from_hand(idx, first);
                self.discard_from_hand(idx, second);
                self.steal_random_card(target_idx, idx);
                self.last_action = format!(
                    "{} used a pair of cats to steal from {}",
                    self.players[idx].name, self.players[target_idx].name
                );
            }
            // Defuse and Exploding Kitten have no play effect; defuses are
            // consumed by draw resolution.
            _ => return PlayOutcome::Ignored,
        }
        PlayOutcome::Applied
    }

    /// Advance the turn, consuming one owed attack turn if any and picking
    /// up any attack debt carried across the boundary.
    pub fn end_turn(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        if self.attack_turns_remaining > 0 {
            self.attack_turns_remaining -= 1;
            if self.attack_turns_remaining > 0 {
                // Same player keeps going.
                return true;
            }
        }

        self.players[self.current_player_idx].is_current_player = false;
        loop {
            self.current_player_idx = (self.current_player_idx + 1) % self.players.len();
            if self.players[self.current_player_idx].is_alive {
                break;
            }
        }
        self.players[self.current_player_idx].is_current_player = true;
        self.turn_count += 1;

        if self.pending_attack_turns > 0 {
            self.attack_turns_remaining = self.pending_attack_turns;
            self.pending_attack_turns = 0;
        }
        true
    }

    /// Remove a player from play outside the normal draw flow (a leave or
    /// forfeit). Their hand is destroyed and any attack debt they carried
    /// dies with them; the turn advances if it was theirs.
    pub fn eliminate_player(&mut self, player_id: PlayerId) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let Some(idx) = self.player_index(player_id) else {
            return false;
        };
        if !self.players[idx].is_alive {
            return false;
        }
        self.players[idx].is_alive = false;
        self.players[idx].hand.clear();
        self.last_action = format!("{} left the game", self.players[idx].name);

        let survivors: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_alive)
            .map(|(i, _)| i)
            .collect();
        if let [last] = survivors[..] {
            self.winner = Some(self.players[last].id);
            self.phase = GamePhase::GameOver;
            self.last_action = format!(
                "{} left the game, {} wins",
                self.players[idx].name, self.players[last].name
            );
            return true;
        }

        if idx == self.current_player_idx {
            self.attack_turns_remaining = 0;
            self.end_turn();
        }
        true
    }

    fn discard_from_hand(&mut self, player_idx: usize, card_idx: usize) {
        let card = self.players[player_idx].hand.remove(card_idx);
        self.discard_pile.push(card);
    }

    /// Resolve a steal target: a living player holding at least one card.
    fn steal_target(&self, target_id: Option<PlayerId>) -> Option<usize> {
        let target_idx = self.player_index(target_id?)?;
        let target = &self.players[target_idx];
        (target.is_alive && !target.hand.is_empty()).then_some(target_idx)
    }

    fn steal_random_card(&mut self, from_idx: usize, to_idx: usize) {
        let hand_size = self.players[from_idx].hand.len();
        let pick = rand::rng().random_range(0..hand_size);
        let stolen = self.players[from_idx].hand.remove(pick);
        self.players[to_idx].hand.push(stolen);
    }
}
