//! Card taxonomy, catalog, and deck construction.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::constants::DECK_SIZE;

/// Opaque identifier for a single physical card.
pub type CardId = Uuid;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    ExplodingKitten,
    Defuse,
    Nope,
    Attack,
    Skip,
    Favor,
    Shuffle,
    SeeTheFuture,
    TacoCat,
    Cattermelon,
    HairyPotato,
    RainbowRalphing,
    Beard,
}

/// Printed attributes of a card type.
#[derive(Clone, Copy, Debug)]
pub struct CardInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub printed_count: usize,
}

impl CardType {
    pub const ALL: [Self; 13] = [
        Self::ExplodingKitten,
        Self::Defuse,
        Self::Nope,
        Self::Attack,
        Self::Skip,
        Self::Favor,
        Self::Shuffle,
        Self::SeeTheFuture,
        Self::TacoCat,
        Self::Cattermelon,
        Self::HairyPotato,
        Self::RainbowRalphing,
        Self::Beard,
    ];

    #[must_use]
    pub const fn info(self) -> CardInfo {
        match self {
            Self::ExplodingKitten => CardInfo {
                name: "Exploding Kitten",
                description: "Show this card immediately. Unless you have a \
                              Defuse, you're out of the game.",
                printed_count: 4,
            },
            Self::Defuse => CardInfo {
                name: "Defuse",
                description: "Play to disarm an Exploding Kitten you drew, \
                              then return the kitten to the draw pile.",
                printed_count: 6,
            },
            Self::Nope => CardInfo {
                name: "Nope",
                description: "Stop any action except an Exploding Kitten or a \
                              Defuse. Playable at any time, even off-turn.",
                printed_count: 5,
            },
            Self::Attack => CardInfo {
                name: "Attack",
                description: "End your turn without drawing and force the \
                              next player to take 2 turns in a row.",
                printed_count: 4,
            },
            Self::Skip => CardInfo {
                name: "Skip",
                description: "Immediately end your turn without drawing.",
                printed_count: 4,
            },
            Self::Favor => CardInfo {
                name: "Favor",
                description: "Force another player to give you one card from \
                              their hand.",
                printed_count: 4,
            },
            Self::Shuffle => CardInfo {
                name: "Shuffle",
                description: "Shuffle the draw pile without viewing the cards.",
                printed_count: 4,
            },
            Self::SeeTheFuture => CardInfo {
                name: "See The Future",
                description: "Peek at the top 3 cards of the draw pile, then \
                              put them back in the same order.",
                printed_count: 5,
            },
            Self::TacoCat => CardInfo {
                name: "Taco Cat",
                description: "Powerless alone, but playable as a pair to \
                              steal a random card from another player.",
                printed_count: 4,
            },
            Self::Cattermelon => CardInfo {
                name: "Cattermelon",
                description: "Powerless alone, but playable as a pair to \
                              steal a random card from another player.",
                printed_count: 4,
            },
            Self::HairyPotato => CardInfo {
                name: "Hairy Potato Cat",
                description: "Powerless alone, but playable as a pair to \
                              steal a random card from another player.",
                printed_count: 4,
            },
            Self::RainbowRalphing => CardInfo {
                name: "Rainbow-Ralphing Cat",
                description: "Powerless alone, but playable as a pair to \
                              steal a random card from another player.",
                printed_count: 4,
            },
            Self::Beard => CardInfo {
                name: "Beard Cat",
                description: "Powerless alone, but playable as a pair to \
                              steal a random card from another player.",
                printed_count: 4,
            },
        }
    }

    /// Cat cards are mechanically identical and only pair within their
    /// own variant.
    #[must_use]
    pub const fn is_cat(self) -> bool {
        matches!(
            self,
            Self::TacoCat
                | Self::Cattermelon
                | Self::HairyPotato
                | Self::RainbowRalphing
                | Self::Beard
        )
    }

    /// Whether a play of this card opens a veto window. Nope itself,
    /// Defuse, and Exploding Kitten resolve immediately.
    #[must_use]
    pub const fn is_contestable(self) -> bool {
        !matches!(self, Self::ExplodingKitten | Self::Defuse | Self::Nope)
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info().name)
    }
}

/// A single physical card. Immutable once minted.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Card {
    pub id: CardId,
    pub card_type: CardType,
    pub name: String,
    pub description: String,
    pub printed_count: usize,
}

impl Card {
    /// Mint a fresh card instance of the given type.
    #[must_use]
    pub fn mint(card_type: CardType) -> Self {
        let info = card_type.info();
        Self {
            id: Uuid::new_v4(),
            card_type,
            name: info.name.to_string(),
            description: info.description.to_string(),
            printed_count: info.printed_count,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

/// Build one full deck: `printed_count` fresh instances of every card type,
/// in catalog order (callers shuffle).
#[must_use]
pub fn build_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for card_type in CardType::ALL {
        for _ in 0..card_type.info().printed_count {
            deck.push(Card::mint(card_type));
        }
    }
    deck
}

/// Uniform in-place shuffle. Restartable: piles get reshuffled whenever a
/// defused kitten goes back in.
pub fn shuffle_pile(pile: &mut [Card]) {
    pile.shuffle(&mut rand::rng());
}
