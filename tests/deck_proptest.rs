//! Property-based tests for deck construction, the deal, and card
//! conservation across arbitrary draw sequences.

use proptest::prelude::*;

use kitten_kaboom::game::{
    CardType, DrawOutcome, GamePhase, GameState, Player, build_deck, shuffle_pile,
    constants::{MAX_PLAYERS, MIN_PLAYERS, STARTING_HAND_SIZE},
};

fn roster(count: usize) -> Vec<Player> {
    (0..count).map(|i| Player::new(&format!("p{i}"))).collect()
}

fn cards_in_play(state: &GameState) -> usize {
    state.draw_pile.len()
        + state.discard_pile.len()
        + state.players.iter().map(|p| p.hand.len()).sum::<usize>()
}

proptest! {
    #[test]
    fn shuffle_is_a_permutation(take in 1usize..=56) {
        let mut pile: Vec<_> = build_deck().into_iter().take(take).collect();
        let mut before: Vec<_> = pile.iter().map(|c| c.id).collect();
        shuffle_pile(&mut pile);
        let mut after: Vec<_> = pile.iter().map(|c| c.id).collect();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn every_deal_is_legal(count in MIN_PLAYERS..=MAX_PLAYERS) {
        let state = GameState::deal(roster(count)).unwrap();

        prop_assert_eq!(state.phase, GamePhase::Playing);
        prop_assert_eq!(state.alive_count(), count);
        prop_assert_eq!(cards_in_play(&state), 51 + count);

        let kittens_in_pile = state
            .draw_pile
            .iter()
            .filter(|c| c.card_type == CardType::ExplodingKitten)
            .count();
        prop_assert_eq!(kittens_in_pile, count - 1);

        for player in &state.players {
            prop_assert_eq!(player.hand.len(), STARTING_HAND_SIZE + 1);
            prop_assert!(
                !player.hand.iter().any(|c| c.card_type == CardType::ExplodingKitten),
                "{} was dealt a kitten",
                player.name
            );
            prop_assert!(
                player.hand.iter().any(|c| c.card_type == CardType::Defuse),
                "{} has no defuse",
                player.name
            );
        }
    }

    #[test]
    fn draw_sequences_conserve_cards(
        count in MIN_PLAYERS..=MAX_PLAYERS,
        steps in 0usize..120,
    ) {
        let mut state = GameState::deal(roster(count)).unwrap();
        let baseline = cards_in_play(&state);
        let mut destroyed = 0usize;

        for _ in 0..steps {
            if state.phase != GamePhase::Playing {
                break;
            }
            let current = state.current_player();
            let (id, held) = (current.id, current.hand.len());
            match state.draw_card(id) {
                DrawOutcome::Exploded => {
                    destroyed += held;
                    if state.phase == GamePhase::Playing {
                        state.end_turn();
                    }
                }
                DrawOutcome::PileExhausted => break,
                _ => {}
            }

            prop_assert_eq!(cards_in_play(&state) + destroyed, baseline);
            // Kittens only ever live in the piles.
            prop_assert!(state
                .players
                .iter()
                .all(|p| !p.hand.iter().any(|c| c.card_type == CardType::ExplodingKitten)));

            if state.phase == GamePhase::Playing {
                // Exactly one living player is up at any time.
                let current_flags = state
                    .players
                    .iter()
                    .filter(|p| p.is_current_player)
                    .count();
                prop_assert_eq!(current_flags, 1);
                prop_assert!(state.current_player().is_alive);
            }
        }

        if state.phase == GamePhase::GameOver {
            if let Some(winner) = state.winner {
                prop_assert_eq!(state.alive_count(), 1);
                prop_assert!(state.player(winner).is_some_and(|p| p.is_alive));
            } else {
                // Stalemate: the pile ran dry with several players alive.
                prop_assert!(state.alive_count() >= 2);
                prop_assert!(state.draw_pile.is_empty());
            }
        }
    }
}
