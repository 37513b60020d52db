//! Validated initial deals.

use crate::belief::BeliefState;
use crate::config::Rules;
use crate::error::{ConfigurationError, EngineError};
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::seat::Seat;
use rand::Rng;
use std::sync::Arc;

/// Every participant's starting hand, checked against the rules.
#[derive(Debug, Clone)]
pub struct Deal {
    rules: Arc<Rules>,
    hands: Vec<Vec<Card>>,
    holders: Vec<Seat>,
}

impl Deal {
    /// Checks hand count, hand sizes, deck membership and duplicates.
    pub fn new(rules: Arc<Rules>, hands: Vec<Vec<Card>>) -> Result<Self, ConfigurationError> {
        if hands.len() != rules.participants() {
            return Err(ConfigurationError::HandCount {
                expected: rules.participants(),
                found: hands.len(),
            });
        }
        let mut holders: Vec<Option<Seat>> = vec![None; rules.population()];
        for (seat, hand) in rules.seats().zip(&hands) {
            let expected = rules.initial_hand_size(seat);
            if hand.len() != expected as usize {
                return Err(ConfigurationError::HandSizeMismatch {
                    seat,
                    expected,
                    found: hand.len(),
                });
            }
            for card in hand {
                let index = rules
                    .index_of(*card)
                    .ok_or(ConfigurationError::CardNotInDeck(*card))?;
                if holders[index].replace(seat).is_some() {
                    return Err(ConfigurationError::DuplicateCard(*card));
                }
            }
        }
        // Sizes sum to the population and nothing repeats, so every card is dealt.
        let holders = holders.into_iter().flatten().collect();
        Ok(Self {
            rules,
            hands,
            holders,
        })
    }

    /// Parses card strings such as `"Th"` or `"SJ"` before validating.
    pub fn from_strs<S: AsRef<str>>(rules: Arc<Rules>, hands: &[Vec<S>]) -> Result<Self, ConfigurationError> {
        let parsed = hands
            .iter()
            .map(|hand| {
                hand.iter()
                    .map(|name| name.as_ref().parse::<Card>())
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rules, parsed)
    }

    /// Shuffles the configured deck and deals it front to back.
    pub fn random<R: Rng + ?Sized>(rules: Arc<Rules>, rng: &mut R) -> Self {
        let mut deck = Deck::from_rules(&rules);
        deck.shuffle_in_place(rng);
        let hands = deck.split(rules.initial_hand_sizes());
        let mut holders = vec![Seat::new(0); rules.population()];
        for (seat, hand) in rules.seats().zip(&hands) {
            for card in hand {
                if let Some(index) = rules.index_of(*card) {
                    holders[index] = seat;
                }
            }
        }
        Self {
            rules,
            hands,
            holders,
        }
    }

    pub fn rules(&self) -> &Arc<Rules> {
        &self.rules
    }

    pub fn hands(&self) -> &[Vec<Card>] {
        &self.hands
    }

    pub fn hand(&self, seat: Seat) -> &[Card] {
        &self.hands[seat.index()]
    }

    pub fn holder_of(&self, card: Card) -> Option<Seat> {
        self.rules.index_of(card).map(|index| self.holders[index])
    }

    /// Start-of-game belief of `seat`.
    pub fn belief_for(&self, seat: Seat) -> Result<BeliefState, EngineError> {
        if !self.rules.contains_seat(seat) {
            return Err(ConfigurationError::UnknownSeat(seat).into());
        }
        BeliefState::new(self.rules.clone(), seat, self.hand(seat))
    }

    pub fn beliefs(&self) -> Result<Vec<BeliefState>, EngineError> {
        self.rules.seats().map(|seat| self.belief_for(seat)).collect()
    }
}
