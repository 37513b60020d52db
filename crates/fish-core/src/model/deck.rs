use crate::config::Rules;
use crate::model::card::{Card, all_cards};
use rand::seq::SliceRandom;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The 54-card deck in canonical order.
    pub fn standard() -> Self {
        Self {
            cards: all_cards().collect(),
        }
    }

    /// The deck described by a rule set, in its configured order.
    pub fn from_rules(rules: &Rules) -> Self {
        Self {
            cards: rules.deck().to_vec(),
        }
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Splits the deck front to back into consecutive hands of the given sizes.
    /// Cards beyond the requested total are left out.
    pub fn split(&self, sizes: &[u8]) -> Vec<Vec<Card>> {
        let mut remaining = self.cards.iter().copied();
        sizes
            .iter()
            .map(|size| remaining.by_ref().take(*size as usize).collect())
            .collect()
    }
}
