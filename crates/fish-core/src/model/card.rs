use crate::error::MalformedCardError;
use crate::model::half_suit::HalfSuit;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Number of cards in the standard deck, jokers included.
pub const STANDARD_DECK_SIZE: usize = 54;

/// A playing card: a ranked card of some suit, or one of the two jokers.
///
/// Cards serialize as their short string form (`"Th"`, `"SJ"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Card {
    Suited { rank: Rank, suit: Suit },
    SmallJoker,
    BigJoker,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Card::Suited { rank, suit }
    }

    /// Canonical position within the standard deck: suit-major, rank-ascending, jokers last.
    pub const fn to_id(self) -> u8 {
        match self {
            Card::Suited { rank, suit } => (suit.index() * 13 + rank.offset()) as u8,
            Card::SmallJoker => 52,
            Card::BigJoker => 53,
        }
    }

    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            52 => Some(Card::SmallJoker),
            53 => Some(Card::BigJoker),
            _ if id < 52 => {
                let suit = match Suit::from_index(id as usize / 13) {
                    Some(suit) => suit,
                    None => return None,
                };
                match Rank::from_value(id % 13 + 2) {
                    Some(rank) => Some(Card::new(rank, suit)),
                    None => None,
                }
            }
            _ => None,
        }
    }

    pub const fn rank(self) -> Option<Rank> {
        match self {
            Card::Suited { rank, .. } => Some(rank),
            _ => None,
        }
    }

    pub const fn suit(self) -> Option<Suit> {
        match self {
            Card::Suited { suit, .. } => Some(suit),
            _ => None,
        }
    }

    pub const fn is_joker(self) -> bool {
        matches!(self, Card::SmallJoker | Card::BigJoker)
    }

    pub fn half_suit(self) -> HalfSuit {
        HalfSuit::of(self)
    }
}

/// The standard deck in canonical order.
pub fn all_cards() -> impl Iterator<Item = Card> {
    (0..STANDARD_DECK_SIZE as u8).filter_map(Card::from_id)
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Suited { rank, suit } => write!(f, "{rank}{suit}"),
            Card::SmallJoker => f.write_str("SJ"),
            Card::BigJoker => f.write_str("BJ"),
        }
    }
}

impl FromStr for Card {
    type Err = MalformedCardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        match trimmed {
            "SJ" => return Ok(Card::SmallJoker),
            "BJ" => return Ok(Card::BigJoker),
            _ => {}
        }
        let mut chars = trimmed.chars();
        let parsed = match (chars.next(), chars.next(), chars.next()) {
            (Some(rank), Some(suit), None) => Rank::from_symbol(rank)
                .zip(Suit::from_symbol(suit))
                .map(|(rank, suit)| Card::new(rank, suit)),
            _ => None,
        };
        parsed.ok_or_else(|| MalformedCardError(value.to_string()))
    }
}

impl TryFrom<String> for Card {
    type Error = MalformedCardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.to_string()
    }
}
