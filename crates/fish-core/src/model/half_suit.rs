//! Half-suit classification of the standard deck.
//!
//! The 54 cards split into nine groups of six: the low (2–7) and high (9–A)
//! half of every suit, plus the four eights together with both jokers.

use crate::error::MalformedCardError;
use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;

/// Number of cards in every half-suit.
pub const HALF_SUIT_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HalfSuit {
    Low(Suit),
    High(Suit),
    EightsAndJokers,
}

impl HalfSuit {
    /// Canonical group order.
    pub const ALL: [HalfSuit; 9] = [
        HalfSuit::Low(Suit::Clubs),
        HalfSuit::High(Suit::Clubs),
        HalfSuit::Low(Suit::Diamonds),
        HalfSuit::High(Suit::Diamonds),
        HalfSuit::Low(Suit::Hearts),
        HalfSuit::High(Suit::Hearts),
        HalfSuit::Low(Suit::Spades),
        HalfSuit::High(Suit::Spades),
        HalfSuit::EightsAndJokers,
    ];

    const LOW_RANKS: [Rank; 6] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
    ];

    const HIGH_RANKS: [Rank; 6] = [
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub fn of(card: Card) -> Self {
        match card {
            Card::Suited { rank, suit } if rank.is_low() => HalfSuit::Low(suit),
            Card::Suited { rank, suit } if rank.is_high() => HalfSuit::High(suit),
            _ => HalfSuit::EightsAndJokers,
        }
    }

    /// Classifies a card given by its short name.
    pub fn of_name(name: &str) -> Result<Self, MalformedCardError> {
        name.parse::<Card>().map(Self::of)
    }

    /// The six cards of this group in canonical order.
    pub fn cards(self) -> [Card; HALF_SUIT_SIZE] {
        match self {
            HalfSuit::Low(suit) => Self::LOW_RANKS.map(|rank| Card::new(rank, suit)),
            HalfSuit::High(suit) => Self::HIGH_RANKS.map(|rank| Card::new(rank, suit)),
            HalfSuit::EightsAndJokers => [
                Card::new(Rank::Eight, Suit::Clubs),
                Card::new(Rank::Eight, Suit::Diamonds),
                Card::new(Rank::Eight, Suit::Hearts),
                Card::new(Rank::Eight, Suit::Spades),
                Card::SmallJoker,
                Card::BigJoker,
            ],
        }
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(Self::ALL.len() - 1)
    }

    pub fn contains(self, card: Card) -> bool {
        Self::of(card) == self
    }
}

impl fmt::Display for HalfSuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HalfSuit::Low(suit) => write!(f, "L{suit}"),
            HalfSuit::High(suit) => write!(f, "H{suit}"),
            HalfSuit::EightsAndJokers => f.write_str("8J"),
        }
    }
}
