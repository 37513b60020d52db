//! Card domain: suits, ranks, cards, half-suit groups and seats.

pub mod card;
pub mod deck;
pub mod half_suit;
pub mod hand;
pub mod rank;
pub mod seat;
pub mod suit;

pub use card::{Card, STANDARD_DECK_SIZE, all_cards};
pub use deck::Deck;
pub use half_suit::{HALF_SUIT_SIZE, HalfSuit};
pub use hand::Hand;
pub use rank::Rank;
pub use seat::{Seat, TeamId};
pub use suit::Suit;
