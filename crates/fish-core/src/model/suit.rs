use core::fmt;

/// Card suits in canonical deck order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Suit {
    Clubs = 0,
    Hearts = 1,
    Diamonds = 2,
    Spades = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Hearts, Suit::Diamonds, Suit::Spades];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Clubs),
            1 => Some(Suit::Hearts),
            2 => Some(Suit::Diamonds),
            3 => Some(Suit::Spades),
            _ => None,
        }
    }

    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'c' | 'C' => Some(Suit::Clubs),
            'h' | 'H' => Some(Suit::Hearts),
            'd' | 'D' => Some(Suit::Diamonds),
            's' | 'S' => Some(Suit::Spades),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn symbol(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Spades => 's',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::Suit;

    #[test]
    fn display_returns_lowercase_symbols() {
        assert_eq!(Suit::Clubs.to_string(), "c");
        assert_eq!(Suit::Spades.to_string(), "s");
    }

    #[test]
    fn symbols_roundtrip_in_canonical_order() {
        for (i, suit) in Suit::ALL.iter().enumerate() {
            assert_eq!(Suit::from_index(i), Some(*suit));
            assert_eq!(Suit::from_symbol(suit.symbol()), Some(*suit));
        }
        assert_eq!(Suit::from_symbol('x'), None);
    }
}
