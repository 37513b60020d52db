use core::fmt;
use serde::{Deserialize, Serialize};

/// Compact participant identifier, also the row index into belief matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seat(u8);

impl Seat {
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index <= u8::MAX as usize {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    pub const fn id(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Team label taken from the rule set's lookup table.
pub type TeamId = u8;

#[cfg(test)]
mod tests {
    use super::Seat;

    #[test]
    fn index_roundtrip() {
        for i in 0..6 {
            let seat = Seat::from_index(i).unwrap();
            assert_eq!(seat.index(), i);
            assert_eq!(seat, Seat::new(i as u8));
        }
        assert_eq!(Seat::from_index(256), None);
    }

    #[test]
    fn display_and_serde() {
        assert_eq!(Seat::new(3).to_string(), "P3");
        assert_eq!(serde_json::to_string(&Seat::new(4)).unwrap(), "4");
    }
}
