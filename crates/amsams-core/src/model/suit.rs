use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Diamonds = 0,
    Spades = 1,
    Hearts = 2,
    Clubs = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Diamonds, Suit::Spades, Suit::Hearts, Suit::Clubs];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Diamonds),
            1 => Some(Suit::Spades),
            2 => Some(Suit::Hearts),
            3 => Some(Suit::Clubs),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Suit::Diamonds => "D",
            Suit::Spades => "S",
            Suit::Hearts => "H",
            Suit::Clubs => "C",
        };
        f.write_str(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::Suit;

    #[test]
    fn display_returns_ascii_symbols() {
        assert_eq!(Suit::Diamonds.to_string(), "D");
        assert_eq!(Suit::Clubs.to_string(), "C");
    }

    #[test]
    fn from_index_maps_valid_values() {
        assert_eq!(Suit::from_index(1), Some(Suit::Spades));
        assert_eq!(Suit::from_index(4), None);
    }

    #[test]
    fn index_roundtrip() {
        for (i, suit) in Suit::ALL.iter().enumerate() {
            assert_eq!(Suit::from_index(i), Some(*suit));
            assert_eq!(suit.index(), i);
        }
    }
}
