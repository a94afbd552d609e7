use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn value(self) -> u8 {
        self.rank.value()
    }

    pub const fn is_streak_card(self) -> bool {
        self.rank.is_streak()
    }

    /// Points a trick is worth when the controlling player wins it with this
    /// card: 3 for a six, 2 for a seven, 1 for everything else.
    pub const fn base_points(self) -> u32 {
        match self.rank {
            Rank::Six => 3,
            Rank::Seven => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}
