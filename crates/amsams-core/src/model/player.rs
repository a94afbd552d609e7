use core::fmt;
use serde::{Deserialize, Serialize};

/// Stable identity of the two participants. Seats are never reused within a
/// match: seat 0 is the computer-controlled player, seat 1 the human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Seat {
    Computer = 0,
    Human = 1,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::Computer, Seat::Human];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::Computer),
            1 => Some(Seat::Human),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn other(self) -> Seat {
        match self {
            Seat::Computer => Seat::Human,
            Seat::Human => Seat::Computer,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Seat::Computer => "Computer",
            Seat::Human => "Human",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub seat: Seat,
    pub name: String,
}

impl Player {
    pub fn new(seat: Seat, name: impl Into<String>) -> Self {
        Self {
            seat,
            name: name.into(),
        }
    }
}
