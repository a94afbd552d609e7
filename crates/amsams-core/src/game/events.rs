use crate::model::card::Card;
use crate::model::player::Seat;
use serde::{Deserialize, Serialize};

/// Notifications a presentation layer reacts to. The engine appends them
/// the instant the state change happens and never waits on a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    CardPlayed {
        seat: Seat,
        card: Card,
    },
    TrickResolved {
        winner: Seat,
        winning_card: Card,
        points: u32,
    },
    RoundEnded {
        round: u32,
        winner: Seat,
        points: u32,
    },
    DeckReshuffled,
    Folded {
        seat: Seat,
    },
    MatchEnded {
        winner: Seat,
    },
}
