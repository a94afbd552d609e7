use crate::model::card::Card;
use crate::model::player::Seat;
use std::fmt;

/// One exchange of exactly two plays: the leader's card and the follower's.
#[derive(Debug, Clone)]
pub struct Trick {
    leader: Seat,
    plays: Vec<Play>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Play {
    pub seat: Seat,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrickError {
    TrickComplete,
    OutOfTurn { expected: Seat, actual: Seat },
    AlreadyPlayed(Seat),
}

impl fmt::Display for TrickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrickError::TrickComplete => write!(f, "trick already complete"),
            TrickError::OutOfTurn { expected, actual } => {
                write!(f, "expected {expected} to play next but got {actual}")
            }
            TrickError::AlreadyPlayed(seat) => {
                write!(f, "{seat} has already played this trick")
            }
        }
    }
}

impl std::error::Error for TrickError {}

impl Trick {
    pub fn new(leader: Seat) -> Self {
        Self {
            leader,
            plays: Vec::with_capacity(2),
        }
    }

    pub fn leader(&self) -> Seat {
        self.leader
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == 2
    }

    pub fn lead_card(&self) -> Option<Card> {
        self.plays.first().map(|play| play.card)
    }

    pub fn lead_suit(&self) -> Option<crate::model::suit::Suit> {
        self.lead_card().map(|card| card.suit)
    }

    pub fn expected_seat(&self) -> Seat {
        self.plays
            .last()
            .map(|play| play.seat.other())
            .unwrap_or(self.leader)
    }

    pub fn play(&mut self, seat: Seat, card: Card) -> Result<(), TrickError> {
        if self.is_complete() {
            return Err(TrickError::TrickComplete);
        }

        if self.plays.iter().any(|play| play.seat == seat) {
            return Err(TrickError::AlreadyPlayed(seat));
        }

        let expected = self.expected_seat();
        if expected != seat {
            return Err(TrickError::OutOfTurn {
                expected,
                actual: seat,
            });
        }

        self.plays.push(Play { seat, card });
        Ok(())
    }

    /// The follower wins only by beating the lead card in the lead suit; a
    /// higher card of any other suit still loses.
    pub fn winning_play(&self) -> Option<Play> {
        if !self.is_complete() {
            return None;
        }
        let lead = self.plays[0];
        let follow = self.plays[1];
        if follow.card.suit == lead.card.suit && follow.card.value() > lead.card.value() {
            Some(follow)
        } else {
            Some(lead)
        }
    }
}
