use crate::model::card::Card;
use crate::model::deal::{self, DealError};
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::player::Seat;
use crate::model::suit::Suit;
use crate::model::trick::{Trick, TrickError};
use std::fmt;

pub const TRICKS_PER_ROUND: usize = 5;

/// One dealt round: five tricks, or fewer if a player folds. Owns both
/// hands, the in-progress trick, and the streak accumulator.
#[derive(Debug, Clone)]
pub struct RoundState {
    hands: [Hand; 2],
    current_trick: Trick,
    trick_history: Vec<Trick>,
    starting_control: Seat,
    control: Seat,
    accumulated_points: u32,
    streak_suit: Option<Suit>,
    fold_armed: bool,
    outcome: Option<RoundOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrickSummary {
    pub winner: Seat,
    pub winning_card: Card,
    pub points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub winner: Seat,
    pub points: u32,
    pub folded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played,
    TrickCompleted(TrickSummary),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    RoundOver,
    NotPlayersTurn { expected: Seat, actual: Seat },
    CardNotInHand(Card),
    SuitViolation { required: Suit },
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::RoundOver => write!(f, "the round is already over"),
            PlayError::NotPlayersTurn { expected, actual } => {
                write!(f, "expected {expected} to act but got {actual}")
            }
            PlayError::CardNotInHand(card) => write!(f, "{card} is not in the acting hand"),
            PlayError::SuitViolation { required } => {
                write!(f, "a card of suit {required} must be played")
            }
        }
    }
}

impl std::error::Error for PlayError {}

impl From<TrickError> for PlayError {
    fn from(err: TrickError) -> Self {
        match err {
            TrickError::TrickComplete => PlayError::RoundOver,
            TrickError::OutOfTurn { expected, actual } => {
                PlayError::NotPlayersTurn { expected, actual }
            }
            TrickError::AlreadyPlayed(seat) => PlayError::NotPlayersTurn {
                expected: seat.other(),
                actual: seat,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldError {
    NotPermitted,
}

impl fmt::Display for FoldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoldError::NotPermitted => write!(f, "folding is not permitted right now"),
        }
    }
}

impl std::error::Error for FoldError {}

impl RoundState {
    pub fn deal(stock: &mut Deck, leader: Seat) -> Result<Self, DealError> {
        let hands = deal::deal(stock)?;
        Ok(Self::from_hands(hands, leader))
    }

    pub fn from_hands(hands: [Hand; 2], leader: Seat) -> Self {
        Self {
            hands,
            current_trick: Trick::new(leader),
            trick_history: Vec::new(),
            starting_control: leader,
            control: leader,
            accumulated_points: 0,
            streak_suit: None,
            fold_armed: true,
            outcome: None,
        }
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn trick_history(&self) -> &[Trick] {
        &self.trick_history
    }

    pub fn tricks_played(&self) -> usize {
        self.trick_history.len()
    }

    pub fn starting_control(&self) -> Seat {
        self.starting_control
    }

    pub fn control(&self) -> Seat {
        self.control
    }

    pub fn accumulated_points(&self) -> u32 {
        self.accumulated_points
    }

    pub fn streak_suit(&self) -> Option<Suit> {
        self.streak_suit
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn can_fold(&self) -> bool {
        self.fold_armed && self.outcome.is_none()
    }

    pub fn expected_seat(&self) -> Option<Seat> {
        if self.outcome.is_some() {
            None
        } else {
            Some(self.current_trick.expected_seat())
        }
    }

    pub fn play_card(&mut self, seat: Seat, card: Card) -> Result<PlayOutcome, PlayError> {
        if self.outcome.is_some() {
            return Err(PlayError::RoundOver);
        }

        let expected = self.current_trick.expected_seat();
        if expected != seat {
            return Err(PlayError::NotPlayersTurn {
                expected,
                actual: seat,
            });
        }

        if !self.hands[seat.index()].contains(card) {
            return Err(PlayError::CardNotInHand(card));
        }

        if let Some(required) = self.current_trick.lead_suit() {
            if card.suit != required && self.hands[seat.index()].has_suit(required) {
                return Err(PlayError::SuitViolation { required });
            }
        }

        self.current_trick.play(seat, card)?;
        let _ = self.hands[seat.index()].remove(card);

        if self.current_trick.is_complete() {
            Ok(PlayOutcome::TrickCompleted(self.settle_trick()))
        } else {
            Ok(PlayOutcome::Played)
        }
    }

    /// Ends the round immediately in favor of the other seat for a flat
    /// 1-point award, discarding both hands and the in-progress trick.
    pub fn fold(&mut self, seat: Seat) -> Result<RoundOutcome, FoldError> {
        if !self.can_fold() {
            return Err(FoldError::NotPermitted);
        }

        self.fold_armed = false;
        self.hands = [Hand::new(), Hand::new()];
        self.current_trick = Trick::new(self.control);
        let outcome = RoundOutcome {
            winner: seat.other(),
            points: 1,
            folded: true,
        };
        self.outcome = Some(outcome);
        Ok(outcome)
    }

    fn settle_trick(&mut self) -> TrickSummary {
        let winning = self
            .current_trick
            .winning_play()
            .expect("settling a complete trick");
        let winner = winning.seat;
        let card = winning.card;
        let lead_suit = self
            .current_trick
            .lead_suit()
            .expect("complete trick has a lead suit");

        let control_transfer =
            winner != self.control && card.is_streak_card() && card.suit == lead_suit;

        let points;
        if control_transfer {
            points = 1;
            self.accumulated_points = 0;
        } else if winner == self.control {
            if card.is_streak_card() {
                points = card.base_points();
                if self.streak_suit == Some(card.suit) {
                    // Repeating the streak suit replaces the accumulator
                    // with this trick's points instead of adding to it.
                    self.accumulated_points = points;
                } else {
                    self.accumulated_points += points;
                }
            } else {
                points = 1;
                self.accumulated_points = 0;
            }
        } else {
            points = 1;
            self.accumulated_points = 0;
        }

        if winner != self.control {
            self.streak_suit = None;
        }
        if card.is_streak_card() {
            self.streak_suit = Some(card.suit);
        }

        self.control = winner;
        let finished = std::mem::replace(&mut self.current_trick, Trick::new(winner));
        self.trick_history.push(finished);

        if self.trick_history.len() == TRICKS_PER_ROUND {
            let award = if self.accumulated_points != 0 {
                self.accumulated_points
            } else {
                points
            };
            self.fold_armed = false;
            self.outcome = Some(RoundOutcome {
                winner,
                points: award,
                folded: false,
            });
        }

        TrickSummary {
            winner,
            winning_card: card,
            points,
        }
    }
}
