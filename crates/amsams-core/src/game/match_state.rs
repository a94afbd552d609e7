use crate::game::events::GameEvent;
use crate::game::strategy::{Strategy, StrategyContext};
use crate::model::card::Card;
use crate::model::deal::CARDS_PER_DEAL;
use crate::model::deck::Deck;
use crate::model::player::{Player, Seat};
use crate::model::round::{
    FoldError, PlayError, PlayOutcome, RoundOutcome, RoundState, TRICKS_PER_ROUND, TrickSummary,
};
use crate::model::score::ScoreBoard;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;

/// Seat that leads the first round of every match; the lead alternates
/// from round to round afterwards.
const FIRST_LEADER: Seat = Seat::Computer;

/// The engine handle: one match between the two seats, played to a target
/// score. Owns the stock, the current round, the scores, and the event log;
/// all mutation goes through it.
pub struct MatchState {
    players: [Player; 2],
    scores: ScoreBoard,
    target_score: u32,
    round: RoundState,
    stock: Deck,
    round_number: u32,
    round_leader: Seat,
    winner: Option<Seat>,
    strategy: Box<dyn Strategy>,
    events: Vec<GameEvent>,
    rng: StdRng,
    seed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    MatchOver,
    Play(PlayError),
    Fold(FoldError),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchError::MatchOver => write!(f, "the match is already decided"),
            MatchError::Play(err) => err.fmt(f),
            MatchError::Fold(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for MatchError {}

impl From<PlayError> for MatchError {
    fn from(err: PlayError) -> Self {
        MatchError::Play(err)
    }
}

impl From<FoldError> for MatchError {
    fn from(err: FoldError) -> Self {
        MatchError::Fold(err)
    }
}

impl MatchState {
    pub fn new(players: [Player; 2], target_score: u32, strategy: Box<dyn Strategy>) -> Self {
        let seed: u64 = rand::random();
        Self::with_seed(players, target_score, strategy, seed)
    }

    pub fn with_seed(
        players: [Player; 2],
        target_score: u32,
        strategy: Box<dyn Strategy>,
        seed: u64,
    ) -> Self {
        Self::with_seed_and_round(players, target_score, strategy, seed, 1)
    }

    /// Rebuilds a match at the start of `round_number` by replaying the
    /// deal sequence from the seed. Stock consumption is fixed at ten cards
    /// per round dealt, so the stock position is fully reproducible.
    pub fn with_seed_and_round(
        players: [Player; 2],
        target_score: u32,
        strategy: Box<dyn Strategy>,
        seed: u64,
        round_number: u32,
    ) -> Self {
        let round_number = round_number.max(1);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut stock = Deck::shuffled(&mut rng);
        let mut leader = FIRST_LEADER;

        for _ in 1..round_number {
            let _ = deal_round(&mut stock, &mut rng, leader);
            leader = leader.other();
        }

        let (round, _) = deal_round(&mut stock, &mut rng, leader);

        Self {
            players,
            scores: ScoreBoard::new(),
            target_score,
            round,
            stock,
            round_number,
            round_leader: leader,
            winner: None,
            strategy,
            events: Vec::new(),
            rng,
            seed,
        }
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn player(&self, seat: Seat) -> &Player {
        &self.players[seat.index()]
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn scores_mut(&mut self) -> &mut ScoreBoard {
        &mut self.scores
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn stock(&self) -> &Deck {
        &self.stock
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn winner(&self) -> Option<Seat> {
        self.winner
    }

    pub fn can_fold(&self) -> bool {
        self.winner.is_none() && self.round.can_fold()
    }

    pub fn expected_seat(&self) -> Option<Seat> {
        if self.winner.is_some() {
            None
        } else {
            self.round.expected_seat()
        }
    }

    /// Drains the pending event log.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn play_card(
        &mut self,
        seat: Seat,
        card: Card,
    ) -> Result<Option<TrickSummary>, MatchError> {
        if self.winner.is_some() {
            return Err(MatchError::MatchOver);
        }

        let outcome = self.round.play_card(seat, card)?;
        self.events.push(GameEvent::CardPlayed { seat, card });

        match outcome {
            PlayOutcome::Played => Ok(None),
            PlayOutcome::TrickCompleted(summary) => {
                self.events.push(GameEvent::TrickResolved {
                    winner: summary.winner,
                    winning_card: summary.winning_card,
                    points: summary.points,
                });
                if let Some(round_outcome) = self.round.outcome() {
                    self.settle_round(round_outcome);
                }
                Ok(Some(summary))
            }
        }
    }

    /// Asks the strategy for the computer's play and submits it. Errors if
    /// it is not the computer's turn.
    pub fn run_ai_turn(&mut self) -> Result<Option<TrickSummary>, MatchError> {
        if self.winner.is_some() {
            return Err(MatchError::MatchOver);
        }

        let Some(expected) = self.round.expected_seat() else {
            return Err(MatchError::MatchOver);
        };
        if expected != Seat::Computer {
            return Err(MatchError::Play(PlayError::NotPlayersTurn {
                expected,
                actual: Seat::Computer,
            }));
        }

        let ctx = StrategyContext {
            hand: self.round.hand(Seat::Computer),
            lead_card: self.round.current_trick().lead_card(),
            tricks_remaining: TRICKS_PER_ROUND - self.round.tricks_played(),
        };
        let card = self.strategy.choose_card(&ctx);
        self.play_card(Seat::Computer, card)
    }

    pub fn fold(&mut self, seat: Seat) -> Result<RoundOutcome, MatchError> {
        if self.winner.is_some() {
            return Err(MatchError::MatchOver);
        }

        let outcome = self.round.fold(seat)?;
        self.events.push(GameEvent::Folded { seat });
        self.settle_round(outcome);
        Ok(outcome)
    }

    fn settle_round(&mut self, outcome: RoundOutcome) {
        self.scores.add_points(outcome.winner, outcome.points);
        self.events.push(GameEvent::RoundEnded {
            round: self.round_number,
            winner: outcome.winner,
            points: outcome.points,
        });

        if let Some(winner) = self.scores.reached(self.target_score) {
            self.winner = Some(winner);
            self.events.push(GameEvent::MatchEnded { winner });
            return;
        }

        self.round_number += 1;
        self.round_leader = self.round_leader.other();
        let (round, reshuffled) = deal_round(&mut self.stock, &mut self.rng, self.round_leader);
        if reshuffled {
            self.events.push(GameEvent::DeckReshuffled);
        }
        self.round = round;
    }
}

/// Deals the next round, rebuilding a freshly shuffled deck first when the
/// stock cannot cover a full deal. Returns the round and whether a rebuild
/// happened.
fn deal_round(stock: &mut Deck, rng: &mut StdRng, leader: Seat) -> (RoundState, bool) {
    let mut reshuffled = false;
    if stock.len() < CARDS_PER_DEAL {
        *stock = Deck::shuffled(rng);
        reshuffled = true;
    }
    let round = RoundState::deal(stock, leader).expect("stock covers a full deal after rebuild");
    (round, reshuffled)
}

#[cfg(test)]
mod tests {
    use super::{MatchError, MatchState};
    use crate::game::events::GameEvent;
    use crate::game::strategy::{Strategy, StrategyContext};
    use crate::model::card::Card;
    use crate::model::deck::DECK_SIZE;
    use crate::model::player::{Player, Seat};
    use crate::model::round::PlayError;

    struct FirstLegal;

    impl Strategy for FirstLegal {
        fn choose_card(&mut self, ctx: &StrategyContext<'_>) -> Card {
            if let Some(lead) = ctx.lead_card {
                if let Some(card) = ctx.hand.iter().copied().find(|c| c.suit == lead.suit) {
                    return card;
                }
            }
            ctx.hand.cards()[0]
        }
    }

    fn new_match(target_score: u32, seed: u64) -> MatchState {
        MatchState::with_seed(
            [
                Player::new(Seat::Computer, "Computer"),
                Player::new(Seat::Human, "You"),
            ],
            target_score,
            Box::new(FirstLegal),
            seed,
        )
    }

    fn human_pick(state: &MatchState) -> Card {
        let hand = state.round().hand(Seat::Human);
        if let Some(lead) = state.round().current_trick().lead_card() {
            if let Some(card) = hand.iter().copied().find(|c| c.suit == lead.suit) {
                return card;
            }
        }
        hand.cards()[0]
    }

    fn play_round(state: &mut MatchState) {
        let starting_round = state.round_number();
        while state.winner().is_none() && state.round_number() == starting_round {
            match state.expected_seat().unwrap() {
                Seat::Computer => {
                    state.run_ai_turn().unwrap();
                }
                Seat::Human => {
                    let card = human_pick(state);
                    state.play_card(Seat::Human, card).unwrap();
                }
            }
        }
    }

    #[test]
    fn first_round_is_dealt_with_computer_on_lead() {
        let state = new_match(10, 42);
        assert_eq!(state.round_number(), 1);
        assert_eq!(state.seed(), 42);
        assert_eq!(state.round().hand(Seat::Computer).len(), 5);
        assert_eq!(state.round().hand(Seat::Human).len(), 5);
        assert_eq!(state.stock().len(), DECK_SIZE - 10);
        assert_eq!(state.expected_seat(), Some(Seat::Computer));
        assert_eq!(state.winner(), None);
        assert!(state.can_fold());
    }

    #[test]
    fn run_ai_turn_is_rejected_when_it_is_not_the_computers_turn() {
        let mut state = new_match(10, 42);
        state.run_ai_turn().unwrap();
        let err = state.run_ai_turn().unwrap_err();
        assert_eq!(
            err,
            MatchError::Play(PlayError::NotPlayersTurn {
                expected: Seat::Human,
                actual: Seat::Computer,
            })
        );
    }

    #[test]
    fn playing_a_card_emits_an_event() {
        let mut state = new_match(10, 7);
        state.run_ai_turn().unwrap();
        let events = state.take_events();
        assert!(matches!(
            events.as_slice(),
            [GameEvent::CardPlayed {
                seat: Seat::Computer,
                ..
            }]
        ));
        assert!(state.events().is_empty());
    }

    #[test]
    fn match_ends_once_the_target_is_reached() {
        let mut state = new_match(1, 99);
        play_round(&mut state);
        let winner = state.winner().expect("one-point target ends after round 1");

        let err = state.run_ai_turn().unwrap_err();
        assert_eq!(err, MatchError::MatchOver);
        let any_card = Card::new(
            crate::model::rank::Rank::Six,
            crate::model::suit::Suit::Clubs,
        );
        assert_eq!(
            state.play_card(winner, any_card).unwrap_err(),
            MatchError::MatchOver
        );
        assert_eq!(state.fold(winner).unwrap_err(), MatchError::MatchOver);
        assert!(state.events().iter().any(|event| matches!(
            event,
            GameEvent::MatchEnded { winner: w } if *w == winner
        )));
    }

    #[test]
    fn fold_awards_the_other_seat_and_rotates_the_lead() {
        let mut state = new_match(10, 5);
        let outcome = state.fold(Seat::Human).unwrap();
        assert_eq!(outcome.winner, Seat::Computer);
        assert_eq!(outcome.points, 1);
        assert_eq!(state.scores().score(Seat::Computer), 1);
        assert_eq!(state.round_number(), 2);
        assert_eq!(state.round().starting_control(), Seat::Human);
        assert!(state.can_fold());
    }

    #[test]
    fn stock_is_rebuilt_when_a_full_deal_no_longer_fits() {
        let mut state = new_match(50, 13);
        // Rounds 1-3 drain the stock to 2 cards; round 4 forces a rebuild.
        state.fold(Seat::Human).unwrap();
        state.fold(Seat::Human).unwrap();
        assert_eq!(state.stock().len(), 2);
        state.fold(Seat::Human).unwrap();
        assert_eq!(state.round_number(), 4);
        assert_eq!(state.stock().len(), DECK_SIZE - 10);
        assert!(
            state
                .events()
                .iter()
                .any(|event| matches!(event, GameEvent::DeckReshuffled))
        );
    }

    #[test]
    fn same_seed_replays_the_same_match() {
        let mut a = new_match(3, 1234);
        let mut b = new_match(3, 1234);
        while a.winner().is_none() {
            play_round(&mut a);
        }
        while b.winner().is_none() {
            play_round(&mut b);
        }
        assert_eq!(a.winner(), b.winner());
        assert_eq!(a.scores().standings(), b.scores().standings());
        assert_eq!(a.round_number(), b.round_number());
    }
}
