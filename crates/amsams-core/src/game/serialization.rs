use super::match_state::MatchState;
use crate::game::strategy::Strategy;
use crate::model::player::{Player, Seat};
use serde::{Deserialize, Serialize};

/// Resumable description of a match at a round boundary. Hands and the
/// stock are not stored: `restore` replays the deal sequence from the seed,
/// which consumes a fixed ten cards per round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSnapshot {
    pub seed: u64,
    pub round_number: u32,
    pub target_score: u32,
    pub scores: [u32; 2],
    pub names: [String; 2],
}

impl MatchSnapshot {
    pub fn capture(state: &MatchState) -> Self {
        MatchSnapshot {
            seed: state.seed(),
            round_number: state.round_number(),
            target_score: state.target_score(),
            scores: *state.scores().standings(),
            names: [
                state.player(Seat::Computer).name.clone(),
                state.player(Seat::Human).name.clone(),
            ],
        }
    }

    pub fn restore(self, strategy: Box<dyn Strategy>) -> MatchState {
        let [computer, human] = self.names;
        let players = [
            Player::new(Seat::Computer, computer),
            Player::new(Seat::Human, human),
        ];
        let mut state = MatchState::with_seed_and_round(
            players,
            self.target_score,
            strategy,
            self.seed,
            self.round_number,
        );
        state.scores_mut().set_totals(self.scores);
        state
    }

    pub fn to_json(state: &MatchState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
