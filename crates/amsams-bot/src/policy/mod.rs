mod heuristic;

pub use heuristic::{HeuristicPolicy, choose_card};
