use crate::model::card::Card;
use crate::model::hand::Hand;

/// Snapshot handed to a strategy when the engine asks for a play. The hand
/// is always non-empty and the strategy must return a card from it; the
/// engine removes the card afterwards.
pub struct StrategyContext<'a> {
    pub hand: &'a Hand,
    pub lead_card: Option<Card>,
    pub tricks_remaining: usize,
}

/// Decision seam for the computer-controlled seat.
pub trait Strategy: Send {
    fn choose_card(&mut self, ctx: &StrategyContext<'_>) -> Card;
}
