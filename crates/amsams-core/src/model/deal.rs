use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::player::Seat;
use std::fmt;

pub const HAND_SIZE: usize = 5;
pub const CARDS_PER_DEAL: usize = HAND_SIZE * 2;

const FIRST_PASS: usize = 3;
const SECOND_PASS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealError {
    /// The stock cannot cover a full two-hand deal. The dealer refuses to
    /// start rather than produce short hands; the match layer rebuilds the
    /// deck and retries.
    StockExhausted { available: usize },
}

impl fmt::Display for DealError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DealError::StockExhausted { available } => write!(
                f,
                "stock holds {available} cards but a full deal needs {CARDS_PER_DEAL}"
            ),
        }
    }
}

impl std::error::Error for DealError {}

/// Deals both hands from the top of the stock: three cards to each seat in
/// seat order, then two more to each seat in seat order.
pub fn deal(stock: &mut Deck) -> Result<[Hand; 2], DealError> {
    if stock.len() < CARDS_PER_DEAL {
        return Err(DealError::StockExhausted {
            available: stock.len(),
        });
    }

    let mut hands = [Hand::new(), Hand::new()];
    for pass in [FIRST_PASS, SECOND_PASS] {
        for seat in Seat::BOTH.iter().copied() {
            for _ in 0..pass {
                let card = stock.draw().expect("stock length checked above");
                hands[seat.index()].add(card);
            }
        }
    }

    Ok(hands)
}
