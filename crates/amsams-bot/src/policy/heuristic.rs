use amsams_core::game::strategy::{Strategy, StrategyContext};
use amsams_core::model::card::Card;
use amsams_core::model::hand::Hand;
use tracing::{Level, event};

/// With this many tricks or fewer left in the round, the bot stops saving
/// its high cards and plays for control of the finish.
const ENDGAME_TRICKS: usize = 2;

/// Rule-based opponent. Stateless; every decision is a pure function of the
/// hand, the lead card, and the tricks remaining.
#[derive(Debug, Default)]
pub struct HeuristicPolicy;

impl HeuristicPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for HeuristicPolicy {
    fn choose_card(&mut self, ctx: &StrategyContext<'_>) -> Card {
        let (card, reason) = decide(ctx.hand, ctx.lead_card, ctx.tricks_remaining);
        log_play_decision(ctx, card, reason);
        card
    }
}

/// Picks the card to play. Never mutates the hand; the caller removes the
/// returned card. The hand must be non-empty.
pub fn choose_card(hand: &Hand, lead_card: Option<Card>, tricks_remaining: usize) -> Card {
    decide(hand, lead_card, tricks_remaining).0
}

fn decide(hand: &Hand, lead_card: Option<Card>, tricks_remaining: usize) -> (Card, &'static str) {
    let endgame = tricks_remaining <= ENDGAME_TRICKS;

    let Some(lead) = lead_card else {
        // Leading: late in the round spend the strong cards to lock in
        // control, otherwise keep them back.
        return if endgame {
            (
                highest(hand.iter().copied()).expect("leading from a non-empty hand"),
                "lead_high_endgame",
            )
        } else {
            (
                lowest(hand.iter().copied()).expect("leading from a non-empty hand"),
                "lead_low_preserve",
            )
        };
    };

    let suited: Vec<Card> = hand
        .iter()
        .copied()
        .filter(|card| card.suit == lead.suit)
        .collect();

    if suited.is_empty() {
        return (
            lowest(hand.iter().copied()).expect("following from a non-empty hand"),
            "discard_lowest",
        );
    }

    let winners: Vec<Card> = suited
        .iter()
        .copied()
        .filter(|card| card.value() > lead.value())
        .collect();

    if winners.is_empty() {
        (
            lowest(suited).expect("suited cards checked non-empty"),
            "follow_low_suited",
        )
    } else if endgame {
        (
            highest(winners).expect("winners checked non-empty"),
            "follow_high_winner",
        )
    } else {
        (
            lowest(winners).expect("winners checked non-empty"),
            "follow_low_winner",
        )
    }
}

/// First card encountered with the minimum value, so equal values break
/// ties toward hand order.
fn lowest(cards: impl IntoIterator<Item = Card>) -> Option<Card> {
    let mut best: Option<Card> = None;
    for card in cards {
        match best {
            Some(current) if card.value() >= current.value() => {}
            _ => best = Some(card),
        }
    }
    best
}

fn highest(cards: impl IntoIterator<Item = Card>) -> Option<Card> {
    let mut best: Option<Card> = None;
    for card in cards {
        match best {
            Some(current) if card.value() <= current.value() => {}
            _ => best = Some(card),
        }
    }
    best
}

fn log_play_decision(ctx: &StrategyContext<'_>, chosen: Card, reason: &'static str) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let lead = ctx
        .lead_card
        .map(|card| card.to_string())
        .unwrap_or_else(|| "none".to_string());

    event!(
        target: "amsams_bot::play",
        Level::DEBUG,
        lead = %lead,
        tricks_remaining = ctx.tricks_remaining,
        hand_size = ctx.hand.len(),
        chosen = %chosen,
        reason,
    );
}

#[cfg(test)]
mod tests {
    use super::{HeuristicPolicy, choose_card};
    use amsams_core::game::strategy::{Strategy, StrategyContext};
    use amsams_core::model::card::Card;
    use amsams_core::model::hand::Hand;
    use amsams_core::model::rank::Rank;
    use amsams_core::model::suit::Suit;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn hand(cards: &[Card]) -> Hand {
        Hand::with_cards(cards.to_vec())
    }

    #[test]
    fn leads_highest_in_the_endgame() {
        let hand = hand(&[card(Rank::Six, Suit::Diamonds), card(Rank::King, Suit::Spades)]);
        assert_eq!(
            choose_card(&hand, None, 1),
            card(Rank::King, Suit::Spades)
        );
    }

    #[test]
    fn leads_lowest_early_to_preserve_strength() {
        let hand = hand(&[
            card(Rank::King, Suit::Spades),
            card(Rank::Six, Suit::Diamonds),
            card(Rank::Jack, Suit::Hearts),
        ]);
        assert_eq!(
            choose_card(&hand, None, 5),
            card(Rank::Six, Suit::Diamonds)
        );
    }

    #[test]
    fn follows_with_the_only_winner() {
        let hand = hand(&[card(Rank::Six, Suit::Hearts), card(Rank::King, Suit::Hearts)]);
        assert_eq!(
            choose_card(&hand, Some(card(Rank::Queen, Suit::Hearts)), 5),
            card(Rank::King, Suit::Hearts)
        );
    }

    #[test]
    fn follows_with_the_lowest_winner_early() {
        let hand = hand(&[
            card(Rank::Six, Suit::Hearts),
            card(Rank::Ten, Suit::Hearts),
            card(Rank::King, Suit::Hearts),
        ]);
        assert_eq!(
            choose_card(&hand, Some(card(Rank::Nine, Suit::Hearts)), 5),
            card(Rank::Ten, Suit::Hearts)
        );
    }

    #[test]
    fn follows_with_the_highest_winner_in_the_endgame() {
        let hand = hand(&[
            card(Rank::Ten, Suit::Hearts),
            card(Rank::King, Suit::Hearts),
        ]);
        assert_eq!(
            choose_card(&hand, Some(card(Rank::Nine, Suit::Hearts)), 2),
            card(Rank::King, Suit::Hearts)
        );
    }

    #[test]
    fn dumps_the_lowest_suited_card_when_it_cannot_win() {
        let hand = hand(&[
            card(Rank::Ten, Suit::Hearts),
            card(Rank::Six, Suit::Hearts),
            card(Rank::Nine, Suit::Spades),
        ]);
        assert_eq!(
            choose_card(&hand, Some(card(Rank::King, Suit::Hearts)), 4),
            card(Rank::Six, Suit::Hearts)
        );
    }

    #[test]
    fn discards_the_lowest_card_when_void_in_the_lead_suit() {
        let hand = hand(&[card(Rank::Nine, Suit::Diamonds), card(Rank::Six, Suit::Clubs)]);
        assert_eq!(
            choose_card(&hand, Some(card(Rank::Queen, Suit::Hearts)), 3),
            card(Rank::Six, Suit::Clubs)
        );
    }

    #[test]
    fn ties_break_toward_hand_order() {
        let hand = hand(&[card(Rank::Eight, Suit::Diamonds), card(Rank::Eight, Suit::Clubs)]);
        assert_eq!(
            choose_card(&hand, None, 5),
            card(Rank::Eight, Suit::Diamonds)
        );
        assert_eq!(
            choose_card(&hand, None, 1),
            card(Rank::Eight, Suit::Diamonds)
        );
    }

    #[test]
    fn choosing_never_mutates_the_hand() {
        let hand = hand(&[card(Rank::Six, Suit::Hearts), card(Rank::King, Suit::Hearts)]);
        let before: Vec<_> = hand.iter().copied().collect();
        let mut policy = HeuristicPolicy::new();
        let ctx = StrategyContext {
            hand: &hand,
            lead_card: Some(card(Rank::Queen, Suit::Hearts)),
            tricks_remaining: 5,
        };
        let chosen = policy.choose_card(&ctx);
        assert!(before.contains(&chosen));
        let after: Vec<_> = hand.iter().copied().collect();
        assert_eq!(before, after);
    }
}
