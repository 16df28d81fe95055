use uuid::Uuid;

use crate::{
    card::{Card, CardId, Suit},
    player::Seat,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum JudgementReason {
    DelayedTrick,
    Skill,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOp {
    And,
    Or,
}

/// Composable predicate a judgement card is tested against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JudgementRule {
    Suit(Suit),
    RankRange(u8, u8),
    Black,
    Red,
    Composite(Vec<JudgementRule>, CompositeOp),
}

impl JudgementRule {
    pub fn matches(&self, card: &Card) -> bool {
        match self {
            JudgementRule::Suit(suit) => card.suit == *suit,
            JudgementRule::RankRange(lo, hi) => {
                (*lo..=*hi).contains(&card.rank.value())
            }
            JudgementRule::Black => card.suit.is_black(),
            JudgementRule::Red => card.suit.is_red(),
            JudgementRule::Composite(rules, op) => match op {
                CompositeOp::And => rules.iter().all(|rule| rule.matches(card)),
                CompositeOp::Or => rules.iter().any(|rule| rule.matches(card)),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct JudgementRequest {
    pub id: Uuid,
    pub owner: Seat,
    pub reason: JudgementReason,
    /// Card that demanded the judgement, if any (the delayed trick, or the
    /// card backing a skill).
    pub source: Option<CardId>,
    pub rule: JudgementRule,
    /// Whether modify-judgement skills may substitute the revealed card.
    pub allow_modify: bool,
    /// When set the final card is left in the judgement zone for the caller
    /// to relocate (Luoshen keeps black cards).
    pub keep_final_card: bool,
    pub tags: Vec<String>,
}

impl JudgementRequest {
    pub fn new(owner: Seat, reason: JudgementReason, rule: JudgementRule) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            reason,
            source: None,
            rule,
            allow_modify: true,
            keep_final_card: false,
            tags: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: CardId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn allow_modify(mut self, allow: bool) -> Self {
        self.allow_modify = allow;
        self
    }

    pub fn keep_final_card(mut self, keep: bool) -> Self {
        self.keep_final_card = keep;
        self
    }
}

/// Outcome of a judgement, deposited in the scratchpad for the requesting
/// resolver. Cards are stored by value so consumers can inspect suit and
/// rank after the card has moved on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgementResult {
    pub request_id: Uuid,
    pub initial_card: Card,
    pub final_card: Card,
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardSubtype;

    fn card(suit: Suit, rank: u8) -> Card {
        Card::of(1, CardSubtype::Slash, suit, rank)
    }

    #[test]
    fn rank_range_is_inclusive() {
        let rule = JudgementRule::RankRange(2, 9);
        assert!(rule.matches(&card(Suit::Spade, 2)));
        assert!(rule.matches(&card(Suit::Spade, 9)));
        assert!(!rule.matches(&card(Suit::Spade, 10)));
        assert!(!rule.matches(&card(Suit::Spade, 1)));
    }

    #[test]
    fn composite_and_or() {
        let shandian = JudgementRule::Composite(
            vec![
                JudgementRule::Suit(Suit::Spade),
                JudgementRule::RankRange(2, 9),
            ],
            CompositeOp::And,
        );
        assert!(shandian.matches(&card(Suit::Spade, 5)));
        assert!(!shandian.matches(&card(Suit::Club, 5)));
        assert!(!shandian.matches(&card(Suit::Spade, 10)));

        let either = JudgementRule::Composite(
            vec![JudgementRule::Red, JudgementRule::RankRange(1, 1)],
            CompositeOp::Or,
        );
        assert!(either.matches(&card(Suit::Heart, 9)));
        assert!(either.matches(&card(Suit::Spade, 1)));
        assert!(!either.matches(&card(Suit::Spade, 2)));
    }
}
