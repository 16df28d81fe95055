use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{
    card::{Card, CardId},
    player::Seat,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum ZoneKind {
    Hand,
    Equipment,
    Judgement,
    DrawPile,
    DiscardPile,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneOwner {
    #[display(fmt = "{}", _0)]
    Player(Seat),
    #[display(fmt = "Game")]
    Game,
}

/// Address of a zone, used by the card-move service and in events.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display(fmt = "{}.{}", owner, kind)]
pub struct ZoneRef {
    pub owner: ZoneOwner,
    pub kind: ZoneKind,
}

impl ZoneRef {
    pub fn hand(seat: Seat) -> Self {
        Self {
            owner: ZoneOwner::Player(seat),
            kind: ZoneKind::Hand,
        }
    }

    pub fn equipment(seat: Seat) -> Self {
        Self {
            owner: ZoneOwner::Player(seat),
            kind: ZoneKind::Equipment,
        }
    }

    pub fn judgement(seat: Seat) -> Self {
        Self {
            owner: ZoneOwner::Player(seat),
            kind: ZoneKind::Judgement,
        }
    }

    pub fn draw_pile() -> Self {
        Self {
            owner: ZoneOwner::Game,
            kind: ZoneKind::DrawPile,
        }
    }

    pub fn discard_pile() -> Self {
        Self {
            owner: ZoneOwner::Game,
            kind: ZoneKind::DiscardPile,
        }
    }
}

/// An ordered pile of cards. The top of the zone is the end of the vec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub owner: ZoneOwner,
    pub kind: ZoneKind,
    cards: Vec<Card>,
}

impl Zone {
    pub fn new(owner: ZoneOwner, kind: ZoneKind) -> Self {
        Self {
            owner,
            kind,
            cards: Vec::new(),
        }
    }

    pub fn zone_ref(&self) -> ZoneRef {
        ZoneRef {
            owner: self.owner,
            kind: self.kind,
        }
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.cards.iter().any(|card| card.id == id)
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub fn add_top(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn add_bottom(&mut self, card: Card) {
        self.cards.insert(0, card);
    }

    pub fn remove(&mut self, id: CardId) -> Option<Card> {
        let index = self.cards.iter().position(|card| card.id == id)?;
        Some(self.cards.remove(index))
    }

    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn ids(&self) -> Vec<CardId> {
        self.cards.iter().map(|card| card.id).collect()
    }

    /// Drains the zone, bottom-first. Used for shuffling and for emptying a
    /// dead player's zones.
    pub fn take_all(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::card::{CardSubtype, Suit};

    #[test]
    fn top_is_last_added() {
        let mut zone = Zone::new(ZoneOwner::Game, ZoneKind::DrawPile);
        zone.add_top(Card::of(1, CardSubtype::Slash, Suit::Spade, 7));
        zone.add_top(Card::of(2, CardSubtype::Dodge, Suit::Heart, 2));
        assert_eq!(zone.top().map(|card| card.id), Some(CardId(2)));

        zone.add_bottom(Card::of(3, CardSubtype::Peach, Suit::Heart, 3));
        assert_eq!(zone.cards()[0].id, CardId(3));
    }

    #[test]
    fn remove_by_id() {
        let mut zone = Zone::new(ZoneOwner::Player(Seat(0)), ZoneKind::Hand);
        zone.add_top(Card::of(1, CardSubtype::Slash, Suit::Spade, 7));
        zone.add_top(Card::of(2, CardSubtype::Dodge, Suit::Heart, 2));

        let removed = zone.remove(CardId(1)).unwrap();
        assert_eq!(removed.id, CardId(1));
        assert!(!zone.contains(CardId(1)));
        assert_eq!(zone.len(), 1);
        assert!(zone.remove(CardId(1)).is_none());
    }

    #[test]
    fn zone_ref_display() {
        assert_eq!(ZoneRef::hand(Seat(1)).to_string(), "P1.Hand");
        assert_eq!(ZoneRef::draw_pile().to_string(), "Game.DrawPile");
    }
}
