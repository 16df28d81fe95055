//! The card-move service: sole mutator of zone membership. A move either
//! fully succeeds (removed from source, added to destination, `CardMoved`
//! published per card) or returns an error leaving both zones unchanged.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    card::CardId,
    engine::Engine,
    events::GameEvent,
    zone::{ZoneKind, ZoneOwner, ZoneRef},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum MoveReason {
    Draw,
    Play,
    Discard,
    Judgement,
    Equip,
    Skill,
    Steal,
    Transfer,
    DelayedTrickMigration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOrdering {
    ToTop,
    ToBottom,
}

#[derive(Debug, Clone)]
pub struct CardMoveDescriptor {
    pub from: ZoneRef,
    pub to: ZoneRef,
    pub cards: Vec<CardId>,
    pub reason: MoveReason,
    pub ordering: MoveOrdering,
}

impl CardMoveDescriptor {
    pub fn single(from: ZoneRef, to: ZoneRef, card: CardId, reason: MoveReason) -> Self {
        Self {
            from,
            to,
            cards: vec![card],
            reason,
            ordering: MoveOrdering::ToTop,
        }
    }
}

impl Engine {
    pub fn move_single(&mut self, descriptor: CardMoveDescriptor) -> Result<()> {
        let CardMoveDescriptor {
            from,
            to,
            cards,
            reason,
            ordering,
        } = descriptor;

        if cards.is_empty() {
            return Ok(());
        }

        let source = self
            .game
            .zone(&from)
            .with_context(|| format!("unknown source zone {}", from))?;
        for &card in cards.iter() {
            if !source.contains(card) {
                bail!("card {} is not in {}", card, from);
            }
        }
        self.game
            .zone(&to)
            .with_context(|| format!("unknown target zone {}", to))?;

        for card in cards {
            // Equipment hooks detach before the card leaves its zone and
            // attach after it lands. Hooks must not relocate cards.
            if from.kind == ZoneKind::Equipment {
                if let ZoneOwner::Player(owner) = from.owner {
                    if let Some(equipped) = self.game.zone(&from).and_then(|zone| zone.get(card)) {
                        let equipped = equipped.clone();
                        self.skills.detach(&mut self.game, owner, &equipped);
                    }
                }
            }

            let Some(moved) = self
                .game
                .zone_mut(&from)
                .and_then(|zone| zone.remove(card))
            else {
                bail!("card {} vanished from {} mid-move", card, from);
            };

            let landed = moved.clone();
            let target = self
                .game
                .zone_mut(&to)
                .with_context(|| format!("unknown target zone {}", to))?;
            match ordering {
                MoveOrdering::ToTop => target.add_top(moved),
                MoveOrdering::ToBottom => target.add_bottom(moved),
            }

            if to.kind == ZoneKind::Equipment {
                if let ZoneOwner::Player(owner) = to.owner {
                    self.skills.attach(&mut self.game, owner, &landed);
                }
            }

            self.publish(GameEvent::CardMoved {
                card,
                from,
                to,
                reason,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        _tests::{engine_with, give_hand},
        card::{Card, CardSubtype, Suit},
        player::Seat,
    };

    #[test]
    fn a_missing_card_aborts_the_whole_move() {
        let (mut db, _script) = engine_with(2);
        let held = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Slash, Suit::Spade, 5));

        let result = db.move_single(CardMoveDescriptor {
            from: ZoneRef::hand(Seat(0)),
            to: ZoneRef::discard_pile(),
            cards: vec![held, CardId(99)],
            reason: MoveReason::Discard,
            ordering: MoveOrdering::ToTop,
        });

        assert!(result.is_err());
        assert!(db.game.player(Seat(0)).unwrap().hand.contains(held));
        assert!(db.game.discard_pile.is_empty());
        assert!(db.events.history().is_empty());
    }

    #[test]
    fn every_completed_move_announces_itself() {
        let (mut db, _script) = engine_with(2);
        let held = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Slash, Suit::Spade, 5));

        db.move_single(CardMoveDescriptor::single(
            ZoneRef::hand(Seat(0)),
            ZoneRef::discard_pile(),
            held,
            MoveReason::Discard,
        ))
        .unwrap();

        assert_eq!(
            db.events.count_matching(|event| matches!(
                event,
                GameEvent::CardMoved {
                    reason: MoveReason::Discard,
                    ..
                }
            )),
            1
        );
        db.game.validate_zones().unwrap();
    }
}
