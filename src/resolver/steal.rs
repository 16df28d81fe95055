use indexmap::IndexMap;

use crate::{
    card::CardId,
    choices::{ChoiceKind, ChoiceRequest},
    engine::Engine,
    moves::{CardMoveDescriptor, MoveReason},
    player::Seat,
    resolver::{
        discard_played,
        nullification::{NullifiableEffect, Nullification},
        FailureKind, Resolve, ResolutionCtx, ResolutionError, ResolutionResult, Resolver,
    },
    scratchpad::EffectKey,
    zone::{ZoneOwner, ZoneRef},
};

/// Shunshou Qianyang: take a card from an adjacent player's hand,
/// equipment or judgement zone.
#[derive(Debug, Clone)]
pub struct StealUse;

impl Resolve for StealUse {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        let Some(choice) = &ctx.choice else {
            return Err(ResolutionError::new(
                FailureKind::InvalidState,
                "resolution.shunshouqianyang.missingChoice",
            ));
        };
        let Some(&target) = choice.selected_target_seats.first() else {
            return Err(ResolutionError::new(
                FailureKind::InvalidTarget,
                "resolution.shunshouqianyang.missingTarget",
            ));
        };
        let Some(player) = db.game.player(target) else {
            return Err(ResolutionError::new(
                FailureKind::InvalidTarget,
                "resolution.shunshouqianyang.unknownTarget",
            ));
        };
        if target == ctx.source {
            return Err(ResolutionError::new(
                FailureKind::InvalidTarget,
                "resolution.shunshouqianyang.selfTarget",
            ));
        }
        if !player.alive {
            return Err(ResolutionError::new(
                FailureKind::TargetNotAlive,
                "resolution.shunshouqianyang.targetNotAlive",
            ));
        }

        let distance = db.rules.distance(&db.game, ctx.source, target);
        if distance > 1 {
            return Err(ResolutionError::new(
                FailureKind::InvalidTarget,
                "resolution.shunshouqianyang.targetTooFar",
            )
            .with_detail("Distance", distance));
        }

        let candidates = reachable_cards(db, target);
        if candidates.is_empty() {
            return Err(ResolutionError::new(
                FailureKind::InvalidState,
                "resolution.shunshouqianyang.noCards",
            ));
        }

        let request = ChoiceRequest::new(ctx.source, ChoiceKind::SelectCards)
            .with_allowed_cards(candidates.clone());
        let reply = db.request_choice(request)?;
        let Some(&chosen) = reply.selected_card_ids.first() else {
            return Err(ResolutionError::new(
                FailureKind::CardNotFound,
                "resolution.shunshouqianyang.noCardChosen",
            ));
        };
        if !candidates.contains(&chosen) {
            return Err(ResolutionError::new(
                FailureKind::CardNotFound,
                "resolution.shunshouqianyang.cardNotInZones",
            )
            .with_detail("card", chosen));
        }

        discard_played(db, ctx)?;

        db.stack.push(
            Resolver::StealEffect(StealEffect {
                target,
                card: chosen,
            }),
            ctx.clone(),
        );
        db.stack.push(
            Resolver::Nullification(Nullification {
                effect: NullifiableEffect {
                    nullifiable: true,
                    key: EffectKey::Steal,
                    target,
                    causing_card: ctx.action,
                },
            }),
            ctx.clone(),
        );
        Ok(())
    }
}

/// Final move behind the nullification window. The chosen card is a weak
/// reference: by the time this executes it must be re-verified in one of
/// the target's zones and tolerated if gone.
#[derive(Debug, Clone)]
pub struct StealEffect {
    pub target: Seat,
    pub card: CardId,
}

impl Resolve for StealEffect {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        if ctx.scratch.is_nullified(EffectKey::Steal, self.target) {
            db.log.info(
                "ShunshouQianyangNullified",
                format!("theft from {} was nullified", self.target),
            );
            return Ok(());
        }
        if !db.game.is_alive(self.target) {
            db.log.info(
                "ShunshouQianyangSkipped",
                format!("{} died before the theft", self.target),
            );
            return Ok(());
        }
        let Some(from) = locate_in_zones(db, self.target, self.card) else {
            db.log.info(
                "ShunshouQianyangSkipped",
                format!("{} already left {}'s zones", self.card, self.target),
            );
            return Ok(());
        };

        db.move_single(CardMoveDescriptor::single(
            from,
            ZoneRef::hand(ctx.source),
            self.card,
            MoveReason::Steal,
        ))
        .map_err(ResolutionError::exception)?;

        let mut data = IndexMap::default();
        data.insert("card".to_string(), self.card.to_string());
        data.insert("from".to_string(), from.to_string());
        db.log.info_with(
            "ShunshouQianyangEffect",
            format!("{} took {} from {}", ctx.source, self.card, from),
            data,
        );
        Ok(())
    }
}

/// Candidate cards across the target's hand, equipment and judgement zones.
pub(crate) fn reachable_cards(db: &Engine, target: Seat) -> Vec<CardId> {
    let Some(player) = db.game.player(target) else {
        return Vec::new();
    };
    player
        .hand
        .ids()
        .into_iter()
        .chain(player.equipment.ids())
        .chain(player.judgement.ids())
        .collect()
}

pub(crate) fn locate_in_zones(db: &Engine, owner: Seat, card: CardId) -> Option<ZoneRef> {
    let (zone, _) = db.game.find_card(card)?;
    (zone.owner == ZoneOwner::Player(owner)).then_some(zone)
}
