use crate::{
    card::CardId,
    choices::{ChoiceKind, ChoiceRequest},
    engine::Engine,
    moves::{CardMoveDescriptor, MoveReason},
    player::Seat,
    resolver::{
        nullification::{NullifiableEffect, Nullification},
        discard_played,
        steal::{locate_in_zones, reachable_cards},
        FailureKind, Resolve, ResolutionCtx, ResolutionError, ResolutionResult, Resolver,
    },
    scratchpad::EffectKey,
    zone::ZoneRef,
};

/// Guohe Chaiqiao: discard a card from any other player's zones. No
/// distance limit.
#[derive(Debug, Clone)]
pub struct DismantleUse;

impl Resolve for DismantleUse {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        let Some(choice) = &ctx.choice else {
            return Err(ResolutionError::new(
                FailureKind::InvalidState,
                "resolution.guohechaiqiao.missingChoice",
            ));
        };
        let Some(&target) = choice.selected_target_seats.first() else {
            return Err(ResolutionError::new(
                FailureKind::InvalidTarget,
                "resolution.guohechaiqiao.missingTarget",
            ));
        };
        let Some(player) = db.game.player(target) else {
            return Err(ResolutionError::new(
                FailureKind::InvalidTarget,
                "resolution.guohechaiqiao.unknownTarget",
            ));
        };
        if target == ctx.source {
            return Err(ResolutionError::new(
                FailureKind::InvalidTarget,
                "resolution.guohechaiqiao.selfTarget",
            ));
        }
        if !player.alive {
            return Err(ResolutionError::new(
                FailureKind::TargetNotAlive,
                "resolution.guohechaiqiao.targetNotAlive",
            ));
        }

        let candidates = reachable_cards(db, target);
        if candidates.is_empty() {
            return Err(ResolutionError::new(
                FailureKind::InvalidState,
                "resolution.guohechaiqiao.noCards",
            ));
        }

        let request = ChoiceRequest::new(ctx.source, ChoiceKind::SelectCards)
            .with_allowed_cards(candidates.clone());
        let reply = db.request_choice(request)?;
        let Some(&chosen) = reply.selected_card_ids.first() else {
            return Err(ResolutionError::new(
                FailureKind::CardNotFound,
                "resolution.guohechaiqiao.noCardChosen",
            ));
        };
        if !candidates.contains(&chosen) {
            return Err(ResolutionError::new(
                FailureKind::CardNotFound,
                "resolution.guohechaiqiao.cardNotInZones",
            )
            .with_detail("card", chosen));
        }

        discard_played(db, ctx)?;

        db.stack.push(
            Resolver::DismantleEffect(DismantleEffect {
                target,
                card: chosen,
            }),
            ctx.clone(),
        );
        db.stack.push(
            Resolver::Nullification(Nullification {
                effect: NullifiableEffect {
                    nullifiable: true,
                    key: EffectKey::Dismantle,
                    target,
                    causing_card: ctx.action,
                },
            }),
            ctx.clone(),
        );
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DismantleEffect {
    pub target: Seat,
    pub card: CardId,
}

impl Resolve for DismantleEffect {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        if ctx.scratch.is_nullified(EffectKey::Dismantle, self.target) {
            db.log.info(
                "GuoheChaiqiaoNullified",
                format!("dismantling {} was nullified", self.target),
            );
            return Ok(());
        }
        if !db.game.is_alive(self.target) {
            db.log.info(
                "GuoheChaiqiaoSkipped",
                format!("{} died before the discard", self.target),
            );
            return Ok(());
        }
        let Some(from) = locate_in_zones(db, self.target, self.card) else {
            db.log.info(
                "GuoheChaiqiaoSkipped",
                format!("{} already left {}'s zones", self.card, self.target),
            );
            return Ok(());
        };

        db.move_single(CardMoveDescriptor::single(
            from,
            ZoneRef::discard_pile(),
            self.card,
            MoveReason::Discard,
        ))
        .map_err(ResolutionError::exception)?;

        db.log.info(
            "GuoheChaiqiaoEffect",
            format!("{} discarded {} from {}", ctx.source, self.card, from),
        );
        Ok(())
    }
}
