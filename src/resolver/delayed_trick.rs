use crate::{
    card::{CardId, CardSubtype, CardType, Suit},
    engine::Engine,
    judgement::{CompositeOp, JudgementReason, JudgementRequest, JudgementRule},
    moves::{CardMoveDescriptor, MoveReason},
    player::{PlayerFlag, Seat},
    resolver::{
        damage::{Damage, DamageDescriptor, DamageType},
        judgement::Judgement,
        nullification::{NullifiableEffect, Nullification},
        Resolve, ResolutionCtx, ResolutionError, ResolutionResult, Resolver,
    },
    scratchpad::EffectKey,
    zone::ZoneRef,
};

/// Judgement rule a delayed trick succeeds against.
fn judgement_rule(subtype: CardSubtype) -> Option<JudgementRule> {
    match subtype {
        CardSubtype::Lebusishu => Some(JudgementRule::Suit(Suit::Heart)),
        CardSubtype::Shandian => Some(JudgementRule::Composite(
            vec![
                JudgementRule::Suit(Suit::Spade),
                JudgementRule::RankRange(2, 9),
            ],
            CompositeOp::And,
        )),
        _ => None,
    }
}

/// Judgement-phase loop: fires the owner's topmost delayed trick and
/// re-checks for the next one after that resolution finishes. Every
/// resolution path removes the card from the owner's zone, so the loop
/// terminates.
#[derive(Debug, Clone)]
pub struct DelayedTrickPhase {
    pub owner: Seat,
}

impl Resolve for DelayedTrickPhase {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        if !db.game.is_alive(self.owner) {
            return Ok(());
        }
        let Some(card) = db.game.player(self.owner).and_then(|player| {
            player
                .judgement
                .cards()
                .iter()
                .rev()
                .find(|card| card.card_type == CardType::DelayedTrick)
                .map(|card| card.id)
        }) else {
            return Ok(());
        };

        db.stack.push(
            Resolver::DelayedTrickPhase(DelayedTrickPhase { owner: self.owner }),
            ctx.clone(),
        );
        db.stack.push(
            Resolver::DelayedTrickResolve(DelayedTrickResolve {
                owner: self.owner,
                card,
            }),
            ctx.clone(),
        );
        Ok(())
    }
}

/// Opens the nullification window for one delayed trick about to fire.
#[derive(Debug, Clone)]
pub struct DelayedTrickResolve {
    pub owner: Seat,
    pub card: CardId,
}

impl Resolve for DelayedTrickResolve {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        let present = db
            .game
            .player(self.owner)
            .map(|player| player.judgement.contains(self.card))
            .unwrap_or(false);
        if !present {
            db.log.info(
                "DelayedTrickSkipped",
                format!("{} is no longer in {}'s judgement zone", self.card, self.owner),
            );
            return Ok(());
        }

        db.stack.push(
            Resolver::DelayedTrickJudge(DelayedTrickJudge {
                owner: self.owner,
                card: self.card,
            }),
            ctx.clone(),
        );
        db.stack.push(
            Resolver::Nullification(Nullification {
                effect: NullifiableEffect {
                    nullifiable: true,
                    key: EffectKey::DelayedTrick,
                    target: self.owner,
                    causing_card: Some(self.card),
                },
            }),
            ctx.clone(),
        );
        Ok(())
    }
}

/// Runs the judgement unless the trick was nullified away.
#[derive(Debug, Clone)]
pub struct DelayedTrickJudge {
    pub owner: Seat,
    pub card: CardId,
}

impl Resolve for DelayedTrickJudge {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        if ctx.scratch.is_nullified(EffectKey::DelayedTrick, self.owner) {
            discard_trick(db, self.owner, self.card)?;
            db.log.info(
                "DelayedTrickNullified",
                format!("{} fizzled for {}", self.card, self.owner),
            );
            return Ok(());
        }

        let subtype = db
            .game
            .player(self.owner)
            .and_then(|player| player.judgement.get(self.card))
            .map(|card| card.subtype);
        let Some(rule) = subtype.and_then(judgement_rule) else {
            discard_trick(db, self.owner, self.card)?;
            db.log
                .warn("DelayedTrickUnknown", "card has no judgement binding");
            return Ok(());
        };

        let request = JudgementRequest::new(self.owner, JudgementReason::DelayedTrick, rule)
            .with_source(self.card);
        db.stack.push(
            Resolver::DelayedTrickOutcome(DelayedTrickOutcome {
                owner: self.owner,
                card: self.card,
            }),
            ctx.clone(),
        );
        db.stack
            .push(Resolver::Judgement(Judgement { request }), ctx.clone());
        Ok(())
    }
}

/// Couples the judgement outcome to the card's success/failure effects and
/// migrates or discards the trick card.
#[derive(Debug, Clone)]
pub struct DelayedTrickOutcome {
    pub owner: Seat,
    pub card: CardId,
}

impl Resolve for DelayedTrickOutcome {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        let Some(result) = ctx.scratch.take_judgement() else {
            // Exhausted draw pile; the trick leaves play without firing.
            discard_trick(db, self.owner, self.card)?;
            db.log
                .warn("DelayedTrickVoided", "judgement produced no result");
            return Ok(());
        };

        let subtype = db
            .game
            .player(self.owner)
            .and_then(|player| player.judgement.get(self.card))
            .map(|card| card.subtype);
        match subtype {
            Some(CardSubtype::Lebusishu) => {
                if !result.success {
                    if let Some(player) = db.game.player_mut(self.owner) {
                        player.set_flag(PlayerFlag::SkipPlayPhase, true);
                    }
                    db.log.info(
                        "LebusishuEffect",
                        format!("{} skips the play phase", self.owner),
                    );
                }
                discard_trick(db, self.owner, self.card)
            }
            Some(CardSubtype::Shandian) => {
                if result.success {
                    discard_trick(db, self.owner, self.card)?;
                    let damage =
                        DamageDescriptor::new(None, self.owner, 3, DamageType::Thunder)
                            .reason("Shandian");
                    db.stack
                        .push(Resolver::Damage(Damage), ctx.with_damage(damage));
                    Ok(())
                } else {
                    migrate_shandian(db, self.owner, self.card)
                }
            }
            _ => discard_trick(db, self.owner, self.card),
        }
    }
}

fn discard_trick(db: &mut Engine, owner: Seat, card: CardId) -> ResolutionResult {
    let present = db
        .game
        .player(owner)
        .map(|player| player.judgement.contains(card))
        .unwrap_or(false);
    if !present {
        return Ok(());
    }
    db.move_single(CardMoveDescriptor::single(
        ZoneRef::judgement(owner),
        ZoneRef::discard_pile(),
        card,
        MoveReason::Discard,
    ))
    .map_err(ResolutionError::exception)
}

/// A dormant Shandian wanders to the next alive player's judgement zone;
/// with nobody left to pass it to it is discarded.
fn migrate_shandian(db: &mut Engine, owner: Seat, card: CardId) -> ResolutionResult {
    match db.game.next_alive_after(owner) {
        Some(next) if next != owner => {
            db.move_single(CardMoveDescriptor::single(
                ZoneRef::judgement(owner),
                ZoneRef::judgement(next),
                card,
                MoveReason::DelayedTrickMigration,
            ))
            .map_err(ResolutionError::exception)?;
            db.log.info(
                "ShandianMigrated",
                format!("{} moved from {} to {}", card, owner, next),
            );
            Ok(())
        }
        _ => discard_trick(db, owner, card),
    }
}
