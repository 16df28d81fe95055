use crate::{
    engine::Engine,
    events::GameEvent,
    judgement::{JudgementRequest, JudgementResult},
    moves::{CardMoveDescriptor, MoveReason},
    resolver::{Resolve, ResolutionCtx, ResolutionError, ResolutionResult},
    zone::ZoneRef,
};

/// Reveals the top card of the draw pile into the judge owner's judgement
/// zone, lets modify-judgement skills substitute it, evaluates the rule and
/// deposits the result. Unless the request keeps the final card, it ends up
/// in the discard pile.
#[derive(Debug, Clone)]
pub struct Judgement {
    pub request: JudgementRequest,
}

impl Resolve for Judgement {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        let request = &self.request;
        let owner = request.owner;

        if !db.game.is_alive(owner) {
            db.log
                .info("JudgementSkipped", format!("{} is not alive", owner));
            return Ok(());
        }
        let Some(revealed) = db.game.draw_pile.top().map(|card| card.id) else {
            db.log
                .warn("DrawPileExhausted", "no card left to reveal for judgement");
            return Ok(());
        };

        db.move_single(CardMoveDescriptor::single(
            ZoneRef::draw_pile(),
            ZoneRef::judgement(owner),
            revealed,
            MoveReason::Judgement,
        ))
        .map_err(ResolutionError::exception)?;

        db.publish(GameEvent::BeforeJudgement {
            request_id: request.id,
            owner,
        });

        let Some(initial) = db
            .game
            .zone(&ZoneRef::judgement(owner))
            .and_then(|zone| zone.get(revealed))
            .cloned()
        else {
            // A subscriber moved the revealed card away; treat the
            // judgement as void.
            db.log.warn("JudgementVoided", "revealed card left the zone");
            return Ok(());
        };
        let mut current = initial.clone();

        if request.allow_modify {
            if let Some(substitution) =
                db.skills.propose_judgement(&db.game, request, &current)
            {
                let held = db
                    .game
                    .player(substitution.player)
                    .map(|player| player.hand.contains(substitution.replacement))
                    .unwrap_or(false);
                if held {
                    db.move_single(CardMoveDescriptor::single(
                        ZoneRef::judgement(owner),
                        ZoneRef::discard_pile(),
                        current.id,
                        MoveReason::Judgement,
                    ))
                    .map_err(ResolutionError::exception)?;
                    db.move_single(CardMoveDescriptor::single(
                        ZoneRef::hand(substitution.player),
                        ZoneRef::judgement(owner),
                        substitution.replacement,
                        MoveReason::Judgement,
                    ))
                    .map_err(ResolutionError::exception)?;
                    if let Some(card) = db
                        .game
                        .zone(&ZoneRef::judgement(owner))
                        .and_then(|zone| zone.get(substitution.replacement))
                    {
                        current = card.clone();
                    }
                    db.log.info(
                        "JudgementModified",
                        format!(
                            "{} replaced the judgement card with {}",
                            substitution.player, substitution.replacement
                        ),
                    );
                } else {
                    db.log.warn(
                        "JudgementModifySkipped",
                        "proposed replacement is not in the player's hand",
                    );
                }
            }
        }

        let success = request.rule.matches(&current);
        ctx.scratch.set_judgement(JudgementResult {
            request_id: request.id,
            initial_card: initial,
            final_card: current.clone(),
            success,
        });

        db.publish(GameEvent::AfterJudgement {
            request_id: request.id,
            owner,
            success,
        });

        if !request.keep_final_card {
            db.move_single(CardMoveDescriptor::single(
                ZoneRef::judgement(owner),
                ZoneRef::discard_pile(),
                current.id,
                MoveReason::Judgement,
            ))
            .map_err(ResolutionError::exception)?;
        }
        Ok(())
    }
}
