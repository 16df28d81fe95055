use crate::{
    choices::{ChoiceKind, ChoiceRequest},
    engine::Engine,
    judgement::{JudgementReason, JudgementRequest, JudgementRule},
    moves::{CardMoveDescriptor, MoveReason},
    player::Seat,
    resolver::{
        judgement::Judgement, Resolve, ResolutionCtx, ResolutionError, ResolutionResult,
        Resolver,
    },
    zone::ZoneRef,
};

/// Luoshen: judge; keep black cards and go again while the player is
/// willing and the draw pile holds out, stop on the first red card.
/// Expressed as a loop/handler pair so the judgement runs between them.
#[derive(Debug, Clone)]
pub struct LuoshenLoop {
    pub player: Seat,
}

impl Resolve for LuoshenLoop {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        if !db.game.is_alive(self.player) {
            return Ok(());
        }
        if db.game.draw_pile.is_empty() {
            db.log
                .warn("DrawPileExhausted", "no card left for the judgement");
            return Ok(());
        }

        let request =
            JudgementRequest::new(self.player, JudgementReason::Skill, JudgementRule::Black)
                .keep_final_card(true);
        db.stack.push(
            Resolver::LuoshenResult(LuoshenResult {
                player: self.player,
            }),
            ctx.clone(),
        );
        db.stack
            .push(Resolver::Judgement(Judgement { request }), ctx.clone());
        Ok(())
    }
}

/// Inspects the judgement outcome, banks a black card, and re-pushes the
/// loop on a positive confirmation.
#[derive(Debug, Clone)]
pub struct LuoshenResult {
    pub player: Seat,
}

impl Resolve for LuoshenResult {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        let Some(result) = ctx.scratch.take_judgement() else {
            return Ok(());
        };
        let card = result.final_card.id;
        let present = db
            .game
            .player(self.player)
            .map(|player| player.judgement.contains(card))
            .unwrap_or(false);
        if !present {
            db.log.info(
                "LuoshenSkipped",
                format!("{} already left the judgement zone", card),
            );
            return Ok(());
        }

        if result.success {
            db.move_single(CardMoveDescriptor::single(
                ZoneRef::judgement(self.player),
                ZoneRef::hand(self.player),
                card,
                MoveReason::Skill,
            ))
            .map_err(ResolutionError::exception)?;
            db.log.info(
                "LuoshenKeep",
                format!("{} kept {}", self.player, card),
            );

            let request = ChoiceRequest::new(self.player, ChoiceKind::Confirm).can_pass(true);
            let reply = db.request_choice(request)?;
            if reply.confirmed && !db.game.draw_pile.is_empty() {
                db.stack.push(
                    Resolver::LuoshenLoop(LuoshenLoop {
                        player: self.player,
                    }),
                    ctx.clone(),
                );
            }
        } else {
            db.move_single(CardMoveDescriptor::single(
                ZoneRef::judgement(self.player),
                ZoneRef::discard_pile(),
                card,
                MoveReason::Judgement,
            ))
            .map_err(ResolutionError::exception)?;
            db.log.info(
                "LuoshenStop",
                format!("red card ends the run for {}", self.player),
            );
        }
        Ok(())
    }
}
