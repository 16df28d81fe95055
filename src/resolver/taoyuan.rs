use crate::{
    engine::Engine,
    player::Seat,
    resolver::{
        nullification::{NullifiableEffect, Nullification},
        discard_played,
        Resolve, ResolutionCtx, ResolutionResult, Resolver,
    },
    scratchpad::EffectKey,
};

/// Taoyuan Jieyi: every alive player recovers one point, user first. The
/// trick is untargeted, so each per-seat effect instance is marked
/// non-nullifiable and the counter protocol is skipped.
#[derive(Debug, Clone)]
pub struct TaoyuanUse;

impl Resolve for TaoyuanUse {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        discard_played(db, ctx)?;

        let seats = db.game.alive_seats_from(ctx.source);
        for &seat in seats.iter().rev() {
            db.stack
                .push(Resolver::TaoyuanHeal(TaoyuanHeal { target: seat }), ctx.clone());
            db.stack.push(
                Resolver::Nullification(Nullification {
                    effect: NullifiableEffect {
                        nullifiable: false,
                        key: EffectKey::Taoyuan,
                        target: seat,
                        causing_card: ctx.action,
                    },
                }),
                ctx.clone(),
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TaoyuanHeal {
    pub target: Seat,
}

impl Resolve for TaoyuanHeal {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        if ctx.scratch.is_nullified(EffectKey::Taoyuan, self.target) {
            db.log.info(
                "TaoyuanJieyiNullified",
                format!("healing of {} was nullified", self.target),
            );
            return Ok(());
        }
        if !db.game.is_alive(self.target) {
            db.log.info(
                "TaoyuanJieyiSkipped",
                format!("{} is no longer alive", self.target),
            );
            return Ok(());
        }
        let applied = db.recover_hp(self.target, 1);
        if applied == 0 {
            db.log.info(
                "TaoyuanJieyiSkipped",
                format!("{} is already at full health", self.target),
            );
        }
        Ok(())
    }
}
