use crate::{
    engine::Engine,
    events::GameEvent,
    player::Seat,
    resolver::{
        dying::Dying, FailureKind, Resolve, ResolutionCtx, ResolutionError, ResolutionResult,
        Resolver,
    },
};

/// Direct health loss. Deliberately distinct from damage: publishing
/// `HpLost` must never wake a damage-triggered listener.
#[derive(Debug, Clone)]
pub struct LoseHp {
    pub target: Seat,
    pub amount: u32,
}

impl Resolve for LoseHp {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        if self.amount == 0 {
            return Err(ResolutionError::new(
                FailureKind::InvalidState,
                "resolution.loseHp.invalidAmount",
            ));
        }
        let Some(player) = db.game.player_mut(self.target) else {
            return Err(ResolutionError::new(
                FailureKind::InvalidTarget,
                "resolution.loseHp.unknownTarget",
            ));
        };
        if !player.alive {
            return Err(ResolutionError::new(
                FailureKind::TargetNotAlive,
                "resolution.loseHp.targetNotAlive",
            ));
        }

        player.health = (player.health - self.amount as i32).max(0);
        let hp_after = player.health;

        db.publish(GameEvent::HpLost {
            seat: self.target,
            amount: self.amount,
            hp_after,
        });

        if hp_after <= 0 {
            ctx.scratch.set_dying(self.target);
            db.stack.push(
                Resolver::AfterHpLost(AfterHpLostHandler {
                    target: self.target,
                    amount: self.amount,
                }),
                ctx.clone(),
            );
            db.stack.push(Resolver::Dying(Dying), ctx.clone());
        } else {
            db.publish(GameEvent::AfterHpLost {
                seat: self.target,
                amount: self.amount,
            });
        }
        Ok(())
    }
}

/// Runs after the dying window. A rescued player still gets the
/// `AfterHpLost` notification; a dead one does not.
#[derive(Debug, Clone)]
pub struct AfterHpLostHandler {
    pub target: Seat,
    pub amount: u32,
}

impl Resolve for AfterHpLostHandler {
    fn resolve(&self, db: &mut Engine, _ctx: &ResolutionCtx) -> ResolutionResult {
        if db.game.is_alive(self.target) {
            db.publish(GameEvent::AfterHpLost {
                seat: self.target,
                amount: self.amount,
            });
        } else {
            db.log.info(
                "AfterHpLostSuppressed",
                format!("{} did not survive the loss", self.target),
            );
        }
        Ok(())
    }
}
