use serde::{Deserialize, Serialize};

use crate::{
    card::CardSubtype,
    engine::Engine,
    events::GameEvent,
    player::Seat,
    resolver::{
        assistance::AssistedResponse, dying::Dying, FailureKind, Resolve, ResolutionCtx,
        ResolutionError, ResolutionResult, Resolver,
    },
    scratchpad::{DodgeRequest, ResponseState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum DamageType {
    Normal,
    Fire,
    Thunder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageDescriptor {
    /// `None` for sourceless damage (Shandian's thunder bolt).
    pub source: Option<Seat>,
    pub target: Seat,
    pub amount: u32,
    pub damage_type: DamageType,
    pub reason: Option<String>,
    /// When set the target gets a dodge window (possibly assisted) before
    /// anything is subtracted.
    pub preventable: bool,
    /// Redirection applied before any other step.
    pub transferred_to: Option<Seat>,
    pub triggers_dying: bool,
}

impl DamageDescriptor {
    pub fn new(source: Option<Seat>, target: Seat, amount: u32, damage_type: DamageType) -> Self {
        Self {
            source,
            target,
            amount,
            damage_type,
            reason: None,
            preventable: false,
            transferred_to: None,
            triggers_dying: true,
        }
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn preventable(mut self, preventable: bool) -> Self {
        self.preventable = preventable;
        self
    }

    pub fn transferred_to(mut self, seat: Seat) -> Self {
        self.transferred_to = Some(seat);
        self
    }

    pub fn triggers_dying(mut self, triggers: bool) -> Self {
        self.triggers_dying = triggers;
        self
    }
}

/// Entry step for pending damage on the context. Preventable damage opens a
/// dodge window first and defers the subtraction to [`DamageApply`].
#[derive(Debug, Clone)]
pub struct Damage;

impl Resolve for Damage {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        let Some(mut damage) = ctx.damage.clone() else {
            return Err(ResolutionError::new(
                FailureKind::InvalidState,
                "resolution.damage.missingDescriptor",
            ));
        };
        if damage.amount == 0 {
            return Err(ResolutionError::new(
                FailureKind::InvalidState,
                "resolution.damage.invalidAmount",
            ));
        }
        if let Some(redirected) = damage.transferred_to.take() {
            damage.target = redirected;
        }

        if !db.game.is_alive(damage.target) {
            db.log.info(
                "DamageSkipped",
                format!("{} is no longer alive", damage.target),
            );
            return Ok(());
        }

        db.publish(GameEvent::BeforeDamage {
            damage: damage.clone(),
        });

        if damage.preventable {
            let target = damage.target;
            ctx.scratch.set_dodge(DodgeRequest::default());
            ctx.scratch.clear_response();
            let apply_ctx = ctx.with_damage(damage);
            db.stack
                .push(Resolver::DamageApply(DamageApply), apply_ctx.clone());
            db.stack.push(
                Resolver::AssistedResponse(AssistedResponse {
                    beneficiary: target,
                    requested: CardSubtype::Dodge,
                }),
                apply_ctx,
            );
            return Ok(());
        }

        apply(db, ctx, &damage)
    }
}

/// Handler behind the dodge window: reads the window's disposition and
/// performs the subtraction when the damage went unprevented.
#[derive(Debug, Clone)]
pub struct DamageApply;

impl Resolve for DamageApply {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        let Some(damage) = ctx.damage.clone() else {
            return Err(ResolutionError::new(
                FailureKind::InvalidState,
                "resolution.damage.missingDescriptor",
            ));
        };

        let assisted = ctx
            .scratch
            .dodge()
            .map(|request| request.resolved)
            .unwrap_or(false);
        let responded = matches!(
            ctx.scratch.response(),
            Some(outcome) if outcome.state == ResponseState::Success
        );
        if assisted || responded {
            db.log.info(
                "DamagePrevented",
                format!("{} dodged the damage", damage.target),
            );
            return Ok(());
        }

        apply(db, ctx, &damage)
    }
}

fn apply(db: &mut Engine, ctx: &ResolutionCtx, damage: &DamageDescriptor) -> ResolutionResult {
    let Some(player) = db.game.player_mut(damage.target) else {
        return Err(ResolutionError::new(
            FailureKind::InvalidTarget,
            "resolution.damage.unknownTarget",
        ));
    };
    player.health = (player.health - damage.amount as i32).max(0);
    let hp_after = player.health;

    db.publish(GameEvent::Damage {
        damage: damage.clone(),
        hp_after,
    });

    if hp_after <= 0 && damage.triggers_dying {
        ctx.scratch.set_dying(damage.target);
        // AfterDamage pops after the dying window so the triplet still
        // closes around the whole mutation.
        db.stack.push(
            Resolver::AfterDamage(AfterDamageHandler {
                damage: damage.clone(),
            }),
            ctx.clone(),
        );
        db.stack.push(Resolver::Dying(Dying), ctx.clone());
    } else {
        db.publish(GameEvent::AfterDamage {
            damage: damage.clone(),
        });
    }
    Ok(())
}

/// Deferred `AfterDamage` publication once a dying window has run its
/// course. Suppressed when the player did not survive it.
#[derive(Debug, Clone)]
pub struct AfterDamageHandler {
    pub damage: DamageDescriptor,
}

impl Resolve for AfterDamageHandler {
    fn resolve(&self, db: &mut Engine, _ctx: &ResolutionCtx) -> ResolutionResult {
        if db.game.is_alive(self.damage.target) {
            db.publish(GameEvent::AfterDamage {
                damage: self.damage.clone(),
            });
        } else {
            db.log.info(
                "AfterDamageSuppressed",
                format!("{} died of the damage", self.damage.target),
            );
        }
        Ok(())
    }
}
