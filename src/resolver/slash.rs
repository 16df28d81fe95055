use crate::{
    card::CardSubtype,
    engine::Engine,
    resolver::{
        damage::{Damage, DamageDescriptor, DamageType},
        discard_played,
        FailureKind, Resolve, ResolutionCtx, ResolutionError, ResolutionResult, Resolver,
    },
    rules::CardUsageContext,
};

/// Basic attack: one preventable point of damage against a target in
/// reach. The dodge window (and any assistance) lives inside the damage
/// resolution.
#[derive(Debug, Clone)]
pub struct SlashUse;

impl Resolve for SlashUse {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        let Some(&target) = ctx
            .choice
            .as_ref()
            .and_then(|choice| choice.selected_target_seats.first())
        else {
            return Err(ResolutionError::new(
                FailureKind::InvalidTarget,
                "resolution.slash.missingTarget",
            ));
        };
        if target == ctx.source {
            return Err(ResolutionError::new(
                FailureKind::InvalidTarget,
                "resolution.slash.selfTarget",
            ));
        }
        if !db.game.is_alive(target) {
            return Err(ResolutionError::new(
                FailureKind::TargetNotAlive,
                "resolution.slash.targetNotAlive",
            ));
        }

        let usage = CardUsageContext {
            user: ctx.source,
            subtype: CardSubtype::Slash,
            card: ctx.action,
        };
        if !db.rules.legal_targets(&db.game, &usage).contains(target) {
            return Err(ResolutionError::new(
                FailureKind::InvalidTarget,
                "resolution.slash.targetOutOfRange",
            ));
        }

        discard_played(db, ctx)?;

        let damage = DamageDescriptor::new(Some(ctx.source), target, 1, DamageType::Normal)
            .reason("Slash")
            .preventable(true);
        db.stack
            .push(Resolver::Damage(Damage), ctx.with_damage(damage));
        Ok(())
    }
}
