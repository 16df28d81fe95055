use crate::{
    engine::Engine,
    resolver::{
        discard_played, FailureKind, Resolve, ResolutionCtx, ResolutionError,
        ResolutionResult,
    },
};

/// Self-heal for one point; unusable at full health.
#[derive(Debug, Clone)]
pub struct PeachUse;

impl Resolve for PeachUse {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        let Some(player) = db.game.player(ctx.source) else {
            return Err(ResolutionError::new(
                FailureKind::InvalidTarget,
                "resolution.peach.unknownPlayer",
            ));
        };
        if player.health >= player.max_health {
            return Err(ResolutionError::new(
                FailureKind::InvalidState,
                "resolution.peach.fullHealth",
            ));
        }

        discard_played(db, ctx)?;
        db.recover_hp(ctx.source, 1);
        Ok(())
    }
}
