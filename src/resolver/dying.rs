use uuid::Uuid;

use crate::{
    card::CardSubtype,
    engine::Engine,
    events::GameEvent,
    moves::{CardMoveDescriptor, MoveOrdering, MoveReason},
    player::Seat,
    resolver::{
        response, FailureKind, Resolve, ResolutionCtx, ResolutionError, ResolutionResult,
    },
    scratchpad::ResponseState,
    zone::ZoneRef,
};

/// Rescue window for a player at zero health. Peaches are solicited from
/// every alive player, the dying one first, until the player climbs above
/// zero or a full round passes without help.
#[derive(Debug, Clone)]
pub struct Dying;

impl Resolve for Dying {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        let Some(seat) = ctx.scratch.dying() else {
            return Err(ResolutionError::new(
                FailureKind::InvalidState,
                "resolution.dying.missingSeat",
            ));
        };
        if !db.game.is_alive(seat) {
            db.log
                .info("DyingSkipped", format!("{} is already dead", seat));
            return Ok(());
        }
        if db.game.health(seat) > 0 {
            db.log
                .info("DyingSkipped", format!("{} was already rescued", seat));
            return Ok(());
        }

        db.publish(GameEvent::Dying { seat });

        while db.game.health(seat) <= 0 {
            let mut rescued = false;
            for rescuer in db.game.alive_seats_from(seat) {
                let window = Uuid::new_v4();
                let outcome = response::solicit(db, rescuer, CardSubtype::Peach, window, true)?;
                if outcome.state == ResponseState::Success {
                    db.recover_hp(seat, 1);
                    rescued = true;
                    break;
                }
            }
            if !rescued {
                break;
            }
        }

        if db.game.health(seat) <= 0 {
            declare_dead(db, seat).map_err(ResolutionError::exception)?;
        }
        Ok(())
    }
}

fn declare_dead(db: &mut Engine, seat: Seat) -> anyhow::Result<()> {
    if let Some(player) = db.game.player_mut(seat) {
        player.alive = false;
    }
    db.log.info("PlayerDied", format!("{} is dead", seat));
    db.publish(GameEvent::PlayerDied { seat });

    for kind in [
        ZoneRef::hand(seat),
        ZoneRef::equipment(seat),
        ZoneRef::judgement(seat),
    ] {
        let cards = db
            .game
            .zone(&kind)
            .map(|zone| zone.ids())
            .unwrap_or_default();
        if cards.is_empty() {
            continue;
        }
        db.move_single(CardMoveDescriptor {
            from: kind,
            to: ZoneRef::discard_pile(),
            cards,
            reason: MoveReason::Discard,
            ordering: MoveOrdering::ToTop,
        })?;
    }
    Ok(())
}
