use uuid::Uuid;

use crate::{
    card::{CardId, CardSubtype},
    choices::{ChoiceKind, ChoiceRequest},
    engine::Engine,
    moves::{CardMoveDescriptor, MoveReason},
    player::Seat,
    resolver::{
        FailureKind, Resolve, ResolutionCtx, ResolutionError, ResolutionResult,
    },
    scratchpad::{EffectKey, NullificationOutcome},
    zone::ZoneRef,
};

/// One target-specific firing of a trick; the unit of nullification.
#[derive(Debug, Clone)]
pub struct NullifiableEffect {
    pub nullifiable: bool,
    pub key: EffectKey,
    pub target: Seat,
    pub causing_card: Option<CardId>,
}

/// Counter-chain protocol for a single effect instance. Players are asked
/// in seat order starting after the chain's last actor; each played
/// Nullification flips what the next round is countering. Odd chain length
/// nullifies the effect.
#[derive(Debug, Clone)]
pub struct Nullification {
    pub effect: NullifiableEffect,
}

impl Resolve for Nullification {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        let effect = &self.effect;

        if !effect.nullifiable {
            ctx.scratch.set_nullification(
                effect.key,
                effect.target,
                NullificationOutcome {
                    is_nullified: false,
                    count: 0,
                },
            );
            debug!(key = %effect.key, target = %effect.target, "effect is not nullifiable");
            return Ok(());
        }

        let window = Uuid::new_v4();
        let mut count = 0u32;
        let mut last_actor = ctx.source;
        while let Some((seat, card)) = solicit_counter(db, last_actor, window)? {
            count += 1;
            last_actor = seat;
            db.log.info(
                "NullificationPlayed",
                format!("{} played {} against {}", seat, card, effect.key),
            );
        }

        let outcome = NullificationOutcome {
            is_nullified: count % 2 == 1,
            count,
        };
        ctx.scratch
            .set_nullification(effect.key, effect.target, outcome);
        db.log.info(
            "NullificationResolved",
            format!(
                "{} against {}: {} played, nullified={}",
                effect.key, effect.target, count, outcome.is_nullified
            ),
        );
        Ok(())
    }
}

/// Asks every alive player, in seat order after `start`, for one
/// Nullification. Players without an eligible card are skipped silently.
fn solicit_counter(
    db: &mut Engine,
    start: Seat,
    window: Uuid,
) -> Result<Option<(Seat, CardId)>, ResolutionError> {
    for seat in db.game.alive_seats_after(start) {
        let eligible: Vec<CardId> = db
            .game
            .player(seat)
            .map(|player| {
                player
                    .hand
                    .cards()
                    .iter()
                    .filter(|card| {
                        card.subtype == CardSubtype::Nullification
                            || db
                                .skills
                                .convertible(
                                    &db.game,
                                    seat,
                                    CardSubtype::Nullification,
                                    card,
                                )
                                .is_some()
                    })
                    .map(|card| card.id)
                    .collect()
            })
            .unwrap_or_default();
        if eligible.is_empty() {
            continue;
        }

        let request = ChoiceRequest::new(seat, ChoiceKind::Respond)
            .with_allowed_cards(eligible.clone())
            .with_window(window)
            .can_pass(true);
        let reply = db.request_choice(request)?;

        let Some(&chosen) = reply.selected_card_ids.first() else {
            continue;
        };
        if !eligible.contains(&chosen) {
            return Err(ResolutionError::new(
                FailureKind::CardNotFound,
                "resolution.nullification.cardNotEligible",
            )
            .with_detail("card", chosen));
        }

        db.move_single(CardMoveDescriptor::single(
            ZoneRef::hand(seat),
            ZoneRef::discard_pile(),
            chosen,
            MoveReason::Play,
        ))
        .map_err(ResolutionError::exception)?;

        return Ok(Some((seat, chosen)));
    }
    Ok(None)
}
