use uuid::Uuid;

use crate::{
    card::{CardId, CardSubtype},
    choices::{ChoiceKind, ChoiceRequest},
    engine::Engine,
    moves::{CardMoveDescriptor, MoveReason},
    player::Seat,
    resolver::{FailureKind, Resolve, ResolutionCtx, ResolutionError, ResolutionResult},
    scratchpad::{ResponseOutcome, ResponseState},
    zone::ZoneRef,
};

/// Solicits one card of the requested kind from one player and deposits the
/// disposition under `LastResponseResult`. The window moves from idle
/// through soliciting into exactly one of success, failed or passed; a
/// played card is in the discard pile before the state becomes success.
#[derive(Debug, Clone)]
pub struct ResponseWindow {
    pub responder: Seat,
    pub requested: CardSubtype,
}

impl Resolve for ResponseWindow {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        let window = Uuid::new_v4();
        let outcome = solicit(db, self.responder, self.requested, window, true)?;
        ctx.scratch.set_response(outcome);
        Ok(())
    }
}

/// Hand cards the responder may answer with, paired with the converter
/// skill making a non-matching card eligible.
fn candidates(
    db: &Engine,
    responder: Seat,
    requested: CardSubtype,
) -> Vec<(CardId, Option<String>)> {
    let Some(player) = db.game.player(responder) else {
        return Vec::new();
    };
    player
        .hand
        .cards()
        .iter()
        .filter_map(|card| {
            if card.subtype == requested {
                Some((card.id, None))
            } else {
                db.skills
                    .convertible(&db.game, responder, requested, card)
                    .map(|skill| (card.id, Some(skill)))
            }
        })
        .collect()
}

/// One complete solicitation round against a single player. Shared by the
/// response window, the dying rescue loop and the nullification chain.
pub(crate) fn solicit(
    db: &mut Engine,
    responder: Seat,
    requested: CardSubtype,
    window: Uuid,
    can_pass: bool,
) -> Result<ResponseOutcome, ResolutionError> {
    let eligible = candidates(db, responder, requested);
    if eligible.is_empty() {
        debug!(%responder, %requested, "no response candidates");
        return Ok(ResponseOutcome {
            state: ResponseState::Failed,
            responder,
            card: None,
            converter_skill_id: None,
        });
    }

    let request = ChoiceRequest::new(responder, ChoiceKind::Respond)
        .with_allowed_cards(eligible.iter().map(|(id, _)| *id).collect())
        .with_window(window)
        .can_pass(can_pass);
    let reply = db.request_choice(request)?;

    let Some(&chosen) = reply.selected_card_ids.first() else {
        return Ok(ResponseOutcome {
            state: ResponseState::Passed,
            responder,
            card: None,
            converter_skill_id: None,
        });
    };
    let Some((_, converter)) = eligible.iter().find(|(id, _)| *id == chosen) else {
        return Err(ResolutionError::new(
            FailureKind::CardNotFound,
            "resolution.response.cardNotEligible",
        )
        .with_detail("card", chosen));
    };
    let converter = converter.clone();

    db.move_single(CardMoveDescriptor::single(
        ZoneRef::hand(responder),
        ZoneRef::discard_pile(),
        chosen,
        MoveReason::Play,
    ))
    .map_err(ResolutionError::exception)?;

    db.log.info(
        "ResponseProvided",
        format!("{} answered with {}", responder, chosen),
    );

    Ok(ResponseOutcome {
        state: ResponseState::Success,
        responder,
        card: Some(chosen),
        converter_skill_id: converter,
    })
}
