use crate::{
    card::CardSubtype,
    choices::{ChoiceKind, ChoiceRequest},
    engine::Engine,
    player::Seat,
    resolver::{
        response::ResponseWindow, Resolve, ResolutionCtx, ResolutionResult, Resolver,
    },
    scratchpad::{DodgeRequest, ResponseState},
};

/// Response window for a protected beneficiary. Eligible assistants are
/// offered the window first, one at a time and at most one providing the
/// card; if nobody helps, the beneficiary answers for themself.
#[derive(Debug, Clone)]
pub struct AssistedResponse {
    pub beneficiary: Seat,
    pub requested: CardSubtype,
}

impl Resolve for AssistedResponse {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        if ctx.scratch.dodge().is_none() {
            ctx.scratch.set_dodge(DodgeRequest::default());
        }

        let queue: Vec<Seat> = db
            .skills
            .assistance_order(&db.game, self.beneficiary, self.requested)
            .into_iter()
            .filter(|&seat| seat != self.beneficiary && db.game.is_alive(seat))
            .collect();

        if queue.is_empty() {
            db.stack.push(
                Resolver::ResponseWindow(ResponseWindow {
                    responder: self.beneficiary,
                    requested: self.requested,
                }),
                ctx.clone(),
            );
            return Ok(());
        }

        db.stack.push(
            Resolver::AssistanceStep(AssistanceStep {
                beneficiary: self.beneficiary,
                requested: self.requested,
                queue,
            }),
            ctx.clone(),
        );
        Ok(())
    }
}

/// Pops the next assistant off the queue, asks whether they want to help,
/// and if so opens a window for them with the outcome handler beneath it.
#[derive(Debug, Clone)]
pub struct AssistanceStep {
    pub beneficiary: Seat,
    pub requested: CardSubtype,
    pub queue: Vec<Seat>,
}

impl Resolve for AssistanceStep {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        if ctx
            .scratch
            .dodge()
            .map(|request| request.resolved)
            .unwrap_or(false)
        {
            return Ok(());
        }

        let mut queue = self.queue.clone();
        let Some(assistant) = (!queue.is_empty()).then(|| queue.remove(0)) else {
            // Nobody helped; the beneficiary answers for themself.
            db.stack.push(
                Resolver::ResponseWindow(ResponseWindow {
                    responder: self.beneficiary,
                    requested: self.requested,
                }),
                ctx.clone(),
            );
            return Ok(());
        };

        if !db.game.is_alive(assistant) {
            db.stack.push(
                Resolver::AssistanceStep(AssistanceStep {
                    beneficiary: self.beneficiary,
                    requested: self.requested,
                    queue,
                }),
                ctx.clone(),
            );
            return Ok(());
        }

        let request = ChoiceRequest::new(assistant, ChoiceKind::Confirm).can_pass(true);
        let reply = db.request_choice(request)?;
        if !reply.confirmed {
            db.stack.push(
                Resolver::AssistanceStep(AssistanceStep {
                    beneficiary: self.beneficiary,
                    requested: self.requested,
                    queue,
                }),
                ctx.clone(),
            );
            return Ok(());
        }

        db.stack.push(
            Resolver::AssistanceOutcome(AssistanceOutcome {
                assistant,
                beneficiary: self.beneficiary,
                requested: self.requested,
                remaining: queue,
            }),
            ctx.clone(),
        );
        db.stack.push(
            Resolver::ResponseWindow(ResponseWindow {
                responder: assistant,
                requested: self.requested,
            }),
            ctx.clone(),
        );
        Ok(())
    }
}

/// Observes the assistant's window. On success the dodge-request record is
/// resolved and no further assistant is consulted; otherwise the iteration
/// continues with the rest of the queue.
#[derive(Debug, Clone)]
pub struct AssistanceOutcome {
    pub assistant: Seat,
    pub beneficiary: Seat,
    pub requested: CardSubtype,
    pub remaining: Vec<Seat>,
}

impl Resolve for AssistanceOutcome {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        match ctx.scratch.response() {
            Some(outcome)
                if outcome.state == ResponseState::Success
                    && outcome.responder == self.assistant =>
            {
                ctx.scratch.set_dodge(DodgeRequest {
                    resolved: true,
                    provided_by: Some(self.assistant),
                    provided_card: outcome.card,
                });
                ctx.scratch.mark_assistance(self.assistant);
                db.log.info(
                    "ResponseAssisted",
                    format!(
                        "{} answered for {}",
                        self.assistant, self.beneficiary
                    ),
                );
            }
            _ => {
                ctx.scratch.clear_response();
                db.stack.push(
                    Resolver::AssistanceStep(AssistanceStep {
                        beneficiary: self.beneficiary,
                        requested: self.requested,
                        queue: self.remaining.clone(),
                    }),
                    ctx.clone(),
                );
            }
        }
        Ok(())
    }
}
