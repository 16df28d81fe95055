//! Inter-resolver message store, shared by every context derived from the
//! same resolution root. Keys are typed rather than stringly so a resolver
//! cannot consume a sibling's result by accident.

use std::{cell::RefCell, fmt, rc::Rc};

use indexmap::IndexMap;

use crate::{card::CardId, judgement::JudgementResult, player::Seat};

/// Names one nullifiable effect instance. Rendered for logs as the game's
/// canonical dotted keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKey {
    Steal,
    Dismantle,
    JieDaoShaRen,
    Taoyuan,
    DelayedTrick,
}

impl fmt::Display for EffectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            EffectKey::Steal => "ShunshouQianyang.Resolve",
            EffectKey::Dismantle => "GuoheChaiqiao.Resolve",
            EffectKey::JieDaoShaRen => "JieDaoShaRen.Resolve",
            EffectKey::Taoyuan => "TaoyuanJieyi.Resolve",
            EffectKey::DelayedTrick => "DelayedTrick.Judgement",
        };
        f.write_str(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScratchKey {
    JudgementResult,
    LastResponseResult,
    DodgeRequest,
    DyingPlayer,
    ResponseAssistanceUsed,
    ResponseAssistant,
    Nullification { effect: EffectKey, target: Seat },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseState {
    Success,
    Failed,
    Passed,
}

/// What a response window produced, under `LastResponseResult`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseOutcome {
    pub state: ResponseState,
    pub responder: Seat,
    pub card: Option<CardId>,
    pub converter_skill_id: Option<String>,
}

/// Mutable record tracking whether somebody already answered a protected
/// response window (assistance) on the beneficiary's behalf.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DodgeRequest {
    pub resolved: bool,
    pub provided_by: Option<Seat>,
    pub provided_card: Option<CardId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullificationOutcome {
    pub is_nullified: bool,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScratchValue {
    Judgement(JudgementResult),
    Response(ResponseOutcome),
    Dodge(DodgeRequest),
    Nullification(NullificationOutcome),
    Seat(Seat),
    Flag(bool),
}

/// Cheaply clonable handle; clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct Scratchpad(Rc<RefCell<IndexMap<ScratchKey, ScratchValue>>>);

impl Scratchpad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: ScratchKey, value: ScratchValue) {
        self.0.borrow_mut().insert(key, value);
    }

    pub fn get(&self, key: &ScratchKey) -> Option<ScratchValue> {
        self.0.borrow().get(key).cloned()
    }

    pub fn remove(&self, key: &ScratchKey) -> Option<ScratchValue> {
        self.0.borrow_mut().shift_remove(key)
    }

    pub fn set_judgement(&self, result: JudgementResult) {
        self.set(ScratchKey::JudgementResult, ScratchValue::Judgement(result));
    }

    pub fn take_judgement(&self) -> Option<JudgementResult> {
        match self.remove(&ScratchKey::JudgementResult) {
            Some(ScratchValue::Judgement(result)) => Some(result),
            _ => None,
        }
    }

    pub fn set_response(&self, outcome: ResponseOutcome) {
        self.set(
            ScratchKey::LastResponseResult,
            ScratchValue::Response(outcome),
        );
    }

    pub fn response(&self) -> Option<ResponseOutcome> {
        match self.get(&ScratchKey::LastResponseResult) {
            Some(ScratchValue::Response(outcome)) => Some(outcome),
            _ => None,
        }
    }

    pub fn clear_response(&self) {
        self.remove(&ScratchKey::LastResponseResult);
    }

    pub fn set_dodge(&self, request: DodgeRequest) {
        self.set(ScratchKey::DodgeRequest, ScratchValue::Dodge(request));
    }

    pub fn dodge(&self) -> Option<DodgeRequest> {
        match self.get(&ScratchKey::DodgeRequest) {
            Some(ScratchValue::Dodge(request)) => Some(request),
            _ => None,
        }
    }

    pub fn set_dying(&self, seat: Seat) {
        self.set(ScratchKey::DyingPlayer, ScratchValue::Seat(seat));
    }

    pub fn dying(&self) -> Option<Seat> {
        match self.get(&ScratchKey::DyingPlayer) {
            Some(ScratchValue::Seat(seat)) => Some(seat),
            _ => None,
        }
    }

    pub fn set_nullification(
        &self,
        effect: EffectKey,
        target: Seat,
        outcome: NullificationOutcome,
    ) {
        self.set(
            ScratchKey::Nullification { effect, target },
            ScratchValue::Nullification(outcome),
        );
    }

    pub fn nullification(&self, effect: EffectKey, target: Seat) -> Option<NullificationOutcome> {
        match self.get(&ScratchKey::Nullification { effect, target }) {
            Some(ScratchValue::Nullification(outcome)) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_nullified(&self, effect: EffectKey, target: Seat) -> bool {
        self.nullification(effect, target)
            .map(|outcome| outcome.is_nullified)
            .unwrap_or(false)
    }

    pub fn mark_assistance(&self, assistant: Seat) {
        self.set(ScratchKey::ResponseAssistanceUsed, ScratchValue::Flag(true));
        self.set(ScratchKey::ResponseAssistant, ScratchValue::Seat(assistant));
    }

    pub fn assistance_used(&self) -> bool {
        matches!(
            self.get(&ScratchKey::ResponseAssistanceUsed),
            Some(ScratchValue::Flag(true))
        )
    }

    pub fn assistant(&self) -> Option<Seat> {
        match self.get(&ScratchKey::ResponseAssistant) {
            Some(ScratchValue::Seat(seat)) => Some(seat),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn clones_share_the_store() {
        let scratch = Scratchpad::new();
        let sibling = scratch.clone();
        sibling.set_dying(Seat(2));
        assert_eq!(scratch.dying(), Some(Seat(2)));
    }

    #[test]
    fn nullification_keys_are_per_effect_and_target() {
        let scratch = Scratchpad::new();
        scratch.set_nullification(
            EffectKey::Steal,
            Seat(1),
            NullificationOutcome {
                is_nullified: true,
                count: 1,
            },
        );
        assert!(scratch.is_nullified(EffectKey::Steal, Seat(1)));
        assert!(!scratch.is_nullified(EffectKey::Steal, Seat(2)));
        assert!(!scratch.is_nullified(EffectKey::Dismantle, Seat(1)));
    }

    #[test]
    fn take_judgement_consumes() {
        use crate::card::{Card, CardSubtype, Suit};
        use uuid::Uuid;

        let scratch = Scratchpad::new();
        let card = Card::of(9, CardSubtype::Slash, Suit::Club, 13);
        scratch.set_judgement(crate::judgement::JudgementResult {
            request_id: Uuid::new_v4(),
            initial_card: card.clone(),
            final_card: card,
            success: true,
        });
        assert!(scratch.take_judgement().is_some());
        assert!(scratch.take_judgement().is_none());
    }

    #[test]
    fn effect_keys_render_canonical_names() {
        assert_eq!(EffectKey::Steal.to_string(), "ShunshouQianyang.Resolve");
        assert_eq!(EffectKey::DelayedTrick.to_string(), "DelayedTrick.Judgement");
    }
}
