//! The suspension point of the engine: whenever a resolver needs player
//! input it calls the injected [`ChoiceHandler`] synchronously and keeps
//! going with the reply. Timeouts and UI concerns live behind the handler.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use uuid::Uuid;

use crate::{card::CardId, game::Game, player::Seat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceKind {
    Confirm,
    SelectCards,
    SelectTargets,
    Respond,
}

#[derive(Debug, Clone)]
pub struct ChoiceRequest {
    pub request_id: Uuid,
    pub player: Seat,
    pub kind: ChoiceKind,
    pub allowed_cards: Vec<CardId>,
    pub allowed_targets: Vec<Seat>,
    pub response_window_id: Option<Uuid>,
    pub can_pass: bool,
}

impl ChoiceRequest {
    pub fn new(player: Seat, kind: ChoiceKind) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            player,
            kind,
            allowed_cards: Vec::new(),
            allowed_targets: Vec::new(),
            response_window_id: None,
            can_pass: false,
        }
    }

    pub fn with_allowed_cards(mut self, cards: Vec<CardId>) -> Self {
        self.allowed_cards = cards;
        self
    }

    pub fn with_window(mut self, window: Uuid) -> Self {
        self.response_window_id = Some(window);
        self
    }

    pub fn can_pass(mut self, can_pass: bool) -> Self {
        self.can_pass = can_pass;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChoiceResult {
    pub confirmed: bool,
    pub selected_card_ids: Vec<CardId>,
    pub selected_target_seats: Vec<Seat>,
    pub converter_skill_id: Option<String>,
}

impl ChoiceResult {
    /// An explicit "no thanks". Every solicitation gets *some* reply.
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn confirm() -> Self {
        Self {
            confirmed: true,
            ..Self::default()
        }
    }

    pub fn cards(ids: impl IntoIterator<Item = CardId>) -> Self {
        Self {
            confirmed: true,
            selected_card_ids: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn targets(seats: impl IntoIterator<Item = Seat>) -> Self {
        Self {
            confirmed: true,
            selected_target_seats: seats.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_converter(mut self, skill_id: impl Into<String>) -> Self {
        self.converter_skill_id = Some(skill_id.into());
        self
    }
}

pub trait ChoiceHandler {
    fn choose(&mut self, game: &Game, request: &ChoiceRequest) -> ChoiceResult;
}

#[derive(Debug, Default)]
struct ScriptedInner {
    script: VecDeque<ChoiceResult>,
    requests: Vec<ChoiceRequest>,
}

/// Deterministic handler replaying a fixed script, one reply per request in
/// solicitation order. Replies beyond the script are passes. Clones share
/// state, so a test can keep a handle while the engine owns the other.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChoices(Rc<RefCell<ScriptedInner>>);

impl ScriptedChoices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, reply: ChoiceResult) -> &Self {
        self.0.borrow_mut().script.push_back(reply);
        self
    }

    /// Every request the engine made, in order.
    pub fn requests(&self) -> Vec<ChoiceRequest> {
        self.0.borrow().requests.clone()
    }

    pub fn requests_for(&self, seat: Seat) -> usize {
        self.0
            .borrow()
            .requests
            .iter()
            .filter(|request| request.player == seat)
            .count()
    }
}

impl ChoiceHandler for ScriptedChoices {
    fn choose(&mut self, _game: &Game, request: &ChoiceRequest) -> ChoiceResult {
        let mut inner = self.0.borrow_mut();
        inner.requests.push(request.clone());
        inner.script.pop_front().unwrap_or_else(ChoiceResult::pass)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn scripted_replies_then_passes() {
        let script = ScriptedChoices::new();
        script.enqueue(ChoiceResult::confirm());

        let mut handler = script.clone();
        let game = Game::new(2, 4);
        let request = ChoiceRequest::new(Seat(0), ChoiceKind::Confirm).can_pass(true);

        assert!(handler.choose(&game, &request).confirmed);
        assert!(!handler.choose(&game, &request).confirmed);
        assert_eq!(script.requests().len(), 2);
        assert_eq!(script.requests_for(Seat(0)), 2);
        assert_eq!(script.requests_for(Seat(1)), 0);
    }
}
