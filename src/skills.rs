//! Interfaces character and equipment skills plug into. Concrete skills are
//! external; the engine only consults these hooks at fixed points: response
//! conversion, response assistance, judgement modification, and the
//! attach/detach lifecycle of equipment.

use indexmap::IndexMap;

use crate::{
    card::{Card, CardId, CardSubtype},
    game::Game,
    judgement::JudgementRequest,
    player::Seat,
};

/// Equipment-bound skill, attached when the card enters an equipment zone
/// and detached when it leaves for any reason. Hooks must not relocate
/// cards; zone membership belongs to the card-move service.
pub trait EquipmentSkill {
    fn id(&self) -> &str;

    fn on_attach(&self, game: &mut Game, owner: Seat);

    fn on_detach(&self, game: &mut Game, owner: Seat);
}

/// Lets a non-matching card answer a response window as the requested kind
/// (e.g. a skill playing any red card as a Dodge).
pub trait ResponseConverter {
    fn id(&self) -> &str;

    fn converts(
        &self,
        game: &Game,
        responder: Seat,
        requested: CardSubtype,
        card: &Card,
    ) -> bool;
}

/// Hujia-style protection: yields the ordered list of seats that may answer
/// a response window on the beneficiary's behalf.
pub trait AssistanceSkill {
    fn id(&self) -> &str;

    fn assistants(&self, game: &Game, beneficiary: Seat, requested: CardSubtype) -> Vec<Seat>;
}

/// Peek/swap skill consulted during a judgement while substitution is still
/// allowed.
pub trait JudgementModifier {
    fn id(&self) -> &str;

    fn propose(
        &self,
        game: &Game,
        request: &JudgementRequest,
        current: &Card,
    ) -> Option<JudgementSubstitution>;
}

#[derive(Debug, Clone)]
pub struct JudgementSubstitution {
    pub player: Seat,
    /// Replacement card; must be in the player's hand at apply time.
    pub replacement: CardId,
}

#[derive(Default)]
pub struct SkillManager {
    equipment: IndexMap<String, Box<dyn EquipmentSkill>>,
    attached: IndexMap<CardId, String>,
    converters: Vec<Box<dyn ResponseConverter>>,
    assistance: Vec<Box<dyn AssistanceSkill>>,
    judgement_modifiers: Vec<Box<dyn JudgementModifier>>,
}

impl SkillManager {
    pub fn register_equipment(&mut self, def_id: impl Into<String>, skill: Box<dyn EquipmentSkill>) {
        self.equipment.insert(def_id.into(), skill);
    }

    pub fn register_converter(&mut self, skill: Box<dyn ResponseConverter>) {
        self.converters.push(skill);
    }

    pub fn register_assistance(&mut self, skill: Box<dyn AssistanceSkill>) {
        self.assistance.push(skill);
    }

    pub fn register_judgement_modifier(&mut self, skill: Box<dyn JudgementModifier>) {
        self.judgement_modifiers.push(skill);
    }

    pub fn is_attached(&self, card: CardId) -> bool {
        self.attached.contains_key(&card)
    }

    pub(crate) fn attach(&mut self, game: &mut Game, owner: Seat, card: &Card) {
        if let Some(skill) = self.equipment.get(&card.def_id) {
            skill.on_attach(game, owner);
            self.attached.insert(card.id, skill.id().to_string());
        }
    }

    pub(crate) fn detach(&mut self, game: &mut Game, owner: Seat, card: &Card) {
        if self.attached.shift_remove(&card.id).is_some() {
            if let Some(skill) = self.equipment.get(&card.def_id) {
                skill.on_detach(game, owner);
            }
        }
    }

    /// First registered converter willing to treat `card` as `requested`.
    pub(crate) fn convertible(
        &self,
        game: &Game,
        responder: Seat,
        requested: CardSubtype,
        card: &Card,
    ) -> Option<String> {
        self.converters
            .iter()
            .find(|skill| skill.converts(game, responder, requested, card))
            .map(|skill| skill.id().to_string())
    }

    /// Ordered assistants for a protected beneficiary; empty when no
    /// assistance skill applies.
    pub(crate) fn assistance_order(
        &self,
        game: &Game,
        beneficiary: Seat,
        requested: CardSubtype,
    ) -> Vec<Seat> {
        for skill in self.assistance.iter() {
            let assistants = skill.assistants(game, beneficiary, requested);
            if !assistants.is_empty() {
                return assistants;
            }
        }
        Vec::new()
    }

    /// First substitution proposed by any modify-judgement skill.
    pub(crate) fn propose_judgement(
        &self,
        game: &Game,
        request: &JudgementRequest,
        current: &Card,
    ) -> Option<JudgementSubstitution> {
        self.judgement_modifiers
            .iter()
            .find_map(|skill| skill.propose(game, request, current))
    }
}

impl std::fmt::Debug for SkillManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillManager")
            .field("equipment", &self.equipment.keys().collect::<Vec<_>>())
            .field("attached", &self.attached)
            .field("converters", &self.converters.len())
            .field("assistance", &self.assistance.len())
            .field("judgement_modifiers", &self.judgement_modifiers.len())
            .finish()
    }
}
