//! Effect steps. Each resolver describes one atomic step of the rules; the
//! engine pops them LIFO and calls [`Resolve::resolve`]. A step that wants
//! step X to run after step Y pushes X first, then Y on top of it.

pub mod assistance;
pub mod damage;
pub mod delayed_trick;
pub mod dismantle;
pub mod dying;
pub mod forced_slash;
pub mod jie_dao_sha_ren;
pub mod judgement;
pub mod lose_hp;
pub mod luoshen;
pub mod nullification;
pub mod peach;
pub mod response;
pub mod slash;
pub mod steal;
pub mod taoyuan;

use std::fmt;

use indexmap::IndexMap;

use crate::{
    card::CardId,
    choices::ChoiceResult,
    engine::Engine,
    player::Seat,
    resolver::{
        assistance::{AssistanceOutcome, AssistanceStep, AssistedResponse},
        damage::{AfterDamageHandler, Damage, DamageApply, DamageDescriptor},
        delayed_trick::{
            DelayedTrickJudge, DelayedTrickOutcome, DelayedTrickPhase, DelayedTrickResolve,
        },
        dismantle::{DismantleEffect, DismantleUse},
        dying::Dying,
        forced_slash::{ForcedSlash, ForcedSlashOutcome},
        jie_dao_sha_ren::{JieDaoShaRenEffect, JieDaoShaRenUse},
        judgement::Judgement,
        lose_hp::{AfterHpLostHandler, LoseHp},
        luoshen::{LuoshenLoop, LuoshenResult},
        nullification::Nullification,
        peach::PeachUse,
        response::ResponseWindow,
        slash::SlashUse,
        steal::{StealEffect, StealUse},
        taoyuan::{TaoyuanHeal, TaoyuanUse},
    },
    scratchpad::Scratchpad,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum FailureKind {
    InvalidTarget,
    CardNotFound,
    TargetNotAlive,
    InvalidState,
    RuleValidationFailed,
}

/// Reportable failure. Recoverable local conditions (nullified effect, dead
/// target, nothing to transfer) never produce one of these; they resolve as
/// `Ok` with a log entry. No state is mutated after a failure is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionError {
    pub kind: FailureKind,
    pub message_key: Option<String>,
    pub details: IndexMap<String, String>,
}

impl ResolutionError {
    pub fn new(kind: FailureKind, message_key: impl Into<String>) -> Self {
        Self {
            kind,
            message_key: Some(message_key.into()),
            details: IndexMap::default(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.details.insert(key.into(), value.to_string());
        self
    }

    /// Collaborator errors (move service, rule service) are caught at the
    /// resolver boundary and reported as `InvalidState`.
    pub fn exception(error: anyhow::Error) -> Self {
        Self::new(FailureKind::InvalidState, "resolution.collaboratorError")
            .with_detail("exception", error)
    }
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(key) = &self.message_key {
            write!(f, " ({key})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ResolutionError {}

pub type ResolutionResult = Result<(), ResolutionError>;

/// Per-push execution context. Deriving a child context rebinds a field and
/// shares the scratchpad with the rest of the tree.
#[derive(Debug, Clone)]
pub struct ResolutionCtx {
    pub source: Seat,
    /// Card whose use produced this resolution, if any.
    pub action: Option<CardId>,
    /// The player choice that triggered the action.
    pub choice: Option<ChoiceResult>,
    pub damage: Option<DamageDescriptor>,
    pub scratch: Scratchpad,
}

impl ResolutionCtx {
    pub fn root(source: Seat) -> Self {
        Self {
            source,
            action: None,
            choice: None,
            damage: None,
            scratch: Scratchpad::new(),
        }
    }

    pub fn for_source(&self, source: Seat) -> Self {
        Self {
            source,
            ..self.clone()
        }
    }

    pub fn with_action(mut self, card: CardId) -> Self {
        self.action = Some(card);
        self
    }

    pub fn with_choice(mut self, choice: Option<ChoiceResult>) -> Self {
        self.choice = choice;
        self
    }

    pub fn with_damage(&self, damage: DamageDescriptor) -> Self {
        let mut ctx = self.clone();
        ctx.damage = Some(damage);
        ctx
    }
}

pub(crate) trait Resolve {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult;
}

/// Moves the card being played from the user's hand to the discard pile.
/// Primary resolvers call this once their validation has passed, so a
/// rejected use leaves every zone untouched.
pub(crate) fn discard_played(db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
    let Some(card) = ctx.action else {
        return Ok(());
    };
    if !db
        .game
        .player(ctx.source)
        .map(|player| player.hand.contains(card))
        .unwrap_or(false)
    {
        return Ok(());
    }
    db.move_single(crate::moves::CardMoveDescriptor::single(
        crate::zone::ZoneRef::hand(ctx.source),
        crate::zone::ZoneRef::discard_pile(),
        card,
        crate::moves::MoveReason::Play,
    ))
    .map_err(ResolutionError::exception)
}

#[derive(Debug, Clone, strum::IntoStaticStr)]
pub enum Resolver {
    SlashUse(SlashUse),
    PeachUse(PeachUse),
    Damage(Damage),
    DamageApply(DamageApply),
    AfterDamage(AfterDamageHandler),
    LoseHp(LoseHp),
    AfterHpLost(AfterHpLostHandler),
    Dying(Dying),
    Nullification(Nullification),
    ResponseWindow(ResponseWindow),
    AssistedResponse(AssistedResponse),
    AssistanceStep(AssistanceStep),
    AssistanceOutcome(AssistanceOutcome),
    Judgement(Judgement),
    DelayedTrickPhase(DelayedTrickPhase),
    DelayedTrickResolve(DelayedTrickResolve),
    DelayedTrickJudge(DelayedTrickJudge),
    DelayedTrickOutcome(DelayedTrickOutcome),
    StealUse(StealUse),
    StealEffect(StealEffect),
    DismantleUse(DismantleUse),
    DismantleEffect(DismantleEffect),
    JieDaoShaRenUse(JieDaoShaRenUse),
    JieDaoShaRenEffect(JieDaoShaRenEffect),
    ForcedSlash(ForcedSlash),
    ForcedSlashOutcome(ForcedSlashOutcome),
    TaoyuanUse(TaoyuanUse),
    TaoyuanHeal(TaoyuanHeal),
    LuoshenLoop(LuoshenLoop),
    LuoshenResult(LuoshenResult),
}

impl Resolver {
    pub(crate) fn kind(&self) -> &'static str {
        self.into()
    }

    pub(crate) fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        match self {
            Resolver::SlashUse(inner) => inner.resolve(db, ctx),
            Resolver::PeachUse(inner) => inner.resolve(db, ctx),
            Resolver::Damage(inner) => inner.resolve(db, ctx),
            Resolver::DamageApply(inner) => inner.resolve(db, ctx),
            Resolver::AfterDamage(inner) => inner.resolve(db, ctx),
            Resolver::LoseHp(inner) => inner.resolve(db, ctx),
            Resolver::AfterHpLost(inner) => inner.resolve(db, ctx),
            Resolver::Dying(inner) => inner.resolve(db, ctx),
            Resolver::Nullification(inner) => inner.resolve(db, ctx),
            Resolver::ResponseWindow(inner) => inner.resolve(db, ctx),
            Resolver::AssistedResponse(inner) => inner.resolve(db, ctx),
            Resolver::AssistanceStep(inner) => inner.resolve(db, ctx),
            Resolver::AssistanceOutcome(inner) => inner.resolve(db, ctx),
            Resolver::Judgement(inner) => inner.resolve(db, ctx),
            Resolver::DelayedTrickPhase(inner) => inner.resolve(db, ctx),
            Resolver::DelayedTrickResolve(inner) => inner.resolve(db, ctx),
            Resolver::DelayedTrickJudge(inner) => inner.resolve(db, ctx),
            Resolver::DelayedTrickOutcome(inner) => inner.resolve(db, ctx),
            Resolver::StealUse(inner) => inner.resolve(db, ctx),
            Resolver::StealEffect(inner) => inner.resolve(db, ctx),
            Resolver::DismantleUse(inner) => inner.resolve(db, ctx),
            Resolver::DismantleEffect(inner) => inner.resolve(db, ctx),
            Resolver::JieDaoShaRenUse(inner) => inner.resolve(db, ctx),
            Resolver::JieDaoShaRenEffect(inner) => inner.resolve(db, ctx),
            Resolver::ForcedSlash(inner) => inner.resolve(db, ctx),
            Resolver::ForcedSlashOutcome(inner) => inner.resolve(db, ctx),
            Resolver::TaoyuanUse(inner) => inner.resolve(db, ctx),
            Resolver::TaoyuanHeal(inner) => inner.resolve(db, ctx),
            Resolver::LuoshenLoop(inner) => inner.resolve(db, ctx),
            Resolver::LuoshenResult(inner) => inner.resolve(db, ctx),
        }
    }
}
