//! Engine assembly and the action entry points. The engine owns the table
//! state plus every collaborator a resolution context references, and
//! drives the stack until empty. Execution is single-threaded and
//! cooperative; the only suspension point is the choice callback.

use tracing::Level;

use crate::{
    card::{CardId, CardSubtype},
    choices::{ChoiceHandler, ChoiceRequest, ChoiceResult},
    events::{EventBus, GameEvent},
    game::{Game, Phase},
    log::Log,
    moves::{CardMoveDescriptor, MoveReason},
    player::Seat,
    resolver::{
        damage::{Damage, DamageDescriptor},
        delayed_trick::DelayedTrickPhase,
        dismantle::DismantleUse,
        jie_dao_sha_ren::JieDaoShaRenUse,
        lose_hp::LoseHp,
        luoshen::LuoshenLoop,
        peach::PeachUse,
        slash::SlashUse,
        steal::StealUse,
        taoyuan::TaoyuanUse,
        FailureKind, ResolutionCtx, ResolutionError, ResolutionResult, Resolver,
    },
    rules::{RuleService, SeatDistanceRules},
    skills::SkillManager,
    stack::{ExecutedStep, ResolutionStack},
    zone::ZoneRef,
};

pub struct Engine {
    pub game: Game,
    pub stack: ResolutionStack,
    pub events: EventBus,
    pub log: Log,
    pub skills: SkillManager,
    pub(crate) rules: Box<dyn RuleService>,
    choices: Option<Box<dyn ChoiceHandler>>,
}

impl Engine {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            stack: ResolutionStack::default(),
            events: EventBus::default(),
            log: Log::default(),
            skills: SkillManager::default(),
            rules: Box::new(SeatDistanceRules),
            choices: None,
        }
    }

    pub fn set_choices(&mut self, handler: impl ChoiceHandler + 'static) {
        self.choices = Some(Box::new(handler));
    }

    pub fn set_rules(&mut self, rules: impl RuleService + 'static) {
        self.rules = Box::new(rules);
    }

    pub fn push(&mut self, resolver: Resolver, ctx: ResolutionCtx) {
        self.stack.push(resolver, ctx);
    }

    /// Drives the stack until empty. A failing step neither unwinds the
    /// stack nor the game; it is recorded in the history and the first
    /// failure is surfaced to the caller.
    pub fn run(&mut self) -> ResolutionResult {
        let mut outcome: ResolutionResult = Ok(());
        while let Some((resolver, ctx)) = self.stack.pop_entry() {
            let kind = resolver.kind();
            event!(Level::DEBUG, kind, source = %ctx.source, "resolve");
            let result = resolver.resolve(self, &ctx);
            if let Err(error) = &result {
                warn!(kind, %error, "step failed");
                if outcome.is_ok() {
                    outcome = Err(error.clone());
                }
            }
            self.stack.record(ExecutedStep {
                kind,
                source: ctx.source,
                result,
            });
        }
        outcome
    }

    /// Plays a card from a player's hand. Validation happens inside the
    /// pushed primary resolver, so a rejected use mutates nothing.
    pub fn use_card(
        &mut self,
        source: Seat,
        card: CardId,
        choice: Option<ChoiceResult>,
    ) -> ResolutionResult {
        let Some(player) = self.game.player(source) else {
            return Err(ResolutionError::new(
                FailureKind::InvalidTarget,
                "resolution.use.unknownPlayer",
            ));
        };
        if !player.alive {
            return Err(ResolutionError::new(
                FailureKind::TargetNotAlive,
                "resolution.use.playerNotAlive",
            ));
        }
        let Some(played) = player.hand.get(card) else {
            return Err(ResolutionError::new(
                FailureKind::CardNotFound,
                "resolution.use.cardNotInHand",
            ));
        };
        let subtype = played.subtype;

        let ctx = ResolutionCtx::root(source)
            .with_action(card)
            .with_choice(choice.clone());
        match subtype {
            CardSubtype::Slash => self.push(Resolver::SlashUse(SlashUse), ctx),
            CardSubtype::Peach => self.push(Resolver::PeachUse(PeachUse), ctx),
            CardSubtype::Steal => self.push(Resolver::StealUse(StealUse), ctx),
            CardSubtype::Dismantle => self.push(Resolver::DismantleUse(DismantleUse), ctx),
            CardSubtype::JieDaoShaRen => {
                self.push(Resolver::JieDaoShaRenUse(JieDaoShaRenUse), ctx)
            }
            CardSubtype::Taoyuan => self.push(Resolver::TaoyuanUse(TaoyuanUse), ctx),
            CardSubtype::Lebusishu | CardSubtype::Shandian => {
                return self.place_delayed_trick(source, card, subtype, choice);
            }
            CardSubtype::Weapon => return self.equip(source, card),
            CardSubtype::Dodge | CardSubtype::Nullification => {
                return Err(ResolutionError::new(
                    FailureKind::InvalidState,
                    "resolution.use.responseOnly",
                ));
            }
        }
        self.run()
    }

    /// Judgement-phase entry: fires every delayed trick the owner holds.
    pub fn run_judgement_phase(&mut self, owner: Seat) -> ResolutionResult {
        self.game.turn.active = owner;
        self.game.turn.phase = Phase::Judgement;
        let ctx = ResolutionCtx::root(owner);
        self.push(
            Resolver::DelayedTrickPhase(DelayedTrickPhase { owner }),
            ctx,
        );
        self.run()
    }

    pub fn activate_luoshen(&mut self, player: Seat) -> ResolutionResult {
        let ctx = ResolutionCtx::root(player);
        self.push(Resolver::LuoshenLoop(LuoshenLoop { player }), ctx);
        self.run()
    }

    /// External entry for rule-driven damage (skills, traps).
    pub fn deal_damage(&mut self, damage: DamageDescriptor) -> ResolutionResult {
        let source = damage.source.unwrap_or(damage.target);
        let ctx = ResolutionCtx::root(source).with_damage(damage);
        self.push(Resolver::Damage(Damage), ctx);
        self.run()
    }

    /// External entry for health loss that must not count as damage.
    pub fn lose_hp(&mut self, target: Seat, amount: u32) -> ResolutionResult {
        let ctx = ResolutionCtx::root(target);
        self.push(Resolver::LoseHp(LoseHp { target, amount }), ctx);
        self.run()
    }

    pub(crate) fn request_choice(
        &mut self,
        request: ChoiceRequest,
    ) -> Result<ChoiceResult, ResolutionError> {
        let Some(mut handler) = self.choices.take() else {
            return Err(ResolutionError::new(
                FailureKind::InvalidState,
                "resolution.choice.handlerMissing",
            ));
        };
        let reply = handler.choose(&self.game, &request);
        event!(Level::DEBUG, request_id = %request.request_id, ?reply, "choice");
        self.choices = Some(handler);
        Ok(reply)
    }

    pub(crate) fn recover_hp(&mut self, seat: Seat, amount: u32) -> u32 {
        let Some(player) = self.game.player_mut(seat) else {
            return 0;
        };
        let applied = player.heal(amount);
        let hp_after = player.health;
        if applied > 0 {
            self.publish(GameEvent::HpRecovered {
                seat,
                amount: applied,
                hp_after,
            });
        }
        applied
    }

    fn place_delayed_trick(
        &mut self,
        source: Seat,
        card: CardId,
        subtype: CardSubtype,
        choice: Option<ChoiceResult>,
    ) -> ResolutionResult {
        let target = match subtype {
            CardSubtype::Lebusishu => {
                let Some(&target) = choice
                    .as_ref()
                    .and_then(|choice| choice.selected_target_seats.first())
                else {
                    return Err(ResolutionError::new(
                        FailureKind::InvalidTarget,
                        "resolution.lebusishu.missingTarget",
                    ));
                };
                if target == source {
                    return Err(ResolutionError::new(
                        FailureKind::InvalidTarget,
                        "resolution.lebusishu.selfTarget",
                    ));
                }
                if !self.game.is_alive(target) {
                    return Err(ResolutionError::new(
                        FailureKind::TargetNotAlive,
                        "resolution.lebusishu.targetNotAlive",
                    ));
                }
                target
            }
            _ => source,
        };

        let duplicate = self
            .game
            .player(target)
            .map(|player| {
                player
                    .judgement
                    .cards()
                    .iter()
                    .any(|held| held.subtype == subtype)
            })
            .unwrap_or(false);
        if duplicate {
            return Err(ResolutionError::new(
                FailureKind::InvalidState,
                "resolution.delayedtrick.duplicate",
            ));
        }

        self.move_single(CardMoveDescriptor::single(
            ZoneRef::hand(source),
            ZoneRef::judgement(target),
            card,
            MoveReason::Play,
        ))
        .map_err(ResolutionError::exception)
    }

    fn equip(&mut self, source: Seat, card: CardId) -> ResolutionResult {
        if let Some(previous) = self.game.weapon_of(source) {
            self.move_single(CardMoveDescriptor::single(
                ZoneRef::equipment(source),
                ZoneRef::discard_pile(),
                previous,
                MoveReason::Discard,
            ))
            .map_err(ResolutionError::exception)?;
        }
        self.move_single(CardMoveDescriptor::single(
            ZoneRef::hand(source),
            ZoneRef::equipment(source),
            card,
            MoveReason::Equip,
        ))
        .map_err(ResolutionError::exception)
    }
}
