use crate::{
    card::CardSubtype,
    engine::Engine,
    events::GameEvent,
    moves::{CardMoveDescriptor, MoveReason},
    player::Seat,
    resolver::{
        forced_slash::ForcedSlash,
        nullification::{NullifiableEffect, Nullification},
        discard_played,
        FailureKind, Resolve, ResolutionCtx, ResolutionError, ResolutionResult, Resolver,
    },
    rules::CardUsageContext,
    scratchpad::EffectKey,
    zone::ZoneRef,
};

/// Jie Dao Sha Ren: force a weapon-bearing player to attack a victim of
/// your choosing, or surrender the weapon.
#[derive(Debug, Clone)]
pub struct JieDaoShaRenUse;

impl Resolve for JieDaoShaRenUse {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        let Some(choice) = &ctx.choice else {
            return Err(ResolutionError::new(
                FailureKind::InvalidState,
                "resolution.jiedaosharen.missingChoice",
            ));
        };
        let &[slasher, victim] = choice.selected_target_seats.as_slice() else {
            return Err(ResolutionError::new(
                FailureKind::InvalidTarget,
                "resolution.jiedaosharen.missingTargets",
            ));
        };
        if slasher == victim || slasher == ctx.source {
            return Err(ResolutionError::new(
                FailureKind::InvalidTarget,
                "resolution.jiedaosharen.invalidPair",
            ));
        }
        for seat in [slasher, victim] {
            let Some(player) = db.game.player(seat) else {
                return Err(ResolutionError::new(
                    FailureKind::InvalidTarget,
                    "resolution.jiedaosharen.unknownTarget",
                ));
            };
            if !player.alive {
                return Err(ResolutionError::new(
                    FailureKind::TargetNotAlive,
                    "resolution.jiedaosharen.targetNotAlive",
                ));
            }
        }
        if db.game.weapon_of(slasher).is_none() {
            return Err(ResolutionError::new(
                FailureKind::InvalidState,
                "resolution.jiedaosharen.noWeapon",
            ));
        }

        discard_played(db, ctx)?;

        db.publish(GameEvent::BeforeJieDaoShaRenEffect {
            source: ctx.source,
            slasher,
            victim,
        });

        db.stack.push(
            Resolver::JieDaoShaRenEffect(JieDaoShaRenEffect { slasher, victim }),
            ctx.clone(),
        );
        db.stack.push(
            Resolver::Nullification(Nullification {
                effect: NullifiableEffect {
                    nullifiable: true,
                    key: EffectKey::JieDaoShaRen,
                    target: slasher,
                    causing_card: ctx.action,
                },
            }),
            ctx.clone(),
        );
        Ok(())
    }
}

/// Behind the nullification window: re-verifies the coerced attack is still
/// legal and either forces the Slash or claims the weapon.
#[derive(Debug, Clone)]
pub struct JieDaoShaRenEffect {
    pub slasher: Seat,
    pub victim: Seat,
}

impl Resolve for JieDaoShaRenEffect {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        if ctx.scratch.is_nullified(EffectKey::JieDaoShaRen, self.slasher) {
            db.log.info(
                "JieDaoShaRenNullified",
                format!("coercion of {} was nullified", self.slasher),
            );
            return Ok(());
        }
        if !db.game.is_alive(self.slasher) {
            db.log.info(
                "JieDaoShaRenSkipped",
                format!("{} died before being coerced", self.slasher),
            );
            return Ok(());
        }

        let usage = CardUsageContext {
            user: self.slasher,
            subtype: CardSubtype::Slash,
            card: None,
        };
        let legal = db.game.is_alive(self.victim)
            && db.rules.legal_targets(&db.game, &usage).contains(self.victim);

        if legal {
            db.stack.push(
                Resolver::ForcedSlash(ForcedSlash {
                    attacker: self.slasher,
                    victim: self.victim,
                    requester: ctx.source,
                }),
                ctx.clone(),
            );
            Ok(())
        } else {
            db.log.info(
                "JieDaoShaRenIllegalTarget",
                format!("{} can no longer slash {}", self.slasher, self.victim),
            );
            transfer_weapon(db, self.slasher, ctx.source)
        }
    }
}

/// Moves the coerced player's weapon into the requester's hand. Finding no
/// weapon is a successfully skipped step, not a failure.
pub(crate) fn transfer_weapon(db: &mut Engine, from: Seat, to: Seat) -> ResolutionResult {
    let Some(weapon) = db.game.weapon_of(from) else {
        db.log.info(
            "WeaponTransferSkipped",
            format!("{} has no weapon to surrender", from),
        );
        return Ok(());
    };

    db.move_single(CardMoveDescriptor::single(
        ZoneRef::equipment(from),
        ZoneRef::hand(to),
        weapon,
        MoveReason::Transfer,
    ))
    .map_err(ResolutionError::exception)?;

    db.publish(GameEvent::WeaponTransferred {
        from,
        to,
        card: weapon,
    });
    db.log.info(
        "WeaponTransferred",
        format!("{} surrendered {} to {}", from, weapon, to),
    );
    Ok(())
}
