use crate::{
    card::CardSubtype,
    engine::Engine,
    player::Seat,
    resolver::{
        damage::{Damage, DamageDescriptor, DamageType},
        jie_dao_sha_ren::transfer_weapon,
        response::ResponseWindow,
        Resolve, ResolutionCtx, ResolutionResult, Resolver,
    },
    scratchpad::ResponseState,
};

/// "A must play a Slash at B": a response window requesting a Slash, with
/// the punitive branch behind it.
#[derive(Debug, Clone)]
pub struct ForcedSlash {
    pub attacker: Seat,
    pub victim: Seat,
    pub requester: Seat,
}

impl Resolve for ForcedSlash {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        ctx.scratch.clear_response();
        db.stack.push(
            Resolver::ForcedSlashOutcome(ForcedSlashOutcome {
                attacker: self.attacker,
                victim: self.victim,
                requester: self.requester,
            }),
            ctx.clone(),
        );
        db.stack.push(
            Resolver::ResponseWindow(ResponseWindow {
                responder: self.attacker,
                requested: CardSubtype::Slash,
            }),
            ctx.clone(),
        );
        Ok(())
    }
}

/// A provided Slash becomes an ordinary attack on the victim; a refusal
/// costs the attacker their weapon.
#[derive(Debug, Clone)]
pub struct ForcedSlashOutcome {
    pub attacker: Seat,
    pub victim: Seat,
    pub requester: Seat,
}

impl Resolve for ForcedSlashOutcome {
    fn resolve(&self, db: &mut Engine, ctx: &ResolutionCtx) -> ResolutionResult {
        let complied = matches!(
            ctx.scratch.response(),
            Some(outcome)
                if outcome.state == ResponseState::Success
                    && outcome.responder == self.attacker
        );

        if complied {
            let damage = DamageDescriptor::new(
                Some(self.attacker),
                self.victim,
                1,
                DamageType::Normal,
            )
            .reason("Slash")
            .preventable(true);
            db.stack.push(
                Resolver::Damage(Damage),
                ctx.for_source(self.attacker).with_damage(damage),
            );
            Ok(())
        } else {
            db.log.info(
                "ForcedSlashRefused",
                format!("{} refused to slash {}", self.attacker, self.victim),
            );
            transfer_weapon(db, self.attacker, self.requester)
        }
    }
}
