use itertools::Itertools;
use pretty_assertions::assert_eq;

use crate::{
    _tests::{assert_settled, engine_with, give_hand, in_discard, stack_draw},
    card::{Card, CardId, CardSubtype, Suit},
    events::GameEvent,
    game::Game,
    judgement::{JudgementReason, JudgementRequest, JudgementRule},
    player::Seat,
    resolver::{judgement::Judgement, ResolutionCtx, Resolver},
    skills::{JudgementModifier, JudgementSubstitution},
};

fn run_judgement(db: &mut crate::engine::Engine, request: JudgementRequest) {
    let ctx = ResolutionCtx::root(request.owner);
    db.push(Resolver::Judgement(Judgement { request }), ctx);
    db.run().unwrap();
}

#[test]
fn reveal_evaluate_discard_in_order() {
    let (mut db, _script) = engine_with(2);
    let revealed = stack_draw(&mut db, Card::of(40, CardSubtype::Slash, Suit::Club, 9));

    run_judgement(
        &mut db,
        JudgementRequest::new(Seat(0), JudgementReason::Other, JudgementRule::Black),
    );

    assert!(in_discard(&db, revealed));
    let kinds = db
        .events
        .history()
        .iter()
        .map(|event| match event {
            GameEvent::CardMoved { reason, .. } => format!("move:{reason}"),
            GameEvent::BeforeJudgement { .. } => "before".to_string(),
            GameEvent::AfterJudgement { success, .. } => format!("after:{success}"),
            other => format!("{other:?}"),
        })
        .collect_vec();
    assert_eq!(
        kinds,
        vec!["move:Judgement", "before", "after:true", "move:Judgement"]
    );
    assert_settled(&db);
}

/// Swaps any about-to-fail judgement card for the modifier owner's first
/// hand card.
struct SwapFromHand {
    player: Seat,
}

impl JudgementModifier for SwapFromHand {
    fn id(&self) -> &str {
        "guicai"
    }

    fn propose(
        &self,
        game: &Game,
        request: &JudgementRequest,
        current: &Card,
    ) -> Option<JudgementSubstitution> {
        if request.rule.matches(current) {
            return None;
        }
        game.player(self.player)?
            .hand
            .cards()
            .first()
            .map(|card| JudgementSubstitution {
                player: self.player,
                replacement: card.id,
            })
    }
}

#[test]
fn a_modify_skill_substitutes_the_revealed_card() {
    let (mut db, _script) = engine_with(2);
    db.skills
        .register_judgement_modifier(Box::new(SwapFromHand { player: Seat(1) }));
    let revealed = stack_draw(&mut db, Card::of(40, CardSubtype::Slash, Suit::Spade, 9));
    let replacement = give_hand(&mut db, Seat(1), Card::of(41, CardSubtype::Dodge, Suit::Heart, 2));

    run_judgement(
        &mut db,
        JudgementRequest::new(Seat(0), JudgementReason::Skill, JudgementRule::Red),
    );

    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::AfterJudgement { success: true, .. })),
        1
    );
    assert!(in_discard(&db, revealed));
    assert!(in_discard(&db, replacement));
    assert!(db.game.player(Seat(1)).unwrap().hand.is_empty());
    assert!(db.log.contains("JudgementModified"));
    assert_settled(&db);
}

#[test]
fn modification_can_be_disallowed() {
    let (mut db, _script) = engine_with(2);
    db.skills
        .register_judgement_modifier(Box::new(SwapFromHand { player: Seat(1) }));
    stack_draw(&mut db, Card::of(40, CardSubtype::Slash, Suit::Spade, 9));
    let replacement = give_hand(&mut db, Seat(1), Card::of(41, CardSubtype::Dodge, Suit::Heart, 2));

    run_judgement(
        &mut db,
        JudgementRequest::new(Seat(0), JudgementReason::Skill, JudgementRule::Red)
            .allow_modify(false),
    );

    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::AfterJudgement { success: false, .. })),
        1
    );
    assert!(db.game.player(Seat(1)).unwrap().hand.contains(replacement));
    assert_settled(&db);
}

#[test]
fn an_exhausted_draw_pile_is_recoverable() {
    let (mut db, _script) = engine_with(2);

    run_judgement(
        &mut db,
        JudgementRequest::new(Seat(0), JudgementReason::Other, JudgementRule::Black),
    );

    assert!(db.log.contains("DrawPileExhausted"));
    assert!(db.events.history().is_empty());
    assert_settled(&db);
}

#[test]
fn kept_cards_stay_in_the_judgement_zone() {
    let (mut db, _script) = engine_with(2);
    let revealed = stack_draw(&mut db, Card::of(40, CardSubtype::Slash, Suit::Club, 9));

    run_judgement(
        &mut db,
        JudgementRequest::new(Seat(0), JudgementReason::Skill, JudgementRule::Black)
            .keep_final_card(true),
    );

    assert_eq!(
        db.game.player(Seat(0)).unwrap().judgement.ids(),
        vec![revealed]
    );
    assert_eq!(
        db.game.discard_pile.ids(),
        Vec::<CardId>::new()
    );
    assert_settled(&db);
}

