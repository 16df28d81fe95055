use pretty_assertions::assert_eq;

use crate::{
    _tests::{assert_settled, engine_with, give_hand, in_discard, stack_draw},
    card::{Card, CardSubtype, Suit},
    choices::ChoiceResult,
    events::GameEvent,
    player::{PlayerFlag, Seat},
    resolver::FailureKind,
};

#[test]
fn failed_judgement_skips_the_play_phase() {
    let (mut db, _script) = engine_with(2);
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Lebusishu, Suit::Club, 6));
    let revealed = stack_draw(&mut db, Card::of(40, CardSubtype::Slash, Suit::Spade, 5));

    db.use_card(Seat(0), trick, Some(ChoiceResult::targets([Seat(1)])))
        .unwrap();
    assert!(db.game.player(Seat(1)).unwrap().judgement.contains(trick));

    let result = db.run_judgement_phase(Seat(1));

    assert_eq!(result, Ok(()));
    assert!(db.game.player(Seat(1)).unwrap().flag(PlayerFlag::SkipPlayPhase));
    assert!(in_discard(&db, trick));
    assert!(in_discard(&db, revealed));
    assert_eq!(
        db.events.count_matching(|event| matches!(
            event,
            GameEvent::AfterJudgement { success: false, .. }
        )),
        1
    );
    assert_settled(&db);
}

#[test]
fn heart_judgement_lets_the_player_proceed() {
    let (mut db, _script) = engine_with(2);
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Lebusishu, Suit::Club, 6));
    stack_draw(&mut db, Card::of(40, CardSubtype::Dodge, Suit::Heart, 7));

    db.use_card(Seat(0), trick, Some(ChoiceResult::targets([Seat(1)])))
        .unwrap();
    db.run_judgement_phase(Seat(1)).unwrap();

    assert!(!db.game.player(Seat(1)).unwrap().flag(PlayerFlag::SkipPlayPhase));
    assert!(in_discard(&db, trick));
    assert_eq!(
        db.events.count_matching(|event| matches!(
            event,
            GameEvent::AfterJudgement { success: true, .. }
        )),
        1
    );
    assert_settled(&db);
}

#[test]
fn a_second_copy_cannot_stack_on_the_same_player() {
    let (mut db, _script) = engine_with(2);
    let first = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Lebusishu, Suit::Club, 6));
    let second = give_hand(&mut db, Seat(0), Card::of(2, CardSubtype::Lebusishu, Suit::Spade, 9));

    db.use_card(Seat(0), first, Some(ChoiceResult::targets([Seat(1)])))
        .unwrap();
    let result = db.use_card(Seat(0), second, Some(ChoiceResult::targets([Seat(1)])));

    let error = result.unwrap_err();
    assert_eq!(error.kind, FailureKind::InvalidState);
    assert!(db.game.player(Seat(0)).unwrap().hand.contains(second));
    assert_settled(&db);
}
