use itertools::Itertools;
use pretty_assertions::assert_eq;

use crate::{
    _tests::{assert_settled, engine_with, give_hand, in_discard},
    card::{Card, CardId, CardSubtype, Suit},
    choices::ChoiceResult,
    events::GameEvent,
    moves::MoveReason,
    player::Seat,
    resolver::FailureKind,
};

#[test]
fn steals_a_hand_card_at_distance_one() {
    let (mut db, script) = engine_with(2);
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Steal, Suit::Diamond, 3));
    let loot = give_hand(&mut db, Seat(1), Card::of(10, CardSubtype::Slash, Suit::Spade, 7));

    script.enqueue(ChoiceResult::cards([loot]));
    let result = db.use_card(Seat(0), trick, Some(ChoiceResult::targets([Seat(1)])));

    assert_eq!(result, Ok(()));
    assert!(db.game.player(Seat(0)).unwrap().hand.contains(loot));
    assert!(!db.game.player(Seat(1)).unwrap().hand.contains(loot));
    assert!(in_discard(&db, trick));
    assert_eq!(
        db.events.count_matching(|event| matches!(
            event,
            GameEvent::CardMoved {
                reason: MoveReason::Play,
                ..
            }
        )),
        1
    );
    assert_eq!(
        db.events.count_matching(|event| matches!(
            event,
            GameEvent::CardMoved {
                reason: MoveReason::Steal,
                ..
            }
        )),
        1
    );
    assert!(db.log.contains("ShunshouQianyangEffect"));
    assert_settled(&db);
}

#[test]
fn rejects_a_target_two_seats_away() {
    let (mut db, _script) = engine_with(4);
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Steal, Suit::Diamond, 3));
    give_hand(&mut db, Seat(2), Card::of(10, CardSubtype::Dodge, Suit::Heart, 2));

    let result = db.use_card(Seat(0), trick, Some(ChoiceResult::targets([Seat(2)])));

    let error = result.unwrap_err();
    assert_eq!(error.kind, FailureKind::InvalidTarget);
    assert_eq!(
        error.message_key.as_deref(),
        Some("resolution.shunshouqianyang.targetTooFar")
    );
    assert_eq!(error.details.get("Distance").map(String::as_str), Some("2"));
    assert!(db.events.history().is_empty());
    assert!(db.game.player(Seat(0)).unwrap().hand.contains(trick));
    assert_settled(&db);
}

#[test]
fn a_single_nullification_cancels_the_theft() {
    let (mut db, script) = engine_with(2);
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Steal, Suit::Diamond, 3));
    let loot = give_hand(&mut db, Seat(1), Card::of(10, CardSubtype::Slash, Suit::Spade, 7));
    let counter = give_hand(
        &mut db,
        Seat(1),
        Card::of(20, CardSubtype::Nullification, Suit::Club, 11),
    );

    script.enqueue(ChoiceResult::cards([loot]));
    script.enqueue(ChoiceResult::cards([counter]));
    let result = db.use_card(Seat(0), trick, Some(ChoiceResult::targets([Seat(1)])));

    assert_eq!(result, Ok(()));
    assert!(db.game.player(Seat(1)).unwrap().hand.contains(loot));
    assert!(in_discard(&db, counter));
    assert!(db.log.contains("ShunshouQianyangNullified"));
    assert!(!db.log.contains("ShunshouQianyangEffect"));
    assert_settled(&db);
}

#[test]
fn a_counter_nullification_restores_the_theft() {
    let (mut db, script) = engine_with(2);
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Steal, Suit::Diamond, 3));
    let loot = give_hand(&mut db, Seat(1), Card::of(10, CardSubtype::Slash, Suit::Spade, 7));
    let first = give_hand(
        &mut db,
        Seat(1),
        Card::of(20, CardSubtype::Nullification, Suit::Club, 11),
    );
    let second = give_hand(
        &mut db,
        Seat(0),
        Card::of(21, CardSubtype::Nullification, Suit::Spade, 4),
    );

    script.enqueue(ChoiceResult::cards([loot]));
    script.enqueue(ChoiceResult::cards([first]));
    script.enqueue(ChoiceResult::cards([second]));
    let result = db.use_card(Seat(0), trick, Some(ChoiceResult::targets([Seat(1)])));

    assert_eq!(result, Ok(()));
    assert!(db.game.player(Seat(0)).unwrap().hand.contains(loot));
    assert!(in_discard(&db, first));
    assert!(in_discard(&db, second));
    assert!(db.log.contains("ShunshouQianyangEffect"));
    assert_settled(&db);
}

#[test]
fn execution_history_records_the_steps() {
    let (mut db, script) = engine_with(2);
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Steal, Suit::Diamond, 3));
    let loot = give_hand(&mut db, Seat(1), Card::of(10, CardSubtype::Slash, Suit::Spade, 7));

    script.enqueue(ChoiceResult::cards([loot]));
    db.use_card(Seat(0), trick, Some(ChoiceResult::targets([Seat(1)])))
        .unwrap();

    let kinds = db
        .stack
        .history()
        .iter()
        .map(|step| step.kind)
        .collect_vec();
    assert_eq!(kinds, vec!["StealUse", "Nullification", "StealEffect"]);
    assert!(db.stack.history().iter().all(|step| step.result.is_ok()));
}
