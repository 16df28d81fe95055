use pretty_assertions::assert_eq;

use crate::{
    _tests::{assert_settled, engine_with, give_equipment, give_hand, in_discard},
    card::{Card, CardSubtype, Suit},
    choices::ChoiceResult,
    player::Seat,
    resolver::FailureKind,
};

#[test]
fn dismantles_equipment_across_the_table() {
    let (mut db, script) = engine_with(4);
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Dismantle, Suit::Club, 4));
    let weapon = give_equipment(&mut db, Seat(2), Card::of(30, CardSubtype::Weapon, Suit::Spade, 5));

    script.enqueue(ChoiceResult::cards([weapon]));
    let result = db.use_card(Seat(0), trick, Some(ChoiceResult::targets([Seat(2)])));

    assert_eq!(result, Ok(()));
    assert!(in_discard(&db, weapon));
    assert!(db.game.weapon_of(Seat(2)).is_none());
    assert!(db.log.contains("GuoheChaiqiaoEffect"));
    assert_settled(&db);
}

#[test]
fn fails_when_the_target_holds_nothing() {
    let (mut db, _script) = engine_with(2);
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Dismantle, Suit::Club, 4));

    let result = db.use_card(Seat(0), trick, Some(ChoiceResult::targets([Seat(1)])));

    let error = result.unwrap_err();
    assert_eq!(error.kind, FailureKind::InvalidState);
    assert_eq!(
        error.message_key.as_deref(),
        Some("resolution.guohechaiqiao.noCards")
    );
    assert!(db.game.player(Seat(0)).unwrap().hand.contains(trick));
    assert_settled(&db);
}

#[test]
fn rejects_targeting_yourself() {
    let (mut db, _script) = engine_with(2);
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Dismantle, Suit::Club, 4));
    give_hand(&mut db, Seat(0), Card::of(2, CardSubtype::Dodge, Suit::Heart, 2));

    let result = db.use_card(Seat(0), trick, Some(ChoiceResult::targets([Seat(0)])));

    assert_eq!(result.unwrap_err().kind, FailureKind::InvalidTarget);
    assert_settled(&db);
}
