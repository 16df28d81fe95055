use itertools::Itertools;
use pretty_assertions::assert_eq;

use crate::{
    _tests::{assert_settled, engine_with, in_discard, stack_draw},
    card::{Card, CardId, CardSubtype, Suit},
    choices::ChoiceResult,
    player::Seat,
};

#[test]
fn black_black_red_banks_two_cards_and_stops() {
    let (mut db, script) = engine_with(2);
    // Draw order: king of clubs, seven of spades, three of hearts.
    let red = stack_draw(&mut db, Card::of(32, CardSubtype::Peach, Suit::Heart, 3));
    let second = stack_draw(&mut db, Card::of(31, CardSubtype::Dodge, Suit::Spade, 7));
    let first = stack_draw(&mut db, Card::of(30, CardSubtype::Slash, Suit::Club, 13));

    script.enqueue(ChoiceResult::confirm());
    script.enqueue(ChoiceResult::confirm());
    let result = db.activate_luoshen(Seat(0));

    assert_eq!(result, Ok(()));
    let hand = db
        .game
        .player(Seat(0))
        .unwrap()
        .hand
        .cards()
        .iter()
        .map(|card| card.id)
        .collect_vec();
    assert_eq!(hand, vec![first, second]);
    assert!(in_discard(&db, red));
    assert!(db.game.draw_pile.is_empty());
    assert!(db.log.contains("LuoshenStop"));
    assert_settled(&db);
}

#[test]
fn declining_ends_the_run_after_one_card() {
    let (mut db, script) = engine_with(2);
    stack_draw(&mut db, Card::of(31, CardSubtype::Dodge, Suit::Spade, 7));
    let first = stack_draw(&mut db, Card::of(30, CardSubtype::Slash, Suit::Club, 13));

    script.enqueue(ChoiceResult::pass());
    let result = db.activate_luoshen(Seat(0));

    assert_eq!(result, Ok(()));
    assert!(db.game.player(Seat(0)).unwrap().hand.contains(first));
    assert_eq!(db.game.draw_pile.len(), 1);
    assert_settled(&db);
}

#[test]
fn an_empty_draw_pile_is_a_quiet_stop() {
    let (mut db, _script) = engine_with(2);
    let result = db.activate_luoshen(Seat(0));

    assert_eq!(result, Ok(()));
    assert!(db.log.contains("DrawPileExhausted"));
    assert_eq!(
        db.game.player(Seat(0)).unwrap().hand.cards(),
        &[] as &[Card]
    );
    assert_settled(&db);
}

#[test]
fn kept_cards_leave_the_judgement_zone_clean() {
    let (mut db, script) = engine_with(2);
    stack_draw(&mut db, Card::of(30, CardSubtype::Slash, Suit::Club, 13));

    script.enqueue(ChoiceResult::pass());
    db.activate_luoshen(Seat(0)).unwrap();

    assert_eq!(
        db.game.player(Seat(0)).unwrap().judgement.ids(),
        Vec::<CardId>::new()
    );
    assert_settled(&db);
}
