use pretty_assertions::assert_eq;

use crate::{
    _tests::{assert_settled, engine_with, give_hand},
    card::{Card, CardSubtype, Suit},
    choices::ChoiceResult,
    events::GameEvent,
    player::Seat,
};

/// Nullification parity: the effect fires iff the un-countered chain has
/// even length. Exercised through a dismantle aimed at seat 1's hand.
fn run_chain(counters: &[(Seat, u64)]) -> (crate::engine::Engine, crate::card::CardId) {
    let (mut db, script) = engine_with(3);
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Dismantle, Suit::Club, 4));
    let loot = give_hand(&mut db, Seat(1), Card::of(10, CardSubtype::Slash, Suit::Spade, 7));

    script.enqueue(ChoiceResult::cards([loot]));
    for &(seat, id) in counters {
        let counter = give_hand(
            &mut db,
            seat,
            Card::of(id, CardSubtype::Nullification, Suit::Club, 3),
        );
        script.enqueue(ChoiceResult::cards([counter]));
    }

    db.use_card(Seat(0), trick, Some(ChoiceResult::targets([Seat(1)])))
        .unwrap();
    (db, loot)
}

#[test]
fn zero_counters_let_the_effect_fire() {
    let (db, loot) = run_chain(&[]);
    assert!(db.game.discard_pile.contains(loot));
    assert_settled(&db);
}

#[test]
fn one_counter_nullifies() {
    let (db, loot) = run_chain(&[(Seat(1), 20)]);
    assert!(db.game.player(Seat(1)).unwrap().hand.contains(loot));
    assert_settled(&db);
}

#[test]
fn two_counters_cancel_out() {
    let (db, loot) = run_chain(&[(Seat(1), 20), (Seat(2), 21)]);
    assert!(db.game.discard_pile.contains(loot));
    assert_settled(&db);
}

#[test]
fn three_counters_nullify_again() {
    let (db, loot) = run_chain(&[(Seat(1), 20), (Seat(2), 21), (Seat(1), 22)]);
    assert!(db.game.player(Seat(1)).unwrap().hand.contains(loot));
    assert_settled(&db);
}

#[test]
fn an_untargeted_mass_trick_skips_the_protocol() {
    let (mut db, script) = engine_with(3);
    for seat in [Seat(0), Seat(1), Seat(2)] {
        db.game.player_mut(seat).unwrap().health = 2;
    }
    // A held Nullification must never even be solicited.
    give_hand(
        &mut db,
        Seat(1),
        Card::of(20, CardSubtype::Nullification, Suit::Club, 3),
    );
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Taoyuan, Suit::Heart, 1));

    let result = db.use_card(Seat(0), trick, None);

    assert_eq!(result, Ok(()));
    for seat in [Seat(0), Seat(1), Seat(2)] {
        assert_eq!(db.game.health(seat), 3);
    }
    assert!(script.requests().is_empty());
    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::HpRecovered { .. })),
        3
    );
    assert_settled(&db);
}

#[test]
fn full_health_players_gain_nothing_from_the_feast() {
    let (mut db, _script) = engine_with(2);
    db.game.player_mut(Seat(1)).unwrap().health = 1;
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Taoyuan, Suit::Heart, 1));

    db.use_card(Seat(0), trick, None).unwrap();

    assert_eq!(db.game.health(Seat(0)), 4);
    assert_eq!(db.game.health(Seat(1)), 2);
    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::HpRecovered { .. })),
        1
    );
    assert_settled(&db);
}
