use pretty_assertions::assert_eq;

use crate::{
    _tests::{assert_settled, engine_with, give_hand, in_discard, stack_draw},
    card::{Card, CardSubtype, Suit},
    events::GameEvent,
    player::Seat,
    resolver::damage::DamageType,
};

#[test]
fn out_of_range_judgement_passes_the_bolt_along() {
    let (mut db, _script) = engine_with(3);
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Shandian, Suit::Spade, 1));
    let revealed = stack_draw(&mut db, Card::of(40, CardSubtype::Slash, Suit::Spade, 10));

    db.use_card(Seat(0), trick, None).unwrap();
    assert!(db.game.player(Seat(0)).unwrap().judgement.contains(trick));

    db.run_judgement_phase(Seat(0)).unwrap();

    assert!(db.game.player(Seat(1)).unwrap().judgement.contains(trick));
    assert!(!db.game.player(Seat(0)).unwrap().judgement.contains(trick));
    assert!(in_discard(&db, revealed));
    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::Damage { .. })),
        0
    );
    assert!(db.log.contains("ShandianMigrated"));
    assert_settled(&db);
}

#[test]
fn matching_judgement_strikes_for_three_thunder() {
    let (mut db, _script) = engine_with(3);
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Shandian, Suit::Spade, 1));
    stack_draw(&mut db, Card::of(40, CardSubtype::Slash, Suit::Spade, 5));

    db.use_card(Seat(0), trick, None).unwrap();
    db.run_judgement_phase(Seat(0)).unwrap();

    assert_eq!(db.game.health(Seat(0)), 1);
    assert!(in_discard(&db, trick));
    assert_eq!(
        db.events.count_matching(|event| matches!(
            event,
            GameEvent::Damage { damage, .. }
                if damage.amount == 3
                    && damage.damage_type == DamageType::Thunder
                    && damage.source.is_none()
        )),
        1
    );
    assert_settled(&db);
}

#[test]
fn a_lethal_bolt_opens_the_dying_window() {
    let (mut db, _script) = engine_with(3);
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Shandian, Suit::Spade, 1));
    stack_draw(&mut db, Card::of(40, CardSubtype::Slash, Suit::Spade, 5));
    db.game.player_mut(Seat(0)).unwrap().health = 2;

    db.use_card(Seat(0), trick, None).unwrap();
    db.run_judgement_phase(Seat(0)).unwrap();

    assert!(!db.game.is_alive(Seat(0)));
    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::PlayerDied { seat } if *seat == Seat(0))),
        1
    );
    // Nobody rescued the player, so the deferred AfterDamage is suppressed.
    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::AfterDamage { .. })),
        0
    );
    assert_settled(&db);
}
