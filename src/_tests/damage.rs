use std::{cell::RefCell, rc::Rc};

use itertools::Itertools;
use pretty_assertions::assert_eq;

use crate::{
    _tests::{assert_settled, engine_with, give_hand},
    card::{Card, CardSubtype, Suit},
    choices::ChoiceResult,
    events::GameEvent,
    player::Seat,
    resolver::damage::{DamageDescriptor, DamageType},
};

#[test]
fn unpreventable_damage_never_opens_a_window() {
    let (mut db, script) = engine_with(2);
    give_hand(&mut db, Seat(1), Card::of(10, CardSubtype::Dodge, Suit::Heart, 2));

    let result = db.deal_damage(
        DamageDescriptor::new(Some(Seat(0)), Seat(1), 1, DamageType::Fire).reason("test"),
    );

    assert_eq!(result, Ok(()));
    assert_eq!(db.game.health(Seat(1)), 3);
    assert!(script.requests().is_empty());
    assert_settled(&db);
}

#[test]
fn transferred_damage_redirects_before_anything_else() {
    let (mut db, _script) = engine_with(3);

    db.deal_damage(
        DamageDescriptor::new(Some(Seat(0)), Seat(1), 1, DamageType::Normal)
            .transferred_to(Seat(2)),
    )
    .unwrap();

    assert_eq!(db.game.health(Seat(1)), 4);
    assert_eq!(db.game.health(Seat(2)), 3);
    assert_eq!(
        db.events.count_matching(|event| matches!(
            event,
            GameEvent::BeforeDamage { damage } if damage.target == Seat(2)
        )),
        1
    );
    assert_settled(&db);
}

#[test]
fn a_peach_rescues_the_dying_player() {
    let (mut db, script) = engine_with(2);
    db.game.player_mut(Seat(1)).unwrap().health = 1;
    let peach = give_hand(&mut db, Seat(0), Card::of(20, CardSubtype::Peach, Suit::Heart, 3));

    script.enqueue(ChoiceResult::cards([peach]));
    db.deal_damage(DamageDescriptor::new(Some(Seat(0)), Seat(1), 1, DamageType::Normal))
        .unwrap();

    assert!(db.game.is_alive(Seat(1)));
    assert_eq!(db.game.health(Seat(1)), 1);

    // Damage, then the dying window, then the deferred AfterDamage.
    let interesting = db
        .events
        .history()
        .iter()
        .filter(|event| {
            matches!(
                event,
                GameEvent::Damage { .. }
                    | GameEvent::Dying { .. }
                    | GameEvent::HpRecovered { .. }
                    | GameEvent::AfterDamage { .. }
            )
        })
        .collect_vec();
    assert!(matches!(interesting[0], GameEvent::Damage { .. }));
    assert!(matches!(interesting[1], GameEvent::Dying { .. }));
    assert!(matches!(interesting[2], GameEvent::HpRecovered { .. }));
    assert!(matches!(interesting[3], GameEvent::AfterDamage { .. }));
    assert_settled(&db);
}

#[test]
fn an_unrescued_player_dies_and_sheds_cards() {
    let (mut db, _script) = engine_with(2);
    db.game.player_mut(Seat(1)).unwrap().health = 1;
    let held = give_hand(&mut db, Seat(1), Card::of(10, CardSubtype::Slash, Suit::Spade, 7));

    db.deal_damage(DamageDescriptor::new(Some(Seat(0)), Seat(1), 1, DamageType::Normal))
        .unwrap();

    assert!(!db.game.is_alive(Seat(1)));
    assert!(db.game.discard_pile.contains(held));
    assert!(db.game.player(Seat(1)).unwrap().hand.is_empty());
    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::PlayerDied { .. })),
        1
    );
    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::AfterDamage { .. })),
        0
    );
    assert_settled(&db);
}

#[test]
fn hp_loss_wakes_no_damage_listener() {
    let (mut db, _script) = engine_with(2);
    let damage_seen = Rc::new(RefCell::new(0usize));
    let counter = Rc::clone(&damage_seen);
    db.events.subscribe(move |_db, event| {
        if matches!(
            event,
            GameEvent::BeforeDamage { .. } | GameEvent::Damage { .. } | GameEvent::AfterDamage { .. }
        ) {
            *counter.borrow_mut() += 1;
        }
    });

    db.lose_hp(Seat(1), 1).unwrap();

    assert_eq!(db.game.health(Seat(1)), 3);
    assert_eq!(*damage_seen.borrow(), 0);
    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::HpLost { .. })),
        1
    );
    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::AfterHpLost { .. })),
        1
    );
    assert_settled(&db);
}

#[test]
fn after_hp_lost_is_suppressed_when_the_player_dies() {
    let (mut db, _script) = engine_with(2);
    db.game.player_mut(Seat(1)).unwrap().health = 1;

    db.lose_hp(Seat(1), 1).unwrap();

    assert!(!db.game.is_alive(Seat(1)));
    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::AfterHpLost { .. })),
        0
    );
    assert_settled(&db);
}

#[test]
fn after_hp_lost_still_fires_for_a_rescued_player() {
    let (mut db, script) = engine_with(2);
    db.game.player_mut(Seat(1)).unwrap().health = 1;
    let peach = give_hand(&mut db, Seat(0), Card::of(20, CardSubtype::Peach, Suit::Heart, 3));

    script.enqueue(ChoiceResult::cards([peach]));
    db.lose_hp(Seat(1), 1).unwrap();

    assert!(db.game.is_alive(Seat(1)));
    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::AfterHpLost { .. })),
        1
    );
    assert_settled(&db);
}

#[test]
fn a_peach_heals_one_point_and_only_below_max() {
    let (mut db, _script) = engine_with(2);
    db.game.player_mut(Seat(0)).unwrap().health = 2;
    let peach = give_hand(&mut db, Seat(0), Card::of(20, CardSubtype::Peach, Suit::Heart, 3));
    let spare = give_hand(&mut db, Seat(0), Card::of(21, CardSubtype::Peach, Suit::Heart, 4));

    db.use_card(Seat(0), peach, None).unwrap();
    assert_eq!(db.game.health(Seat(0)), 3);

    db.game.player_mut(Seat(0)).unwrap().health = 4;
    let error = db.use_card(Seat(0), spare, None).unwrap_err();
    assert_eq!(
        error.message_key.as_deref(),
        Some("resolution.peach.fullHealth")
    );
    assert!(db.game.player(Seat(0)).unwrap().hand.contains(spare));
    assert_settled(&db);
}

#[test]
fn zero_hp_loss_is_rejected() {
    let (mut db, _script) = engine_with(2);
    let error = db.lose_hp(Seat(1), 0).unwrap_err();
    assert_eq!(
        error.message_key.as_deref(),
        Some("resolution.loseHp.invalidAmount")
    );
    assert_eq!(db.game.health(Seat(1)), 4);
}
