use pretty_assertions::assert_eq;

use crate::{
    _tests::{assert_settled, engine_with, give_hand, in_discard},
    card::{Card, CardSubtype, Suit},
    choices::ChoiceResult,
    events::GameEvent,
    game::Game,
    player::Seat,
    skills::AssistanceSkill,
};

/// Hujia-style protection: fixed helpers answer dodge windows for the lord.
struct ProtectedLord {
    lord: Seat,
    helpers: Vec<Seat>,
}

impl AssistanceSkill for ProtectedLord {
    fn id(&self) -> &str {
        "hujia"
    }

    fn assistants(&self, _game: &Game, beneficiary: Seat, requested: CardSubtype) -> Vec<Seat> {
        if beneficiary == self.lord && requested == CardSubtype::Dodge {
            self.helpers.clone()
        } else {
            Vec::new()
        }
    }
}

#[test]
fn the_first_willing_assistant_provides_the_card() {
    let (mut db, script) = engine_with(4);
    db.skills.register_assistance(Box::new(ProtectedLord {
        lord: Seat(2),
        helpers: vec![Seat(1), Seat(3)],
    }));
    let slash = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Slash, Suit::Spade, 8));
    let dodge = give_hand(&mut db, Seat(1), Card::of(10, CardSubtype::Dodge, Suit::Heart, 2));
    give_hand(&mut db, Seat(3), Card::of(11, CardSubtype::Dodge, Suit::Diamond, 5));

    script.enqueue(ChoiceResult::confirm());
    script.enqueue(ChoiceResult::cards([dodge]));
    let result = db.use_card(Seat(3), slash, Some(ChoiceResult::targets([Seat(2)])));

    assert_eq!(result, Ok(()));
    assert_eq!(db.game.health(Seat(2)), 4);
    assert!(in_discard(&db, dodge));
    assert!(db.log.contains("ResponseAssisted"));
    // Seat 3 was never consulted as an assistant: one assistance sufficed.
    assert_eq!(
        script
            .requests()
            .iter()
            .filter(|request| request.player == Seat(3)
                && request.kind == crate::choices::ChoiceKind::Confirm)
            .count(),
        0
    );
    assert_settled(&db);
}

#[test]
fn declined_assistance_falls_back_to_the_beneficiary() {
    let (mut db, script) = engine_with(3);
    db.skills.register_assistance(Box::new(ProtectedLord {
        lord: Seat(2),
        helpers: vec![Seat(0)],
    }));
    let slash = give_hand(&mut db, Seat(1), Card::of(1, CardSubtype::Slash, Suit::Spade, 8));
    give_hand(&mut db, Seat(0), Card::of(10, CardSubtype::Dodge, Suit::Heart, 2));
    let own = give_hand(&mut db, Seat(2), Card::of(11, CardSubtype::Dodge, Suit::Diamond, 5));

    script.enqueue(ChoiceResult::pass());
    script.enqueue(ChoiceResult::cards([own]));
    db.use_card(Seat(1), slash, Some(ChoiceResult::targets([Seat(2)])))
        .unwrap();

    assert_eq!(db.game.health(Seat(2)), 4);
    assert!(in_discard(&db, own));
    assert!(db.game.player(Seat(0)).unwrap().hand.len() == 1);
    assert_settled(&db);
}

#[test]
fn a_failed_assistant_window_moves_to_the_next_helper() {
    let (mut db, script) = engine_with(4);
    db.skills.register_assistance(Box::new(ProtectedLord {
        lord: Seat(2),
        helpers: vec![Seat(0), Seat(1)],
    }));
    let slash = give_hand(&mut db, Seat(3), Card::of(1, CardSubtype::Slash, Suit::Spade, 8));
    // Seat 0 is willing but holds no dodge; seat 1 delivers.
    let dodge = give_hand(&mut db, Seat(1), Card::of(10, CardSubtype::Dodge, Suit::Heart, 2));

    script.enqueue(ChoiceResult::confirm());
    script.enqueue(ChoiceResult::confirm());
    script.enqueue(ChoiceResult::cards([dodge]));
    db.use_card(Seat(3), slash, Some(ChoiceResult::targets([Seat(2)])))
        .unwrap();

    assert_eq!(db.game.health(Seat(2)), 4);
    assert!(in_discard(&db, dodge));
    assert_settled(&db);
}

#[test]
fn nobody_helping_and_no_own_dodge_means_damage() {
    let (mut db, script) = engine_with(3);
    db.skills.register_assistance(Box::new(ProtectedLord {
        lord: Seat(2),
        helpers: vec![Seat(0)],
    }));
    let slash = give_hand(&mut db, Seat(1), Card::of(1, CardSubtype::Slash, Suit::Spade, 8));
    give_hand(&mut db, Seat(0), Card::of(10, CardSubtype::Dodge, Suit::Heart, 2));

    script.enqueue(ChoiceResult::pass());
    db.use_card(Seat(1), slash, Some(ChoiceResult::targets([Seat(2)])))
        .unwrap();

    assert_eq!(db.game.health(Seat(2)), 3);
    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::Damage { .. })),
        1
    );
    assert_settled(&db);
}
