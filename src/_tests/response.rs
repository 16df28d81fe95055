use pretty_assertions::assert_eq;

use crate::{
    _tests::{assert_settled, engine_with, give_hand, in_discard, init_tracing},
    card::{Card, CardSubtype, Suit},
    choices::ChoiceResult,
    engine::Engine,
    events::GameEvent,
    game::Game,
    player::Seat,
    resolver::FailureKind,
    skills::ResponseConverter,
};

#[test]
fn a_dodge_prevents_the_slash() {
    let (mut db, script) = engine_with(2);
    let slash = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Slash, Suit::Spade, 8));
    let dodge = give_hand(&mut db, Seat(1), Card::of(10, CardSubtype::Dodge, Suit::Heart, 2));

    script.enqueue(ChoiceResult::cards([dodge]));
    let result = db.use_card(Seat(0), slash, Some(ChoiceResult::targets([Seat(1)])));

    assert_eq!(result, Ok(()));
    assert_eq!(db.game.health(Seat(1)), 4);
    assert!(in_discard(&db, dodge));
    assert!(db.log.contains("DamagePrevented"));
    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::Damage { .. })),
        0
    );
    // The window precedes any mutation of health.
    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::BeforeDamage { .. })),
        1
    );
    assert_settled(&db);
}

#[test]
fn passing_lets_the_damage_through() {
    let (mut db, script) = engine_with(2);
    let slash = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Slash, Suit::Spade, 8));
    let dodge = give_hand(&mut db, Seat(1), Card::of(10, CardSubtype::Dodge, Suit::Heart, 2));

    script.enqueue(ChoiceResult::pass());
    db.use_card(Seat(0), slash, Some(ChoiceResult::targets([Seat(1)])))
        .unwrap();

    assert_eq!(db.game.health(Seat(1)), 3);
    assert!(db.game.player(Seat(1)).unwrap().hand.contains(dodge));
    assert_settled(&db);
}

#[test]
fn an_empty_hand_fails_the_window_without_asking() {
    let (mut db, script) = engine_with(2);
    let slash = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Slash, Suit::Spade, 8));

    db.use_card(Seat(0), slash, Some(ChoiceResult::targets([Seat(1)])))
        .unwrap();

    assert_eq!(db.game.health(Seat(1)), 3);
    assert_eq!(script.requests_for(Seat(1)), 0);
    assert_settled(&db);
}

/// Any red card may stand in for a Dodge.
struct RedAsDodge;

impl ResponseConverter for RedAsDodge {
    fn id(&self) -> &str {
        "red_as_dodge"
    }

    fn converts(
        &self,
        _game: &Game,
        _responder: Seat,
        requested: CardSubtype,
        card: &Card,
    ) -> bool {
        requested == CardSubtype::Dodge && card.suit.is_red()
    }
}

#[test]
fn a_conversion_skill_widens_the_window() {
    let (mut db, script) = engine_with(2);
    db.skills.register_converter(Box::new(RedAsDodge));
    let slash = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Slash, Suit::Spade, 8));
    let peach = give_hand(&mut db, Seat(1), Card::of(10, CardSubtype::Peach, Suit::Diamond, 12));

    script.enqueue(ChoiceResult::cards([peach]));
    db.use_card(Seat(0), slash, Some(ChoiceResult::targets([Seat(1)])))
        .unwrap();

    assert_eq!(db.game.health(Seat(1)), 4);
    assert!(in_discard(&db, peach));
    assert_settled(&db);
}

#[test]
fn a_slash_cannot_reach_across_the_table() {
    let (mut db, _script) = engine_with(4);
    let slash = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Slash, Suit::Spade, 8));

    let result = db.use_card(Seat(0), slash, Some(ChoiceResult::targets([Seat(2)])));

    let error = result.unwrap_err();
    assert_eq!(error.kind, FailureKind::InvalidTarget);
    assert_eq!(
        error.message_key.as_deref(),
        Some("resolution.slash.targetOutOfRange")
    );
    assert!(db.game.player(Seat(0)).unwrap().hand.contains(slash));
    assert_settled(&db);
}

#[test]
fn a_missing_choice_handler_is_an_invalid_state() {
    init_tracing();
    let mut db = Engine::new(Game::new(2, 4));
    let slash = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::Slash, Suit::Spade, 8));
    give_hand(&mut db, Seat(1), Card::of(10, CardSubtype::Dodge, Suit::Heart, 2));

    let result = db.use_card(Seat(0), slash, Some(ChoiceResult::targets([Seat(1)])));

    let error = result.unwrap_err();
    assert_eq!(error.kind, FailureKind::InvalidState);
    assert_eq!(
        error.message_key.as_deref(),
        Some("resolution.choice.handlerMissing")
    );
    assert_settled(&db);
}
