use pretty_assertions::assert_eq;

use crate::{
    _tests::{assert_settled, engine_with, give_hand, in_discard},
    card::{Card, CardSubtype, Suit},
    choices::ChoiceResult,
    events::GameEvent,
    game::Game,
    player::{PlayerFlag, Seat},
    skills::EquipmentSkill,
};

/// Marks the bearer with a flag so attach/detach is observable.
struct MarkerSkill;

impl EquipmentSkill for MarkerSkill {
    fn id(&self) -> &str {
        "marker"
    }

    fn on_attach(&self, game: &mut Game, owner: Seat) {
        game.player_mut(owner).unwrap().set_flag(PlayerFlag::SkipDrawPhase, true);
    }

    fn on_detach(&self, game: &mut Game, owner: Seat) {
        game.player_mut(owner).unwrap().set_flag(PlayerFlag::SkipDrawPhase, false);
    }
}

fn equip_weapon(db: &mut crate::engine::Engine, seat: Seat, id: u64) -> crate::card::CardId {
    db.skills.register_equipment("qinggang", Box::new(MarkerSkill));
    let weapon = give_hand(db, seat, Card::new(
        crate::card::CardId(id),
        "qinggang",
        CardSubtype::Weapon,
        Suit::Spade,
        crate::card::Rank(6),
    ));
    db.use_card(seat, weapon, None).unwrap();
    weapon
}

#[test]
fn refusing_the_slash_surrenders_the_weapon() {
    let (mut db, script) = engine_with(3);
    let weapon = equip_weapon(&mut db, Seat(1), 30);
    assert!(db.skills.is_attached(weapon));
    assert!(db.game.player(Seat(1)).unwrap().flag(PlayerFlag::SkipDrawPhase));

    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::JieDaoShaRen, Suit::Club, 12));
    let result = db.use_card(
        Seat(0),
        trick,
        Some(ChoiceResult::targets([Seat(1), Seat(2)])),
    );

    assert_eq!(result, Ok(()));
    assert!(db.game.player(Seat(0)).unwrap().hand.contains(weapon));
    assert!(db.game.weapon_of(Seat(1)).is_none());
    assert!(!db.skills.is_attached(weapon));
    assert!(!db.game.player(Seat(1)).unwrap().flag(PlayerFlag::SkipDrawPhase));
    assert_eq!(
        db.events.count_matching(|event| matches!(
            event,
            GameEvent::WeaponTransferred { from, to, .. }
                if *from == Seat(1) && *to == Seat(0)
        )),
        1
    );
    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::Damage { .. })),
        0
    );
    assert_eq!(script.requests_for(Seat(1)), 0);
    assert_settled(&db);
}

#[test]
fn a_compelled_slash_hits_the_victim() {
    let (mut db, script) = engine_with(3);
    let weapon = equip_weapon(&mut db, Seat(1), 30);
    let slash = give_hand(&mut db, Seat(1), Card::of(31, CardSubtype::Slash, Suit::Heart, 10));
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::JieDaoShaRen, Suit::Club, 12));

    script.enqueue(ChoiceResult::cards([slash]));
    let result = db.use_card(
        Seat(0),
        trick,
        Some(ChoiceResult::targets([Seat(1), Seat(2)])),
    );

    assert_eq!(result, Ok(()));
    assert_eq!(db.game.health(Seat(2)), 3);
    assert!(in_discard(&db, slash));
    assert_eq!(db.game.weapon_of(Seat(1)), Some(weapon));
    assert_eq!(
        db.events.count_matching(|event| matches!(
            event,
            GameEvent::Damage { damage, .. } if damage.source == Some(Seat(1))
        )),
        1
    );
    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::BeforeJieDaoShaRenEffect { .. })),
        1
    );
    assert_settled(&db);
}

#[test]
fn an_unreachable_victim_forfeits_the_weapon_instead() {
    let (mut db, script) = engine_with(4);
    let weapon = equip_weapon(&mut db, Seat(1), 30);
    give_hand(&mut db, Seat(1), Card::of(31, CardSubtype::Slash, Suit::Heart, 10));
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::JieDaoShaRen, Suit::Club, 12));

    // Seat 3 is two steps from seat 1, beyond slash reach.
    let result = db.use_card(
        Seat(0),
        trick,
        Some(ChoiceResult::targets([Seat(1), Seat(3)])),
    );

    assert_eq!(result, Ok(()));
    assert!(db.game.player(Seat(0)).unwrap().hand.contains(weapon));
    assert_eq!(script.requests_for(Seat(1)), 0);
    assert!(db.log.contains("JieDaoShaRenIllegalTarget"));
    assert_settled(&db);
}

#[test]
fn a_nullification_spares_the_coerced_player() {
    let (mut db, script) = engine_with(3);
    let weapon = equip_weapon(&mut db, Seat(1), 30);
    let counter = give_hand(
        &mut db,
        Seat(2),
        Card::of(20, CardSubtype::Nullification, Suit::Club, 2),
    );
    let trick = give_hand(&mut db, Seat(0), Card::of(1, CardSubtype::JieDaoShaRen, Suit::Club, 12));

    script.enqueue(ChoiceResult::cards([counter]));
    let result = db.use_card(
        Seat(0),
        trick,
        Some(ChoiceResult::targets([Seat(1), Seat(2)])),
    );

    assert_eq!(result, Ok(()));
    assert_eq!(db.game.weapon_of(Seat(1)), Some(weapon));
    assert!(in_discard(&db, counter));
    assert!(db.log.contains("JieDaoShaRenNullified"));
    assert_eq!(
        db.events
            .count_matching(|event| matches!(event, GameEvent::WeaponTransferred { .. })),
        0
    );
    assert_settled(&db);
}
