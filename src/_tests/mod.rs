mod assistance;
mod damage;
mod guohe_chaiqiao;
mod jie_dao_sha_ren;
mod judgement;
mod lebusishu;
mod luoshen;
mod nullification;
mod response;
mod shandian;
mod shunshou_qianyang;

use crate::{
    card::{Card, CardId},
    choices::ScriptedChoices,
    engine::Engine,
    game::Game,
    player::Seat,
};

pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Engine over a fresh table plus the scripted-choice handle driving it.
pub(crate) fn engine_with(players: usize) -> (Engine, ScriptedChoices) {
    init_tracing();
    let mut engine = Engine::new(Game::new(players, 4));
    let script = ScriptedChoices::new();
    engine.set_choices(script.clone());
    (engine, script)
}

pub(crate) fn give_hand(db: &mut Engine, seat: Seat, card: Card) -> CardId {
    let id = card.id;
    db.game.player_mut(seat).unwrap().hand.add_top(card);
    id
}

pub(crate) fn give_equipment(db: &mut Engine, seat: Seat, card: Card) -> CardId {
    let id = card.id;
    db.game.player_mut(seat).unwrap().equipment.add_top(card);
    id
}

/// Stacks a card onto the draw pile; the last call is the next reveal.
pub(crate) fn stack_draw(db: &mut Engine, card: Card) -> CardId {
    let id = card.id;
    db.game.draw_pile.add_top(card);
    id
}

pub(crate) fn in_discard(db: &Engine, card: CardId) -> bool {
    db.game.discard_pile.contains(card)
}

/// Every action must leave the stack drained and zone membership exclusive.
pub(crate) fn assert_settled(db: &Engine) {
    assert!(db.stack.is_empty(), "resolution stack should be empty");
    db.game.validate_zones().expect("a card is in two zones");
}
