use anyhow::{bail, Result};
use indexmap::IndexMap;
use itertools::Itertools;
use rand::{seq::SliceRandom, thread_rng};
use serde::{Deserialize, Serialize};

use crate::{
    card::{Card, CardId},
    player::{Player, Seat},
    zone::{Zone, ZoneKind, ZoneOwner, ZoneRef},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum Phase {
    Start,
    Judgement,
    Draw,
    Play,
    Discard,
    Finish,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnState {
    pub active: Seat,
    pub phase: Phase,
    pub turn_count: usize,
}

/// The passive table state: seated players plus the shared piles. Every card
/// is in exactly one zone at all times; only the card-move service changes
/// zone membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub players: Vec<Player>,
    pub draw_pile: Zone,
    pub discard_pile: Zone,
    pub turn: TurnState,
}

impl Game {
    pub fn new(players: usize, max_health: i32) -> Self {
        Self {
            players: (0..players)
                .map(|seat| Player::new(Seat(seat), max_health))
                .collect(),
            draw_pile: Zone::new(ZoneOwner::Game, ZoneKind::DrawPile),
            discard_pile: Zone::new(ZoneOwner::Game, ZoneKind::DiscardPile),
            turn: TurnState {
                active: Seat(0),
                phase: Phase::Start,
                turn_count: 0,
            },
        }
    }

    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.players.get(seat.index())
    }

    pub fn player_mut(&mut self, seat: Seat) -> Option<&mut Player> {
        self.players.get_mut(seat.index())
    }

    pub fn is_alive(&self, seat: Seat) -> bool {
        self.player(seat).map(|player| player.alive).unwrap_or(false)
    }

    pub fn health(&self, seat: Seat) -> i32 {
        self.player(seat).map(|player| player.health).unwrap_or(0)
    }

    /// Alive seats in seat order starting *after* `seat`, wrapping, with
    /// `seat` itself last. The solicitation order for nullification chains.
    pub fn alive_seats_after(&self, seat: Seat) -> Vec<Seat> {
        let count = self.players.len();
        (1..=count)
            .map(|offset| Seat((seat.index() + offset) % count))
            .filter(|&candidate| self.is_alive(candidate))
            .collect_vec()
    }

    /// Alive seats in seat order starting *at* `seat`, wrapping. The rescue
    /// order for a dying player.
    pub fn alive_seats_from(&self, seat: Seat) -> Vec<Seat> {
        let count = self.players.len();
        (0..count)
            .map(|offset| Seat((seat.index() + offset) % count))
            .filter(|&candidate| self.is_alive(candidate))
            .collect_vec()
    }

    /// Next alive player after `seat` in seat order, excluding `seat`.
    pub fn next_alive_after(&self, seat: Seat) -> Option<Seat> {
        self.alive_seats_after(seat)
            .into_iter()
            .find(|&candidate| candidate != seat)
    }

    pub fn zone(&self, zone: &ZoneRef) -> Option<&Zone> {
        match (zone.owner, zone.kind) {
            (ZoneOwner::Game, ZoneKind::DrawPile) => Some(&self.draw_pile),
            (ZoneOwner::Game, ZoneKind::DiscardPile) => Some(&self.discard_pile),
            (ZoneOwner::Player(seat), kind) => {
                let player = self.player(seat)?;
                match kind {
                    ZoneKind::Hand => Some(&player.hand),
                    ZoneKind::Equipment => Some(&player.equipment),
                    ZoneKind::Judgement => Some(&player.judgement),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    pub fn zone_mut(&mut self, zone: &ZoneRef) -> Option<&mut Zone> {
        match (zone.owner, zone.kind) {
            (ZoneOwner::Game, ZoneKind::DrawPile) => Some(&mut self.draw_pile),
            (ZoneOwner::Game, ZoneKind::DiscardPile) => Some(&mut self.discard_pile),
            (ZoneOwner::Player(seat), kind) => {
                let player = self.players.get_mut(seat.index())?;
                match kind {
                    ZoneKind::Hand => Some(&mut player.hand),
                    ZoneKind::Equipment => Some(&mut player.equipment),
                    ZoneKind::Judgement => Some(&mut player.judgement),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    pub fn find_card(&self, id: CardId) -> Option<(ZoneRef, &Card)> {
        for zone in self.all_zones() {
            if let Some(card) = zone.get(id) {
                return Some((zone.zone_ref(), card));
            }
        }
        None
    }

    pub fn weapon_of(&self, seat: Seat) -> Option<CardId> {
        self.player(seat)?.weapon()
    }

    pub fn shuffle_draw_pile(&mut self) {
        let mut cards = self.draw_pile.take_all();
        cards.shuffle(&mut thread_rng());
        for card in cards {
            self.draw_pile.add_top(card);
        }
    }

    fn all_zones(&self) -> impl Iterator<Item = &Zone> {
        self.players
            .iter()
            .flat_map(|player| {
                [&player.hand, &player.equipment, &player.judgement].into_iter()
            })
            .chain([&self.draw_pile, &self.discard_pile])
    }

    /// Every card id must appear in exactly one zone.
    pub fn validate_zones(&self) -> Result<()> {
        let mut seen: IndexMap<CardId, ZoneRef> = IndexMap::default();
        for zone in self.all_zones() {
            for card in zone.cards() {
                if let Some(previous) = seen.insert(card.id, zone.zone_ref()) {
                    bail!(
                        "card {} is in both {} and {}",
                        card.id,
                        previous,
                        zone.zone_ref()
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::card::{CardSubtype, Suit};

    #[test]
    fn seat_order_wraps_and_skips_dead() {
        let mut game = Game::new(4, 4);
        game.player_mut(Seat(2)).unwrap().alive = false;

        assert_eq!(
            game.alive_seats_after(Seat(1)),
            vec![Seat(3), Seat(0), Seat(1)]
        );
        assert_eq!(game.next_alive_after(Seat(1)), Some(Seat(3)));
        assert_eq!(
            game.alive_seats_from(Seat(3)),
            vec![Seat(3), Seat(0), Seat(1)]
        );
    }

    #[test]
    fn validate_zones_catches_duplicates() {
        let mut game = Game::new(2, 4);
        let card = Card::of(1, CardSubtype::Slash, Suit::Spade, 5);
        game.draw_pile.add_top(card.clone());
        assert!(game.validate_zones().is_ok());

        game.player_mut(Seat(0)).unwrap().hand.add_top(card);
        assert!(game.validate_zones().is_err());
    }
}
