use itertools::Itertools;

use crate::{
    card::{CardId, CardSubtype},
    game::Game,
    player::Seat,
};

#[derive(Debug, Clone)]
pub struct CardUsageContext {
    pub user: Seat,
    pub subtype: CardSubtype,
    pub card: Option<CardId>,
}

#[derive(Debug, Clone, Default)]
pub struct LegalTargets {
    pub items: Vec<Seat>,
}

impl LegalTargets {
    pub fn has_any(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn contains(&self, seat: Seat) -> bool {
        self.items.contains(&seat)
    }
}

/// External rule validation service. The engine asks it which seats a card
/// may legally be used against and how far apart two seats are.
pub trait RuleService {
    fn legal_targets(&self, game: &Game, usage: &CardUsageContext) -> LegalTargets;

    fn distance(&self, game: &Game, from: Seat, to: Seat) -> u32;
}

/// Default rules: distance is the ring-minimal number of steps over alive
/// seats, and reach-limited cards (Slash, Steal) reach distance 1. Range
/// modifiers from mounts and weapons belong to a richer external service.
#[derive(Debug, Default)]
pub struct SeatDistanceRules;

impl RuleService for SeatDistanceRules {
    fn legal_targets(&self, game: &Game, usage: &CardUsageContext) -> LegalTargets {
        let user = usage.user;
        let others = || {
            game.alive_seats_after(user)
                .into_iter()
                .filter(move |&seat| seat != user)
        };

        let items = match usage.subtype {
            CardSubtype::Slash | CardSubtype::Steal => others()
                .filter(|&seat| self.distance(game, user, seat) <= 1)
                .collect_vec(),
            CardSubtype::Peach => vec![user],
            _ => others().collect_vec(),
        };

        LegalTargets { items }
    }

    fn distance(&self, game: &Game, from: Seat, to: Seat) -> u32 {
        if from == to {
            return 0;
        }

        let ring: Vec<Seat> = game.alive_seats_from(Seat(0));
        let position = |seat: Seat| ring.iter().position(|&other| other == seat);
        let (Some(a), Some(b)) = (position(from), position(to)) else {
            return u32::MAX;
        };

        let raw = a.abs_diff(b);
        raw.min(ring.len() - raw) as u32
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn ring_distance_wraps() {
        let game = Game::new(4, 4);
        let rules = SeatDistanceRules;
        assert_eq!(rules.distance(&game, Seat(0), Seat(1)), 1);
        assert_eq!(rules.distance(&game, Seat(0), Seat(2)), 2);
        assert_eq!(rules.distance(&game, Seat(0), Seat(3)), 1);
        assert_eq!(rules.distance(&game, Seat(2), Seat(2)), 0);
    }

    #[test]
    fn dead_seats_shorten_the_ring() {
        let mut game = Game::new(4, 4);
        game.player_mut(Seat(1)).unwrap().alive = false;
        let rules = SeatDistanceRules;
        assert_eq!(rules.distance(&game, Seat(0), Seat(2)), 1);
    }

    #[test]
    fn slash_targets_are_within_reach() {
        let game = Game::new(4, 4);
        let rules = SeatDistanceRules;
        let targets = rules.legal_targets(
            &game,
            &CardUsageContext {
                user: Seat(0),
                subtype: CardSubtype::Slash,
                card: None,
            },
        );
        assert!(targets.contains(Seat(1)));
        assert!(targets.contains(Seat(3)));
        assert!(!targets.contains(Seat(2)));

        let dismantle = rules.legal_targets(
            &game,
            &CardUsageContext {
                user: Seat(0),
                subtype: CardSubtype::Dismantle,
                card: None,
            },
        );
        assert!(dismantle.contains(Seat(2)));
    }
}
