use derive_more::Display;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    card::CardId,
    zone::{Zone, ZoneKind, ZoneOwner},
};

/// Seat number. Seat order defines adjacency; seats wrap around the table.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[display(fmt = "P{}", _0)]
pub struct Seat(pub usize);

impl Seat {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum PlayerFlag {
    SkipPlayPhase,
    SkipDrawPhase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub seat: Seat,
    pub alive: bool,
    pub health: i32,
    pub max_health: i32,
    pub hand: Zone,
    pub equipment: Zone,
    pub judgement: Zone,
    pub flags: IndexMap<PlayerFlag, bool>,
}

impl Player {
    pub fn new(seat: Seat, max_health: i32) -> Self {
        let owner = ZoneOwner::Player(seat);
        Self {
            seat,
            alive: true,
            health: max_health,
            max_health,
            hand: Zone::new(owner, ZoneKind::Hand),
            equipment: Zone::new(owner, ZoneKind::Equipment),
            judgement: Zone::new(owner, ZoneKind::Judgement),
            flags: IndexMap::default(),
        }
    }

    /// Restores up to `amount` health, never past the maximum. Returns the
    /// amount actually applied.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let headroom = (self.max_health - self.health).max(0) as u32;
        let applied = amount.min(headroom);
        self.health += applied as i32;
        applied
    }

    pub fn set_flag(&mut self, flag: PlayerFlag, value: bool) {
        self.flags.insert(flag, value);
    }

    pub fn flag(&self, flag: PlayerFlag) -> bool {
        self.flags.get(&flag).copied().unwrap_or(false)
    }

    /// First weapon in the equipment zone, if any.
    pub fn weapon(&self) -> Option<CardId> {
        self.equipment
            .cards()
            .iter()
            .find(|card| matches!(card.subtype, crate::card::CardSubtype::Weapon))
            .map(|card| card.id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn heal_caps_at_max_health() {
        let mut player = Player::new(Seat(0), 4);
        player.health = 2;
        assert_eq!(player.heal(1), 1);
        assert_eq!(player.heal(5), 1);
        assert_eq!(player.health, 4);
        assert_eq!(player.heal(1), 0);
    }

    #[test]
    fn flags_default_unset() {
        let mut player = Player::new(Seat(1), 3);
        assert!(!player.flag(PlayerFlag::SkipPlayPhase));
        player.set_flag(PlayerFlag::SkipPlayPhase, true);
        assert!(player.flag(PlayerFlag::SkipPlayPhase));
    }
}
