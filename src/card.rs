use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[display(fmt = "#{}", _0)]
pub struct CardId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Suit {
    Spade,
    Heart,
    Club,
    Diamond,
}

impl Suit {
    pub fn is_black(self) -> bool {
        matches!(self, Suit::Spade | Suit::Club)
    }

    pub fn is_red(self) -> bool {
        !self.is_black()
    }
}

/// Card rank, 1 (ace) through 13 (king).
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[display(fmt = "{}", _0)]
pub struct Rank(pub u8);

impl Rank {
    pub fn value(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum CardType {
    Basic,
    Trick,
    Equipment,
    DelayedTrick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum CardSubtype {
    Slash,
    Dodge,
    Peach,
    Nullification,
    Steal,
    Dismantle,
    JieDaoShaRen,
    Taoyuan,
    Lebusishu,
    Shandian,
    Weapon,
}

impl CardSubtype {
    pub fn card_type(self) -> CardType {
        match self {
            CardSubtype::Slash | CardSubtype::Dodge | CardSubtype::Peach => CardType::Basic,
            CardSubtype::Nullification
            | CardSubtype::Steal
            | CardSubtype::Dismantle
            | CardSubtype::JieDaoShaRen
            | CardSubtype::Taoyuan => CardType::Trick,
            CardSubtype::Lebusishu | CardSubtype::Shandian => CardType::DelayedTrick,
            CardSubtype::Weapon => CardType::Equipment,
        }
    }

    /// Default catalog key for the subtype. Real catalogs register richer
    /// definition ids (named weapons in particular); the engine only treats
    /// these as opaque lookup keys for the equipment-skill registry.
    pub fn def_id(self) -> &'static str {
        match self {
            CardSubtype::Slash => "slash",
            CardSubtype::Dodge => "dodge",
            CardSubtype::Peach => "peach",
            CardSubtype::Nullification => "wu_xie_ke_ji",
            CardSubtype::Steal => "shunshou_qianyang",
            CardSubtype::Dismantle => "guohe_chaiqiao",
            CardSubtype::JieDaoShaRen => "jie_dao_sha_ren",
            CardSubtype::Taoyuan => "taoyuan_jieyi",
            CardSubtype::Lebusishu => "le_bu_si_shu",
            CardSubtype::Shandian => "shan_dian",
            CardSubtype::Weapon => "weapon",
        }
    }
}

/// Cards are value-like and live in exactly one zone; the card-move service
/// is the only thing that relocates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub def_id: String,
    pub card_type: CardType,
    pub subtype: CardSubtype,
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn new(
        id: CardId,
        def_id: impl Into<String>,
        subtype: CardSubtype,
        suit: Suit,
        rank: Rank,
    ) -> Self {
        Self {
            id,
            def_id: def_id.into(),
            card_type: subtype.card_type(),
            subtype,
            suit,
            rank,
        }
    }

    /// Shorthand constructor using the subtype's default catalog key.
    pub fn of(id: u64, subtype: CardSubtype, suit: Suit, rank: u8) -> Self {
        Self::new(CardId(id), subtype.def_id(), subtype, suit, Rank(rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtype_maps_to_card_type() {
        assert_eq!(CardSubtype::Slash.card_type(), CardType::Basic);
        assert_eq!(CardSubtype::Steal.card_type(), CardType::Trick);
        assert_eq!(CardSubtype::Shandian.card_type(), CardType::DelayedTrick);
        assert_eq!(CardSubtype::Weapon.card_type(), CardType::Equipment);
    }

    #[test]
    fn suit_color() {
        assert!(Suit::Spade.is_black());
        assert!(Suit::Club.is_black());
        assert!(Suit::Heart.is_red());
        assert!(Suit::Diamond.is_red());
    }
}
