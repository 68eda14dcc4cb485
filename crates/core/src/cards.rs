use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Money,
    Point,
    Action,
}

impl CardType {
    pub fn id(self) -> &'static str {
        match self {
            Self::Money => "money",
            Self::Point => "point",
            Self::Action => "action",
        }
    }

    pub fn from_id(value: &str) -> Option<Self> {
        match value {
            "money" => Some(Self::Money),
            "point" => Some(Self::Point),
            "action" => Some(Self::Action),
            _ => None,
        }
    }

    /// Money and point cards are always on offer; action cards depend on the field.
    pub fn is_basic(self) -> bool {
        matches!(self, Self::Money | Self::Point)
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub kind: CardType,
    #[serde(default)]
    pub value: i64,
    pub sort_order: u32,
    #[serde(default)]
    pub default_field: bool,
    #[serde(default)]
    pub cost: i64,
}

impl Card {
    pub fn new(id: u32, name: impl Into<String>, kind: CardType, value: i64) -> Self {
        Self {
            id: CardId(id),
            name: name.into(),
            kind,
            value,
            sort_order: id,
            default_field: false,
            cost: 0,
        }
    }

    pub fn is_money(&self) -> bool {
        self.kind == CardType::Money
    }

    pub fn is_point(&self) -> bool {
        self.kind == CardType::Point
    }

    pub fn is_action(&self) -> bool {
        self.kind == CardType::Action
    }

    /// Value this card contributes to a drawn hand. Only money counts.
    pub fn draw_value(&self) -> i64 {
        if self.is_money() {
            self.value
        } else {
            0
        }
    }

    /// Value this card contributes to the deck's score. Only point cards count.
    pub fn point_value(&self) -> i64 {
        if self.is_point() {
            self.value
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_value_ignores_non_money() {
        let copper = Card::new(3, "Copper", CardType::Money, 1);
        let estate = Card::new(6, "Estate", CardType::Point, 1);
        let smithy = Card::new(17, "Smithy", CardType::Action, 4);
        assert_eq!(copper.draw_value(), 1);
        assert_eq!(estate.draw_value(), 0);
        assert_eq!(smithy.draw_value(), 0);
        assert_eq!(estate.point_value(), 1);
        assert_eq!(copper.point_value(), 0);
    }

    #[test]
    fn card_type_ids_round_trip() {
        for kind in [CardType::Money, CardType::Point, CardType::Action] {
            assert_eq!(CardType::from_id(kind.id()), Some(kind));
        }
        assert_eq!(CardType::from_id("treasure"), None);
    }
}
