use crate::rounding::round_ratio;
use crate::{Card, CardId, Catalog, DeckError, DeckSnapshot, DrawEntry};
use std::collections::BTreeMap;

pub const STARTER_MONEY: &str = "Copper";
pub const STARTER_POINT: &str = "Estate";
pub const STARTER_MONEY_COUNT: u32 = 7;
pub const STARTER_POINT_COUNT: u32 = 3;

/// Cards a player has committed to, by count. Entries never hold zero.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Deck {
    counts: BTreeMap<CardId, u32>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// The opening deck: seven Copper and three Estate.
    pub fn starter(catalog: &Catalog) -> Result<Self, DeckError> {
        let mut deck = Self::new();
        let money = catalog.card_named(STARTER_MONEY)?.id;
        let point = catalog.card_named(STARTER_POINT)?.id;
        deck.counts.insert(money, STARTER_MONEY_COUNT);
        deck.counts.insert(point, STARTER_POINT_COUNT);
        Ok(deck)
    }

    pub fn reset(&mut self, catalog: &Catalog) -> Result<(), DeckError> {
        *self = Self::starter(catalog)?;
        Ok(())
    }

    pub fn add(&mut self, catalog: &Catalog, id: CardId) -> Result<u32, DeckError> {
        self.add_many(catalog, id, 1)
    }

    /// Adds `copies` of a card at once. Returns the new count.
    pub fn add_many(&mut self, catalog: &Catalog, id: CardId, copies: u32) -> Result<u32, DeckError> {
        catalog.card(id)?;
        if copies == 0 {
            return Ok(self.count(id));
        }
        let count = self.counts.entry(id).or_insert(0);
        *count = count
            .checked_add(copies)
            .ok_or(DeckError::CountOverflow(id))?;
        Ok(*count)
    }

    /// Takes one copy out, dropping the entry when it was the last.
    pub fn remove(&mut self, id: CardId) -> Result<u32, DeckError> {
        let Some(count) = self.counts.get_mut(&id) else {
            return Err(DeckError::NotInDeck(id));
        };
        if *count <= 1 {
            self.counts.remove(&id);
            return Ok(0);
        }
        *count -= 1;
        Ok(*count)
    }

    pub fn count(&self, id: CardId) -> u32 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    pub fn size(&self) -> usize {
        self.counts.values().map(|&count| count as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Score of the deck: point value times count over point cards.
    pub fn points(&self, catalog: &Catalog) -> i64 {
        self.cards(catalog)
            .map(|(card, count)| card.point_value() * i64::from(count))
            .sum()
    }

    /// Share of the deck taken by `id`, as a percentage to one decimal.
    pub fn share_percent(&self, id: CardId) -> f64 {
        let size = self.size();
        if size == 0 {
            return 0.0;
        }
        round_ratio(i128::from(self.count(id)) * 100, size as i128, 1)
    }

    /// Cards present in the deck with their counts, in catalog sort order.
    pub fn cards<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = (&'a Card, u32)> + 'a {
        catalog
            .cards()
            .iter()
            .filter_map(move |card| self.counts.get(&card.id).map(|&count| (card, count)))
    }

    pub fn snapshot(&self, catalog: &Catalog) -> DeckSnapshot {
        DeckSnapshot::new(
            self.cards(catalog)
                .map(|(card, count)| DrawEntry {
                    value: card.draw_value(),
                    count,
                })
                .collect(),
        )
    }
}
