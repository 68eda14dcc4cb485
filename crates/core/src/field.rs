use crate::{Card, CardId, Catalog, CatalogError, RngState};
use std::collections::BTreeSet;

/// Action cards chosen for the current game.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Field {
    cards: BTreeSet<CardId>,
}

impl Field {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Selects or deselects an action card. Returns whether it is now selected.
    pub fn toggle(&mut self, catalog: &Catalog, id: CardId) -> Result<bool, CatalogError> {
        action(catalog, id)?;
        if self.cards.remove(&id) {
            return Ok(false);
        }
        self.cards.insert(id);
        Ok(true)
    }

    pub fn set(
        &mut self,
        catalog: &Catalog,
        ids: impl IntoIterator<Item = CardId>,
    ) -> Result<(), CatalogError> {
        let mut cards = BTreeSet::new();
        for id in ids {
            action(catalog, id)?;
            cards.insert(id);
        }
        self.cards = cards;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.cards.clear();
    }

    /// Replaces the field with `count` distinct action cards picked uniformly.
    pub fn randomize(&mut self, catalog: &Catalog, rng: &mut RngState, count: usize) {
        let actions: Vec<CardId> = catalog.action_cards().map(|card| card.id).collect();
        self.cards = rng.pick_distinct(&actions, count).into_iter().collect();
    }

    /// Field cards in sort order.
    pub fn cards<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a Card> + 'a {
        catalog
            .cards()
            .iter()
            .filter(move |card| self.cards.contains(&card.id))
    }

    /// Cards a player may add to the deck: the field plus the always-available
    /// cards, in sort order.
    pub fn addable_cards<'a>(&'a self, catalog: &'a Catalog) -> Vec<&'a Card> {
        catalog
            .cards()
            .iter()
            .filter(|card| self.cards.contains(&card.id) || card.kind.is_basic() || card.default_field)
            .collect()
    }
}

fn action(catalog: &Catalog, id: CardId) -> Result<&Card, CatalogError> {
    let card = catalog.card(id)?;
    if !card.is_action() {
        return Err(CatalogError::NotAction(id));
    }
    Ok(card)
}
