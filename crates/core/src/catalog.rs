use crate::{Card, CardId, CardType, CatalogError};
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only card table, built once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

#[derive(Debug)]
struct CatalogInner {
    cards: Vec<Card>,
    by_id: HashMap<CardId, usize>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(mut cards: Vec<Card>) -> Result<Self, CatalogError> {
        cards.sort_by_key(|card| (card.sort_order, card.id));
        let mut by_id = HashMap::with_capacity(cards.len());
        let mut by_name = HashMap::with_capacity(cards.len());
        for (idx, card) in cards.iter().enumerate() {
            if by_id.insert(card.id, idx).is_some() {
                return Err(CatalogError::DuplicateId(card.id));
            }
            if by_name.insert(card.name.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateName(card.name.clone()));
            }
        }
        Ok(Self {
            inner: Arc::new(CatalogInner {
                cards,
                by_id,
                by_name,
            }),
        })
    }

    /// All cards in sort order.
    pub fn cards(&self) -> &[Card] {
        &self.inner.cards
    }

    pub fn len(&self) -> usize {
        self.inner.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.cards.is_empty()
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.inner.by_id.get(&id).map(|&idx| &self.inner.cards[idx])
    }

    pub fn card(&self, id: CardId) -> Result<&Card, CatalogError> {
        self.get(id).ok_or(CatalogError::UnknownId(id))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Card> {
        self.inner
            .by_name
            .get(name)
            .map(|&idx| &self.inner.cards[idx])
    }

    pub fn card_named(&self, name: &str) -> Result<&Card, CatalogError> {
        self.find_by_name(name)
            .ok_or_else(|| CatalogError::UnknownName(name.to_string()))
    }

    /// Resolves a user-supplied name, falling back to a case-insensitive match.
    pub fn lookup(&self, name: &str) -> Result<&Card, CatalogError> {
        let trimmed = name.trim();
        if let Some(card) = self.find_by_name(trimmed) {
            return Ok(card);
        }
        self.inner
            .cards
            .iter()
            .find(|card| card.name.eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CatalogError::UnknownName(trimmed.to_string()))
    }

    pub fn action_cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.of_kind(CardType::Action)
    }

    pub fn of_kind(&self, kind: CardType) -> impl Iterator<Item = &Card> + '_ {
        self.inner.cards.iter().filter(move |card| card.kind == kind)
    }

    /// Cards that can always be added to a deck regardless of the field.
    pub fn default_field_cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.inner
            .cards
            .iter()
            .filter(|card| card.kind.is_basic() || card.default_field)
    }

    pub fn ptr_eq(&self, other: &Catalog) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
pub(crate) fn sample_catalog() -> Catalog {
    let mut cards = vec![
        Card::new(1, "Gold", CardType::Money, 3),
        Card::new(2, "Silver", CardType::Money, 2),
        Card::new(3, "Copper", CardType::Money, 1),
        Card::new(4, "Province", CardType::Point, 6),
        Card::new(5, "Duchy", CardType::Point, 3),
        Card::new(6, "Estate", CardType::Point, 1),
        Card::new(7, "Curse", CardType::Point, -1),
    ];
    for (offset, name) in [
        "Cellar", "Chapel", "Moat", "Vassal", "Workshop", "Merchant", "Harbinger", "Village",
        "Remodel", "Smithy", "Moneylender", "Throne Room",
    ]
    .into_iter()
    .enumerate()
    {
        cards.push(Card::new(8 + offset as u32, name, CardType::Action, 0));
    }
    Catalog::new(cards).expect("sample catalog")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_names() {
        let err = Catalog::new(vec![
            Card::new(1, "Copper", CardType::Money, 1),
            Card::new(2, "Copper", CardType::Money, 1),
        ])
        .expect_err("duplicate name must fail");
        assert_eq!(err, CatalogError::DuplicateName("Copper".to_string()));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Catalog::new(vec![
            Card::new(1, "Copper", CardType::Money, 1),
            Card::new(1, "Silver", CardType::Money, 2),
        ])
        .expect_err("duplicate id must fail");
        assert_eq!(err, CatalogError::DuplicateId(CardId(1)));
    }

    #[test]
    fn lookup_is_case_insensitive_fallback() {
        let catalog = sample_catalog();
        assert_eq!(catalog.lookup("throne room").expect("lookup").id, CardId(19));
        assert_eq!(catalog.lookup(" Copper ").expect("lookup").id, CardId(3));
        assert!(matches!(
            catalog.lookup("Platinum"),
            Err(CatalogError::UnknownName(_))
        ));
    }

    #[test]
    fn splits_basic_and_action_cards() {
        let catalog = sample_catalog();
        assert_eq!(catalog.action_cards().count(), 12);
        assert_eq!(catalog.default_field_cards().count(), 7);
        let orders: Vec<u32> = catalog.cards().iter().map(|card| card.sort_order).collect();
        let mut sorted = orders.clone();
        sorted.sort_unstable();
        assert_eq!(orders, sorted);
    }

    #[test]
    fn clones_share_the_table() {
        let catalog = sample_catalog();
        let shared = catalog.clone();
        assert!(catalog.ptr_eq(&shared));
    }
}
