use anyhow::{bail, Context};
use deckcalc_core::{Catalog, Deck, DeckSnapshot};

/// Splits `NAME=COUNT[,NAME=COUNT...]` into pairs.
fn split_pairs(spec: &str) -> anyhow::Result<Vec<(&str, u32)>> {
    let mut pairs = Vec::new();
    for item in spec.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        let Some((key, count)) = item.rsplit_once('=') else {
            bail!("expected NAME=COUNT, got {item:?}");
        };
        let count = count
            .trim()
            .parse()
            .with_context(|| format!("count for {:?}", key.trim()))?;
        pairs.push((key.trim(), count));
    }
    Ok(pairs)
}

/// Builds a deck from card names, e.g. `Copper=7,Estate=3`.
pub fn parse_deck(catalog: &Catalog, spec: &str) -> anyhow::Result<Deck> {
    let mut deck = Deck::new();
    for (name, count) in split_pairs(spec)? {
        let id = catalog.lookup(name)?.id;
        deck.add_many(catalog, id, count)?;
    }
    Ok(deck)
}

/// Builds a snapshot straight from draw values, e.g. `1=7,0=3`.
pub fn parse_values(spec: &str) -> anyhow::Result<DeckSnapshot> {
    let mut pairs = Vec::new();
    for (value, count) in split_pairs(spec)? {
        let value: i64 = value
            .parse()
            .with_context(|| format!("draw value {value:?}"))?;
        pairs.push((value, count));
    }
    Ok(DeckSnapshot::from(pairs))
}
