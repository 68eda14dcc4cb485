use crate::{draw_rate, CardId, CardType, Catalog, Deck, StatsConfig};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CardRow {
    pub id: CardId,
    pub name: String,
    pub kind: CardType,
    pub count: u32,
    pub share_percent: f64,
    /// Chance of at least one copy in a hand, or `None` when it cannot be computed.
    pub draw_rate: Option<f64>,
}

/// Everything the deck view shows except the expected value, which is
/// computed off the interactive path.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeckReport {
    pub size: usize,
    pub points: i64,
    pub hand_size: usize,
    pub rows: Vec<CardRow>,
}

impl DeckReport {
    pub fn build(deck: &Deck, catalog: &Catalog, config: &StatsConfig) -> Self {
        let size = deck.size();
        let rows = deck
            .cards(catalog)
            .map(|(card, count)| CardRow {
                id: card.id,
                name: card.name.clone(),
                kind: card.kind,
                count,
                share_percent: deck.share_percent(card.id),
                draw_rate: draw_rate(size, count as usize, config.hand_size).ok(),
            })
            .collect();
        Self {
            size,
            points: deck.points(catalog),
            hand_size: config.hand_size,
            rows,
        }
    }

    pub fn row(&self, id: CardId) -> Option<&CardRow> {
        self.rows.iter().find(|row| row.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_catalog;

    #[test]
    fn starter_report() {
        let catalog = sample_catalog();
        let deck = Deck::starter(&catalog).expect("starter");
        let report = DeckReport::build(&deck, &catalog, &StatsConfig::default());
        assert_eq!(report.size, 10);
        assert_eq!(report.points, 3);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].name, "Copper");
        assert_eq!(report.rows[0].share_percent, 70.0);
        assert_eq!(report.rows[0].draw_rate, Some(100.0));
        assert_eq!(report.rows[1].name, "Estate");
        assert_eq!(report.rows[1].draw_rate, Some(91.7));
    }

    #[test]
    fn small_deck_still_reports_certain_draws() {
        let catalog = sample_catalog();
        let mut deck = Deck::new();
        let gold = catalog.card_named("Gold").expect("card").id;
        deck.add(&catalog, gold).expect("add");
        let report = DeckReport::build(&deck, &catalog, &StatsConfig::default());
        assert_eq!(report.row(gold).and_then(|row| row.draw_rate), Some(100.0));
    }
}
