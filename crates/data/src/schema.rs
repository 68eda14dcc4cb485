use serde::{Deserialize, Serialize};

pub use deckcalc_core::{Card, CardId, CardType, Catalog, StatsConfig};

/// One catalog row exactly as it appears in the CSV, before type conversion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardRow {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "defaultField")]
    pub default_field: String,
    #[serde(rename = "sortOrder")]
    pub sort_order: String,
    #[serde(default)]
    pub cost: String,
}
