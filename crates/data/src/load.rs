use crate::schema::{Card, CardId, CardRow, CardType, Catalog, StatsConfig};
use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub const HAND_SIZE_ENV: &str = "DECKCALC_HAND_SIZE";
pub const EXPECTATION_DIGITS_ENV: &str = "DECKCALC_EXPECTATION_DIGITS";
pub const FIELD_SIZE_ENV: &str = "DECKCALC_FIELD_SIZE";

const BUILTIN_CARDS: &str = include_str!("../../../assets/cards.csv");

/// The base-set catalog compiled into the binary.
pub fn builtin_catalog() -> anyhow::Result<Catalog> {
    parse_catalog(BUILTIN_CARDS.as_bytes()).context("parse built-in catalog")
}

pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let file = fs::File::open(path).with_context(|| format!("read {}", path.display()))?;
    parse_catalog(file).with_context(|| format!("parse {}", path.display()))
}

pub fn parse_catalog(reader: impl Read) -> anyhow::Result<Catalog> {
    let mut rows = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut cards = Vec::new();
    // Line 1 is the header.
    for (index, row) in rows.deserialize::<CardRow>().enumerate() {
        let line = index + 2;
        let row = row.with_context(|| format!("line {line}"))?;
        cards.push(convert_row(&row).with_context(|| format!("line {line}"))?);
    }
    let catalog = Catalog::new(cards)?;
    info!(cards = catalog.len(), "card catalog loaded");
    Ok(catalog)
}

fn convert_row(row: &CardRow) -> anyhow::Result<Card> {
    let id = parse_number::<u32>(row, "id", &row.id)?;
    let Some(kind) = CardType::from_id(&row.kind) else {
        return cast_error(row, "type", &row.kind);
    };
    // Action rows leave value and cost empty; those read as zero.
    let value = parse_optional_number::<i64>(row, "value", &row.value)?;
    let cost = parse_optional_number::<i64>(row, "cost", &row.cost)?;
    let Some(default_field) = parse_bool(&row.default_field) else {
        return cast_error(row, "defaultField", &row.default_field);
    };
    let sort_order = parse_number::<u32>(row, "sortOrder", &row.sort_order)?;
    Ok(Card {
        id: CardId(id),
        name: row.name.clone(),
        kind,
        value,
        sort_order,
        default_field,
        cost,
    })
}

fn parse_number<T: std::str::FromStr>(row: &CardRow, key: &str, raw: &str) -> anyhow::Result<T> {
    match raw.parse() {
        Ok(value) => Ok(value),
        Err(_) => cast_error(row, key, raw),
    }
}

fn parse_optional_number<T: std::str::FromStr + Default>(
    row: &CardRow,
    key: &str,
    raw: &str,
) -> anyhow::Result<T> {
    if raw.is_empty() {
        return Ok(T::default());
    }
    parse_number(row, key, raw)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn cast_error<T>(row: &CardRow, key: &str, raw: &str) -> anyhow::Result<T> {
    bail!("cannot convert {key}:{raw:?} name:{}", row.name)
}

/// Reads statistics settings from JSON; missing fields take their defaults.
pub fn load_stats_config(path: &Path) -> anyhow::Result<StatsConfig> {
    let config: StatsConfig = load_json(path)?;
    config
        .validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(config)
}

/// Applies `DECKCALC_*` overrides from the process environment.
pub fn apply_env_overrides(config: StatsConfig) -> anyhow::Result<StatsConfig> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Applies overrides looked up through `lookup`, then validates the result.
pub fn apply_overrides(
    mut config: StatsConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<StatsConfig> {
    if let Some(raw) = lookup(HAND_SIZE_ENV) {
        config.hand_size = parse_env(HAND_SIZE_ENV, &raw)?;
    }
    if let Some(raw) = lookup(EXPECTATION_DIGITS_ENV) {
        config.expectation_digits = parse_env(EXPECTATION_DIGITS_ENV, &raw)?;
    }
    if let Some(raw) = lookup(FIELD_SIZE_ENV) {
        config.field_size = parse_env(FIELD_SIZE_ENV, &raw)?;
    }
    config.validate()?;
    Ok(config)
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    debug!(key, raw, "config override from environment");
    raw.trim()
        .parse()
        .with_context(|| format!("parse {key}={raw:?}"))
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const HEADER: &str = "id,name,type,value,defaultField,sortOrder,cost\n";

    fn parse(body: &str) -> anyhow::Result<Catalog> {
        parse_catalog(format!("{HEADER}{body}").as_bytes())
    }

    #[test]
    fn parses_rows_with_empty_values() {
        let catalog = parse("3,Copper,money,1,true,3,0\n17,Smithy,action,,false,17,4\n")
            .expect("parse");
        let smithy = catalog.card_named("Smithy").expect("smithy");
        assert_eq!(smithy.kind, CardType::Action);
        assert_eq!(smithy.value, 0);
        assert_eq!(smithy.cost, 4);
        assert!(!smithy.default_field);
        assert!(catalog.card_named("Copper").expect("copper").default_field);
    }

    #[test]
    fn accepts_capitalized_booleans() {
        let catalog = parse("1,Gold,money,3,TRUE,1,6\n2,Silver,money,2,False,2,3\n")
            .expect("parse");
        assert!(catalog.card_named("Gold").expect("gold").default_field);
        assert!(!catalog.card_named("Silver").expect("silver").default_field);
    }

    #[test]
    fn rejects_bad_boolean() {
        let err = parse("1,Gold,money,3,yes,1,6\n").expect_err("bad bool must fail");
        assert!(format!("{err:#}").contains("defaultField"));
        assert!(format!("{err:#}").contains("Gold"));
    }

    #[test]
    fn errors_name_the_file_line() {
        let err = parse("1,Gold,money,3,true,1,6\n2,Silver,money,two,true,2,3\n")
            .expect_err("bad value must fail");
        assert!(format!("{err:#}").contains("line 3"));
        let err = parse("1,Gold,money\n").expect_err("short row must fail");
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn rejects_bad_sort_order() {
        let err = parse("1,Gold,money,3,true,first,6\n").expect_err("bad order must fail");
        assert!(format!("{err:#}").contains("sortOrder"));
    }

    #[test]
    fn rejects_unknown_type() {
        let err = parse("1,Gold,treasure,3,true,1,6\n").expect_err("bad type must fail");
        assert!(format!("{err:#}").contains("type"));
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = parse("1,Gold,money,3,true,1,6\n2,Gold,money,2,true,2,3\n")
            .expect_err("duplicate must fail");
        assert!(format!("{err:#}").contains("duplicate"));
    }

    #[test]
    fn builtin_catalog_is_the_base_set() {
        let catalog = builtin_catalog().expect("builtin");
        assert_eq!(catalog.len(), 33);
        assert_eq!(catalog.action_cards().count(), 26);
        assert_eq!(catalog.card_named("Curse").expect("curse").value, -1);
    }

    #[test]
    fn overrides_replace_config_values() {
        let env: HashMap<&str, &str> =
            HashMap::from([(HAND_SIZE_ENV, "6"), (EXPECTATION_DIGITS_ENV, " 3 ")]);
        let config = apply_overrides(StatsConfig::default(), |key| {
            env.get(key).map(|value| value.to_string())
        })
        .expect("overrides");
        assert_eq!(config.hand_size, 6);
        assert_eq!(config.expectation_digits, 3);
        assert_eq!(config.field_size, StatsConfig::default().field_size);
    }

    #[test]
    fn overrides_are_validated() {
        let err = apply_overrides(StatsConfig::default(), |key| {
            (key == HAND_SIZE_ENV).then(|| "0".to_string())
        })
        .expect_err("zero hand must fail");
        assert!(err.to_string().contains("hand_size"));
        let err = apply_overrides(StatsConfig::default(), |key| {
            (key == HAND_SIZE_ENV).then(|| "five".to_string())
        })
        .expect_err("garbage must fail");
        assert!(err.to_string().contains(HAND_SIZE_ENV));
    }
}
