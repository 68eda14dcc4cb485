use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use deckcalc_core::{
    draw_rate, expected_value, Catalog, Deck, DeckReport, RngState, StatsConfig, RATE_DIGITS,
};
use deckcalc_data::{apply_env_overrides, builtin_catalog, load_catalog, load_stats_config};

mod parse;
mod session;

/// Draw statistics for a deck-building card game.
#[derive(Debug, Parser)]
#[command(name = "deckcalc", author, version, about = "Deck draw statistics")]
struct Cli {
    /// Card catalog CSV (defaults to the built-in base set).
    #[arg(long, value_name = "FILE", global = true)]
    catalog: Option<PathBuf>,

    /// Statistics settings JSON.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Override the number of cards drawn per hand.
    #[arg(long, value_name = "CARDS", global = true)]
    hand_size: Option<usize>,

    /// Override the decimal places of the expected value.
    #[arg(long, value_name = "DIGITS", global = true)]
    digits: Option<u32>,

    /// Log more (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Chance of drawing at least one marked card.
    Rate {
        #[arg(long)]
        total: usize,
        #[arg(long)]
        include: usize,
        /// Hand size (defaults to the configured one).
        #[arg(long)]
        hand: Option<usize>,
    },
    /// Exact expected money of one hand.
    Expect {
        /// Deck by card name, e.g. Copper=7,Estate=3 (defaults to the starter deck).
        #[arg(long, conflicts_with = "values")]
        deck: Option<String>,
        /// Deck by draw value, e.g. 1=7,0=3.
        #[arg(long)]
        values: Option<String>,
    },
    /// Deck size, points, per-card draw rates and expected money.
    Report {
        #[arg(long)]
        deck: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Edit a deck interactively (the default).
    Session {
        /// Seed for random fields.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Serialize)]
struct ReportOutput<'a> {
    #[serde(flatten)]
    report: &'a DeckReport,
    expected_value: Option<f64>,
    expected_value_error: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let catalog = match &cli.catalog {
        Some(path) => load_catalog(path)?,
        None => builtin_catalog()?,
    };
    let config = resolve_config(&cli)?;

    match cli.command.unwrap_or(Command::Session { seed: None }) {
        Command::Rate {
            total,
            include,
            hand,
        } => {
            let rate = draw_rate(total, include, hand.unwrap_or(config.hand_size))?;
            println!("{rate:.prec$}%", prec = RATE_DIGITS as usize);
        }
        Command::Expect { deck, values } => {
            let snapshot = match values {
                Some(values) => parse::parse_values(&values)?,
                None => load_deck(&catalog, deck.as_deref())?.snapshot(&catalog),
            };
            let value = expected_value(&snapshot, config.hand_size, config.expectation_digits)?;
            println!("{value}");
        }
        Command::Report { deck, json } => {
            let deck = load_deck(&catalog, deck.as_deref())?;
            let report = DeckReport::build(&deck, &catalog, &config);
            let expectation = expected_value(
                &deck.snapshot(&catalog),
                config.hand_size,
                config.expectation_digits,
            );
            if json {
                let output = ReportOutput {
                    report: &report,
                    expected_value: expectation.as_ref().ok().copied(),
                    expected_value_error: expectation.as_ref().err().map(ToString::to_string),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                session::print_report(&report);
                match expectation {
                    Ok(value) => println!("expected money per hand: {value}"),
                    Err(err) => println!("expected money per hand: cannot compute ({err})"),
                }
            }
        }
        Command::Session { seed } => {
            let rng = seed.map_or_else(RngState::from_entropy, RngState::from_seed);
            session::run(session::Session::new(catalog, config, rng)?)?;
        }
    }
    Ok(())
}

fn load_deck(catalog: &Catalog, spec: Option<&str>) -> anyhow::Result<Deck> {
    match spec {
        Some(spec) => parse::parse_deck(catalog, spec).with_context(|| format!("deck {spec:?}")),
        None => Ok(Deck::starter(catalog)?),
    }
}

/// File, then environment, then flags.
fn resolve_config(cli: &Cli) -> anyhow::Result<StatsConfig> {
    let config = match &cli.config {
        Some(path) => load_stats_config(path)?,
        None => StatsConfig::default(),
    };
    let mut config = apply_env_overrides(config)?;
    if let Some(hand_size) = cli.hand_size {
        config.hand_size = hand_size;
    }
    if let Some(digits) = cli.digits {
        config.expectation_digits = digits;
    }
    config.validate()?;
    Ok(config)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    // Ignore error if a global subscriber is already set.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
