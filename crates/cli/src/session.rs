use anyhow::{bail, Context};
use deckcalc_core::{
    Catalog, Deck, DeckReport, ExpectationWorker, Field, RngState, StatsConfig, StatsError,
};
use std::io::{self, Write};
use std::time::Duration;
use tracing::debug;

const WAIT_LIMIT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Field,
    Toggle(String),
    Random(Option<u64>),
    Add(String),
    Remove(String),
    Reset,
    Show,
    Wait,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let command = match verb.to_ascii_lowercase().as_str() {
            "help" | "h" | "?" => Self::Help,
            "field" | "f" => Self::Field,
            "toggle" | "t" => Self::Toggle(required(verb, rest)?),
            "random" => {
                let seed = if rest.is_empty() {
                    None
                } else {
                    Some(rest.parse().with_context(|| format!("seed {rest:?}"))?)
                };
                Self::Random(seed)
            }
            "add" | "a" => Self::Add(required(verb, rest)?),
            "remove" | "rm" | "r" => Self::Remove(required(verb, rest)?),
            "reset" => Self::Reset,
            "show" | "s" | "deck" => Self::Show,
            "wait" | "w" => Self::Wait,
            "quit" | "exit" | "q" => Self::Quit,
            other => bail!("unknown command {other:?}, try help"),
        };
        Ok(Some(command))
    }
}

fn required(verb: &str, rest: &str) -> anyhow::Result<String> {
    if rest.is_empty() {
        bail!("{verb} needs a card name");
    }
    Ok(rest.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive deck editing. Every deck change dispatches a fresh
/// expected-value request to the background worker.
pub struct Session {
    catalog: Catalog,
    config: StatsConfig,
    deck: Deck,
    field: Field,
    rng: RngState,
    worker: ExpectationWorker,
    expectation: Option<Result<f64, StatsError>>,
}

impl Session {
    pub fn new(catalog: Catalog, config: StatsConfig, rng: RngState) -> anyhow::Result<Self> {
        let deck = Deck::starter(&catalog)?;
        let mut session = Self {
            catalog,
            config,
            deck,
            field: Field::new(),
            rng,
            worker: ExpectationWorker::spawn()?,
            expectation: None,
        };
        session.dispatch()?;
        Ok(session)
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn execute(&mut self, command: Command) -> anyhow::Result<Flow> {
        match command {
            Command::Help => print_help(),
            Command::Field => self.print_field(),
            Command::Toggle(name) => {
                let card = self.catalog.lookup(&name)?;
                if !card.is_action() {
                    bail!("{} is always available; only action cards form the field", card.name);
                }
                let id = card.id;
                let selected = self.field.toggle(&self.catalog, id)?;
                println!("{} {}", if selected { "selected" } else { "deselected" }, name);
            }
            Command::Random(seed) => {
                if let Some(seed) = seed {
                    self.rng = RngState::from_seed(seed);
                }
                self.field
                    .randomize(&self.catalog, &mut self.rng, self.config.field_size);
                self.print_field();
            }
            Command::Add(name) => {
                let card = self.catalog.lookup(&name)?;
                if !self.field.addable_cards(&self.catalog).contains(&card) {
                    bail!("{} is not in the field", card.name);
                }
                let id = card.id;
                self.deck.add(&self.catalog, id)?;
                self.deck_changed()?;
            }
            Command::Remove(name) => {
                let id = self.catalog.lookup(&name)?.id;
                self.deck.remove(id)?;
                self.deck_changed()?;
            }
            Command::Reset => {
                self.deck.reset(&self.catalog)?;
                self.field.reset();
                self.deck_changed()?;
            }
            Command::Show => self.print_deck()?,
            Command::Wait => {
                self.refresh(WAIT_LIMIT)?;
                self.print_deck()?;
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn deck_changed(&mut self) -> anyhow::Result<()> {
        self.dispatch()?;
        self.print_deck()
    }

    fn dispatch(&mut self) -> anyhow::Result<()> {
        let snapshot = self.deck.snapshot(&self.catalog);
        let ticket = self.worker.submit(
            snapshot,
            self.config.hand_size,
            self.config.expectation_digits,
        )?;
        debug!(ticket, size = self.deck.size(), "deck changed");
        Ok(())
    }

    /// Picks up the latest expected value, waiting at most `timeout`.
    pub fn refresh(&mut self, timeout: Duration) -> anyhow::Result<()> {
        let reply = if timeout.is_zero() {
            self.worker.poll()?
        } else {
            self.worker.wait(timeout)?
        };
        if let Some(reply) = reply {
            self.expectation = Some(reply.result);
        }
        Ok(())
    }

    /// Latest expected value, or `None` while a computation is outstanding.
    pub fn expectation(&self) -> Option<&Result<f64, StatsError>> {
        if self.worker.is_pending() {
            return None;
        }
        self.expectation.as_ref()
    }

    fn print_deck(&mut self) -> anyhow::Result<()> {
        self.refresh(Duration::ZERO)?;
        let report = DeckReport::build(&self.deck, &self.catalog, &self.config);
        print_report(&report);
        match self.expectation() {
            None => println!("expected money per hand: computing..."),
            Some(Ok(value)) => println!("expected money per hand: {value}"),
            Some(Err(err)) => println!("expected money per hand: cannot compute ({err})"),
        }
        Ok(())
    }

    fn print_field(&self) {
        println!("== Field ==");
        if self.field.is_empty() {
            println!("(no action cards selected)");
        }
        for card in self.field.cards(&self.catalog) {
            println!("  {} ({})", card.name, card.cost);
        }
        let actions: Vec<&str> = self
            .catalog
            .action_cards()
            .filter(|card| !self.field.contains(card.id))
            .map(|card| card.name.as_str())
            .collect();
        if !actions.is_empty() {
            println!("available: {}", actions.join(", "));
        }
    }
}

pub fn print_report(report: &DeckReport) {
    println!("== Deck ==");
    println!("cards {} | points {}", report.size, report.points);
    for row in &report.rows {
        let rate = row
            .draw_rate
            .map(|rate| format!("{rate}%"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<14} x{:<3} {:>5}% of deck | in {}-card hand: {}",
            row.name, row.count, row.share_percent, report.hand_size, rate
        );
    }
}

fn print_help() {
    println!("== Commands ==");
    println!("  field                 show the chosen action cards");
    println!("  toggle NAME           select or deselect an action card");
    println!("  random [SEED]         pick a random field");
    println!("  add NAME / remove NAME  change the deck");
    println!("  reset                 back to the starter deck and an empty field");
    println!("  show                  deck view; wait blocks for the expected value");
    println!("  quit");
}

pub fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).ok()? == 0 {
        return None;
    }
    Some(line.trim_end_matches(&['\n', '\r'][..]).to_string())
}

pub fn run(mut session: Session) -> anyhow::Result<()> {
    print_help();
    session.print_deck()?;
    while let Some(line) = read_line("> ") {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{err:#}");
                continue;
            }
        };
        match session.execute(command) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => eprintln!("{err:#}"),
        }
    }
    Ok(())
}
