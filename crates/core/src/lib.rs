//! Deck statistics. Keep this crate free of file IO and platform concerns.

pub mod cards;
pub mod catalog;
pub mod combin;
pub mod config;
pub mod deck;
pub mod error;
pub mod expectation;
pub mod field;
pub mod rate;
pub mod report;
pub mod rng;
pub mod rounding;
pub mod worker;

pub use cards::*;
pub use catalog::*;
pub use combin::{binomial, combinations, Combinations};
pub use config::*;
pub use deck::*;
pub use error::*;
pub use expectation::*;
pub use field::*;
pub use rate::*;
pub use report::*;
pub use rng::*;
pub use rounding::{round_half_away, round_ratio};
pub use worker::*;
