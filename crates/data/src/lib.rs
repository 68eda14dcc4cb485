//! Catalog and configuration loading for the deck statistics engine.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
