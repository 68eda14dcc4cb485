use crate::CardId;
use thiserror::Error;

/// Failure of a statistical computation. The engine has no I/O, so bad
/// arguments are the only thing that can go wrong.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl StatsError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate card id {0}")]
    DuplicateId(CardId),
    #[error("duplicate card name {0:?}")]
    DuplicateName(String),
    #[error("unknown card name {0:?}")]
    UnknownName(String),
    #[error("unknown card id {0}")]
    UnknownId(CardId),
    #[error("card {0} is not an action card")]
    NotAction(CardId),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("card {0} is not in the deck")]
    NotInDeck(CardId),
    #[error("too many copies of card {0}")]
    CountOverflow(CardId),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkerError {
    #[error("failed to start expectation worker: {0}")]
    Spawn(String),
    #[error("expectation worker has stopped")]
    Disconnected,
}
