//! Game error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the number pool itself.
///
/// Session-level code converts these into [`GameError`]; the pool keeps its
/// own kinds so it can be used and tested in isolation.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum PoolError {
    /// Number outside the drawable range 1..=99
    #[error("number out of range")]
    OutOfRange,

    /// Number was already marked as drawn this round
    #[error("number already drawn")]
    AlreadyDrawn,
}

/// Errors that can occur during session operations
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("game already in progress")]
    GameAlreadyInProgress,
    #[error("game not in progress")]
    GameNotInProgress,
    #[error("card purchases are closed")]
    InvalidCardPurchase,
    #[error("player already holds a card")]
    DuplicateCard,
    #[error("no card assigned to player")]
    NoCard,
    #[error("number must be within 1..=99")]
    InvalidNumber,
    #[error("number already drawn")]
    AlreadyDrawn,
    #[error("too soon since the last draw")]
    InvalidDrawInterval,
    #[error("not enough players")]
    InsufficientPlayers,
    #[error("caller is not allowed to do that")]
    UnauthorizedCaller,
    #[error("claimed card has no completed line")]
    InvalidWin,
}

impl From<PoolError> for GameError {
    fn from(value: PoolError) -> Self {
        match value {
            PoolError::OutOfRange => Self::InvalidNumber,
            PoolError::AlreadyDrawn => Self::AlreadyDrawn,
        }
    }
}

/// Result type for session operations
pub type GameResult<T> = Result<T, GameError>;
