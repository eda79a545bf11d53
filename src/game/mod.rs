//! Bingo game engine - core state machine and game logic.
//!
//! This module provides the foundational bingo implementation including:
//! - Deterministic card generation from an opaque seed
//! - The shared number pool and append-only draw history
//! - Pure row/column/diagonal win verification
//! - The session lifecycle state machine and its event stream

// Submodules
pub mod constants;
pub mod entities;
pub mod errors;
pub mod rules;
pub mod state_machine;

pub use errors::{GameError, GameResult, PoolError};
pub use state_machine::{
    EndReason, GameEvent, GameSession, GameSettings, ResetTrigger, SessionPhase, SessionSnapshot,
};
