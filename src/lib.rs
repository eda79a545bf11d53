//! # Bingo Hall
//!
//! A multiplayer bingo engine with room management.
//!
//! Players buy a randomly generated 5x5 card, numbers are revealed one at a
//! time from a shared pool of 1..=99, and the first verified row, column,
//! or diagonal wins the round. Card layouts are a pure function of an
//! opaque 256-bit seed, so a card can be re-derived and audited by anyone
//! holding the seed.
//!
//! ## Architecture
//!
//! The core game lives in [`game`] as a synchronous state machine with
//! three phases:
//!
//! - **Idle**: card purchases accepted; the round starts itself once the
//!   player threshold is met
//! - **Active**: numbers are drawn without repetition and win claims are
//!   verified against the drawn set
//! - **Ended**: by a verified win, by exhausting all 99 numbers, or by
//!   operator termination
//!
//! The [`hall`] module wraps sessions in per-room actors: each room owns
//! one session behind a tokio mpsc inbox, which serializes transitions in
//! arrival order. The hall layer also hosts the operator authorization
//! gate, the pause switch, event fan-out to subscribers, and the optional
//! self-drawing timer.
//!
//! ## Example
//!
//! ```
//! use bingo_hall::{CardSeed, GameSession};
//!
//! let mut session = GameSession::new();
//! session.join(&"alice".into(), &CardSeed::random()).unwrap();
//! session.join(&"bob".into(), &CardSeed::random()).unwrap();
//! assert!(session.is_started());
//! session.draw(42).unwrap();
//! ```

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    EndReason, GameError, GameEvent, GameResult, GameSession, GameSettings, ResetTrigger,
    SessionPhase, SessionSnapshot,
    constants::{self, DEFAULT_MAX_PLAYERS, DEFAULT_MIN_PLAYERS, MAX_NUMBER},
    entities::{self, Card, CardSeed, NumberPool, PlayerId},
    rules,
};

/// Room actors and the room manager.
pub mod hall;
pub use hall::{DrawMode, RoomActor, RoomConfig, RoomHandle, RoomManager, RoomMetadata};
