//! Room actor message types.

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use super::RoomId;
use crate::game::{
    GameError, GameEvent, SessionPhase,
    entities::{Card, CardSeed, PlayerId},
};

/// Messages that can be sent to a RoomActor
#[derive(Debug)]
pub enum RoomMessage {
    /// Buy a card and join the current round. Omitting the seed lets the
    /// room sample one from its own entropy.
    Join {
        player: PlayerId,
        seed: Option<CardSeed>,
        response: oneshot::Sender<RoomResponse>,
    },

    /// Reveal one number (operator only)
    Draw {
        caller: PlayerId,
        number: u8,
        response: oneshot::Sender<RoomResponse>,
    },

    /// Claim a win for the given player's card
    ClaimWin {
        player: PlayerId,
        response: oneshot::Sender<RoomResponse>,
    },

    /// Terminate the current round (operator only)
    EndGame {
        caller: PlayerId,
        response: oneshot::Sender<RoomResponse>,
    },

    /// Clear the ended round (operator only)
    Reset {
        caller: PlayerId,
        response: oneshot::Sender<RoomResponse>,
    },

    /// Disable mutating operations (operator only)
    Pause {
        caller: PlayerId,
        response: oneshot::Sender<RoomResponse>,
    },

    /// Re-enable mutating operations (operator only)
    Resume {
        caller: PlayerId,
        response: oneshot::Sender<RoomResponse>,
    },

    /// Shut the room down (sent by the manager)
    Close {
        response: oneshot::Sender<RoomResponse>,
    },

    /// Get current room state
    GetState {
        response: oneshot::Sender<RoomStateResponse>,
    },

    /// Get a player's card
    GetCard {
        player: PlayerId,
        response: oneshot::Sender<RoomResponse>,
    },

    /// Get the drawn numbers in draw order
    DrawnNumbers {
        response: oneshot::Sender<Vec<u8>>,
    },

    /// Whether the identity joined the current round
    HasJoined {
        player: PlayerId,
        response: oneshot::Sender<bool>,
    },

    /// Subscribe to game event notifications
    Subscribe {
        player: PlayerId,
        sender: mpsc::Sender<GameEvent>,
    },

    /// Unsubscribe from game event notifications
    Unsubscribe { player: PlayerId },

    /// Internal: timer tick (auto-draw, housekeeping)
    Tick,
}

/// Response from room operations
#[derive(Debug, Clone, PartialEq)]
pub enum RoomResponse {
    /// Operation succeeded
    Success,

    /// Operation succeeded, returning a card
    Card(Card),

    /// The session rejected the transition
    Rejected(GameError),

    /// The room is paused; mutating operations are disabled
    Paused,
}

impl RoomResponse {
    /// Check if response is success
    pub fn is_success(&self) -> bool {
        matches!(self, RoomResponse::Success | RoomResponse::Card(_))
    }

    /// Get error message if response is a failure
    pub fn error_message(&self) -> Option<String> {
        match self {
            RoomResponse::Rejected(e) => Some(e.to_string()),
            RoomResponse::Paused => Some("Room is paused".to_string()),
            _ => None,
        }
    }
}

/// Room state response
#[derive(Debug, Clone, serde::Serialize)]
pub struct RoomStateResponse {
    /// Room ID
    pub room_id: RoomId,

    /// Room name
    pub name: String,

    /// Identifier of the current round
    pub round_id: Uuid,

    /// Session lifecycle phase
    pub phase: SessionPhase,

    /// When the round started, if it has
    pub started_at: Option<DateTime<Utc>>,

    /// When the last number was drawn
    pub last_drawn_at: Option<DateTime<Utc>>,

    /// How many numbers have been drawn
    pub draw_count: usize,

    /// Drawn numbers in draw order
    pub drawn_numbers: Vec<u8>,

    /// Round is running
    pub is_started: bool,

    /// Round is over
    pub is_ended: bool,

    /// Players holding a card this round
    pub player_count: usize,

    /// Threshold that starts the round
    pub min_players: usize,

    /// Room is paused
    pub is_paused: bool,
}
