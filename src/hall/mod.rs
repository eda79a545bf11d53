//! Hall module providing multi-room support with async actor model.
//!
//! This module implements:
//! - RoomActor: Async actor managing a single bingo session
//! - RoomManager: Spawns and tracks room instances
//! - Message-based communication with tokio channels
//! - Room configuration and lifecycle management
//!
//! ## Architecture
//!
//! Each room runs in a separate tokio task with an mpsc message inbox, so
//! transitions on any one session are serialized in arrival order. The
//! actor enforces the collaborator contracts before a message reaches the
//! session: operator authorization for draws and termination, the pause
//! switch for every mutating operation, and fan-out of game events to
//! subscribers. Rooms in auto-draw mode reveal a random unused number on
//! each timer tick.
//!
//! ## Example
//!
//! ```ignore
//! use bingo_hall::hall::{RoomConfig, RoomManager};
//!
//! #[tokio::main]
//! async fn main() {
//!     let manager = RoomManager::new();
//!     let room_id = manager.create_room(RoomConfig::default()).await.unwrap();
//!
//!     // Use the handle to send messages
//!     let handle = manager.get_room(room_id).await.unwrap();
//!     // handle.send(RoomMessage::Join { ... }).await;
//! }
//! ```

pub mod actor;
pub mod config;
pub mod manager;
pub mod messages;

/// Identifier for a room within the hall.
pub type RoomId = u64;

pub use actor::{RoomActor, RoomHandle};
pub use config::{DrawMode, RoomConfig};
pub use manager::{RoomManager, RoomMetadata};
pub use messages::{RoomMessage, RoomResponse, RoomStateResponse};
