//! Room manager for spawning and managing multiple room actors.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::{RwLock, oneshot};

use super::{
    RoomId,
    actor::{RoomActor, RoomHandle},
    config::RoomConfig,
    messages::{RoomMessage, RoomResponse, RoomStateResponse},
};
use crate::game::{SessionPhase, entities::{CardSeed, PlayerId}};

/// Room metadata for discovery
#[derive(Debug, Clone)]
pub struct RoomMetadata {
    pub id: RoomId,
    pub name: String,
    pub phase: SessionPhase,
    pub player_count: usize,
    pub min_players: usize,
    pub draw_count: usize,
    pub is_paused: bool,
}

/// Room manager for managing multiple room instances
///
/// Every room runs in its own tokio task and owns its session outright, so
/// sessions never share state and each room's transitions are serialized by
/// its inbox.
#[derive(Clone)]
pub struct RoomManager {
    /// Active room handles
    rooms: Arc<RwLock<HashMap<RoomId, RoomHandle>>>,

    /// Next room ID
    next_room_id: Arc<RwLock<RoomId>>,
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomManager {
    /// Create a new room manager
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            next_room_id: Arc::new(RwLock::new(1)),
        }
    }

    /// Create and spawn a new room
    ///
    /// # Returns
    ///
    /// * `Result<RoomId, String>` - Room ID or validation error
    pub async fn create_room(&self, config: RoomConfig) -> Result<RoomId, String> {
        config.validate()?;

        let mut next_id = self.next_room_id.write().await;
        let room_id = *next_id;
        *next_id += 1;
        drop(next_id);

        let (actor, handle) = RoomActor::new(room_id, config);

        let mut rooms = self.rooms.write().await;
        rooms.insert(room_id, handle);
        drop(rooms);

        tokio::spawn(async move {
            actor.run().await;
        });

        log::info!("Created and spawned room {}", room_id);

        Ok(room_id)
    }

    /// Get a room handle
    pub async fn get_room(&self, room_id: RoomId) -> Option<RoomHandle> {
        let rooms = self.rooms.read().await;
        rooms.get(&room_id).cloned()
    }

    /// List all active rooms
    pub async fn list_rooms(&self) -> Vec<RoomMetadata> {
        let handles: Vec<RoomHandle> = {
            let rooms = self.rooms.read().await;
            rooms.values().cloned().collect()
        };

        let mut metadata_list = Vec::with_capacity(handles.len());
        for handle in handles {
            if let Ok(state) = self.query_state(&handle).await {
                metadata_list.push(RoomMetadata {
                    id: state.room_id,
                    name: state.name,
                    phase: state.phase,
                    player_count: state.player_count,
                    min_players: state.min_players,
                    draw_count: state.draw_count,
                    is_paused: state.is_paused,
                });
            }
        }
        metadata_list.sort_by_key(|m| m.id);

        metadata_list
    }

    /// Close a room
    pub async fn close_room(&self, room_id: RoomId) -> Result<(), String> {
        if let Some(handle) = self.get_room(room_id).await {
            let (tx, rx) = oneshot::channel();
            handle
                .send(RoomMessage::Close { response: tx })
                .await
                .map_err(|e| format!("Failed to send close message: {}", e))?;

            rx.await
                .map_err(|_| "Failed to receive response".to_string())?;
        }

        let mut rooms = self.rooms.write().await;
        rooms.remove(&room_id);
        drop(rooms);

        log::info!("Closed room {}", room_id);

        Ok(())
    }

    /// Join a room, buying a card for the player
    pub async fn join_room(
        &self,
        room_id: RoomId,
        player: PlayerId,
        seed: Option<CardSeed>,
    ) -> Result<RoomResponse, String> {
        let handle = self
            .get_room(room_id)
            .await
            .ok_or_else(|| "Room not found".to_string())?;

        let (tx, rx) = oneshot::channel();
        handle
            .send(RoomMessage::Join {
                player,
                seed,
                response: tx,
            })
            .await
            .map_err(|e| format!("Failed to send message: {}", e))?;

        rx.await
            .map_err(|_| "Failed to receive response".to_string())
    }

    /// Get room state
    pub async fn room_state(&self, room_id: RoomId) -> Result<RoomStateResponse, String> {
        let handle = self
            .get_room(room_id)
            .await
            .ok_or_else(|| "Room not found".to_string())?;

        self.query_state(&handle).await
    }

    /// Get active room count
    pub async fn room_count(&self) -> usize {
        let rooms = self.rooms.read().await;
        rooms.len()
    }

    async fn query_state(&self, handle: &RoomHandle) -> Result<RoomStateResponse, String> {
        let (tx, rx) = oneshot::channel();
        handle
            .send(RoomMessage::GetState { response: tx })
            .await
            .map_err(|e| format!("Failed to send message: {}", e))?;

        rx.await
            .map_err(|_| "Failed to receive response".to_string())
    }
}
