//! Room actor implementation with async message handling.

use rand::seq::IndexedRandom;
use std::collections::HashMap;
use tokio::{
    sync::mpsc,
    time::{Duration, interval},
};

use super::{
    RoomId,
    config::{DrawMode, RoomConfig},
    messages::{RoomMessage, RoomResponse, RoomStateResponse},
};
use crate::game::{
    GameError, GameEvent, GameSession,
    entities::{CardSeed, PlayerId},
};

/// Room actor handle for sending messages
#[derive(Clone)]
pub struct RoomHandle {
    sender: mpsc::Sender<RoomMessage>,
    room_id: RoomId,
}

impl RoomHandle {
    /// Create a new room handle
    pub fn new(sender: mpsc::Sender<RoomMessage>, room_id: RoomId) -> Self {
        Self { sender, room_id }
    }

    /// Get room ID
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Send a message to the room
    pub async fn send(&self, message: RoomMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .await
            .map_err(|_| "Room is closed".to_string())
    }
}

/// Room actor managing a single bingo session
pub struct RoomActor {
    /// Room ID
    id: RoomId,

    /// Room configuration
    config: RoomConfig,

    /// Bingo session state machine
    session: GameSession,

    /// Message inbox
    inbox: mpsc::Receiver<RoomMessage>,

    /// Is room paused
    is_paused: bool,

    /// Is room closed
    is_closed: bool,

    /// Subscribers for game event notifications
    subscribers: HashMap<PlayerId, mpsc::Sender<GameEvent>>,
}

impl RoomActor {
    /// Create a new room actor
    ///
    /// # Returns
    ///
    /// * `(RoomActor, RoomHandle)` - Actor and handle for sending messages
    pub fn new(id: RoomId, config: RoomConfig) -> (Self, RoomHandle) {
        let (sender, inbox) = mpsc::channel(100);

        let session = GameSession::from(config.game.clone());

        let actor = Self {
            id,
            config,
            session,
            inbox,
            is_paused: false,
            is_closed: false,
            subscribers: HashMap::new(),
        };

        let handle = RoomHandle::new(sender, id);

        (actor, handle)
    }

    /// Run the room actor event loop
    pub async fn run(mut self) {
        log::info!("Room {} '{}' starting", self.id, self.config.name);

        let tick_duration = Duration::from_secs(self.config.tick_interval_secs());
        let mut tick_interval = interval(tick_duration);

        loop {
            tokio::select! {
                message = self.inbox.recv() => {
                    match message {
                        Some(message) => self.handle_message(message),
                        None => break,
                    }

                    if self.is_closed {
                        break;
                    }
                }

                _ = tick_interval.tick() => {
                    if !self.is_paused && !self.is_closed {
                        self.tick();
                    }
                }
            }
        }

        log::info!("Room {} '{}' closed", self.id, self.config.name);
    }

    /// Handle a room message
    fn handle_message(&mut self, message: RoomMessage) {
        match message {
            RoomMessage::Join {
                player,
                seed,
                response,
            } => {
                if self.is_paused {
                    let _ = response.send(RoomResponse::Paused);
                    return;
                }
                let seed = seed.unwrap_or_else(CardSeed::random);
                let result = match self.session.join(&player, &seed) {
                    Ok(card) => RoomResponse::Card(card),
                    Err(e) => RoomResponse::Rejected(e),
                };
                let _ = response.send(result);
                self.publish_events();
            }

            RoomMessage::Draw {
                caller,
                number,
                response,
            } => {
                let _ = response.send(self.operator_op(&caller, |session| session.draw(number)));
                self.publish_events();
            }

            RoomMessage::ClaimWin { player, response } => {
                if self.is_paused {
                    let _ = response.send(RoomResponse::Paused);
                    return;
                }
                let result = match self.session.claim_win(&player) {
                    Ok(line) => {
                        log::info!("Room {}: {player} won on {line}", self.id);
                        RoomResponse::Success
                    }
                    Err(e) => RoomResponse::Rejected(e),
                };
                let _ = response.send(result);
                self.publish_events();
            }

            RoomMessage::EndGame { caller, response } => {
                let _ = response.send(self.operator_op(&caller, |session| session.end_game()));
                self.publish_events();
            }

            RoomMessage::Reset { caller, response } => {
                let _ = response.send(self.operator_op(&caller, |session| session.reset()));
            }

            RoomMessage::Pause { caller, response } => {
                if !self.is_operator(&caller) {
                    let _ = response.send(RoomResponse::Rejected(GameError::UnauthorizedCaller));
                    return;
                }
                self.is_paused = true;
                log::info!("Room {} paused", self.id);
                let _ = response.send(RoomResponse::Success);
            }

            RoomMessage::Resume { caller, response } => {
                if !self.is_operator(&caller) {
                    let _ = response.send(RoomResponse::Rejected(GameError::UnauthorizedCaller));
                    return;
                }
                self.is_paused = false;
                log::info!("Room {} resumed", self.id);
                let _ = response.send(RoomResponse::Success);
            }

            RoomMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(RoomResponse::Success);
            }

            RoomMessage::GetState { response } => {
                let _ = response.send(self.state_response());
            }

            RoomMessage::GetCard { player, response } => {
                let result = match self.session.card(&player) {
                    Ok(card) => RoomResponse::Card(card.clone()),
                    Err(e) => RoomResponse::Rejected(e),
                };
                let _ = response.send(result);
            }

            RoomMessage::DrawnNumbers { response } => {
                let _ = response.send(self.session.drawn_numbers().to_vec());
            }

            RoomMessage::HasJoined { player, response } => {
                let _ = response.send(self.session.has_joined(&player));
            }

            RoomMessage::Subscribe { player, sender } => {
                self.subscribers.insert(player, sender);
            }

            RoomMessage::Unsubscribe { player } => {
                self.subscribers.remove(&player);
            }

            RoomMessage::Tick => {
                if !self.is_paused && !self.is_closed {
                    self.tick();
                }
            }
        }
    }

    /// Self-drawing rooms reveal one random unused number per tick.
    fn tick(&mut self) {
        if !matches!(self.config.draw_mode, DrawMode::Auto { .. }) {
            return;
        }
        if !self.session.is_started() {
            return;
        }

        let unused = self.session.undrawn_numbers();
        if let Some(number) = unused.choose(&mut rand::rng()) {
            match self.session.draw(*number) {
                Ok(()) => log::debug!("Room {}: auto-drew {number}", self.id),
                Err(e) => log::warn!("Room {}: auto-draw failed: {e}", self.id),
            }
            self.publish_events();
        }
    }

    fn is_operator(&self, caller: &PlayerId) -> bool {
        *caller == self.config.operator
    }

    /// Mutating operator-only transition: checks pause and authorization
    /// before entering the session boundary.
    fn operator_op<F>(&mut self, caller: &PlayerId, op: F) -> RoomResponse
    where
        F: FnOnce(&mut GameSession) -> Result<(), GameError>,
    {
        if self.is_paused {
            return RoomResponse::Paused;
        }
        if !self.is_operator(caller) {
            return RoomResponse::Rejected(GameError::UnauthorizedCaller);
        }
        match op(&mut self.session) {
            Ok(()) => RoomResponse::Success,
            Err(e) => RoomResponse::Rejected(e),
        }
    }

    /// Fan pending session events out to subscribers, dropping any whose
    /// channel is full or closed.
    fn publish_events(&mut self) {
        let events: Vec<GameEvent> = self.session.drain_events().into();
        if events.is_empty() {
            return;
        }
        let id = self.id;
        self.subscribers.retain(|player, sender| {
            for event in &events {
                if sender.try_send(event.clone()).is_err() {
                    log::warn!("Room {id}: dropping subscriber {player}");
                    return false;
                }
            }
            true
        });
    }

    fn state_response(&self) -> RoomStateResponse {
        let snapshot = self.session.snapshot();
        RoomStateResponse {
            room_id: self.id,
            name: self.config.name.clone(),
            round_id: snapshot.round_id,
            phase: snapshot.phase,
            started_at: snapshot.started_at,
            last_drawn_at: snapshot.last_drawn_at,
            draw_count: snapshot.draw_count,
            drawn_numbers: snapshot.drawn_numbers,
            is_started: snapshot.is_started,
            is_ended: snapshot.is_ended,
            player_count: snapshot.player_count,
            min_players: snapshot.min_players,
            is_paused: self.is_paused,
        }
    }
}
