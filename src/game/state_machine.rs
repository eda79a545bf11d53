//! Bingo session state machine.
//!
//! One [`GameSession`] runs one round at a time: players join and receive
//! cards while idle, the round starts itself at the player threshold,
//! numbers are drawn until someone claims a win or the pool runs dry, and
//! the ended round is cleared for the next one. Every operation is a
//! bounded synchronous computation; callers that need serialization put the
//! session behind a single owner (see the `hall` module).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, fmt};
use uuid::Uuid;

use super::constants::{DEFAULT_MAX_PLAYERS, DEFAULT_MIN_PLAYERS, MAX_NUMBER};
use super::entities::{Card, CardSeed, CardStore, DrawHistory, NumberPool, PlayerId, PlayerRegistry};
use super::errors::{GameError, GameResult};
use super::rules::{self, Line};

/// Lifecycle phase of a session.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Accepting card purchases, below the start threshold
    Idle,
    /// Round running: draws and win claims accepted
    Active,
    /// Round over; next round starts per the reset trigger
    Ended,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Ended => "ended",
        };
        write!(f, "{repr}")
    }
}

/// Why a round ended.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndReason {
    /// A win claim was verified
    Win,
    /// All 99 numbers were drawn without a winner
    Exhausted,
    /// The operator terminated the round
    Terminated,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Win => "bingo claimed",
            Self::Exhausted => "all numbers exhausted",
            Self::Terminated => "terminated by operator",
        };
        write!(f, "{repr}")
    }
}

/// When the previous round's cards and pool are cleared.
///
/// The two behaviors both exist in the wild: clearing as part of ending
/// keeps no stale state around, clearing on the next join keeps the ended
/// round queryable until play resumes.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetTrigger {
    /// Clear the round while ending it
    OnEnd,
    /// Leave the ended round in place until the next join
    OnNextJoin,
}

/// Events that occur during gameplay, fired exactly once per successful
/// transition and drained by the owner for notification fan-out.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    CardPurchased(PlayerId),
    GameStarted { player_count: usize },
    NumberDrawn(u8),
    WinClaimed(PlayerId),
    GameEnded(EndReason),
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::CardPurchased(player) => format!("{player} purchased a card"),
            Self::GameStarted { player_count } => {
                format!("game started with {player_count} players")
            }
            Self::NumberDrawn(n) => format!("number {n} drawn"),
            Self::WinClaimed(player) => format!("{player} claimed bingo"),
            Self::GameEnded(reason) => format!("game ended: {reason}"),
        };
        write!(f, "{repr}")
    }
}

/// Session configuration settings
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameSettings {
    /// Distinct players required before the round starts itself
    pub min_players: usize,
    /// Hard cap on card purchases per round
    pub max_players: usize,
    /// Minimum seconds between draws (and between start and first draw);
    /// `None` disables pacing
    pub min_draw_interval_secs: Option<u64>,
    pub reset_trigger: ResetTrigger,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(
            DEFAULT_MIN_PLAYERS,
            DEFAULT_MAX_PLAYERS,
            None,
            ResetTrigger::OnNextJoin,
        )
    }
}

impl GameSettings {
    #[must_use]
    pub const fn new(
        min_players: usize,
        max_players: usize,
        min_draw_interval_secs: Option<u64>,
        reset_trigger: ResetTrigger,
    ) -> Self {
        Self {
            min_players,
            max_players,
            min_draw_interval_secs,
            reset_trigger,
        }
    }
}

/// Mutable round data owned by the session.
#[derive(Debug)]
pub struct GameData {
    /// Identifier of the current round, regenerated on every clear.
    round_id: Uuid,
    pool: NumberPool,
    history: DrawHistory,
    cards: CardStore,
    registry: PlayerRegistry,
    started_at: Option<DateTime<Utc>>,
    last_drawn_at: Option<DateTime<Utc>>,
    /// Stack of game events describing what the last operations did.
    events: VecDeque<GameEvent>,
    settings: GameSettings,
}

impl From<GameSettings> for GameData {
    fn from(value: GameSettings) -> Self {
        Self {
            round_id: Uuid::new_v4(),
            pool: NumberPool::new(),
            history: DrawHistory::default(),
            cards: CardStore::default(),
            registry: PlayerRegistry::default(),
            started_at: None,
            last_drawn_at: None,
            events: VecDeque::new(),
            settings: value,
        }
    }
}

/// Full state snapshot for the query surface.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SessionSnapshot {
    pub round_id: Uuid,
    pub phase: SessionPhase,
    pub started_at: Option<DateTime<Utc>>,
    pub last_drawn_at: Option<DateTime<Utc>>,
    pub draw_count: usize,
    pub drawn_numbers: Vec<u8>,
    pub is_started: bool,
    pub is_ended: bool,
    pub player_count: usize,
    pub min_players: usize,
}

/// A bingo session running one round end-to-end.
#[derive(Debug)]
pub struct GameSession {
    data: GameData,
    phase: SessionPhase,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl From<GameSettings> for GameSession {
    fn from(value: GameSettings) -> Self {
        Self {
            data: value.into(),
            phase: SessionPhase::Idle,
        }
    }
}

impl GameSession {
    #[must_use]
    pub fn new() -> Self {
        GameSettings::default().into()
    }

    /// Registers the player and deals them a card.
    ///
    /// Reaching the player threshold starts the round: timestamps are
    /// stamped, the pool and history begin fresh, and further joins are
    /// rejected until the round ends.
    pub fn join(&mut self, player: &PlayerId, seed: &CardSeed) -> GameResult<Card> {
        match self.phase {
            SessionPhase::Active => return Err(GameError::GameAlreadyInProgress),
            SessionPhase::Ended => {
                // The on-end trigger already cleared the round.
                if self.data.settings.reset_trigger == ResetTrigger::OnNextJoin {
                    self.clear_round();
                }
                self.phase = SessionPhase::Idle;
            }
            SessionPhase::Idle => {}
        }

        if self.data.registry.len() >= self.data.settings.max_players {
            return Err(GameError::InvalidCardPurchase);
        }
        if self.data.registry.contains(player) {
            return Err(GameError::DuplicateCard);
        }

        let card = self
            .data
            .cards
            .assign(Card::from_seed(player.clone(), seed))?
            .clone();
        self.data.registry.join(player);
        self.data
            .events
            .push_back(GameEvent::CardPurchased(player.clone()));

        if self.data.registry.len() >= self.data.settings.min_players {
            let now = Utc::now();
            self.data.started_at = Some(now);
            self.data.last_drawn_at = Some(now);
            self.data.pool.reset();
            self.data.history.clear();
            self.phase = SessionPhase::Active;
            self.data.events.push_back(GameEvent::GameStarted {
                player_count: self.data.registry.len(),
            });
        }

        Ok(card)
    }

    /// Reveals one number, appending it to the draw history.
    ///
    /// Drawing the 99th number ends the round with no winner.
    pub fn draw(&mut self, n: u8) -> GameResult<()> {
        if self.phase != SessionPhase::Active {
            return Err(GameError::GameNotInProgress);
        }
        if self.data.registry.len() < self.data.settings.min_players {
            return Err(GameError::InsufficientPlayers);
        }
        if let (Some(gap), Some(last)) = (
            self.data.settings.min_draw_interval_secs,
            self.data.last_drawn_at,
        ) && Utc::now().signed_duration_since(last) < Duration::seconds(gap as i64)
        {
            return Err(GameError::InvalidDrawInterval);
        }

        self.data.pool.mark_used(n)?;
        self.data.history.push(n);
        self.data.last_drawn_at = Some(Utc::now());
        self.data.events.push_back(GameEvent::NumberDrawn(n));

        if self.data.history.len() >= MAX_NUMBER as usize {
            self.end_round(EndReason::Exhausted);
        }
        Ok(())
    }

    /// Verifies the claimant's card against the drawn numbers and, on a
    /// completed line, marks the card won and ends the round.
    pub fn claim_win(&mut self, player: &PlayerId) -> GameResult<Line> {
        if self.phase != SessionPhase::Active {
            return Err(GameError::GameNotInProgress);
        }
        let card = self.data.cards.get(player).ok_or(GameError::NoCard)?;
        if card.has_won() {
            return Err(GameError::InvalidWin);
        }
        let line = rules::winning_line(card.numbers(), &self.data.pool)
            .ok_or(GameError::InvalidWin)?;

        self.data
            .cards
            .get_mut(player)
            .ok_or(GameError::NoCard)?
            .mark_won();
        self.data
            .events
            .push_back(GameEvent::WinClaimed(player.clone()));
        self.end_round(EndReason::Win);
        Ok(line)
    }

    /// Explicit termination. Ending an already-ended round is an error, so
    /// repeated calls cannot double-fire the end event.
    pub fn end_game(&mut self) -> GameResult<()> {
        if self.phase != SessionPhase::Active {
            return Err(GameError::GameNotInProgress);
        }
        self.end_round(EndReason::Terminated);
        Ok(())
    }

    /// Clears the round and returns to idle. Rejected mid-round.
    pub fn reset(&mut self) -> GameResult<()> {
        if self.phase == SessionPhase::Active {
            return Err(GameError::GameAlreadyInProgress);
        }
        self.clear_round();
        self.phase = SessionPhase::Idle;
        Ok(())
    }

    fn end_round(&mut self, reason: EndReason) {
        self.phase = SessionPhase::Ended;
        self.data.events.push_back(GameEvent::GameEnded(reason));
        if self.data.settings.reset_trigger == ResetTrigger::OnEnd {
            self.clear_round();
        }
    }

    fn clear_round(&mut self) {
        self.data.round_id = Uuid::new_v4();
        self.data.pool.reset();
        self.data.history.clear();
        self.data.cards.clear_all();
        self.data.registry.clear();
        self.data.started_at = None;
        self.data.last_drawn_at = None;
    }

    // Query surface. All pure and available in every phase.

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_started(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn is_ended(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    pub fn round_id(&self) -> Uuid {
        self.data.round_id
    }

    pub fn player_count(&self) -> usize {
        self.data.registry.len()
    }

    pub fn has_joined(&self, player: &PlayerId) -> bool {
        self.data.registry.contains(player)
    }

    pub fn card(&self, player: &PlayerId) -> GameResult<&Card> {
        self.data.cards.get(player).ok_or(GameError::NoCard)
    }

    pub fn drawn_numbers(&self) -> &[u8] {
        self.data.history.as_slice()
    }

    pub fn draw_count(&self) -> usize {
        self.data.history.len()
    }

    /// Numbers still drawable this round.
    pub fn remaining_numbers(&self) -> usize {
        self.data.pool.remaining()
    }

    /// Drawable numbers not yet drawn, for self-drawing owners.
    pub fn undrawn_numbers(&self) -> Vec<u8> {
        self.data.pool.unused_numbers()
    }

    pub fn settings(&self) -> &GameSettings {
        &self.data.settings
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            round_id: self.data.round_id,
            phase: self.phase,
            started_at: self.data.started_at,
            last_drawn_at: self.data.last_drawn_at,
            draw_count: self.data.history.len(),
            drawn_numbers: self.data.history.as_slice().to_vec(),
            is_started: self.is_started(),
            is_ended: self.is_ended(),
            player_count: self.data.registry.len(),
            min_players: self.data.settings.min_players,
        }
    }

    /// Hands pending events to the caller, emptying the queue.
    pub fn drain_events(&mut self) -> VecDeque<GameEvent> {
        std::mem::take(&mut self.data.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(min: usize, trigger: ResetTrigger) -> GameSettings {
        GameSettings::new(min, DEFAULT_MAX_PLAYERS, None, trigger)
    }

    fn started_session() -> GameSession {
        let mut session = GameSession::from(settings(2, ResetTrigger::OnNextJoin));
        session.join(&"alice".into(), &CardSeed::from(1u64)).unwrap();
        session.join(&"bob".into(), &CardSeed::from(2u64)).unwrap();
        session
    }

    // === Lifecycle Tests ===

    #[test]
    fn test_new_session_is_idle() {
        let session = GameSession::new();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(!session.is_started());
        assert!(!session.is_ended());
        assert_eq!(session.player_count(), 0);
    }

    #[test]
    fn test_session_starts_at_threshold() {
        let mut session = GameSession::from(settings(2, ResetTrigger::OnNextJoin));
        session.join(&"alice".into(), &CardSeed::from(1u64)).unwrap();
        assert_eq!(session.phase(), SessionPhase::Idle);
        session.join(&"bob".into(), &CardSeed::from(2u64)).unwrap();
        assert_eq!(session.phase(), SessionPhase::Active);
        let snapshot = session.snapshot();
        assert!(snapshot.started_at.is_some());
        assert_eq!(snapshot.started_at, snapshot.last_drawn_at);
    }

    #[test]
    fn test_third_join_rejected_once_active() {
        let mut session = started_session();
        let result = session.join(&"carol".into(), &CardSeed::from(3u64));
        assert_eq!(result.unwrap_err(), GameError::GameAlreadyInProgress);
        assert_eq!(session.player_count(), 2);
    }

    #[test]
    fn test_duplicate_join_rejected() {
        let mut session = GameSession::from(settings(3, ResetTrigger::OnNextJoin));
        session.join(&"alice".into(), &CardSeed::from(1u64)).unwrap();
        let result = session.join(&"alice".into(), &CardSeed::from(2u64));
        assert_eq!(result.unwrap_err(), GameError::DuplicateCard);
        assert_eq!(session.player_count(), 1);
    }

    #[test]
    fn test_join_rejected_at_capacity() {
        let mut session =
            GameSession::from(GameSettings::new(10, 2, None, ResetTrigger::OnNextJoin));
        session.join(&"alice".into(), &CardSeed::from(1u64)).unwrap();
        session.join(&"bob".into(), &CardSeed::from(2u64)).unwrap();
        let result = session.join(&"carol".into(), &CardSeed::from(3u64));
        assert_eq!(result.unwrap_err(), GameError::InvalidCardPurchase);
    }

    #[test]
    fn test_join_deals_distinct_cards() {
        let mut session = GameSession::from(settings(2, ResetTrigger::OnNextJoin));
        let a = session.join(&"alice".into(), &CardSeed::from(1u64)).unwrap();
        let b = session.join(&"bob".into(), &CardSeed::from(2u64)).unwrap();
        assert_ne!(a.numbers(), b.numbers());
        assert_eq!(session.card(&"alice".into()).unwrap().numbers(), a.numbers());
    }

    // === Draw Tests ===

    #[test]
    fn test_draw_requires_active_round() {
        let mut session = GameSession::new();
        assert_eq!(session.draw(7), Err(GameError::GameNotInProgress));
    }

    #[test]
    fn test_draw_rejects_invalid_numbers() {
        let mut session = started_session();
        assert_eq!(session.draw(0), Err(GameError::InvalidNumber));
        assert_eq!(session.draw(100), Err(GameError::InvalidNumber));
        assert!(session.drawn_numbers().is_empty());
    }

    #[test]
    fn test_draw_rejects_repeats() {
        let mut session = started_session();
        session.draw(37).unwrap();
        assert_eq!(session.draw(37), Err(GameError::AlreadyDrawn));
        assert_eq!(session.drawn_numbers(), &[37]);
    }

    #[test]
    fn test_draw_appends_in_order() {
        let mut session = started_session();
        for n in [12, 99, 1] {
            session.draw(n).unwrap();
        }
        assert_eq!(session.drawn_numbers(), &[12, 99, 1]);
        assert_eq!(session.draw_count(), 3);
        assert_eq!(session.remaining_numbers(), 96);
    }

    #[test]
    fn test_draw_interval_gates_draws() {
        let mut session = GameSession::from(GameSettings::new(
            1,
            DEFAULT_MAX_PLAYERS,
            Some(3600),
            ResetTrigger::OnNextJoin,
        ));
        session.join(&"alice".into(), &CardSeed::from(1u64)).unwrap();
        // last_drawn_at was stamped at start, so the pacing window applies
        // to the first draw as well.
        assert_eq!(session.draw(7), Err(GameError::InvalidDrawInterval));
    }

    #[test]
    fn test_exhausting_pool_ends_round() {
        let mut session = started_session();
        for n in 1..=MAX_NUMBER {
            session.draw(n).unwrap();
        }
        assert_eq!(session.phase(), SessionPhase::Ended);
        assert_eq!(session.remaining_numbers(), 0);
        assert_eq!(session.draw(1), Err(GameError::GameNotInProgress));
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::GameEnded(EndReason::Exhausted)));
    }

    // === Win Claim Tests ===

    #[test]
    fn test_claim_without_card_fails() {
        let mut session = started_session();
        assert_eq!(
            session.claim_win(&"mallory".into()),
            Err(GameError::NoCard)
        );
    }

    #[test]
    fn test_claim_without_line_fails() {
        let mut session = started_session();
        assert_eq!(
            session.claim_win(&"alice".into()),
            Err(GameError::InvalidWin)
        );
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[test]
    fn test_claim_after_row_completes_ends_round() {
        let mut session = started_session();
        let alice: PlayerId = "alice".into();
        let row: Vec<u8> = session.card(&alice).unwrap().numbers()[..5].to_vec();
        for n in row {
            session.draw(n).unwrap();
        }
        let line = session.claim_win(&alice).unwrap();
        assert_eq!(line, Line::Row(0));
        assert_eq!(session.phase(), SessionPhase::Ended);
        assert!(session.card(&alice).unwrap().has_won());
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::WinClaimed(alice)));
        assert!(events.contains(&GameEvent::GameEnded(EndReason::Win)));
    }

    #[test]
    fn test_claim_rejected_after_round_ends() {
        let mut session = started_session();
        session.end_game().unwrap();
        assert_eq!(
            session.claim_win(&"alice".into()),
            Err(GameError::GameNotInProgress)
        );
    }

    // === End / Reset Tests ===

    #[test]
    fn test_end_game_is_idempotent_guarded() {
        let mut session = started_session();
        session.end_game().unwrap();
        assert_eq!(session.end_game(), Err(GameError::GameNotInProgress));
        assert_eq!(session.phase(), SessionPhase::Ended);
    }

    #[test]
    fn test_end_game_requires_active_round() {
        let mut session = GameSession::new();
        assert_eq!(session.end_game(), Err(GameError::GameNotInProgress));
    }

    #[test]
    fn test_reset_clears_round() {
        let mut session = started_session();
        session.draw(42).unwrap();
        session.end_game().unwrap();
        session.reset().unwrap();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.player_count(), 0);
        assert_eq!(session.remaining_numbers(), MAX_NUMBER as usize);
        assert!(session.drawn_numbers().is_empty());
        assert_eq!(session.card(&"alice".into()), Err(GameError::NoCard));
    }

    #[test]
    fn test_reset_rejected_mid_round() {
        let mut session = started_session();
        assert_eq!(session.reset(), Err(GameError::GameAlreadyInProgress));
    }

    #[test]
    fn test_reset_regenerates_round_id() {
        let mut session = started_session();
        let old = session.round_id();
        session.end_game().unwrap();
        session.reset().unwrap();
        assert_ne!(session.round_id(), old);
    }

    #[test]
    fn test_on_next_join_keeps_ended_round_queryable() {
        let mut session = started_session();
        session.draw(42).unwrap();
        session.end_game().unwrap();
        assert_eq!(session.drawn_numbers(), &[42]);
        assert!(session.card(&"alice".into()).is_ok());

        // The first join after the end starts a fresh round.
        session.join(&"carol".into(), &CardSeed::from(3u64)).unwrap();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.player_count(), 1);
        assert!(session.drawn_numbers().is_empty());
        assert_eq!(session.card(&"alice".into()), Err(GameError::NoCard));
    }

    #[test]
    fn test_on_end_clears_round_immediately() {
        let mut session = GameSession::from(settings(2, ResetTrigger::OnEnd));
        session.join(&"alice".into(), &CardSeed::from(1u64)).unwrap();
        session.join(&"bob".into(), &CardSeed::from(2u64)).unwrap();
        session.draw(42).unwrap();
        session.end_game().unwrap();
        assert_eq!(session.phase(), SessionPhase::Ended);
        assert!(session.drawn_numbers().is_empty());
        assert_eq!(session.player_count(), 0);
        assert_eq!(session.card(&"alice".into()), Err(GameError::NoCard));
    }

    // === Event Tests ===

    #[test]
    fn test_events_fire_once_per_transition() {
        let mut session = started_session();
        session.draw(7).unwrap();
        let events: Vec<GameEvent> = session.drain_events().into();
        assert_eq!(
            events,
            vec![
                GameEvent::CardPurchased("alice".into()),
                GameEvent::CardPurchased("bob".into()),
                GameEvent::GameStarted { player_count: 2 },
                GameEvent::NumberDrawn(7),
            ]
        );
        // Draining empties the queue.
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_failed_transitions_emit_nothing() {
        let mut session = started_session();
        session.drain_events();
        let _ = session.draw(0);
        let _ = session.claim_win(&"alice".into());
        let _ = session.join(&"carol".into(), &CardSeed::from(3u64));
        assert!(session.drain_events().is_empty());
    }

    // === Snapshot Tests ===

    #[test]
    fn test_snapshot_reflects_round_state() {
        let mut session = started_session();
        session.draw(5).unwrap();
        session.draw(60).unwrap();
        let snapshot = session.snapshot();
        assert!(snapshot.is_started);
        assert!(!snapshot.is_ended);
        assert_eq!(snapshot.phase, SessionPhase::Active);
        assert_eq!(snapshot.draw_count, 2);
        assert_eq!(snapshot.drawn_numbers, vec![5, 60]);
        assert_eq!(snapshot.player_count, 2);
        assert_eq!(snapshot.min_players, 2);
    }

    #[test]
    fn test_snapshot_serializes() {
        let session = started_session();
        let json = serde_json::to_string(&session.snapshot()).unwrap();
        assert!(json.contains("\"phase\":\"active\""));
    }
}
