use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use std::{
    collections::{HashMap, HashSet, hash_map::Entry},
    fmt,
};

use super::constants;
use super::errors::{GameError, PoolError};

/// Player identity as seen by the game core.
///
/// Identities arrive from an external access-control collaborator (a wallet
/// address, a login name). The core only needs them to be hashable and
/// printable, so raw input is normalized on construction.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(s: &str) -> Self {
        let mut id: String = s
            .chars()
            .map(|c| if c.is_ascii_whitespace() { '_' } else { c })
            .collect();
        id.truncate(constants::MAX_PLAYER_ID_LENGTH);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Opaque 256-bit card seed supplied by the randomness collaborator.
///
/// The shuffle consumes one byte per numbered slot (24 in total). A seed
/// zero-extended from a narrower integer still produces a valid card, but
/// the tail iterations all read zero bytes and the permutation is biased;
/// callers who care about fairness should supply full-width entropy.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CardSeed([u8; constants::SEED_BYTES]);

impl CardSeed {
    /// Sample a full-width seed from thread-local entropy.
    pub fn random() -> Self {
        Self(rand::rng().random())
    }

    /// The i-th 8-bit slice, matching `(seed >> (8 * i)) & 0xff`.
    pub fn byte(&self, i: usize) -> u8 {
        if i < constants::SEED_BYTES { self.0[i] } else { 0 }
    }

    pub fn as_bytes(&self) -> &[u8; constants::SEED_BYTES] {
        &self.0
    }
}

impl From<[u8; constants::SEED_BYTES]> for CardSeed {
    fn from(value: [u8; constants::SEED_BYTES]) -> Self {
        Self(value)
    }
}

impl From<u64> for CardSeed {
    fn from(value: u64) -> Self {
        let mut bytes = [0u8; constants::SEED_BYTES];
        bytes[..8].copy_from_slice(&value.to_le_bytes());
        Self(bytes)
    }
}

impl From<u128> for CardSeed {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; constants::SEED_BYTES];
        bytes[..16].copy_from_slice(&value.to_le_bytes());
        Self(bytes)
    }
}

/// Deterministic partial Fisher-Yates over the candidate pool 1..=99.
///
/// Swap index for iteration `i` is `i + (seed.byte(i) % (99 - i))`, so the
/// window shrinks by one each round and the first 24 positions end up with
/// 24 distinct values. Those fill the card row-major, with the free cell at
/// the center slot. Pure function of the seed.
pub fn shuffled_layout(seed: &CardSeed) -> [u8; constants::CARD_SLOTS] {
    let mut pool: [u8; constants::MAX_NUMBER as usize] = std::array::from_fn(|i| (i + 1) as u8);
    for i in 0..constants::CARD_NUMBERS {
        let window = constants::MAX_NUMBER as usize - i;
        let swap_index = i + (seed.byte(i) as usize) % window;
        pool.swap(i, swap_index);
    }

    let mut slots = [constants::FREE_NUMBER; constants::CARD_SLOTS];
    slots[..constants::FREE_SLOT_INDEX].copy_from_slice(&pool[..constants::FREE_SLOT_INDEX]);
    slots[constants::FREE_SLOT_INDEX + 1..]
        .copy_from_slice(&pool[constants::FREE_SLOT_INDEX..constants::CARD_NUMBERS]);
    slots
}

/// A player's 25-slot board. Numbers are fixed at creation; only the
/// `has_won` flag ever changes, and it moves false -> true exactly once.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Card {
    owner: PlayerId,
    numbers: [u8; constants::CARD_SLOTS],
    has_won: bool,
}

impl Card {
    pub fn from_seed(owner: PlayerId, seed: &CardSeed) -> Self {
        Self {
            owner,
            numbers: shuffled_layout(seed),
            has_won: false,
        }
    }

    pub fn owner(&self) -> &PlayerId {
        &self.owner
    }

    pub fn numbers(&self) -> &[u8; constants::CARD_SLOTS] {
        &self.numbers
    }

    pub fn has_won(&self) -> bool {
        self.has_won
    }

    pub(crate) fn mark_won(&mut self) {
        self.has_won = true;
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.numbers.chunks(constants::GRID_SIZE) {
            for (i, n) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                if *n == constants::FREE_NUMBER {
                    write!(f, " *")?;
                } else {
                    write!(f, "{n:>2}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Tracks which numbers have been drawn this round.
///
/// Index 0 is the free-cell sentinel and is permanently marked, so win
/// checks can treat the free slot like any other number.
#[derive(Debug)]
pub struct NumberPool {
    used: [bool; constants::MAX_NUMBER as usize + 1],
}

impl Default for NumberPool {
    fn default() -> Self {
        let mut used = [false; constants::MAX_NUMBER as usize + 1];
        used[constants::FREE_NUMBER as usize] = true;
        Self { used }
    }
}

impl NumberPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_used(&mut self, n: u8) -> Result<(), PoolError> {
        if n == constants::FREE_NUMBER || n > constants::MAX_NUMBER {
            return Err(PoolError::OutOfRange);
        }
        if self.used[n as usize] {
            return Err(PoolError::AlreadyDrawn);
        }
        self.used[n as usize] = true;
        Ok(())
    }

    pub fn is_used(&self, n: u8) -> bool {
        n <= constants::MAX_NUMBER && self.used[n as usize]
    }

    /// Numbers still drawable this round.
    pub fn remaining(&self) -> usize {
        self.used.iter().skip(1).filter(|used| !**used).count()
    }

    /// Drawable numbers not yet marked, in ascending order.
    pub fn unused_numbers(&self) -> Vec<u8> {
        (1..=constants::MAX_NUMBER)
            .filter(|n| !self.used[*n as usize])
            .collect()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Ordered record of drawn numbers; insertion order is draw order.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct DrawHistory {
    numbers: Vec<u8>,
}

impl DrawHistory {
    pub fn push(&mut self, n: u8) {
        self.numbers.push(n);
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn last(&self) -> Option<u8> {
        self.numbers.last().copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.numbers
    }

    pub fn clear(&mut self) {
        self.numbers.clear();
    }
}

/// Cards keyed by owner, at most one per player per round.
#[derive(Debug, Default)]
pub struct CardStore {
    cards: HashMap<PlayerId, Card>,
}

impl CardStore {
    pub fn assign(&mut self, card: Card) -> Result<&Card, GameError> {
        match self.cards.entry(card.owner().clone()) {
            Entry::Occupied(_) => Err(GameError::DuplicateCard),
            Entry::Vacant(slot) => Ok(&*slot.insert(card)),
        }
    }

    pub fn get(&self, player: &PlayerId) -> Option<&Card> {
        self.cards.get(player)
    }

    pub(crate) fn get_mut(&mut self, player: &PlayerId) -> Option<&mut Card> {
        self.cards.get_mut(player)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn clear_all(&mut self) {
        self.cards.clear();
    }
}

/// Identities that have joined the current round. Gates the auto-start
/// threshold and double card assignment.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: HashSet<PlayerId>,
}

impl PlayerRegistry {
    /// Returns true if the player was newly registered.
    pub fn join(&mut self, player: &PlayerId) -> bool {
        self.players.insert(player.clone())
    }

    pub fn contains(&self, player: &PlayerId) -> bool {
        self.players.contains(player)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }
}
