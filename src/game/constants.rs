//! Board geometry and game defaults.

/// Side length of the card grid.
pub const GRID_SIZE: usize = 5;

/// Total slots on a card, free cell included.
pub const CARD_SLOTS: usize = GRID_SIZE * GRID_SIZE;

/// Numbered slots on a card (everything but the free cell).
pub const CARD_NUMBERS: usize = CARD_SLOTS - 1;

/// Row-major index of the free cell (center of the grid).
pub const FREE_SLOT_INDEX: usize = CARD_SLOTS / 2;

/// Reserved value marking the free cell. Always counts as drawn.
pub const FREE_NUMBER: u8 = 0;

/// Largest drawable number. The pool is 1..=MAX_NUMBER.
pub const MAX_NUMBER: u8 = 99;

/// Width of a card seed in bytes. The shuffle consumes one byte per
/// numbered slot, so anything narrower than [`CARD_NUMBERS`] bytes
/// biases the tail of the permutation.
pub const SEED_BYTES: usize = 32;

pub const DEFAULT_MIN_PLAYERS: usize = 2;
pub const DEFAULT_MAX_PLAYERS: usize = 50;

/// Upper bound on raw player identity input before sanitization.
pub const MAX_PLAYER_ID_LENGTH: usize = 64;
