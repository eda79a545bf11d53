//! Pure win verification over a card layout and the drawn-number pool.
//!
//! Everything here is a pure function of its inputs; the session decides
//! what a confirmed win means for the round.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::{CARD_SLOTS, GRID_SIZE};
use super::entities::{Card, NumberPool};

/// Diagonal orientation on the card grid.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Diagonal {
    /// Top-left to bottom-right
    Main,
    /// Top-right to bottom-left
    Anti,
}

/// A completed line on a card.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Line {
    Row(usize),
    Column(usize),
    Diagonal(Diagonal),
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(i) => write!(f, "row {i}"),
            Self::Column(i) => write!(f, "column {i}"),
            Self::Diagonal(Diagonal::Main) => write!(f, "main diagonal"),
            Self::Diagonal(Diagonal::Anti) => write!(f, "anti diagonal"),
        }
    }
}

/// First completed line of the layout, if any.
///
/// Rows are checked first, then columns, then the two diagonals; the free
/// cell sentinel is always marked in the pool, so it never blocks a line.
pub fn winning_line(layout: &[u8; CARD_SLOTS], pool: &NumberPool) -> Option<Line> {
    for row in 0..GRID_SIZE {
        if (0..GRID_SIZE).all(|col| pool.is_used(layout[row * GRID_SIZE + col])) {
            return Some(Line::Row(row));
        }
    }
    for col in 0..GRID_SIZE {
        if (0..GRID_SIZE).all(|row| pool.is_used(layout[row * GRID_SIZE + col])) {
            return Some(Line::Column(col));
        }
    }
    if (0..GRID_SIZE).all(|i| pool.is_used(layout[i * GRID_SIZE + i])) {
        return Some(Line::Diagonal(Diagonal::Main));
    }
    if (0..GRID_SIZE).all(|i| pool.is_used(layout[i * GRID_SIZE + (GRID_SIZE - 1 - i)])) {
        return Some(Line::Diagonal(Diagonal::Anti));
    }
    None
}

/// Whether the card holds at least one fully drawn row, column, or diagonal.
pub fn is_winner(card: &Card, pool: &NumberPool) -> bool {
    winning_line(card.numbers(), pool).is_some()
}
