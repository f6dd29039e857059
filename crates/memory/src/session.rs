//! Session memory — an append-only, bounded log of turns.
//!
//! Turns are never edited after they are appended. Once the log holds
//! `capacity` turns, each append evicts the oldest one.

use skyline_core::message::Turn;
use std::collections::VecDeque;
use tracing::trace;

/// Default number of retained turns.
pub const DEFAULT_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
pub struct SessionMemory {
    turns: VecDeque<Turn>,
    capacity: usize,
}

impl SessionMemory {
    /// Create an empty memory holding at most `capacity` turns.
    ///
    /// A capacity of zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a turn, evicting the oldest ones past the bound.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.capacity {
            self.turns.pop_front();
            trace!(capacity = self.capacity, "Evicted oldest turn");
        }
    }

    /// Snapshot of the retained turns, oldest first.
    pub fn render(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    /// Borrowing view of the retained turns, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SessionMemory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
