//! Garbage buffer - FIFO of pending incoming garbage
//!
//! Entries are appended by incoming attacks, shrunk by the owner's own attacks (offset)
//! and drained oldest-first when garbage is applied.

use std::collections::VecDeque;

use crate::types::PlayerId;

/// One pending batch of garbage lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingGarbage {
    pub lines: u32,
    /// Attacker credited if these lines top the board out
    pub sender: Option<PlayerId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GarbageQueue {
    entries: VecDeque<PendingGarbage>,
}

impl GarbageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry; zero-line entries are dropped
    pub fn push(&mut self, lines: u32, sender: Option<PlayerId>) {
        if lines > 0 {
            self.entries.push_back(PendingGarbage { lines, sender });
        }
    }

    pub fn front(&self) -> Option<&PendingGarbage> {
        self.entries.front()
    }

    pub fn pop_front(&mut self) -> Option<PendingGarbage> {
        self.entries.pop_front()
    }

    /// Shrink the oldest entry by `amount` (saturating), removing it if it reaches zero
    pub fn decrement_front(&mut self, amount: u32) {
        if let Some(front) = self.entries.front_mut() {
            front.lines = front.lines.saturating_sub(amount);
            if front.lines == 0 {
                self.entries.pop_front();
            }
        }
    }

    /// Sum of all pending lines
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|e| e.lines).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingGarbage> {
        self.entries.iter()
    }

    /// Cancel an outgoing attack against the pending garbage
    ///
    /// If the attack covers everything pending, the queue is emptied and the attack reduced
    /// by the total. Otherwise entries are consumed oldest-first, the last one partially.
    /// Returns the attack left over to forward.
    pub fn offset(&mut self, attack: u32) -> u32 {
        let total = self.total();
        if attack >= total {
            self.entries.clear();
            return attack - total;
        }

        let mut remaining = attack;
        while remaining > 0 {
            let Some(front) = self.entries.front() else {
                break;
            };
            if front.lines <= remaining {
                remaining -= front.lines;
                self.entries.pop_front();
            } else {
                self.decrement_front(remaining);
                remaining = 0;
            }
        }
        remaining
    }
}
