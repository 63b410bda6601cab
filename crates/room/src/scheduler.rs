//! Scheduler module - virtual clock for room tasks
//!
//! Time only moves when the owner calls [`Scheduler::pop_due`] / [`Scheduler::advance_to`],
//! so tests step a room through seconds of play without sleeping. Tasks due at the same
//! instant run in the order they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::types::PlayerId;

/// Work a room can schedule on its own clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Gravity,
    Logic,
    /// One-shot garbage delivery; never cancelled
    DeliverGarbage {
        target: PlayerId,
        lines: u32,
        sender: Option<PlayerId>,
        /// Match the garbage was sent in; stale after a restart
        epoch: u64,
    },
}

impl Task {
    /// Gravity and logic repeat until the room stops
    pub fn is_periodic(&self) -> bool {
        matches!(self, Task::Gravity | Task::Logic)
    }
}

#[derive(Debug)]
struct Scheduled {
    due: u64,
    seq: u64,
    task: Task,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    // Reversed: BinaryHeap is a max-heap and the earliest task must come out first.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.due, other.seq).cmp(&(self.due, self.seq))
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    seq: u64,
    queue: BinaryHeap<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule_at(&mut self, due_ms: u64, task: Task) {
        let seq = self.seq;
        self.seq += 1;
        self.queue.push(Scheduled {
            due: due_ms.max(self.now_ms),
            seq,
            task,
        });
    }

    pub fn schedule_in(&mut self, delay_ms: u64, task: Task) {
        self.schedule_at(self.now_ms + delay_ms, task);
    }

    /// Remove the earliest task due at or before `until`, moving the clock to its due time
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(u64, Task)> {
        if self.queue.peek()?.due > until_ms {
            return None;
        }
        let next = self.queue.pop()?;
        self.now_ms = self.now_ms.max(next.due);
        Some((next.due, next.task))
    }

    /// Move the clock forward without running anything
    pub fn advance_to(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    /// Drop gravity and logic; pending deliveries stay queued
    pub fn cancel_periodic(&mut self) {
        self.queue.retain(|s| !s.task.is_periodic());
    }

    pub fn has_periodic(&self) -> bool {
        self.queue.iter().any(|s| s.task.is_periodic())
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Time until the next task, `None` if nothing is queued
    pub fn next_due_in(&self) -> Option<u64> {
        self.queue
            .peek()
            .map(|s| s.due.saturating_sub(self.now_ms))
    }
}
