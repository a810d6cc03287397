//! Explicit timer queue driving every delay in the experience.
//!
//! Components never sleep; they schedule an event on the [`Timeline`] and keep
//! the returned [`TimerId`] so teardown can cancel it. The owner drains due
//! events in order with [`Timeline::pop_due`]. Events due at the same instant
//! fire in scheduling order.

use std::collections::{BTreeMap, HashMap};

/// Handle for a scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
pub struct Timeline<E> {
    now: u64,
    next_id: u64,
    queue: BTreeMap<(u64, TimerId), E>,
    due_at: HashMap<TimerId, u64>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<E> Timeline<E> {
    #[must_use]
    pub fn new(now: u64) -> Self {
        Self {
            now,
            next_id: 0,
            queue: BTreeMap::new(),
            due_at: HashMap::new(),
        }
    }

    /// Current time in milliseconds as last observed by the queue.
    #[must_use]
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// Move the clock forward. The clock never runs backwards.
    pub fn settle(&mut self, now: u64) {
        self.now = self.now.max(now);
    }

    pub fn schedule(&mut self, delay_ms: u64, event: impl Into<E>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now.saturating_add(delay_ms);
        self.queue.insert((due, id), event.into());
        self.due_at.insert(id, due);
        id
    }

    /// Cancel a pending event. Returns `false` when it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.due_at
            .remove(&id)
            .is_some_and(|due| self.queue.remove(&(due, id)).is_some())
    }

    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.due_at.contains_key(&id)
    }

    /// Due time of the earliest pending event.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.queue.first_key_value().map(|((due, _), _)| *due)
    }

    /// Remove and return the earliest event due at or before `until`,
    /// advancing the clock to its due time.
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerId, E)> {
        let (&(due, id), _) = self.queue.first_key_value()?;
        if due > until {
            return None;
        }
        let event = self.queue.remove(&(due, id))?;
        self.due_at.remove(&id);
        self.now = self.now.max(due);
        Some((id, event))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Count pending events matching `pred`. Used by leak checks.
    pub fn count_where(&self, pred: impl Fn(&E) -> bool) -> usize {
        self.queue.values().filter(|event| pred(event)).count()
    }
}
