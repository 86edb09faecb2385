use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Timer queue on a virtual clock. The host advances time; due callbacks come
/// back out in deadline order, ties in scheduling order.
pub struct Scheduler<T> {
    now_ms: u64,
    next_id: u64,
    queue: BTreeMap<(u64, TimerId), T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Scheduler {
            now_ms: 0,
            next_id: 1,
            queue: BTreeMap::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule(&mut self, delay_ms: u64, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.insert((self.now_ms.saturating_add(delay_ms), id), task);
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let key = self.queue.keys().find(|(_, t)| *t == id).copied()?;
        self.queue.remove(&key)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Milliseconds until the earliest timer fires.
    pub fn next_deadline(&self) -> Option<u64> {
        self.queue
            .keys()
            .next()
            .map(|(due, _)| due.saturating_sub(self.now_ms))
    }

    /// Pops the earliest timer due at or before `until`, moving the clock to
    /// its deadline. Tasks scheduled while handling it are seen by the next call.
    pub fn pop_due(&mut self, until: u64) -> Option<T> {
        let (&(due, id), _) = self.queue.iter().next()?;
        if due > until {
            return None;
        }
        self.now_ms = self.now_ms.max(due);
        self.queue.remove(&(due, id))
    }

    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}
